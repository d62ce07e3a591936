//! Error codes for the mafia engine.
//!
//! Every failure a collaborator can observe maps to exactly one of these
//! codes. Add new codes here; never pass ad-hoc strings as error codes.

use core::fmt;

/// Centralized error codes.
///
/// Each variant maps to a canonical SCREAMING_SNAKE_CASE string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Join validation
    /// Empty or malformed player name
    InvalidName,
    /// Name already taken in this session
    DuplicateName,
    /// Session already has a full roster
    AlreadyStarted,

    // Resource Not Found
    /// Unknown session id
    SessionNotFound,
    /// Unknown (or departed) player
    PlayerNotFound,

    // Game rules
    /// Game has not started yet
    NotStarted,
    /// Game is over
    GameFinished,
    /// Wrong Day/Night phase for this action
    WrongPhase,
    /// Caller may not perform this action now
    CannotAct,
    /// Target is dead or unknown
    InvalidVictim,

    // System
    /// Invalid configuration
    ConfigError,
}

impl ErrorCode {
    /// Canonical string representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidName => "INVALID_NAME",
            Self::DuplicateName => "DUPLICATE_NAME",
            Self::AlreadyStarted => "ALREADY_STARTED",
            Self::SessionNotFound => "SESSION_NOT_FOUND",
            Self::PlayerNotFound => "PLAYER_NOT_FOUND",
            Self::NotStarted => "NOT_STARTED",
            Self::GameFinished => "GAME_FINISHED",
            Self::WrongPhase => "WRONG_PHASE",
            Self::CannotAct => "CANNOT_ACT",
            Self::InvalidVictim => "INVALID_VICTIM",
            Self::ConfigError => "CONFIG_ERROR",
        }
    }

    /// All codes, for exhaustiveness checks.
    pub const ALL: [ErrorCode; 11] = [
        Self::InvalidName,
        Self::DuplicateName,
        Self::AlreadyStarted,
        Self::SessionNotFound,
        Self::PlayerNotFound,
        Self::NotStarted,
        Self::GameFinished,
        Self::WrongPhase,
        Self::CannotAct,
        Self::InvalidVictim,
        Self::ConfigError,
    ];
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
