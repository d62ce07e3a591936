//! Domain-level error type returned by every engine operation.
//!
//! Transport-agnostic: collaborators map these onto their own protocol
//! failures through [`DomainError::code`]. A rejected call never leaves
//! partial state behind, so every error here is recoverable.

use thiserror::Error;

use crate::errors::error_code::ErrorCode;

/// Rule violations: the request is well-formed but not allowed right now.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ValidationKind {
    /// Empty or malformed player name.
    InvalidName,
    /// Action attempted before the game started.
    NotStarted,
    /// Action attempted after the game finished.
    GameFinished,
    /// Action attempted in the wrong Day/Night phase.
    WrongPhase,
    /// Caller lacks the role, is dead, or already acted this phase.
    CannotAct,
    /// Target is dead or does not exist.
    InvalidVictim,
}

/// Semantic conflicts with the current roster.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ConflictKind {
    DuplicateName,
    AlreadyStarted,
}

/// Missing resources.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum NotFoundKind {
    Session,
    Player,
}

/// Central domain error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("validation error: {1}")]
    Validation(ValidationKind, String),
    #[error("conflict {0:?}: {1}")]
    Conflict(ConflictKind, String),
    #[error("not found {0:?}: {1}")]
    NotFound(NotFoundKind, String),
}

impl DomainError {
    pub fn validation(kind: ValidationKind, detail: impl Into<String>) -> Self {
        Self::Validation(kind, detail.into())
    }

    pub fn conflict(kind: ConflictKind, detail: impl Into<String>) -> Self {
        Self::Conflict(kind, detail.into())
    }

    pub fn not_found(kind: NotFoundKind, detail: impl Into<String>) -> Self {
        Self::NotFound(kind, detail.into())
    }

    pub fn invalid_name(detail: impl Into<String>) -> Self {
        Self::validation(ValidationKind::InvalidName, detail)
    }

    pub fn not_started() -> Self {
        Self::validation(ValidationKind::NotStarted, "Game hasn't started yet")
    }

    pub fn game_finished() -> Self {
        Self::validation(ValidationKind::GameFinished, "Game has finished already")
    }

    pub fn wrong_phase(detail: impl Into<String>) -> Self {
        Self::validation(ValidationKind::WrongPhase, detail)
    }

    pub fn cannot_act(detail: impl Into<String>) -> Self {
        Self::validation(ValidationKind::CannotAct, detail)
    }

    pub fn invalid_victim(detail: impl Into<String>) -> Self {
        Self::validation(ValidationKind::InvalidVictim, detail)
    }

    pub fn player_not_found(name: &str) -> Self {
        Self::not_found(NotFoundKind::Player, format!("Player '{name}' doesn't exist"))
    }

    pub fn session_not_found(session: &str) -> Self {
        Self::not_found(NotFoundKind::Session, format!("No game session: {session}"))
    }

    /// Flat error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            DomainError::Validation(kind, _) => match kind {
                ValidationKind::InvalidName => ErrorCode::InvalidName,
                ValidationKind::NotStarted => ErrorCode::NotStarted,
                ValidationKind::GameFinished => ErrorCode::GameFinished,
                ValidationKind::WrongPhase => ErrorCode::WrongPhase,
                ValidationKind::CannotAct => ErrorCode::CannotAct,
                ValidationKind::InvalidVictim => ErrorCode::InvalidVictim,
            },
            DomainError::Conflict(kind, _) => match kind {
                ConflictKind::DuplicateName => ErrorCode::DuplicateName,
                ConflictKind::AlreadyStarted => ErrorCode::AlreadyStarted,
            },
            DomainError::NotFound(kind, _) => match kind {
                NotFoundKind::Session => ErrorCode::SessionNotFound,
                NotFoundKind::Player => ErrorCode::PlayerNotFound,
            },
        }
    }

    /// Human-readable detail without the family prefix.
    pub fn detail(&self) -> &str {
        match self {
            DomainError::Validation(_, d)
            | DomainError::Conflict(_, d)
            | DomainError::NotFound(_, d) => d,
        }
    }
}
