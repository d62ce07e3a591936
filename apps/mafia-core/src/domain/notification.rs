//! Per-player game events.

use serde::{Deserialize, Serialize};

use crate::domain::roles::Role;
use crate::domain::snapshot::GameSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NotificationKind {
    Start,
    NewDay,
    NewNight,
    Finish,
}

/// Event pushed to a player's queue.
///
/// Every variant carries the snapshot taken right after the transition,
/// plus exactly one detail: the recipient's own role, the player killed
/// during the transition (empty for nobody), or the Mafia's name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Notification {
    Start {
        game_state: GameSnapshot,
        role: Role,
    },
    NewDay {
        game_state: GameSnapshot,
        killed_player: String,
    },
    NewNight {
        game_state: GameSnapshot,
        killed_player: String,
    },
    Finish {
        game_state: GameSnapshot,
        mafia: String,
    },
}

impl Notification {
    pub fn kind(&self) -> NotificationKind {
        match self {
            Notification::Start { .. } => NotificationKind::Start,
            Notification::NewDay { .. } => NotificationKind::NewDay,
            Notification::NewNight { .. } => NotificationKind::NewNight,
            Notification::Finish { .. } => NotificationKind::Finish,
        }
    }

    pub fn game_state(&self) -> &GameSnapshot {
        match self {
            Notification::Start { game_state, .. }
            | Notification::NewDay { game_state, .. }
            | Notification::NewNight { game_state, .. }
            | Notification::Finish { game_state, .. } => game_state,
        }
    }

    /// Player killed by this transition; `None` for START/FINISH and for a
    /// transition that killed nobody.
    pub fn killed_player(&self) -> Option<&str> {
        match self {
            Notification::NewDay { killed_player, .. }
            | Notification::NewNight { killed_player, .. } => {
                Some(killed_player.as_str()).filter(|name| !name.is_empty())
            }
            _ => None,
        }
    }

    /// Whether a player holding `role` won. Only FINISH answers: the Mafia
    /// won iff its name is still in the alive list.
    pub fn is_win_for(&self, role: Role) -> Option<bool> {
        let Notification::Finish { game_state, mafia } = self else {
            return None;
        };
        Some(game_state.is_alive(mafia) == (role == Role::Mafia))
    }
}
