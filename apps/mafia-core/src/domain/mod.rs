//! Domain layer: pure game logic types and helpers.

pub mod game;
pub mod notification;
pub mod roles;
pub mod rules;
pub mod seed_derivation;
pub mod snapshot;
pub mod tally;

#[cfg(test)]
mod test_state_helpers;

// Re-exports for ergonomics
pub use game::{Delivery, Game, Phase, PlayerRecord};
pub use notification::{Notification, NotificationKind};
pub use roles::{assign_roles, Role};
pub use rules::{PLAYERS, ROLE_SET};
pub use seed_derivation::derive_session_seed;
pub use snapshot::GameSnapshot;
pub use tally::resolve_day_victim;
