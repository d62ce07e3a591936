#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

pub mod config;
pub mod domain;
pub mod error;
pub mod errors;
pub mod realtime;
pub mod services;
pub mod telemetry;

// Re-exports for public API
pub use config::EngineConfig;
pub use domain::{GameSnapshot, Notification, NotificationKind, Role};
pub use error::AppError;
pub use errors::{DomainError, ErrorCode};
pub use realtime::NotificationStream;
pub use services::{spawn_reaper, ChatGate, MafiaService, SessionRegistry};

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    mafia_test_support::logging::init();
}
