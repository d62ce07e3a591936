//! Error handling for the mafia engine.

pub mod domain;
pub mod error_code;

pub use domain::{ConflictKind, DomainError, NotFoundKind, ValidationKind};
pub use error_code::ErrorCode;
