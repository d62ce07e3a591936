//! Shared test utilities for the mafia workspace.
//!
//! Provides the unified test logging initialization and helpers for
//! generating unique identifiers so tests never collide on session ids.

pub mod logging;

use ulid::Ulid;

/// Generate a unique alphanumeric string with the given prefix.
///
/// The result only contains `[A-Za-z0-9]`, so it is also usable as a
/// player name at the service boundary.
///
/// # Examples
/// ```
/// use mafia_test_support::unique_str;
///
/// let a = unique_str("session");
/// let b = unique_str("session");
/// assert_ne!(a, b);
/// assert!(a.starts_with("session"));
/// ```
pub fn unique_str(prefix: &str) -> String {
    format!("{prefix}{}", Ulid::new())
}
