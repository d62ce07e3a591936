//! Engine tunables, read from the environment.

use std::env;
use std::time::Duration;

use crate::error::AppError;

pub const NOTIFICATION_BUFFER_VAR: &str = "MAFIA_NOTIFICATION_BUFFER";
pub const FINISHED_SESSION_TTL_VAR: &str = "MAFIA_FINISHED_SESSION_TTL_SECS";
pub const LOBBY_IDLE_TTL_VAR: &str = "MAFIA_LOBBY_IDLE_TTL_SECS";
pub const REAP_INTERVAL_VAR: &str = "MAFIA_REAP_INTERVAL_SECS";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Capacity of each player's notification queue.
    pub notification_buffer: usize,
    /// How long a finished session stays queryable.
    pub finished_session_ttl: Duration,
    /// How long an empty, never-started lobby survives.
    pub lobby_idle_ttl: Duration,
    pub reap_interval: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            notification_buffer: 32,
            finished_session_ttl: Duration::from_secs(600),
            lobby_idle_ttl: Duration::from_secs(300),
            reap_interval: Duration::from_secs(60),
        }
    }
}

impl EngineConfig {
    /// Defaults overridden by any `MAFIA_*` variables that are set.
    pub fn from_env() -> Result<Self, AppError> {
        let defaults = Self::default();

        let notification_buffer =
            optional_var::<usize>(NOTIFICATION_BUFFER_VAR)?.unwrap_or(defaults.notification_buffer);
        if notification_buffer == 0 {
            return Err(AppError::config(format!(
                "{NOTIFICATION_BUFFER_VAR} must be at least 1"
            )));
        }

        Ok(Self {
            notification_buffer,
            finished_session_ttl: optional_secs(FINISHED_SESSION_TTL_VAR)?
                .unwrap_or(defaults.finished_session_ttl),
            lobby_idle_ttl: optional_secs(LOBBY_IDLE_TTL_VAR)?.unwrap_or(defaults.lobby_idle_ttl),
            reap_interval: optional_secs(REAP_INTERVAL_VAR)?.unwrap_or(defaults.reap_interval),
        })
    }
}

fn optional_var<T: std::str::FromStr>(name: &str) -> Result<Option<T>, AppError> {
    match env::var(name) {
        Ok(raw) => raw.trim().parse::<T>().map(Some).map_err(|_| {
            AppError::config(format!(
                "Environment variable '{name}' has an invalid value: '{raw}'"
            ))
        }),
        Err(_) => Ok(None),
    }
}

fn optional_secs(name: &str) -> Result<Option<Duration>, AppError> {
    Ok(optional_var::<u64>(name)?.map(Duration::from_secs))
}
