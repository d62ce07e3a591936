use serde::{Deserialize, Serialize};

/// Read-only view of a session returned to queries and attached to every
/// notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSnapshot {
    pub session: String,
    /// Names of living players, sorted.
    pub alive_players: Vec<String>,
    /// Night counter; 0 in the lobby, 1 on the first Night.
    pub date: u32,
    pub is_day: bool,
    pub is_started: bool,
    pub is_finished: bool,
}

impl GameSnapshot {
    pub fn is_alive(&self, name: &str) -> bool {
        self.alive_players.iter().any(|p| p == name)
    }
}
