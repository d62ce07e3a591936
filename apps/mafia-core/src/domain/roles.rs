//! Role assignment for a full roster.

use std::fmt;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::domain::rules::{PLAYERS, ROLE_SET};

/// Secret role dealt to a player at game start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Mafia,
    Detective,
    Civilian,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Mafia => "Mafia",
            Role::Detective => "Detective",
            Role::Civilian => "Civilian",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Deal [`ROLE_SET`] to `names`.
///
/// The role multiset is shuffled with an unbiased Fisher-Yates pass and then
/// zipped against `names` in the given order, so every distinct assignment
/// is reachable with the correct probability. Callers deal only once the
/// roster holds exactly [`PLAYERS`] names.
pub fn assign_roles<R: Rng + ?Sized>(names: &[String], rng: &mut R) -> Vec<(String, Role)> {
    debug_assert_eq!(names.len(), PLAYERS, "roles are dealt to a full roster");

    let mut roles = ROLE_SET;
    roles.shuffle(rng);

    names.iter().cloned().zip(roles).collect()
}
