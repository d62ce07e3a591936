//! Day vote resolution.

use std::collections::HashMap;

/// Resolve a completed Day's votes into the eliminated player.
///
/// Returns the single name holding the strict maximum. A shared maximum,
/// or no votes at all, eliminates nobody: ties are never broken randomly.
pub fn resolve_day_victim(votes: &HashMap<String, u32>) -> Option<String> {
    let max = votes.values().copied().max().filter(|&max| max > 0)?;

    let mut leaders = votes.iter().filter(|(_, count)| **count == max);
    let (name, _) = leaders.next()?;
    if leaders.next().is_some() {
        return None;
    }
    Some(name.clone())
}
