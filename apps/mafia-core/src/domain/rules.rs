use crate::domain::roles::Role;

/// Players per session. The last join triggers role assignment and start.
pub const PLAYERS: usize = 4;

/// The fixed role multiset dealt to every session.
pub const ROLE_SET: [Role; PLAYERS] = [Role::Mafia, Role::Detective, Role::Civilian, Role::Civilian];

/// Finish condition: the Mafia is dead, or at most one player is alive.
pub fn is_game_over(mafia_alive: bool, alive_count: usize) -> bool {
    !mafia_alive || alive_count <= 1
}
