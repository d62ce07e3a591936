//! Test-only game builders for domain unit tests.

use crate::domain::game::{Delivery, Game};
use crate::domain::notification::NotificationKind;
use crate::domain::roles::Role;

pub const MAFIA: &str = "p1";
pub const DETECTIVE: &str = "p2";
pub const CIVILIAN_A: &str = "p3";
pub const CIVILIAN_B: &str = "p4";

/// A started game with fixed roles: p1 Mafia, p2 Detective, p3/p4 Civilians.
///
/// The START deliveries are drained so each test only sees what it caused.
pub fn started_game() -> Game {
    let mut game = Game::new("s1");
    for name in [MAFIA, DETECTIVE, CIVILIAN_A] {
        game.add_player_with(name, |_| unreachable!("roster not full"))
            .unwrap();
    }
    game.add_player_with(CIVILIAN_B, |roster| {
        roster
            .iter()
            .map(|name| {
                let role = match name.as_str() {
                    MAFIA => Role::Mafia,
                    DETECTIVE => Role::Detective,
                    _ => Role::Civilian,
                };
                (name.clone(), role)
            })
            .collect()
    })
    .unwrap();
    game.drain_deliveries();
    game
}

/// Play the first Night: Mafia kills `victim`, Detective checks `suspect`.
pub fn play_night(game: &mut Game, victim: &str, suspect: &str) {
    game.kill_player(MAFIA, victim).unwrap();
    game.check_if_mafia(DETECTIVE, suspect).unwrap();
}

/// Started game advanced to Day 1; the Mafia killed `victim` on Night 1.
pub fn game_at_first_day(victim: &str) -> Game {
    let mut game = started_game();
    play_night(&mut game, victim, MAFIA);
    game.drain_deliveries();
    game
}

pub fn kinds(deliveries: &[Delivery]) -> Vec<NotificationKind> {
    deliveries.iter().map(|d| d.notification.kind()).collect()
}
