use mafia_core::{ErrorCode, Notification, NotificationKind};
use mafia_test_support::unique_str;

use crate::support::{seated_game, service};

#[tokio::test]
async fn mafia_quitting_finishes_the_game() {
    let mut game = seated_game(service(21));
    let mafia = game.mafia.clone();

    game.service.quit(&game.session, &mafia).unwrap();

    let state = game.service.get_state(&game.session, &game.detective).unwrap();
    assert!(state.is_finished);
    assert!(!state.is_alive(&mafia));

    // The quitter's stream just ends.
    assert_eq!(game.stream(&mafia).recv().await, None);

    let mut events = game.drain();
    events.remove(&mafia);
    assert_eq!(events.len(), 3);
    for (name, events) in events {
        match events.as_slice() {
            [Notification::Finish { mafia: reported, game_state }] => {
                assert_eq!(reported, &mafia, "{name}");
                assert!(game_state.is_finished);
            }
            other => panic!("{name} expected one FINISH, got {other:?}"),
        }
    }
}

#[test]
fn departed_players_are_gone_for_quit_and_subscribe() {
    let game = seated_game(service(22));
    let civilian = &game.civilians[0];
    game.service.quit(&game.session, civilian).unwrap();

    assert_eq!(
        game.service.quit(&game.session, civilian).unwrap_err().code(),
        ErrorCode::PlayerNotFound
    );
    assert_eq!(
        game.service.subscribe(&game.session, civilian).err().unwrap().code(),
        ErrorCode::PlayerNotFound
    );
    // Still known to the roster, just not allowed to talk.
    assert!(!game.service.can_chat(&game.session, civilian).unwrap());
    assert_eq!(
        game.service.can_chat(&game.session, "stranger").unwrap_err().code(),
        ErrorCode::PlayerNotFound
    );
}

#[test]
fn quitting_the_lobby_frees_the_name() {
    let service = service(23);
    let session = unique_str("lobby");
    service.join(&session, "alice").unwrap();
    service.join(&session, "bob").unwrap();

    service.quit(&session, "alice").unwrap();
    let state = service.get_state(&session, "bob").unwrap();
    assert_eq!(state.alive_players, vec!["bob"]);
    assert!(!state.is_finished);

    service.join(&session, "alice").unwrap();
    assert_eq!(
        service.get_state(&session, "bob").unwrap().alive_players,
        vec!["alice", "bob"]
    );
}

#[test]
fn quitting_a_finished_game_only_disconnects() {
    let mut game = seated_game(service(24));
    game.service.quit(&game.session, &game.mafia).unwrap();
    game.drain();
    let before = game.service.get_state(&game.session, &game.detective).unwrap();

    game.service.quit(&game.session, &game.detective).unwrap();
    assert_eq!(
        game.service.get_state(&game.session, &game.civilians[0]).unwrap(),
        before
    );
    assert!(game.drain().values().all(Vec::is_empty));
}

#[test]
fn last_missing_voter_quitting_completes_the_day() {
    let mut game = seated_game(service(25));
    let (mafia, detective) = (game.mafia.clone(), game.detective.clone());
    let (c1, c2) = (game.civilians[0].clone(), game.civilians[1].clone());

    // Night 1 kills c1; Day 1 has mafia, detective, c2 alive.
    game.play_night(&c1, &c2);
    game.drain();
    game.service.vote(&game.session, &mafia, &detective).unwrap();
    game.service.vote(&game.session, &c2, &detective).unwrap();

    // The detective leaves without voting; the Day resolves at once.
    game.service.quit(&game.session, &detective).unwrap();
    let state = game.service.get_state(&game.session, &mafia).unwrap();
    assert!(!state.is_day);
    assert_eq!(state.date, 2);
    assert_eq!(state.alive_players.len(), 2);

    let events = game.drain().remove(&mafia).unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind(), NotificationKind::NewNight);
    assert_eq!(
        events[0].killed_player(),
        None,
        "the voted-out player already left"
    );
}
