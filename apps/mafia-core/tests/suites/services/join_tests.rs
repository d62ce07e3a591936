use std::collections::HashMap;

use mafia_core::{ErrorCode, Notification, Role};
use mafia_test_support::unique_str;

use crate::support::{service, NAMES};

#[test]
fn first_join_creates_a_lobby() {
    let service = service(1);
    let session = unique_str("lobby");
    service.join(&session, "alice").unwrap();

    let state = service.get_state(&session, "alice").unwrap();
    assert_eq!(state.session, session);
    assert_eq!(state.alive_players, vec!["alice"]);
    assert_eq!(state.date, 0);
    assert!(state.is_day);
    assert!(!state.is_started);
    assert!(!state.is_finished);
}

#[test]
fn names_outside_the_charset_are_rejected_before_session_creation() {
    let service = service(1);
    for name in ["", "two words", "dash-name", "tab\t", "émile"] {
        let err = service.join("s1", name).unwrap_err();
        assert_eq!(err.code(), ErrorCode::InvalidName, "name {name:?}");
    }
    assert!(service.registry().is_empty());
}

#[test]
fn duplicate_and_fifth_joins_are_rejected() {
    let service = service(1);
    let session = unique_str("full");
    service.join(&session, "alice").unwrap();
    assert_eq!(
        service.join(&session, "alice").unwrap_err().code(),
        ErrorCode::DuplicateName
    );

    for name in &NAMES[1..] {
        service.join(&session, name).unwrap();
    }
    assert_eq!(
        service.join(&session, "erin").unwrap_err().code(),
        ErrorCode::AlreadyStarted
    );
    assert_eq!(service.get_state(&session, "erin").unwrap().alive_players.len(), 4);
}

#[test]
fn fourth_join_deals_one_role_per_player() {
    let service = service(99);
    let session = unique_str("deal");
    for name in NAMES {
        service.join(&session, name).unwrap();
    }

    let state = service.get_state(&session, "alice").unwrap();
    assert!(state.is_started);
    assert!(!state.is_day);
    assert_eq!(state.date, 1);

    let mut counts: HashMap<Role, usize> = HashMap::new();
    for name in NAMES {
        let mut stream = service.subscribe(&session, name).unwrap();
        let Some(Notification::Start { role, game_state }) = stream.try_recv() else {
            panic!("{name} missing START");
        };
        assert_eq!(game_state, state);
        *counts.entry(role).or_default() += 1;
        assert_eq!(stream.try_recv(), None, "exactly one START");
    }
    assert_eq!(counts[&Role::Mafia], 1);
    assert_eq!(counts[&Role::Detective], 1);
    assert_eq!(counts[&Role::Civilian], 2);
}

#[test]
fn unknown_session_is_not_found_everywhere() {
    let service = service(1);
    let missing = unique_str("missing");

    let codes = [
        service.get_state(&missing, "alice").unwrap_err().code(),
        service.can_chat(&missing, "alice").unwrap_err().code(),
        service.vote(&missing, "alice", "bob").unwrap_err().code(),
        service.kill(&missing, "alice", "bob").unwrap_err().code(),
        service.check_if_mafia(&missing, "alice", "bob").unwrap_err().code(),
        service.quit(&missing, "alice").unwrap_err().code(),
        service.subscribe(&missing, "alice").err().unwrap().code(),
    ];
    assert!(codes.iter().all(|c| *c == ErrorCode::SessionNotFound));
    assert!(service.registry().is_empty());
}

#[test]
fn sessions_are_independent() {
    let service = service(1);
    let (s1, s2) = (unique_str("a"), unique_str("b"));
    service.join(&s1, "alice").unwrap();
    service.join(&s2, "alice").unwrap();
    service.quit(&s1, "alice").unwrap();

    assert!(service.get_state(&s1, "alice").unwrap().alive_players.is_empty());
    assert_eq!(service.get_state(&s2, "alice").unwrap().alive_players, vec!["alice"]);
}
