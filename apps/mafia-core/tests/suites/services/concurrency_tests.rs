use std::collections::HashMap;
use std::thread;

use mafia_core::{ErrorCode, Notification, NotificationKind, Role};
use mafia_test_support::unique_str;

use crate::support::{seated_game, service};

#[test]
fn racing_joins_admit_exactly_four() {
    let service = service(51);
    let session = unique_str("race");
    let names: Vec<String> = (0..8).map(|i| format!("player{i}")).collect();

    let results: Vec<(String, Result<(), ErrorCode>)> = thread::scope(|scope| {
        let handles: Vec<_> = names
            .iter()
            .map(|name| {
                let service = service.clone();
                let session = session.clone();
                scope.spawn(move || {
                    let result = service.join(&session, name).map_err(|e| e.code());
                    (name.clone(), result)
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let admitted: Vec<&String> = results
        .iter()
        .filter(|(_, r)| r.is_ok())
        .map(|(n, _)| n)
        .collect();
    assert_eq!(admitted.len(), 4);
    assert!(results
        .iter()
        .filter(|(_, r)| r.is_err())
        .all(|(_, r)| *r == Err(ErrorCode::AlreadyStarted)));

    let mut roles: HashMap<Role, usize> = HashMap::new();
    for name in admitted {
        let mut stream = service.subscribe(&session, name).unwrap();
        let Some(Notification::Start { role, .. }) = stream.try_recv() else {
            panic!("{name} missing START");
        };
        assert_eq!(stream.try_recv(), None, "role dealt once");
        *roles.entry(role).or_default() += 1;
    }
    assert_eq!(roles[&Role::Mafia], 1);
    assert_eq!(roles[&Role::Detective], 1);
    assert_eq!(roles[&Role::Civilian], 2);
}

#[test]
fn racing_votes_resolve_the_day_once() {
    let mut game = seated_game(service(52));
    let victim = game.civilians[0].clone();
    let mafia = game.mafia.clone();
    let detective = game.detective.clone();
    game.play_night(&victim, &mafia);
    game.drain();

    let alive = game
        .service
        .get_state(&game.session, &mafia)
        .unwrap()
        .alive_players;
    assert_eq!(alive.len(), 3);

    thread::scope(|scope| {
        for voter in &alive {
            let service = game.service.clone();
            let session = game.session.clone();
            let target = if *voter == detective { mafia.clone() } else { detective.clone() };
            scope.spawn(move || service.vote(&session, voter, &target).unwrap());
        }
    });

    let state = game.service.get_state(&game.session, &mafia).unwrap();
    assert!(!state.is_day);
    assert_eq!(state.date, 2);
    assert!(!state.is_alive(&detective));

    for (name, events) in game.drain() {
        let kinds: Vec<_> = events.iter().map(Notification::kind).collect();
        assert_eq!(kinds, vec![NotificationKind::NewNight], "{name}");
        assert_eq!(events[0].killed_player(), Some(detective.as_str()));
    }
}

#[test]
fn racing_duplicate_votes_count_once() {
    let game = seated_game(service(53));
    let victim = game.civilians[0].clone();
    game.play_night(&victim, &game.mafia);

    let voter = game.civilians[1].clone();
    let outcomes: Vec<Result<(), ErrorCode>> = thread::scope(|scope| {
        let handles: Vec<_> = (0..6)
            .map(|_| {
                let service = game.service.clone();
                let (session, voter, target) =
                    (game.session.clone(), voter.clone(), game.mafia.clone());
                scope.spawn(move || service.vote(&session, &voter, &target).map_err(|e| e.code()))
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(outcomes
        .iter()
        .filter(|r| r.is_err())
        .all(|r| *r == Err(ErrorCode::CannotAct)));
    assert!(game.service.get_state(&game.session, &voter).unwrap().is_day);
}
