use std::time::{Duration, Instant};

use mafia_core::{spawn_reaper, EngineConfig, ErrorCode, MafiaService, NotificationKind};

use crate::support::seated_game;

#[test]
fn reap_pass_evicts_finished_sessions_after_ttl() {
    let mut game = seated_game(MafiaService::with_seed(EngineConfig::default(), 61));
    let registry = game.service.registry();
    let ttl = registry.config().finished_session_ttl;

    game.service.quit(&game.session, &game.mafia).unwrap();
    assert!(registry.reap(Instant::now()).is_empty(), "ttl not reached");

    let evicted = registry.reap(Instant::now() + ttl);
    assert_eq!(evicted, vec![game.session.clone()]);
    assert_eq!(
        game.service
            .get_state(&game.session, &game.detective)
            .unwrap_err()
            .code(),
        ErrorCode::SessionNotFound
    );

    let detective = game.detective.clone();
    let stream = game.stream(&detective);
    assert_eq!(stream.try_recv().map(|n| n.kind()), Some(NotificationKind::Finish));
    assert_eq!(stream.try_recv(), None);
}

#[tokio::test]
async fn background_reaper_evicts_expired_sessions() {
    let config = EngineConfig {
        finished_session_ttl: Duration::ZERO,
        reap_interval: Duration::from_millis(20),
        ..EngineConfig::default()
    };
    let mut game = seated_game(MafiaService::with_seed(config.clone(), 62));
    let registry = game.service.registry();
    let reaper = spawn_reaper(registry.clone(), config.reap_interval);

    let live = seated_game(game.service.clone());
    game.service.quit(&game.session, &game.mafia).unwrap();

    let deadline = Instant::now() + Duration::from_secs(2);
    while registry.len() > 1 && Instant::now() < deadline {
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    reaper.abort();

    assert_eq!(registry.session_ids(), vec![live.session.clone()]);
    let civilian = game.civilians[0].clone();
    let stream = game.stream(&civilian);
    assert_eq!(stream.recv().await.map(|n| n.kind()), Some(NotificationKind::Finish));
    assert_eq!(stream.recv().await, None);
}
