use mafia_core::{ChatGate, ErrorCode};

use crate::support::{seated_game, service};

#[test]
fn chat_is_gated_by_phase_and_liveness() {
    let game = seated_game(service(41));
    let gate = ChatGate::new(game.service.clone());
    let session = game.session.as_str();
    let speaker = game.civilians[1].as_str();

    let err = gate.relay(session, speaker, "psst").unwrap_err();
    assert_eq!(err.code(), ErrorCode::CannotAct, "nobody talks at night");

    let victim = game.civilians[0].clone();
    game.play_night(&victim, &game.mafia);

    assert_eq!(
        gate.relay(session, speaker, "who did it?").unwrap(),
        format!("[ {speaker} ] who did it?")
    );
    assert!(game.service.can_chat(session, speaker).unwrap());
    assert_eq!(
        gate.relay(session, &victim, "boo").unwrap_err().code(),
        ErrorCode::CannotAct,
        "the dead stay quiet"
    );
    assert_eq!(
        gate.relay("no-such-session", speaker, "hi").unwrap_err().code(),
        ErrorCode::SessionNotFound
    );
}
