//! End-to-end tests through the service entry points.

use gridmatch::{
    EndedReason, FindOrCreateRequest, GameError, GameService, SessionStatus, Slot,
};

fn seeded_game(service: &GameService) -> String {
    let id = service
        .find_or_create(&"alice".to_string(), FindOrCreateRequest::default())
        .expect("create");
    service.join(&"bob".to_string(), &id).expect("join");
    id
}

#[test]
fn test_full_single_match_through_service() {
    let service = GameService::new();
    let id = seeded_game(&service);

    let mut version = service.get_game(&id).expect("exists").version;
    for (caller, index) in [("alice", 0), ("bob", 3), ("alice", 1), ("bob", 4)] {
        let session = service
            .place_move(&caller.to_string(), &id, index)
            .expect("move applies");
        assert!(session.version > version, "every write bumps the version");
        version = session.version;
    }

    let ended = service
        .place_move(&"alice".to_string(), &id, 2)
        .expect("winning move");
    assert_eq!(ended.status, SessionStatus::Ended);
    assert_eq!(ended.ended_reason, Some(EndedReason::Win));
    assert_eq!(ended.winner, Some(Slot::A));
    assert_eq!(ended.match_state.match_winner, Some(Slot::A));
}

#[test]
fn test_join_unknown_session_is_not_found() {
    let service = GameService::new();
    assert_eq!(
        service.join(&"alice".to_string(), "g99999999"),
        Err(GameError::NotFound)
    );
}

#[test]
fn test_join_is_idempotent_through_service() {
    let service = GameService::new();
    let id = seeded_game(&service);
    let before = service.get_game(&id).expect("exists").version;

    let session = service.join(&"bob".to_string(), &id).expect("re-join ok");
    assert_eq!(session.version, before, "idempotent join returns same record");
}

#[test]
fn test_heartbeat_acknowledges_with_status() {
    let service = GameService::new();
    let id = seeded_game(&service);

    let ack = service.heartbeat(&"alice".to_string(), &id).expect("ok");
    assert!(ack.ok);
    assert_eq!(ack.status, SessionStatus::Playing);

    assert_eq!(
        service.heartbeat(&"carol".to_string(), &id),
        Err(GameError::NotParticipant)
    );
}

#[test]
fn test_abandon_deletes_the_record() {
    let service = GameService::new();
    let id = seeded_game(&service);

    assert_eq!(
        service.abandon(&"carol".to_string(), &id),
        Err(GameError::NotParticipant)
    );

    service.abandon(&"bob".to_string(), &id).expect("deleted");
    assert!(service.get_game(&id).is_none(), "no terminal record survives");
    assert_eq!(
        service.abandon(&"bob".to_string(), &id),
        Err(GameError::NotFound)
    );
}

#[test]
fn test_list_waiting_and_my_active() {
    let service = GameService::new();
    let alice = "alice".to_string();
    let waiting_id = service
        .find_or_create(&alice, FindOrCreateRequest::default())
        .expect("create");

    let waiting = service.list_waiting();
    assert_eq!(waiting.len(), 1);
    assert_eq!(waiting[0].id, waiting_id);

    let active = service.list_my_active(&alice);
    assert_eq!(active.len(), 1, "waiting sessions count as active");

    // Finish a second game; it must drop out of the active list.
    let finished_id = seeded_game(&service);
    for (caller, index) in [
        ("alice", 0),
        ("bob", 3),
        ("alice", 1),
        ("bob", 4),
        ("alice", 2),
    ] {
        service
            .place_move(&caller.to_string(), &finished_id, index)
            .expect("move applies");
    }

    let active = service.list_my_active(&alice);
    assert_eq!(active.len(), 1, "ended session filtered out");
    assert_eq!(active[0].id, waiting_id);

    assert!(service.list_waiting().iter().all(|s| s.id != finished_id));
}

#[test]
fn test_timeout_turn_without_timer_returns_unchanged_record() {
    let service = GameService::new();
    let id = seeded_game(&service);
    let before = service.get_game(&id).expect("exists");

    let after = service.timeout_turn(&id).expect("ok");
    assert_eq!(after.version, before.version, "nothing due, nothing written");
    assert_eq!(after.current_turn, before.current_turn);

    assert_eq!(service.timeout_turn("g99999999"), Err(GameError::NotFound));
}

#[test]
fn test_move_on_unknown_session_is_not_found() {
    let service = GameService::new();
    assert_eq!(
        service.place_move(&"alice".to_string(), "g99999999", 0),
        Err(GameError::NotFound)
    );
}
