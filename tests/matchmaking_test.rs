//! Tests for exact-config FIFO matchmaking.

use chrono::Utc;
use gridmatch::{
    FindOrCreateRequest, GameError, MAX_TURN_DURATION_MS, MatchFormat, SessionStatus,
    SessionStore, find_or_create,
};

fn request(
    grid_size: Option<usize>,
    win_length: Option<usize>,
    match_format: Option<MatchFormat>,
) -> FindOrCreateRequest {
    FindOrCreateRequest {
        grid_size,
        win_length,
        match_format,
        turn_duration_ms: None,
    }
}

#[test]
fn test_defaults_resolve_to_3x3_win3_single() {
    let store = SessionStore::new();
    let id = find_or_create(&store, &"alice".to_string(), FindOrCreateRequest::default(), Utc::now())
        .expect("create should succeed");

    let session = store.get(&id).expect("session exists");
    assert_eq!(session.config.grid_size, 3);
    assert_eq!(session.config.win_length, 3);
    assert_eq!(session.config.format, MatchFormat::Single);
    assert_eq!(session.status, SessionStatus::Waiting);
    assert_eq!(session.slot_a.as_deref(), Some("alice"));
    assert_eq!(session.slot_b, None);
}

#[test]
fn test_explicit_config_round_trips() {
    let store = SessionStore::new();
    let id = find_or_create(
        &store,
        &"alice".to_string(),
        request(Some(5), Some(4), Some(MatchFormat::Bo5)),
        Utc::now(),
    )
    .expect("create should succeed");

    let session = store.get(&id).expect("session exists");
    assert_eq!(session.config.grid_size, 5);
    assert_eq!(session.config.win_length, 4);
    assert_eq!(session.config.format, MatchFormat::Bo5);
    assert_eq!(session.board.cell_count(), 25);
}

#[test]
fn test_invalid_config_rejected() {
    let store = SessionStore::new();
    let caller = "alice".to_string();

    let zero_grid = find_or_create(&store, &caller, request(Some(0), None, None), Utc::now());
    assert!(matches!(zero_grid, Err(GameError::InvalidConfig(_))));

    let long_win = find_or_create(&store, &caller, request(Some(3), Some(5), None), Utc::now());
    assert!(matches!(long_win, Err(GameError::InvalidConfig(_))));

    let zero_win = find_or_create(&store, &caller, request(Some(3), Some(0), None), Utc::now());
    assert!(matches!(zero_win, Err(GameError::InvalidConfig(_))));
}

#[test]
fn test_out_of_range_turn_duration_rejected() {
    let store = SessionStore::new();
    let caller = "alice".to_string();

    let zero = find_or_create(
        &store,
        &caller,
        FindOrCreateRequest {
            turn_duration_ms: Some(0),
            ..Default::default()
        },
        Utc::now(),
    );
    assert!(matches!(zero, Err(GameError::InvalidConfig(_))));

    let huge = find_or_create(
        &store,
        &caller,
        FindOrCreateRequest {
            turn_duration_ms: Some(u64::MAX),
            ..Default::default()
        },
        Utc::now(),
    );
    assert!(matches!(huge, Err(GameError::InvalidConfig(_))));
    assert!(store.list_waiting().is_empty(), "nothing was created");
}

#[test]
fn test_max_turn_duration_accepted() {
    let store = SessionStore::new();
    let id = find_or_create(
        &store,
        &"alice".to_string(),
        FindOrCreateRequest {
            turn_duration_ms: Some(MAX_TURN_DURATION_MS),
            ..Default::default()
        },
        Utc::now(),
    )
    .expect("cap itself is valid");
    let session = store.get(&id).expect("session exists");
    assert_eq!(session.turn_duration_ms, Some(MAX_TURN_DURATION_MS));
}

#[test]
fn test_second_caller_joins_waiting_session() {
    let store = SessionStore::new();
    let now = Utc::now();
    let created = find_or_create(&store, &"alice".to_string(), FindOrCreateRequest::default(), now)
        .expect("create");
    let matched = find_or_create(&store, &"bob".to_string(), FindOrCreateRequest::default(), now)
        .expect("match");

    assert_eq!(created, matched, "bob lands in alice's session");
    let session = store.get(&created).expect("session exists");
    assert_eq!(session.status, SessionStatus::Playing);
    assert_eq!(session.slot_b.as_deref(), Some("bob"));
}

#[test]
fn test_caller_never_matches_own_waiting_session() {
    let store = SessionStore::new();
    let now = Utc::now();
    let caller = "alice".to_string();
    let first = find_or_create(&store, &caller, FindOrCreateRequest::default(), now).expect("create");
    let second = find_or_create(&store, &caller, FindOrCreateRequest::default(), now).expect("create");

    assert_ne!(first, second, "a caller cannot fill their own slot B");
    assert_eq!(store.list_waiting().len(), 2);
}

#[test]
fn test_config_must_match_exactly() {
    let store = SessionStore::new();
    let now = Utc::now();
    let waiting = find_or_create(
        &store,
        &"alice".to_string(),
        request(Some(4), Some(3), None),
        now,
    )
    .expect("create");

    let other = find_or_create(
        &store,
        &"bob".to_string(),
        request(Some(4), Some(4), None),
        now,
    )
    .expect("create");

    assert_ne!(waiting, other, "no cross-config matching");
    let formats = find_or_create(
        &store,
        &"carol".to_string(),
        request(Some(4), Some(3), Some(MatchFormat::Bo3)),
        now,
    )
    .expect("create");
    assert_ne!(waiting, formats, "format is part of the key");
}

#[test]
fn test_oldest_waiting_session_matched_first() {
    let store = SessionStore::new();
    let now = Utc::now();
    let caller = "alice".to_string();
    // Same creator twice: two waiting sessions with identical config.
    let oldest = find_or_create(&store, &caller, FindOrCreateRequest::default(), now).expect("first");
    let newer = find_or_create(&store, &caller, FindOrCreateRequest::default(), now).expect("second");

    let matched = find_or_create(&store, &"bob".to_string(), FindOrCreateRequest::default(), now)
        .expect("match");
    assert_eq!(matched, oldest, "FIFO by creation order");
    assert_ne!(matched, newer);
}

#[test]
fn test_turn_timer_carried_onto_created_session() {
    let store = SessionStore::new();
    let id = find_or_create(
        &store,
        &"alice".to_string(),
        FindOrCreateRequest {
            turn_duration_ms: Some(30_000),
            ..Default::default()
        },
        Utc::now(),
    )
    .expect("create");

    let session = store.get(&id).expect("session exists");
    assert_eq!(session.turn_duration_ms, Some(30_000));
    assert_eq!(session.turn_deadline, None, "timer idle until play starts");
}
