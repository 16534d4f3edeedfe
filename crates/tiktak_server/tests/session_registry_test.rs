//! Tests for the session registry.

use std::sync::Arc;
use std::thread;
use tiktak_server::{SessionError, SessionRegistry};
use tiktak_tictactoe::{MoveError, Player, Square};

#[test]
fn test_create_session_initial_state() {
    let registry = SessionRegistry::new();
    assert!(registry.is_empty());

    let view = registry.create_session();
    assert_eq!(registry.len(), 1);
    assert_eq!(view.snapshot.current_player, Player::X);
    assert_eq!(view.snapshot.move_count, 0);
    assert!(!view.snapshot.game_over);
    assert_eq!(view.snapshot.available_moves.len(), 9);
    assert_eq!(view.metadata.created, view.metadata.last_accessed);
}

#[test]
fn test_session_ids_are_unique() {
    let registry = SessionRegistry::new();
    let mut ids: Vec<_> = (0..100).map(|_| registry.create_session().session_id).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 100);
    assert_eq!(registry.len(), 100);
}

#[test]
fn test_unknown_session_not_found() {
    let registry = SessionRegistry::new();
    registry.create_session();

    let never_created = "0b6c6a4e-2d2f-4f43-9d7a-6f4f1c2b3a99";
    assert!(matches!(
        registry.get_game(never_created),
        Err(SessionError::NotFound { .. })
    ));
    assert!(matches!(
        registry.state("not-a-uuid"),
        Err(SessionError::NotFound { .. })
    ));
    assert!(matches!(
        registry.make_move("", 0, 0),
        Err(SessionError::NotFound { .. })
    ));
    assert_eq!(
        registry.get_game("nope").unwrap_err().to_string(),
        "Invalid session_id"
    );
}

#[test]
fn test_get_game_returns_live_game() {
    let registry = SessionRegistry::new();
    let id = registry.create_session().session_id.to_string();

    let handle = registry.get_game(&id).unwrap();
    handle.lock().make_move(1, 1).unwrap();

    let again = registry.get_game(&id).unwrap();
    assert_eq!(
        again.lock().board().get(1, 1),
        Some(Square::Occupied(Player::X))
    );
    assert_eq!(registry.state(&id).unwrap().snapshot.move_count, 1);
}

#[test]
fn test_lookup_updates_last_accessed() {
    let registry = SessionRegistry::new();
    let view = registry.create_session();
    let id = view.session_id.to_string();

    thread::sleep(std::time::Duration::from_millis(5));
    registry.get_game(&id).unwrap();
    let after_get = registry.metadata(&id).unwrap();
    assert!(after_get.last_accessed > view.metadata.last_accessed);
    assert_eq!(after_get.created, view.metadata.created);

    thread::sleep(std::time::Duration::from_millis(5));
    let state = registry.state(&id).unwrap();
    assert!(state.metadata.last_accessed > after_get.last_accessed);

    // Reading metadata alone is not an access.
    let peek = registry.metadata(&id).unwrap();
    assert_eq!(peek.last_accessed, state.metadata.last_accessed);

    thread::sleep(std::time::Duration::from_millis(5));
    registry.make_move(&id, 1, 1).unwrap();
    let after_move = registry.metadata(&id).unwrap();
    assert!(after_move.last_accessed > peek.last_accessed);
    assert_eq!(after_move.created, view.metadata.created);
}

#[test]
fn test_only_canonical_session_id_resolves() {
    let registry = SessionRegistry::new();
    let id = registry.create_session().session_id.to_string();
    assert!(registry.state(&id).is_ok());

    let variants = [
        id.to_uppercase(),
        format!("urn:uuid:{id}"),
        format!("{{{id}}}"),
        format!("  {id}\n"),
        id.replace('-', ""),
    ];
    for variant in &variants {
        assert!(
            matches!(registry.state(variant), Err(SessionError::NotFound { .. })),
            "{variant:?} should not resolve"
        );
        assert!(registry.make_move(variant, 0, 0).is_err());
    }
    assert_eq!(registry.state(&id).unwrap().snapshot.move_count, 0);
}

#[test]
fn test_make_move_reports_rejections() {
    let registry = SessionRegistry::new();
    let id = registry.create_session().session_id.to_string();

    let first = registry.make_move(&id, 0, 0).unwrap();
    assert!(first.move_result.success);

    let second = registry.make_move(&id, 0, 0).unwrap();
    assert!(!second.move_result.success);
    assert_eq!(second.move_result.error, Some(MoveError::InvalidMove));
    assert_eq!(second.snapshot, first.snapshot);
}

#[test]
fn test_session_isolation() {
    let registry = SessionRegistry::new();
    let a = registry.create_session().session_id.to_string();
    let b = registry.create_session().session_id.to_string();
    let b_before = registry.state(&b).unwrap().snapshot;

    for (r, c) in [(0, 0), (1, 1), (2, 2)] {
        registry.make_move(&a, r, c).unwrap();
    }

    let b_after = registry.state(&b).unwrap().snapshot;
    assert_eq!(b_after, b_before);
    assert_eq!(registry.state(&a).unwrap().snapshot.move_count, 3);
}

#[test]
fn test_list_sessions_summaries() {
    let registry = SessionRegistry::new();
    let a = registry.create_session().session_id;
    let b = registry.create_session().session_id;

    for (r, c) in [(0, 0), (1, 0), (0, 1), (1, 1), (0, 2)] {
        registry.make_move(&a.to_string(), r, c).unwrap();
    }
    registry.make_move(&b.to_string(), 2, 2).unwrap();

    let sessions = registry.list_sessions();
    assert_eq!(sessions.len(), 2);

    let won = &sessions[&a];
    assert!(won.game_over);
    assert_eq!(won.winner, Some(Player::X));
    assert_eq!(won.move_count, 5);

    let ongoing = &sessions[&b];
    assert!(!ongoing.game_over);
    assert_eq!(ongoing.current_player, Player::O);
    assert_eq!(ongoing.winner, None);

    let keys: Vec<_> = sessions.keys().copied().collect();
    let mut sorted = keys.clone();
    sorted.sort();
    assert_eq!(keys, sorted);
}

#[test]
fn test_registries_are_independent() {
    let first = SessionRegistry::new();
    let second = SessionRegistry::new();
    let id = first.create_session().session_id.to_string();

    assert!(second.get_game(&id).is_err());
    assert_eq!(second.len(), 0);

    // Clones share sessions.
    let shared = first.clone();
    assert!(shared.get_game(&id).is_ok());
}

#[test]
fn test_concurrent_moves_on_one_session_are_serialized() {
    for _ in 0..20 {
        let registry = Arc::new(SessionRegistry::new());
        let id = registry.create_session().session_id.to_string();

        let handles: Vec<_> = (0..9)
            .map(|cell| {
                let registry = Arc::clone(&registry);
                let id = id.clone();
                thread::spawn(move || {
                    let (r, c) = (cell / 3, cell % 3);
                    registry.make_move(&id, r, c).unwrap().move_result.success
                })
            })
            .collect();
        let accepted = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();

        let snapshot = registry.state(&id).unwrap().snapshot;
        assert_eq!(usize::from(snapshot.move_count), accepted);

        let flat: Vec<Square> = snapshot.board.iter().flatten().copied().collect();
        let x = flat.iter().filter(|s| **s == Square::Occupied(Player::X)).count();
        let o = flat.iter().filter(|s| **s == Square::Occupied(Player::O)).count();
        assert!(x == o || x == o + 1, "x={x} o={o}");
        assert_eq!(x + o, accepted);
        if accepted < 9 {
            assert!(snapshot.game_over);
        }
    }
}

#[test]
fn test_concurrent_sessions_progress_independently() {
    let registry = Arc::new(SessionRegistry::new());
    let handles: Vec<_> = (0..8)
        .map(|_| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                let id = registry.create_session().session_id.to_string();
                for (r, c) in [(0, 0), (1, 1), (0, 1), (2, 2), (0, 2)] {
                    registry.make_move(&id, r, c).unwrap();
                }
                id
            })
        })
        .collect();

    for handle in handles {
        let id = handle.join().unwrap();
        let snapshot = registry.state(&id).unwrap().snapshot;
        assert_eq!(snapshot.winner, Some(Player::X));
        assert_eq!(snapshot.move_count, 5);
    }
    assert_eq!(registry.len(), 8);
}
