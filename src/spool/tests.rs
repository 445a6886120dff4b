use super::{QueueState, SpoolError, SpoolStore, is_valid_uid};
use chrono::Utc;
use tempfile::tempdir;

fn occupancy(store: &SpoolStore, uid: &str) -> Vec<&'static str> {
    let mut found = Vec::new();
    for state in [
        QueueState::Incoming,
        QueueState::InFlight,
        QueueState::RetryPending,
    ] {
        if store.list(state).unwrap().iter().any(|u| u == uid) {
            found.push(state.dir_name());
        }
    }
    if store
        .list_completed(Utc::now().date_naive())
        .unwrap()
        .iter()
        .any(|u| u == uid)
    {
        found.push("done");
    }
    found
}

#[test]
fn test_open_creates_state_directories() {
    let dir = tempdir().unwrap();
    let store = SpoolStore::open(dir.path()).unwrap();

    for name in ["in", "wip", "retry", "done"] {
        assert!(store.base().join(name).is_dir(), "missing {name}");
    }
}

#[test]
fn test_put_lands_in_exactly_one_state() {
    let dir = tempdir().unwrap();
    let store = SpoolStore::open(dir.path()).unwrap();

    store.put(QueueState::Incoming, "u1", b"{}").unwrap();
    assert_eq!(occupancy(&store, "u1"), vec!["in"]);
}

#[test]
fn test_record_occupies_one_state_across_lifecycle() {
    let dir = tempdir().unwrap();
    let store = SpoolStore::open(dir.path()).unwrap();

    store.put(QueueState::Incoming, "u1", b"{}").unwrap();
    store
        .relocate(QueueState::Incoming, "u1", QueueState::InFlight)
        .unwrap();
    assert_eq!(occupancy(&store, "u1"), vec!["wip"]);

    store
        .relocate(QueueState::InFlight, "u1", QueueState::RetryPending)
        .unwrap();
    assert_eq!(occupancy(&store, "u1"), vec!["retry"]);

    store
        .relocate(QueueState::RetryPending, "u1", QueueState::InFlight)
        .unwrap();
    store.complete("u1", Utc::now().date_naive()).unwrap();
    assert_eq!(occupancy(&store, "u1"), vec!["done"]);
}

#[test]
fn test_relocate_missing_record_fails_without_side_effects() {
    let dir = tempdir().unwrap();
    let store = SpoolStore::open(dir.path()).unwrap();

    let result = store.relocate(QueueState::Incoming, "ghost", QueueState::InFlight);
    assert!(matches!(result, Err(SpoolError::Io { .. })));
    assert!(occupancy(&store, "ghost").is_empty());
}

#[test]
fn test_read_if_resident_sees_only_the_expected_state() {
    let dir = tempdir().unwrap();
    let store = SpoolStore::open(dir.path()).unwrap();

    store.put(QueueState::Incoming, "u1", b"hello").unwrap();
    assert_eq!(
        store.read_if_resident(QueueState::Incoming, "u1").unwrap(),
        Some(b"hello".to_vec())
    );
    assert_eq!(store.read_if_resident(QueueState::InFlight, "u1").unwrap(), None);

    store
        .relocate(QueueState::Incoming, "u1", QueueState::InFlight)
        .unwrap();
    assert_eq!(store.read_if_resident(QueueState::Incoming, "u1").unwrap(), None);
}

#[test]
fn test_sweep_moves_everything_and_reports_count() {
    let dir = tempdir().unwrap();
    let store = SpoolStore::open(dir.path()).unwrap();

    for i in 0..5 {
        store
            .put(QueueState::RetryPending, &format!("u{i}"), b"{}")
            .unwrap();
    }

    let moved = store
        .sweep(QueueState::RetryPending, QueueState::InFlight)
        .unwrap();
    assert_eq!(moved, 5);
    assert!(store.list(QueueState::RetryPending).unwrap().is_empty());
    assert_eq!(store.list(QueueState::InFlight).unwrap().len(), 5);
}

#[test]
fn test_completed_records_share_the_dated_bucket_unchanged() {
    let dir = tempdir().unwrap();
    let store = SpoolStore::open(dir.path()).unwrap();
    let today = Utc::now().date_naive();

    store.put(QueueState::InFlight, "u1", b"first").unwrap();
    store.put(QueueState::InFlight, "u2", b"second").unwrap();
    store.complete("u1", today).unwrap();
    store.complete("u2", today).unwrap();

    let mut done = store.list_completed(today).unwrap();
    done.sort();
    assert_eq!(done, vec!["u1", "u2"]);

    let bucket = store.base().join("done").join(today.format("%Y-%m-%d").to_string());
    assert_eq!(std::fs::read(bucket.join("u1")).unwrap(), b"first");
    assert_eq!(std::fs::read(bucket.join("u2")).unwrap(), b"second");
}

#[test]
fn test_put_rejects_unsafe_uids() {
    let dir = tempdir().unwrap();
    let store = SpoolStore::open(dir.path()).unwrap();

    for uid in ["", "..", "a/b", "../escape", "a b"] {
        assert!(
            matches!(
                store.put(QueueState::Incoming, uid, b"{}"),
                Err(SpoolError::InvalidUid(_))
            ),
            "uid {uid:?} should be rejected"
        );
    }
    assert!(store.list(QueueState::Incoming).unwrap().is_empty());
}

#[test]
fn test_uid_validation_rules() {
    assert!(is_valid_uid("1724854245.123456-0af3"));
    assert!(is_valid_uid("plain_uid"));
    assert!(!is_valid_uid("has/slash"));
    assert!(!is_valid_uid(&"x".repeat(129)));
}
