use std::sync::Arc;
use std::thread;

mod support;

use loopmount::registry::{Registry, MAX_VOLUMES};

use support::DemoVolume;

#[test]
fn put_get_remove_round_trip() {
    let registry = Registry::new();
    let volume = Arc::new(DemoVolume::new(3, "/mnt/demo"));

    let id = registry.put(volume).expect("put");
    assert_eq!(id, 3);

    let found = registry.get(3).expect("registered volume");
    assert_eq!(found.identifier(), 3);

    registry.remove(3);
    assert!(registry.get(3).is_none());
}

#[test]
fn remove_absent_identifier_is_a_noop() {
    let registry = Registry::new();
    registry.put(Arc::new(DemoVolume::new(7, "/mnt/seven"))).expect("put");

    registry.remove(8);
    registry.remove(8);
    registry.remove(u64::MAX);

    assert!(registry.get(7).is_some());
    assert!(registry.get(8).is_none());
}

#[test]
fn get_is_bounds_checked_against_wire_input() {
    let registry = Registry::new();
    registry.put(Arc::new(DemoVolume::new(0, "/mnt/zero"))).expect("put");

    assert!(registry.get(MAX_VOLUMES as u64).is_none());
    assert!(registry.get(MAX_VOLUMES as u64 + 1).is_none());
    assert!(registry.get(u64::MAX).is_none());
    assert!(registry.get(0).is_some());
}

#[test]
fn put_rejects_identifier_outside_index_space() {
    let registry = Registry::new();
    let err = registry
        .put(Arc::new(DemoVolume::new(MAX_VOLUMES as u64, "/mnt/too-big")))
        .expect_err("identifier out of range");
    assert_eq!(err.kind(), std::io::ErrorKind::InvalidInput);
    assert!(registry.get(MAX_VOLUMES as u64).is_none());
}

#[test]
fn put_silently_replaces_an_existing_entry() {
    let registry = Registry::new();
    registry.put(Arc::new(DemoVolume::new(4, "/mnt/first"))).expect("put");
    registry.put(Arc::new(DemoVolume::new(4, "/mnt/second"))).expect("put");

    let found = registry.get(4).expect("registered volume");
    assert_eq!(found.mountpoint(), std::path::Path::new("/mnt/second"));
}

#[test]
fn snapshot_lists_volumes_in_identifier_order() {
    let registry = Registry::new();
    registry.put(Arc::new(DemoVolume::new(9, "/mnt/nine"))).expect("put");
    registry.put(Arc::new(DemoVolume::new(2, "/mnt/two"))).expect("put");

    let ids: Vec<u64> = registry.snapshot().iter().map(|v| v.identifier()).collect();
    assert_eq!(ids, vec![2, 9]);
}

/// Interleaves put/remove on one identifier with constant gets on it and
/// on hostile identifiers from another thread. Every observed entry must
/// be fully formed and out-of-range lookups must stay `None` throughout.
#[test]
fn concurrent_get_with_put_and_remove() {
    let registry = Arc::new(Registry::new());
    registry.put(Arc::new(DemoVolume::new(1, "/mnt/keep"))).expect("put");

    let writer = {
        let registry = registry.clone();
        thread::spawn(move || {
            for _ in 0..1000 {
                registry.put(Arc::new(DemoVolume::new(7, "/mnt/churn"))).expect("put");
                registry.remove(7);
            }
        })
    };

    let reader = {
        let registry = registry.clone();
        thread::spawn(move || {
            for _ in 0..1000 {
                if let Some(volume) = registry.get(7) {
                    assert_eq!(volume.identifier(), 7);
                    assert_eq!(volume.mountpoint(), std::path::Path::new("/mnt/churn"));
                }
                assert!(registry.get(u64::MAX).is_none());
                assert!(registry.get(MAX_VOLUMES as u64).is_none());
                assert_eq!(registry.get(1).expect("stable entry").identifier(), 1);
            }
        })
    };

    writer.join().expect("writer thread");
    reader.join().expect("reader thread");
}
