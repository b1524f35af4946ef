use std::sync::Arc;

mod support;

use loopmount::handle::{self, Handle};
use loopmount::Registry;

use support::DemoVolume;

#[test]
fn encode_parse_round_trip() {
    for fsid in [0u64, 1, 42, u64::MAX] {
        let root = Handle::root(fsid);
        assert_eq!(Handle::parse(&root.encode()), Some(root));

        for file in [0u32, 7, u32::MAX] {
            let handle = Handle::file(fsid, file);
            assert_eq!(Handle::parse(&handle.encode()), Some(handle));
        }
    }
}

#[test]
fn encoding_is_decimal_text() {
    assert_eq!(Handle::root(3).encode(), b"3");
    assert_eq!(Handle::file(3, 9).encode(), b"3:9");
}

#[test]
fn parse_rejects_malformed_handles() {
    assert_eq!(Handle::parse(b""), None);
    assert_eq!(Handle::parse(b":"), None);
    assert_eq!(Handle::parse(b":7"), None);
    assert_eq!(Handle::parse(b"3:"), None);
    assert_eq!(Handle::parse(b"abc"), None);
    assert_eq!(Handle::parse(b"3:abc"), None);
    assert_eq!(Handle::parse(b"-1"), None);
    assert_eq!(Handle::parse(b"3:-1"), None);
    assert_eq!(Handle::parse(b"\xff\xfe"), None);
}

#[test]
fn root_is_never_read_as_file_id_zero() {
    let parsed = Handle::parse(b"5").expect("root handle");
    assert_eq!(parsed.file, None);

    let parsed = Handle::parse(b"5:0").expect("file handle");
    assert_eq!(parsed.file, Some(0));
}

#[test]
fn resolve_unknown_filesystem_is_not_found() {
    let registry = Registry::new();
    assert!(handle::resolve(&registry, b"42").is_none());
    assert!(handle::resolve(&registry, b"42:7").is_none());
    assert!(handle::resolve(&registry, b"").is_none());
    assert!(handle::resolve(&registry, b"junk").is_none());
}

#[test]
fn resolve_root_handle_of_registered_volume() {
    let registry = Registry::new();
    registry.put(Arc::new(DemoVolume::new(42, "/mnt/answers"))).expect("put");

    let resolved = handle::resolve(&registry, b"42").expect("registered volume");
    assert_eq!(resolved.handle, Handle::root(42));
    assert_eq!(resolved.volume.identifier(), 42);
    assert_eq!(resolved.path, None);
    assert_eq!(resolved.object_path(), Some("/"));
}

#[test]
fn resolve_file_handle_consults_reverse_lookup() {
    let registry = Registry::new();
    registry.put(Arc::new(DemoVolume::new(42, "/mnt/answers"))).expect("put");

    let resolved = handle::resolve(&registry, b"42:9").expect("registered volume");
    assert_eq!(resolved.handle, Handle::file(42, 9));
    assert_eq!(resolved.object_path(), Some("/docs/report.txt"));

    // live volume, dead file id: the entry resolves but the path is gone
    let resolved = handle::resolve(&registry, b"42:77").expect("registered volume");
    assert_eq!(resolved.path, None);
    assert_eq!(resolved.object_path(), None);
}

/// The lifecycle a mounted volume goes through: handles resolve while the
/// volume is registered and stop resolving after it is removed.
#[test]
fn handles_stop_resolving_after_unregistration() {
    let registry = Registry::new();
    registry.put(Arc::new(DemoVolume::new(3, "/mnt/x"))).expect("put");

    let root = handle::resolve(&registry, b"3").expect("mounted");
    assert_eq!(root.object_path(), Some("/"));
    let file = handle::resolve(&registry, b"3:9").expect("mounted");
    assert_eq!(file.object_path(), Some("/docs/report.txt"));

    registry.remove(3);
    assert!(handle::resolve(&registry, b"3").is_none());
    assert!(handle::resolve(&registry, b"3:9").is_none());
}
