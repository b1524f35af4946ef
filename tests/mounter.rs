use std::net::{Ipv4Addr, SocketAddrV4};
use std::sync::Arc;

mod support;

use loopmount::mounter::{
    self, MountParams, DIR_MAX_LEN, INITIAL_TIMEOUT_DECISECONDS, READ_MAX_LEN, WRITE_MAX_LEN,
};
use loopmount::registry::MAX_VOLUMES;
use loopmount::Registry;

use support::DemoVolume;

#[test]
fn mount_params_carry_the_fixed_tuning_values() {
    let params = MountParams::for_volume(3, 2049);

    assert_eq!(params.fsid, 3);
    assert_eq!(params.server_addr, SocketAddrV4::new(Ipv4Addr::LOCALHOST, 2049));
    assert_eq!(params.root_handle, b"3");
    assert_eq!(params.hostname, "loopmount-3");
    assert_eq!(params.read_size, READ_MAX_LEN);
    assert_eq!(params.write_size, WRITE_MAX_LEN);
    assert_eq!(params.readdir_size, DIR_MAX_LEN);
    assert_eq!(params.timeout_deciseconds, INITIAL_TIMEOUT_DECISECONDS);
}

#[test]
fn mount_rejects_out_of_range_identifier_without_registering() {
    let registry = Registry::new();
    let volume = Arc::new(DemoVolume::new(MAX_VOLUMES as u64, "/mnt/too-big"));

    let err = mounter::mount(&registry, volume, 2049).expect_err("identifier out of range");
    assert_eq!(err.kind(), std::io::ErrorKind::InvalidInput);
    assert!(registry.get(MAX_VOLUMES as u64).is_none());
}

#[test]
fn failed_unmount_leaves_the_registry_entry_intact() {
    let registry = Registry::new();
    let volume = Arc::new(DemoVolume::new(5, "/loopmount-test/never-mounted"));
    registry.put(volume.clone()).expect("put");

    // nothing is mounted there, so the forced unmount syscall must fail
    mounter::unmount(&registry, volume.as_ref()).expect_err("unmount of unmounted path");

    let survivor = registry.get(5).expect("entry kept after failed unmount");
    assert_eq!(survivor.identifier(), 5);
}
