//! Mount/unmount orchestration: attaching registered volumes to the OS.
//!
//! Mounting a volume is a three-step sequence: register the backend in the
//! [`Registry`], encode its root file handle, and issue the OS mount
//! syscall pointing the kernel's NFS client at the loopback server. The
//! parameter block is fixed for every volume apart from the identifier and
//! port: NFS version 3 over TCP, bounded read/write/readdir transfer sizes,
//! a 60-second initial timeout, and flags that disable locking, quota,
//! execute permission, ownership checks, and access-time updates.
//!
//! Both syscalls block and must be issued from a control thread, never from
//! the dispatch loop's execution context; stalling the loop stalls every
//! mounted volume at once.

use std::io;
use std::net::{Ipv4Addr, SocketAddrV4};
use std::sync::Arc;

use tracing::{debug, warn};

use crate::handle::Handle;
use crate::registry::Registry;
use crate::vfs::{FsId, Volume};

/// Hostname label prefix shown by the OS for each mounted volume. The full
/// label is `loopmount-<fsid>` and is display-only.
pub const HOST_LABEL_PREFIX: &str = "loopmount";

/// Maximum bytes per READ request negotiated with the kernel client.
pub const READ_MAX_LEN: u32 = 64 * 1024;
/// Maximum bytes per WRITE request negotiated with the kernel client.
pub const WRITE_MAX_LEN: u32 = 64 * 1024;
/// Maximum bytes per READDIR request negotiated with the kernel client.
pub const DIR_MAX_LEN: u32 = 16 * 1024;
/// Initial request timeout, in tenths of a second.
pub const INITIAL_TIMEOUT_DECISECONDS: u32 = 600;

/// The NFS mount parameter block for one volume.
///
/// Everything the OS mount syscall needs, in portable form; the platform
/// layer translates it into the native argument structure or option
/// string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountParams {
    /// Identifier of the volume being attached.
    pub fsid: FsId,
    /// Loopback address of the NFS server.
    pub server_addr: SocketAddrV4,
    /// Encoded root file handle handed to the kernel as the mount
    /// filehandle.
    pub root_handle: Vec<u8>,
    /// Display-only hostname label, `loopmount-<fsid>`.
    pub hostname: String,
    /// Maximum READ transfer size in bytes.
    pub read_size: u32,
    /// Maximum WRITE transfer size in bytes.
    pub write_size: u32,
    /// Maximum READDIR transfer size in bytes.
    pub readdir_size: u32,
    /// Initial timeout in tenths of a second.
    pub timeout_deciseconds: u32,
}

impl MountParams {
    /// Builds the parameter block for volume `fsid` served on `nfs_port`.
    pub fn for_volume(fsid: FsId, nfs_port: u16) -> MountParams {
        MountParams {
            fsid,
            server_addr: SocketAddrV4::new(Ipv4Addr::LOCALHOST, nfs_port),
            root_handle: Handle::root(fsid).encode(),
            hostname: format!("{HOST_LABEL_PREFIX}-{fsid}"),
            read_size: READ_MAX_LEN,
            write_size: WRITE_MAX_LEN,
            readdir_size: DIR_MAX_LEN,
            timeout_deciseconds: INITIAL_TIMEOUT_DECISECONDS,
        }
    }
}

/// Registers `volume` and attaches it at its mountpoint.
///
/// `nfs_port` is the port returned by the server's bind step. On syscall
/// failure the OS error is returned and the registry entry is left in
/// place, so the volume can still be inspected or unmounted; failed mounts
/// are never retried here.
pub fn mount(registry: &Registry, volume: Arc<dyn Volume>, nfs_port: u16) -> io::Result<()> {
    let mountpoint = volume.mountpoint().to_path_buf();
    let id = registry.put(volume)?;
    let params = MountParams::for_volume(id, nfs_port);
    debug!("mounting volume {} at {}", id, mountpoint.display());
    if let Err(err) = sys::mount_nfs(&mountpoint, &params) {
        warn!("mount of volume {} at {} failed: {}", id, mountpoint.display(), err);
        return Err(err);
    }
    Ok(())
}

/// Detaches `volume` from its mountpoint and deregisters it.
///
/// The unmount is forced. On syscall failure the OS error is returned and
/// the registry entry is left untouched - the mount is presumed still
/// active. The shared server loop keeps running either way; it is torn down
/// only at process-wide shutdown.
pub fn unmount(registry: &Registry, volume: &dyn Volume) -> io::Result<()> {
    let mountpoint = volume.mountpoint();
    debug!("unmounting volume {} at {}", volume.identifier(), mountpoint.display());
    sys::unmount_forced(mountpoint)?;
    registry.remove(volume.identifier());
    Ok(())
}

#[cfg(target_os = "macos")]
mod sys {
    //! BSD mount(2) with the raw `nfs_args` structure, the way the macOS
    //! NFS client is driven when no mount helper is involved. The argument
    //! layout and the flag values below are stable across BSD systems but
    //! hidden behind private ifdefs in the system headers, so they are
    //! spelled out here.

    use std::ffi::CString;
    use std::io;
    use std::os::unix::ffi::OsStrExt;
    use std::path::Path;

    use libc::{c_char, c_int, c_void, sockaddr, sockaddr_in};

    use super::MountParams;

    const NFSMNT_WSIZE: c_int = 0x0000_0002;
    const NFSMNT_RSIZE: c_int = 0x0000_0004;
    const NFSMNT_TIMEO: c_int = 0x0000_0008;
    const NFSMNT_INT: c_int = 0x0000_0040;
    const NFSMNT_NFSV3: c_int = 0x0000_0200;
    const NFSMNT_READDIRSIZE: c_int = 0x0002_0000;
    const NFSMNT_NOLOCKS: c_int = 0x0004_0000;
    const NFSMNT_NOQUOTA: c_int = 0x0800_0000;

    const MNT_NOEXEC: c_int = 0x0000_0004;
    const MNT_LOCAL: c_int = 0x0000_1000;
    const MNT_FORCE: c_int = 0x0008_0000;
    const MNT_IGNORE_OWNERSHIP: c_int = 0x0020_0000;
    const MNT_NOUSERXATTR: c_int = 0x0100_0000;
    const MNT_NOATIME: c_int = 0x1000_0000;

    /// `struct nfs_args`, version 3 layout.
    #[repr(C)]
    struct nfs_args3 {
        version: c_int,
        addr: *mut sockaddr,
        addrlen: c_int,
        sotype: c_int,
        proto: c_int,
        fh: *mut u8,
        fhsize: c_int,
        flags: c_int,
        wsize: c_int,
        rsize: c_int,
        readdirsize: c_int,
        timeo: c_int,
        retrans: c_int,
        maxgrouplist: c_int,
        readahead: c_int,
        leaseterm: c_int,
        deadthresh: c_int,
        hostname: *mut c_char,
    }

    fn path_cstring(path: &Path) -> io::Result<CString> {
        CString::new(path.as_os_str().as_bytes())
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "path contains NUL"))
    }

    pub fn mount_nfs(mountpoint: &Path, params: &MountParams) -> io::Result<()> {
        let mountpoint = path_cstring(mountpoint)?;
        let hostname = CString::new(params.hostname.clone())
            .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, "hostname contains NUL"))?;
        let handle = params.root_handle.clone();

        let mut addr: sockaddr_in = unsafe { std::mem::zeroed() };
        addr.sin_len = std::mem::size_of::<sockaddr_in>() as u8;
        addr.sin_family = libc::AF_INET as u8;
        addr.sin_port = params.server_addr.port().to_be();
        addr.sin_addr.s_addr = u32::from(*params.server_addr.ip()).to_be();

        let args = nfs_args3 {
            // nfs_args structure revision, not the protocol version
            version: 3,
            addr: &mut addr as *mut sockaddr_in as *mut sockaddr,
            addrlen: std::mem::size_of::<sockaddr_in>() as c_int,
            sotype: libc::SOCK_STREAM,
            proto: libc::IPPROTO_TCP,
            fh: handle.as_ptr() as *mut u8,
            fhsize: handle.len() as c_int,
            flags: NFSMNT_NFSV3
                | NFSMNT_INT
                | NFSMNT_WSIZE
                | NFSMNT_RSIZE
                | NFSMNT_READDIRSIZE
                | NFSMNT_TIMEO
                | NFSMNT_NOLOCKS
                | NFSMNT_NOQUOTA,
            wsize: params.write_size as c_int,
            rsize: params.read_size as c_int,
            readdirsize: params.readdir_size as c_int,
            timeo: params.timeout_deciseconds as c_int,
            retrans: 0,
            maxgrouplist: 0,
            readahead: 0,
            leaseterm: 0,
            deadthresh: 0,
            hostname: hostname.as_ptr() as *mut c_char,
        };

        let flags =
            MNT_NOATIME | MNT_NOUSERXATTR | MNT_IGNORE_OWNERSHIP | MNT_NOEXEC | MNT_LOCAL;
        let rc = unsafe {
            libc::mount(
                c"nfs".as_ptr(),
                mountpoint.as_ptr(),
                flags,
                &args as *const nfs_args3 as *mut c_void,
            )
        };
        if rc != 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }

    pub fn unmount_forced(mountpoint: &Path) -> io::Result<()> {
        let mountpoint = path_cstring(mountpoint)?;
        let rc = unsafe { libc::unmount(mountpoint.as_ptr(), MNT_FORCE) };
        if rc != 0 {
            return Err(io::Error::last_os_error());
        }
        Ok(())
    }
}

#[cfg(target_os = "linux")]
mod sys {
    //! Linux NFS mounts take string options instead of a raw argument
    //! structure, and the kernel fetches the root handle itself by calling
    //! the MOUNT program on `mountport`. The source path `127.0.0.1:/<fsid>`
    //! is what the kernel sends as the MNT dirpath, which the built-in
    //! MOUNT program resolves back to the volume's root handle.

    use std::io;
    use std::path::Path;

    use nix::mount::{MntFlags, MsFlags};

    use super::MountParams;

    pub fn mount_nfs(mountpoint: &Path, params: &MountParams) -> io::Result<()> {
        let source = format!("{}:/{}", params.server_addr.ip(), params.fsid);
        let port = params.server_addr.port();
        let data = format!(
            "vers=3,proto=tcp,port={port},mountport={port},mountproto=tcp,\
             nolock,timeo={timeo},rsize={rsize},wsize={wsize},nordirplus",
            timeo = params.timeout_deciseconds,
            rsize = params.read_size,
            wsize = params.write_size,
        );
        let flags =
            MsFlags::MS_NOATIME | MsFlags::MS_NOEXEC | MsFlags::MS_NOSUID | MsFlags::MS_NODEV;
        nix::mount::mount(
            Some(source.as_str()),
            mountpoint,
            Some("nfs"),
            flags,
            Some(data.as_str()),
        )
        .map_err(io::Error::from)
    }

    pub fn unmount_forced(mountpoint: &Path) -> io::Result<()> {
        nix::mount::umount2(mountpoint, MntFlags::MNT_FORCE).map_err(io::Error::from)
    }
}

#[cfg(not(any(target_os = "macos", target_os = "linux")))]
mod sys {
    use std::io;
    use std::path::Path;

    use super::MountParams;

    pub fn mount_nfs(_mountpoint: &Path, _params: &MountParams) -> io::Result<()> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "NFS loopback mounts are not supported on this platform",
        ))
    }

    pub fn unmount_forced(_mountpoint: &Path) -> io::Result<()> {
        Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "NFS loopback mounts are not supported on this platform",
        ))
    }
}
