//! The Volume trait defines the contract between the loopback server core
//! and the file system backends it multiplexes.
//!
//! A backend becomes mountable by implementing [`Volume`]. The routing core
//! only depends on a small capability surface:
//!
//! - a stable, backend-declared numeric identifier used to route every NFS
//!   request that carries one of this backend's file handles
//! - the mountpoint path the OS should attach the export at
//! - a bidirectional mapping between backend-local file ids and paths
//!   (`reverse_lookup` / `file_id`), which is what the opaque handle codec
//!   smuggles across the wire
//! - the read-path file operations the built-in NFSv3 program handlers call
//!
//! Operations are addressed by path rather than by open file state: NFS is
//! stateless, and each request independently resolves its opaque handle to
//! a `(volume, path)` pair before dispatching here.

use std::path::Path;

use async_trait::async_trait;

use crate::contents::DirContents;
use crate::protocol::xdr::nfs3;

/// Identifier of a registered backend file system.
///
/// Supplied by the backend itself, unique among concurrently registered
/// volumes, and bounded by the registry's index space.
pub type FsId = u64;

/// Backend-local numeric file identifier (similar to an inode number).
///
/// File ids only have meaning within their own volume; the wire handle
/// pairs one with an [`FsId`] to make it globally routable.
pub type FileId = u32;

/// A user-space file system that can be attached as a local volume.
///
/// Paths passed to the operation callbacks are absolute within the volume
/// (`"/"` is the volume root, `"/docs/report.txt"` a file below it), in the
/// form produced by [`Volume::reverse_lookup`].
///
/// Errors are reported as NFS status codes, which the protocol layer sends
/// to the client verbatim; `getattr` should be cheap, the kernel calls it
/// constantly.
#[async_trait]
pub trait Volume: Send + Sync {
    /// The backend-declared identifier for this volume.
    ///
    /// Must stay constant for the lifetime of the volume and must fit the
    /// registry's index space (see [`crate::registry::MAX_VOLUMES`]).
    fn identifier(&self) -> FsId;

    /// The local path the OS attaches this volume at.
    fn mountpoint(&self) -> &Path;

    /// Maps a backend-local file id to its path, or `None` when the id does
    /// not name a live object (for example after the object was removed).
    fn reverse_lookup(&self, file: FileId) -> Option<String>;

    /// Maps a path to its backend-local file id. Inverse of
    /// [`Volume::reverse_lookup`]; `None` when no object exists at `path`.
    fn file_id(&self, path: &str) -> Option<FileId>;

    /// Returns the attributes of the object at `path`.
    ///
    /// The `fileid` field must agree with [`Volume::file_id`]; the `fsid`
    /// field is overwritten by the server with this volume's identifier.
    async fn getattr(&self, path: &str) -> Result<nfs3::fattr3, nfs3::nfsstat3>;

    /// Reads up to `count` bytes from the file at `path` starting at
    /// `offset`. The returned flag is true when the read reached the end of
    /// the file.
    async fn read(
        &self,
        path: &str,
        offset: u64,
        count: u32,
    ) -> Result<(Vec<u8>, bool), nfs3::nfsstat3>;

    /// Enumerates the directory at `path`, returning entry names (without
    /// path components) in a stable order.
    async fn readdir(&self, path: &str) -> Result<DirContents, nfs3::nfsstat3>;
}
