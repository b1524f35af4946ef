//! XDR data structures of the `MOUNT` version 3 protocol (RFC 1813
//! Appendix I).
//!
//! `MOUNT` is how an NFS client obtains the initial file handle of an
//! export. On this server the kernel client sends the export path
//! `/<fsid>`, and the MNT reply carries back the encoded root handle of
//! the volume registered under that identifier.

// Keep original RFC naming conventions for consistency with the specification
#![allow(non_camel_case_types)]

use std::io::{Read, Write};

use num_derive::{FromPrimitive, ToPrimitive};

use super::*;

/// MOUNT program number for RPC.
pub const PROGRAM: u32 = 100005;
/// MOUNT protocol version 3.
pub const VERSION: u32 = 3;

/// Maximum bytes in a V3 file handle.
pub const FHSIZE3: u32 = 64;

/// File handle for NFS version 3.
pub type fhandle3 = Vec<u8>;
/// Directory path on the server.
pub type dirpath = Vec<u8>;

/// Status codes returned by `MOUNT` protocol operations.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, FromPrimitive, ToPrimitive)]
#[repr(u32)]
pub enum mountstat3 {
    /// No error
    #[default]
    MNT3_OK = 0,
    /// Not owner
    MNT3ERR_PERM = 1,
    /// No such file or directory
    MNT3ERR_NOENT = 2,
    /// I/O error
    MNT3ERR_IO = 5,
    /// Permission denied
    MNT3ERR_ACCES = 13,
    /// Not a directory
    MNT3ERR_NOTDIR = 20,
    /// Invalid argument
    MNT3ERR_INVAL = 22,
    /// Filename too long
    MNT3ERR_NAMETOOLONG = 63,
    /// Operation not supported
    MNT3ERR_NOTSUPP = 10004,
    /// A failure on the server
    MNT3ERR_SERVERFAULT = 10006,
}
impl SerializeEnum for mountstat3 {}
impl DeserializeEnum for mountstat3 {}

/// Successful response to a MNT request.
#[derive(Clone, Debug, Default)]
pub struct mountres3_ok {
    /// File handle of the mounted directory (same bytes as an `nfs_fh3`)
    pub fhandle: fhandle3,
    /// Authentication flavors the server accepts for this export
    pub auth_flavors: Vec<u32>,
}
DeserializeStruct!(mountres3_ok, fhandle, auth_flavors);
SerializeStruct!(mountres3_ok, fhandle, auth_flavors);

/// Procedure numbers of the `MOUNT` version 3 protocol.
#[allow(clippy::upper_case_acronyms)]
#[derive(Copy, Clone, Debug, FromPrimitive, ToPrimitive)]
pub enum MountProcedure {
    /// Null procedure for service availability testing
    MOUNTPROC3_NULL = 0,
    /// Mount a file system
    MOUNTPROC3_MNT = 1,
    /// Get list of mounted file systems
    MOUNTPROC3_DUMP = 2,
    /// Unmount a file system
    MOUNTPROC3_UMNT = 3,
    /// Unmount all file systems
    MOUNTPROC3_UMNTALL = 4,
    /// Get list of exported file systems
    MOUNTPROC3_EXPORT = 5,
    /// Invalid procedure number
    INVALID,
}
impl SerializeEnum for MountProcedure {}
impl DeserializeEnum for MountProcedure {}
