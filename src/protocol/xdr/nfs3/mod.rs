//! XDR data types and constants for NFS version 3, as defined in RFC 1813.
//!
//! Only the subset of the protocol this server answers is defined here:
//! the basic data types, file attributes, status codes, and the argument
//! and result structures of the read-path procedures. The write-path
//! procedures are refused without decoding their arguments, so their
//! argument structures are not needed.
//!
//! File handles (`nfs_fh3`) are opaque to the client; on this server their
//! contents are produced and consumed by the handle codec in
//! [`crate::handle`].

// Preserve original RFC naming conventions for consistency with the specification
#![allow(non_camel_case_types)]

use std::fmt;
use std::io::{Read, Write};

use num_derive::{FromPrimitive, ToPrimitive};

use super::{deserialize, Deserialize, Serialize};
use crate::{DeserializeBoolUnion, DeserializeStruct, SerializeBoolUnion, SerializeStruct};

pub mod dir;
pub mod file;
pub mod fs;

// Section 2.2 Constants
/// The RPC program number for NFS version 3 service.
pub const PROGRAM: u32 = 100003;
/// The version number for NFS version 3 protocol.
pub const VERSION: u32 = 3;

// Section 2.4 Sizes
/// The maximum size in bytes of the opaque file handle.
pub const NFS3_FHSIZE: u32 = 64;
/// The size in bytes of the opaque cookie verifier passed by READDIR.
pub const NFS3_COOKIEVERFSIZE: u32 = 8;

// Section 2.5 Basic Data Types

/// A byte string used in NFS for filenames and paths.
///
/// NFS treats names as uninterpreted bytes; this wrapper keeps them that
/// way on the wire while printing them lossily for diagnostics.
#[derive(Default, Clone, PartialEq, Eq)]
pub struct nfsstring(pub Vec<u8>);

impl nfsstring {
    /// Returns the length of the string in bytes.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns true if the string is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<Vec<u8>> for nfsstring {
    fn from(value: Vec<u8>) -> Self {
        Self(value)
    }
}

impl From<&[u8]> for nfsstring {
    fn from(value: &[u8]) -> Self {
        Self(value.into())
    }
}

impl From<&str> for nfsstring {
    fn from(value: &str) -> Self {
        Self(value.as_bytes().into())
    }
}

impl AsRef<[u8]> for nfsstring {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl std::ops::Deref for nfsstring {
    type Target = Vec<u8>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl fmt::Debug for nfsstring {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", String::from_utf8_lossy(&self.0))
    }
}

impl fmt::Display for nfsstring {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", String::from_utf8_lossy(&self.0))
    }
}

impl Serialize for nfsstring {
    fn serialize<W: Write>(&self, dest: &mut W) -> std::io::Result<()> {
        self.0.serialize(dest)
    }
}

impl Deserialize for nfsstring {
    fn deserialize<R: Read>(&mut self, src: &mut R) -> std::io::Result<()> {
        self.0.deserialize(src)
    }
}

/// Filename type as defined in RFC 1813 section 2.5: one component of a
/// pathname.
pub type filename3 = nfsstring;
/// Path type as defined in RFC 1813 section 2.5.
pub type nfspath3 = nfsstring;
/// File identifier: a unique number identifying a file within a
/// filesystem.
pub type fileid3 = u64;
/// Directory entry position cookie used in READDIR iteration.
pub type cookie3 = u64;
/// Cookie verifier used to detect when a directory being read has changed.
pub type cookieverf3 = [u8; NFS3_COOKIEVERFSIZE as usize];
/// File size in bytes.
pub type size3 = u64;
/// File offset in bytes.
pub type offset3 = u64;
/// File mode bits.
pub type mode3 = u32;
/// Count of bytes or entries.
pub type count3 = u32;
/// User ID.
pub type uid3 = u32;
/// Group ID.
pub type gid3 = u32;

/// Procedure numbers of the NFS version 3 protocol.
#[allow(clippy::upper_case_acronyms)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, FromPrimitive, ToPrimitive)]
pub enum NfsProcedure {
    /// Do nothing, used to ping the server
    NFSPROC3_NULL = 0,
    /// Get file attributes
    NFSPROC3_GETATTR = 1,
    /// Set file attributes
    NFSPROC3_SETATTR = 2,
    /// Look up filename
    NFSPROC3_LOOKUP = 3,
    /// Check file access permission
    NFSPROC3_ACCESS = 4,
    /// Read from symbolic link
    NFSPROC3_READLINK = 5,
    /// Read from file
    NFSPROC3_READ = 6,
    /// Write to file
    NFSPROC3_WRITE = 7,
    /// Create file
    NFSPROC3_CREATE = 8,
    /// Create directory
    NFSPROC3_MKDIR = 9,
    /// Create symbolic link
    NFSPROC3_SYMLINK = 10,
    /// Create special device
    NFSPROC3_MKNOD = 11,
    /// Remove file
    NFSPROC3_REMOVE = 12,
    /// Remove directory
    NFSPROC3_RMDIR = 13,
    /// Rename file or directory
    NFSPROC3_RENAME = 14,
    /// Create hard link
    NFSPROC3_LINK = 15,
    /// Read directory
    NFSPROC3_READDIR = 16,
    /// Extended read directory
    NFSPROC3_READDIRPLUS = 17,
    /// Get file system statistics
    NFSPROC3_FSSTAT = 18,
    /// Get file system information
    NFSPROC3_FSINFO = 19,
    /// Get path configuration
    NFSPROC3_PATHCONF = 20,
    /// Commit cached data
    NFSPROC3_COMMIT = 21,
    /// Invalid procedure
    INVALID = 22,
}

/// Status codes returned by NFS version 3 operations.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, FromPrimitive, ToPrimitive)]
#[repr(u32)]
pub enum nfsstat3 {
    /// The call completed successfully.
    #[default]
    NFS3_OK = 0,
    /// Not owner: the caller is neither privileged nor the owner of the
    /// target of the operation.
    NFS3ERR_PERM = 1,
    /// No such file or directory.
    NFS3ERR_NOENT = 2,
    /// A hard I/O error occurred while processing the operation.
    NFS3ERR_IO = 5,
    /// No such device or address.
    NFS3ERR_NXIO = 6,
    /// Permission denied.
    NFS3ERR_ACCES = 13,
    /// The file specified already exists.
    NFS3ERR_EXIST = 17,
    /// Attempt to do a cross-device hard link.
    NFS3ERR_XDEV = 18,
    /// No such device.
    NFS3ERR_NODEV = 19,
    /// The caller specified a non-directory in a directory operation.
    NFS3ERR_NOTDIR = 20,
    /// The caller specified a directory in a non-directory operation.
    NFS3ERR_ISDIR = 21,
    /// Invalid or unsupported argument.
    NFS3ERR_INVAL = 22,
    /// The operation would have grown a file beyond the server's limit.
    NFS3ERR_FBIG = 27,
    /// No space left on device.
    NFS3ERR_NOSPC = 28,
    /// A modifying operation was attempted on a read-only file system.
    NFS3ERR_ROFS = 30,
    /// Too many hard links.
    NFS3ERR_MLINK = 31,
    /// The filename in an operation was too long.
    NFS3ERR_NAMETOOLONG = 63,
    /// An attempt was made to remove a non-empty directory.
    NFS3ERR_NOTEMPTY = 66,
    /// Resource (quota) hard limit exceeded.
    NFS3ERR_DQUOT = 69,
    /// Invalid file handle: the object it names no longer exists or access
    /// to it has been revoked.
    NFS3ERR_STALE = 70,
    /// Too many levels of remote in path.
    NFS3ERR_REMOTE = 71,
    /// Illegal NFS file handle: the handle failed internal consistency
    /// checks.
    NFS3ERR_BADHANDLE = 10001,
    /// Update synchronization mismatch during SETATTR.
    NFS3ERR_NOT_SYNC = 10002,
    /// READDIR cookie is stale.
    NFS3ERR_BAD_COOKIE = 10003,
    /// Operation is not supported.
    NFS3ERR_NOTSUPP = 10004,
    /// Buffer or request is too small.
    NFS3ERR_TOOSMALL = 10005,
    /// A server-side error that maps to no other status code.
    NFS3ERR_SERVERFAULT = 10006,
    /// An attempt was made to create an object of an unsupported type.
    NFS3ERR_BADTYPE = 10007,
    /// The server started the request but cannot finish it in time; the
    /// client should retry with a new transaction id.
    NFS3ERR_JUKEBOX = 10008,
}
impl super::SerializeEnum for nfsstat3 {}
impl super::DeserializeEnum for nfsstat3 {}

/// File type enumeration as defined in RFC 1813 section 2.3.5.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, FromPrimitive, ToPrimitive)]
#[repr(u32)]
pub enum ftype3 {
    /// Regular file
    #[default]
    NF3REG = 1,
    /// Directory
    NF3DIR = 2,
    /// Block special device
    NF3BLK = 3,
    /// Character special device
    NF3CHR = 4,
    /// Symbolic link
    NF3LNK = 5,
    /// Socket
    NF3SOCK = 6,
    /// Named pipe
    NF3FIFO = 7,
}
impl super::SerializeEnum for ftype3 {}
impl super::DeserializeEnum for ftype3 {}

/// Major and minor numbers of a character or block special device.
#[derive(Copy, Clone, Debug, Default)]
pub struct specdata3 {
    /// Major device number
    pub specdata1: u32,
    /// Minor device number
    pub specdata2: u32,
}
DeserializeStruct!(specdata3, specdata1, specdata2);
SerializeStruct!(specdata3, specdata1, specdata2);

/// The NFS version 3 file handle.
///
/// Uniquely identifies an object on the server; the server alone decides
/// the internal format. Here the bytes are the handle codec's textual
/// `fsid[:fileid]` encoding.
#[derive(Clone, Debug, Default)]
pub struct nfs_fh3 {
    /// Raw file handle data (up to [`NFS3_FHSIZE`] bytes)
    pub data: Vec<u8>,
}
DeserializeStruct!(nfs_fh3, data);
SerializeStruct!(nfs_fh3, data);

/// File timestamp: seconds and nanoseconds since the Unix epoch.
#[derive(Copy, Clone, Debug, Default)]
pub struct nfstime3 {
    /// Seconds since January 1, 1970
    pub seconds: u32,
    /// Nanoseconds (0-999999999)
    pub nseconds: u32,
}
DeserializeStruct!(nfstime3, seconds, nseconds);
SerializeStruct!(nfstime3, seconds, nseconds);

/// File attributes as defined in RFC 1813 section 2.3.5.
#[derive(Copy, Clone, Debug, Default)]
pub struct fattr3 {
    /// Type of file
    pub ftype: ftype3,
    /// Access mode bits
    pub mode: mode3,
    /// Number of hard links to the file
    pub nlink: u32,
    /// User ID of the owner
    pub uid: uid3,
    /// Group ID of the file's group
    pub gid: gid3,
    /// File size in bytes
    pub size: size3,
    /// Bytes actually allocated to the file
    pub used: size3,
    /// Device numbers for special files
    pub rdev: specdata3,
    /// Identifier of the file system containing the file; the server fills
    /// this with the owning volume's registry identifier
    pub fsid: u64,
    /// File identifier within its file system
    pub fileid: fileid3,
    /// Time of last access
    pub atime: nfstime3,
    /// Time of last modification
    pub mtime: nfstime3,
    /// Time of last status change
    pub ctime: nfstime3,
}
DeserializeStruct!(
    fattr3, ftype, mode, nlink, uid, gid, size, used, rdev, fsid, fileid, atime, mtime, ctime
);
SerializeStruct!(
    fattr3, ftype, mode, nlink, uid, gid, size, used, rdev, fsid, fileid, atime, mtime, ctime
);

/// Attributes used in weak cache consistency checking (RFC 1813 section
/// 2.3.8).
#[derive(Copy, Clone, Debug, Default)]
pub struct wcc_attr {
    /// File size in bytes
    pub size: size3,
    /// Last modification time
    pub mtime: nfstime3,
    /// Last status change time
    pub ctime: nfstime3,
}
DeserializeStruct!(wcc_attr, size, mtime, ctime);
SerializeStruct!(wcc_attr, size, mtime, ctime);

/// Pre-operation attributes for weak cache consistency.
#[derive(Copy, Clone, Debug, Default)]
#[repr(u32)]
pub enum pre_op_attr {
    /// No attributes available
    #[default]
    Void,
    /// Attributes are available
    attributes(wcc_attr),
}
DeserializeBoolUnion!(pre_op_attr, attributes);
SerializeBoolUnion!(pre_op_attr, attributes);

/// Post-operation attributes, returned by almost every procedure so
/// clients can keep their attribute caches current.
#[derive(Copy, Clone, Debug, Default)]
#[repr(u32)]
pub enum post_op_attr {
    /// No attributes available
    #[default]
    Void,
    /// Attributes are available
    attributes(fattr3),
}
DeserializeBoolUnion!(post_op_attr, attributes);
SerializeBoolUnion!(post_op_attr, attributes);

/// Weak cache consistency data: attributes before and after an operation.
#[derive(Copy, Clone, Debug, Default)]
pub struct wcc_data {
    /// File attributes before the operation
    pub before: pre_op_attr,
    /// File attributes after the operation
    pub after: post_op_attr,
}
DeserializeStruct!(wcc_data, before, after);
SerializeStruct!(wcc_data, before, after);

/// Arguments shared by directory operations: a directory handle and a name
/// within that directory.
#[derive(Clone, Debug, Default)]
pub struct diropargs3 {
    /// Directory file handle
    pub dir: nfs_fh3,
    /// Name within the directory
    pub name: filename3,
}
DeserializeStruct!(diropargs3, dir, name);
SerializeStruct!(diropargs3, dir, name);

/// Access permission to read file data or read a directory (RFC 1813
/// section 3.3.4).
pub const ACCESS3_READ: u32 = 0x0001;
/// Access permission to look up names in a directory.
pub const ACCESS3_LOOKUP: u32 = 0x0002;
/// Access permission to modify the contents of an existing file.
pub const ACCESS3_MODIFY: u32 = 0x0004;
/// Access permission to grow a file or extend a directory.
pub const ACCESS3_EXTEND: u32 = 0x0008;
/// Access permission to delete a file or directory entry.
pub const ACCESS3_DELETE: u32 = 0x0010;
/// Access permission to execute a file or traverse a directory.
pub const ACCESS3_EXECUTE: u32 = 0x0020;
