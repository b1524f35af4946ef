//! XDR data structures of the file-system-wide procedures of NFS
//! version 3 (RFC 1813):
//!
//! - FSSTAT: get file system statistics (procedure 18)
//! - FSINFO: get static file system information (procedure 19)
//! - PATHCONF: get path configuration (procedure 20)

// Preserve original RFC naming conventions for consistency with the specification
#![allow(non_camel_case_types)]

use std::io::{Read, Write};

use super::*;

// FSINFO `properties` bitmask constants (RFC 1813 section 3.3.19).

/// The file system supports hard links.
pub const FSF_LINK: u32 = 0x0001;
/// The file system supports symbolic links.
pub const FSF_SYMLINK: u32 = 0x0002;
/// PATHCONF information is identical for every object in the file system.
pub const FSF_HOMOGENEOUS: u32 = 0x0008;
/// The server can set file times via SETATTR.
pub const FSF_CANSETTIME: u32 = 0x0010;

/// Arguments for the FSSTAT procedure.
#[derive(Clone, Debug, Default)]
pub struct FSSTAT3args {
    /// File handle of the file system root
    pub fsroot: nfs_fh3,
}
DeserializeStruct!(FSSTAT3args, fsroot);
SerializeStruct!(FSSTAT3args, fsroot);

/// Arguments for the FSINFO procedure.
#[derive(Clone, Debug, Default)]
pub struct FSINFO3args {
    /// File handle of the file system root
    pub fsroot: nfs_fh3,
}
DeserializeStruct!(FSINFO3args, fsroot);
SerializeStruct!(FSINFO3args, fsroot);

/// Arguments for the PATHCONF procedure.
#[derive(Clone, Debug, Default)]
pub struct PATHCONF3args {
    /// File handle of the object being queried
    pub object: nfs_fh3,
}
DeserializeStruct!(PATHCONF3args, object);
SerializeStruct!(PATHCONF3args, object);

/// Static file system information returned by FSINFO.
#[derive(Clone, Debug, Default)]
pub struct FSINFO3resok {
    /// Attributes of the file system root
    pub obj_attributes: post_op_attr,
    /// Maximum READ request size supported (bytes)
    pub rtmax: u32,
    /// Preferred READ request size (bytes)
    pub rtpref: u32,
    /// Suggested READ request multiple (bytes)
    pub rtmult: u32,
    /// Maximum WRITE request size supported (bytes)
    pub wtmax: u32,
    /// Preferred WRITE request size (bytes)
    pub wtpref: u32,
    /// Suggested WRITE request multiple (bytes)
    pub wtmult: u32,
    /// Preferred READDIR request size (bytes)
    pub dtpref: u32,
    /// Maximum file size supported (bytes)
    pub maxfilesize: size3,
    /// Server time granularity
    pub time_delta: nfstime3,
    /// Bitmask of `FSF_*` file system properties
    pub properties: u32,
}
DeserializeStruct!(
    FSINFO3resok,
    obj_attributes,
    rtmax,
    rtpref,
    rtmult,
    wtmax,
    wtpref,
    wtmult,
    dtpref,
    maxfilesize,
    time_delta,
    properties
);
SerializeStruct!(
    FSINFO3resok,
    obj_attributes,
    rtmax,
    rtpref,
    rtmult,
    wtmax,
    wtpref,
    wtmult,
    dtpref,
    maxfilesize,
    time_delta,
    properties
);

/// Volatile file system statistics returned by FSSTAT.
#[derive(Clone, Debug, Default)]
pub struct FSSTAT3resok {
    /// Attributes of the file system root
    pub obj_attributes: post_op_attr,
    /// Total size of the file system in bytes
    pub tbytes: size3,
    /// Free space in bytes
    pub fbytes: size3,
    /// Free space available to the caller in bytes
    pub abytes: size3,
    /// Total number of file slots
    pub tfiles: size3,
    /// Number of free file slots
    pub ffiles: size3,
    /// Number of free file slots available to the caller
    pub afiles: size3,
    /// Seconds the file system is expected to stay unchanged
    pub invarsec: u32,
}
DeserializeStruct!(
    FSSTAT3resok,
    obj_attributes,
    tbytes,
    fbytes,
    abytes,
    tfiles,
    ffiles,
    afiles,
    invarsec
);
SerializeStruct!(
    FSSTAT3resok,
    obj_attributes,
    tbytes,
    fbytes,
    abytes,
    tfiles,
    ffiles,
    afiles,
    invarsec
);

/// Path configuration returned by PATHCONF.
#[derive(Clone, Debug, Default)]
pub struct PATHCONF3resok {
    /// Attributes of the queried object
    pub obj_attributes: post_op_attr,
    /// Maximum number of hard links to an object
    pub linkmax: u32,
    /// Maximum length of a component of a filename
    pub name_max: u32,
    /// The server rejects over-long names instead of truncating them
    pub no_trunc: bool,
    /// Changing ownership is restricted to the privileged user
    pub chown_restricted: bool,
    /// Filenames are compared case-insensitively
    pub case_insensitive: bool,
    /// The file system preserves filename case
    pub case_preserving: bool,
}
DeserializeStruct!(
    PATHCONF3resok,
    obj_attributes,
    linkmax,
    name_max,
    no_trunc,
    chown_restricted,
    case_insensitive,
    case_preserving
);
SerializeStruct!(
    PATHCONF3resok,
    obj_attributes,
    linkmax,
    name_max,
    no_trunc,
    chown_restricted,
    case_insensitive,
    case_preserving
);
