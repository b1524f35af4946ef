//! XDR data structures of the per-file read-path procedures of NFS
//! version 3 (RFC 1813):
//!
//! - GETATTR: get file attributes (procedure 1)
//! - LOOKUP: look up a filename (procedure 3)
//! - ACCESS: check access permission (procedure 4)
//! - READ: read from a file (procedure 6)

// Preserve original RFC naming conventions for consistency with the specification
#![allow(non_camel_case_types)]

use std::io::{Read, Write};

use super::*;

/// Arguments for the GETATTR procedure (RFC 1813 section 3.3.1).
#[derive(Clone, Debug, Default)]
pub struct GETATTR3args {
    /// File handle of the object whose attributes are requested
    pub object: nfs_fh3,
}
DeserializeStruct!(GETATTR3args, object);
SerializeStruct!(GETATTR3args, object);

/// Arguments for the LOOKUP procedure (RFC 1813 section 3.3.3).
#[derive(Clone, Debug, Default)]
pub struct LOOKUP3args {
    /// Directory to search and the name to search for
    pub what: diropargs3,
}
DeserializeStruct!(LOOKUP3args, what);
SerializeStruct!(LOOKUP3args, what);

/// Successful LOOKUP response.
#[derive(Clone, Debug, Default)]
pub struct LOOKUP3resok {
    /// File handle of the object that was found
    pub object: nfs_fh3,
    /// Attributes of the object that was found
    pub obj_attributes: post_op_attr,
    /// Attributes of the directory that was searched
    pub dir_attributes: post_op_attr,
}
DeserializeStruct!(LOOKUP3resok, object, obj_attributes, dir_attributes);
SerializeStruct!(LOOKUP3resok, object, obj_attributes, dir_attributes);

/// Arguments for the ACCESS procedure (RFC 1813 section 3.3.4).
#[derive(Clone, Debug, Default)]
pub struct ACCESS3args {
    /// File handle of the object access is checked against
    pub object: nfs_fh3,
    /// Bitmask of requested `ACCESS3_*` permissions
    pub access: u32,
}
DeserializeStruct!(ACCESS3args, object, access);
SerializeStruct!(ACCESS3args, object, access);

/// Successful ACCESS response.
#[derive(Clone, Debug, Default)]
pub struct ACCESS3resok {
    /// Attributes of the object
    pub obj_attributes: post_op_attr,
    /// Bitmask of the requested permissions the caller actually holds
    pub access: u32,
}
DeserializeStruct!(ACCESS3resok, obj_attributes, access);
SerializeStruct!(ACCESS3resok, obj_attributes, access);

/// Arguments for the READ procedure (RFC 1813 section 3.3.6).
#[derive(Clone, Debug, Default)]
pub struct READ3args {
    /// File handle of the file to read
    pub file: nfs_fh3,
    /// Byte offset to start reading at
    pub offset: offset3,
    /// Maximum number of bytes to read
    pub count: count3,
}
DeserializeStruct!(READ3args, file, offset, count);
SerializeStruct!(READ3args, file, offset, count);

/// Successful READ response.
#[derive(Clone, Debug, Default)]
pub struct READ3resok {
    /// Attributes of the file after the read
    pub file_attributes: post_op_attr,
    /// Number of bytes actually read
    pub count: count3,
    /// True when the read reached the end of the file
    pub eof: bool,
    /// The data that was read
    pub data: Vec<u8>,
}
DeserializeStruct!(READ3resok, file_attributes, count, eof, data);
SerializeStruct!(READ3resok, file_attributes, count, eof, data);
