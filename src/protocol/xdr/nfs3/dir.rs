//! XDR data structures of the READDIR procedure (procedure 16) of NFS
//! version 3 (RFC 1813 section 3.3.16).
//!
//! A READDIR response carries its entries as an XDR linked list: each
//! entry is preceded by a TRUE marker and the list ends with FALSE
//! followed by the eof flag. Because the list length is bounded by a byte
//! budget rather than an entry count, the response is assembled
//! incrementally by the handler instead of through a fixed result struct;
//! only the per-entry structure is defined here.

// Preserve original RFC naming conventions for consistency with the specification
#![allow(non_camel_case_types)]

use std::io::{Read, Write};

use super::*;

/// One directory entry of a READDIR response.
#[derive(Clone, Debug, Default)]
pub struct entry3 {
    /// File identifier of the entry
    pub fileid: fileid3,
    /// Name of the entry
    pub name: filename3,
    /// Cookie a client passes back to resume listing after this entry
    pub cookie: cookie3,
}
DeserializeStruct!(entry3, fileid, name, cookie);
SerializeStruct!(entry3, fileid, name, cookie);

/// Arguments for the READDIR procedure.
#[derive(Clone, Debug, Default)]
pub struct READDIR3args {
    /// File handle of the directory to read
    pub dir: nfs_fh3,
    /// Where to resume: 0 starts at the beginning, otherwise the cookie of
    /// the last entry already received
    pub cookie: cookie3,
    /// Verifier from the response the cookie came from
    pub cookieverf: cookieverf3,
    /// Maximum number of bytes of directory information to return
    pub dircount: count3,
}
DeserializeStruct!(READDIR3args, dir, cookie, cookieverf, dircount);
SerializeStruct!(READDIR3args, dir, cookie, cookieverf, dircount);
