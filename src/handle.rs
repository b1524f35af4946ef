//! The opaque file-handle codec.
//!
//! NFS clients treat file handles as opaque byte strings; this server uses
//! that freedom to embed routing information in every handle. A handle is
//! the ASCII text `"<fsid>"` for a volume's root object, or
//! `"<fsid>:<fileid>"` for any other object. The filesystem identifier
//! selects the registered volume, the file id selects the object within it.
//!
//! Decoding is strict: empty input, non-decimal digits, or a dangling `:`
//! are decode failures and resolve to "no filesystem". A malformed
//! identifier is never read as identifier 0, and an absent file id is never
//! read as file id 0 - the root object is a distinct, tagged state.

use std::sync::Arc;

use crate::registry::Registry;
use crate::vfs::{FileId, FsId, Volume};

/// A decoded file handle: the routing pair carried on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Handle {
    /// Identifier of the volume the handle belongs to.
    pub fsid: FsId,
    /// Object within the volume; `None` denotes the volume root.
    pub file: Option<FileId>,
}

impl Handle {
    /// Handle for the root object of volume `fsid`.
    pub fn root(fsid: FsId) -> Handle {
        Handle { fsid, file: None }
    }

    /// Handle for file `file` of volume `fsid`.
    pub fn file(fsid: FsId, file: FileId) -> Handle {
        Handle { fsid, file: Some(file) }
    }

    /// Encodes the handle into its wire form.
    ///
    /// Exact left inverse of [`Handle::parse`]: the root handle is the
    /// decimal filesystem identifier, a non-root handle appends `:` and the
    /// decimal file id.
    pub fn encode(&self) -> Vec<u8> {
        match self.file {
            None => self.fsid.to_string().into_bytes(),
            Some(file) => format!("{}:{}", self.fsid, file).into_bytes(),
        }
    }

    /// Parses a wire handle without touching the registry.
    ///
    /// Splits on the first `:`; the text before it must be a decimal
    /// filesystem identifier, the text after it (when present) a decimal
    /// file id. Returns `None` for empty or malformed input.
    pub fn parse(bytes: &[u8]) -> Option<Handle> {
        if bytes.is_empty() {
            return None;
        }
        let text = std::str::from_utf8(bytes).ok()?;
        let (fsid_text, file_text) = match text.split_once(':') {
            Some((fsid_text, file_text)) => (fsid_text, Some(file_text)),
            None => (text, None),
        };
        let fsid = fsid_text.parse::<FsId>().ok()?;
        let file = match file_text {
            Some(file_text) => Some(file_text.parse::<FileId>().ok()?),
            None => None,
        };
        Some(Handle { fsid, file })
    }
}

/// A handle resolved against the registry.
#[derive(Clone)]
pub struct Resolved {
    /// The volume the handle routes to.
    pub volume: Arc<dyn Volume>,
    /// The decoded routing pair.
    pub handle: Handle,
    /// Path of the named object, from the volume's `reverse_lookup`. Only
    /// populated for non-root handles; `None` there means the file id no
    /// longer names a live object.
    pub path: Option<String>,
}

impl Resolved {
    /// Path of the object the handle names: `"/"` for a root handle,
    /// otherwise the reverse-lookup result. `None` marks a stale file id.
    pub fn object_path(&self) -> Option<&str> {
        match self.handle.file {
            None => Some("/"),
            Some(_) => self.path.as_deref(),
        }
    }
}

impl std::fmt::Debug for Resolved {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_struct("Resolved")
            .field("handle", &self.handle)
            .field("path", &self.path)
            .finish()
    }
}

/// Decodes `bytes` and resolves the result against `registry`.
///
/// Returns `None` when the handle is malformed or names a filesystem that
/// is not currently registered; the protocol layer translates that into a
/// stale-handle reply. When the handle carries a file id, the volume's
/// [`Volume::reverse_lookup`] is consulted for the object's path.
pub fn resolve(registry: &Registry, bytes: &[u8]) -> Option<Resolved> {
    let handle = Handle::parse(bytes)?;
    let volume = registry.get(handle.fsid)?;
    let path = handle.file.and_then(|file| volume.reverse_lookup(file));
    Some(Resolved { volume, handle, path })
}
