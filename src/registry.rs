//! Process-wide table of registered backend volumes.
//!
//! The registry is the one piece of mutable state shared between the
//! dispatch loop (which resolves the filesystem identifier carried in every
//! opaque file handle) and the mount control path (which registers and
//! deregisters volumes). Lookups happen on the request path for every NFS
//! call, so `get` takes only a read lock; `put`/`remove` take the write
//! lock briefly and never block on anything else.
//!
//! Identifiers come from the wire and therefore cannot be trusted:
//! `slot_index` validates every identifier against the fixed index space
//! before any indexed access.

use std::io;
use std::sync::{Arc, RwLock};

use crate::vfs::{FsId, Volume};

/// Maximum number of concurrently registered volumes.
pub const MAX_VOLUMES: usize = 100;

/// Bounded table mapping backend-declared identifiers to registered
/// volumes.
///
/// Identifiers are chosen by the backends themselves; the registry does not
/// allocate them. Registering a second volume under an identifier that is
/// already in use silently replaces the previous entry (last write wins),
/// so callers coordinating multiple volumes must guarantee uniqueness.
pub struct Registry {
    slots: RwLock<Vec<Option<Arc<dyn Volume>>>>,
}

impl Registry {
    /// Creates an empty registry with [`MAX_VOLUMES`] slots.
    pub fn new() -> Registry {
        Registry { slots: RwLock::new(vec![None; MAX_VOLUMES]) }
    }

    /// Registers `volume` under its own identifier and returns that
    /// identifier.
    ///
    /// Fails when the identifier does not fit the registry's index space;
    /// the table is left unchanged in that case.
    pub fn put(&self, volume: Arc<dyn Volume>) -> io::Result<FsId> {
        let id = volume.identifier();
        let slot = slot_index(id).ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("volume identifier {id} outside registry range 0..{MAX_VOLUMES}"),
            )
        })?;
        self.slots.write().unwrap()[slot] = Some(volume);
        Ok(id)
    }

    /// Deregisters the volume stored under `id`.
    ///
    /// Removing an absent or out-of-range identifier is a no-op.
    pub fn remove(&self, id: FsId) {
        if let Some(slot) = slot_index(id) {
            self.slots.write().unwrap()[slot] = None;
        }
    }

    /// Returns the volume registered under `id`, or `None` for unused or
    /// out-of-range identifiers.
    ///
    /// `id` may come straight from a decoded wire handle; any value is safe
    /// to pass.
    pub fn get(&self, id: FsId) -> Option<Arc<dyn Volume>> {
        let slot = slot_index(id)?;
        self.slots.read().unwrap()[slot].clone()
    }

    /// Returns the currently registered volumes in identifier order.
    pub fn snapshot(&self) -> Vec<Arc<dyn Volume>> {
        self.slots.read().unwrap().iter().flatten().cloned().collect()
    }
}

impl Default for Registry {
    fn default() -> Registry {
        Registry::new()
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let ids: Vec<FsId> =
            self.snapshot().iter().map(|volume| volume.identifier()).collect();
        f.debug_struct("Registry").field("registered", &ids).finish()
    }
}

/// Validates `id` against the fixed index space.
fn slot_index(id: FsId) -> Option<usize> {
    usize::try_from(id).ok().filter(|&slot| slot < MAX_VOLUMES)
}
