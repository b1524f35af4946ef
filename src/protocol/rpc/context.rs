//! Per-request state handed to every protocol handler.

use std::fmt;
use std::sync::{Arc, RwLock};

use tokio::sync::Notify;

use crate::protocol::rpc::ProgramTable;
use crate::protocol::xdr;
use crate::registry::Registry;

/// Execution context for RPC operations.
///
/// One context is created per accepted connection and cloned per request;
/// the clone carries the request's own authentication credentials while
/// the shared state (registry, program table, dispatch notifier) stays
/// common to the whole server.
///
/// The registry reference is how protocol handlers reach the volumes: a
/// handler decodes the file handle from the wire, resolves its filesystem
/// identifier here, and dispatches to whichever backend is registered
/// under it.
#[derive(Clone)]
pub struct Context {
    /// Port the server is listening on
    pub local_port: u16,

    /// Client's network address, used for logging
    pub client_addr: String,

    /// UNIX-style authentication credentials of the current request
    pub auth: xdr::rpc::auth_unix,

    /// Table of registered backend volumes
    pub registry: Arc<Registry>,

    /// RPC programs currently registered with the server
    pub programs: Arc<RwLock<ProgramTable>>,

    /// Signalled after every dispatch round so the server loop can re-check
    /// its continuation predicate
    pub dispatched: Arc<Notify>,
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("rpc::Context")
            .field("local_port", &self.local_port)
            .field("client_addr", &self.client_addr)
            .field("auth", &self.auth)
            .finish()
    }
}
