//! RPC program registration.
//!
//! An [`RpcProgram`] is one registered program/version pair: the MOUNT
//! program, the NFS program, or any replacement a library user supplies.
//! The [`ProgramTable`] is the set of programs currently registered
//! against the server's single transport; the dispatcher consults it for
//! every incoming call, and the server loop clears it when it exits, which
//! is the unregistration step of shutdown.

use std::io::Cursor;
use std::sync::Arc;

use async_trait::async_trait;

use crate::protocol::rpc::Context;
use crate::protocol::xdr::rpc::call_body;

/// A registered RPC program: a program number, the one version served, and
/// the procedure dispatcher.
#[async_trait]
pub trait RpcProgram: Send + Sync {
    /// The RPC program number this handler serves.
    fn program(&self) -> u32;

    /// The program version this handler serves.
    fn version(&self) -> u32;

    /// Handles one call to this program.
    ///
    /// `input` is positioned at the procedure-specific arguments; the
    /// complete reply message, including the RPC reply header, must be
    /// written to `output`. Returning an error tears down the connection
    /// the call arrived on, so per-procedure failures should be answered
    /// with protocol-level status replies instead.
    async fn dispatch(
        &self,
        xid: u32,
        call: call_body,
        input: &mut Cursor<&[u8]>,
        output: &mut Vec<u8>,
        context: &Context,
    ) -> Result<(), anyhow::Error>;
}

/// The set of RPC programs registered against the server's transport.
#[derive(Default)]
pub struct ProgramTable {
    programs: Vec<Arc<dyn RpcProgram>>,
}

impl ProgramTable {
    /// Registers `program`, replacing any program already registered under
    /// the same program number.
    pub fn register(&mut self, program: Arc<dyn RpcProgram>) {
        self.unregister(program.program());
        self.programs.push(program);
    }

    /// Removes the program registered under `prog`; absent numbers are a
    /// no-op.
    pub fn unregister(&mut self, prog: u32) {
        self.programs.retain(|registered| registered.program() != prog);
    }

    /// Removes every registered program.
    pub fn clear(&mut self) {
        self.programs.clear();
    }

    /// Returns the program registered under `prog`.
    pub fn lookup(&self, prog: u32) -> Option<Arc<dyn RpcProgram>> {
        self.programs.iter().find(|registered| registered.program() == prog).cloned()
    }

    /// True when no programs are registered.
    pub fn is_empty(&self) -> bool {
        self.programs.is_empty()
    }
}

impl std::fmt::Debug for ProgramTable {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let registered: Vec<(u32, u32)> =
            self.programs.iter().map(|p| (p.program(), p.version())).collect();
        f.debug_struct("ProgramTable").field("registered", &registered).finish()
    }
}
