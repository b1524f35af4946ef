//! RPC (Remote Procedure Call) message handling as specified in RFC 5531
//! (previously RFC 1057).
//!
//! This module carries the transport-independent half of the server:
//!
//! 1. Message framing for TCP using the Record Marking Standard
//! 2. The [`RpcProgram`] interface and the [`ProgramTable`] of registered
//!    program/version pairs
//! 3. Program number dispatching with the standard unavailable/mismatch
//!    replies
//! 4. Authentication credential extraction (AUTH_UNIX)
//!
//! The programs registered in the table are never advertised to an
//! external portmap/rpcbind registrar; the only client that knows the
//! port is the local kernel, which is told it directly at mount time.

mod context;
mod program;
mod wire;

pub use context::Context;
pub use program::{ProgramTable, RpcProgram};
pub use wire::{dispatch_record, read_record, write_fragment};

/// Upper bound on a reassembled RPC record, in bytes. Records claiming
/// more than this are rejected before any allocation is attempted.
pub const MAX_RPC_RECORD_LENGTH: usize = 8 * 1024 * 1024;
