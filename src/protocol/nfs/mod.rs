//! The built-in RPC programs registered against the loopback transport.
//!
//! - `mount`: The MOUNT version 3 protocol (RFC 1813 Appendix I). Its MNT
//!   procedure is the bridge between an export path of the form `/<fsid>`
//!   and the encoded root file handle of the volume registered under that
//!   identifier.
//!
//! - `v3`: The read-path subset of the NFS version 3 protocol (RFC 1813).
//!   Each procedure resolves the opaque handle it receives to a
//!   `(volume, path)` pair through the handle codec and registry, then
//!   calls into that volume. Procedures that would modify the export are
//!   refused with `NFS3ERR_ROFS`.
//!
//! Both programs implement [`crate::protocol::rpc::RpcProgram`] and are
//! registered by the server's bind step; a library user can replace either
//! by registering a different program under the same program number.

pub mod mount;
pub mod v3;
