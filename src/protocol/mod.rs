//! Protocol module: the wire-facing layers of the loopback server.
//!
//! Three components live here:
//!
//! - `xdr`: External Data Representation (XDR) serialization and
//!   deserialization according to RFC 1832, plus the RPC, MOUNT, and NFSv3
//!   data structures encoded with it.
//!
//! - `rpc`: RPC version 2 message handling as defined in RFC 5531 - record
//!   framing over TCP, the per-request context, the program registration
//!   table, and the dispatcher that routes each call to a registered
//!   program.
//!
//! - `nfs`: The built-in RPC programs: the MOUNT version 3 program that
//!   hands out root file handles, and the read-path subset of the NFS
//!   version 3 program (RFC 1813). Every NFS handler resolves the opaque
//!   file handle it receives back to a registered volume before doing any
//!   work; that resolution is the multiplexing step this server exists
//!   for.

pub mod nfs;
pub mod rpc;
pub mod xdr;
