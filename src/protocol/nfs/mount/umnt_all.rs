//! Implementation of the UMNTALL procedure (procedure 4) for MOUNT
//! version 3 protocol as defined in RFC 1813 Appendix I section I.4.4.
//!
//! Like UMNT, this is an acknowledgement only; the server tracks no
//! per-client mount list to clear.

use std::io::Write;

use tracing::debug;

use crate::protocol::xdr::{self, Serialize};

/// Handles MOUNT protocol UMNTALL procedure (procedure 4).
pub fn mountproc3_umnt_all(xid: u32, output: &mut impl Write) -> Result<(), anyhow::Error> {
    debug!("mountproc3_umnt_all({:?})", xid);
    xdr::rpc::make_success_reply(xid).serialize(output)?;
    Ok(())
}
