//! Implementation of the NULL procedure (procedure 0) for NFS version 3
//! protocol as defined in RFC 1813 section 3.3.0.
//!
//! NULL takes no arguments and returns nothing; clients use it to probe
//! that the server is responding.

use std::io::Write;

use tracing::debug;

use crate::protocol::xdr::{self, Serialize};

/// Handles NFSv3 NULL procedure (procedure 0).
pub fn nfsproc3_null(xid: u32, output: &mut impl Write) -> Result<(), anyhow::Error> {
    debug!("nfsproc3_null({:?})", xid);
    xdr::rpc::make_success_reply(xid).serialize(output)?;
    Ok(())
}
