//! Implementation of the NULL procedure (procedure 0) for MOUNT version 3
//! protocol as defined in RFC 1813 Appendix I section I.4.1.
//!
//! NULL does no work; clients call it to probe that the service is alive.

use std::io::Write;

use tracing::debug;

use crate::protocol::xdr::{self, Serialize};

/// Handles MOUNT protocol NULL procedure (procedure 0): replies with an
/// empty success message.
pub fn mountproc3_null(xid: u32, output: &mut impl Write) -> Result<(), anyhow::Error> {
    debug!("mountproc3_null({:?})", xid);
    xdr::rpc::make_success_reply(xid).serialize(output)?;
    Ok(())
}
