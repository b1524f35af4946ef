//! Implementation of the EXPORT procedure (procedure 5) for MOUNT
//! version 3 protocol as defined in RFC 1813 Appendix I section I.4.6.
//!
//! EXPORT lists the export paths a client may mount. Every registered
//! volume appears as `/<fsid>` with no group restrictions; the response is
//! the XDR linked list the protocol prescribes, one TRUE-prefixed node per
//! export terminated by FALSE.

use std::io::Write;

use tracing::debug;

use crate::protocol::rpc::Context;
use crate::protocol::xdr::{self, Serialize};

/// Handles MOUNT protocol EXPORT procedure (procedure 5): enumerates the
/// currently registered volumes.
pub fn mountproc3_export(
    xid: u32,
    output: &mut impl Write,
    context: &Context,
) -> Result<(), anyhow::Error> {
    let volumes = context.registry.snapshot();
    debug!("mountproc3_export({:?}), {} exports", xid, volumes.len());
    xdr::rpc::make_success_reply(xid).serialize(output)?;
    for volume in volumes {
        true.serialize(output)?;
        let dir = format!("/{}", volume.identifier());
        dir.as_bytes().serialize(output)?;
        // empty group list: the loopback client is the only consumer
        false.serialize(output)?;
    }
    false.serialize(output)?;
    Ok(())
}
