//! Implementation of the UMNT procedure (procedure 3) for MOUNT version 3
//! protocol as defined in RFC 1813 Appendix I section I.4.3.
//!
//! UMNT removes a client from the server's mount list. This server keeps
//! no such list - registration and teardown of volumes belong to the
//! mount orchestrator - so the procedure only acknowledges the call.

use std::io::{Read, Write};

use tracing::debug;

use crate::protocol::xdr::{self, deserialize, mount, Serialize};

/// Handles MOUNT protocol UMNT procedure (procedure 3): acknowledges the
/// unmount without touching any server state.
pub fn mountproc3_umnt(
    xid: u32,
    input: &mut impl Read,
    output: &mut impl Write,
) -> Result<(), anyhow::Error> {
    let path = deserialize::<mount::dirpath>(input)?;
    debug!("mountproc3_umnt({:?},{:?})", xid, std::str::from_utf8(&path).unwrap_or_default());
    xdr::rpc::make_success_reply(xid).serialize(output)?;
    Ok(())
}
