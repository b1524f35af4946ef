//! MOUNT version 3 protocol implementation (RFC 1813 Appendix I).
//!
//! The MOUNT program is the second of the two programs registered against
//! the loopback transport. Its MNT procedure translates an export path of
//! the form `/<fsid>` into the encoded root file handle of the volume
//! registered under that identifier - on Linux this is how the kernel
//! obtains the mount filehandle, while on macOS the handle is passed
//! straight through the mount syscall and MNT is never called.
//!
//! The server keeps no per-client mount list, so UMNT and UMNTALL are
//! acknowledged without any state change; detaching a volume is the mount
//! orchestrator's job, not the protocol's.

use std::io::Cursor;

use async_trait::async_trait;

use num_traits::cast::FromPrimitive;
use tracing::warn;

use crate::protocol::rpc::{Context, RpcProgram};
use crate::protocol::xdr::rpc::call_body;
use crate::protocol::xdr::{self, mount, Serialize};

mod export;
mod mnt;
mod null;
mod umnt;
mod umnt_all;

use export::mountproc3_export;
use mnt::mountproc3_mnt;
use null::mountproc3_null;
use umnt::mountproc3_umnt;
use umnt_all::mountproc3_umnt_all;

/// The MOUNT version 3 program served on the loopback transport.
pub struct MountProgram;

#[async_trait]
impl RpcProgram for MountProgram {
    fn program(&self) -> u32 {
        mount::PROGRAM
    }

    fn version(&self) -> u32 {
        mount::VERSION
    }

    async fn dispatch(
        &self,
        xid: u32,
        call: call_body,
        input: &mut Cursor<&[u8]>,
        output: &mut Vec<u8>,
        context: &Context,
    ) -> Result<(), anyhow::Error> {
        let proc = mount::MountProcedure::from_u32(call.proc)
            .unwrap_or(mount::MountProcedure::INVALID);

        match proc {
            mount::MountProcedure::MOUNTPROC3_NULL => mountproc3_null(xid, output)?,
            mount::MountProcedure::MOUNTPROC3_MNT => {
                mountproc3_mnt(xid, input, output, context)?
            }
            mount::MountProcedure::MOUNTPROC3_UMNT => mountproc3_umnt(xid, input, output)?,
            mount::MountProcedure::MOUNTPROC3_UMNTALL => mountproc3_umnt_all(xid, output)?,
            mount::MountProcedure::MOUNTPROC3_EXPORT => {
                mountproc3_export(xid, output, context)?
            }
            _ => {
                warn!("Unimplemented MOUNT procedure {:?}", proc);
                xdr::rpc::proc_unavail_reply_message(xid).serialize(output)?;
            }
        }
        Ok(())
    }
}
