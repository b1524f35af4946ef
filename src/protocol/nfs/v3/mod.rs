//! NFSv3 (Network File System version 3) protocol implementation as
//! specified in RFC 1813, restricted to the read path.
//!
//! The served procedures are:
//!
//! 1. NULL - do nothing (ping the server)
//! 2. GETATTR - get file attributes
//! 3. LOOKUP - look up a file name
//! 4. ACCESS - check access permission
//! 5. READ - read from a file
//! 6. READDIR - read from a directory
//! 7. FSSTAT - get file system statistics
//! 8. FSINFO - get static file system information
//! 9. PATHCONF - get path configuration
//!
//! Every handler starts by resolving the opaque file handle it received
//! through the handle codec and the registry: the handle's filesystem
//! identifier picks the volume, its optional file id picks the object
//! within the volume. A handle that fails to decode, names an
//! unregistered filesystem, or carries a dead file id is answered with
//! `NFS3ERR_STALE` - never a dropped connection.
//!
//! Procedures that would modify the export (SETATTR, WRITE, CREATE, ...)
//! are answered with `NFS3ERR_ROFS` without decoding their arguments; the
//! few remaining read procedures this server does not provide (READLINK,
//! READDIRPLUS, LINK) get `NFS3ERR_NOTSUPP`.

use std::io::Cursor;

use async_trait::async_trait;

use num_traits::cast::FromPrimitive;
use tracing::warn;

use crate::protocol::rpc::{Context, RpcProgram};
use crate::protocol::xdr::rpc::call_body;
use crate::protocol::xdr::{self, nfs3, Serialize};

mod access;
mod fsinfo;
mod fsstat;
mod getattr;
mod lookup;
mod null;
mod pathconf;
mod read;
mod readdir;
mod readonly;

use access::nfsproc3_access;
use fsinfo::nfsproc3_fsinfo;
use fsstat::nfsproc3_fsstat;
use getattr::nfsproc3_getattr;
use lookup::nfsproc3_lookup;
use null::nfsproc3_null;
use pathconf::nfsproc3_pathconf;
use read::nfsproc3_read;
use readdir::nfsproc3_readdir;
use readonly::nfsproc3_reject;

/// The NFS version 3 program served on the loopback transport.
pub struct NfsProgram;

#[async_trait]
impl RpcProgram for NfsProgram {
    fn program(&self) -> u32 {
        nfs3::PROGRAM
    }

    fn version(&self) -> u32 {
        nfs3::VERSION
    }

    async fn dispatch(
        &self,
        xid: u32,
        call: call_body,
        input: &mut Cursor<&[u8]>,
        output: &mut Vec<u8>,
        context: &Context,
    ) -> Result<(), anyhow::Error> {
        use crate::protocol::xdr::nfs3::NfsProcedure::*;

        let proc = nfs3::NfsProcedure::from_u32(call.proc).unwrap_or(INVALID);
        match proc {
            NFSPROC3_NULL => nfsproc3_null(xid, output)?,
            NFSPROC3_GETATTR => nfsproc3_getattr(xid, input, output, context).await?,
            NFSPROC3_LOOKUP => nfsproc3_lookup(xid, input, output, context).await?,
            NFSPROC3_ACCESS => nfsproc3_access(xid, input, output, context).await?,
            NFSPROC3_READ => nfsproc3_read(xid, input, output, context).await?,
            NFSPROC3_READDIR => nfsproc3_readdir(xid, input, output, context).await?,
            NFSPROC3_FSSTAT => nfsproc3_fsstat(xid, input, output, context).await?,
            NFSPROC3_FSINFO => nfsproc3_fsinfo(xid, input, output, context).await?,
            NFSPROC3_PATHCONF => nfsproc3_pathconf(xid, input, output, context).await?,
            NFSPROC3_SETATTR | NFSPROC3_WRITE | NFSPROC3_CREATE | NFSPROC3_MKDIR
            | NFSPROC3_SYMLINK | NFSPROC3_MKNOD | NFSPROC3_REMOVE | NFSPROC3_RMDIR
            | NFSPROC3_RENAME | NFSPROC3_LINK | NFSPROC3_READLINK | NFSPROC3_READDIRPLUS
            | NFSPROC3_COMMIT => nfsproc3_reject(xid, proc, output)?,
            INVALID => {
                warn!("Unimplemented NFS procedure {}", call.proc);
                xdr::rpc::proc_unavail_reply_message(xid).serialize(output)?;
            }
        }
        Ok(())
    }
}

/// Resolves `name` relative to the directory `dir`, collapsing the `.` and
/// `..` entries the NFS client is allowed to send.
pub(crate) fn join_child(dir: &str, name: &str) -> String {
    match name {
        "." => dir.to_string(),
        ".." => parent_of(dir),
        _ if dir == "/" => format!("/{name}"),
        _ => format!("{dir}/{name}"),
    }
}

/// Parent directory of `path`; the root is its own parent.
fn parent_of(path: &str) -> String {
    match path.rfind('/') {
        Some(0) | None => "/".to_string(),
        Some(idx) => path[..idx].to_string(),
    }
}
