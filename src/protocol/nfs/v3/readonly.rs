//! Rejection replies for the procedures a read-only export refuses.
//!
//! Modifying procedures are answered with NFS3ERR_ROFS, the few
//! unprovided read procedures with NFS3ERR_NOTSUPP. Arguments are not
//! decoded - each record is a self-contained buffer, so unread argument
//! bytes are simply discarded - but every failure body carries the
//! attribute placeholders its procedure's resfail shape prescribes, so
//! clients can parse the reply.

use std::io::Write;

use tracing::warn;

use crate::protocol::xdr::nfs3::NfsProcedure;
use crate::protocol::xdr::{self, nfs3, Serialize};

/// Refuses a procedure the read-only export does not serve, with the
/// protocol-correct failure body for that procedure.
pub fn nfsproc3_reject(
    xid: u32,
    proc: NfsProcedure,
    output: &mut impl Write,
) -> Result<(), anyhow::Error> {
    use crate::protocol::xdr::nfs3::NfsProcedure::*;

    warn!("refusing {:?} on read-only export, xid {:?}", proc, xid);
    xdr::rpc::make_success_reply(xid).serialize(output)?;
    match proc {
        // resfail: wcc_data of the target file
        NFSPROC3_SETATTR | NFSPROC3_WRITE | NFSPROC3_COMMIT => {
            nfs3::nfsstat3::NFS3ERR_ROFS.serialize(output)?;
            nfs3::wcc_data::default().serialize(output)?;
        }
        // resfail: wcc_data of the directory
        NFSPROC3_CREATE | NFSPROC3_MKDIR | NFSPROC3_SYMLINK | NFSPROC3_MKNOD
        | NFSPROC3_REMOVE | NFSPROC3_RMDIR => {
            nfs3::nfsstat3::NFS3ERR_ROFS.serialize(output)?;
            nfs3::wcc_data::default().serialize(output)?;
        }
        // resfail: wcc_data of both directories
        NFSPROC3_RENAME => {
            nfs3::nfsstat3::NFS3ERR_ROFS.serialize(output)?;
            nfs3::wcc_data::default().serialize(output)?;
            nfs3::wcc_data::default().serialize(output)?;
        }
        // resfail: file attributes plus directory wcc_data
        NFSPROC3_LINK => {
            nfs3::nfsstat3::NFS3ERR_NOTSUPP.serialize(output)?;
            nfs3::post_op_attr::Void.serialize(output)?;
            nfs3::wcc_data::default().serialize(output)?;
        }
        // resfail: symlink attributes
        NFSPROC3_READLINK | NFSPROC3_READDIRPLUS => {
            nfs3::nfsstat3::NFS3ERR_NOTSUPP.serialize(output)?;
            nfs3::post_op_attr::Void.serialize(output)?;
        }
        _ => {
            nfs3::nfsstat3::NFS3ERR_NOTSUPP.serialize(output)?;
        }
    }
    Ok(())
}
