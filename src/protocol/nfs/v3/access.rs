//! Implementation of the ACCESS procedure (procedure 4) for NFS version 3
//! protocol as defined in RFC 1813 section 3.3.4.
//!
//! ACCESS reports which of the permissions the client asked about it
//! actually holds. The export is read-only and the mount disables execute
//! permission, so the grantable set is read and lookup.

use std::io::{Read, Write};

use tracing::debug;

use crate::handle;
use crate::protocol::rpc::Context;
use crate::protocol::xdr::{self, deserialize, nfs3, Serialize};

/// Handles NFSv3 ACCESS procedure (procedure 4)
///
/// Grants the intersection of the requested permissions with
/// `ACCESS3_READ | ACCESS3_LOOKUP`.
pub async fn nfsproc3_access(
    xid: u32,
    input: &mut impl Read,
    output: &mut impl Write,
    context: &Context,
) -> Result<(), anyhow::Error> {
    let args = deserialize::<nfs3::file::ACCESS3args>(input)?;
    debug!("nfsproc3_access({:?},{:?})", xid, args);

    let path = handle::resolve(&context.registry, &args.object.data)
        .and_then(|resolved| Some((resolved.object_path()?.to_owned(), resolved)));
    let Some((path, resolved)) = path else {
        xdr::rpc::make_success_reply(xid).serialize(output)?;
        nfs3::nfsstat3::NFS3ERR_STALE.serialize(output)?;
        nfs3::post_op_attr::Void.serialize(output)?;
        return Ok(());
    };

    let obj_attr = match resolved.volume.getattr(&path).await {
        Ok(mut attr) => {
            attr.fsid = resolved.handle.fsid;
            nfs3::post_op_attr::attributes(attr)
        }
        Err(_) => nfs3::post_op_attr::Void,
    };

    let response = nfs3::file::ACCESS3resok {
        obj_attributes: obj_attr,
        access: args.access & (nfs3::ACCESS3_READ | nfs3::ACCESS3_LOOKUP),
    };
    debug!("{:?} --> {:?}", xid, response);
    xdr::rpc::make_success_reply(xid).serialize(output)?;
    nfs3::nfsstat3::NFS3_OK.serialize(output)?;
    response.serialize(output)?;
    Ok(())
}
