//! Implementation of the FSSTAT procedure (procedure 18) for NFS
//! version 3 protocol as defined in RFC 1813 section 3.3.18.
//!
//! FSSTAT reports volatile file system statistics. Backend volumes have
//! no real block device behind them, so the reply advertises a fixed
//! capacity with no free space, which is what a read-only export looks
//! like to `df`.

use std::io::{Read, Write};

use tracing::debug;

use crate::handle;
use crate::protocol::rpc::Context;
use crate::protocol::xdr::{self, deserialize, nfs3, Serialize};

/// Handles NFSv3 FSSTAT procedure (procedure 18).
pub async fn nfsproc3_fsstat(
    xid: u32,
    input: &mut impl Read,
    output: &mut impl Write,
    context: &Context,
) -> Result<(), anyhow::Error> {
    let args = deserialize::<nfs3::fs::FSSTAT3args>(input)?;
    debug!("nfsproc3_fsstat({:?},{:?})", xid, args);

    let path = handle::resolve(&context.registry, &args.fsroot.data)
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

    let response = nfs3::fs::FSSTAT3resok {
        obj_attributes: obj_attr,
        tbytes: 8 * 1024 * 1024 * 1024,
        fbytes: 0,
        abytes: 0,
        tfiles: 1024 * 1024,
        ffiles: 0,
        afiles: 0,
        invarsec: 0,
    };
    debug!("{:?} --> {:?}", xid, response);
    xdr::rpc::make_success_reply(xid).serialize(output)?;
    nfs3::nfsstat3::NFS3_OK.serialize(output)?;
    response.serialize(output)?;
    Ok(())
}
