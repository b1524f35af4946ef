//! Implementation of the FSINFO procedure (procedure 19) for NFS
//! version 3 protocol as defined in RFC 1813 section 3.3.19.
//!
//! FSINFO reports the server's static capabilities. The transfer sizes
//! advertised here are the same fixed values the mount orchestrator
//! negotiates in the OS mount parameter block, so client and server agree
//! on them from both directions.

use std::io::{Read, Write};

use tracing::debug;

use crate::handle;
use crate::mounter::{DIR_MAX_LEN, READ_MAX_LEN, WRITE_MAX_LEN};
use crate::protocol::rpc::Context;
use crate::protocol::xdr::{self, deserialize, nfs3, Serialize};

/// Handles NFSv3 FSINFO procedure (procedure 19).
pub async fn nfsproc3_fsinfo(
    xid: u32,
    input: &mut impl Read,
    output: &mut impl Write,
    context: &Context,
) -> Result<(), anyhow::Error> {
    let args = deserialize::<nfs3::fs::FSINFO3args>(input)?;
    debug!("nfsproc3_fsinfo({:?},{:?})", xid, args);

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

    let response = nfs3::fs::FSINFO3resok {
        obj_attributes: obj_attr,
        rtmax: READ_MAX_LEN,
        rtpref: READ_MAX_LEN,
        rtmult: 4096,
        wtmax: WRITE_MAX_LEN,
        wtpref: WRITE_MAX_LEN,
        wtmult: 4096,
        dtpref: DIR_MAX_LEN,
        maxfilesize: 128 * 1024 * 1024 * 1024,
        time_delta: nfs3::nfstime3 { seconds: 0, nseconds: 1_000_000 },
        properties: nfs3::fs::FSF_HOMOGENEOUS,
    };
    debug!("{:?} --> {:?}", xid, response);
    xdr::rpc::make_success_reply(xid).serialize(output)?;
    nfs3::nfsstat3::NFS3_OK.serialize(output)?;
    response.serialize(output)?;
    Ok(())
}
