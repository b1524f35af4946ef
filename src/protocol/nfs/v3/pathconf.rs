//! Implementation of the PATHCONF procedure (procedure 20) for NFS
//! version 3 protocol as defined in RFC 1813 section 3.3.20.
//!
//! PATHCONF reports POSIX pathconf-style limits. The values are uniform
//! across every volume (FSINFO advertises FSF_HOMOGENEOUS accordingly):
//! no hard links, 255-byte name components, case preserved.

use std::io::{Read, Write};

use tracing::debug;

use crate::handle;
use crate::protocol::rpc::Context;
use crate::protocol::xdr::{self, deserialize, nfs3, Serialize};

/// Handles NFSv3 PATHCONF procedure (procedure 20).
pub async fn nfsproc3_pathconf(
    xid: u32,
    input: &mut impl Read,
    output: &mut impl Write,
    context: &Context,
) -> Result<(), anyhow::Error> {
    let args = deserialize::<nfs3::fs::PATHCONF3args>(input)?;
    debug!("nfsproc3_pathconf({:?},{:?})", xid, args);

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

    let response = nfs3::fs::PATHCONF3resok {
        obj_attributes: obj_attr,
        linkmax: 1,
        name_max: 255,
        no_trunc: true,
        chown_restricted: true,
        case_insensitive: false,
        case_preserving: true,
    };
    debug!("{:?} --> {:?}", xid, response);
    xdr::rpc::make_success_reply(xid).serialize(output)?;
    nfs3::nfsstat3::NFS3_OK.serialize(output)?;
    response.serialize(output)?;
    Ok(())
}
