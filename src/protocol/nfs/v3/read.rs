//! Implementation of the READ procedure (procedure 6) for NFS version 3
//! protocol as defined in RFC 1813 section 3.3.6.
//!
//! READ retrieves data from a regular file: the client names the file by
//! handle and supplies an offset and byte count, the reply carries the
//! data, the actual count, and an end-of-file flag.

use std::io::{Read, Write};

use tracing::{debug, error};

use crate::handle;
use crate::protocol::rpc::Context;
use crate::protocol::xdr::{self, deserialize, nfs3, Serialize};

/// Handles NFSv3 READ procedure (procedure 6)
///
/// Resolves the handle, reads from the owning volume, and replies with
/// the data plus the file's post-operation attributes.
pub async fn nfsproc3_read(
    xid: u32,
    input: &mut impl Read,
    output: &mut impl Write,
    context: &Context,
) -> Result<(), anyhow::Error> {
    let args = deserialize::<nfs3::file::READ3args>(input)?;
    debug!("nfsproc3_read({:?},{:?})", xid, args);

    let path = handle::resolve(&context.registry, &args.file.data)
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

    match resolved.volume.read(&path, args.offset, args.count).await {
        Ok((bytes, eof)) => {
            let response = nfs3::file::READ3resok {
                file_attributes: obj_attr,
                count: bytes.len() as u32,
                eof,
                data: bytes,
            };
            xdr::rpc::make_success_reply(xid).serialize(output)?;
            nfs3::nfsstat3::NFS3_OK.serialize(output)?;
            response.serialize(output)?;
        }
        Err(stat) => {
            error!("nfsproc3_read error {:?} --> {:?}", xid, stat);
            xdr::rpc::make_success_reply(xid).serialize(output)?;
            stat.serialize(output)?;
            obj_attr.serialize(output)?;
        }
    }
    Ok(())
}
