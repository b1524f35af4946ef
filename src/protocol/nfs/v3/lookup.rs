//! Implementation of the LOOKUP procedure (procedure 3) for NFS version 3
//! protocol as defined in RFC 1813 section 3.3.3.
//!
//! LOOKUP translates one name within a directory into a file handle. This
//! is where new handles are minted: the name is resolved to a
//! backend-local file id, and the reply handle encodes that id together
//! with the volume's filesystem identifier so every later request can be
//! routed back.

use std::io::{Read, Write};

use tracing::debug;

use crate::handle::{self, Handle};
use crate::protocol::nfs::v3::join_child;
use crate::protocol::rpc::Context;
use crate::protocol::xdr::{self, deserialize, nfs3, Serialize};

/// Handles NFSv3 LOOKUP procedure (procedure 3)
///
/// Takes a directory handle and a name; returns the handle and attributes
/// of the named object plus the directory's attributes. An unknown name
/// gets NFS3ERR_NOENT, an unresolvable directory handle NFS3ERR_STALE.
pub async fn nfsproc3_lookup(
    xid: u32,
    input: &mut impl Read,
    output: &mut impl Write,
    context: &Context,
) -> Result<(), anyhow::Error> {
    let args = deserialize::<nfs3::file::LOOKUP3args>(input)?;
    debug!("nfsproc3_lookup({:?},{:?})", xid, args);

    let dir = handle::resolve(&context.registry, &args.what.dir.data)
        .and_then(|resolved| Some((resolved.object_path()?.to_owned(), resolved)));
    let Some((dir_path, resolved)) = dir else {
        debug!("{:?} --> stale directory handle", xid);
        xdr::rpc::make_success_reply(xid).serialize(output)?;
        nfs3::nfsstat3::NFS3ERR_STALE.serialize(output)?;
        nfs3::post_op_attr::Void.serialize(output)?;
        return Ok(());
    };

    let volume = &resolved.volume;
    let fsid = resolved.handle.fsid;
    let dir_attr = match volume.getattr(&dir_path).await {
        Ok(mut attr) => {
            attr.fsid = fsid;
            nfs3::post_op_attr::attributes(attr)
        }
        Err(_) => nfs3::post_op_attr::Void,
    };

    let Ok(name) = std::str::from_utf8(&args.what.name) else {
        xdr::rpc::make_success_reply(xid).serialize(output)?;
        nfs3::nfsstat3::NFS3ERR_NOENT.serialize(output)?;
        dir_attr.serialize(output)?;
        return Ok(());
    };
    let child_path = join_child(&dir_path, name);

    match volume.file_id(&child_path) {
        Some(file) => {
            let obj_attr = match volume.getattr(&child_path).await {
                Ok(mut attr) => {
                    attr.fsid = fsid;
                    nfs3::post_op_attr::attributes(attr)
                }
                Err(_) => nfs3::post_op_attr::Void,
            };
            let response = nfs3::file::LOOKUP3resok {
                object: nfs3::nfs_fh3 { data: Handle::file(fsid, file).encode() },
                obj_attributes: obj_attr,
                dir_attributes: dir_attr,
            };
            debug!("{:?} --> {:?}", xid, response);
            xdr::rpc::make_success_reply(xid).serialize(output)?;
            nfs3::nfsstat3::NFS3_OK.serialize(output)?;
            response.serialize(output)?;
        }
        None => {
            debug!("{:?} --> NFS3ERR_NOENT for {:?}", xid, child_path);
            xdr::rpc::make_success_reply(xid).serialize(output)?;
            nfs3::nfsstat3::NFS3ERR_NOENT.serialize(output)?;
            dir_attr.serialize(output)?;
        }
    }
    Ok(())
}
