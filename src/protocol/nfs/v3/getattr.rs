//! Implementation of the GETATTR procedure (procedure 1) for NFS version 3
//! protocol as defined in RFC 1813 section 3.3.1.
//!
//! GETATTR retrieves the attributes of the object a file handle names. It
//! is the hottest procedure in the protocol; the kernel client calls it
//! constantly to validate its caches.

use std::io::{Read, Write};

use tracing::debug;

use crate::handle;
use crate::protocol::rpc::Context;
use crate::protocol::xdr::{self, deserialize, nfs3, Serialize};

/// Handles NFSv3 GETATTR procedure (procedure 1)
///
/// Resolves the handle to a `(volume, path)` pair and returns the
/// volume's attributes for that path, with the `fsid` field rewritten to
/// the volume's registry identifier. An unresolvable handle gets
/// NFS3ERR_STALE.
pub async fn nfsproc3_getattr(
    xid: u32,
    input: &mut impl Read,
    output: &mut impl Write,
    context: &Context,
) -> Result<(), anyhow::Error> {
    let args = deserialize::<nfs3::file::GETATTR3args>(input)?;
    debug!("nfsproc3_getattr({:?},{:?})", xid, args);

    let path = handle::resolve(&context.registry, &args.object.data)
        .and_then(|resolved| Some((resolved.object_path()?.to_owned(), resolved)));
    let Some((path, resolved)) = path else {
        debug!("{:?} --> stale handle", xid);
        xdr::rpc::make_success_reply(xid).serialize(output)?;
        nfs3::nfsstat3::NFS3ERR_STALE.serialize(output)?;
        return Ok(());
    };

    match resolved.volume.getattr(&path).await {
        Ok(mut attr) => {
            attr.fsid = resolved.handle.fsid;
            xdr::rpc::make_success_reply(xid).serialize(output)?;
            nfs3::nfsstat3::NFS3_OK.serialize(output)?;
            attr.serialize(output)?;
        }
        Err(stat) => {
            debug!("nfsproc3_getattr error {:?} --> {:?}", xid, stat);
            xdr::rpc::make_success_reply(xid).serialize(output)?;
            stat.serialize(output)?;
        }
    }
    Ok(())
}
