//! Implementation of the MNT procedure (procedure 1) for MOUNT version 3
//! protocol as defined in RFC 1813 Appendix I section I.4.2.
//!
//! MNT hands an NFS client the initial file handle of an export. On this
//! server each registered volume is exported under the path `/<fsid>`, so
//! the procedure strips the slashes, parses the filesystem identifier, and
//! answers with the volume's encoded root handle. Paths that do not parse
//! or that name an unregistered identifier get MNT3ERR_NOENT.

use std::io::{Read, Write};

use num_traits::cast::ToPrimitive;
use tracing::debug;

use crate::handle::Handle;
use crate::protocol::rpc::Context;
use crate::protocol::xdr::{self, deserialize, mount, Serialize};
use crate::vfs::FsId;

/// Handles MOUNT protocol MNT procedure (procedure 1)
///
/// Takes the directory path the client wants to mount and returns the
/// root file handle of the volume it names, together with the accepted
/// authentication flavors.
pub fn mountproc3_mnt(
    xid: u32,
    input: &mut impl Read,
    output: &mut impl Write,
    context: &Context,
) -> Result<(), anyhow::Error> {
    let path = deserialize::<mount::dirpath>(input)?;
    let utf8path = std::str::from_utf8(&path).unwrap_or_default();
    debug!("mountproc3_mnt({:?},{:?})", xid, utf8path);

    let export = utf8path.trim().trim_start_matches('/').trim_end_matches('/');
    let volume = export
        .parse::<FsId>()
        .ok()
        .and_then(|fsid| context.registry.get(fsid));

    match volume {
        Some(volume) => {
            let fsid = volume.identifier();
            let response = mount::mountres3_ok {
                fhandle: Handle::root(fsid).encode(),
                auth_flavors: vec![
                    xdr::rpc::auth_flavor::AUTH_NULL.to_u32().unwrap(),
                    xdr::rpc::auth_flavor::AUTH_UNIX.to_u32().unwrap(),
                ],
            };
            debug!("{:?} --> {:?}", xid, response);
            xdr::rpc::make_success_reply(xid).serialize(output)?;
            mount::mountstat3::MNT3_OK.serialize(output)?;
            response.serialize(output)?;
        }
        None => {
            debug!("{:?} --> no export matching {:?}", xid, utf8path);
            xdr::rpc::make_success_reply(xid).serialize(output)?;
            mount::mountstat3::MNT3ERR_NOENT.serialize(output)?;
        }
    }
    Ok(())
}
