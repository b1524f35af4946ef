//! Implementation of the READDIR procedure (procedure 16) for NFS
//! version 3 protocol as defined in RFC 1813 section 3.3.16.
//!
//! READDIR pages through a directory under a byte budget rather than an
//! entry count: the client's cookie says how many entries it has already
//! consumed, `dircount` bounds the size of the reply, and the server
//! returns as many further entries as fit. The entries come from the
//! volume as a [`crate::contents::DirContents`] list; each one is given
//! its backend file id and a cookie of its position plus one, so the next
//! request resumes exactly after it.

use std::io::{Read, Write};

use tracing::{debug, error, trace};

use crate::handle;
use crate::protocol::nfs::v3::join_child;
use crate::protocol::rpc::Context;
use crate::protocol::xdr::{self, deserialize, nfs3, Serialize};

/// Slack kept out of the byte budget for the list terminator and eof flag.
const RESPONSE_TAIL_BYTES: usize = 128;

/// Handles NFSv3 READDIR procedure (procedure 16)
///
/// Lists the directory the handle names, starting after the entry the
/// cookie points at, truncating to the client's byte budget. The eof flag
/// is only set when every remaining entry was written.
pub async fn nfsproc3_readdir(
    xid: u32,
    input: &mut impl Read,
    output: &mut impl Write,
    context: &Context,
) -> Result<(), anyhow::Error> {
    let args = deserialize::<nfs3::dir::READDIR3args>(input)?;
    debug!("nfsproc3_readdir({:?},{:?})", xid, args);

    let dir = handle::resolve(&context.registry, &args.dir.data)
        .and_then(|resolved| Some((resolved.object_path()?.to_owned(), resolved)));
    let Some((dir_path, resolved)) = dir else {
        xdr::rpc::make_success_reply(xid).serialize(output)?;
        nfs3::nfsstat3::NFS3ERR_STALE.serialize(output)?;
        nfs3::post_op_attr::Void.serialize(output)?;
        return Ok(());
    };

    let volume = &resolved.volume;
    let dir_attr = match volume.getattr(&dir_path).await {
        Ok(mut attr) => {
            attr.fsid = resolved.handle.fsid;
            nfs3::post_op_attr::attributes(attr)
        }
        Err(_) => nfs3::post_op_attr::Void,
    };

    let contents = match volume.readdir(&dir_path).await {
        Ok(contents) => contents,
        Err(stat) => {
            error!("nfsproc3_readdir error {:?} --> {:?}", xid, stat);
            xdr::rpc::make_success_reply(xid).serialize(output)?;
            stat.serialize(output)?;
            dir_attr.serialize(output)?;
            return Ok(());
        }
    };

    let start = args.cookie as usize;
    let max_bytes = (args.dircount as usize).saturating_sub(RESPONSE_TAIL_BYTES);
    let mut entries_buf: Vec<u8> = Vec::new();
    let mut all_entries_written = true;
    let mut written = 0;

    for (index, name) in contents.iter().enumerate().skip(start) {
        let child_path = join_child(&dir_path, name);
        // entries whose file id vanished between readdir and now are elided
        let Some(file) = volume.file_id(&child_path) else {
            continue;
        };
        let entry = nfs3::dir::entry3 {
            fileid: file as nfs3::fileid3,
            name: name.into(),
            cookie: (index + 1) as nfs3::cookie3,
        };
        let mut entry_buf: Vec<u8> = Vec::new();
        // TRUE marker that another list node follows
        true.serialize(&mut entry_buf)?;
        entry.serialize(&mut entry_buf)?;
        if entries_buf.len() + entry_buf.len() > max_bytes {
            trace!(" -- insufficient space, truncating at {:?}", entry.name);
            all_entries_written = false;
            break;
        }
        entries_buf.extend_from_slice(&entry_buf);
        written += 1;
    }

    debug!(
        "readdir {:?}: start at {}, flushing {} entries, complete {}",
        dir_path, start, written, all_entries_written
    );

    xdr::rpc::make_success_reply(xid).serialize(output)?;
    nfs3::nfsstat3::NFS3_OK.serialize(output)?;
    dir_attr.serialize(output)?;
    nfs3::cookieverf3::default().serialize(output)?;
    output.write_all(&entries_buf)?;
    // FALSE terminator of the entry list
    false.serialize(output)?;
    all_entries_written.serialize(output)?;
    Ok(())
}
