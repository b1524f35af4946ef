//! RPC record framing and call dispatch as specified in RFC 5531
//! (previously RFC 1057 section 10).
//!
//! TCP is a byte stream, so RPC messages are delimited with the Record
//! Marking Standard: each fragment is prefixed by a four-byte header whose
//! low 31 bits carry the fragment length and whose high bit marks the last
//! fragment of the record. [`read_record`] reassembles a complete record,
//! [`write_fragment`] emits one, and [`dispatch_record`] turns a record
//! into the bytes of its reply by routing the call through the registered
//! program table.

use std::io::Cursor;

use anyhow::anyhow;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{trace, warn};

use crate::protocol::rpc::{self, Context};
use crate::protocol::xdr::{self, deserialize, Serialize};

/// Reads one complete record from the stream, reassembling fragments.
///
/// Fails when the accumulated record would exceed
/// [`rpc::MAX_RPC_RECORD_LENGTH`]; an end-of-stream before the first
/// header byte surfaces as the underlying I/O error.
pub async fn read_record(
    socket: &mut (impl AsyncRead + Unpin),
) -> Result<Vec<u8>, anyhow::Error> {
    let mut record = Vec::new();
    loop {
        let mut header_buf = [0_u8; 4];
        socket.read_exact(&mut header_buf).await?;
        let fragment_header = u32::from_be_bytes(header_buf);
        let is_last = (fragment_header & (1 << 31)) > 0;
        let length = (fragment_header & ((1 << 31) - 1)) as usize;
        trace!("Reading fragment length:{}, last:{}", length, is_last);
        if record.len().saturating_add(length) > rpc::MAX_RPC_RECORD_LENGTH {
            return Err(anyhow!(
                "RPC record length {} exceeds max {}",
                record.len().saturating_add(length),
                rpc::MAX_RPC_RECORD_LENGTH
            ));
        }
        let start_offset = record.len();
        record.resize(start_offset + length, 0);
        socket.read_exact(&mut record[start_offset..]).await?;
        if is_last {
            return Ok(record);
        }
    }
}

/// Writes `buf` to the stream as record-marked fragments.
///
/// Splits buffers larger than a single fragment can carry (2^31 - 1
/// bytes) and sets the last-fragment bit on the final one.
pub async fn write_fragment(
    socket: &mut (impl AsyncWrite + Unpin),
    buf: &[u8],
) -> Result<(), anyhow::Error> {
    const MAX_FRAGMENT_SIZE: usize = (1 << 31) - 1;

    let mut offset = 0;
    loop {
        let remaining = buf.len() - offset;
        let fragment_size = std::cmp::min(remaining, MAX_FRAGMENT_SIZE);
        let is_last = offset + fragment_size >= buf.len();

        let fragment_header =
            if is_last { fragment_size as u32 | (1 << 31) } else { fragment_size as u32 };
        socket.write_all(&fragment_header.to_be_bytes()).await?;

        trace!("Writing fragment length:{}, last:{}", fragment_size, is_last);
        socket.write_all(&buf[offset..offset + fragment_size]).await?;

        offset += fragment_size;
        if is_last {
            return Ok(());
        }
    }
}

/// Dispatches one reassembled RPC record and returns the reply bytes.
///
/// The reply is unframed; the caller wraps it with [`write_fragment`]. An
/// empty record or a record that is not a CALL is a protocol violation
/// and returns an error, which the connection handler treats as fatal for
/// that connection only.
pub async fn dispatch_record(
    data: &[u8],
    context: &Context,
) -> Result<Vec<u8>, anyhow::Error> {
    let mut input = Cursor::new(data);
    let mut output = Vec::new();
    let mut context = context.clone();
    handle_rpc(&mut input, &mut output, &mut context).await?;
    Ok(output)
}

/// Routes a single RPC call to the registered program that serves it.
///
/// 1. Deserializes the RPC message and rejects anything but a CALL
/// 2. Extracts AUTH_UNIX credentials when the client sent them
/// 3. Denies calls with an RPC version other than 2
/// 4. Looks the program number up in the registered program table;
///    unknown programs get PROG_UNAVAIL, known programs called with the
///    wrong version get PROG_MISMATCH
/// 5. Hands the call to the program's own procedure dispatcher
async fn handle_rpc(
    input: &mut Cursor<&[u8]>,
    output: &mut Vec<u8>,
    context: &mut Context,
) -> Result<(), anyhow::Error> {
    let recv = deserialize::<xdr::rpc::rpc_msg>(input)?;
    let xid = recv.xid;
    let xdr::rpc::rpc_body::CALL(call) = recv.body else {
        warn!("Unexpectedly received a Reply instead of a Call");
        return Err(anyhow!("Bad RPC Call format"));
    };

    if let xdr::rpc::auth_flavor::AUTH_UNIX = call.cred.flavor {
        context.auth = deserialize(&mut Cursor::new(&call.cred.body))?;
    }
    if call.rpcvers != 2 {
        warn!("Invalid RPC version {} != 2", call.rpcvers);
        xdr::rpc::rpc_vers_mismatch(xid).serialize(output)?;
        return Ok(());
    }

    // Clone the program handle out so no lock is held across the dispatch.
    let program = { context.programs.read().unwrap().lookup(call.prog) };
    match program {
        None => {
            warn!("Unknown RPC program number {}", call.prog);
            xdr::rpc::prog_unavail_reply_message(xid).serialize(output)?;
            Ok(())
        }
        Some(program) if call.vers != program.version() => {
            warn!(
                "Unsupported version {} for program {} (supported {})",
                call.vers,
                call.prog,
                program.version()
            );
            xdr::rpc::prog_mismatch_reply_message(xid, program.version())
                .serialize(output)?;
            Ok(())
        }
        Some(program) => program.dispatch(xid, call, input, output, context).await,
    }
}
