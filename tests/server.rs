use std::io::Cursor;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

mod support;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::time::timeout;

use loopmount::xdr::nfs3::NfsProcedure;
use loopmount::xdr::{self, deserialize, mount, nfs3, Serialize};
use loopmount::{LoopbackServer, Registry};

use support::DemoVolume;

struct RunningServer {
    port: u16,
    running: Arc<AtomicBool>,
    task: tokio::task::JoinHandle<std::io::Result<()>>,
}

async fn start_server(registry: Arc<Registry>) -> RunningServer {
    let server = LoopbackServer::bind(registry).await.expect("bind server");
    let port = server.port();
    assert_ne!(port, 0);

    let running = Arc::new(AtomicBool::new(true));
    let flag = running.clone();
    let task =
        tokio::spawn(async move { server.run_until(move || flag.load(Ordering::SeqCst)).await });
    RunningServer { port, running, task }
}

/// Sends one framed call and returns the body of the framed reply.
async fn roundtrip(
    stream: &mut TcpStream,
    xid: u32,
    prog: u32,
    vers: u32,
    proc: u32,
    args: &[u8],
) -> Vec<u8> {
    let call = xdr::rpc::call_body {
        rpcvers: 2,
        prog,
        vers,
        proc,
        cred: xdr::rpc::opaque_auth::default(),
        verf: xdr::rpc::opaque_auth::default(),
    };
    let msg = xdr::rpc::rpc_msg { xid, body: xdr::rpc::rpc_body::CALL(call) };
    let mut record = Vec::new();
    msg.serialize(&mut record).expect("serialize call");
    record.extend_from_slice(args);

    let header = (1_u32 << 31) | (record.len() as u32);
    stream.write_all(&header.to_be_bytes()).await.expect("write header");
    stream.write_all(&record).await.expect("write record");

    let mut header_buf = [0_u8; 4];
    timeout(Duration::from_secs(5), stream.read_exact(&mut header_buf))
        .await
        .expect("reply timeout")
        .expect("read reply header");
    let reply_header = u32::from_be_bytes(header_buf);
    assert!(reply_header & (1 << 31) != 0, "single-fragment reply expected");
    let len = (reply_header & ((1 << 31) - 1)) as usize;
    let mut reply = vec![0_u8; len];
    timeout(Duration::from_secs(5), stream.read_exact(&mut reply))
        .await
        .expect("reply timeout")
        .expect("read reply body");
    reply
}

fn expect_success_header<'a>(reply: &'a [u8], xid: u32) -> Cursor<&'a [u8]> {
    let mut cursor = Cursor::new(reply);
    let msg = deserialize::<xdr::rpc::rpc_msg>(&mut cursor).expect("reply header");
    assert_eq!(msg.xid, xid);
    match msg.body {
        xdr::rpc::rpc_body::REPLY(xdr::rpc::reply_body::MSG_ACCEPTED(accepted)) => {
            match accepted.reply_data {
                xdr::rpc::accept_body::SUCCESS => {}
                other => panic!("expected SUCCESS, got {:?}", other),
            }
        }
        other => panic!("expected MSG_ACCEPTED, got {:?}", other),
    }
    cursor
}

#[tokio::test]
async fn serves_mount_and_nfs_programs_on_one_port() {
    let registry = Arc::new(Registry::new());
    registry.put(Arc::new(DemoVolume::new(3, "/mnt/demo"))).expect("put");
    let server = start_server(registry).await;

    let mut stream =
        TcpStream::connect(("127.0.0.1", server.port)).await.expect("connect");

    // MNT hands out the root handle for export /3
    let mut args = Vec::new();
    b"/3".as_slice().serialize(&mut args).expect("dirpath");
    let reply = roundtrip(
        &mut stream,
        1,
        mount::PROGRAM,
        mount::VERSION,
        mount::MountProcedure::MOUNTPROC3_MNT as u32,
        &args,
    )
    .await;
    let mut results = expect_success_header(&reply, 1);
    let stat = deserialize::<mount::mountstat3>(&mut results).expect("status");
    assert_eq!(stat, mount::mountstat3::MNT3_OK);
    let res = deserialize::<mount::mountres3_ok>(&mut results).expect("resok");
    assert_eq!(res.fhandle, b"3");

    // the handle MNT returned routes GETATTR to the same volume
    let mut args = Vec::new();
    nfs3::nfs_fh3 { data: res.fhandle }.serialize(&mut args).expect("fh");
    let reply = roundtrip(
        &mut stream,
        2,
        nfs3::PROGRAM,
        nfs3::VERSION,
        NfsProcedure::NFSPROC3_GETATTR as u32,
        &args,
    )
    .await;
    let mut results = expect_success_header(&reply, 2);
    let stat = deserialize::<nfs3::nfsstat3>(&mut results).expect("status");
    assert_eq!(stat, nfs3::nfsstat3::NFS3_OK);
    let attr = deserialize::<nfs3::fattr3>(&mut results).expect("attributes");
    assert_eq!(attr.ftype, nfs3::ftype3::NF3DIR);
    assert_eq!(attr.fsid, 3);

    server.running.store(false, Ordering::SeqCst);
    // one more dispatch round so the loop re-checks its predicate; the
    // reply may already be PROG_UNAVAIL if the loop won the race and
    // unregistered the programs first
    let _ = roundtrip(&mut stream, 3, nfs3::PROGRAM, nfs3::VERSION, 0, &[]).await;

    let joined = timeout(Duration::from_secs(5), server.task).await.expect("loop exit");
    joined.expect("join").expect("clean shutdown");
}

#[tokio::test]
async fn traffic_for_multiple_volumes_flows_through_one_loop() {
    let registry = Arc::new(Registry::new());
    registry.put(Arc::new(DemoVolume::new(3, "/mnt/three"))).expect("put");
    registry.put(Arc::new(DemoVolume::new(8, "/mnt/eight"))).expect("put");
    let server = start_server(registry).await;

    let mut stream =
        TcpStream::connect(("127.0.0.1", server.port)).await.expect("connect");

    for (xid, fsid) in [(10_u32, 3_u64), (11, 8)] {
        let mut args = Vec::new();
        nfs3::nfs_fh3 { data: fsid.to_string().into_bytes() }
            .serialize(&mut args)
            .expect("fh");
        let reply = roundtrip(
            &mut stream,
            xid,
            nfs3::PROGRAM,
            nfs3::VERSION,
            NfsProcedure::NFSPROC3_GETATTR as u32,
            &args,
        )
        .await;
        let mut results = expect_success_header(&reply, xid);
        let stat = deserialize::<nfs3::nfsstat3>(&mut results).expect("status");
        assert_eq!(stat, nfs3::nfsstat3::NFS3_OK);
        let attr = deserialize::<nfs3::fattr3>(&mut results).expect("attributes");
        assert_eq!(attr.fsid, fsid);
    }

    server.running.store(false, Ordering::SeqCst);
    let _ = roundtrip(&mut stream, 12, nfs3::PROGRAM, nfs3::VERSION, 0, &[]).await;
    let joined = timeout(Duration::from_secs(5), server.task).await.expect("loop exit");
    joined.expect("join").expect("clean shutdown");
}

#[tokio::test]
async fn loop_exits_at_the_next_dispatch_round_after_shutdown() {
    let registry = Arc::new(Registry::new());
    let server = start_server(registry).await;

    let mut stream =
        TcpStream::connect(("127.0.0.1", server.port)).await.expect("connect");

    // the loop keeps blocking while the predicate stays true
    let reply = roundtrip(&mut stream, 1, nfs3::PROGRAM, nfs3::VERSION, 0, &[]).await;
    expect_success_header(&reply, 1);
    assert!(!server.task.is_finished());

    server.running.store(false, Ordering::SeqCst);
    // shutdown is only observed at a round boundary, so drive one round
    let _ = roundtrip(&mut stream, 2, nfs3::PROGRAM, nfs3::VERSION, 0, &[]).await;

    let joined = timeout(Duration::from_secs(5), server.task).await.expect("loop exit");
    joined.expect("join").expect("clean shutdown");
}
