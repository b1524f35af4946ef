//! The loopback RPC server: one socket, one port, every volume.
//!
//! A [`LoopbackServer`] is a process-wide singleton. Binding it picks an
//! ephemeral port on 127.0.0.1 and registers the NFS and MOUNT programs
//! against that single transport; the port is then handed to
//! [`crate::mounter::mount`] so the kernel's NFS client knows where to
//! connect. All traffic for every registered volume flows through the one
//! dispatch loop - unmounting a volume never touches the server, which is
//! torn down only at process-wide shutdown.
//!
//! The dispatch loop blocks with no timeout waiting for socket activity
//! and re-checks a caller-supplied continuation predicate after every
//! dispatch round. That predicate is the loop's only cancellation
//! mechanism: shutdown is observed at round boundaries, never mid-round.

use std::io;
use std::sync::{Arc, RwLock};

use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Notify;
use tracing::{debug, info};

use crate::protocol::nfs::mount::MountProgram;
use crate::protocol::nfs::v3::NfsProgram;
use crate::protocol::rpc::{self, ProgramTable};
use crate::protocol::xdr;
use crate::registry::Registry;

/// The process-wide loopback NFS server.
///
/// Holds the bound listener, the registry shared with the mount control
/// path, and the table of registered RPC programs.
pub struct LoopbackServer {
    listener: TcpListener,
    port: u16,
    registry: Arc<Registry>,
    programs: Arc<RwLock<ProgramTable>>,
    dispatched: Arc<Notify>,
}

impl LoopbackServer {
    /// Binds a new server to an OS-assigned ephemeral port on 127.0.0.1
    /// and registers the NFS and MOUNT programs against it.
    ///
    /// The programs are never advertised to portmap/rpcbind; the kernel
    /// client learns the port directly through the mount parameter block.
    pub async fn bind(registry: Arc<Registry>) -> io::Result<LoopbackServer> {
        let listener = TcpListener::bind(("127.0.0.1", 0)).await?;
        let port = listener.local_addr()?.port();

        let mut table = ProgramTable::default();
        table.register(Arc::new(NfsProgram));
        table.register(Arc::new(MountProgram));

        info!("loopback NFS server listening on 127.0.0.1:{}", port);
        Ok(LoopbackServer {
            listener,
            port,
            registry,
            programs: Arc::new(RwLock::new(table)),
            dispatched: Arc::new(Notify::new()),
        })
    }

    /// The ephemeral port the server is listening on; pass this to
    /// [`crate::mounter::mount`].
    pub fn port(&self) -> u16 {
        self.port
    }

    /// The registry this server resolves file handles against.
    pub fn registry(&self) -> Arc<Registry> {
        self.registry.clone()
    }

    /// Runs the dispatch loop until `keep_running` returns false.
    ///
    /// Each iteration blocks, with no timeout, until there is work: a new
    /// connection to accept or a completed dispatch round on an existing
    /// connection. `keep_running` is re-checked after every wake-up, so a
    /// shutdown request is observed at the next round boundary. An accept
    /// interrupted by a signal is retried; any other accept failure
    /// terminates the loop with that error. On exit - clean or failed -
    /// both RPC programs are unregistered, so connections that are still
    /// open answer PROG_UNAVAIL from then on.
    ///
    /// The loop owns its execution context: run it on one dedicated task
    /// and keep mount/unmount syscalls off that context.
    pub async fn run_until<F>(&self, keep_running: F) -> io::Result<()>
    where
        F: Fn() -> bool + Send + Sync,
    {
        let result = loop {
            if !keep_running() {
                break Ok(());
            }
            tokio::select! {
                accepted = self.listener.accept() => {
                    match accepted {
                        Ok((socket, addr)) => {
                            let context = rpc::Context {
                                local_port: self.port,
                                client_addr: addr.to_string(),
                                auth: xdr::rpc::auth_unix::default(),
                                registry: self.registry.clone(),
                                programs: self.programs.clone(),
                                dispatched: self.dispatched.clone(),
                            };
                            info!("Accepting connection from {}", context.client_addr);
                            tokio::spawn(async move {
                                let _ = process_socket(socket, context).await;
                            });
                        }
                        Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                        Err(e) => break Err(e),
                    }
                }
                _ = self.dispatched.notified() => {}
            }
        };
        self.programs.write().unwrap().clear();
        debug!("dispatch loop finished, programs unregistered");
        result
    }
}

/// Serves one accepted connection: reads records, dispatches them, writes
/// replies, and signals the server loop after each round.
async fn process_socket(mut socket: TcpStream, context: rpc::Context) -> Result<(), anyhow::Error> {
    let _ = socket.set_nodelay(true);
    loop {
        let record = match rpc::read_record(&mut socket).await {
            Ok(record) => record,
            Err(e) => {
                // a client hanging up between records is a normal close
                let eof = e
                    .downcast_ref::<io::Error>()
                    .is_some_and(|io_err| io_err.kind() == io::ErrorKind::UnexpectedEof);
                if !eof {
                    debug!("connection to {} closed: {:?}", context.client_addr, e);
                }
                return Ok(());
            }
        };

        let outcome = rpc::dispatch_record(&record, &context).await;
        context.dispatched.notify_one();
        let reply = outcome?;
        if !reply.is_empty() {
            rpc::write_fragment(&mut socket, &reply).await?;
        }
    }
}
