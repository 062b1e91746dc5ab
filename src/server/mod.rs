pub mod action;
pub mod invoke;

use crate::msg::{reply::Reply, Inbound};
use action::{ActionError, Executor};
use invoke::Invoker;
use log::{debug, error, warn};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader},
    net::{
        unix::{OwnedReadHalf, OwnedWriteHalf},
        UnixListener, UnixStream,
    },
    sync::mpsc,
    task,
};

/// Replies queued per connection before the reader applies backpressure
const OUTBOUND_BUFFER: usize = 64;

/// Represents the helper after listening has begun.
pub struct Server {
    /// Socket path the server is bound to
    path: PathBuf,

    /// Handle for the accept loop
    accept_handle: task::JoinHandle<()>,
}

impl Server {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Binds the helper socket and begins accepting peer connections, one
    /// handler per connection. A stale socket file left by a previous
    /// instance is removed first.
    pub async fn listen<I>(
        path: impl AsRef<Path>,
        invoker: I,
    ) -> io::Result<Server>
    where
        I: Invoker + 'static,
    {
        let path = path.as_ref().to_path_buf();
        if path.exists() {
            std::fs::remove_file(&path)?;
        }

        let listener = UnixListener::bind(&path)?;
        let invoker = Arc::new(invoker);
        let accept_handle = tokio::spawn(accept_loop(listener, invoker));

        Ok(Server {
            path,
            accept_handle,
        })
    }

    /// Waits for the accept loop, which runs for the life of the service.
    pub async fn wait(self) -> Result<(), task::JoinError> {
        self.accept_handle.await
    }
}

async fn accept_loop<I: Invoker + 'static>(
    listener: UnixListener,
    invoker: Arc<I>,
) {
    loop {
        match listener.accept().await {
            Ok((stream, _addr)) => {
                debug!("Accepted peer connection");
                tokio::spawn(handle_connection(Arc::clone(&invoker), stream));
            }
            Err(x) => {
                // Accept failures are connection-level, not service-level
                error!("Failed to accept connection: {}", x);
            }
        }
    }
}

/// Serves one peer until it disconnects. Frames are handled one at a time,
/// so requests on a single connection serialize behind each other's
/// privileged call while other connections proceed independently.
async fn handle_connection<I: Invoker + 'static>(
    invoker: Arc<I>,
    stream: UnixStream,
) {
    let (read_half, write_half) = stream.into_split();
    let (tx, rx) = mpsc::channel::<Vec<u8>>(OUTBOUND_BUFFER);
    let outbound_handle = tokio::spawn(write_replies(write_half, rx));

    let executor = Executor::new(invoker);
    inbound_loop(&executor, read_half, tx).await;

    // Dropping tx above ends the writer once queued replies are flushed
    if let Err(x) = outbound_handle.await {
        error!("Reply writer task failed: {}", x);
    }
}

async fn inbound_loop<I: Invoker>(
    executor: &Executor<I>,
    read_half: OwnedReadHalf,
    tx: mpsc::Sender<Vec<u8>>,
) {
    let mut lines = BufReader::new(read_half).lines();
    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => {
                debug!("Peer disconnected");
                return;
            }
            Err(x) => {
                // Connection invalid; nothing more can be answered
                warn!("Connection read failed: {}", x);
                return;
            }
        };

        let inbound = match Inbound::classify(&line) {
            Some(inbound) => inbound,
            None => {
                // Not the request shape; dropped without a reply
                debug!("Ignoring frame that is not a request object");
                continue;
            }
        };

        let reply_tx = tx.clone();
        let result = executor
            .execute(inbound, |reply| respond(reply_tx, reply))
            .await;
        match result {
            Ok(()) => {}
            Err(ActionError::RespondFailed) => {
                warn!("Peer stopped reading replies");
                return;
            }
            Err(x) => error!("Failed to execute action: {}", x),
        }
    }
}

async fn respond(
    tx: mpsc::Sender<Vec<u8>>,
    reply: Reply,
) -> Result<(), ActionError> {
    let mut data = reply.to_vec().map_err(ActionError::EncodeMsg)?;
    data.push(b'\n');
    tx.send(data).await.map_err(|_| ActionError::RespondFailed)
}

async fn write_replies(
    mut write_half: OwnedWriteHalf,
    mut rx: mpsc::Receiver<Vec<u8>>,
) {
    while let Some(data) = rx.recv().await {
        if let Err(x) = write_half.write_all(&data).await {
            warn!("Failed to send reply: {}", x);
            return;
        }
    }
}
