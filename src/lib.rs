mod client;
mod msg;
mod op;
mod server;

pub use client::{AskError, Client, DEFAULT_TIMEOUT};
pub use msg::{
    reply::{FailureArgs, Reply, Status, SuccessArgs},
    request::{
        ExecuteArgs, FileOperationArgs, MountArgs, Request, UnmountArgs,
    },
    Inbound, MsgError,
};
pub use op::{ExecOp, FileOp, MountOp, Op, UnmountOp, ValidateError};
pub use server::{
    invoke::{Invocation, Invoker, ProcessInvoker},
    Server,
};

use log::{error, info};
use std::io;
use std::path::PathBuf;
use tokio::signal::unix::{signal, SignalKind};

/// Name the service reports in its startup log
pub const SERVICE_NAME: &str = "privd";
pub const SERVICE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Socket served unless the environment overrides it
pub const DEFAULT_SOCKET_PATH: &str = "/var/run/privd.sock";
pub const SOCKET_PATH_ENV: &str = "PRIVD_SOCKET";

pub fn socket_path() -> PathBuf {
    std::env::var_os(SOCKET_PATH_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SOCKET_PATH))
}

/// Runs the helper service until the host signals termination. On SIGTERM
/// or SIGINT the process stops serving right away; in-flight requests are
/// dropped without replies.
pub async fn run() -> io::Result<()> {
    let server = Server::listen(socket_path(), ProcessInvoker).await?;
    info!(
        "{} {} listening on {}",
        SERVICE_NAME,
        SERVICE_VERSION,
        server.path().display()
    );

    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigint = signal(SignalKind::interrupt())?;
    tokio::select! {
        _ = sigterm.recv() => info!("Termination signal received; exiting"),
        _ = sigint.recv() => info!("Interrupt received; exiting"),
        result = server.wait() => {
            if let Err(x) = result {
                error!("Server task failed: {}", x);
            }
        }
    }

    Ok(())
}
