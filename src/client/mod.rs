use crate::msg::{
    reply::Reply,
    request::{
        ExecuteArgs, FileOperationArgs, MountArgs, Request, UnmountArgs,
    },
    MsgError,
};
use log::trace;
use privd_derive::Error;
use std::io;
use std::path::Path;
use std::time::Duration;
use tokio::{
    io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines},
    net::{
        unix::{OwnedReadHalf, OwnedWriteHalf},
        UnixStream,
    },
    time,
};

#[derive(Debug, Error)]
pub enum AskError {
    EncodeFailed(MsgError),
    DecodeFailed(MsgError),
    IoFailed(io::Error),
    Timeout(Duration),
    ConnectionClosed,
}

pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(2500);

/// Client side of the helper protocol: one connection carrying any number
/// of request/reply exchanges, each awaited in order.
pub struct Client {
    reader: Lines<BufReader<OwnedReadHalf>>,
    writer: OwnedWriteHalf,

    /// Time to wait for a reply before giving up; frames the helper drops
    /// (malformed requests) never produce one
    pub timeout: Duration,
}

impl Client {
    pub async fn connect(path: impl AsRef<Path>) -> io::Result<Self> {
        let stream = UnixStream::connect(path).await?;
        let (read_half, write_half) = stream.into_split();
        Ok(Self {
            reader: BufReader::new(read_half).lines(),
            writer: write_half,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    /// Sends a request and waits for its reply.
    pub async fn ask(&mut self, request: &Request) -> Result<Reply, AskError> {
        trace!("Asking: {:?}", request);

        let mut data = request.to_vec().map_err(AskError::EncodeFailed)?;
        data.push(b'\n');
        self.writer
            .write_all(&data)
            .await
            .map_err(AskError::IoFailed)?;

        let line = time::timeout(self.timeout, self.reader.next_line())
            .await
            .map_err(|_| AskError::Timeout(self.timeout))?
            .map_err(AskError::IoFailed)?
            .ok_or(AskError::ConnectionClosed)?;
        Reply::from_slice(line.as_bytes()).map_err(AskError::DecodeFailed)
    }

    pub async fn ask_mount(
        &mut self,
        device: impl Into<String>,
        mountpoint: Option<String>,
        filesystem: Option<String>,
    ) -> Result<Reply, AskError> {
        self.ask(&Request::Mount(MountArgs {
            device: Some(device.into()),
            mountpoint,
            filesystem,
        }))
        .await
    }

    pub async fn ask_unmount(
        &mut self,
        target: impl Into<String>,
        force: bool,
    ) -> Result<Reply, AskError> {
        self.ask(&Request::Unmount(UnmountArgs {
            target: Some(target.into()),
            force,
        }))
        .await
    }

    pub async fn ask_file_operation(
        &mut self,
        operation: impl Into<String>,
        source: Option<String>,
        destination: Option<String>,
    ) -> Result<Reply, AskError> {
        self.ask(&Request::FileOperation(FileOperationArgs {
            operation: Some(operation.into()),
            source,
            destination,
        }))
        .await
    }

    pub async fn ask_execute(
        &mut self,
        cmd: impl Into<String>,
        args: Vec<String>,
    ) -> Result<Reply, AskError> {
        self.ask(&Request::Execute(ExecuteArgs {
            cmd: Some(cmd.into()),
            args,
        }))
        .await
    }
}
