use crate::{
    msg::reply::Reply,
    op::FileOp,
    server::{
        action::ActionError,
        invoke::{Invocation, Invoker},
    },
};
use log::debug;
use std::future::Future;

pub const COPY_PROGRAM: &str = "/bin/cp";
pub const MOVE_PROGRAM: &str = "/bin/mv";
pub const REMOVE_PROGRAM: &str = "/bin/rm";
pub const MKDIR_PROGRAM: &str = "/bin/mkdir";
pub const FILE_OPERATION_FAILED: &str = "File operation failed";

pub async fn file_operation<I, F, R>(
    invoker: &I,
    op: &FileOp,
    respond: F,
) -> Result<(), ActionError>
where
    I: Invoker,
    F: FnOnce(Reply) -> R,
    R: Future<Output = Result<(), ActionError>>,
{
    debug!("file_operation: {:?}", op);

    let reply = super::run_invocation(
        invoker,
        build_invocation(op),
        FILE_OPERATION_FAILED,
    )
    .await;
    respond(reply).await
}

fn build_invocation(op: &FileOp) -> Invocation {
    match op {
        FileOp::Copy {
            source,
            destination,
        } => Invocation::new(COPY_PROGRAM)
            .arg("-R")
            .arg(source)
            .arg(destination),
        FileOp::Move {
            source,
            destination,
        } => Invocation::new(MOVE_PROGRAM).arg(source).arg(destination),
        FileOp::Delete { source } => {
            Invocation::new(REMOVE_PROGRAM).arg("-rf").arg(source)
        }
        FileOp::Mkdir { path } => {
            Invocation::new(MKDIR_PROGRAM).arg("-p").arg(path)
        }
    }
}
