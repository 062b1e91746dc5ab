use crate::{
    msg::reply::Reply,
    op::UnmountOp,
    server::{
        action::ActionError,
        invoke::{Invocation, Invoker},
    },
};
use log::debug;
use std::future::Future;

pub const UNMOUNT_PROGRAM: &str = "/sbin/umount";
pub const UNMOUNT_FAILED: &str = "Unmount failed";

pub async fn unmount<I, F, R>(
    invoker: &I,
    op: &UnmountOp,
    respond: F,
) -> Result<(), ActionError>
where
    I: Invoker,
    F: FnOnce(Reply) -> R,
    R: Future<Output = Result<(), ActionError>>,
{
    debug!("unmount: {:?}", op);

    let reply =
        super::run_invocation(invoker, build_invocation(op), UNMOUNT_FAILED)
            .await;
    respond(reply).await
}

fn build_invocation(op: &UnmountOp) -> Invocation {
    let invocation = Invocation::new(UNMOUNT_PROGRAM);
    if op.force {
        invocation.arg("-f").arg(&op.target)
    } else {
        invocation.arg(&op.target)
    }
}
