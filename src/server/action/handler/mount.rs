use crate::{
    msg::reply::Reply,
    op::MountOp,
    server::{
        action::ActionError,
        invoke::{Invocation, Invoker},
    },
};
use log::debug;
use std::future::Future;

pub const MOUNT_PROGRAM: &str = "/sbin/mount";
pub const MOUNT_FAILED: &str = "Mount failed";

pub async fn mount<I, F, R>(
    invoker: &I,
    op: &MountOp,
    respond: F,
) -> Result<(), ActionError>
where
    I: Invoker,
    F: FnOnce(Reply) -> R,
    R: Future<Output = Result<(), ActionError>>,
{
    debug!("mount: {:?}", op);

    let reply =
        super::run_invocation(invoker, build_invocation(op), MOUNT_FAILED)
            .await;
    respond(reply).await
}

fn build_invocation(op: &MountOp) -> Invocation {
    let invocation = Invocation::new(MOUNT_PROGRAM);
    // The filesystem type only means something alongside an explicit
    // mountpoint; specificity order is device+fs+mountpoint, then
    // device+mountpoint, then device alone
    match (&op.filesystem, &op.mountpoint) {
        (Some(filesystem), Some(mountpoint)) => invocation
            .arg("-t")
            .arg(filesystem)
            .arg(&op.device)
            .arg(mountpoint),
        (_, Some(mountpoint)) => invocation.arg(&op.device).arg(mountpoint),
        (_, None) => invocation.arg(&op.device),
    }
}
