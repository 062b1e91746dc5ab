pub mod exec;
pub mod file;
pub mod mount;
pub mod unmount;

use crate::msg::reply::Reply;
use crate::server::invoke::{Invocation, Invoker};
use log::error;

/// Runs one privileged invocation and folds its outcome into the reply for
/// the originating request. Exit code zero is the only success; every other
/// outcome carries the handler's failure message plus the exit code, with
/// -1 standing in for a process that never started.
pub(crate) async fn run_invocation<I: Invoker>(
    invoker: &I,
    invocation: Invocation,
    failure_msg: &str,
) -> Reply {
    match invoker.run(&invocation).await {
        Ok(0) => Reply::success(),
        Ok(code) => Reply::failure_with_exit_code(failure_msg, code),
        Err(x) => {
            error!("Failed to start {}: {}", invocation.program(), x);
            Reply::failure_with_exit_code(failure_msg, -1)
        }
    }
}
