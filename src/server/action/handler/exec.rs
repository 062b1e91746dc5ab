use crate::{
    msg::reply::Reply,
    op::ExecOp,
    server::{
        action::ActionError,
        invoke::{Invocation, Invoker},
    },
};
use log::debug;
use std::future::Future;

pub const COMMAND_EXECUTION_FAILED: &str = "Command execution failed";

pub async fn execute<I, F, R>(
    invoker: &I,
    op: &ExecOp,
    respond: F,
) -> Result<(), ActionError>
where
    I: Invoker,
    F: FnOnce(Reply) -> R,
    R: Future<Output = Result<(), ActionError>>,
{
    debug!("execute: {:?}", op);

    let invocation = Invocation::new(&op.program)
        .args(op.args.iter().map(String::as_str));
    let reply =
        super::run_invocation(invoker, invocation, COMMAND_EXECUTION_FAILED)
            .await;
    respond(reply).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::invoke::spy::SpyInvoker;

    #[tokio::test]
    async fn program_and_args_should_spawn_without_a_shell() {
        let invoker = SpyInvoker::succeeding();
        let mut reply = None;

        let op = ExecOp {
            program: String::from("/usr/bin/du"),
            args: vec![String::from("-sh"), String::from("/var; rm -rf /")],
        };
        execute(&invoker, &op, |r| {
            reply = Some(r);
            async { Ok(()) }
        })
        .await
        .unwrap();

        let recorded = invoker.recorded();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].program(), "/usr/bin/du");
        // Shell metacharacters stay inert inside a single argv entry
        assert_eq!(recorded[0].arg_slice(), ["-sh", "/var; rm -rf /"]);
        assert_eq!(reply.unwrap(), Reply::success());
    }

    #[tokio::test]
    async fn nonzero_exit_should_report_command_execution_failed() {
        let invoker = SpyInvoker::exiting_with(127);
        let mut reply = None;

        let op = ExecOp {
            program: String::from("/bin/false"),
            args: vec![],
        };
        execute(&invoker, &op, |r| {
            reply = Some(r);
            async { Ok(()) }
        })
        .await
        .unwrap();

        assert_eq!(
            reply.unwrap(),
            Reply::failure_with_exit_code(COMMAND_EXECUTION_FAILED, 127)
        );
    }
}
