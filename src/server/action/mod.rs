pub mod handler;

use crate::{
    msg::{reply::Reply, Inbound, MsgError},
    op::{Op, NO_COMMAND_SPECIFIED, UNKNOWN_COMMAND},
    server::invoke::Invoker,
};
use log::trace;
use privd_derive::Error;
use std::future::Future;
use std::sync::Arc;

#[derive(Debug, Error)]
pub enum ActionError {
    EncodeMsg(MsgError),
    RespondFailed,
}

/// Routes one classified inbound frame to exactly one reply. This is a pure
/// routing step: it performs no privileged action itself and holds nothing
/// across calls beyond the invoker handle.
pub struct Executor<I> {
    invoker: Arc<I>,
}

impl<I: Invoker> Executor<I> {
    pub fn new(invoker: Arc<I>) -> Self {
        Self { invoker }
    }

    pub async fn execute<F, R>(
        &self,
        inbound: Inbound,
        respond: F,
    ) -> Result<(), ActionError>
    where
        F: FnOnce(Reply) -> R,
        R: Future<Output = Result<(), ActionError>>,
    {
        trace!("Executing inbound: {:?}", inbound);

        match inbound {
            Inbound::MissingCommand => {
                respond(Reply::failure(NO_COMMAND_SPECIFIED)).await
            }
            Inbound::UnknownCommand(command) => {
                trace!("Refusing unknown command: {:?}", command);
                respond(Reply::failure(UNKNOWN_COMMAND)).await
            }
            Inbound::Request(request) => match request.validate() {
                Err(x) => respond(Reply::failure(x.to_string())).await,
                Ok(Op::Mount(op)) => {
                    handler::mount::mount(&*self.invoker, &op, respond).await
                }
                Ok(Op::Unmount(op)) => {
                    handler::unmount::unmount(&*self.invoker, &op, respond)
                        .await
                }
                Ok(Op::File(op)) => {
                    handler::file::file_operation(
                        &*self.invoker,
                        &op,
                        respond,
                    )
                    .await
                }
                Ok(Op::Execute(op)) => {
                    handler::exec::execute(&*self.invoker, &op, respond).await
                }
            },
        }
    }
}
