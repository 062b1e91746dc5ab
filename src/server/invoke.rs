use futures::future::BoxFuture;
use log::trace;
use std::io;
use tokio::process::Command;

/// A fully-constructed privileged action: the program to spawn and its
/// argument vector. Requests never reach a shell; whatever strings a peer
/// sent are individual argv entries by the time they get here.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Invocation {
    program: String,
    args: Vec<String>,
}

impl Invocation {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<S>(mut self, args: impl IntoIterator<Item = S>) -> Self
    where
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn arg_slice(&self) -> &[String] {
        &self.args
    }
}

/// Seam through which handlers run privileged invocations. Tests substitute
/// a spy here to observe exactly what would have been spawned.
pub trait Invoker: Send + Sync {
    /// Runs the invocation to completion and yields its exit code. The call
    /// blocks the requesting connection until the subprocess finishes; a
    /// process terminated by a signal reports -1.
    fn run<'a>(
        &'a self,
        invocation: &'a Invocation,
    ) -> BoxFuture<'a, io::Result<i64>>;
}

/// Spawns the argument vector directly via the OS process facility.
pub struct ProcessInvoker;

impl Invoker for ProcessInvoker {
    fn run<'a>(
        &'a self,
        invocation: &'a Invocation,
    ) -> BoxFuture<'a, io::Result<i64>> {
        Box::pin(async move {
            trace!(
                "Spawning {} {:?}",
                invocation.program(),
                invocation.arg_slice()
            );
            let status = Command::new(invocation.program())
                .args(invocation.arg_slice())
                .status()
                .await?;
            Ok(status.code().map(i64::from).unwrap_or(-1))
        })
    }
}

#[cfg(test)]
pub(crate) mod spy {
    use super::*;
    use std::sync::Mutex;

    enum Outcome {
        Exit(i64),
        FailToStart,
    }

    /// Records invocations instead of spawning anything, playing back a
    /// scripted outcome.
    pub struct SpyInvoker {
        invocations: Mutex<Vec<Invocation>>,
        outcome: Outcome,
    }

    impl SpyInvoker {
        pub fn succeeding() -> Self {
            Self::exiting_with(0)
        }

        pub fn exiting_with(code: i64) -> Self {
            Self {
                invocations: Mutex::new(Vec::new()),
                outcome: Outcome::Exit(code),
            }
        }

        pub fn failing_to_start() -> Self {
            Self {
                invocations: Mutex::new(Vec::new()),
                outcome: Outcome::FailToStart,
            }
        }

        pub fn recorded(&self) -> Vec<Invocation> {
            self.invocations.lock().unwrap().clone()
        }
    }

    impl Invoker for SpyInvoker {
        fn run<'a>(
            &'a self,
            invocation: &'a Invocation,
        ) -> BoxFuture<'a, io::Result<i64>> {
            self.invocations.lock().unwrap().push(invocation.clone());
            match self.outcome {
                Outcome::Exit(code) => Box::pin(async move { Ok(code) }),
                Outcome::FailToStart => Box::pin(async {
                    Err(io::Error::from(io::ErrorKind::NotFound))
                }),
            }
        }
    }
}
