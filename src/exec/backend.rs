// src/exec/backend.rs

//! Pluggable process backend.
//!
//! Everything above this layer (engine, orchestrator, device inventory) talks
//! to a `CommandRunner` instead of spawning processes directly. Production
//! code uses [`ProcessRunner`](super::process::ProcessRunner); tests plug in a
//! scripted fake that records invocations and returns canned results.
//!
//! Every method resolves to an [`ExecResult`]. A runner never returns an
//! error: spawn failures, timeouts and signals are folded into a non-zero
//! exit code plus a diagnostic on stderr.

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use crate::types::ExecResult;

/// Boxed future returned by [`CommandRunner`] methods.
pub type RunFuture<'a> = Pin<Box<dyn Future<Output = ExecResult> + Send + 'a>>;

/// How a command is being run. Used by tests and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Buffered,
    Streaming,
    Detached,
}

/// A single external command: program, arguments and wall-clock budget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub args: Vec<String>,
    pub timeout: Duration,
}

impl Invocation {
    pub fn new<I, S>(program: impl Into<String>, args: I, timeout: Duration) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
            timeout,
        }
    }

    /// `program arg1 arg2 ...`, for logs and error messages.
    pub fn display(&self) -> String {
        if self.args.is_empty() {
            self.program.clone()
        } else {
            format!("{} {}", self.program, self.args.join(" "))
        }
    }
}

/// Trait abstracting how external commands are run.
pub trait CommandRunner: Send + Sync {
    /// Run to completion, collecting all output, bounded by the invocation's
    /// timeout and the runner's output ceiling.
    fn run_buffered(&self, invocation: Invocation) -> RunFuture<'_>;

    /// Run to completion, appending every output chunk as it arrives.
    /// Output captured before a timeout is kept.
    fn run_streaming(&self, invocation: Invocation) -> RunFuture<'_>;

    /// Start a long-running process and return immediately.
    ///
    /// The timeout is ignored; the process outlives the call.
    fn launch_detached(&self, invocation: Invocation) -> RunFuture<'_>;
}
