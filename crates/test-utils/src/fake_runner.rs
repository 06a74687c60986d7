use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use maestro_mcp::exec::{CommandRunner, Invocation, RunFuture, RunMode};
use maestro_mcp::types::ExecResult;

/// One call observed by [`FakeRunner`].
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub mode: RunMode,
    pub invocation: Invocation,
    /// Contents of the flow file passed to `test`, read at call time.
    pub flow_contents: Option<String>,
}

impl RecordedCall {
    pub fn args(&self) -> Vec<&str> {
        self.invocation.args.iter().map(String::as_str).collect()
    }

    /// Value of the `--device` flag, if any.
    pub fn device(&self) -> Option<&str> {
        let args = &self.invocation.args;
        args.iter()
            .position(|a| a == "--device")
            .and_then(|i| args.get(i + 1))
            .map(String::as_str)
    }

    /// Path argument following the `test` verb, if any.
    pub fn flow_path(&self) -> Option<PathBuf> {
        let args = &self.invocation.args;
        args.iter()
            .position(|a| a == "test")
            .and_then(|i| args.get(i + 1))
            .map(PathBuf::from)
    }
}

type Responder = dyn Fn(&RecordedCall) -> ExecResult + Send + Sync;

/// A scripted `CommandRunner` that:
/// - records every invocation (and the flow file contents at call time)
/// - answers with whatever the responder closure returns
/// - optionally sleeps first, to keep several calls in flight at once.
pub struct FakeRunner {
    calls: Arc<Mutex<Vec<RecordedCall>>>,
    responder: Box<Responder>,
    delay: Option<Duration>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl FakeRunner {
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(&RecordedCall) -> ExecResult + Send + Sync + 'static,
    {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            responder: Box::new(responder),
            delay: None,
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    /// Every call exits 0 with `ok` on stdout.
    pub fn succeeding() -> Self {
        Self::new(|_| ExecResult {
            stdout: "ok".to_string(),
            stderr: String::new(),
            exit_code: 0,
        })
    }

    /// Every call returns `stdout` with exit code 0.
    pub fn with_stdout(stdout: &str) -> Self {
        let stdout = stdout.to_string();
        Self::new(move |_| ExecResult {
            stdout: stdout.clone(),
            stderr: String::new(),
            exit_code: 0,
        })
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    fn record(&self, mode: RunMode, invocation: Invocation) -> RunFuture<'_> {
        Box::pin(async move {
            let mut call = RecordedCall {
                mode,
                invocation,
                flow_contents: None,
            };
            call.flow_contents = call
                .flow_path()
                .and_then(|p| std::fs::read_to_string(p).ok());

            {
                let mut guard = self.calls.lock().unwrap();
                guard.push(call.clone());
            }

            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);

            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }

            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            (self.responder)(&call)
        })
    }
}

impl CommandRunner for FakeRunner {
    fn run_buffered(&self, invocation: Invocation) -> RunFuture<'_> {
        self.record(RunMode::Buffered, invocation)
    }

    fn run_streaming(&self, invocation: Invocation) -> RunFuture<'_> {
        self.record(RunMode::Streaming, invocation)
    }

    fn launch_detached(&self, invocation: Invocation) -> RunFuture<'_> {
        self.record(RunMode::Detached, invocation)
    }
}
