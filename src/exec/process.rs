// src/exec/process.rs

//! Production [`CommandRunner`] backed by `tokio::process::Command`.

use std::process::{ExitStatus, Stdio};

use anyhow::{Context, Result, bail};
use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::{Child, Command};
use tokio::time::timeout;
use tracing::{debug, info, warn};

use crate::exec::backend::{CommandRunner, Invocation, RunFuture};
use crate::types::ExecResult;

/// Default ceiling for buffered output, per stream.
pub const DEFAULT_MAX_OUTPUT_BYTES: usize = 10 * 1024 * 1024;

const CHUNK_SIZE: usize = 8 * 1024;

/// Runs real OS processes.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    max_output_bytes: usize,
}

impl ProcessRunner {
    pub fn new(max_output_bytes: usize) -> Self {
        Self { max_output_bytes }
    }
}

impl Default for ProcessRunner {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_OUTPUT_BYTES)
    }
}

impl CommandRunner for ProcessRunner {
    fn run_buffered(&self, invocation: Invocation) -> RunFuture<'_> {
        let cap = self.max_output_bytes;
        Box::pin(run_buffered(invocation, cap))
    }

    fn run_streaming(&self, invocation: Invocation) -> RunFuture<'_> {
        Box::pin(run_streaming(invocation))
    }

    fn launch_detached(&self, invocation: Invocation) -> RunFuture<'_> {
        Box::pin(async move { launch_detached(invocation) })
    }
}

fn piped_command(invocation: &Invocation) -> Command {
    let mut cmd = Command::new(&invocation.program);
    cmd.args(&invocation.args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);
    cmd
}

/// Signals and other abnormal terminations carry no code; report them as 1.
fn exit_code(status: ExitStatus) -> i32 {
    status.code().unwrap_or(1)
}

async fn run_buffered(invocation: Invocation, cap: usize) -> ExecResult {
    info!(cmd = %invocation.display(), "running command (buffered)");

    let mut child = match piped_command(&invocation).spawn() {
        Ok(child) => child,
        Err(e) => {
            warn!(program = %invocation.program, error = %e, "failed to spawn command");
            return ExecResult::failure(format!(
                "failed to spawn '{}': {e}",
                invocation.program
            ));
        }
    };

    match timeout(invocation.timeout, collect_capped(&mut child, cap)).await {
        Ok(Ok(result)) => {
            info!(
                cmd = %invocation.display(),
                exit_code = result.exit_code,
                "command exited"
            );
            result
        }
        Ok(Err(err)) => {
            warn!(cmd = %invocation.display(), error = %err, "command failed");
            kill(&mut child, &invocation).await;
            ExecResult::failure(format!("{}: {err:#}", invocation.display()))
        }
        Err(_) => {
            warn!(
                cmd = %invocation.display(),
                timeout_ms = invocation.timeout.as_millis() as u64,
                "command timed out; killing process"
            );
            kill(&mut child, &invocation).await;
            ExecResult::failure(format!(
                "{} timed out after {:?}",
                invocation.display(),
                invocation.timeout
            ))
        }
    }
}

async fn collect_capped(child: &mut Child, cap: usize) -> Result<ExecResult> {
    let stdout = child.stdout.take().context("stdout was not captured")?;
    let stderr = child.stderr.take().context("stderr was not captured")?;

    let (out, err) = tokio::try_join!(
        read_capped(stdout, cap, "stdout"),
        read_capped(stderr, cap, "stderr")
    )?;

    let status = child.wait().await.context("waiting for process")?;

    Ok(ExecResult {
        stdout: String::from_utf8_lossy(&out).into_owned(),
        stderr: String::from_utf8_lossy(&err).into_owned(),
        exit_code: exit_code(status),
    })
}

async fn read_capped<R>(reader: R, cap: usize, stream: &'static str) -> Result<Vec<u8>>
where
    R: AsyncRead + Unpin,
{
    let mut buf = Vec::new();
    reader
        .take((cap as u64).saturating_add(1))
        .read_to_end(&mut buf)
        .await
        .with_context(|| format!("reading {stream}"))?;

    if buf.len() > cap {
        bail!("{stream} exceeded the output limit of {cap} bytes");
    }
    Ok(buf)
}

async fn run_streaming(invocation: Invocation) -> ExecResult {
    info!(cmd = %invocation.display(), "running command (streaming)");

    let mut child = match piped_command(&invocation).spawn() {
        Ok(child) => child,
        Err(e) => {
            warn!(program = %invocation.program, error = %e, "failed to spawn command");
            return ExecResult::failure(e.to_string());
        }
    };

    let stdout = child.stdout.take();
    let stderr = child.stderr.take();
    let mut out = Vec::new();
    let mut err = Vec::new();

    let waited = timeout(invocation.timeout, async {
        tokio::join!(
            pump(stdout, &mut out, "stdout"),
            pump(stderr, &mut err, "stderr")
        );
        child.wait().await
    })
    .await;

    let mut result = ExecResult {
        stdout: String::from_utf8_lossy(&out).into_owned(),
        stderr: String::from_utf8_lossy(&err).into_owned(),
        exit_code: 1,
    };

    match waited {
        Ok(Ok(status)) => {
            result.exit_code = exit_code(status);
            info!(
                cmd = %invocation.display(),
                exit_code = result.exit_code,
                "command exited"
            );
        }
        Ok(Err(e)) => {
            warn!(cmd = %invocation.display(), error = %e, "waiting for command failed");
            append_line(&mut result.stderr, &e.to_string());
        }
        Err(_) => {
            warn!(
                cmd = %invocation.display(),
                timeout_ms = invocation.timeout.as_millis() as u64,
                "command timed out; killing process"
            );
            kill(&mut child, &invocation).await;
            append_line(
                &mut result.stderr,
                &format!("timed out after {:?}", invocation.timeout),
            );
        }
    }

    result
}

/// Append every chunk from `reader` to `sink` until EOF or a read error.
async fn pump<R>(reader: Option<R>, sink: &mut Vec<u8>, stream: &'static str)
where
    R: AsyncRead + Unpin,
{
    let Some(mut reader) = reader else {
        return;
    };

    let mut chunk = vec![0u8; CHUNK_SIZE];
    loop {
        match reader.read(&mut chunk).await {
            Ok(0) => break,
            Ok(n) => {
                debug!(stream, bytes = n, "output chunk");
                sink.extend_from_slice(&chunk[..n]);
            }
            Err(e) => {
                debug!(stream, error = %e, "stopped reading output");
                break;
            }
        }
    }
}

fn launch_detached(invocation: Invocation) -> ExecResult {
    info!(cmd = %invocation.display(), "launching detached command");

    let spawned = Command::new(&invocation.program)
        .args(&invocation.args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn();

    match spawned {
        Ok(child) => {
            let pid = child.id().map(|p| p.to_string()).unwrap_or_else(|| "?".into());
            info!(cmd = %invocation.display(), pid = %pid, "detached command started");
            ExecResult {
                stdout: format!("started `{}` (pid {pid})", invocation.display()),
                stderr: String::new(),
                exit_code: 0,
            }
        }
        Err(e) => {
            warn!(program = %invocation.program, error = %e, "failed to spawn command");
            ExecResult::failure(format!(
                "failed to spawn '{}': {e}",
                invocation.program
            ))
        }
    }
}

async fn kill(child: &mut Child, invocation: &Invocation) {
    if let Err(e) = child.kill().await {
        debug!(
            cmd = %invocation.display(),
            error = %e,
            "failed to kill child process (it may already have exited)"
        );
    }
}

fn append_line(buf: &mut String, line: &str) {
    if !buf.is_empty() && !buf.ends_with('\n') {
        buf.push('\n');
    }
    buf.push_str(line);
}
