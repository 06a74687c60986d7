// src/exec/engine.rs

//! Invocation surface of the Maestro CLI.
//!
//! This is the only place that knows Maestro's flag spelling. The global
//! `--device <id>` flag always precedes the sub-command verb.

use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crate::config::EngineSection;
use crate::exec::backend::{CommandRunner, Invocation};
use crate::types::{ExecResult, ShardStrategy};

#[derive(Clone)]
pub struct Engine {
    binary: String,
    command_timeout: Duration,
    flow_timeout: Duration,
    runner: Arc<dyn CommandRunner>,
}

impl fmt::Debug for Engine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("binary", &self.binary)
            .field("command_timeout", &self.command_timeout)
            .field("flow_timeout", &self.flow_timeout)
            .finish_non_exhaustive()
    }
}

impl Engine {
    pub fn new(section: &EngineSection, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            binary: section.binary.clone(),
            command_timeout: section.command_timeout(),
            flow_timeout: section.flow_timeout(),
            runner,
        }
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }

    pub fn flow_timeout(&self) -> Duration {
        self.flow_timeout
    }

    fn invocation(&self, args: Vec<String>, timeout: Duration) -> Invocation {
        Invocation::new(&self.binary, args, timeout)
    }

    /// `maestro --version`
    pub async fn version(&self) -> ExecResult {
        let inv = self.invocation(vec!["--version".to_string()], self.command_timeout);
        self.runner.run_buffered(inv).await
    }

    /// `maestro [--device <id>] test <path>`
    pub async fn run_flow(
        &self,
        document_path: &Path,
        device_id: Option<&str>,
        timeout: Option<Duration>,
    ) -> ExecResult {
        let mut args = device_scoped(device_id, "test");
        args.push(document_path.display().to_string());

        let inv = self.invocation(args, timeout.unwrap_or(self.flow_timeout));
        self.runner.run_streaming(inv).await
    }

    /// `maestro [--device <id>] hierarchy`
    pub async fn hierarchy(&self, device_id: Option<&str>) -> ExecResult {
        let inv = self.invocation(device_scoped(device_id, "hierarchy"), self.command_timeout);
        self.runner.run_buffered(inv).await
    }

    /// `maestro [--device <id>] studio [--port <n>]`, left running in the
    /// background.
    pub async fn start_studio(&self, device_id: Option<&str>, port: Option<u16>) -> ExecResult {
        let mut args = device_scoped(device_id, "studio");
        if let Some(port) = port {
            args.push("--port".to_string());
            args.push(port.to_string());
        }

        let inv = self.invocation(args, self.command_timeout);
        self.runner.launch_detached(inv).await
    }

    /// `maestro test --shard-all|--shard-split <n> <dir>`
    pub async fn run_sharded(
        &self,
        flow_directory: &Path,
        shard_count: u32,
        strategy: ShardStrategy,
    ) -> ExecResult {
        let args = vec![
            "test".to_string(),
            strategy.flag().to_string(),
            shard_count.to_string(),
            flow_directory.display().to_string(),
        ];

        let inv = self.invocation(args, self.flow_timeout);
        self.runner.run_streaming(inv).await
    }

    /// Arbitrary arguments, passed through untouched.
    pub async fn raw(&self, args: Vec<String>) -> ExecResult {
        let inv = self.invocation(args, self.flow_timeout);
        self.runner.run_streaming(inv).await
    }
}

fn device_scoped(device_id: Option<&str>, verb: &str) -> Vec<String> {
    let mut args = Vec::with_capacity(4);
    if let Some(id) = device_id {
        args.push("--device".to_string());
        args.push(id.to_string());
    }
    args.push(verb.to_string());
    args
}
