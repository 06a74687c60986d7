// src/tools/mod.rs

//! Tool surface exposed to clients.
//!
//! - [`catalog`] lists tool names and input schemas.
//! - [`args`] deserializes and validates tool arguments and turns them into
//!   [`Step`](crate::types::Step)s.
//! - [`dispatch`] routes a `tools/call` to the orchestrator, device inventory
//!   or engine and renders the outcome.

pub mod args;
pub mod catalog;
pub mod dispatch;

use std::sync::Arc;

use serde::Serialize;
use serde_json::{Value, json};

use crate::config::ConfigFile;
use crate::devices::DeviceInventory;
use crate::exec::{CommandRunner, Engine, Orchestrator, ProcessRunner};

pub use catalog::{ToolDefinition, tool_definitions};

/// Text payload of a tool call, flagged as error or success.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolResponse {
    pub text: String,
    pub is_error: bool,
}

impl ToolResponse {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            text: message.into(),
            is_error: true,
        }
    }

    /// Pretty JSON body; `is_error` as given.
    pub fn json<T: Serialize>(value: &T, is_error: bool) -> Self {
        match serde_json::to_string_pretty(value) {
            Ok(text) => Self { text, is_error },
            Err(e) => Self::error(format!("failed to serialize tool result: {e}")),
        }
    }

    /// MCP `tools/call` result shape.
    pub fn to_call_result(&self) -> Value {
        json!({
            "content": [{ "type": "text", "text": self.text }],
            "isError": self.is_error,
        })
    }
}

/// Routes tool calls to the execution layer.
#[derive(Debug, Clone)]
pub struct ToolRouter {
    orchestrator: Orchestrator,
    inventory: DeviceInventory,
    studio_port: Option<u16>,
}

impl ToolRouter {
    pub fn new(orchestrator: Orchestrator, inventory: DeviceInventory, studio_port: Option<u16>) -> Self {
        Self {
            orchestrator,
            inventory,
            studio_port,
        }
    }

    /// Production wiring: real processes.
    pub fn from_config(cfg: &ConfigFile) -> Self {
        let runner = Arc::new(ProcessRunner::new(cfg.engine.max_output_bytes));
        Self::with_runner(cfg, runner)
    }

    /// Same wiring as [`ToolRouter::from_config`] with a caller-supplied runner.
    pub fn with_runner(cfg: &ConfigFile, runner: Arc<dyn CommandRunner>) -> Self {
        let engine = Engine::new(&cfg.engine, Arc::clone(&runner));
        let inventory = DeviceInventory::new(&cfg.devices, runner);
        Self::new(Orchestrator::new(engine), inventory, cfg.studio.port)
    }

    pub fn orchestrator(&self) -> &Orchestrator {
        &self.orchestrator
    }
}
