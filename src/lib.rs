// src/lib.rs

pub mod cli;
pub mod config;
pub mod devices;
pub mod errors;
pub mod exec;
pub mod flow;
pub mod logging;
pub mod server;
pub mod tools;
pub mod types;

use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, info};

use crate::cli::CliArgs;
use crate::config::{ConfigFile, load_or_default};
use crate::tools::{ToolRouter, tool_definitions};

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - config loading (+ CLI overrides)
/// - the process runner, engine, orchestrator and device inventory
/// - the stdio JSON-RPC server
/// - Ctrl-C handling
pub async fn run(args: CliArgs) -> Result<()> {
    let mut cfg = load_or_default(args.config.as_deref())?;
    if let Some(bin) = args.maestro_bin {
        cfg.engine.binary = bin;
    }

    if args.list_tools {
        print_tool_list(&cfg);
        return Ok(());
    }

    info!(
        binary = %cfg.engine.binary,
        flow_timeout_secs = cfg.engine.flow_timeout_secs,
        "starting maestro-mcp"
    );

    let router = Arc::new(ToolRouter::from_config(&cfg));

    tokio::select! {
        res = server::serve(router, tokio::io::stdin(), tokio::io::stdout()) => res,
        // A failed signal registration disables this branch and keeps serving.
        Ok(()) = tokio::signal::ctrl_c() => {
            info!("Ctrl-C received; shutting down");
            Ok(())
        }
    }
}

/// `--list-tools` output: engine settings and every tool name.
fn print_tool_list(cfg: &ConfigFile) {
    println!("maestro-mcp tools");
    println!("  engine.binary = {}", cfg.engine.binary);
    println!("  engine.flow_timeout_secs = {}", cfg.engine.flow_timeout_secs);
    println!();

    let tools = tool_definitions();
    println!("tools ({}):", tools.len());
    for tool in &tools {
        println!("  - {:<24} {}", tool.name, tool.description);
    }

    debug!("tool listing complete (not serving)");
}
