// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Command-line arguments for `maestro-mcp`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "maestro-mcp",
    version,
    about = "Expose Maestro mobile UI automation as MCP tools over stdio.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the config file (TOML).
    ///
    /// If omitted, `maestro-mcp.toml` in the current directory is used when it
    /// exists, otherwise built-in defaults.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Maestro executable; overrides `[engine].binary`.
    #[arg(long, value_name = "PATH")]
    pub maestro_bin: Option<String>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `MAESTRO_MCP_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Print the tool catalog and exit without serving.
    #[arg(long)]
    pub list_tools: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_flags() {
        let args = CliArgs::parse_from([
            "maestro-mcp",
            "--config",
            "custom.toml",
            "--maestro-bin",
            "/opt/maestro/bin/maestro",
            "--log-level",
            "debug",
            "--list-tools",
        ]);

        assert_eq!(args.config, Some(PathBuf::from("custom.toml")));
        assert_eq!(args.maestro_bin.as_deref(), Some("/opt/maestro/bin/maestro"));
        assert!(matches!(args.log_level, Some(LogLevel::Debug)));
        assert!(args.list_tools);
    }
}
