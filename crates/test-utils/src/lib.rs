pub mod builders;
pub mod fake_runner;

use std::sync::{Arc, Once};

use maestro_mcp::exec::{Engine, Orchestrator};
use maestro_mcp::tools::ToolRouter;
use tracing_subscriber::{EnvFilter, fmt};

use crate::builders::ConfigFileBuilder;
use crate::fake_runner::FakeRunner;

static INIT: Once = Once::new();

/// Initialise tracing for tests.
///
/// - Uses `with_test_writer()`, so logs are captured per-test.
/// - The Rust test harness only prints captured output for **failing** tests
///   (unless you run with `-- --nocapture`).
///
/// Enable levels with e.g.:
/// `RUST_LOG=debug cargo test`
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer() // print only for failing tests unless --nocapture
            .with_target(true)
            .init();
    });
}

/// Orchestrator over the default config, backed by `runner`.
pub fn orchestrator_with(runner: Arc<FakeRunner>) -> Orchestrator {
    let cfg = ConfigFileBuilder::new().build();
    Orchestrator::new(Engine::new(&cfg.engine, runner))
}

/// Tool router over the default config, backed by `runner`.
pub fn router_with(runner: Arc<FakeRunner>) -> ToolRouter {
    let cfg = ConfigFileBuilder::new().build();
    ToolRouter::with_runner(&cfg, runner)
}
