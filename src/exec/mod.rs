// src/exec/mod.rs

//! Process execution layer.
//!
//! This module is responsible for actually running the Maestro CLI, using
//! `tokio::process::Command`, and turning whatever happens into an
//! [`ExecResult`](crate::types::ExecResult).
//!
//! - [`backend`] provides the `CommandRunner` trait that everything above
//!   talks to, so tests can replace real processes with a fake.
//! - [`process`] is the production runner (buffered, streaming, detached).
//! - [`scratch`] owns the temporary directories generated flows live in.
//! - [`engine`] knows the Maestro sub-commands and flag order.
//! - [`orchestrator`] composes the above: build, write, run, clean up, and
//!   fan out across devices.

pub mod backend;
pub mod engine;
pub mod orchestrator;
pub mod process;
pub mod scratch;

pub use backend::{CommandRunner, Invocation, RunFuture, RunMode};
pub use engine::Engine;
pub use orchestrator::{MultiDeviceOutcome, Orchestrator, ScreenshotOutcome, StepsOutcome};
pub use process::ProcessRunner;
pub use scratch::ScratchDir;
