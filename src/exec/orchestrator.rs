// src/exec/orchestrator.rs

//! Runs generated flows through the engine.
//!
//! Every operation resolves to a result value. Scratch-file problems and
//! process failures are folded into a non-zero [`ExecResult`]; nothing is
//! retried.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use futures_util::future::join_all;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::exec::engine::Engine;
use crate::exec::scratch::ScratchDir;
use crate::flow::{self, FlowDocument};
use crate::types::{ExecResult, ShardStrategy, Step};

/// File name of the generated document inside its scratch directory.
pub const FLOW_FILE_NAME: &str = "flow.yaml";

/// `appId` header used for the one-step screenshot flow.
pub const SCREENSHOT_APP_ID: &str = "any";

const SCREENSHOT_FILE_NAME: &str = "screenshot.png";

#[derive(Debug, Clone, Serialize)]
pub struct StepsOutcome {
    pub document: FlowDocument,
    pub result: ExecResult,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiDeviceOutcome {
    pub document: FlowDocument,
    pub results_by_device: BTreeMap<String, ExecResult>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScreenshotOutcome {
    pub path: PathBuf,
    pub result: ExecResult,
}

#[derive(Debug, Clone)]
pub struct Orchestrator {
    engine: Engine,
}

impl Orchestrator {
    pub fn new(engine: Engine) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Run an existing flow document, optionally pinned to one device.
    pub async fn run_flow(
        &self,
        document_path: &Path,
        device_id: Option<&str>,
        timeout: Option<Duration>,
    ) -> ExecResult {
        self.engine.run_flow(document_path, device_id, timeout).await
    }

    /// Build a document from `steps` and run it on one device.
    pub async fn execute_steps(
        &self,
        app_id: &str,
        steps: &[Step],
        device_id: Option<&str>,
        timeout: Option<Duration>,
    ) -> StepsOutcome {
        let document = flow::build(app_id, steps);
        info!(app_id, steps = steps.len(), device = ?device_id, "executing steps");

        let result = self
            .run_flow_content(document.as_str(), device_id, timeout)
            .await;
        StepsOutcome { document, result }
    }

    /// Run caller-authored flow text with the same scratch lifecycle as
    /// [`Orchestrator::execute_steps`].
    pub async fn run_flow_content(
        &self,
        content: &str,
        device_id: Option<&str>,
        timeout: Option<Duration>,
    ) -> ExecResult {
        let scratch = match ScratchDir::create() {
            Ok(scratch) => scratch,
            Err(e) => return ExecResult::failure(format!("{e:#}")),
        };

        // On unwinding, dropping `scratch` removes the directory.
        let result = match scratch.write(FLOW_FILE_NAME, content).await {
            Ok(path) => self.run_flow(&path, device_id, timeout).await,
            Err(e) => ExecResult::failure(format!("{e:#}")),
        };

        scratch.close();
        result
    }

    /// Run one document on every device concurrently.
    ///
    /// The document is written once and shared read-only by all runs. One
    /// device failing does not affect the others; the scratch directory is
    /// removed once every run has settled. Duplicate ids are collapsed.
    pub async fn execute_steps_multi_device(
        &self,
        app_id: &str,
        steps: &[Step],
        device_ids: &[String],
        timeout: Option<Duration>,
    ) -> MultiDeviceOutcome {
        let document = flow::build(app_id, steps);
        let devices = distinct(device_ids);
        info!(app_id, steps = steps.len(), devices = ?devices, "executing steps on multiple devices");

        if devices.is_empty() {
            return MultiDeviceOutcome {
                document,
                results_by_device: BTreeMap::new(),
            };
        }

        let written = match ScratchDir::create() {
            Ok(scratch) => match scratch.write(FLOW_FILE_NAME, document.as_str()).await {
                Ok(path) => Ok((scratch, path)),
                Err(e) => Err(format!("{e:#}")),
            },
            Err(e) => Err(format!("{e:#}")),
        };

        let (scratch, path) = match written {
            Ok(ok) => ok,
            Err(message) => {
                let results_by_device = devices
                    .into_iter()
                    .map(|id| (id.to_string(), ExecResult::failure(message.clone())))
                    .collect();
                return MultiDeviceOutcome {
                    document,
                    results_by_device,
                };
            }
        };

        let path = path.as_path();
        let runs = devices.iter().map(|&id| async move {
            let result = self.run_flow(path, Some(id), timeout).await;
            debug!(device = id, exit_code = result.exit_code, "device run settled");
            (id.to_string(), result)
        });
        let results_by_device: BTreeMap<String, ExecResult> =
            join_all(runs).await.into_iter().collect();

        scratch.close();

        MultiDeviceOutcome {
            document,
            results_by_device,
        }
    }

    /// Capture a screenshot.
    ///
    /// Without `output_path` the image lands in a fresh scratch directory that
    /// is kept on success so the caller can read it; on failure there is no
    /// artifact and the directory is removed. The generated flow file never
    /// outlives the call.
    pub async fn take_screenshot(
        &self,
        device_id: Option<&str>,
        output_path: Option<&Path>,
    ) -> ScreenshotOutcome {
        let scratch = match ScratchDir::create() {
            Ok(scratch) => scratch,
            Err(e) => {
                return ScreenshotOutcome {
                    path: output_path.map(Path::to_path_buf).unwrap_or_default(),
                    result: ExecResult::failure(format!("{e:#}")),
                };
            }
        };

        let keep_scratch = output_path.is_none();
        let path = match output_path {
            Some(p) => p.with_extension("png"),
            None => scratch.path().join(SCREENSHOT_FILE_NAME),
        };

        // Maestro appends `.png` itself.
        let target = path.with_extension("");
        let steps = [Step::with(
            "takeScreenshot",
            target.to_string_lossy().into_owned(),
        )];
        let document = flow::build(SCREENSHOT_APP_ID, &steps);

        let result = match scratch.write(FLOW_FILE_NAME, document.as_str()).await {
            Ok(flow_path) => {
                let result = self.run_flow(&flow_path, device_id, None).await;
                if keep_scratch && result.is_success() {
                    if let Err(e) = tokio::fs::remove_file(&flow_path).await {
                        warn!(path = %flow_path.display(), error = %e, "failed to remove flow file");
                    }
                }
                result
            }
            Err(e) => ExecResult::failure(format!("{e:#}")),
        };

        if keep_scratch && result.is_success() {
            let dir = scratch.keep();
            debug!(path = %dir.display(), "keeping screenshot directory");
        } else {
            scratch.close();
        }

        ScreenshotOutcome { path, result }
    }

    /// Pass arguments straight to the engine.
    pub async fn raw_command(&self, args: Vec<String>) -> ExecResult {
        self.engine.raw(args).await
    }

    /// Use the engine's built-in sharding over a directory of flows.
    pub async fn run_sharded(
        &self,
        flow_directory: &Path,
        shard_count: u32,
        strategy: ShardStrategy,
    ) -> ExecResult {
        self.engine
            .run_sharded(flow_directory, shard_count, strategy)
            .await
    }
}

/// Keep the first occurrence of every id, in input order.
fn distinct(ids: &[String]) -> Vec<&str> {
    let mut seen = Vec::with_capacity(ids.len());
    for id in ids {
        if !seen.contains(&id.as_str()) {
            seen.push(id.as_str());
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distinct_keeps_first_occurrence() {
        let ids = vec!["b".to_string(), "a".to_string(), "b".to_string()];
        assert_eq!(distinct(&ids), vec!["b", "a"]);
    }
}
