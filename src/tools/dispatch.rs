// src/tools/dispatch.rs

use std::time::Duration;

use serde::Serialize;
use serde_json::{Value, json};
use tracing::{debug, info, warn};

use crate::errors::{BridgeError, Result};
use crate::exec::StepsOutcome;
use crate::tools::args::{
    self, AppArgs, AssertArgs, DeviceArgs, EraseTextArgs, FlowSource, InputTextArgs,
    LaunchAppArgs, MultiDeviceArgs, OpenLinkArgs, PressKeyArgs, RawArgs, RunFlowArgs,
    RunStepsArgs, ScreenshotArgs, ScrollUntilVisibleArgs, ShardedArgs, StudioArgs, SwipeArgs,
    TapOnArgs, WaitArgs,
};
use crate::tools::{ToolResponse, ToolRouter};
use crate::types::{ExecResult, Step};

#[derive(Debug, Serialize)]
struct ResultPayload<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    document: Option<&'a str>,
    result: &'a ExecResult,
}

impl ToolRouter {
    /// Handle one `tools/call`.
    ///
    /// Invalid arguments and unknown tools become error responses without
    /// touching any process.
    pub async fn call(&self, name: &str, arguments: Value) -> ToolResponse {
        info!(tool = name, "tool call");

        match self.dispatch(name, arguments).await {
            Ok(response) => {
                debug!(tool = name, is_error = response.is_error, "tool call finished");
                response
            }
            Err(e) => {
                warn!(tool = name, error = %e, "tool call rejected");
                ToolResponse::error(e.to_string())
            }
        }
    }

    async fn dispatch(&self, name: &str, arguments: Value) -> Result<ToolResponse> {
        let response = match name {
            "check_maestro" => exec_response(None, &self.orchestrator.engine().version().await),
            "list_devices" => ToolResponse::json(&self.inventory.list_devices().await, false),

            "launch_app" => {
                let a: LaunchAppArgs = args::parse(arguments)?;
                self.run_app_steps(&a.app_id, a.device_id.as_deref(), &a.to_steps())
                    .await
            }
            "stop_app" => {
                let a: AppArgs = args::parse(arguments)?;
                let steps = [Step::with("stopApp", a.app_id.clone())];
                self.run_app_steps(&a.app_id, a.device_id.as_deref(), &steps)
                    .await
            }
            "clear_state" => {
                let a: AppArgs = args::parse(arguments)?;
                let steps = [Step::with("clearState", a.app_id.clone())];
                self.run_app_steps(&a.app_id, a.device_id.as_deref(), &steps)
                    .await
            }
            "tap_on" => {
                let a: TapOnArgs = args::parse(arguments)?;
                let steps = a.to_steps()?;
                self.run_app_steps(&a.app_id, a.device_id.as_deref(), &steps)
                    .await
            }
            "input_text" => {
                let a: InputTextArgs = args::parse(arguments)?;
                self.run_app_steps(&a.app_id, a.device_id.as_deref(), &a.to_steps())
                    .await
            }
            "erase_text" => {
                let a: EraseTextArgs = args::parse(arguments)?;
                self.run_app_steps(&a.app_id, a.device_id.as_deref(), &a.to_steps())
                    .await
            }
            "swipe" => {
                let a: SwipeArgs = args::parse(arguments)?;
                let steps = a.to_steps()?;
                self.run_app_steps(&a.app_id, a.device_id.as_deref(), &steps)
                    .await
            }
            "scroll_until_visible" => {
                let a: ScrollUntilVisibleArgs = args::parse(arguments)?;
                let steps = a.to_steps()?;
                self.run_app_steps(&a.app_id, a.device_id.as_deref(), &steps)
                    .await
            }
            "assert_visible" | "assert_not_visible" => {
                let action = if name == "assert_visible" {
                    "assertVisible"
                } else {
                    "assertNotVisible"
                };
                let a: AssertArgs = args::parse(arguments)?;
                let steps = a.to_steps(action)?;
                self.run_app_steps(&a.app_id, a.device_id.as_deref(), &steps)
                    .await
            }
            "press_key" => {
                let a: PressKeyArgs = args::parse(arguments)?;
                let steps = [Step::with("pressKey", a.key.clone())];
                self.run_app_steps(&a.app_id, a.device_id.as_deref(), &steps)
                    .await
            }
            "back" | "hide_keyboard" => {
                let action = if name == "back" { "back" } else { "hideKeyboard" };
                let a: AppArgs = args::parse(arguments)?;
                self.run_app_steps(&a.app_id, a.device_id.as_deref(), &[Step::bare(action)])
                    .await
            }
            "open_link" => {
                let a: OpenLinkArgs = args::parse(arguments)?;
                let steps = [Step::with("openLink", a.url.clone())];
                self.run_app_steps(&a.app_id, a.device_id.as_deref(), &steps)
                    .await
            }
            "wait_for_animation" => {
                let a: WaitArgs = args::parse(arguments)?;
                self.run_app_steps(&a.app_id, a.device_id.as_deref(), &a.to_steps())
                    .await
            }

            "take_screenshot" => {
                let a: ScreenshotArgs = args::parse(arguments)?;
                let outcome = self
                    .orchestrator
                    .take_screenshot(a.device_id.as_deref(), a.output_path.as_deref())
                    .await;
                ToolResponse::json(&outcome, !outcome.result.is_success())
            }
            "get_hierarchy" => {
                let a: DeviceArgs = args::parse(arguments)?;
                let result = self
                    .orchestrator
                    .engine()
                    .hierarchy(a.device_id.as_deref())
                    .await;
                exec_response(None, &result)
            }
            "run_flow" => {
                let a: RunFlowArgs = args::parse(arguments)?;
                let timeout = a.timeout_secs.map(Duration::from_secs);
                let device = a.device_id.as_deref();
                match a.source()? {
                    FlowSource::Inline(yaml) => {
                        let result = self
                            .orchestrator
                            .run_flow_content(&yaml, device, timeout)
                            .await;
                        exec_response(Some(&yaml), &result)
                    }
                    FlowSource::File(path) => {
                        let result = self.orchestrator.run_flow(&path, device, timeout).await;
                        exec_response(None, &result)
                    }
                }
            }
            "run_steps" => {
                let a: RunStepsArgs = args::parse(arguments)?;
                if a.steps.is_empty() {
                    return Err(BridgeError::InvalidArguments(
                        "run_steps requires at least one step".to_string(),
                    ));
                }
                let outcome = self
                    .orchestrator
                    .execute_steps(
                        &a.app_id,
                        &a.steps,
                        a.device_id.as_deref(),
                        a.timeout_secs.map(Duration::from_secs),
                    )
                    .await;
                steps_response(&outcome)
            }
            "run_steps_multi_device" => {
                let a: MultiDeviceArgs = args::parse(arguments)?;
                a.validate()?;
                let outcome = self
                    .orchestrator
                    .execute_steps_multi_device(
                        &a.app_id,
                        &a.steps,
                        &a.device_ids,
                        a.timeout_secs.map(Duration::from_secs),
                    )
                    .await;
                let failed = outcome.results_by_device.values().any(|r| !r.is_success());
                ToolResponse::json(&outcome, failed)
            }
            "run_sharded" => {
                let a: ShardedArgs = args::parse(arguments)?;
                if a.shards == 0 {
                    return Err(BridgeError::InvalidArguments(
                        "run_sharded requires shards >= 1".to_string(),
                    ));
                }
                let result = self
                    .orchestrator
                    .run_sharded(&a.flow_directory, a.shards, a.strategy)
                    .await;
                exec_response(None, &result)
            }
            "start_studio" => {
                let a: StudioArgs = args::parse(arguments)?;
                let port = a.port.or(self.studio_port);
                let result = self
                    .orchestrator
                    .engine()
                    .start_studio(a.device_id.as_deref(), port)
                    .await;
                let mut body = json!({ "result": result });
                if let Some(port) = port {
                    body["url"] = json!(format!("http://localhost:{port}"));
                }
                ToolResponse::json(&body, !result.is_success())
            }
            "raw_command" => {
                let a: RawArgs = args::parse(arguments)?;
                if a.args.is_empty() {
                    return Err(BridgeError::InvalidArguments(
                        "raw_command requires at least one argument".to_string(),
                    ));
                }
                exec_response(None, &self.orchestrator.raw_command(a.args).await)
            }

            other => return Err(BridgeError::UnknownTool(other.to_string())),
        };

        Ok(response)
    }

    async fn run_app_steps(
        &self,
        app_id: &str,
        device_id: Option<&str>,
        steps: &[Step],
    ) -> ToolResponse {
        let outcome = self
            .orchestrator
            .execute_steps(app_id, steps, device_id, None)
            .await;
        steps_response(&outcome)
    }
}

fn steps_response(outcome: &StepsOutcome) -> ToolResponse {
    exec_response(Some(outcome.document.as_str()), &outcome.result)
}

fn exec_response(document: Option<&str>, result: &ExecResult) -> ToolResponse {
    ToolResponse::json(&ResultPayload { document, result }, !result.is_success())
}
