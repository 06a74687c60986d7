// src/tools/args.rs

//! Typed tool arguments and their translation into steps.
//!
//! Arguments arrive as camelCase JSON. Anything that cannot produce a valid
//! flow (missing selector, swipe without a direction or endpoints, ...) is
//! rejected here, before a process is ever spawned.

use std::path::PathBuf;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value, json};

use crate::errors::{BridgeError, Result};
use crate::types::{ShardStrategy, Step};

const SWIPE_DIRECTIONS: [&str; 4] = ["UP", "DOWN", "LEFT", "RIGHT"];

/// Deserialize tool arguments, treating a missing/null payload as `{}`.
pub fn parse<T: DeserializeOwned>(arguments: Value) -> Result<T> {
    let arguments = match arguments {
        Value::Null => Value::Object(Map::new()),
        other => other,
    };
    serde_json::from_value(arguments).map_err(|e| BridgeError::InvalidArguments(e.to_string()))
}

fn invalid(message: impl Into<String>) -> BridgeError {
    BridgeError::InvalidArguments(message.into())
}

/// Element selector shared by tap/assert/scroll tools.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Selector {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub id: Option<String>,
}

impl Selector {
    fn is_empty(&self) -> bool {
        self.text.is_none() && self.id.is_none()
    }

    fn insert_into(&self, map: &mut Map<String, Value>) {
        if let Some(text) = &self.text {
            map.insert("text".into(), json!(text));
        }
        if let Some(id) = &self.id {
            map.insert("id".into(), json!(id));
        }
    }

    /// A text-only selector collapses to the inline `- action: "text"` form.
    fn to_parameters(&self) -> Value {
        match (&self.text, &self.id) {
            (Some(text), None) => json!(text),
            _ => {
                let mut map = Map::new();
                self.insert_into(&mut map);
                Value::Object(map)
            }
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppArgs {
    pub app_id: String,
    #[serde(default)]
    pub device_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchAppArgs {
    pub app_id: String,
    #[serde(default)]
    pub device_id: Option<String>,
    #[serde(default)]
    pub clear_state: Option<bool>,
    #[serde(default)]
    pub stop_app: Option<bool>,
}

impl LaunchAppArgs {
    pub fn to_steps(&self) -> Vec<Step> {
        if self.clear_state.is_none() && self.stop_app.is_none() {
            return vec![Step::with("launchApp", self.app_id.clone())];
        }

        let mut map = Map::new();
        map.insert("appId".into(), json!(self.app_id));
        if let Some(clear) = self.clear_state {
            map.insert("clearState".into(), json!(clear));
        }
        if let Some(stop) = self.stop_app {
            map.insert("stopApp".into(), json!(stop));
        }
        vec![Step::with("launchApp", Value::Object(map))]
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TapOnArgs {
    pub app_id: String,
    #[serde(default)]
    pub device_id: Option<String>,
    #[serde(flatten)]
    pub selector: Selector,
    /// `"50%,50%"` or `{"x": 50, "y": 100}`.
    #[serde(default)]
    pub point: Option<Value>,
    #[serde(default)]
    pub index: Option<u32>,
    #[serde(default)]
    pub long_press: bool,
}

impl TapOnArgs {
    pub fn to_steps(&self) -> Result<Vec<Step>> {
        if self.selector.is_empty() && self.point.is_none() {
            return Err(invalid("tap_on requires `text`, `id` or `point`"));
        }

        let action = if self.long_press { "longPressOn" } else { "tapOn" };

        let parameters = if self.point.is_none() && self.index.is_none() {
            self.selector.to_parameters()
        } else {
            let mut map = Map::new();
            self.selector.insert_into(&mut map);
            if let Some(point) = &self.point {
                map.insert("point".into(), point.clone());
            }
            if let Some(index) = self.index {
                map.insert("index".into(), json!(index));
            }
            Value::Object(map)
        };

        Ok(vec![Step::with(action, parameters)])
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InputTextArgs {
    pub app_id: String,
    #[serde(default)]
    pub device_id: Option<String>,
    pub text: String,
    /// Field to focus first, by resource id.
    #[serde(default)]
    pub element_id: Option<String>,
}

impl InputTextArgs {
    pub fn to_steps(&self) -> Vec<Step> {
        let mut steps = Vec::with_capacity(2);
        if let Some(id) = &self.element_id {
            steps.push(Step::with("tapOn", json!({ "id": id })));
        }
        steps.push(Step::with("inputText", self.text.clone()));
        steps
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EraseTextArgs {
    pub app_id: String,
    #[serde(default)]
    pub device_id: Option<String>,
    #[serde(default)]
    pub characters: Option<u32>,
}

impl EraseTextArgs {
    pub fn to_steps(&self) -> Vec<Step> {
        match self.characters {
            Some(n) => vec![Step::with("eraseText", n)],
            None => vec![Step::bare("eraseText")],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwipeArgs {
    pub app_id: String,
    #[serde(default)]
    pub device_id: Option<String>,
    #[serde(default)]
    pub direction: Option<String>,
    /// `"90%,50%"`
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
    #[serde(default)]
    pub duration: Option<u64>,
}

impl SwipeArgs {
    pub fn to_steps(&self) -> Result<Vec<Step>> {
        let mut map = Map::new();

        match (&self.direction, &self.start, &self.end) {
            (Some(direction), _, _) => {
                let direction = direction.trim().to_uppercase();
                if !SWIPE_DIRECTIONS.contains(&direction.as_str()) {
                    return Err(invalid(format!(
                        "invalid swipe direction: {direction} (expected UP, DOWN, LEFT or RIGHT)"
                    )));
                }
                map.insert("direction".into(), json!(direction));
            }
            (None, Some(start), Some(end)) => {
                map.insert("start".into(), json!(start));
                map.insert("end".into(), json!(end));
            }
            _ => {
                return Err(invalid(
                    "swipe requires either `direction` or both `start` and `end`",
                ));
            }
        }

        if let Some(duration) = self.duration {
            map.insert("duration".into(), json!(duration));
        }

        Ok(vec![Step::with("swipe", Value::Object(map))])
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrollUntilVisibleArgs {
    pub app_id: String,
    #[serde(default)]
    pub device_id: Option<String>,
    #[serde(flatten)]
    pub selector: Selector,
    #[serde(default)]
    pub direction: Option<String>,
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

impl ScrollUntilVisibleArgs {
    pub fn to_steps(&self) -> Result<Vec<Step>> {
        if self.selector.is_empty() {
            return Err(invalid("scroll_until_visible requires `text` or `id`"));
        }

        let mut element = Map::new();
        self.selector.insert_into(&mut element);

        let mut map = Map::new();
        map.insert("element".into(), Value::Object(element));
        if let Some(direction) = &self.direction {
            map.insert("direction".into(), json!(direction.trim().to_uppercase()));
        }
        if let Some(timeout) = self.timeout_ms {
            map.insert("timeout".into(), json!(timeout));
        }

        Ok(vec![Step::with("scrollUntilVisible", Value::Object(map))])
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssertArgs {
    pub app_id: String,
    #[serde(default)]
    pub device_id: Option<String>,
    #[serde(flatten)]
    pub selector: Selector,
}

impl AssertArgs {
    pub fn to_steps(&self, action: &str) -> Result<Vec<Step>> {
        if self.selector.is_empty() {
            return Err(invalid(format!("{action} requires `text` or `id`")));
        }
        Ok(vec![Step::with(action, self.selector.to_parameters())])
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PressKeyArgs {
    pub app_id: String,
    #[serde(default)]
    pub device_id: Option<String>,
    pub key: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenLinkArgs {
    pub app_id: String,
    #[serde(default)]
    pub device_id: Option<String>,
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaitArgs {
    pub app_id: String,
    #[serde(default)]
    pub device_id: Option<String>,
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

impl WaitArgs {
    pub fn to_steps(&self) -> Vec<Step> {
        match self.timeout_ms {
            Some(ms) => vec![Step::with("waitForAnimationToEnd", json!({ "timeout": ms }))],
            None => vec![Step::bare("waitForAnimationToEnd")],
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceArgs {
    #[serde(default)]
    pub device_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScreenshotArgs {
    #[serde(default)]
    pub device_id: Option<String>,
    #[serde(default)]
    pub output_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudioArgs {
    #[serde(default)]
    pub device_id: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
}

/// Where a `run_flow` call gets its document from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FlowSource {
    Inline(String),
    File(PathBuf),
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunFlowArgs {
    #[serde(default)]
    pub flow_yaml: Option<String>,
    #[serde(default)]
    pub flow_file: Option<PathBuf>,
    #[serde(default)]
    pub device_id: Option<String>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl RunFlowArgs {
    pub fn source(&self) -> Result<FlowSource> {
        match (&self.flow_yaml, &self.flow_file) {
            (Some(_), Some(_)) => Err(invalid(
                "run_flow takes either `flowYaml` or `flowFile`, not both",
            )),
            (Some(yaml), None) if !yaml.trim().is_empty() => Ok(FlowSource::Inline(yaml.clone())),
            (None, Some(file)) => Ok(FlowSource::File(file.clone())),
            _ => Err(invalid("run_flow requires `flowYaml` or `flowFile`")),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunStepsArgs {
    pub app_id: String,
    pub steps: Vec<Step>,
    #[serde(default)]
    pub device_id: Option<String>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MultiDeviceArgs {
    pub app_id: String,
    pub steps: Vec<Step>,
    pub device_ids: Vec<String>,
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

impl MultiDeviceArgs {
    pub fn validate(&self) -> Result<()> {
        if self.device_ids.is_empty() {
            return Err(invalid("run_steps_multi_device requires at least one device id"));
        }
        if self.steps.is_empty() {
            return Err(invalid("run_steps_multi_device requires at least one step"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShardedArgs {
    pub flow_directory: PathBuf,
    pub shards: u32,
    #[serde(default)]
    pub strategy: ShardStrategy,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawArgs {
    pub args: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn swipe_without_direction_or_points_is_invalid() {
        let args: SwipeArgs = parse(json!({"appId": "a", "start": "10%,10%"})).unwrap();
        match args.to_steps() {
            Err(BridgeError::InvalidArguments(msg)) => assert!(msg.contains("direction")),
            other => panic!("expected InvalidArguments, got {other:?}"),
        }
    }

    #[test]
    fn swipe_direction_is_normalised() {
        let args: SwipeArgs = parse(json!({"appId": "a", "direction": "left"})).unwrap();
        let steps = args.to_steps().unwrap();
        assert_eq!(steps[0].parameters, Some(json!({"direction": "LEFT"})));
    }

    #[test]
    fn text_only_tap_is_inline() {
        let args: TapOnArgs = parse(json!({"appId": "a", "text": "Login"})).unwrap();
        let steps = args.to_steps().unwrap();
        assert_eq!(steps, vec![Step::with("tapOn", "Login")]);
    }

    #[test]
    fn tap_with_point_keeps_nested_shape() {
        let args: TapOnArgs =
            parse(json!({"appId": "a", "point": {"x": 50, "y": 100}})).unwrap();
        let steps = args.to_steps().unwrap();
        assert_eq!(
            steps[0].parameters,
            Some(json!({"point": {"x": 50, "y": 100}}))
        );
    }

    #[test]
    fn run_flow_needs_a_source() {
        let args: RunFlowArgs = parse(json!({})).unwrap();
        assert!(matches!(args.source(), Err(BridgeError::InvalidArguments(_))));
    }

    #[test]
    fn missing_required_field_is_invalid_arguments() {
        let err = parse::<AppArgs>(Value::Null).unwrap_err();
        assert!(matches!(err, BridgeError::InvalidArguments(_)));
    }
}
