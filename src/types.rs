use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// One automation instruction prior to rendering.
///
/// `parameters` is untyped: each action takes whatever shape the
/// engine expects and the flow builder decides how to render it.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Step {
    pub action: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parameters: Option<Value>,
}

impl Step {
    /// A step without parameters, rendered as `- <action>`.
    pub fn bare(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            parameters: None,
        }
    }

    pub fn with(action: impl Into<String>, parameters: impl Into<Value>) -> Self {
        Self {
            action: action.into(),
            parameters: Some(parameters.into()),
        }
    }
}

/// Result of a single external process invocation.
///
/// `exit_code == 0` is the only success sentinel; timeouts, signals and spawn
/// failures all surface as non-zero codes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecResult {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

impl ExecResult {
    /// Failure without any process output, e.g. a scratch file that could
    /// not be written.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            stdout: String::new(),
            stderr: message.into(),
            exit_code: 1,
        }
    }

    pub fn is_success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Strategy for `maestro test --shard-*`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShardStrategy {
    /// Run every flow on every shard.
    All,
    /// Split the flows across shards.
    Split,
}

impl Default for ShardStrategy {
    fn default() -> Self {
        ShardStrategy::Split
    }
}

impl ShardStrategy {
    pub fn flag(self) -> &'static str {
        match self {
            ShardStrategy::All => "--shard-all",
            ShardStrategy::Split => "--shard-split",
        }
    }
}

impl FromStr for ShardStrategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(ShardStrategy::All),
            "split" => Ok(ShardStrategy::Split),
            other => Err(format!(
                "invalid shard strategy: {other} (expected \"all\" or \"split\")"
            )),
        }
    }
}

/// Connection state of a discovered device.
///
/// adb reports a fixed vocabulary; simulators report free-form runtime states
/// which are kept lower-cased in `Other`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeviceStatus {
    Device,
    Offline,
    Unauthorized,
    Other(String),
}

impl DeviceStatus {
    pub fn as_str(&self) -> &str {
        match self {
            DeviceStatus::Device => "device",
            DeviceStatus::Offline => "offline",
            DeviceStatus::Unauthorized => "unauthorized",
            DeviceStatus::Other(s) => s,
        }
    }
}

impl fmt::Display for DeviceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeviceStatus {
    type Err = String;

    /// Parses the adb vocabulary only; anything else is rejected so callers
    /// can skip unknown rows.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "device" => Ok(DeviceStatus::Device),
            "offline" => Ok(DeviceStatus::Offline),
            "unauthorized" => Ok(DeviceStatus::Unauthorized),
            other => Err(format!("unknown adb device state: {other}")),
        }
    }
}

impl Serialize for DeviceStatus {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// A discovered automation target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Device {
    pub id: String,
    pub status: DeviceStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}
