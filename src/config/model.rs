// src/config/model.rs

use std::time::Duration;

use serde::Deserialize;

use crate::exec::process::DEFAULT_MAX_OUTPUT_BYTES;

/// Configuration exactly as read from TOML.
///
/// ```toml
/// [engine]
/// binary = "maestro"
/// command_timeout_secs = 120
/// flow_timeout_secs = 180
/// max_output_bytes = 10485760
///
/// [devices]
/// adb = "adb"
/// xcrun = "xcrun"
/// discovery_timeout_secs = 30
///
/// [studio]
/// port = 9999
/// ```
///
/// All sections are optional. Use `ConfigFile::try_from` to validate.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub engine: EngineSection,

    #[serde(default)]
    pub devices: DevicesSection,

    #[serde(default)]
    pub studio: StudioSection,
}

/// Validated configuration.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub engine: EngineSection,
    pub devices: DevicesSection,
    pub studio: StudioSection,
}

impl ConfigFile {
    /// Build without validation. Only `TryFrom<RawConfigFile>` should call this.
    pub(crate) fn new_unchecked(
        engine: EngineSection,
        devices: DevicesSection,
        studio: StudioSection,
    ) -> Self {
        Self {
            engine,
            devices,
            studio,
        }
    }
}

impl Default for ConfigFile {
    fn default() -> Self {
        let raw = RawConfigFile::default();
        Self::new_unchecked(raw.engine, raw.devices, raw.studio)
    }
}

/// `[engine]` section: how the Maestro CLI is invoked.
#[derive(Debug, Clone, Deserialize)]
pub struct EngineSection {
    /// Executable name or path.
    #[serde(default = "default_binary")]
    pub binary: String,

    /// Budget for short buffered commands (`--version`, `hierarchy`).
    #[serde(default = "default_command_timeout_secs")]
    pub command_timeout_secs: u64,

    /// Budget for streaming commands (`test`, sharded runs, passthrough).
    #[serde(default = "default_flow_timeout_secs")]
    pub flow_timeout_secs: u64,

    /// Per-stream output ceiling for buffered commands.
    #[serde(default = "default_max_output_bytes")]
    pub max_output_bytes: usize,
}

impl EngineSection {
    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_secs)
    }

    pub fn flow_timeout(&self) -> Duration {
        Duration::from_secs(self.flow_timeout_secs)
    }
}

fn default_binary() -> String {
    "maestro".to_string()
}

fn default_command_timeout_secs() -> u64 {
    120
}

fn default_flow_timeout_secs() -> u64 {
    180
}

fn default_max_output_bytes() -> usize {
    DEFAULT_MAX_OUTPUT_BYTES
}

impl Default for EngineSection {
    fn default() -> Self {
        Self {
            binary: default_binary(),
            command_timeout_secs: default_command_timeout_secs(),
            flow_timeout_secs: default_flow_timeout_secs(),
            max_output_bytes: default_max_output_bytes(),
        }
    }
}

/// `[devices]` section: discovery tools.
#[derive(Debug, Clone, Deserialize)]
pub struct DevicesSection {
    #[serde(default = "default_adb")]
    pub adb: String,

    #[serde(default = "default_xcrun")]
    pub xcrun: String,

    #[serde(default = "default_discovery_timeout_secs")]
    pub discovery_timeout_secs: u64,
}

impl DevicesSection {
    pub fn discovery_timeout(&self) -> Duration {
        Duration::from_secs(self.discovery_timeout_secs)
    }
}

fn default_adb() -> String {
    "adb".to_string()
}

fn default_xcrun() -> String {
    "xcrun".to_string()
}

fn default_discovery_timeout_secs() -> u64 {
    30
}

impl Default for DevicesSection {
    fn default() -> Self {
        Self {
            adb: default_adb(),
            xcrun: default_xcrun(),
            discovery_timeout_secs: default_discovery_timeout_secs(),
        }
    }
}

/// `[studio]` section.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StudioSection {
    /// Port used when `start_studio` is called without one.
    #[serde(default)]
    pub port: Option<u16>,
}
