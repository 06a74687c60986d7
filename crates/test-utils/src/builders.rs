#![allow(dead_code)]

use serde_json::Value;
use maestro_mcp::config::{ConfigFile, RawConfigFile};
use maestro_mcp::types::Step;

/// Builder for `ConfigFile` to simplify test setup.
pub struct ConfigFileBuilder {
    config: RawConfigFile,
}

impl ConfigFileBuilder {
    pub fn new() -> Self {
        Self {
            config: RawConfigFile::default(),
        }
    }

    pub fn binary(mut self, binary: &str) -> Self {
        self.config.engine.binary = binary.to_string();
        self
    }

    pub fn flow_timeout_secs(mut self, secs: u64) -> Self {
        self.config.engine.flow_timeout_secs = secs;
        self
    }

    pub fn command_timeout_secs(mut self, secs: u64) -> Self {
        self.config.engine.command_timeout_secs = secs;
        self
    }

    pub fn adb(mut self, adb: &str) -> Self {
        self.config.devices.adb = adb.to_string();
        self
    }

    pub fn xcrun(mut self, xcrun: &str) -> Self {
        self.config.devices.xcrun = xcrun.to_string();
        self
    }

    pub fn studio_port(mut self, port: u16) -> Self {
        self.config.studio.port = Some(port);
        self
    }

    pub fn build(self) -> ConfigFile {
        ConfigFile::try_from(self.config).expect("Failed to build valid config from builder")
    }
}

impl Default for ConfigFileBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for ordered step lists.
#[derive(Default)]
pub struct StepsBuilder {
    steps: Vec<Step>,
}

impl StepsBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bare(mut self, action: &str) -> Self {
        self.steps.push(Step::bare(action));
        self
    }

    pub fn with(mut self, action: &str, parameters: impl Into<Value>) -> Self {
        self.steps.push(Step::with(action, parameters));
        self
    }

    pub fn build(self) -> Vec<Step> {
        self.steps
    }
}
