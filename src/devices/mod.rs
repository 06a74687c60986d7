// src/devices/mod.rs

//! Device discovery.
//!
//! Runs `adb devices` and `xcrun simctl list devices --json` concurrently and
//! normalises both into [`Device`] records. Each platform fails on its own:
//! a missing tool, non-zero exit or unparseable output yields an empty list
//! for that platform and never affects the other.

pub mod android;
pub mod ios;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, warn};

use crate::config::DevicesSection;
use crate::exec::{CommandRunner, Invocation};
use crate::types::{Device, ExecResult};

pub use android::parse_adb_devices;
pub use ios::parse_simctl_devices;

/// Devices per platform, rebuilt on every query.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeviceList {
    pub android: Vec<Device>,
    pub ios: Vec<Device>,
}

#[derive(Clone)]
pub struct DeviceInventory {
    adb: String,
    xcrun: String,
    timeout: Duration,
    runner: Arc<dyn CommandRunner>,
}

impl fmt::Debug for DeviceInventory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceInventory")
            .field("adb", &self.adb)
            .field("xcrun", &self.xcrun)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl DeviceInventory {
    pub fn new(section: &DevicesSection, runner: Arc<dyn CommandRunner>) -> Self {
        Self {
            adb: section.adb.clone(),
            xcrun: section.xcrun.clone(),
            timeout: section.discovery_timeout(),
            runner,
        }
    }

    pub async fn list_devices(&self) -> DeviceList {
        let adb = self.runner.run_buffered(Invocation::new(
            &self.adb,
            ["devices"],
            self.timeout,
        ));
        let simctl = self.runner.run_buffered(Invocation::new(
            &self.xcrun,
            ["simctl", "list", "devices", "--json"],
            self.timeout,
        ));

        let (adb, simctl) = tokio::join!(adb, simctl);

        let android = successful_stdout("adb", &adb)
            .map(parse_adb_devices)
            .unwrap_or_default();
        let ios = successful_stdout("simctl", &simctl)
            .map(parse_simctl_devices)
            .unwrap_or_default();

        debug!(android = android.len(), ios = ios.len(), "device discovery finished");
        DeviceList { android, ios }
    }
}

fn successful_stdout<'a>(tool: &str, result: &'a ExecResult) -> Option<&'a str> {
    if result.is_success() {
        Some(&result.stdout)
    } else {
        warn!(
            tool,
            exit_code = result.exit_code,
            stderr = %result.stderr.trim(),
            "device discovery command failed"
        );
        None
    }
}
