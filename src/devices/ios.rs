// src/devices/ios.rs

use std::collections::BTreeMap;

use serde::Deserialize;
use tracing::debug;

use crate::types::{Device, DeviceStatus};

#[derive(Debug, Deserialize)]
struct SimctlList {
    #[serde(default)]
    devices: BTreeMap<String, Vec<SimctlDevice>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SimctlDevice {
    udid: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    state: Option<String>,
    #[serde(default)]
    is_available: Option<bool>,
}

/// Parse `xcrun simctl list devices --json` output.
///
/// Devices are grouped by runtime key; only entries whose `isAvailable` is not
/// explicitly `false` are kept. Malformed JSON yields an empty list.
pub fn parse_simctl_devices(output: &str) -> Vec<Device> {
    let list: SimctlList = match serde_json::from_str(output) {
        Ok(list) => list,
        Err(e) => {
            debug!(error = %e, "unparseable simctl output");
            return Vec::new();
        }
    };

    list.devices
        .into_values()
        .flatten()
        .filter(|d| d.is_available != Some(false))
        .map(|d| Device {
            id: d.udid,
            status: DeviceStatus::Other(
                d.state
                    .map(|s| s.to_lowercase())
                    .unwrap_or_else(|| "unknown".to_string()),
            ),
            name: d.name,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_available_devices_across_runtimes() {
        let out = r#"{
          "devices": {
            "com.apple.CoreSimulator.SimRuntime.iOS-17-0": [
              {"udid": "A1", "name": "iPhone 15", "state": "Booted", "isAvailable": true},
              {"udid": "A2", "name": "iPhone 14", "state": "Shutdown", "isAvailable": false}
            ],
            "com.apple.CoreSimulator.SimRuntime.iOS-16-4": [
              {"udid": "B1", "name": "iPad"}
            ]
          }
        }"#;

        let devices = parse_simctl_devices(out);
        let ids: Vec<_> = devices.iter().map(|d| d.id.as_str()).collect();

        assert_eq!(devices.len(), 2);
        assert!(ids.contains(&"A1"));
        assert!(ids.contains(&"B1"));

        let a1 = devices.iter().find(|d| d.id == "A1").unwrap();
        assert_eq!(a1.status.as_str(), "booted");
        assert_eq!(a1.name.as_deref(), Some("iPhone 15"));

        let b1 = devices.iter().find(|d| d.id == "B1").unwrap();
        assert_eq!(b1.status.as_str(), "unknown");
    }

    #[test]
    fn malformed_json_is_empty() {
        assert!(parse_simctl_devices("not json").is_empty());
        assert!(parse_simctl_devices("").is_empty());
    }
}
