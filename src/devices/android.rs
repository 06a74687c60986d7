// src/devices/android.rs

use std::sync::LazyLock;

use regex::Regex;

use crate::types::Device;

static ADB_ROW: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\S+)\s+(device|offline|unauthorized)$").expect("valid adb row pattern")
});

/// Parse `adb devices` output.
///
/// The first line is the `List of devices attached` header. Every other line
/// must be exactly `<serial> <state>` with a known state; anything else
/// (blank lines, daemon chatter, `no permissions` rows) is skipped.
pub fn parse_adb_devices(output: &str) -> Vec<Device> {
    output
        .lines()
        .skip(1)
        .filter_map(|line| {
            let caps = ADB_ROW.captures(line.trim())?;
            let status = caps[2].parse().ok()?;
            Some(Device {
                id: caps[1].to_string(),
                status,
                name: None,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DeviceStatus;

    #[test]
    fn parses_known_states_and_skips_header() {
        let out = "List of devices attached\n\
                   emulator-5554\tdevice\n\
                   R58M123ABC\tunauthorized\n\
                   192.168.1.5:5555\toffline\n\n";

        let devices = parse_adb_devices(out);

        assert_eq!(devices.len(), 3);
        assert_eq!(devices[0].id, "emulator-5554");
        assert_eq!(devices[0].status, DeviceStatus::Device);
        assert_eq!(devices[1].status, DeviceStatus::Unauthorized);
        assert_eq!(devices[2].id, "192.168.1.5:5555");
        assert_eq!(devices[2].status, DeviceStatus::Offline);
    }

    #[test]
    fn skips_rows_that_do_not_match_exactly() {
        let out = "List of devices attached\n\
                   * daemon started successfully\n\
                   abc123\tno permissions\n\
                   xyz\tdevice extra\n\
                   ok1\tdevice\n";

        let devices = parse_adb_devices(out);

        assert_eq!(devices.len(), 1);
        assert_eq!(devices[0].id, "ok1");
    }

    #[test]
    fn header_only_is_empty() {
        assert!(parse_adb_devices("List of devices attached\n").is_empty());
        assert!(parse_adb_devices("").is_empty());
    }
}
