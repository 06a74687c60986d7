// tests/devices.rs

mod common;
use crate::common::{init_tracing, with_timeout};

use std::sync::Arc;

use maestro_mcp::devices::DeviceInventory;
use maestro_mcp::exec::RunMode;
use maestro_mcp::types::{DeviceStatus, ExecResult};
use maestro_mcp_test_utils::builders::ConfigFileBuilder;
use maestro_mcp_test_utils::fake_runner::FakeRunner;

const ADB_OUTPUT: &str = "List of devices attached\n\
emulator-5554\tdevice\n\
R58M123ABC\tunauthorized\n\
\n";

const SIMCTL_OUTPUT: &str = r#"{
  "devices": {
    "com.apple.CoreSimulator.SimRuntime.iOS-17-0": [
      { "udid": "AAAA-1111", "name": "iPhone 15", "state": "Booted", "isAvailable": true },
      { "udid": "BBBB-2222", "name": "iPhone SE", "state": "Shutdown", "isAvailable": false }
    ]
  }
}"#;

fn ok(stdout: &str) -> ExecResult {
    ExecResult {
        stdout: stdout.to_string(),
        stderr: String::new(),
        exit_code: 0,
    }
}

fn inventory(runner: Arc<FakeRunner>) -> DeviceInventory {
    let cfg = ConfigFileBuilder::new().adb("adb").xcrun("xcrun").build();
    DeviceInventory::new(&cfg.devices, runner)
}

#[tokio::test]
async fn both_platforms_are_discovered() {
    init_tracing();

    let runner = Arc::new(FakeRunner::new(|call| match call.invocation.program.as_str() {
        "adb" => ok(ADB_OUTPUT),
        _ => ok(SIMCTL_OUTPUT),
    }));
    let list = with_timeout(inventory(Arc::clone(&runner)).list_devices()).await;

    assert_eq!(list.android.len(), 2);
    assert_eq!(list.android[0].id, "emulator-5554");
    assert_eq!(list.android[0].status, DeviceStatus::Device);
    assert_eq!(list.android[1].status, DeviceStatus::Unauthorized);

    assert_eq!(list.ios.len(), 1);
    assert_eq!(list.ios[0].id, "AAAA-1111");
    assert_eq!(list.ios[0].name.as_deref(), Some("iPhone 15"));
    assert_eq!(list.ios[0].status.as_str(), "booted");

    let calls = runner.calls();
    assert_eq!(calls.len(), 2);
    assert!(calls.iter().all(|c| c.mode == RunMode::Buffered));
    let simctl = calls.iter().find(|c| c.invocation.program == "xcrun").unwrap();
    assert_eq!(simctl.args(), vec!["simctl", "list", "devices", "--json"]);
}

#[tokio::test]
async fn one_failing_platform_does_not_affect_the_other() {
    init_tracing();

    let runner = Arc::new(FakeRunner::new(|call| match call.invocation.program.as_str() {
        "adb" => ok(ADB_OUTPUT),
        _ => ExecResult::failure("failed to start `xcrun`: No such file or directory"),
    }));
    let list = with_timeout(inventory(runner).list_devices()).await;

    assert_eq!(list.android.len(), 2);
    assert!(list.ios.is_empty());
}

#[tokio::test]
async fn unparseable_output_yields_empty_lists() {
    init_tracing();

    let runner = Arc::new(FakeRunner::with_stdout("not json, not adb"));
    let list = with_timeout(inventory(runner).list_devices()).await;

    assert!(list.android.is_empty());
    assert!(list.ios.is_empty());
}
