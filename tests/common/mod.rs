#![allow(dead_code)]

use std::future::Future;

use tokio::time::{Duration, timeout};

pub use maestro_mcp_test_utils::init_tracing;

/// Fail the test instead of hanging when `fut` does not settle in time.
pub async fn with_timeout<F, T>(fut: F) -> T
where
    F: Future<Output = T>,
{
    timeout(Duration::from_secs(10), fut)
        .await
        .expect("test future timed out")
}
