use std::time::Duration;

use switchboard_server::SignalingService;

/// Timeout for a single expected message (ms).
pub const RECV_TIMEOUT_MS: u64 = 2000;

/// Window in which no message must arrive (ms).
pub const SILENCE_MS: u64 = 200;

/// Timeout for the relay to observe a disconnect (ms).
pub const TEARDOWN_TIMEOUT_MS: u64 = 2000;

/// Poll `condition` until it holds or `timeout_ms` passes.
pub async fn wait_until<F>(mut condition: F, timeout_ms: u64) -> bool
where
    F: FnMut() -> bool,
{
    let start = std::time::Instant::now();
    let timeout = Duration::from_millis(timeout_ms);

    loop {
        if condition() {
            return true;
        }
        if start.elapsed() > timeout {
            return false;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

/// Wait for the relay's connection count to reach `expected`.
pub async fn wait_for_connections(service: &SignalingService, expected: usize) -> bool {
    wait_until(
        || service.stats().active_connections == expected,
        TEARDOWN_TIMEOUT_MS,
    )
    .await
}
