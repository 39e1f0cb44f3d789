pub mod builders;
pub mod fake_scan;

use std::sync::Once;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use tracing_subscriber::{fmt, EnvFilter};

static INIT: Once = Once::new();

/// Initialise tracing for tests.
///
/// - Uses `with_test_writer()`, so logs are captured per-test.
/// - The Rust test harness only prints captured output for **failing** tests
///   (unless you run with `-- --nocapture`).
///
/// Enable levels with e.g.:
/// `RUST_LOG=debug cargo test`
pub fn init_tracing() {
    INIT.call_once(|| {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer() // print only for failing tests unless --nocapture
            .with_target(true)
            .init();
    });
}

/// Run a future with a 5-second timeout.
///
/// A build that never resolves (e.g. a lost completion signal) fails the
/// test instead of hanging it.
pub async fn with_timeout<F, T>(f: F) -> T
where
    F: std::future::Future<Output = T>,
{
    tokio::time::timeout(Duration::from_secs(5), f)
        .await
        .expect("Test timed out after 5 seconds")
}

/// Midnight of the given day of January 2001, as used in rule-file fixtures.
pub fn day(n: u64) -> SystemTime {
    // 2001-01-01T00:00:00Z
    const JAN_1_2001: u64 = 978_307_200;
    UNIX_EPOCH + Duration::from_secs(JAN_1_2001 + (n.saturating_sub(1)) * 86_400)
}
