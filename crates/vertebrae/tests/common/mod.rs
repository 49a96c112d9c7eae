#![allow(dead_code)]

use std::sync::Once;

use tokio::time::{Duration, Instant};
use vertebrae::{MockClient, MockTransport, RouteSpec};

static TRACING: Once = Once::new();

/// Installs a test subscriber once; output shows with `--nocapture`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .try_init();
    });
}

/// The routes of the JSON parsing scenarios.
pub fn json_client() -> MockClient {
    init_tracing();
    let mut transport = MockTransport::default();
    transport
        .mock([
            (
                "/valid.json",
                RouteSpec::new().get(|_| r#"{ "id": 0, "test": "None"}"#.to_string()),
            ),
            (
                "/invalid.json",
                RouteSpec::new().get(|_| r#"{ id: 0, test: "None"}"#.to_string()),
            ),
        ])
        .unwrap_or_else(|e| panic!("Failed to register routes: {e}"));
    MockClient::new(transport)
}

pub fn assert_elapsed(start: Instant, expected: Duration) {
    let elapsed = start.elapsed();
    assert!(elapsed >= expected, "completed early: {elapsed:?} < {expected:?}");
    assert!(
        elapsed < expected + Duration::from_millis(2),
        "completed late: {elapsed:?} vs {expected:?}"
    );
}
