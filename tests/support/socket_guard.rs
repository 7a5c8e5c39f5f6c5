//! Mock-server startup for sandboxes that forbid loopback sockets.
//!
//! Tests that need wiremock call [`mock_server_or_skip`]. When 127.0.0.1
//! cannot be bound the test returns early, unless `IMGSEARCH_MOCK_SERVER`
//! is `required`, in which case it fails.

use std::net::TcpListener;
use std::panic::Location;

use wiremock::MockServer;

const MODE_VAR: &str = "IMGSEARCH_MOCK_SERVER";

fn mock_server_required() -> bool {
    std::env::var(MODE_VAR).is_ok_and(|mode| mode.trim().eq_ignore_ascii_case("required"))
}

/// Starts a wiremock server, or returns `None` when loopback is unavailable.
#[track_caller]
pub fn mock_server_or_skip() -> impl std::future::Future<Output = Option<MockServer>> {
    let caller = Location::caller();
    let loopback_ok = TcpListener::bind("127.0.0.1:0").is_ok();
    async move {
        if loopback_ok {
            return Some(MockServer::start().await);
        }
        assert!(
            !mock_server_required(),
            "{caller}: cannot bind 127.0.0.1 and {MODE_VAR}=required"
        );
        eprintln!("{caller}: cannot bind 127.0.0.1; skipping mock-server test");
        None
    }
}
