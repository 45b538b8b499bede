//! Test server lifecycle management
//!
//! Spawns the adapter on an ephemeral port, pointed at a given AAP base
//! URL (normally a `MockAap` instance).

use std::sync::Arc;

use aap_mcp_server::server::make_app;
use aap_mcp_server::{AapClient, AapConfig, RetryPolicy};
use tokio::net::TcpListener;

/// Retry schedule with millisecond delays so retry tests do not sleep for
/// real.
pub fn fast_retry_policy(max_retries: u32) -> RetryPolicy {
    RetryPolicy {
        max_retries,
        base_delay_ms: 1,
        max_delay_ms: 4,
        multiplier: 2.0,
    }
}

/// Connection config pointing at the given controller URL.
pub fn test_config(aap_url: &str) -> AapConfig {
    AapConfig {
        url: aap_url.trim_end_matches('/').to_string(),
        token: "test-token".to_string(),
        project_id: "7".to_string(),
        verify_ssl: true,
        timeout_secs: 5,
        max_retries: 3,
    }
}

/// A client with the fast retry schedule, for direct client-level tests.
pub fn test_client(aap_url: &str, max_retries: u32) -> AapClient {
    let mut config = test_config(aap_url);
    config.max_retries = max_retries;
    AapClient::new(config)
        .expect("Failed to create AAP client")
        .with_retry_policy(fast_retry_policy(max_retries))
}

/// Running adapter instance for e2e tests.
pub struct TestServer {
    /// Base URL for making requests (e.g., "http://127.0.0.1:12345")
    pub base_url: String,
}

impl TestServer {
    /// Spawn the adapter on a random port, pointed at `aap_url`.
    pub async fn spawn(aap_url: &str) -> Self {
        let config = test_config(aap_url);
        let client = Arc::new(
            AapClient::new(config.clone())
                .expect("Failed to create AAP client")
                .with_retry_policy(fast_retry_policy(config.max_retries)),
        );

        let app = make_app(client, config);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr = listener.local_addr().expect("Server has no local addr");

        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Test server crashed");
        });

        TestServer {
            base_url: format!("http://{}", addr),
        }
    }
}
