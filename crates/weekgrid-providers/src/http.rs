//! Shared HTTP plumbing for the feed and API adapters.

use std::time::Duration;

use reqwest::{Client, Response};
use tracing::debug;

use crate::error::{ProviderError, ProviderResult};

const USER_AGENT: &str = concat!("weekgrid/", env!("CARGO_PKG_VERSION"));

/// Builds the HTTP client used by an adapter.
pub(crate) fn build_client(timeout: Duration) -> ProviderResult<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| {
            ProviderError::configuration(format!("Failed to create HTTP client: {}", e))
                .with_source(e)
        })
}

/// Maps a transport failure to a network error.
pub(crate) fn send_error(e: reqwest::Error) -> ProviderError {
    let message = if e.is_timeout() {
        "request timeout".to_string()
    } else if e.is_connect() {
        format!("connection failed: {}", e)
    } else {
        format!("request failed: {}", e)
    };
    ProviderError::network(message).with_source(e)
}

/// Returns the body of a 2xx response, or the mapped status error.
pub(crate) async fn success_body(response: Response) -> ProviderResult<String> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        debug!(status = status.as_u16(), "Source answered with error status");
        return Err(ProviderError::from_status(status.as_u16(), body.trim()));
    }

    response.text().await.map_err(|e| {
        ProviderError::network(format!("failed to read response: {}", e)).with_source(e)
    })
}
