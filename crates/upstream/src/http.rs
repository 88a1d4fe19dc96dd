//! Shared plumbing for the upstream clients.

use std::time::Duration;

use reqwest::Url;
use serde::de::DeserializeOwned;

use crate::error::UpstreamError;

/// Upper bound on establishing a TCP connection, independent of the overall
/// request timeout.
const MAX_CONNECT_TIMEOUT: Duration = Duration::from_secs(2);

/// Build the HTTP client shared by every upstream lookup.
///
/// `timeout` bounds the whole request; expiry surfaces as
/// [`UpstreamError::Request`] with `is_timeout() == true`.
pub fn build_client(timeout: Duration) -> Result<reqwest::Client, UpstreamError> {
    let client = reqwest::Client::builder()
        .timeout(timeout)
        .connect_timeout(timeout.min(MAX_CONNECT_TIMEOUT))
        .build()?;
    Ok(client)
}

/// Parse a service base URL. A trailing slash is optional.
pub fn parse_base_url(raw: &str) -> Result<Url, UpstreamError> {
    let url = Url::parse(raw).map_err(|e| UpstreamError::InvalidBaseUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    if url.cannot_be_a_base() {
        return Err(UpstreamError::InvalidBaseUrl {
            url: raw.to_string(),
            reason: "not a hierarchical URL".into(),
        });
    }
    Ok(url)
}

/// Append percent-encoded path segments to `base`.
pub fn endpoint(base: &Url, segments: &[&str]) -> Url {
    let mut url = base.clone();
    if let Ok(mut path) = url.path_segments_mut() {
        path.pop_if_empty().extend(segments);
    }
    url
}

/// Ensure the response has a success status code. Returns the response
/// unchanged on success, or [`UpstreamError::Status`] with the body text.
pub async fn ensure_success(
    service: &'static str,
    response: reqwest::Response,
) -> Result<reqwest::Response, UpstreamError> {
    let status = response.status();
    if !status.is_success() {
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "<unreadable body>".to_string());
        return Err(UpstreamError::Status {
            service,
            status: status.as_u16(),
            body,
        });
    }
    Ok(response)
}

/// Read a successful response body as JSON.
pub async fn parse_json<T: DeserializeOwned>(
    service: &'static str,
    response: reqwest::Response,
) -> Result<T, UpstreamError> {
    let response = ensure_success(service, response).await?;
    let bytes = response.bytes().await?;
    Ok(serde_json::from_slice(&bytes)?)
}
