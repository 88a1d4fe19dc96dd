use setuphub_core::error::CoreError;

/// Errors from the remote service clients.
#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    /// The HTTP request itself failed (connect, DNS, TLS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The service returned a non-2xx status code.
    #[error("{service} returned {status}: {body}")]
    Status {
        service: &'static str,
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The body was not the JSON shape expected.
    #[error("Undecodable response body: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid base URL {url}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

impl UpstreamError {
    /// Whether the failure was the request timing out.
    pub fn is_timeout(&self) -> bool {
        matches!(self, UpstreamError::Request(e) if e.is_timeout())
    }
}

/// Every upstream failure is an availability problem from the caller's
/// point of view. "Not found" is not an error at this layer.
impl From<UpstreamError> for CoreError {
    fn from(err: UpstreamError) -> Self {
        CoreError::ServiceUnavailable(err.to_string())
    }
}
