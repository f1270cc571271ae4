use thiserror::Error;

/// Why an upstream request did not produce a value.
#[derive(Error, Debug)]
pub enum UpstreamError {
    /// Connection failure or timeout
    #[error("transport error: {0}")]
    Transport(String),

    /// Non-success status other than 404
    #[error("unexpected status {0}")]
    Status(u16),

    /// Body did not match the expected schema
    #[error("malformed response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for UpstreamError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            UpstreamError::Transport("request timed out".to_string())
        } else if err.is_decode() {
            UpstreamError::Decode(err.to_string())
        } else {
            UpstreamError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for UpstreamError {
    fn from(err: serde_json::Error) -> Self {
        UpstreamError::Decode(err.to_string())
    }
}
