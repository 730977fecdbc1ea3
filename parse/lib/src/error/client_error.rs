//! HTTP transport errors.

use thiserror::Error;

/// Errors from the HTTP transport layer.
///
/// These represent failures to complete an exchange at all. A response with
/// a non-success status is a [`ProtocolError`](super::ProtocolError) instead.
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed due to a network or protocol error.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),
}

impl ClientError {
    /// Returns `true` if the underlying request timed out.
    pub fn is_timeout(&self) -> bool {
        match self {
            Self::Request(e) => e.is_timeout(),
        }
    }

    /// Returns `true` if the failure happened while connecting.
    pub fn is_connect(&self) -> bool {
        match self {
            Self::Request(e) => e.is_connect(),
        }
    }
}
