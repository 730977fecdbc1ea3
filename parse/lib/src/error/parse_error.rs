//! Top-level Parse client error type.

use super::{ArgumentError, ClientError, ConfigError, ProtocolError};
use crate::class_name::ClassNameError;
use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T, E = ParseError> = std::result::Result<T, E>;

/// Top-level error type for all Parse client operations.
///
/// Every failure is returned to the immediate caller as-is; nothing is
/// retried or swallowed on the way up.
///
/// ## Examples
///
/// ```rust,ignore
/// use parse_lib::ParseError;
///
/// fn handle_error(err: ParseError) {
///     match err {
///         ParseError::Argument(e) => eprintln!("Bad input: {e}"),
///         ParseError::Client(e) => eprintln!("Network error: {e}"),
///         ParseError::Protocol(e) => eprintln!("Server said no: {e}"),
///         ParseError::Config(e) => eprintln!("Configuration error: {e}"),
///     }
/// }
/// ```
#[derive(Debug, Error)]
pub enum ParseError {
    /// Invalid caller input. No request was sent.
    #[error(transparent)]
    Argument(#[from] ArgumentError),

    /// Transport failures (network, TLS, connection).
    #[error(transparent)]
    Client(#[from] ClientError),

    /// Non-success statuses and malformed or incomplete payloads.
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// Client configuration errors.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl ParseError {
    /// Returns `true` if the caller supplied an invalid argument.
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::Argument(_))
    }

    /// Returns `true` if the failure happened in the transport layer.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Client(_))
    }

    /// Returns `true` if the server answered but the answer was unusable.
    pub fn is_protocol(&self) -> bool {
        matches!(self, Self::Protocol(_))
    }
}

impl From<ClassNameError> for ParseError {
    fn from(err: ClassNameError) -> Self {
        Self::Argument(ArgumentError::InvalidClassName(err))
    }
}

impl From<serde_json::Error> for ParseError {
    fn from(err: serde_json::Error) -> Self {
        Self::Protocol(ProtocolError::Json(err))
    }
}
