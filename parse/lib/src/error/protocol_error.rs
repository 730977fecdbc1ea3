//! Response status and payload errors.

use serde::Deserialize;
use thiserror::Error;

/// Errors raised when the server answered but the answer cannot be used.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Server returned a non-success HTTP status code.
    #[error("HTTP {status}: {message}")]
    Status {
        /// The HTTP status code returned.
        status: u16,
        /// The Parse error code from the response body, when present.
        code: Option<i64>,
        /// The error message from the response body.
        message: String,
    },

    /// JSON encoding or decoding failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A login response carried no `sessionToken`.
    #[error("response did not contain sessionToken")]
    MissingSessionToken,

    /// A login response carried a `sessionToken` that is not a string.
    #[error("sessionToken must be a string, got {found}")]
    InvalidSessionToken {
        /// The JSON type found in place of the string.
        found: &'static str,
    },

    /// A response envelope was missing a required field.
    #[error("response did not contain {field}")]
    MissingField {
        /// The name of the missing field.
        field: &'static str,
    },
}

/// Error body returned by the server alongside non-success statuses.
#[derive(Debug, Deserialize)]
struct ServerErrorBody {
    code: Option<i64>,
    error: Option<String>,
}

impl ProtocolError {
    /// Builds a status error from a non-success response body.
    ///
    /// The server reports failures as `{"code": 101, "error": "..."}`. Bodies
    /// that do not match that shape are kept verbatim as the message.
    pub fn from_status(status: u16, body: &str) -> Self {
        match serde_json::from_str::<ServerErrorBody>(body) {
            Ok(ServerErrorBody {
                code,
                error: Some(message),
            }) => Self::Status {
                status,
                code,
                message,
            },
            Ok(ServerErrorBody { code, error: None }) => Self::Status {
                status,
                code,
                message: body.to_string(),
            },
            Err(_) => Self::Status {
                status,
                code: None,
                message: body.to_string(),
            },
        }
    }

    /// Returns the HTTP status code if this is a status error.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns the server's Parse error code if one was reported.
    pub fn server_code(&self) -> Option<i64> {
        match self {
            Self::Status { code, .. } => *code,
            _ => None,
        }
    }
}

/// Names the JSON type of a value for error messages.
pub(crate) fn json_type_name(value: &serde_json::Value) -> &'static str {
    use serde_json::Value;

    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
