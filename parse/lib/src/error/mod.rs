//! Layered error types for the Parse client.
//!
//! The error hierarchy mirrors where a call can fail:
//! - [`ParseError`] - Top-level error type for all client operations
//! - [`ArgumentError`] - Invalid caller input, detected before any request is sent
//! - [`ClientError`] - HTTP transport and network errors
//! - [`ProtocolError`] - Non-success responses and malformed payloads
//! - [`ConfigError`] - Client configuration and URL construction errors

mod argument_error;
mod client_error;
mod config_error;
mod parse_error;
mod protocol_error;

pub use argument_error::ArgumentError;
pub use client_error::ClientError;
pub use config_error::ConfigError;
pub use parse_error::{ParseError, Result};
pub use protocol_error::ProtocolError;
pub(crate) use protocol_error::json_type_name;
