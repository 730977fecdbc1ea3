//! Caller input errors.

use thiserror::Error;

use crate::class_name::ClassNameError;

/// Errors caused by invalid caller input.
///
/// These are always detected before a request is dispatched, so a call that
/// fails with an `ArgumentError` has not touched the network.
#[derive(Debug, Error)]
pub enum ArgumentError {
    /// A custom user type resolves to a class other than `_User`.
    #[error("user type must resolve to class \"_User\", got \"{class_name}\"")]
    NotUserClass {
        /// The class name the type actually resolved to.
        class_name: String,
    },

    /// A type resolved to a class name the server would reject.
    #[error("Invalid class name: {0}")]
    InvalidClassName(#[from] ClassNameError),

    /// A cloud function was called without a name.
    #[error("Function name cannot be empty")]
    EmptyFunctionName,

    /// An operation that addresses a stored object was given one without an id.
    #[error("{class_name} object has no objectId")]
    MissingObjectId {
        /// The class of the object missing its id.
        class_name: String,
    },

    /// A session token contains bytes that cannot travel in an HTTP header.
    ///
    /// The token itself is never part of the message.
    #[error("session token is not a valid header value")]
    InvalidSessionToken,

    /// The request payload could not be serialized to JSON.
    #[error("request body could not be serialized: {0}")]
    InvalidBody(#[source] serde_json::Error),
}
