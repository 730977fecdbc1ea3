//! Client configuration errors.

use thiserror::Error;

/// Errors in client configuration.
///
/// These occur while building a client or resolving a request's URL, and
/// usually indicate a programmer or deployment mistake.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// URL parsing failed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// The configured scheme and host do not form a hierarchical URL.
    #[error("URL cannot carry a path: {url}")]
    CannotBeABase {
        /// The offending URL.
        url: String,
    },

    /// A required environment variable is unset or blank.
    #[error("Missing environment variable: {var}")]
    MissingEnv {
        /// The name of the variable.
        var: &'static str,
    },

    /// A request needs the master key but none is configured.
    #[error("Request requires the master key but none is configured")]
    MissingMasterKey,

    /// A default header could not be encoded.
    #[error("Invalid header: {0}")]
    InvalidHeader(String),
}
