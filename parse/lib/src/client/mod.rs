//! HTTP client module.
//!
//! [`ParseClient`] is the single execution path for every request variant:
//! it resolves the variant's URL, attaches credentials and the bound
//! session, performs the exchange and hands back the raw response body.
//!
//! ## Examples
//!
//! ```rust,ignore
//! use parse_lib::ParseClient;
//!
//! let client = ParseClient::builder("app-id", "rest-key")
//!     .host("parse.example.com")
//!     .mount_point("/parse")
//!     .build()?;
//!
//! let greeting: String = client.call_function("hello", None).await?;
//! ```

mod config;
mod executor;

pub use config::{
    API_VERSION, APPLICATION_ID_ENV, ClientConfig, DEFAULT_HOST, DEFAULT_MOUNT_POINT,
    DEFAULT_SCHEME, DEFAULT_TIMEOUT_SECS, HOST_ENV, MASTER_KEY_ENV, MOUNT_POINT_ENV,
    REST_API_KEY_ENV, SCHEME_ENV,
};
pub use executor::{
    APPLICATION_ID_HEADER, MASTER_KEY_HEADER, ParseClient, ParseClientBuilder, REST_API_KEY_HEADER,
    SESSION_TOKEN_HEADER,
};
