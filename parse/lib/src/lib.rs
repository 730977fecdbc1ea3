//! Typed async client for the Parse REST API.
//!
//! The `parse-lib` crate turns calls such as "log in", "call this cloud
//! function" or "update that object" into HTTP requests, dispatches them
//! through one shared [`ParseClient`] and maps the JSON responses back into
//! caller-supplied types.
//!
//! ## Features
//!
//! - **One dispatch path**: every call is a [`request::Request`] variant
//!   executed by [`ParseClient::dispatch`]
//! - **Sessions**: password, third-party and token-resumption logins yield a
//!   [`Session`] whose derived operations all run as the logged-in user
//! - **Typed objects**: any `serde` type implementing [`ParseObject`] can be
//!   queried, created, updated and deleted
//! - **Layered error handling**: argument, transport, protocol and
//!   configuration failures are distinct [`ParseError`] variants
//!
//! ## Example
//!
//! ```rust,ignore
//! use parse_lib::{ParseClient, Params};
//! use serde_json::json;
//!
//! let client = ParseClient::builder("app-id", "rest-key")
//!     .host("parse.example.com")
//!     .mount_point("/parse")
//!     .build()?;
//!
//! let session = client.login("alice", "secret").await?;
//!
//! let mut params = Params::new();
//! params.insert("movie".into(), json!("The Matrix"));
//! let rating: f64 = session.call_function("averageStars", Some(params)).await?;
//! ```

pub mod auth;
pub mod class_name;
pub mod client;
mod crud;
pub mod error;
pub mod function;
pub mod method;
pub mod object;
pub mod query;
pub mod request;
pub mod response;
pub mod session;
pub mod update;

// Re-exports for convenience
pub use auth::{AnonymousAuthData, AuthData, FacebookAuthData, TwitterAuthData};
pub use class_name::{ClassName, ClassNameError, USER_CLASS};
pub use client::{ClientConfig, ParseClient, ParseClientBuilder};
pub use error::{
    ArgumentError, ClientError, ConfigError, ParseError, ProtocolError, Result,
};
pub use function::Params;
pub use method::Method;
pub use object::{ParseObject, User, UserObject};
pub use query::Query;
pub use request::{ParseRequest, Request};
pub use response::UpdateResult;
pub use session::{Session, SessionToken};
pub use update::Update;
