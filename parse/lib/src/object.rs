//! Remote object types and class-name resolution.
//!
//! Every type stored on the server implements [`ParseObject`], which ties a
//! Rust type to its remote class name. Types that can act as the user of a
//! [`Session`](crate::Session) additionally implement [`UserObject`].

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::class_name::USER_CLASS;

/// A type stored as objects of a remote class.
///
/// ## Examples
///
/// ```rust
/// use parse_lib::ParseObject;
///
/// #[derive(serde::Serialize, serde::Deserialize)]
/// #[serde(rename_all = "camelCase")]
/// struct GameScore {
///     #[serde(skip_serializing_if = "Option::is_none")]
///     object_id: Option<String>,
///     score: i64,
/// }
///
/// impl ParseObject for GameScore {
///     fn class_name() -> &'static str {
///         "GameScore"
///     }
///
///     fn object_id(&self) -> Option<&str> {
///         self.object_id.as_deref()
///     }
/// }
/// ```
pub trait ParseObject: Serialize + DeserializeOwned + Send + Sync {
    /// The remote class this type maps to.
    fn class_name() -> &'static str;

    /// The server-assigned id, once the object has been saved.
    fn object_id(&self) -> Option<&str>;
}

/// A type that can hold the logged-in user of a session.
///
/// Implementers must resolve to the `_User` class; the authentication flows
/// reject any other class before sending a request.
pub trait UserObject: ParseObject + Default {}

/// The built-in user representation.
///
/// Well-known attributes get typed fields; every other attribute the server
/// returns is kept in [`attributes`](Self::attributes).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct User {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub object_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
    /// Any attribute without a dedicated field.
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
}

impl User {
    /// Returns an attribute without a dedicated field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.attributes.get(key)
    }
}

impl ParseObject for User {
    fn class_name() -> &'static str {
        USER_CLASS
    }

    fn object_id(&self) -> Option<&str> {
        self.object_id.as_deref()
    }
}

impl UserObject for User {}
