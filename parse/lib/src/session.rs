//! Authenticated sessions and the operations derived from them.
//!
//! A [`Session`] is produced by one of the authentication flows on
//! [`ParseClient`]. Every operation derived from it (queries, updates,
//! creates, deletes, cloud function calls) is bound to the session's token
//! when the operation is constructed, so the server sees the same identity
//! for all of them. Sessions are never modified after they are handed out,
//! which makes sharing one across concurrent tasks safe.

use std::fmt;
use std::sync::Arc;

use serde::de::DeserializeOwned;

use crate::client::ParseClient;
use crate::crud;
use crate::error::Result;
use crate::function::{self, Params};
use crate::object::{ParseObject, User, UserObject};
use crate::query::Query;
use crate::update::Update;

/// The credential that identifies a logged-in user.
///
/// Cloning is cheap and every clone refers to the same token. `Debug` and
/// `Display` never print the token itself; use [`as_str`](Self::as_str).
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SessionToken(Arc<str>);

impl SessionToken {
    pub fn new(token: impl Into<Arc<str>>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SessionToken([redacted])")
    }
}

impl fmt::Display for SessionToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[redacted]")
    }
}

impl From<&str> for SessionToken {
    fn from(token: &str) -> Self {
        Self::new(token)
    }
}

impl From<String> for SessionToken {
    fn from(token: String) -> Self {
        Self::new(token)
    }
}

/// An authenticated identity.
///
/// Holds the user the server returned at login and the session token that
/// authorizes requests on that user's behalf. Logging in again yields a new,
/// independent session.
///
/// ## Examples
///
/// ```rust,ignore
/// let session = client.login("alice", "secret").await?;
/// println!("logged in as {:?}", session.user().username);
///
/// let greeting: String = session.call_function("hello", None).await?;
/// let scores = session.new_query::<GameScore>()?.limit(10).find().await?;
/// ```
#[derive(Debug, Clone)]
pub struct Session<U = User> {
    client: ParseClient,
    user: U,
    token: SessionToken,
}

impl<U: UserObject> Session<U> {
    pub(crate) fn new(client: ParseClient, user: U, token: SessionToken) -> Self {
        Self {
            client,
            user,
            token,
        }
    }

    /// The logged-in user.
    pub fn user(&self) -> &U {
        &self.user
    }

    /// Consumes the session and returns its user.
    pub fn into_user(self) -> U {
        self.user
    }

    pub(crate) fn user_mut(&mut self) -> &mut U {
        &mut self.user
    }

    pub fn session_token(&self) -> &SessionToken {
        &self.token
    }

    /// The client this session issues its requests through.
    pub fn client(&self) -> &ParseClient {
        &self.client
    }

    /// Starts a query whose requests run as this session's user.
    ///
    /// ## Errors
    ///
    /// Fails if `T` resolves to an invalid class name.
    pub fn new_query<T: ParseObject>(&self) -> Result<Query<T>> {
        Query::new(self.client.clone(), Some(self.token.clone()))
    }

    /// Starts an update of `object` that runs as this session's user.
    ///
    /// ## Errors
    ///
    /// Fails if `object` has no object id or an invalid class name.
    pub fn new_update<T: ParseObject>(&self, object: &T) -> Result<Update<T>> {
        Update::new(self.client.clone(), object, Some(self.token.clone()))
    }

    /// Saves `object` as a new remote object owned by this session's user.
    ///
    /// On success the server-assigned fields (`objectId`, `createdAt`) are
    /// merged into `object`.
    pub async fn create<T: ParseObject>(&self, object: &mut T) -> Result<()> {
        crud::create(&self.client, object, Some(self.token.clone())).await
    }

    /// Deletes the remote copy of `object` as this session's user.
    pub async fn delete<T: ParseObject>(&self, object: &T) -> Result<()> {
        crud::delete(&self.client, object, Some(self.token.clone())).await
    }

    /// Calls a cloud function as this session's user.
    ///
    /// `None` params are sent as an empty object.
    pub async fn call_function<R: DeserializeOwned>(
        &self,
        name: &str,
        params: Option<Params>,
    ) -> Result<R> {
        function::call(&self.client, name, params, Some(self.token.clone())).await
    }
}
