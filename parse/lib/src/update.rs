//! Partial updates of stored objects.

use std::marker::PhantomData;

use serde_json::{Map, Value, json};
use tracing::{debug, instrument};

use crate::class_name::ClassName;
use crate::client::ParseClient;
use crate::error::{ArgumentError, Result};
use crate::object::ParseObject;
use crate::request::UpdateRequest;
use crate::response::{UpdateResult, decode};
use crate::session::SessionToken;

/// A set of field operations applied to one stored object.
///
/// ## Examples
///
/// ```rust,ignore
/// let result = session
///     .new_update(&score)?
///     .increment("score", 10)
///     .set("cheatMode", false)
///     .execute()
///     .await?;
/// ```
#[derive(Debug, Clone)]
pub struct Update<T> {
    client: ParseClient,
    class: ClassName,
    object_id: String,
    operations: Map<String, Value>,
    session: Option<SessionToken>,
    _marker: PhantomData<fn() -> T>,
}

impl<T: ParseObject> Update<T> {
    pub(crate) fn new(
        client: ParseClient,
        object: &T,
        session: Option<SessionToken>,
    ) -> Result<Self> {
        let class = ClassName::new(T::class_name())?;
        let object_id = object
            .object_id()
            .filter(|id| !id.is_empty())
            .ok_or_else(|| ArgumentError::MissingObjectId {
                class_name: class.to_string(),
            })?
            .to_string();

        Ok(Self {
            client,
            class,
            object_id,
            operations: Map::new(),
            session,
            _marker: PhantomData,
        })
    }

    pub fn session(&self) -> Option<&SessionToken> {
        self.session.as_ref()
    }

    pub fn object_id(&self) -> &str {
        &self.object_id
    }

    /// Sets `key` to `value`.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.operations.insert(key.into(), value.into());
        self
    }

    /// Removes the attribute `key`.
    pub fn unset(mut self, key: impl Into<String>) -> Self {
        self.operations
            .insert(key.into(), json!({"__op": "Delete"}));
        self
    }

    /// Atomically adds `amount` to the numeric attribute `key`.
    pub fn increment(mut self, key: impl Into<String>, amount: i64) -> Self {
        self.operations
            .insert(key.into(), json!({"__op": "Increment", "amount": amount}));
        self
    }

    /// Sends the operations.
    #[instrument(skip(self), fields(class = %self.class, object_id = %self.object_id))]
    pub async fn execute(&self) -> Result<UpdateResult> {
        let request = UpdateRequest::new(
            self.class.clone(),
            self.object_id.clone(),
            self.operations.clone(),
            self.session.clone(),
        );
        let body = self.client.dispatch(request).await?;
        let result: UpdateResult = decode(&body)?;
        debug!("Object updated");
        Ok(result)
    }
}

impl ParseClient {
    /// Starts an anonymous update of `object`.
    ///
    /// ## Errors
    ///
    /// Fails with [`ArgumentError::MissingObjectId`] if `object` was never
    /// saved.
    pub fn new_update<T: ParseObject>(&self, object: &T) -> Result<Update<T>> {
        Update::new(self.clone(), object, None)
    }
}
