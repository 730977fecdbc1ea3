//! Object creation and deletion.

use serde_json::Value;
use tracing::{debug, instrument};

use crate::class_name::ClassName;
use crate::client::ParseClient;
use crate::error::{ArgumentError, Result};
use crate::object::ParseObject;
use crate::request::{CreateRequest, DeleteRequest};
use crate::response::{decode, populate_value};
use crate::session::SessionToken;

/// Attributes the server assigns and rejects in a create body.
const RESERVED_FIELDS: [&str; 3] = ["objectId", "createdAt", "updatedAt"];

impl ParseClient {
    /// Saves `object` as a new remote object without a session.
    ///
    /// On success `objectId` and `createdAt` from the response are merged
    /// into `object`.
    pub async fn create<T: ParseObject>(&self, object: &mut T) -> Result<()> {
        create(self, object, None).await
    }

    /// Deletes the remote copy of `object` without a session.
    pub async fn delete<T: ParseObject>(&self, object: &T) -> Result<()> {
        delete(self, object, None).await
    }
}

#[instrument(skip_all, fields(class = T::class_name()))]
pub(crate) async fn create<T: ParseObject>(
    client: &ParseClient,
    object: &mut T,
    session: Option<SessionToken>,
) -> Result<()> {
    let class = ClassName::new(T::class_name())?;

    let mut fields = serde_json::to_value(&*object).map_err(ArgumentError::InvalidBody)?;
    if let Value::Object(map) = &mut fields {
        for field in RESERVED_FIELDS {
            map.remove(field);
        }
    }

    let body = client
        .dispatch(CreateRequest::new(class, fields, session))
        .await?;
    let assigned: Value = decode(&body)?;
    populate_value(object, &assigned)?;
    debug!("Object created");
    Ok(())
}

#[instrument(skip_all, fields(class = T::class_name()))]
pub(crate) async fn delete<T: ParseObject>(
    client: &ParseClient,
    object: &T,
    session: Option<SessionToken>,
) -> Result<()> {
    let class = ClassName::new(T::class_name())?;
    let object_id = object
        .object_id()
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ArgumentError::MissingObjectId {
            class_name: class.to_string(),
        })?
        .to_string();

    client
        .dispatch(DeleteRequest::new(class, object_id, session))
        .await?;
    debug!("Object deleted");
    Ok(())
}
