use serde_json::{Map, Value};
use url::Url;

use super::{JSON_CONTENT_TYPE, ParseRequest};
use crate::class_name::ClassName;
use crate::client::ClientConfig;
use crate::error::ConfigError;
use crate::method::Method;
use crate::session::SessionToken;

fn object_segments<'a>(class: &'a ClassName, object_id: &'a str) -> Vec<&'a str> {
    let mut segments = class.collection_segments();
    segments.push(object_id);
    segments
}

/// Object creation: `POST {collection}` with the object's fields.
#[derive(Debug, Clone)]
pub struct CreateRequest {
    class: ClassName,
    fields: Value,
    session: Option<SessionToken>,
}

impl CreateRequest {
    pub fn new(class: ClassName, fields: Value, session: Option<SessionToken>) -> Self {
        Self {
            class,
            fields,
            session,
        }
    }
}

impl ParseRequest for CreateRequest {
    fn method(&self) -> Method {
        Method::Post
    }

    fn endpoint(&self, config: &ClientConfig) -> Result<Url, ConfigError> {
        config.endpoint(&self.class.collection_segments())
    }

    fn body(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.fields)
    }

    fn content_type(&self) -> &'static str {
        JSON_CONTENT_TYPE
    }

    fn session(&self) -> Option<&SessionToken> {
        self.session.as_ref()
    }
}

/// Object deletion: `DELETE {collection}/{objectId}`.
#[derive(Debug, Clone)]
pub struct DeleteRequest {
    class: ClassName,
    object_id: String,
    session: Option<SessionToken>,
}

impl DeleteRequest {
    pub fn new(
        class: ClassName,
        object_id: impl Into<String>,
        session: Option<SessionToken>,
    ) -> Self {
        Self {
            class,
            object_id: object_id.into(),
            session,
        }
    }
}

impl ParseRequest for DeleteRequest {
    fn method(&self) -> Method {
        Method::Delete
    }

    fn endpoint(&self, config: &ClientConfig) -> Result<Url, ConfigError> {
        config.endpoint(&object_segments(&self.class, &self.object_id))
    }

    fn body(&self) -> Result<String, serde_json::Error> {
        Ok(String::new())
    }

    fn content_type(&self) -> &'static str {
        JSON_CONTENT_TYPE
    }

    fn session(&self) -> Option<&SessionToken> {
        self.session.as_ref()
    }
}

/// Object query: `GET {collection}?where=..&limit=..`.
#[derive(Debug, Clone)]
pub struct QueryRequest {
    class: ClassName,
    params: Vec<(String, String)>,
    session: Option<SessionToken>,
}

impl QueryRequest {
    /// Creates a query with already encoded parameters (`where`, `limit`, ...).
    pub fn new(
        class: ClassName,
        params: Vec<(String, String)>,
        session: Option<SessionToken>,
    ) -> Self {
        Self {
            class,
            params,
            session,
        }
    }
}

impl ParseRequest for QueryRequest {
    fn method(&self) -> Method {
        Method::Get
    }

    fn endpoint(&self, config: &ClientConfig) -> Result<Url, ConfigError> {
        let mut url = config.endpoint(&self.class.collection_segments())?;
        if !self.params.is_empty() {
            url.query_pairs_mut().extend_pairs(&self.params);
        }
        Ok(url)
    }

    fn body(&self) -> Result<String, serde_json::Error> {
        Ok(String::new())
    }

    fn content_type(&self) -> &'static str {
        JSON_CONTENT_TYPE
    }

    fn session(&self) -> Option<&SessionToken> {
        self.session.as_ref()
    }
}

/// Object update: `PUT {collection}/{objectId}` with field operations.
#[derive(Debug, Clone)]
pub struct UpdateRequest {
    class: ClassName,
    object_id: String,
    operations: Map<String, Value>,
    session: Option<SessionToken>,
}

impl UpdateRequest {
    pub fn new(
        class: ClassName,
        object_id: impl Into<String>,
        operations: Map<String, Value>,
        session: Option<SessionToken>,
    ) -> Self {
        Self {
            class,
            object_id: object_id.into(),
            operations,
            session,
        }
    }
}

impl ParseRequest for UpdateRequest {
    fn method(&self) -> Method {
        Method::Put
    }

    fn endpoint(&self, config: &ClientConfig) -> Result<Url, ConfigError> {
        config.endpoint(&object_segments(&self.class, &self.object_id))
    }

    fn body(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.operations)
    }

    fn content_type(&self) -> &'static str {
        JSON_CONTENT_TYPE
    }

    fn session(&self) -> Option<&SessionToken> {
        self.session.as_ref()
    }
}
