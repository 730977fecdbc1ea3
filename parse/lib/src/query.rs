//! Object queries.

use std::fmt;
use std::marker::PhantomData;

use serde_json::{Map, Value};
use tracing::{debug, instrument};

use crate::class_name::ClassName;
use crate::client::ParseClient;
use crate::error::{ArgumentError, ProtocolError, Result};
use crate::object::ParseObject;
use crate::request::QueryRequest;
use crate::response::{QueryEnvelope, decode};
use crate::session::SessionToken;

/// A query over the objects of `T`'s class.
///
/// Constraints are added with consuming builder methods; the query itself is
/// not consumed by running it, so one query can be executed several times.
///
/// ## Examples
///
/// ```rust,ignore
/// let top_scores = client
///     .new_query::<GameScore>()?
///     .greater_than("score", 1000)
///     .order_descending("score")
///     .limit(10)
///     .find()
///     .await?;
/// ```
pub struct Query<T> {
    client: ParseClient,
    class: ClassName,
    constraints: Map<String, Value>,
    limit: Option<u32>,
    skip: Option<u32>,
    order: Vec<String>,
    keys: Vec<String>,
    session: Option<SessionToken>,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Clone for Query<T> {
    fn clone(&self) -> Self {
        Self {
            client: self.client.clone(),
            class: self.class.clone(),
            constraints: self.constraints.clone(),
            limit: self.limit,
            skip: self.skip,
            order: self.order.clone(),
            keys: self.keys.clone(),
            session: self.session.clone(),
            _marker: PhantomData,
        }
    }
}

impl<T> fmt::Debug for Query<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Query")
            .field("class", &self.class)
            .field("constraints", &self.constraints)
            .field("limit", &self.limit)
            .field("skip", &self.skip)
            .field("order", &self.order)
            .field("keys", &self.keys)
            .field("session", &self.session)
            .finish()
    }
}

impl<T: ParseObject> Query<T> {
    pub(crate) fn new(client: ParseClient, session: Option<SessionToken>) -> Result<Self> {
        Ok(Self {
            client,
            class: ClassName::new(T::class_name())?,
            constraints: Map::new(),
            limit: None,
            skip: None,
            order: Vec::new(),
            keys: Vec::new(),
            session,
            _marker: PhantomData,
        })
    }

    /// The session the query runs under, if any.
    pub fn session(&self) -> Option<&SessionToken> {
        self.session.as_ref()
    }

    pub fn class_name(&self) -> &ClassName {
        &self.class
    }

    /// Matches objects whose `key` equals `value`.
    pub fn equal_to(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.constraints.insert(key.into(), value.into());
        self
    }

    pub fn not_equal_to(self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.constrain(key, "$ne", value.into())
    }

    pub fn less_than(self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.constrain(key, "$lt", value.into())
    }

    pub fn greater_than(self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.constrain(key, "$gt", value.into())
    }

    /// Matches objects that have (`true`) or lack (`false`) the attribute `key`.
    pub fn exists(self, key: impl Into<String>, exists: bool) -> Self {
        self.constrain(key, "$exists", Value::Bool(exists))
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn skip(mut self, skip: u32) -> Self {
        self.skip = Some(skip);
        self
    }

    /// Sorts ascending by `key`. Later calls add tie-breakers.
    pub fn order(mut self, key: impl Into<String>) -> Self {
        self.order.push(key.into());
        self
    }

    /// Sorts descending by `key`. Later calls add tie-breakers.
    pub fn order_descending(mut self, key: impl Into<String>) -> Self {
        self.order.push(format!("-{}", key.into()));
        self
    }

    /// Restricts the returned attributes to `keys`.
    pub fn keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keys.extend(keys.into_iter().map(Into::into));
        self
    }

    /// Runs the query and returns every match.
    #[instrument(skip(self), fields(class = %self.class))]
    pub async fn find(&self) -> Result<Vec<T>> {
        let body = self.client.dispatch(self.request(self.limit, false)?).await?;
        let envelope: QueryEnvelope<T> = decode(&body)?;
        debug!(results = envelope.results.len(), "Query finished");
        Ok(envelope.results)
    }

    /// Runs the query for a single match.
    #[instrument(skip(self), fields(class = %self.class))]
    pub async fn first(&self) -> Result<Option<T>> {
        let body = self.client.dispatch(self.request(Some(1), false)?).await?;
        let envelope: QueryEnvelope<T> = decode(&body)?;
        Ok(envelope.results.into_iter().next())
    }

    /// Counts the matches without fetching them.
    ///
    /// ## Errors
    ///
    /// Returns [`ProtocolError::MissingField`] if the server does not report a
    /// count.
    #[instrument(skip(self), fields(class = %self.class))]
    pub async fn count(&self) -> Result<u64> {
        let body = self.client.dispatch(self.request(Some(0), true)?).await?;
        let envelope: QueryEnvelope<Value> = decode(&body)?;
        let count = envelope
            .count
            .ok_or(ProtocolError::MissingField { field: "count" })?;
        Ok(count)
    }

    /// Adds `op: value` to the operator object of `key`, replacing a plain
    /// equality constraint on the same key.
    fn constrain(mut self, key: impl Into<String>, op: &str, value: Value) -> Self {
        let entry = self
            .constraints
            .entry(key.into())
            .or_insert_with(|| Value::Object(Map::new()));
        match entry {
            Value::Object(ops) if ops.keys().all(|k| k.starts_with('$')) => {
                ops.insert(op.to_string(), value);
            }
            other => {
                let mut ops = Map::new();
                ops.insert(op.to_string(), value);
                *other = Value::Object(ops);
            }
        }
        self
    }

    fn request(&self, limit: Option<u32>, count: bool) -> Result<QueryRequest> {
        let mut params = Vec::new();
        if !self.constraints.is_empty() {
            let constraints =
                serde_json::to_string(&self.constraints).map_err(ArgumentError::InvalidBody)?;
            params.push(("where".to_string(), constraints));
        }
        if let Some(limit) = limit {
            params.push(("limit".to_string(), limit.to_string()));
        }
        if let Some(skip) = self.skip {
            params.push(("skip".to_string(), skip.to_string()));
        }
        if !self.order.is_empty() {
            params.push(("order".to_string(), self.order.join(",")));
        }
        if !self.keys.is_empty() {
            params.push(("keys".to_string(), self.keys.join(",")));
        }
        if count {
            params.push(("count".to_string(), "1".to_string()));
        }
        Ok(QueryRequest::new(
            self.class.clone(),
            params,
            self.session.clone(),
        ))
    }
}

impl ParseClient {
    /// Starts an anonymous query over `T`'s class.
    ///
    /// ## Errors
    ///
    /// Fails if `T` resolves to an invalid class name.
    pub fn new_query<T: ParseObject>(&self) -> Result<Query<T>> {
        Query::new(self.clone(), None)
    }
}
