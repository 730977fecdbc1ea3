//! Cloud function calls.

use std::collections::BTreeMap;

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, instrument};

use crate::client::ParseClient;
use crate::error::Result;
use crate::request::CallFunctionRequest;
use crate::response::decode_function_result;
use crate::session::SessionToken;

/// Named arguments of a cloud function, serialized as a JSON object.
pub type Params = BTreeMap<String, Value>;

impl ParseClient {
    /// Calls the cloud function `name` without a session.
    ///
    /// The server wraps the return value as `{"result": ...}`; the unwrapped
    /// result is decoded into `R`.
    ///
    /// ## Errors
    ///
    /// Fails with [`ArgumentError::EmptyFunctionName`](crate::error::ArgumentError::EmptyFunctionName)
    /// before sending anything if `name` is empty.
    ///
    /// ## Examples
    ///
    /// ```rust,ignore
    /// let mut params = Params::new();
    /// params.insert("movie".to_string(), json!("The Matrix"));
    /// let rating: f64 = client.call_function("averageStars", Some(params)).await?;
    /// ```
    pub async fn call_function<R: DeserializeOwned>(
        &self,
        name: &str,
        params: Option<Params>,
    ) -> Result<R> {
        call(self, name, params, None).await
    }
}

#[instrument(skip(client, params, session), fields(authenticated = session.is_some()))]
pub(crate) async fn call<R: DeserializeOwned>(
    client: &ParseClient,
    name: &str,
    params: Option<Params>,
    session: Option<SessionToken>,
) -> Result<R> {
    let request = CallFunctionRequest::new(name, params, session)?;
    let body = client.dispatch(request).await?;
    let result = decode_function_result(&body)?;
    debug!("Cloud function returned");
    Ok(result)
}
