use url::Url;

use super::{JSON_CONTENT_TYPE, ParseRequest};
use crate::client::ClientConfig;
use crate::error::{ArgumentError, ConfigError};
use crate::function::Params;
use crate::method::Method;
use crate::session::SessionToken;

/// A cloud function call: `POST functions/{name}` with the params as JSON.
#[derive(Debug, Clone)]
pub struct CallFunctionRequest {
    name: String,
    params: Params,
    session: Option<SessionToken>,
}

impl CallFunctionRequest {
    /// Creates a call of `name`. Missing params are sent as `{}`.
    ///
    /// ## Errors
    ///
    /// Returns [`ArgumentError::EmptyFunctionName`] for an empty name.
    pub fn new(
        name: impl Into<String>,
        params: Option<Params>,
        session: Option<SessionToken>,
    ) -> Result<Self, ArgumentError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ArgumentError::EmptyFunctionName);
        }
        Ok(Self {
            name,
            params: params.unwrap_or_default(),
            session,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &Params {
        &self.params
    }
}

impl ParseRequest for CallFunctionRequest {
    fn method(&self) -> Method {
        Method::Post
    }

    fn endpoint(&self, config: &ClientConfig) -> Result<Url, ConfigError> {
        config.endpoint(&["functions", self.name.as_str()])
    }

    fn body(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.params)
    }

    fn content_type(&self) -> &'static str {
        JSON_CONTENT_TYPE
    }

    fn session(&self) -> Option<&SessionToken> {
        self.session.as_ref()
    }
}
