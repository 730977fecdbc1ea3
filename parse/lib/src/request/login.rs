use std::fmt;

use serde::Serialize;
use url::Url;

use super::{FORM_CONTENT_TYPE, ParseRequest};
use crate::auth::AuthData;
use crate::client::ClientConfig;
use crate::error::ConfigError;
use crate::method::Method;
use crate::session::SessionToken;

/// Password login: `GET login?username=..&password=..`.
///
/// The credentials travel as query parameters, and only when both are
/// non-empty.
#[derive(Clone)]
pub struct LoginRequest {
    username: String,
    password: String,
}

impl LoginRequest {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"[redacted]")
            .finish()
    }
}

impl ParseRequest for LoginRequest {
    fn method(&self) -> Method {
        Method::Get
    }

    fn endpoint(&self, config: &ClientConfig) -> Result<Url, ConfigError> {
        let mut url = config.endpoint(&["login"])?;
        if !self.username.is_empty() && !self.password.is_empty() {
            url.query_pairs_mut()
                .append_pair("username", &self.username)
                .append_pair("password", &self.password);
        }
        Ok(url)
    }

    fn body(&self) -> Result<String, serde_json::Error> {
        Ok(String::new())
    }

    fn content_type(&self) -> &'static str {
        FORM_CONTENT_TYPE
    }

    fn session(&self) -> Option<&SessionToken> {
        None
    }
}

/// Third-party login: `POST users` with `{"authData": {...}}`.
///
/// Logs in the user linked to the auth data, creating one if none exists.
#[derive(Debug, Clone)]
pub struct AuthDataLoginRequest {
    auth_data: AuthData,
}

impl AuthDataLoginRequest {
    pub fn new(auth_data: AuthData) -> Self {
        Self { auth_data }
    }

    pub fn auth_data(&self) -> &AuthData {
        &self.auth_data
    }
}

impl ParseRequest for AuthDataLoginRequest {
    fn method(&self) -> Method {
        Method::Post
    }

    fn endpoint(&self, config: &ClientConfig) -> Result<Url, ConfigError> {
        config.endpoint(&["users"])
    }

    fn body(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&AuthDataBody {
            auth_data: &self.auth_data,
        })
    }

    fn content_type(&self) -> &'static str {
        FORM_CONTENT_TYPE
    }

    fn session(&self) -> Option<&SessionToken> {
        None
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct AuthDataBody<'a> {
    auth_data: &'a AuthData,
}

/// Session resumption: `GET users/me` under an existing token.
#[derive(Debug, Clone)]
pub struct BecomeRequest {
    session: SessionToken,
}

impl BecomeRequest {
    pub fn new(session: SessionToken) -> Self {
        Self { session }
    }
}

impl ParseRequest for BecomeRequest {
    fn method(&self) -> Method {
        Method::Get
    }

    fn endpoint(&self, config: &ClientConfig) -> Result<Url, ConfigError> {
        config.endpoint(&["users", "me"])
    }

    fn body(&self) -> Result<String, serde_json::Error> {
        Ok(String::new())
    }

    fn content_type(&self) -> &'static str {
        FORM_CONTENT_TYPE
    }

    fn session(&self) -> Option<&SessionToken> {
        Some(&self.session)
    }
}
