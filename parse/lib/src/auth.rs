//! Authentication flows.
//!
//! There are three ways to obtain a [`Session`]:
//!
//! - [`ParseClient::login`]: username and password
//! - [`ParseClient::login_with_auth_data`]: a third-party provider payload
//!   (Facebook, Twitter or an anonymous id)
//! - [`ParseClient::become_user`]: resume a session from a token obtained
//!   earlier
//!
//! Each flow has an `_as` form taking a custom user type. That type must
//! resolve to the `_User` class, which is checked before any request is sent.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::class_name::ClassName;
use crate::client::ParseClient;
use crate::error::{ArgumentError, Result};
use crate::object::{ParseObject, User, UserObject};
use crate::request::{AuthDataLoginRequest, BecomeRequest, LoginRequest};
use crate::response::{decode_login, decode_user};
use crate::session::{Session, SessionToken};

/// Third-party credentials, serialized under their provider keys.
///
/// Usually built with one of the provider constructors:
///
/// ```rust
/// use parse_lib::auth::{AnonymousAuthData, AuthData};
///
/// let auth_data = AuthData::anonymous(AnonymousAuthData { id: "a1b2".into() });
/// assert_eq!(
///     serde_json::to_string(&auth_data).unwrap(),
///     r#"{"anonymous":{"id":"a1b2"}}"#
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuthData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub facebook: Option<FacebookAuthData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub twitter: Option<TwitterAuthData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anonymous: Option<AnonymousAuthData>,
}

impl AuthData {
    pub fn facebook(data: FacebookAuthData) -> Self {
        Self {
            facebook: Some(data),
            ..Default::default()
        }
    }

    pub fn twitter(data: TwitterAuthData) -> Self {
        Self {
            twitter: Some(data),
            ..Default::default()
        }
    }

    pub fn anonymous(data: AnonymousAuthData) -> Self {
        Self {
            anonymous: Some(data),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacebookAuthData {
    pub id: String,
    pub access_token: String,
    pub expiration_date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TwitterAuthData {
    pub id: String,
    pub screen_name: String,
    pub consumer_key: String,
    pub consumer_secret: String,
    pub auth_token: String,
    pub auth_token_secret: String,
}

/// An anonymous user, identified by a client-generated id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnonymousAuthData {
    pub id: String,
}

/// Checks that `U` resolves to the `_User` class.
///
/// ## Errors
///
/// Returns [`ArgumentError::NotUserClass`] naming the class `U` resolved to,
/// or [`ArgumentError::InvalidClassName`] if that name is malformed.
pub fn validate_user<U: ParseObject>() -> Result<(), ArgumentError> {
    let class_name = ClassName::new(U::class_name())?;
    if class_name.is_user() {
        Ok(())
    } else {
        Err(ArgumentError::NotUserClass {
            class_name: class_name.to_string(),
        })
    }
}

impl ParseClient {
    /// Logs in with a username and password.
    ///
    /// ## Errors
    ///
    /// Fails if the server rejects the credentials or its response carries
    /// no session token.
    pub async fn login(&self, username: &str, password: &str) -> Result<Session> {
        self.login_as::<User>(username, password).await
    }

    /// Logs in with a username and password, materializing the user as `U`.
    #[instrument(skip(self, password))]
    pub async fn login_as<U: UserObject>(
        &self,
        username: &str,
        password: &str,
    ) -> Result<Session<U>> {
        validate_user::<U>()?;
        let body = self.dispatch(LoginRequest::new(username, password)).await?;
        self.open_session(&body)
    }

    /// Logs in the user linked to `auth_data`, creating one if none exists.
    pub async fn login_with_auth_data(&self, auth_data: AuthData) -> Result<Session> {
        self.login_with_auth_data_as::<User>(auth_data).await
    }

    /// Third-party login materializing the user as `U`.
    #[instrument(skip_all)]
    pub async fn login_with_auth_data_as<U: UserObject>(
        &self,
        auth_data: AuthData,
    ) -> Result<Session<U>> {
        validate_user::<U>()?;
        let body = self
            .dispatch(AuthDataLoginRequest::new(auth_data))
            .await?;
        self.open_session(&body)
    }

    /// Shorthand for a Facebook-only [`login_with_auth_data`](Self::login_with_auth_data).
    pub async fn login_facebook(&self, auth_data: FacebookAuthData) -> Result<Session> {
        self.login_with_auth_data(AuthData::facebook(auth_data))
            .await
    }

    /// Resumes the session identified by `token`.
    ///
    /// The returned session keeps `token` as given; only the user is read
    /// from the response.
    pub async fn become_user(&self, token: impl Into<SessionToken>) -> Result<Session> {
        self.become_user_as::<User>(token).await
    }

    /// Resumes a session, materializing the user as `U`.
    #[instrument(skip_all)]
    pub async fn become_user_as<U: UserObject>(
        &self,
        token: impl Into<SessionToken>,
    ) -> Result<Session<U>> {
        validate_user::<U>()?;

        let mut session = Session::new(self.clone(), U::default(), token.into());
        let request = BecomeRequest::new(session.session_token().clone());
        let body = self.dispatch(request).await?;

        decode_user(&body, session.user_mut()).inspect_err(|e| {
            warn!(error = %e, "Could not read user of resumed session");
        })?;
        debug!("Session resumed");
        Ok(session)
    }

    fn open_session<U: UserObject>(&self, body: &[u8]) -> Result<Session<U>> {
        let mut user = U::default();
        let token = decode_login(body, &mut user).inspect_err(|e| {
            warn!(error = %e, "Login response rejected");
        })?;
        debug!("Login succeeded");
        Ok(Session::new(self.clone(), user, token))
    }
}
