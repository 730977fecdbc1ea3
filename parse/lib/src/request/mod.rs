//! Request variants.
//!
//! Every call the client makes is described by a value implementing
//! [`ParseRequest`]: which method, which URL, what body, and which session
//! it runs under. The dispatcher treats all of them the same way, so
//! everything call-specific lives here.
//!
//! The set of variants is closed and collected in the [`Request`] enum:
//!
//! | Variant | Method | Path suffix |
//! |---|---|---|
//! | [`CallFunctionRequest`] | POST | `functions/{name}` |
//! | [`LoginRequest`] | GET | `login` |
//! | [`AuthDataLoginRequest`] | POST | `users` |
//! | [`BecomeRequest`] | GET | `users/me` |
//! | [`CreateRequest`] | POST | `{collection}` |
//! | [`DeleteRequest`] | DELETE | `{collection}/{objectId}` |
//! | [`QueryRequest`] | GET | `{collection}` |
//! | [`UpdateRequest`] | PUT | `{collection}/{objectId}` |

mod function;
mod login;
mod object;

pub use function::CallFunctionRequest;
pub use login::{AuthDataLoginRequest, BecomeRequest, LoginRequest};
pub use object::{CreateRequest, DeleteRequest, QueryRequest, UpdateRequest};

use url::Url;

use crate::client::ClientConfig;
use crate::error::ConfigError;
use crate::method::Method;
use crate::session::SessionToken;

/// Content type of JSON request bodies.
pub const JSON_CONTENT_TYPE: &str = "application/json";
/// Content type declared by the login variants.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// The shape of one HTTP call.
///
/// Implementations are immutable once constructed and are created fresh for
/// every call.
pub trait ParseRequest: Send + Sync {
    /// The HTTP method.
    fn method(&self) -> Method;

    /// The fully qualified URL, rooted at the config's path prefix.
    ///
    /// ## Errors
    ///
    /// Fails only if the configured scheme and host are not a valid base URL.
    fn endpoint(&self, config: &ClientConfig) -> Result<Url, ConfigError>;

    /// The serialized body. Empty for calls without one.
    ///
    /// ## Errors
    ///
    /// Fails if the payload cannot be serialized.
    fn body(&self) -> Result<String, serde_json::Error>;

    /// The declared `Content-Type`.
    fn content_type(&self) -> &'static str;

    /// Whether the dispatcher must send the master key instead of the REST key.
    fn use_master_key(&self) -> bool {
        false
    }

    /// The session this call runs under, or `None` for anonymous calls.
    fn session(&self) -> Option<&SessionToken>;
}

/// Every request variant the client can dispatch.
#[derive(Debug, Clone)]
pub enum Request {
    /// Cloud function call.
    CallFunction(CallFunctionRequest),
    /// Login with username and password.
    Login(LoginRequest),
    /// Login with third-party auth data.
    AuthDataLogin(AuthDataLoginRequest),
    /// Resumption of an existing session token.
    Become(BecomeRequest),
    /// Object creation.
    Create(CreateRequest),
    /// Object deletion.
    Delete(DeleteRequest),
    /// Object query.
    Query(QueryRequest),
    /// Object update.
    Update(UpdateRequest),
}

impl Request {
    fn inner(&self) -> &dyn ParseRequest {
        match self {
            Self::CallFunction(req) => req,
            Self::Login(req) => req,
            Self::AuthDataLogin(req) => req,
            Self::Become(req) => req,
            Self::Create(req) => req,
            Self::Delete(req) => req,
            Self::Query(req) => req,
            Self::Update(req) => req,
        }
    }
}

impl ParseRequest for Request {
    fn method(&self) -> Method {
        self.inner().method()
    }

    fn endpoint(&self, config: &ClientConfig) -> Result<Url, ConfigError> {
        self.inner().endpoint(config)
    }

    fn body(&self) -> Result<String, serde_json::Error> {
        self.inner().body()
    }

    fn content_type(&self) -> &'static str {
        self.inner().content_type()
    }

    fn use_master_key(&self) -> bool {
        self.inner().use_master_key()
    }

    fn session(&self) -> Option<&SessionToken> {
        self.inner().session()
    }
}

impl From<CallFunctionRequest> for Request {
    fn from(req: CallFunctionRequest) -> Self {
        Self::CallFunction(req)
    }
}

impl From<LoginRequest> for Request {
    fn from(req: LoginRequest) -> Self {
        Self::Login(req)
    }
}

impl From<AuthDataLoginRequest> for Request {
    fn from(req: AuthDataLoginRequest) -> Self {
        Self::AuthDataLogin(req)
    }
}

impl From<BecomeRequest> for Request {
    fn from(req: BecomeRequest) -> Self {
        Self::Become(req)
    }
}

impl From<CreateRequest> for Request {
    fn from(req: CreateRequest) -> Self {
        Self::Create(req)
    }
}

impl From<DeleteRequest> for Request {
    fn from(req: DeleteRequest) -> Self {
        Self::Delete(req)
    }
}

impl From<QueryRequest> for Request {
    fn from(req: QueryRequest) -> Self {
        Self::Query(req)
    }
}

impl From<UpdateRequest> for Request {
    fn from(req: UpdateRequest) -> Self {
        Self::Update(req)
    }
}
