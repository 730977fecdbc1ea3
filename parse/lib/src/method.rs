//! HTTP methods used by the Parse REST API.

use strum::{Display, EnumIter, EnumString};

/// HTTP methods a Parse request can be sent with.
///
/// The REST API only ever uses these four verbs: reads are `GET`, creates
/// and cloud function calls are `POST`, updates are `PUT`.
///
/// ## Examples
///
/// ```rust
/// use parse_lib::Method;
///
/// let method = Method::Get;
/// assert!(!method.has_body());
///
/// let parsed: Method = "POST".parse().unwrap();
/// assert_eq!(parsed, Method::Post);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter, EnumString)]
#[strum(serialize_all = "UPPERCASE")]
pub enum Method {
    /// HTTP GET - Fetch objects, run queries, log in.
    Get,
    /// HTTP POST - Create objects, call cloud functions.
    Post,
    /// HTTP PUT - Update objects.
    Put,
    /// HTTP DELETE - Remove objects.
    Delete,
}

impl Method {
    /// Returns `true` if requests with this method carry a body.
    pub fn has_body(&self) -> bool {
        matches!(self, Self::Post | Self::Put)
    }

    /// Converts to the equivalent `reqwest::Method`.
    pub fn to_reqwest(self) -> reqwest::Method {
        match self {
            Self::Get => reqwest::Method::GET,
            Self::Post => reqwest::Method::POST,
            Self::Put => reqwest::Method::PUT,
            Self::Delete => reqwest::Method::DELETE,
        }
    }
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        method.to_reqwest()
    }
}
