//! Client configuration.
//!
//! [`ClientConfig`] holds the application credentials and the server
//! location. Request variants read it to build their endpoint URLs; the
//! dispatcher reads it to attach credentials.

use std::time::Duration;

use url::Url;

use crate::error::ConfigError;

/// Default server host.
pub const DEFAULT_HOST: &str = "api.parse.com";
/// Default URL scheme.
pub const DEFAULT_SCHEME: &str = "https";
/// Version segment used by non-hosted deployments.
pub const API_VERSION: &str = "1";
/// Mount point used by hosted deployments unless configured otherwise.
pub const DEFAULT_MOUNT_POINT: &str = "/parse";
/// Default request timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

pub const APPLICATION_ID_ENV: &str = "PARSE_APPLICATION_ID";
pub const REST_API_KEY_ENV: &str = "PARSE_REST_API_KEY";
pub const MASTER_KEY_ENV: &str = "PARSE_MASTER_KEY";
pub const SCHEME_ENV: &str = "PARSE_SCHEME";
pub const HOST_ENV: &str = "PARSE_HOST";
pub const MOUNT_POINT_ENV: &str = "PARSE_MOUNT_POINT";

/// Credentials and server location for a [`ParseClient`](crate::ParseClient).
///
/// A config is either *versioned* (paths start with the API version, e.g.
/// `/1/login`) or *hosted* (paths start with the mount point of a
/// self-hosted server, e.g. `/parse/login`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    app_id: String,
    rest_key: String,
    master_key: Option<String>,
    scheme: String,
    host: String,
    version: String,
    hosted: bool,
    mount_point: String,
    timeout: Duration,
}

impl ClientConfig {
    /// Creates a versioned config for the default host.
    pub fn new(app_id: impl Into<String>, rest_key: impl Into<String>) -> Self {
        Self {
            app_id: app_id.into(),
            rest_key: rest_key.into(),
            master_key: None,
            scheme: DEFAULT_SCHEME.to_string(),
            host: DEFAULT_HOST.to_string(),
            version: API_VERSION.to_string(),
            hosted: false,
            mount_point: DEFAULT_MOUNT_POINT.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }

    /// Reads a config from `PARSE_*` environment variables.
    ///
    /// `PARSE_APPLICATION_ID` and `PARSE_REST_API_KEY` are required. Setting
    /// `PARSE_MOUNT_POINT` switches the config to hosted mode. Blank values
    /// count as unset.
    ///
    /// ## Errors
    ///
    /// Returns [`ConfigError::MissingEnv`] if a required variable is missing.
    pub fn from_env() -> Result<Self, ConfigError> {
        let app_id = env_value(APPLICATION_ID_ENV).ok_or(ConfigError::MissingEnv {
            var: APPLICATION_ID_ENV,
        })?;
        let rest_key = env_value(REST_API_KEY_ENV).ok_or(ConfigError::MissingEnv {
            var: REST_API_KEY_ENV,
        })?;

        let mut config = Self::new(app_id, rest_key);
        config.master_key = env_value(MASTER_KEY_ENV);
        if let Some(scheme) = env_value(SCHEME_ENV) {
            config.scheme = scheme;
        }
        if let Some(host) = env_value(HOST_ENV) {
            config.host = host;
        }
        if let Some(mount_point) = env_value(MOUNT_POINT_ENV) {
            config.set_mount_point(mount_point);
        }

        Ok(config)
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    pub fn rest_key(&self) -> &str {
        &self.rest_key
    }

    pub fn master_key(&self) -> Option<&str> {
        self.master_key.as_deref()
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn mount_point(&self) -> &str {
        &self.mount_point
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns `true` when paths are rooted at the mount point.
    pub fn is_hosted(&self) -> bool {
        self.hosted
    }

    /// The path prefix every endpoint starts with.
    pub fn path_prefix(&self) -> &str {
        if self.hosted {
            &self.mount_point
        } else {
            &self.version
        }
    }

    /// Builds the URL for an endpoint below the path prefix.
    ///
    /// Each suffix entry is one path segment and is percent-encoded as such.
    ///
    /// ## Errors
    ///
    /// Returns an error if the scheme and host do not form a valid base URL.
    pub fn endpoint<S: AsRef<str>>(&self, suffix: &[S]) -> Result<Url, ConfigError> {
        let mut url = Url::parse(&format!("{}://{}", self.scheme, self.host))?;
        url.path_segments_mut()
            .map_err(|()| ConfigError::CannotBeABase {
                url: format!("{}://{}", self.scheme, self.host),
            })?
            .clear()
            .extend(self.path_prefix().split('/').filter(|s| !s.is_empty()))
            .extend(suffix.iter().map(AsRef::as_ref));
        Ok(url)
    }

    pub(crate) fn set_master_key(&mut self, master_key: String) {
        self.master_key = Some(master_key);
    }

    pub(crate) fn set_scheme(&mut self, scheme: String) {
        self.scheme = scheme;
    }

    pub(crate) fn set_host(&mut self, host: String) {
        self.host = host;
    }

    pub(crate) fn set_version(&mut self, version: String) {
        self.version = version;
    }

    pub(crate) fn set_mount_point(&mut self, mount_point: String) {
        self.mount_point = mount_point;
        self.hosted = true;
    }

    pub(crate) fn set_timeout(&mut self, timeout: Duration) {
        self.timeout = timeout;
    }
}

fn env_value(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    fn test_versioned_endpoint() {
        let config = ClientConfig::new("app", "rest");
        let url = config.endpoint(&["functions", "hello"]).unwrap();
        assert_eq!(url.as_str(), "https://api.parse.com/1/functions/hello");
        assert!(!config.is_hosted());
    }

    #[test]
    fn test_hosted_endpoint() {
        let mut config = ClientConfig::new("app", "rest");
        config.set_host("example.com:1337".to_string());
        config.set_mount_point("/parse".to_string());
        let url = config.endpoint(&["users", "me"]).unwrap();
        assert_eq!(url.as_str(), "https://example.com:1337/parse/users/me");
        assert_eq!(config.path_prefix(), "/parse");
    }

    #[test]
    fn test_nested_mount_point() {
        let mut config = ClientConfig::new("app", "rest");
        config.set_mount_point("/api/parse/".to_string());
        let url = config.endpoint(&["login"]).unwrap();
        assert_eq!(url.path(), "/api/parse/login");
    }

    #[test]
    fn test_segments_are_encoded() {
        let config = ClientConfig::new("app", "rest");
        let url = config.endpoint(&["functions", "say hello"]).unwrap();
        assert_eq!(url.path(), "/1/functions/say%20hello");
    }

    #[test]
    fn test_invalid_host() {
        let mut config = ClientConfig::new("app", "rest");
        config.set_host("bad host".to_string());
        assert!(matches!(
            config.endpoint(&["login"]),
            Err(ConfigError::InvalidUrl(_))
        ));
    }

    #[test]
    #[serial]
    fn test_from_env() {
        // SAFETY: serialized with every other test touching the environment.
        unsafe {
            std::env::set_var(APPLICATION_ID_ENV, "env-app");
            std::env::set_var(REST_API_KEY_ENV, "env-rest");
            std::env::set_var(MOUNT_POINT_ENV, "/parse");
            std::env::set_var(MASTER_KEY_ENV, "  ");
        }

        let config = ClientConfig::from_env().unwrap();
        assert_eq!(config.app_id(), "env-app");
        assert_eq!(config.rest_key(), "env-rest");
        assert!(config.is_hosted());
        assert_eq!(config.master_key(), None);

        unsafe {
            std::env::remove_var(APPLICATION_ID_ENV);
            std::env::remove_var(REST_API_KEY_ENV);
            std::env::remove_var(MOUNT_POINT_ENV);
            std::env::remove_var(MASTER_KEY_ENV);
        }
    }

    #[test]
    #[serial]
    fn test_from_env_missing_app_id() {
        unsafe {
            std::env::remove_var(APPLICATION_ID_ENV);
        }
        assert!(matches!(
            ClientConfig::from_env(),
            Err(ConfigError::MissingEnv {
                var: APPLICATION_ID_ENV
            })
        ));
    }
}
