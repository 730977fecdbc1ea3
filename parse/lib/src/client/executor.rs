//! Request dispatch with tracing instrumentation.
//!
//! This module provides the [`ParseClient`] struct, which executes any
//! request variant against the configured server and returns the raw body.

use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use tracing::{Span, instrument, warn};
use url::{Position, Url};

use super::config::ClientConfig;
use crate::error::{ArgumentError, ClientError, ConfigError, ParseError, ProtocolError, Result};
use crate::request::{ParseRequest, Request};

/// Header carrying the application id on every request.
pub const APPLICATION_ID_HEADER: &str = "x-parse-application-id";
/// Header carrying the REST API key on ordinary requests.
pub const REST_API_KEY_HEADER: &str = "x-parse-rest-api-key";
/// Header carrying the master key on elevated requests.
pub const MASTER_KEY_HEADER: &str = "x-parse-master-key";
/// Header carrying the session token of session-bound requests.
pub const SESSION_TOKEN_HEADER: &str = "x-parse-session-token";

const USER_AGENT: &str = concat!("parse-lib/", env!("CARGO_PKG_VERSION"));

/// Builder for configuring a [`ParseClient`].
#[derive(Debug)]
pub struct ParseClientBuilder {
    config: ClientConfig,
    default_headers: HeaderMap,
}

impl ParseClientBuilder {
    fn new(config: ClientConfig) -> Self {
        Self {
            config,
            default_headers: HeaderMap::new(),
        }
    }

    /// Sets the master key sent by requests that need elevated access.
    pub fn master_key(mut self, master_key: impl Into<String>) -> Self {
        self.config.set_master_key(master_key.into());
        self
    }

    /// Sets the URL scheme (`https` by default).
    pub fn scheme(mut self, scheme: impl Into<String>) -> Self {
        self.config.set_scheme(scheme.into());
        self
    }

    /// Sets the server host, optionally with a port (`localhost:1337`).
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.set_host(host.into());
        self
    }

    /// Takes scheme, host and port from a server URL.
    ///
    /// A URL with a path other than `/` also sets that path as the mount
    /// point, switching the client to hosted mode.
    ///
    /// ## Examples
    ///
    /// ```rust,ignore
    /// let url = Url::parse("http://localhost:1337/parse")?;
    /// let client = ParseClient::builder("app-id", "rest-key")
    ///     .base_url(&url)
    ///     .build()?;
    /// assert!(client.config().is_hosted());
    /// ```
    pub fn base_url(mut self, url: &Url) -> Self {
        self.config.set_scheme(url.scheme().to_string());
        self.config
            .set_host(url[Position::BeforeHost..Position::AfterPort].to_string());
        if url.path() != "/" && !url.path().is_empty() {
            self.config.set_mount_point(url.path().to_string());
        }
        self
    }

    /// Sets the version segment used when the client is not hosted.
    pub fn version(mut self, version: impl Into<String>) -> Self {
        self.config.set_version(version.into());
        self
    }

    /// Roots every endpoint at `mount_point` instead of the version segment.
    pub fn mount_point(mut self, mount_point: impl Into<String>) -> Self {
        self.config.set_mount_point(mount_point.into());
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.set_timeout(timeout);
        self
    }

    /// Adds a default header to all requests.
    ///
    /// ## Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn default_header(
        mut self,
        name: impl AsRef<str>,
        value: impl AsRef<str>,
    ) -> Result<Self, ParseError> {
        let name = HeaderName::try_from(name.as_ref())
            .map_err(|e| ConfigError::InvalidHeader(format!("invalid header name: {e}")))?;
        let value = HeaderValue::try_from(value.as_ref())
            .map_err(|e| ConfigError::InvalidHeader(format!("invalid header value: {e}")))?;
        self.default_headers.insert(name, value);
        Ok(self)
    }

    /// Builds the [`ParseClient`].
    ///
    /// ## Errors
    ///
    /// Returns an error if the application id is not a valid header value or
    /// the HTTP client cannot be constructed.
    pub fn build(self) -> Result<ParseClient, ParseError> {
        let mut headers = self.default_headers;
        let app_id = HeaderValue::try_from(self.config.app_id())
            .map_err(|e| ConfigError::InvalidHeader(format!("invalid application id: {e}")))?;
        headers.insert(HeaderName::from_static(APPLICATION_ID_HEADER), app_id);

        let http = reqwest::Client::builder()
            .timeout(self.config.timeout())
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .pool_max_idle_per_host(10)
            .build()
            .map_err(ClientError::Request)?;

        Ok(ParseClient {
            http,
            config: Arc::new(self.config),
        })
    }
}

impl From<ClientConfig> for ParseClientBuilder {
    fn from(config: ClientConfig) -> Self {
        Self::new(config)
    }
}

/// Async client for the Parse REST API.
///
/// Cloning is cheap: clones share the connection pool and configuration.
/// Sessions, queries and updates each hold a clone.
///
/// ## Examples
///
/// ```rust,ignore
/// use parse_lib::ParseClient;
///
/// let client = ParseClient::builder("app-id", "rest-key").build()?;
/// let session = client.login("alice", "secret").await?;
/// let greeting: String = session.call_function("hello", None).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ParseClient {
    http: reqwest::Client,
    config: Arc<ClientConfig>,
}

impl ParseClient {
    /// Creates a builder for a versioned client on the default host.
    pub fn builder(app_id: impl Into<String>, rest_key: impl Into<String>) -> ParseClientBuilder {
        ParseClientBuilder::new(ClientConfig::new(app_id, rest_key))
    }

    /// Creates a client from an existing configuration.
    ///
    /// ## Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn from_config(config: ClientConfig) -> Result<Self> {
        ParseClientBuilder::from(config).build()
    }

    /// Creates a client configured from `PARSE_*` environment variables.
    ///
    /// ## Errors
    ///
    /// Returns an error if a required variable is missing.
    pub fn from_env() -> Result<Self> {
        Self::from_config(ClientConfig::from_env()?)
    }

    /// Returns the client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Dispatches a request and returns the raw response body.
    ///
    /// ## Errors
    ///
    /// Returns an error if:
    /// - The endpoint URL cannot be built
    /// - The request fails in transit ([`ClientError`])
    /// - The server answers with a non-success status ([`ProtocolError::Status`])
    pub async fn dispatch(&self, request: impl Into<Request>) -> Result<Bytes> {
        let request = request.into();
        self.execute(&request).await
    }

    #[instrument(
        name = "parse_request",
        skip(self, request),
        fields(
            http.method = tracing::field::Empty,
            http.url = tracing::field::Empty,
            http.status_code = tracing::field::Empty,
            otel.kind = "client",
            otel.status_code = tracing::field::Empty,
        )
    )]
    pub(crate) async fn execute<R>(&self, request: &R) -> Result<Bytes>
    where
        R: ParseRequest + ?Sized,
    {
        let method = request.method();
        Span::current().record("http.method", method.to_string().as_str());

        let url = request.endpoint(&self.config)?;

        // Login URLs carry credentials in the query string.
        let mut logged_url = url.clone();
        logged_url.set_query(None);
        Span::current().record("http.url", logged_url.as_str());

        let body = request.body().map_err(ArgumentError::InvalidBody)?;

        let mut builder = self
            .http
            .request(method.to_reqwest(), url)
            .header(CONTENT_TYPE, request.content_type());
        builder = self.apply_credentials(builder, request)?;
        if method.has_body() && !body.is_empty() {
            builder = builder.body(body);
        }

        // reqwest errors carry the full URL, query string included.
        let response = builder.send().await.map_err(|e| {
            let err = ClientError::Request(e.without_url());
            warn!(
                error = %err,
                timeout = err.is_timeout(),
                connect = err.is_connect(),
                "Parse request failed in transit"
            );
            err
        })?;

        let status = response.status();
        let status_code = status.as_u16();
        Span::current().record("http.status_code", status_code);

        if !status.is_success() {
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| status.to_string());

            let otel_status = if status.is_server_error() {
                "ERROR"
            } else {
                "UNSET"
            };
            Span::current().record("otel.status_code", otel_status);

            let err = ProtocolError::from_status(status_code, &text);
            warn!(status = status_code, error = %err, "Parse request failed");
            return Err(err.into());
        }

        Span::current().record("otel.status_code", "OK");

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ClientError::Request(e.without_url()))?;
        Ok(bytes)
    }

    /// Attaches the REST or master key and the bound session token.
    fn apply_credentials<R>(
        &self,
        builder: reqwest::RequestBuilder,
        request: &R,
    ) -> Result<reqwest::RequestBuilder>
    where
        R: ParseRequest + ?Sized,
    {
        let builder = if request.use_master_key() {
            let master_key = self
                .config
                .master_key()
                .ok_or(ConfigError::MissingMasterKey)?;
            let value = HeaderValue::try_from(master_key)
                .map_err(|e| ConfigError::InvalidHeader(format!("invalid master key: {e}")))?;
            builder.header(MASTER_KEY_HEADER, value)
        } else {
            let value = HeaderValue::try_from(self.config.rest_key())
                .map_err(|e| ConfigError::InvalidHeader(format!("invalid REST API key: {e}")))?;
            builder.header(REST_API_KEY_HEADER, value)
        };

        Ok(match request.session() {
            Some(token) => {
                let value = HeaderValue::try_from(token.as_str())
                    .map_err(|_| ArgumentError::InvalidSessionToken)?;
                builder.header(SESSION_TOKEN_HEADER, value)
            }
            None => builder,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::method::Method;
    use crate::request::{BecomeRequest, CallFunctionRequest, JSON_CONTENT_TYPE, LoginRequest};
    use crate::session::SessionToken;
    use wiremock::matchers::{body_json, body_string, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> ParseClient {
        let base_url = Url::parse(&server.uri()).unwrap();
        ParseClient::builder("app-id", "rest-key")
            .base_url(&base_url)
            .build()
            .unwrap()
    }

    /// A request needing elevated access, which no public variant does.
    struct ElevatedRequest;

    impl ParseRequest for ElevatedRequest {
        fn method(&self) -> Method {
            Method::Get
        }

        fn endpoint(&self, config: &ClientConfig) -> Result<Url, ConfigError> {
            config.endpoint(&["schemas"])
        }

        fn body(&self) -> Result<String, serde_json::Error> {
            Ok(String::new())
        }

        fn content_type(&self) -> &'static str {
            JSON_CONTENT_TYPE
        }

        fn use_master_key(&self) -> bool {
            true
        }

        fn session(&self) -> Option<&SessionToken> {
            None
        }
    }

    /// A read whose body must not be sent.
    struct ReadWithPayload;

    impl ParseRequest for ReadWithPayload {
        fn method(&self) -> Method {
            Method::Get
        }

        fn endpoint(&self, config: &ClientConfig) -> Result<Url, ConfigError> {
            config.endpoint(&["users", "me"])
        }

        fn body(&self) -> Result<String, serde_json::Error> {
            Ok(r#"{"stray":true}"#.to_string())
        }

        fn content_type(&self) -> &'static str {
            JSON_CONTENT_TYPE
        }

        fn session(&self) -> Option<&SessionToken> {
            None
        }
    }

    /// A request whose payload cannot be encoded.
    struct UnencodableRequest;

    impl ParseRequest for UnencodableRequest {
        fn method(&self) -> Method {
            Method::Post
        }

        fn endpoint(&self, config: &ClientConfig) -> Result<Url, ConfigError> {
            config.endpoint(&["functions", "hello"])
        }

        fn body(&self) -> Result<String, serde_json::Error> {
            serde_json::from_str::<serde_json::Value>("{").map(|v| v.to_string())
        }

        fn content_type(&self) -> &'static str {
            JSON_CONTENT_TYPE
        }

        fn session(&self) -> Option<&SessionToken> {
            None
        }
    }

    #[tokio::test]
    async fn test_dispatch_function_call() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/1/functions/hello"))
            .and(header(APPLICATION_ID_HEADER, "app-id"))
            .and(header(REST_API_KEY_HEADER, "rest-key"))
            .and(header("content-type", "application/json"))
            .and(body_json(serde_json::json!({})))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"result":"hi"}"#))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let request = CallFunctionRequest::new("hello", None, None).unwrap();
        let body = client.dispatch(request).await.unwrap();

        assert_eq!(&body[..], br#"{"result":"hi"}"#);
    }

    #[tokio::test]
    async fn test_anonymous_request_has_no_session_header() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/1/functions/hello"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"result":1}"#))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        client
            .dispatch(CallFunctionRequest::new("hello", None, None).unwrap())
            .await
            .unwrap();

        let requests = mock_server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        assert!(requests[0].headers.get(SESSION_TOKEN_HEADER).is_none());
        assert!(requests[0].headers.get(MASTER_KEY_HEADER).is_none());
    }

    #[tokio::test]
    async fn test_session_header_attached() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/1/users/me"))
            .and(header(SESSION_TOKEN_HEADER, "tok123"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"username":"alice"}"#))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let body = client
            .dispatch(BecomeRequest::new(SessionToken::from("tok123")))
            .await
            .unwrap();

        assert_eq!(&body[..], br#"{"username":"alice"}"#);
    }

    #[tokio::test]
    async fn test_login_sends_credentials_as_query() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/1/login"))
            .and(query_param("username", "alice"))
            .and(query_param("password", "secret"))
            .and(header("content-type", "application/x-www-form-urlencoded"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"sessionToken":"t"}"#))
            .expect(1)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        client
            .dispatch(LoginRequest::new("alice", "secret"))
            .await
            .unwrap();

        let requests = mock_server.received_requests().await.unwrap();
        assert!(requests[0].body.is_empty());
    }

    #[tokio::test]
    async fn test_master_key_replaces_rest_key() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/1/schemas"))
            .and(header(MASTER_KEY_HEADER, "master"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let base_url = Url::parse(&mock_server.uri()).unwrap();
        let client = ParseClient::builder("app-id", "rest-key")
            .base_url(&base_url)
            .master_key("master")
            .build()
            .unwrap();
        client.execute(&ElevatedRequest).await.unwrap();

        let requests = mock_server.received_requests().await.unwrap();
        assert!(requests[0].headers.get(REST_API_KEY_HEADER).is_none());
    }

    #[tokio::test]
    async fn test_missing_master_key_fails_before_sending() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let result = client.execute(&ElevatedRequest).await;

        assert!(matches!(
            result,
            Err(ParseError::Config(ConfigError::MissingMasterKey))
        ));
    }

    #[tokio::test]
    async fn test_get_request_sends_no_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/1/users/me"))
            .and(body_string(""))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let body = client_for(&mock_server)
            .execute(&ReadWithPayload)
            .await
            .unwrap();
        assert_eq!(&body[..], b"{}");
    }

    #[tokio::test]
    async fn test_malformed_session_token_never_sent() {
        let mock_server = MockServer::start().await;

        Mock::given(wiremock::matchers::any())
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .expect(0)
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let err = client.become_user("tok\n123").await.unwrap_err();

        assert!(err.is_invalid_argument());
        assert!(!err.is_transport());
        assert!(matches!(
            err,
            ParseError::Argument(ArgumentError::InvalidSessionToken)
        ));
        assert!(!err.to_string().contains("123"));
    }

    #[tokio::test]
    async fn test_malformed_rest_key_is_config_error() {
        let mock_server = MockServer::start().await;

        Mock::given(wiremock::matchers::any())
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .expect(0)
            .mount(&mock_server)
            .await;

        let base_url = Url::parse(&mock_server.uri()).unwrap();
        let client = ParseClient::builder("app-id", "rest\nkey")
            .base_url(&base_url)
            .build()
            .unwrap();
        let err = client
            .dispatch(CallFunctionRequest::new("hello", None, None).unwrap())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ParseError::Config(ConfigError::InvalidHeader(_))
        ));
    }

    #[tokio::test]
    async fn test_unencodable_body_is_argument_error() {
        let mock_server = MockServer::start().await;

        Mock::given(wiremock::matchers::any())
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .expect(0)
            .mount(&mock_server)
            .await;

        let err = client_for(&mock_server)
            .execute(&UnencodableRequest)
            .await
            .unwrap_err();

        assert!(err.is_invalid_argument());
        assert!(!err.is_protocol());
        assert!(matches!(
            err,
            ParseError::Argument(ArgumentError::InvalidBody(_))
        ));
    }

    #[tokio::test]
    async fn test_hosted_base_url() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/parse/functions/hello"))
            .respond_with(ResponseTemplate::new(200).set_body_string(r#"{"result":1}"#))
            .expect(1)
            .mount(&mock_server)
            .await;

        let base_url = Url::parse(&format!("{}/parse", mock_server.uri())).unwrap();
        let client = ParseClient::builder("app-id", "rest-key")
            .base_url(&base_url)
            .build()
            .unwrap();
        assert!(client.config().is_hosted());

        client
            .dispatch(CallFunctionRequest::new("hello", None, None).unwrap())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_server_error_body_decoded() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/1/login"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_string(r#"{"code":101,"error":"Invalid username/password."}"#),
            )
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let err = client
            .dispatch(LoginRequest::new("alice", "wrong"))
            .await
            .unwrap_err();

        match err {
            ParseError::Protocol(e) => {
                assert_eq!(e.status_code(), Some(404));
                assert_eq!(e.server_code(), Some(101));
            }
            other => panic!("expected protocol error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_http_error_500() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("Internal Server Error"))
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let result = client
            .dispatch(CallFunctionRequest::new("hello", None, None).unwrap())
            .await;

        assert!(matches!(
            result,
            Err(ParseError::Protocol(ProtocolError::Status { status: 500, code: None, .. }))
        ));
    }

    #[tokio::test]
    async fn test_transport_error() {
        let client = ParseClient::builder("app-id", "rest-key")
            .scheme("http")
            .host("127.0.0.1:1")
            .timeout(Duration::from_secs(2))
            .build()
            .unwrap();

        let err = client
            .dispatch(CallFunctionRequest::new("hello", None, None).unwrap())
            .await
            .unwrap_err();
        assert!(err.is_transport());
    }

    #[tokio::test]
    #[tracing_test::traced_test]
    async fn test_transport_error_hides_query() {
        let client = ParseClient::builder("app-id", "rest-key")
            .scheme("http")
            .host("127.0.0.1:1")
            .build()
            .unwrap();

        let err = client
            .dispatch(LoginRequest::new("alice", "hunter2"))
            .await
            .unwrap_err();

        assert!(!err.to_string().contains("hunter2"));
        assert!(logs_contain("failed in transit"));
        assert!(logs_contain("connect=true"));
        assert!(!logs_contain("hunter2"));
    }

    #[tokio::test]
    async fn test_default_header() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(header("x-custom-header", "custom-value"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .expect(1)
            .mount(&mock_server)
            .await;

        let base_url = Url::parse(&mock_server.uri()).unwrap();
        let client = ParseClient::builder("app-id", "rest-key")
            .base_url(&base_url)
            .default_header("X-Custom-Header", "custom-value")
            .unwrap()
            .build()
            .unwrap();

        client
            .dispatch(CallFunctionRequest::new("hello", None, None).unwrap())
            .await
            .unwrap();
    }

    #[test]
    fn test_invalid_app_id_rejected() {
        let result = ParseClient::builder("bad\nid", "rest-key").build();
        assert!(matches!(
            result,
            Err(ParseError::Config(ConfigError::InvalidHeader(_)))
        ));
    }

    #[tokio::test]
    #[tracing_test::traced_test]
    async fn test_failure_logged_without_credentials() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_string(r#"{"code":101,"error":"Invalid username/password."}"#),
            )
            .mount(&mock_server)
            .await;

        let client = client_for(&mock_server);
        let _ = client
            .dispatch(LoginRequest::new("alice", "hunter2"))
            .await;

        assert!(logs_contain("Parse request failed"));
        assert!(logs_contain("/1/login"));
        assert!(!logs_contain("hunter2"));
    }
}
