//! End-to-end session scenarios against a mock Parse server.

use parse_lib::{
    ClientConfig, ParseClient, ParseError, ParseObject, Params, ProtocolError, User, UserObject,
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use url::Url;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> ParseClient {
    let base_url = Url::parse(&server.uri()).unwrap();
    ParseClient::builder("app-id", "rest-key")
        .base_url(&base_url)
        .build()
        .unwrap()
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Robot {
    serial: String,
}

impl ParseObject for Robot {
    fn class_name() -> &'static str {
        "Robot"
    }

    fn object_id(&self) -> Option<&str> {
        None
    }
}

impl UserObject for Robot {}

#[tokio::test]
async fn test_login_then_call_function_as_user() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/1/login"))
        .and(query_param("username", "alice"))
        .and(query_param("password", "secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sessionToken": "tok123",
            "username": "alice",
            "objectId": "u1"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/1/functions/hello"))
        .and(header("x-parse-session-token", "tok123"))
        .and(header("content-type", "application/json"))
        .and(body_json(json!({})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": "Hello alice"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);
    let session = client.login("alice", "secret").await.unwrap();

    assert_eq!(session.user().username.as_deref(), Some("alice"));
    assert_eq!(session.user().object_id.as_deref(), Some("u1"));
    assert_eq!(session.session_token().as_str(), "tok123");

    let greeting: String = session
        .call_function("hello", Some(Params::new()))
        .await
        .unwrap();
    assert_eq!(greeting, "Hello alice");
}

#[tokio::test]
async fn test_become_keeps_given_token() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/1/users/me"))
        .and(header("x-parse-session-token", "tok123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"username": "alice"})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let session = client_for(&mock_server).become_user("tok123").await.unwrap();

    assert_eq!(session.session_token().as_str(), "tok123");
    assert_eq!(session.user().username.as_deref(), Some("alice"));
    assert_eq!(session.user().session_token, None);
}

#[tokio::test]
async fn test_login_extra_attributes_reach_user() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/1/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "sessionToken": "r:abc",
            "username": "bob",
            "favoriteColor": "green",
            "stats": {"wins": 3}
        })))
        .mount(&mock_server)
        .await;

    let session = client_for(&mock_server).login("bob", "pw").await.unwrap();
    let user: &User = session.user();

    assert_eq!(user.get("favoriteColor"), Some(&json!("green")));
    assert_eq!(user.get("stats"), Some(&json!({"wins": 3})));
    assert_eq!(user.session_token.as_deref(), Some("r:abc"));
}

#[tokio::test]
async fn test_login_without_token_yields_no_session() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/1/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"username": "alice"})))
        .mount(&mock_server)
        .await;

    let err = client_for(&mock_server)
        .login("alice", "secret")
        .await
        .unwrap_err();
    assert!(err.is_protocol());
    assert!(matches!(
        err,
        ParseError::Protocol(ProtocolError::MissingSessionToken)
    ));
}

#[tokio::test]
async fn test_non_user_type_never_reaches_server() {
    let mock_server = MockServer::start().await;

    Mock::given(wiremock::matchers::any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let client = client_for(&mock_server);

    assert!(
        client
            .login_as::<Robot>("alice", "secret")
            .await
            .unwrap_err()
            .is_invalid_argument()
    );
    assert!(
        client
            .become_user_as::<Robot>("tok123")
            .await
            .unwrap_err()
            .is_invalid_argument()
    );
}

#[tokio::test]
async fn test_hosted_server_paths() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/parse/login"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"sessionToken": "tok-hosted"})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/parse/functions/ping"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": null})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let base_url = Url::parse(&mock_server.uri()).unwrap();
    let configured = ParseClient::builder("app-id", "rest-key")
        .base_url(&base_url)
        .mount_point("/parse")
        .build()
        .unwrap();
    let config: ClientConfig = configured.config().clone();
    assert!(config.is_hosted());

    let client = ParseClient::from_config(config).unwrap();
    let session = client.login("carol", "pw").await.unwrap();
    let result: Value = session.call_function("ping", None).await.unwrap();

    assert_eq!(result, Value::Null);
}

#[tokio::test]
async fn test_concurrent_calls_share_session() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(header("x-parse-session-token", "tok-shared"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"result": 1})))
        .expect(3)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/1/users/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"username": "dan"})))
        .mount(&mock_server)
        .await;

    let session = client_for(&mock_server)
        .become_user("tok-shared")
        .await
        .unwrap();

    let (a, b, c) = tokio::join!(
        session.call_function::<i64>("one", None),
        session.call_function::<i64>("two", None),
        session.call_function::<i64>("three", None),
    );
    assert_eq!(a.unwrap() + b.unwrap() + c.unwrap(), 3);
    assert_eq!(session.session_token().as_str(), "tok-shared");
}
