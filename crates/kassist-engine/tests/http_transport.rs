//! HTTP transport tests against a mock agent endpoint.

use kassist_engine::{
    AgentRequest, AgentTransport, Config, Conversation, HttpTransport, Role, TransportError,
    TRANSPORT_ERROR_REPLY,
};
use std::time::Duration;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Helper: a transport pointed at the mock server's `/api/agent`.
fn transport_for(server: &MockServer) -> HttpTransport {
    HttpTransport::new(format!("{}/api/agent", server.uri()), None).unwrap()
}

#[tokio::test]
async fn posts_json_body_to_endpoint() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/agent"))
        .and(header("content-type", "application/json"))
        .and(body_json(serde_json::json!({
            "message": "Hi",
            "agent_id": "agent-1",
            "session_id": "sess-1",
            "user_id": "chat-user"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "response": {"data": "Hello!"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let request = AgentRequest::build(&[], "Hi", "agent-1", "sess-1", "chat-user");
    let reply = transport_for(&server).send(&request).await.unwrap();
    assert_eq!(reply["response"]["data"], "Hello!");
}

#[tokio::test]
async fn non_json_body_is_decode_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let request = AgentRequest::build(&[], "Hi", "a", "s", "u");
    let result = transport_for(&server).send(&request).await;
    assert!(matches!(result, Err(TransportError::Decode(_))), "got: {result:?}");
}

#[tokio::test]
async fn error_status_with_json_body_is_still_decoded() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
            "response": {"success": false},
            "raw_response": "upstream agent unavailable"
        })))
        .mount(&server)
        .await;

    let request = AgentRequest::build(&[], "Hi", "a", "s", "u");
    let reply = transport_for(&server).send(&request).await.unwrap();
    assert_eq!(reply["raw_response"], "upstream agent unavailable");
}

#[tokio::test]
async fn error_status_without_json_is_status_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let request = AgentRequest::build(&[], "Hi", "a", "s", "u");
    let result = transport_for(&server).send(&request).await;
    assert!(matches!(result, Err(TransportError::Status(502))), "got: {result:?}");
}

#[tokio::test]
async fn slow_agent_hits_configured_timeout() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({"response": "late"}))
                .set_delay(Duration::from_secs(2)),
        )
        .mount(&server)
        .await;

    let transport = HttpTransport::new(
        format!("{}/api/agent", server.uri()),
        Some(Duration::from_millis(100)),
    )
    .unwrap();
    let request = AgentRequest::build(&[], "Hi", "a", "s", "u");
    let result = transport.send(&request).await;
    assert!(matches!(result, Err(TransportError::Timeout)), "got: {result:?}");
}

#[tokio::test]
async fn unreachable_agent_yields_error_reply_in_transcript() {
    // Bind then drop a server so the port is closed.
    let server = MockServer::start().await;
    let endpoint = format!("{}/api/agent", server.uri());
    drop(server);

    let transport = HttpTransport::new(endpoint, None).unwrap();
    let mut conversation = Conversation::new(Config::default());
    let reply = conversation.send(&transport, "Hello?").await.unwrap();

    assert_eq!(reply.role(), Role::Assistant);
    assert_eq!(reply.content(), TRANSPORT_ERROR_REPLY);
    assert_eq!(conversation.transcript().len(), 2);
}

#[tokio::test]
async fn full_turns_through_http() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/agent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "response": {"result": "Noted."}
        })))
        .expect(2)
        .mount(&server)
        .await;

    let config = Config {
        endpoint: format!("{}/api/agent", server.uri()),
        ..Config::default()
    };
    let transport = HttpTransport::from_config(&config).unwrap();
    let mut conversation = Conversation::new(config);

    conversation.send(&transport, "first").await;
    conversation.send(&transport, "second").await;

    let contents: Vec<&str> = conversation
        .transcript()
        .iter()
        .map(|m| m.content())
        .collect();
    assert_eq!(contents, vec!["first", "Noted.", "second", "Noted."]);

    let requests = server.received_requests().await.unwrap();
    let last: serde_json::Value = serde_json::from_slice(&requests[1].body).unwrap();
    assert_eq!(last["message"], "User: first\nAssistant: Noted.\nUser: second");
}
