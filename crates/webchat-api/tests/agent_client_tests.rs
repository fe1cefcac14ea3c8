use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use webchat_api::{AgentClient, ApiError, BackendConfig};
use webchat_models::{ChatMessage, history_from_messages, Sender};

#[tokio::test]
async fn send_posts_prompt_session_and_history() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat"))
        .and(body_json(json!({
            "prompt": "qual o preço?",
            "session_id": "abc",
            "history": [
                { "role": "model", "parts": [{ "text": "Olá!" }] },
                { "role": "user", "parts": [{ "text": "qual o preço?" }] },
            ],
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "response": "Depende do plano.",
            "history": [],
        })))
        .expect(1)
        .mount(&server)
        .await;

    let messages = vec![
        ChatMessage::new("1", Sender::Ai, "Olá!"),
        ChatMessage::new("2", Sender::User, "qual o preço?"),
    ];

    let client = AgentClient::new(BackendConfig::new(server.uri()));
    let reply = client
        .send("qual o preço?", "abc", history_from_messages(&messages))
        .await
        .unwrap();

    assert_eq!(reply.response, "Depende do plano.");
}

#[tokio::test]
async fn non_success_status_is_a_hard_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
        .mount(&server)
        .await;

    let client = AgentClient::new(BackendConfig::new(server.uri()));
    let err = client.send("oi", "abc", Vec::new()).await.unwrap_err();

    match err {
        ApiError::Status { status, body } => {
            assert_eq!(status, 502);
            assert_eq!(body, "bad gateway");
        }
        other => panic!("expected status error, got {:?}", other),
    }
}

#[tokio::test]
async fn missing_history_in_response_defaults_to_empty() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "response": "ok" })))
        .mount(&server)
        .await;

    let client = AgentClient::new(BackendConfig::new(server.uri()));
    let reply = client.send("oi", "abc", Vec::new()).await.unwrap();

    assert_eq!(reply.response, "ok");
    assert!(reply.history.is_empty());
}
