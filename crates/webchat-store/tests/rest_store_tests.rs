use chrono::Utc;
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use webchat_models::{NewMessage, Sender};
use webchat_store::{MessageStore, RestMessageStore, StoreError};

fn row_json(id: i64, session_id: &str, sender: &str, content: &str, ts: &str) -> serde_json::Value {
    json!({
        "id": id,
        "session_id": session_id,
        "sender": sender,
        "content": content,
        "timestamp": ts,
    })
}

#[tokio::test]
async fn list_requests_session_rows_ordered_by_timestamp() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/messages"))
        .and(query_param("session_id", "eq.abc"))
        .and(query_param("order", "timestamp.asc"))
        .and(header("apikey", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            row_json(1, "abc", "ai", "welcome", "2024-01-01T10:00:00Z"),
            row_json(2, "abc", "user", "hi", "2024-01-01T10:01:00Z"),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let store = RestMessageStore::new(server.uri(), "test-key");
    let rows = store.list("abc").await.unwrap();

    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].sender, Sender::Ai);
    assert_eq!(rows[1].content, "hi");
    assert!(rows[0].timestamp <= rows[1].timestamp);
}

#[tokio::test]
async fn insert_returns_the_store_assigned_row_id() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/messages"))
        .and(header("Prefer", "return=representation"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([
            row_json(7, "abc", "ai", "", "2024-01-01T10:00:00Z"),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let store = RestMessageStore::new(server.uri(), "test-key");
    let row = store
        .insert(NewMessage {
            session_id: "abc".to_string(),
            sender: Sender::Ai,
            content: String::new(),
            timestamp: Utc::now(),
        })
        .await
        .unwrap();

    assert_eq!(row.id, 7);
    assert_eq!(row.content, "");
}

#[tokio::test]
async fn update_patches_the_row_by_id() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/rest/v1/messages"))
        .and(query_param("id", "eq.7"))
        .and(body_json(json!({ "content": "He" })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let store = RestMessageStore::new(server.uri(), "test-key");
    store.update_content(7, "He").await.unwrap();
}

#[tokio::test]
async fn delete_session_filters_by_session_id() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/rest/v1/messages"))
        .and(query_param("session_id", "eq.abc"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let store = RestMessageStore::new(server.uri(), "test-key");
    store.delete_session("abc").await.unwrap();
}

#[tokio::test]
async fn non_success_status_surfaces_as_store_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/messages"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let store = RestMessageStore::new(server.uri(), "test-key");
    let err = store.list("abc").await.unwrap_err();

    match err {
        StoreError::Status { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "boom");
        }
        other => panic!("expected status error, got {:?}", other),
    }
}

#[tokio::test]
async fn empty_insert_representation_is_an_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/messages"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!([])))
        .mount(&server)
        .await;

    let store = RestMessageStore::new(server.uri(), "test-key");
    let err = store
        .insert(NewMessage {
            session_id: "abc".to_string(),
            sender: Sender::User,
            content: "hi".to_string(),
            timestamp: Utc::now(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, StoreError::EmptyInsert));
}
