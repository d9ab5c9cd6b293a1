//! Integration tests for the RAG front end
//!
//! These tests drive the full router end to end: a page or client posts to a relay, the relay
//! reshapes the body for the (mocked) proxy, and the reply travels back.

use axum::http::StatusCode;
use rag_frontend::ids::DocumentIds;
use rag_frontend::test_utils::MockHttpClient;
use rag_frontend::upstream::Upstream;
use rag_frontend::{AppState, build_router};
use serde_json::{Value, json};
use std::sync::Arc;
use tower::util::ServiceExt; // for oneshot()

fn upstream() -> Upstream {
    Upstream::from_base(&"http://proxy:5050".parse().unwrap()).unwrap()
}

fn json_request(uri: &str, body: &Value) -> axum::http::Request<axum::body::Body> {
    axum::http::Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(axum::body::Body::from(serde_json::to_vec(body).unwrap()))
        .unwrap()
}

fn form_request(uri: &str, body: &str) -> axum::http::Request<axum::body::Body> {
    axum::http::Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/x-www-form-urlencoded")
        .body(axum::body::Body::from(body.to_string()))
        .unwrap()
}

async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

#[tokio::test]
async fn test_chat_round_trip_through_relay() {
    let mock_client = MockHttpClient::new(
        StatusCode::OK,
        r#"{"message": {"content": "Retrieval-Augmented Generation"}}"#,
    );
    let app = build_router(AppState::with_client(upstream(), mock_client.clone()));

    let response = app
        .oneshot(json_request(
            "/api/chat",
            &json!({"messages": [{"role": "user", "content": "What is RAG?"}]}),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(body["message"]["content"], "Retrieval-Augmented Generation");

    let requests = mock_client.get_requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].method, "POST");
    assert_eq!(requests[0].uri, "http://proxy:5050/api/chat");
    assert_eq!(
        requests[0].json(),
        json!({
            "model": "default",
            "messages": [{"role": "user", "content": "What is RAG?"}]
        })
    );
}

#[tokio::test]
async fn test_chat_page_displays_upstream_answer() {
    let mock_client = MockHttpClient::new(
        StatusCode::OK,
        r#"{"message": {"content": "Retrieval-Augmented Generation"}}"#,
    );
    let app = build_router(AppState::with_client(upstream(), mock_client.clone()));

    let response = app
        .oneshot(form_request("/chat", "question=What+is+RAG%3F"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let page = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(page.contains("<p>Retrieval-Augmented Generation</p>"));
    assert_eq!(
        mock_client.get_requests()[0].json()["messages"][0]["content"],
        "What is RAG?"
    );
}

#[tokio::test]
async fn test_embed_round_trip_through_relay() {
    let mock_client = MockHttpClient::new(StatusCode::OK, r#"{"count": 1}"#);
    let app = build_router(AppState::with_client(upstream(), mock_client.clone()));

    let before = chrono::Utc::now().timestamp_millis() as u64;
    let response = app
        .oneshot(json_request("/api/embeddings", &json!({"text": "hello world"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(
        body,
        json!({"message": "Text processed successfully", "count": 1})
    );

    let forwarded = mock_client.get_requests()[0].json();
    assert_eq!(forwarded["documents"], json!(["hello world"]));
    assert_eq!(forwarded["metadatas"], json!([{"origin": "user_input"}]));
    let id: u64 = forwarded["ids"][0].as_str().unwrap().parse().unwrap();
    assert!(id >= before);
}

#[tokio::test]
async fn test_embed_page_clears_text_and_reports_success() {
    let mock_client = MockHttpClient::new(StatusCode::OK, r#"{"count": 1}"#);
    let app = build_router(AppState::with_client(upstream(), mock_client));

    let response = app
        .oneshot(form_request("/embed", "text=hello+world"))
        .await
        .unwrap();

    let page = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(page.contains("Text processed successfully"));
    assert!(page.contains("></textarea>"));
}

#[tokio::test]
async fn test_embed_upstream_failure_status_is_preserved() {
    let mock_client = MockHttpClient::new(StatusCode::SERVICE_UNAVAILABLE, "chroma unavailable");
    let app = build_router(AppState::with_client(upstream(), mock_client));

    let response = app
        .oneshot(json_request("/api/embeddings", &json!({"text": "hello"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(body, json!({"error": "Failed to process text (503)"}));
}

#[tokio::test]
async fn test_unreachable_proxy_maps_to_internal_errors() {
    let app = build_router(AppState::with_client(
        upstream(),
        MockHttpClient::failing("dns error: proxy"),
    ));

    let chat = app
        .clone()
        .oneshot(json_request("/api/chat", &json!({"messages": []})))
        .await
        .unwrap();
    assert_eq!(chat.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = serde_json::from_slice(&body_bytes(chat).await).unwrap();
    assert_eq!(body, json!({"erro": "Erro interno no servidor."}));

    let embed = app
        .oneshot(json_request("/api/embeddings", &json!({"text": "x"})))
        .await
        .unwrap();
    assert_eq!(embed.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = serde_json::from_slice(&body_bytes(embed).await).unwrap();
    assert_eq!(body, json!({"error": "Internal server error"}));
}

#[tokio::test]
async fn test_shared_id_source_across_router_clones() {
    fn frozen_clock() -> i64 {
        42
    }
    let mock_client = MockHttpClient::new(StatusCode::OK, "{}");
    let state = AppState::with_client(upstream(), mock_client.clone())
        .with_ids(Arc::new(DocumentIds::with_clock(frozen_clock)));
    let app = build_router(state);

    for text in ["first", "second"] {
        app.clone()
            .oneshot(json_request("/api/embeddings", &json!({ "text": text })))
            .await
            .unwrap();
    }

    let requests = mock_client.get_requests();
    assert_eq!(requests[0].json()["ids"], json!(["42"]));
    assert_eq!(requests[1].json()["ids"], json!(["43"]));
}
