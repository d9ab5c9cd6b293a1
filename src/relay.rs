/// Axum handlers for the two relay endpoints
///
/// Each handler accepts the simplified body the pages send, reshapes it into what the proxy
/// expects, forwards it, and translates the reply. Incoming bodies are read as raw bytes and parsed
/// here, so a malformed body takes the same internal-error path as a transport failure.
use crate::client::{HttpClient, post_json};
use crate::errors::{ChatError, EmbedError, RelayError};
use crate::models::{
    ChatRequest, ChatUpstreamRequest, EmbedRequest, EmbedUpstreamRequest, merge_embed_response,
};
use crate::AppState;
use axum::{Json, body::Bytes, extract::State};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error, info, instrument};

async fn read_body(req: axum::extract::Request) -> Result<Bytes, RelayError> {
    Ok(axum::body::to_bytes(req.into_body(), usize::MAX).await?)
}

fn decode<D: DeserializeOwned>(bytes: &[u8]) -> Result<D, RelayError> {
    Ok(serde_json::from_slice(bytes)?)
}

/// POST /api/chat
///
/// Forwards `{messages}` as `{model: "default", messages}`. Any upstream failure status becomes a
/// 500 with a fixed message; a successful upstream body is returned unchanged with a 200.
#[instrument(skip(state, req))]
pub async fn chat_handler<T: HttpClient + Clone + 'static>(
    State(state): State<AppState<T>>,
    req: axum::extract::Request,
) -> Result<Json<Value>, ChatError> {
    info!("Chat request received");
    let body = read_body(req).await?;
    let incoming: ChatRequest = decode(&body)?;
    debug!(messages = ?incoming.messages, "Chat request body");

    let url = &state.upstream.chat;
    info!(%url, "Calling proxy");
    let reply = post_json(
        &state.http_client,
        url,
        &ChatUpstreamRequest::new(&incoming.messages),
    )
    .await?;
    info!(status = %reply.status, "Proxy responded");

    if !reply.status.is_success() {
        error!(
            status = %reply.status,
            body = %String::from_utf8_lossy(&reply.body),
            "Proxy returned an error for chat"
        );
        return Err(ChatError::Upstream(reply.status));
    }

    let data: Value = decode(&reply.body)?;
    debug!(body = %data, "Proxy chat response");
    Ok(Json(data))
}

/// POST /api/embeddings
///
/// Wraps `{text}` into a single-document index request. Upstream failure statuses are passed
/// through with a generic message; on success the upstream fields are merged over the fixed
/// success message.
#[instrument(skip(state, req))]
pub async fn embeddings_handler<T: HttpClient + Clone + 'static>(
    State(state): State<AppState<T>>,
    req: axum::extract::Request,
) -> Result<Json<Value>, EmbedError> {
    info!("Receiving text block");
    let body = read_body(req).await?;
    let incoming: EmbedRequest = decode(&body)?;

    let upstream_request = EmbedUpstreamRequest::single(state.ids.next_id(), incoming.text);
    debug!(request = ?upstream_request, "Embedding request body");

    let url = &state.upstream.embeddings;
    info!(%url, "Calling proxy");
    let reply = post_json(&state.http_client, url, &upstream_request).await?;

    if !reply.status.is_success() {
        let body = String::from_utf8_lossy(&reply.body).into_owned();
        error!(status = %reply.status, %body, "Proxy returned an error for embeddings");
        return Err(EmbedError::Upstream {
            status: reply.status,
            body,
        });
    }

    let data: Value = decode(&reply.body)?;
    debug!(body = %data, "Proxy embedding response");
    Ok(Json(merge_embed_response(data)))
}
