//! The pages: a home hub, a chat form and an embed form.
//!
//! Pages talk to the relay handlers through the same JSON contract a browser would use, calling
//! them in-process and reading back the status and body. A reply that cannot be read or parsed
//! is treated as a failed request.
pub mod form;
pub mod html;

use crate::AppState;
use crate::client::HttpClient;
use crate::errors::ViewError;
use crate::models::{ChatMessage, ChatRequest, EmbedRequest, UPSTREAM_CHAT_MODEL};
use crate::relay;
use axum::{
    Form,
    body::Body,
    extract::State,
    http::{Method, Request, StatusCode, header},
    response::{Html, IntoResponse},
};
use form::{FormState, Status};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::future::Future;
use tracing::{instrument, warn};

pub const CHAT_SENT_PLACEHOLDER: &str = "Pergunta enviada!";
pub const CHAT_SEND_FAILED: &str = "Erro ao enviar a pergunta.";
pub const EMBED_FAILED_DEFAULT: &str = "Failed to process text";
pub const EMBED_SUCCESS_DEFAULT: &str = "Text processed successfully";

/// Which home page to serve. Both carry the navigation hub; `InlineChat` repeats the chat form
/// under it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum HomeLayout {
    #[default]
    Hub,
    InlineChat,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChatForm {
    #[serde(default)]
    pub question: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct EmbedForm {
    #[serde(default)]
    pub text: String,
}

/// Call a relay handler the way the pages' client would: POST a JSON body, then read back the
/// status and JSON reply.
async fn call_relay<T, H, Fut, R, B>(
    handler: H,
    state: AppState<T>,
    path: &str,
    body: &B,
) -> Result<(StatusCode, Value), ViewError>
where
    T: HttpClient,
    H: FnOnce(State<AppState<T>>, axum::extract::Request) -> Fut,
    Fut: Future<Output = R>,
    R: IntoResponse,
    B: Serialize,
{
    let request = Request::builder()
        .method(Method::POST)
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(body)?))?;
    let response = handler(State(state), request).await.into_response();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
    Ok((status, serde_json::from_slice(&bytes)?))
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn display(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// What the chat page shows for a relay reply. Only the `erro` field marks a failure; the status
/// code is not consulted. A `message` that is present but carries no usable content (even `""` or
/// `false`) still counts as sent; only a missing or null one is a failure.
pub fn chat_status(data: &Value) -> Status {
    if let Some(erro) = data.get("erro").filter(|erro| is_truthy(erro)) {
        return Status::Error(display(erro));
    }
    match data.get("message") {
        None | Some(Value::Null) => Status::Error(CHAT_SEND_FAILED.into()),
        Some(message) => match message.get("content").filter(|content| is_truthy(content)) {
            Some(content) => Status::Success(display(content)),
            None => Status::Success(CHAT_SENT_PLACEHOLDER.into()),
        },
    }
}

/// What the embed page shows for a relay reply.
pub fn embed_status(status: StatusCode, data: &Value) -> Status {
    if !status.is_success() {
        let error = data
            .get("error")
            .filter(|error| is_truthy(error))
            .map(display)
            .unwrap_or_else(|| EMBED_FAILED_DEFAULT.into());
        return Status::Error(format!("Error: {error}"));
    }
    let message = data
        .get("message")
        .filter(|message| is_truthy(message))
        .map(display)
        .unwrap_or_else(|| EMBED_SUCCESS_DEFAULT.into());
    Status::Success(message)
}

async fn send_chat<T: HttpClient + Clone + 'static>(state: AppState<T>, question: String) -> Status {
    let request = ChatRequest {
        model: Some(UPSTREAM_CHAT_MODEL.into()),
        messages: vec![ChatMessage::user(question).into()],
    };
    match call_relay(relay::chat_handler::<T>, state, "/api/chat", &request).await {
        Ok((_, data)) => chat_status(&data),
        Err(e) => {
            warn!(error = %e, "Chat request failed");
            Status::Error(CHAT_SEND_FAILED.into())
        }
    }
}

async fn send_embed<T: HttpClient + Clone + 'static>(state: AppState<T>, text: String) -> Status {
    let request = EmbedRequest {
        text: text.trim().to_string(),
    };
    match call_relay(
        relay::embeddings_handler::<T>,
        state,
        "/api/embeddings",
        &request,
    )
    .await
    {
        Ok((status, data)) => embed_status(status, &data),
        Err(e) => {
            warn!(error = %e, "Embedding request failed");
            Status::Error(format!("Error: {e}"))
        }
    }
}

#[instrument(skip(state))]
pub async fn home<T: HttpClient + Clone + 'static>(State(state): State<AppState<T>>) -> Html<String> {
    Html(html::home(state.home_layout))
}

pub async fn chat_page<T: HttpClient + Clone + 'static>(
    State(_state): State<AppState<T>>,
) -> Html<String> {
    Html(html::chat(&FormState::default()))
}

#[instrument(skip(state, form))]
pub async fn chat_submit<T: HttpClient + Clone + 'static>(
    State(state): State<AppState<T>>,
    Form(form): Form<ChatForm>,
) -> Html<String> {
    let mut page = FormState::with_input(form.question);
    page.submit(|question| send_chat(state, question)).await;
    Html(html::chat(&page))
}

pub async fn embed_page<T: HttpClient + Clone + 'static>(
    State(_state): State<AppState<T>>,
) -> Html<String> {
    Html(html::embed(&FormState::default()))
}

#[instrument(skip(state, form))]
pub async fn embed_submit<T: HttpClient + Clone + 'static>(
    State(state): State<AppState<T>>,
    Form(form): Form<EmbedForm>,
) -> Html<String> {
    let mut page = FormState::with_input(form.text);
    // Nothing to index; the page never enables its button in this state.
    if page.input.trim().is_empty() {
        return Html(html::embed(&page));
    }
    page.submit(|text| send_embed(state, text)).await;
    page.clear_input_on_success();
    Html(html::embed(&page))
}
