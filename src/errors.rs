//! Error types for the relay handlers and the views that call them.
//!
//! The two relays answer failures with different envelopes: the chat relay uses an `erro` field and
//! always responds 500, the embedding relay uses `error` and passes the upstream status through.
//! Existing clients depend on both shapes, so they are kept as they are.
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::error;

pub const CHAT_PROXY_FAILED: &str = "Erro ao consultar o proxy.";
pub const CHAT_INTERNAL: &str = "Erro interno no servidor.";
pub const EMBED_INTERNAL: &str = "Internal server error";

/// Anything that can go wrong while moving a request through a relay, short of the upstream
/// answering with a failure status.
#[derive(Debug, thiserror::Error)]
pub enum RelayError {
    #[error("failed to read body: {0}")]
    Body(#[from] axum::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to build upstream request: {0}")]
    Request(#[from] axum::http::Error),

    #[error("upstream transport error: {0}")]
    Transport(Box<dyn std::error::Error + Send + Sync>),
}

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    /// The proxy answered, but not with a success status.
    #[error("proxy responded with status {0}")]
    Upstream(StatusCode),

    #[error(transparent)]
    Internal(#[from] RelayError),
}

impl IntoResponse for ChatError {
    fn into_response(self) -> Response {
        let message = match &self {
            ChatError::Upstream(_) => CHAT_PROXY_FAILED,
            ChatError::Internal(e) => {
                error!(error = %e, "Internal error in chat relay");
                CHAT_INTERNAL
            }
        };
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "erro": message })),
        )
            .into_response()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EmbedError {
    #[error("proxy responded with status {status}: {body}")]
    Upstream { status: StatusCode, body: String },

    #[error(transparent)]
    Internal(#[from] RelayError),
}

impl IntoResponse for EmbedError {
    fn into_response(self) -> Response {
        match self {
            EmbedError::Upstream { status, .. } => (
                status,
                Json(json!({
                    "error": format!("Failed to process text ({})", status.as_u16())
                })),
            )
                .into_response(),
            EmbedError::Internal(e) => {
                error!(error = %e, "Internal error in embedding relay");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({ "error": EMBED_INTERNAL })),
                )
                    .into_response()
            }
        }
    }
}

/// Failures of a view talking to a relay: the browser-side "request rejected" case.
#[derive(Debug, thiserror::Error)]
pub enum ViewError {
    #[error("{0}")]
    Json(#[from] serde_json::Error),

    #[error("{0}")]
    Request(#[from] axum::http::Error),

    #[error("{0}")]
    Body(#[from] axum::Error),
}
