/// Payloads exchanged between the views, the relay handlers and the upstream proxy.
///
/// Nothing here is persisted: every value lives for exactly one request/response exchange.
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The model identifier the chat relay always sends upstream.
pub const UPSTREAM_CHAT_MODEL: &str = "default";

/// Origin recorded in the metadata of every document indexed from the front end.
pub const USER_INPUT_ORIGIN: &str = "user_input";

pub const EMBED_SUCCESS_MESSAGE: &str = "Text processed successfully";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".into(),
            content: content.into(),
        }
    }
}

impl From<ChatMessage> for Value {
    fn from(message: ChatMessage) -> Self {
        let mut fields = Map::new();
        fields.insert("role".into(), Value::String(message.role));
        fields.insert("content".into(), Value::String(message.content));
        Value::Object(fields)
    }
}

/// Body accepted by POST /api/chat. A caller-supplied `model` is accepted but never forwarded.
/// Messages are relayed verbatim, whatever fields they carry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub messages: Vec<Value>,
}

/// Body sent to the proxy's chat endpoint.
#[derive(Debug, Serialize)]
pub struct ChatUpstreamRequest<'a> {
    pub model: &'static str,
    pub messages: &'a [Value],
}

impl<'a> ChatUpstreamRequest<'a> {
    pub fn new(messages: &'a [Value]) -> Self {
        Self {
            model: UPSTREAM_CHAT_MODEL,
            messages,
        }
    }
}

/// Body accepted by POST /api/embeddings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedRequest {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentMetadata {
    pub origin: String,
}

/// Body sent to the proxy's embedding endpoint. The three arrays are parallel and always hold
/// exactly one entry per call.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbedUpstreamRequest {
    pub ids: Vec<String>,
    pub documents: Vec<String>,
    pub metadatas: Vec<DocumentMetadata>,
}

impl EmbedUpstreamRequest {
    pub fn single(id: String, document: String) -> Self {
        Self {
            ids: vec![id],
            documents: vec![document],
            metadatas: vec![DocumentMetadata {
                origin: USER_INPUT_ORIGIN.into(),
            }],
        }
    }
}

/// Builds the embedding relay's success body: the fixed message, overlaid with whatever fields the
/// proxy returned. Upstream keys win, including an upstream `message`.
pub fn merge_embed_response(upstream: Value) -> Value {
    let mut merged = Map::new();
    merged.insert("message".into(), Value::String(EMBED_SUCCESS_MESSAGE.into()));
    if let Value::Object(fields) = upstream {
        merged.extend(fields);
    }
    Value::Object(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_chat_request_ignores_model_on_upstream() {
        let request: ChatRequest = serde_json::from_value(json!({
            "model": "gpt-4",
            "messages": [{"role": "user", "content": "Hi"}]
        }))
        .unwrap();
        assert_eq!(request.model.as_deref(), Some("gpt-4"));

        let upstream = serde_json::to_value(ChatUpstreamRequest::new(&request.messages)).unwrap();
        assert_eq!(
            upstream,
            json!({"model": "default", "messages": [{"role": "user", "content": "Hi"}]})
        );
    }

    #[test]
    fn test_chat_messages_are_relayed_verbatim() {
        let request: ChatRequest = serde_json::from_value(json!({
            "messages": [
                {"role": "user", "content": "describe", "images": ["aGVsbG8="]},
                {"role": "assistant", "content": null, "tool_calls": []}
            ]
        }))
        .unwrap();

        let upstream = serde_json::to_value(ChatUpstreamRequest::new(&request.messages)).unwrap();
        assert_eq!(
            upstream,
            json!({
                "model": "default",
                "messages": [
                    {"role": "user", "content": "describe", "images": ["aGVsbG8="]},
                    {"role": "assistant", "content": null, "tool_calls": []}
                ]
            })
        );
    }

    #[test]
    fn test_chat_message_into_value() {
        assert_eq!(
            Value::from(ChatMessage::user("Oi")),
            json!({"role": "user", "content": "Oi"})
        );
    }

    #[test]
    fn test_single_document_request_shape() {
        let request = EmbedUpstreamRequest::single("1700000000000".into(), "  hello  ".into());
        assert_eq!(
            serde_json::to_value(request).unwrap(),
            json!({
                "ids": ["1700000000000"],
                "documents": ["  hello  "],
                "metadatas": [{"origin": "user_input"}]
            })
        );
    }

    #[test]
    fn test_merge_adds_message_to_upstream_fields() {
        assert_eq!(
            merge_embed_response(json!({"count": 1})),
            json!({"message": "Text processed successfully", "count": 1})
        );
    }

    #[test]
    fn test_merge_lets_upstream_message_win() {
        assert_eq!(
            merge_embed_response(json!({"message": "Documentos indexados com sucesso."})),
            json!({"message": "Documentos indexados com sucesso."})
        );
    }

    #[test]
    fn test_merge_ignores_non_object_upstream() {
        assert_eq!(
            merge_embed_response(json!([1, 2])),
            json!({"message": "Text processed successfully"})
        );
    }
}
