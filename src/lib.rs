//! RAG front end - pages and relay endpoints for a retrieval-augmented-generation demo
//!
//! This library serves a handful of HTML pages that collect a chat question or a document to index,
//! and two relay endpoints that reshape those requests for the upstream proxy, which does the
//! actual inference and vector storage.

use axum::Router;
use axum::routing::{get, post};
use axum_prometheus::{
    GenericMetricLayer, Handle, PrometheusMetricLayerBuilder,
    metrics_exporter_prometheus::PrometheusHandle,
};
use std::borrow::Cow;
use std::sync::Arc;
use tracing::{info, instrument};

pub mod client;
pub mod config;
pub mod errors;
pub mod ids;
pub mod models;
pub mod relay;
pub mod upstream;
pub mod views;

use client::{HttpClient, HyperClient};
use ids::DocumentIds;
use upstream::Upstream;
use views::HomeLayout;

/// The main application state: how to reach the proxy and where to reach it
#[derive(Clone, Debug)]
pub struct AppState<T: HttpClient> {
    pub http_client: T,
    pub upstream: Upstream,
    pub ids: Arc<DocumentIds>,
    pub home_layout: HomeLayout,
}

impl AppState<HyperClient> {
    /// Create a new AppState around an already configured Hyper client
    pub fn new(upstream: Upstream, http_client: HyperClient) -> Self {
        Self::with_client(upstream, http_client)
    }
}

impl<T: HttpClient> AppState<T> {
    /// Create a new AppState with a custom HTTP client (useful for testing)
    pub fn with_client(upstream: Upstream, http_client: T) -> Self {
        Self {
            http_client,
            upstream,
            ids: Arc::new(DocumentIds::new()),
            home_layout: HomeLayout::default(),
        }
    }

    pub fn with_home_layout(mut self, home_layout: HomeLayout) -> Self {
        self.home_layout = home_layout;
        self
    }

    pub fn with_ids(mut self, ids: Arc<DocumentIds>) -> Self {
        self.ids = ids;
        self
    }
}

/// Build the main router
/// This creates routes for:
/// - `/`, `/chat`, `/embed` - The pages
/// - `/api/chat`, `/api/embeddings` - The relays to the upstream proxy
#[instrument(skip(state))]
pub fn build_router<T: HttpClient + Clone + 'static>(state: AppState<T>) -> Router {
    info!("Building router");
    Router::new()
        .route("/", get(views::home::<T>))
        .route(
            "/chat",
            get(views::chat_page::<T>).post(views::chat_submit::<T>),
        )
        .route(
            "/embed",
            get(views::embed_page::<T>).post(views::embed_submit::<T>),
        )
        .route("/api/chat", post(relay::chat_handler::<T>))
        .route("/api/embeddings", post(relay::embeddings_handler::<T>))
        .with_state(state)
}

/// Builds a router for the metrics endpoint.
#[instrument(skip(handle))]
pub fn build_metrics_router(handle: PrometheusHandle) -> Router {
    info!("Building metrics router");
    Router::new().route(
        "/metrics",
        axum::routing::get(move || async move { handle.render() }),
    )
}

type MetricsLayerAndHandle = (
    GenericMetricLayer<'static, PrometheusHandle, Handle>,
    PrometheusHandle,
);

/// Builds a layer and handle for prometheus metrics collection.
///
/// The prefix accepts either a string literal or an owned string; it must live for the whole
/// program, as required by the Prometheus metrics layer.
pub fn build_metrics_layer_and_handle(
    prefix: impl Into<Cow<'static, str>>,
) -> MetricsLayerAndHandle {
    info!("Building metrics layer");
    PrometheusMetricLayerBuilder::new()
        .with_prefix(prefix)
        .enable_response_body_size(true)
        .with_endpoint_label_type(axum_prometheus::EndpointLabel::Exact)
        .with_default_metrics()
        .build_pair()
}

#[doc(hidden)]
pub mod test_utils {
    use super::*;
    use async_trait::async_trait;
    use axum::http::StatusCode;
    use std::sync::Mutex;

    type ResponseBuilder = Arc<
        dyn Fn() -> Result<axum::response::Response, Box<dyn std::error::Error + Send + Sync>>
            + Send
            + Sync,
    >;

    /// An [`HttpClient`] that records requests and replays a canned response.
    pub struct MockHttpClient {
        pub requests: Arc<Mutex<Vec<MockRequest>>>,
        response_builder: ResponseBuilder,
    }

    #[derive(Debug, Clone)]
    pub struct MockRequest {
        pub method: String,
        pub uri: String,
        pub headers: Vec<(String, String)>,
        pub body: Vec<u8>,
    }

    impl MockRequest {
        pub fn header(&self, name: &str) -> Option<&str> {
            self.headers
                .iter()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.as_str())
        }

        pub fn json(&self) -> serde_json::Value {
            serde_json::from_slice(&self.body).unwrap_or(serde_json::Value::Null)
        }
    }

    impl MockHttpClient {
        pub fn new(status: StatusCode, body: &str) -> Self {
            let body = body.to_string();
            Self {
                requests: Arc::new(Mutex::new(Vec::new())),
                response_builder: Arc::new(move || {
                    axum::response::Response::builder()
                        .status(status)
                        .header("content-type", "application/json")
                        .body(axum::body::Body::from(body.clone()))
                        .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)
                }),
            }
        }

        /// A client whose every request fails before reaching the upstream.
        pub fn failing(reason: &str) -> Self {
            let reason = reason.to_string();
            Self {
                requests: Arc::new(Mutex::new(Vec::new())),
                response_builder: Arc::new(move || Err(reason.clone().into())),
            }
        }

        pub fn get_requests(&self) -> Vec<MockRequest> {
            self.requests
                .lock()
                .map(|requests| requests.clone())
                .unwrap_or_default()
        }
    }

    impl std::fmt::Debug for MockHttpClient {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.debug_struct("MockHttpClient")
                .field("requests", &self.requests)
                .field("response_builder", &"<closure>")
                .finish()
        }
    }

    impl Clone for MockHttpClient {
        fn clone(&self) -> Self {
            Self {
                requests: Arc::clone(&self.requests),
                response_builder: Arc::clone(&self.response_builder),
            }
        }
    }

    #[async_trait]
    impl HttpClient for MockHttpClient {
        async fn request(
            &self,
            req: axum::extract::Request,
        ) -> Result<axum::response::Response, Box<dyn std::error::Error + Send + Sync>> {
            // Extract request details
            let method = req.method().to_string();
            let uri = req.uri().to_string();
            let headers = req
                .headers()
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("").to_string()))
                .collect();

            // Read body
            let body = axum::body::to_bytes(req.into_body(), usize::MAX)
                .await
                .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)?
                .to_vec();

            if let Ok(mut requests) = self.requests.lock() {
                requests.push(MockRequest {
                    method,
                    uri,
                    headers,
                    body,
                });
            }

            (self.response_builder)()
        }
    }
}
