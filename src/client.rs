//! HTTP client abstraction for forwarding requests to the upstream proxy
//!
//! This module provides a unified interface for making HTTP requests, allowing
//! different client implementations (hyper, mock clients for testing, etc.) to
//! be used interchangeably by the relay handlers.
use crate::errors::RelayError;
use async_trait::async_trait;
use axum::{
    body::{Body, Bytes},
    http::{Method, Request, StatusCode, header},
    response::IntoResponse,
};
use hyper_util::{client::legacy::Client, rt::TokioExecutor};
use serde::Serialize;
use std::time::Duration;
use tracing::debug;
use url::Url;

pub type HyperClient = Client<
    hyper_tls::HttpsConnector<hyper_util::client::legacy::connect::HttpConnector>,
    axum::body::Body,
>;

#[async_trait]
pub trait HttpClient: std::fmt::Debug + Send + Sync {
    async fn request(
        &self,
        req: axum::extract::Request,
    ) -> Result<axum::response::Response, Box<dyn std::error::Error + Send + Sync>>;
}

#[async_trait]
impl HttpClient for HyperClient {
    async fn request(
        &self,
        req: axum::extract::Request,
    ) -> Result<axum::response::Response, Box<dyn std::error::Error + Send + Sync>> {
        self.request(req)
            .await
            .map(|res| res.into_response())
            .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>)
    }
}

/// Build the pooled client used to reach the proxy. No request timeout is applied: a hung proxy
/// call hangs the relay with it.
pub fn create_hyper_client(pool_max_idle_per_host: usize, pool_idle_timeout: Duration) -> HyperClient {
    let https = hyper_tls::HttpsConnector::new();

    debug!(
        "HTTP client pool config: idle_timeout={}s, max_idle_per_host={}",
        pool_idle_timeout.as_secs(),
        pool_max_idle_per_host
    );

    Client::builder(TokioExecutor::new())
        .pool_idle_timeout(pool_idle_timeout)
        .pool_max_idle_per_host(pool_max_idle_per_host)
        .pool_timer(hyper_util::rt::TokioTimer::new())
        .build(https)
}

/// What came back from the proxy: the status and the raw body, not yet interpreted.
#[derive(Debug)]
pub struct UpstreamReply {
    pub status: StatusCode,
    pub body: Bytes,
}

/// POST `body` as JSON to `url` and collect the whole reply.
pub async fn post_json<T: HttpClient, B: Serialize>(
    client: &T,
    url: &Url,
    body: &B,
) -> Result<UpstreamReply, RelayError> {
    let payload = serde_json::to_vec(body)?;

    let mut builder = Request::builder()
        .method(Method::POST)
        .uri(url.as_str())
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(host) = url.host_str() {
        let host = match url.port() {
            Some(port) => format!("{host}:{port}"),
            None => host.to_string(),
        };
        builder = builder.header(header::HOST, host);
    }
    let request = builder.body(Body::from(payload))?;

    let response = client
        .request(request)
        .await
        .map_err(RelayError::Transport)?;
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await?;

    Ok(UpstreamReply { status, body })
}
