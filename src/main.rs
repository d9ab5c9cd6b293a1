use clap::Parser as _;
use rag_frontend::{
    AppState, build_metrics_layer_and_handle, build_metrics_router, build_router,
    client::create_hyper_client, config::Config,
};
use std::time::Duration;
use tokio::net::TcpListener;
use tracing::{info, instrument};

#[tokio::main]
#[instrument]
pub async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse().validate()?;
    info!("Starting RAG front end with config: {:?}", config);

    let upstream = config.upstream()?;
    info!(chat = %upstream.chat, embeddings = %upstream.embeddings, "Relaying to proxy");

    let http_client = create_hyper_client(
        config.pool_max_idle_per_host,
        Duration::from_secs(config.pool_idle_timeout_secs),
    );
    let app_state = AppState::new(upstream, http_client).with_home_layout(config.home_layout);
    let mut router = build_router(app_state);

    if config.metrics {
        let (prometheus_layer, handle) = build_metrics_layer_and_handle(config.metrics_prefix.clone());
        router = router.layer(prometheus_layer);

        let metrics_addr = format!("0.0.0.0:{}", config.metrics_port);
        let metrics_listener = TcpListener::bind(&metrics_addr).await?;
        info!("Metrics listening on {}", metrics_addr);
        tokio::spawn(async move {
            if let Err(e) = axum::serve(metrics_listener, build_metrics_router(handle)).await {
                tracing::error!("Metrics server failed: {}", e);
            }
        });
    }

    let bind_addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&bind_addr).await?;
    info!("RAG front end listening on {}", bind_addr);

    axum::serve(listener, router).await?;

    Ok(())
}
