//! Configuration parsing and validation for the front end server
//!
//! This module handles command-line argument parsing and validation using clap. Every option can
//! also be supplied through the environment, which is how the container deployment configures it.
//! The parsed configuration is resolved once at start-up; handlers only ever see the resolved
//! [`Upstream`] carried in the application state.
use crate::upstream::Upstream;
use crate::views::HomeLayout;
use anyhow::anyhow;
use clap::Parser;
use url::Url;

pub const DEFAULT_PROXY_URL: &str = "http://proxy:5050";

#[derive(Debug, Clone, Parser)]
#[command(version, about, long_about = None)]
pub struct Config {
    /// The port on which the front end (pages and relay endpoints) will listen.
    #[arg(short = 'p', long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Base URL of the upstream proxy. The relays call `<base>/api/chat` and `<base>/api/embeddings`;
    /// a full endpoint URL such as `http://proxy:5050/api/chat` is also accepted.
    #[arg(long, env = "PROXY_URL", default_value = DEFAULT_PROXY_URL)]
    pub proxy_url: Url,

    /// Full URL for the chat relay, overriding the one derived from the proxy base.
    #[arg(long, env = "CHAT_PROXY_URL")]
    pub chat_url: Option<Url>,

    /// Full URL for the embedding relay, overriding the one derived from the proxy base.
    #[arg(long, env = "EMBEDDINGS_PROXY_URL")]
    pub embeddings_url: Option<Url>,

    /// Which home page variant to serve.
    #[arg(long, env = "HOME_LAYOUT", value_enum, default_value_t = HomeLayout::Hub)]
    pub home_layout: HomeLayout,

    /// The port on which the metrics server will listen.
    #[arg(long, default_value_t = 9090)]
    pub metrics_port: u16,

    /// Whether to enable the metrics endpoint.
    #[arg(short = 'm', long, default_value_t = true)]
    pub metrics: bool,

    /// The prefix to use for metrics.
    #[arg(long, default_value = "rag_frontend")]
    pub metrics_prefix: String,

    /// Maximum number of idle HTTP connections to keep alive per upstream host.
    #[arg(long, default_value_t = 100)]
    pub pool_max_idle_per_host: usize,

    /// How long (in seconds) to keep idle HTTP connections alive.
    #[arg(long, default_value_t = 90)]
    pub pool_idle_timeout_secs: u64,
}

impl Config {
    pub fn validate(self) -> Result<Self, anyhow::Error> {
        if self.proxy_url.cannot_be_a_base() {
            return Err(anyhow!(
                "Proxy URL '{}' cannot be used as a base URL",
                self.proxy_url
            ));
        }
        if self.metrics && self.metrics_port == self.port {
            return Err(anyhow!(
                "Metrics port {} clashes with the server port",
                self.metrics_port
            ));
        }
        Ok(self)
    }

    /// Resolve the relay targets: explicit per-handler URLs win over the proxy base.
    pub fn upstream(&self) -> Result<Upstream, anyhow::Error> {
        let derived = Upstream::from_base(&self.proxy_url)?;
        let chat = self.chat_url.clone().unwrap_or(derived.chat);
        let embeddings = self.embeddings_url.clone().unwrap_or(derived.embeddings);
        Ok(Upstream::builder().chat(chat).embeddings(embeddings).build())
    }
}
