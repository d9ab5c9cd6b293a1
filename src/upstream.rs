/// The upstream proxy as seen by the relays: one fully resolved URL per endpoint.
use bon::Builder;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq, Builder)]
pub struct Upstream {
    /// Where POST /api/chat is forwarded.
    pub chat: Url,
    /// Where POST /api/embeddings is forwarded.
    pub embeddings: Url,
}

impl Upstream {
    /// Join `path` onto `base`, treating the base as a directory so any path prefix it carries
    /// (e.g. `http://gateway/proxy`) is kept.
    pub fn endpoint(base: &Url, path: &str) -> Result<Url, url::ParseError> {
        let mut base = base.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        base.join(path)
    }

    /// Both endpoints under a single proxy base. A base that already names one of the endpoints
    /// (`http://proxy:5050/api/chat`) is reduced to the proxy root first.
    pub fn from_base(base: &Url) -> Result<Self, url::ParseError> {
        let base = Self::proxy_root(base);
        Ok(Self {
            chat: Self::endpoint(&base, "api/chat")?,
            embeddings: Self::endpoint(&base, "api/embeddings")?,
        })
    }

    fn proxy_root(url: &Url) -> Url {
        let path = url.path().trim_end_matches('/');
        let root = ["/api/chat", "/api/embeddings"]
            .iter()
            .find_map(|suffix| path.strip_suffix(suffix));
        let mut url = url.clone();
        if let Some(root) = root {
            let root = format!("{root}/");
            url.set_path(&root);
        }
        url
    }
}
