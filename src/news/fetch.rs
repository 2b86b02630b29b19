use crate::config::RuntimeConfig;
use crate::error::NewsError;
use futures_util::StreamExt;
use log::{debug, info};
use reqwest::Client;
use url::Url;

// 5 MB cap
const MAX_BODY_BYTES: usize = 5 * 1024 * 1024;

/// Status and body of one GET, before any decoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

#[derive(Debug, Clone)]
pub struct NewsClient {
    http: Client,
}

impl NewsClient {
    pub fn new(cfg: &RuntimeConfig) -> Result<Self, NewsError> {
        let http = Client::builder()
            .user_agent(concat!("newsapi-cli/", env!("CARGO_PKG_VERSION")))
            .gzip(true)
            .connect_timeout(cfg.connect_timeout)
            .timeout(cfg.timeout)
            .build()
            .map_err(|source| NewsError::Transport {
                url: cfg.api_base.clone(),
                source,
            })?;
        Ok(NewsClient { http })
    }

    /// One GET, no retry. Non-2xx statuses are returned, not raised.
    pub async fn fetch(&self, url: &Url) -> Result<RawResponse, NewsError> {
        let shown = redacted(url);
        info!("GET {shown}");
        let resp = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|source| NewsError::Transport {
                url: shown.clone(),
                source: source.without_url(),
            })?;
        let status = resp.status().as_u16();
        debug!("{shown} -> {status}");

        let mut stream = resp.bytes_stream();
        let mut body: Vec<u8> = Vec::new();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|source| NewsError::Transport {
                url: shown.clone(),
                source: source.without_url(),
            })?;
            if body.len() + chunk.len() > MAX_BODY_BYTES {
                return Err(NewsError::BodyTooLarge {
                    limit: MAX_BODY_BYTES,
                });
            }
            body.extend_from_slice(&chunk);
        }
        Ok(RawResponse { status, body })
    }
}

/// The URL with `apiKey` masked, for logs and error messages.
pub fn redacted(url: &Url) -> String {
    let mut shown = url.clone();
    let pairs: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            let v = if k == "apiKey" { "***".into() } else { v.into_owned() };
            (k.into_owned(), v)
        })
        .collect();
    if pairs.is_empty() {
        return shown.into();
    }
    shown.query_pairs_mut().clear().extend_pairs(pairs);
    shown.into()
}
