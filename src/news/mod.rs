pub mod fetch;
pub mod model;
pub mod render;
pub mod request;

use crate::config::RuntimeConfig;
use crate::prefs::Preferences;
use anyhow::{Context, Result};

pub use fetch::{NewsClient, RawResponse};
pub use model::{Article, ArticlesResponse};
pub use render::Format;
pub use request::{HeadlinesRequest, NewsRequest, SearchRequest};

/// Builds the URL for `request`, performs the GET and renders the result.
pub async fn run(
    client: &NewsClient,
    cfg: &RuntimeConfig,
    prefs: &Preferences,
    request: &NewsRequest,
    format: Format,
) -> Result<String> {
    let url = request
        .to_url(&cfg.api_base, prefs)
        .with_context(|| format!("invalid api_base {:?}", cfg.api_base))?;
    let resp = client.fetch(&url).await?;
    let text = render::render_response(&resp, format)
        .with_context(|| format!("unexpected response from {}", fetch::redacted(&url)))?;
    Ok(text)
}
