use super::fetch::RawResponse;
use super::model::{ApiErrorBody, Article, ArticlesResponse};
use crate::error::NewsError;
use crate::util::sanitize::sanitize_for_terminal;
use log::{debug, warn};
use std::fmt::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Format {
    /// One ` - \t<title>` line per article.
    #[default]
    Titles,
    /// Title line followed by indented source/author and description lines.
    Details,
}

/// Turns a raw response into the text printed on stdout.
///
/// A non-2xx status yields a single `Error! <status>` line. A 2xx body that is
/// not valid JSON is an error.
pub fn render_response(resp: &RawResponse, format: Format) -> Result<String, NewsError> {
    if !resp.is_success() {
        warn!("API answered with status {}", resp.status);
        return Ok(error_line(resp));
    }

    let parsed: ArticlesResponse = serde_json::from_slice(&resp.body)?;
    debug!(
        "status={:?} totalResults={:?} articles={}",
        parsed.status,
        parsed.total_results,
        parsed.articles.len()
    );
    Ok(render_articles(&parsed.articles, format))
}

pub fn render_articles(articles: &[Article], format: Format) -> String {
    let mut out = String::new();
    for article in articles {
        let title = article
            .title
            .as_deref()
            .map(sanitize_for_terminal)
            .filter(|t| !t.is_empty())
            .unwrap_or_else(|| "(untitled)".into());
        let _ = writeln!(out, " - \t{title}");

        if format == Format::Details {
            let source = article.source.as_ref().and_then(|s| s.name.as_deref());
            let byline = match (source, article.author.as_deref()) {
                (Some(s), Some(a)) => format!("{s}, {a}"),
                (Some(s), None) => s.to_string(),
                (None, Some(a)) => a.to_string(),
                (None, None) => String::new(),
            };
            let byline = sanitize_for_terminal(&byline);
            if !byline.is_empty() {
                let _ = writeln!(out, "   \t{}", console::style(byline).dim());
            }
            if let Some(desc) = article.description.as_deref().map(sanitize_for_terminal) {
                if !desc.is_empty() {
                    let _ = writeln!(out, "   \t{desc}");
                }
            }
            if let Some(url) = article.url.as_deref().map(sanitize_for_terminal) {
                let _ = writeln!(out, "   \t{}", console::style(url).underlined());
            }
        }
    }
    out
}

fn error_line(resp: &RawResponse) -> String {
    let message = serde_json::from_slice::<ApiErrorBody>(&resp.body)
        .ok()
        .and_then(|b| b.message)
        .map(|m| sanitize_for_terminal(&m))
        .filter(|m| !m.is_empty());
    match message {
        Some(m) => format!("Error! {}: {}\n", resp.status, m),
        None => format!("Error! {}\n", resp.status),
    }
}
