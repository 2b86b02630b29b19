use crate::prefs::Preferences;
use log::debug;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Date, OffsetDateTime};
use url::Url;

pub const COUNTRIES: &[&str] = &[
    "ae", "ar", "at", "au", "be", "bg", "br", "ca", "ch", "cn", "co", "cu", "cz", "de", "eg", "fr",
    "gb", "gr", "hk", "hu", "id", "ie", "il", "in", "it", "jp", "kr", "lt", "lv", "ma", "mx", "my",
    "ng", "nl", "no", "nz", "ph", "pl", "pt", "ro", "rs", "ru", "sa", "se", "sg", "si", "sk", "th",
    "tr", "tw", "ua", "us", "ve", "za",
];

pub const CATEGORIES: &[&str] = &[
    "business",
    "entertainment",
    "general",
    "health",
    "science",
    "sports",
    "technology",
];

pub const LANGUAGES: &[&str] = &[
    "ar", "de", "en", "es", "fr", "he", "it", "nl", "no", "pt", "ru", "se", "ud", "zh",
];

pub const SORT_KEYS: &[&str] = &["relevancy", "popularity", "publishedAt"];

pub const DEFAULT_SORT: &str = "relevancy";

pub fn is_country(code: &str) -> bool {
    code.len() == 2 && COUNTRIES.contains(&code)
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeadlinesRequest {
    pub keywords: Option<String>,
    pub country: Option<String>,
    pub category: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub keywords: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub language: Option<String>,
    pub sort_by: String,
}

impl Default for SearchRequest {
    fn default() -> Self {
        SearchRequest {
            keywords: None,
            from: None,
            to: None,
            language: None,
            sort_by: DEFAULT_SORT.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NewsRequest {
    Headlines(HeadlinesRequest),
    Search(SearchRequest),
}

impl NewsRequest {
    /// Top headlines for the preferred country, unfiltered.
    pub fn default_headlines() -> Self {
        NewsRequest::Headlines(HeadlinesRequest::default())
    }

    /// Builds the full request URL. Values that fail their allow-list are
    /// left out; `apiKey` is always the last parameter.
    pub fn to_url(&self, api_base: &str, prefs: &Preferences) -> Result<Url, url::ParseError> {
        let endpoint = match self {
            NewsRequest::Headlines(_) => "top-headlines",
            NewsRequest::Search(_) => "everything",
        };
        let mut url = Url::parse(&format!("{}/{}", api_base.trim_end_matches('/'), endpoint))?;
        {
            let mut query = url.query_pairs_mut();
            for (name, value) in self.query_pairs(prefs) {
                query.append_pair(name, &value);
            }
            query.append_pair("apiKey", &prefs.api_key);
        }
        Ok(url)
    }

    fn query_pairs(&self, prefs: &Preferences) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        match self {
            NewsRequest::Headlines(req) => {
                if let Some(q) = keywords(req.keywords.as_deref()) {
                    pairs.push(("q", q));
                }
                let country = match req.country.as_deref().map(str::trim) {
                    Some(c) if is_country(c) => c.to_string(),
                    Some(c) => {
                        debug!("unknown country {c:?}, using {}", prefs.country);
                        prefs.country.clone()
                    }
                    None => prefs.country.clone(),
                };
                pairs.push(("country", country));
                if let Some(cat) = allowed(req.category.as_deref(), CATEGORIES, "category") {
                    pairs.push(("category", cat));
                }
            }
            NewsRequest::Search(req) => {
                if let Some(q) = keywords(req.keywords.as_deref()) {
                    pairs.push(("q", q));
                }
                let lang = req.language.as_deref().filter(|l| l.trim().len() == 2);
                if let Some(lang) = allowed(lang, LANGUAGES, "language") {
                    pairs.push(("language", lang));
                }
                if let Some(from) = date(req.from.as_deref(), "from") {
                    pairs.push(("from", from));
                }
                if let Some(to) = date(req.to.as_deref(), "to") {
                    pairs.push(("to", to));
                }
                if let Some(sort) = allowed(Some(req.sort_by.as_str()), SORT_KEYS, "sort") {
                    pairs.push(("sortBy", sort));
                }
            }
        }
        pairs
    }
}

fn keywords(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(str::to_string)
}

fn allowed(value: Option<&str>, list: &[&str], what: &str) -> Option<String> {
    let v = value?.trim();
    if v.is_empty() {
        return None;
    }
    if list.contains(&v) {
        Some(v.to_string())
    } else {
        debug!("dropping unknown {what} {v:?}");
        None
    }
}

/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp.
fn date(value: Option<&str>, what: &str) -> Option<String> {
    let v = value?.trim();
    if v.is_empty() {
        return None;
    }
    if Date::parse(v, format_description!("[year]-[month]-[day]")).is_ok()
        || OffsetDateTime::parse(v, &Rfc3339).is_ok()
    {
        Some(v.to_string())
    } else {
        debug!("dropping unparseable {what} date {v:?}");
        None
    }
}
