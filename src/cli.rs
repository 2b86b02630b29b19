use crate::news::render::Format;
use crate::news::request::{DEFAULT_SORT, HeadlinesRequest, NewsRequest, SearchRequest};
use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// Long flags that may also be written with a single dash (`-keyword=rust`).
const LONG_FLAGS: &[&str] = &[
    "keyword",
    "country",
    "category",
    "from",
    "to",
    "lang",
    "sort",
    "everything",
    "details",
    "config",
    "prefs",
    "verbose",
    "help",
    "version",
];

#[derive(Debug, Parser)]
#[command(
    name = "newsapi-cli",
    about = "Print top headlines or search results from NewsAPI",
    version
)]
pub struct Cli {
    /// Search all articles instead of returning the headlines.
    #[arg(short = 'e', long = "everything")]
    pub search: bool,

    /// Keyword or phrase to search for.
    #[arg(long)]
    pub keyword: Option<String>,

    /// ISO 3166-1 code of the country to get headlines for [default: your preference].
    #[arg(long)]
    pub country: Option<String>,

    /// Headline category (business, entertainment, general, health, science, sports, technology).
    #[arg(long)]
    pub category: Option<String>,

    /// Oldest article allowed in a search (YYYY-MM-DD or RFC 3339).
    #[arg(long)]
    pub from: Option<String>,

    /// Newest article allowed in a search (YYYY-MM-DD or RFC 3339).
    #[arg(long)]
    pub to: Option<String>,

    /// ISO 639-1 code of the language to search in.
    #[arg(long)]
    pub lang: Option<String>,

    /// Sort order for search results (relevancy, popularity, publishedAt).
    #[arg(long, default_value = DEFAULT_SORT)]
    pub sort: String,

    /// Print source, author, description and link under each title.
    #[arg(long)]
    pub details: bool,

    /// Settings file [default: $XDG_CONFIG_HOME/newsapi-cli/config.toml].
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Preferences file [default: ./preferences.json].
    #[arg(long, value_name = "PATH")]
    pub prefs: Option<PathBuf>,

    /// More log output on stderr (-v info, -vv debug).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    pub fn request(&self) -> NewsRequest {
        if self.search {
            NewsRequest::Search(SearchRequest {
                keywords: self.keyword.clone(),
                from: self.from.clone(),
                to: self.to.clone(),
                language: self.lang.clone(),
                sort_by: self.sort.clone(),
            })
        } else {
            NewsRequest::Headlines(HeadlinesRequest {
                keywords: self.keyword.clone(),
                country: self.country.clone(),
                category: self.category.clone(),
            })
        }
    }

    pub fn format(&self) -> Format {
        if self.details {
            Format::Details
        } else {
            Format::Titles
        }
    }
}

/// Rewrites `-keyword=x` / `-keyword x` to `--keyword ...` so single-dash
/// long flags keep working. Short flags such as `-e` and `-vv` pass through.
pub fn normalize_args<I, S>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut out = Vec::new();
    let mut rest_are_values = false;
    for (i, arg) in args.into_iter().map(Into::into).enumerate() {
        if i == 0 || rest_are_values {
            out.push(arg);
            continue;
        }
        if arg == "--" {
            rest_are_values = true;
            out.push(arg);
            continue;
        }
        let single_dash_long = arg.strip_prefix('-').filter(|rest| !rest.starts_with('-')).filter(|rest| {
            let name = rest.split('=').next().unwrap_or("");
            LONG_FLAGS.contains(&name)
        });
        match single_dash_long {
            Some(rest) => out.push(format!("--{rest}")),
            None => out.push(arg),
        }
    }
    out
}
