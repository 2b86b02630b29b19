//! Persisted API key and default country.
//!
//! `load` and `save` are plain file functions. First-run setup is the
//! [`Setup`] state machine: `Missing -> Prompting -> Validated | Invalid`.
//! Console I/O sits behind [`Prompter`] and the live key check behind
//! [`KeyCheck`], so the machine itself does no terminal or network work.

use crate::error::NewsError;
use crate::news::request::is_country;
use crate::news::{NewsClient, NewsRequest};
use anyhow::Result;
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::{fs, io, path::Path};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(rename = "APIKey")]
    pub api_key: String,
    #[serde(rename = "Country")]
    pub country: String,
    #[serde(rename = "Valid", default)]
    pub valid: bool,
}

impl Preferences {
    pub fn new(api_key: impl Into<String>, country: impl Into<String>) -> Self {
        let mut prefs = Preferences {
            api_key: api_key.into(),
            country: country.into(),
            valid: false,
        };
        prefs.valid = prefs.is_well_formed();
        prefs
    }

    pub fn invalid() -> Self {
        Preferences {
            api_key: String::new(),
            country: String::new(),
            valid: false,
        }
    }

    fn is_well_formed(&self) -> bool {
        !self.api_key.trim().is_empty() && is_country(&self.country)
    }
}

/// Reads `path`. `Ok(None)` when the file does not exist. The stored record is
/// trusted; only its shape decides `valid`.
pub fn load(path: &Path) -> Result<Option<Preferences>, NewsError> {
    let txt = match fs::read_to_string(path) {
        Ok(t) => t,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(NewsError::Preferences {
                path: path.to_path_buf(),
                reason: e.to_string(),
            });
        }
    };
    let mut prefs: Preferences =
        serde_json::from_str(&txt).map_err(|e| NewsError::Preferences {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
    prefs.valid = prefs.is_well_formed();
    debug!("loaded preferences from {} (valid={})", path.display(), prefs.valid);
    Ok(Some(prefs))
}

pub fn save(path: &Path, prefs: &Preferences) -> Result<(), NewsError> {
    let err = |e: &dyn std::fmt::Display| NewsError::Preferences {
        path: path.to_path_buf(),
        reason: e.to_string(),
    };
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| err(&e))?;
    }
    let json = serde_json::to_string_pretty(prefs).map_err(|e| err(&e))?;
    fs::write(path, json).map_err(|e| err(&e))?;
    info!("saved preferences to {}", path.display());
    Ok(())
}

/// Console side of first-run setup.
pub trait Prompter {
    fn api_key(&mut self) -> Result<String>;
    fn country(&mut self, default: &str) -> Result<String>;
    fn notify(&mut self, message: &str);
}

/// Decides whether the API accepts a key.
pub trait KeyCheck {
    fn key_is_valid(&self, api_key: &str) -> impl Future<Output = bool>;
}

/// Checks a key with a live `top-headlines?country=us` request.
pub struct ApiKeyCheck<'a> {
    pub client: &'a NewsClient,
    pub api_base: &'a str,
}

impl KeyCheck for ApiKeyCheck<'_> {
    async fn key_is_valid(&self, api_key: &str) -> bool {
        let probe = Preferences {
            api_key: api_key.to_string(),
            country: "us".into(),
            valid: false,
        };
        let url = match NewsRequest::default_headlines().to_url(self.api_base, &probe) {
            Ok(u) => u,
            Err(e) => {
                warn!("cannot build key check URL: {e}");
                return false;
            }
        };
        match self.client.fetch(&url).await {
            Ok(resp) => {
                debug!("key check answered {}", resp.status);
                resp.status == 200
            }
            Err(e) => {
                warn!("key check failed: {e}");
                false
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Setup {
    Missing,
    Prompting,
    Validated(Preferences),
    Invalid(String),
}

impl Setup {
    /// Advances one state. `Validated` and `Invalid` are terminal.
    pub async fn step<P: Prompter, K: KeyCheck>(
        self,
        default_country: &str,
        prompter: &mut P,
        check: &K,
    ) -> Result<Setup> {
        Ok(match self {
            Setup::Missing => {
                prompter.notify("No preferences found. A NewsAPI key is needed (https://newsapi.org/register).");
                Setup::Prompting
            }
            Setup::Prompting => {
                let api_key = prompter.api_key()?.trim().to_string();
                if api_key.is_empty() {
                    return Ok(Setup::Invalid("Invalid API Key!".into()));
                }
                let country = prompter.country(default_country)?.trim().to_ascii_lowercase();
                if !is_country(&country) {
                    return Ok(Setup::Invalid(format!("Invalid country code {country:?}!")));
                }
                if !check.key_is_valid(&api_key).await {
                    return Ok(Setup::Invalid("Invalid API Key!".into()));
                }
                Setup::Validated(Preferences::new(api_key, country))
            }
            terminal => terminal,
        })
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Setup::Validated(_) | Setup::Invalid(_))
    }
}

/// Returns the stored preferences, or runs first-run setup. Only a validated
/// setup is written to `path`; a failed one returns `valid = false`.
pub async fn ensure<P: Prompter, K: KeyCheck>(
    path: &Path,
    default_country: &str,
    prompter: &mut P,
    check: &K,
) -> Result<Preferences> {
    if let Some(prefs) = load(path)? {
        return Ok(prefs);
    }

    let mut state = Setup::Missing;
    loop {
        state = match state.step(default_country, prompter, check).await? {
            Setup::Validated(prefs) => {
                save(path, &prefs)?;
                return Ok(prefs);
            }
            Setup::Invalid(reason) => {
                prompter.notify(&reason);
                return Ok(Preferences::invalid());
            }
            next => next,
        };
    }
}
