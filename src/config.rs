use crate::error::NewsError;
use anyhow::Result;
use log::debug;
use serde::{Deserialize, Serialize};
use std::{env, fs, path::PathBuf, time::Duration};

pub const DEFAULT_API_BASE: &str = "https://newsapi.org/v2";
pub const DEFAULT_PREFERENCES_FILE: &str = "preferences.json";
pub const DEFAULT_COUNTRY: &str = "gb";

/// On-disk settings. Every key is optional.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AppConfig {
    pub api_base: Option<String>,
    pub preferences_path: Option<PathBuf>,
    pub default_country: Option<String>,
    pub connect_timeout_secs: Option<u64>,
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub api_base: String,
    pub preferences_path: PathBuf,
    pub default_country: String,
    pub connect_timeout: Duration,
    pub timeout: Duration,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        RuntimeConfig::from(AppConfig::default())
    }
}

impl From<AppConfig> for RuntimeConfig {
    fn from(parsed: AppConfig) -> Self {
        RuntimeConfig {
            api_base: parsed
                .api_base
                .map(|b| b.trim_end_matches('/').to_string())
                .unwrap_or_else(|| DEFAULT_API_BASE.into()),
            preferences_path: parsed
                .preferences_path
                .unwrap_or_else(|| PathBuf::from(DEFAULT_PREFERENCES_FILE)),
            default_country: parsed
                .default_country
                .map(|c| c.to_ascii_lowercase())
                .unwrap_or_else(|| DEFAULT_COUNTRY.into()),
            connect_timeout: Duration::from_secs(parsed.connect_timeout_secs.unwrap_or(5)),
            timeout: Duration::from_secs(parsed.timeout_secs.unwrap_or(20)),
        }
    }
}

impl RuntimeConfig {
    pub fn headlines_url(&self) -> String {
        format!("{}/top-headlines", self.api_base)
    }

    pub fn search_url(&self) -> String {
        format!("{}/everything", self.api_base)
    }
}

/// Loads settings from `config_override`, else the default config path, else
/// built-in defaults. An explicit override that does not exist is an error.
pub fn load(config_override: Option<PathBuf>) -> Result<RuntimeConfig> {
    if let Some(path) = config_override {
        if !path.is_file() {
            return Err(NewsError::Config {
                path,
                reason: "no such file".into(),
            }
            .into());
        }
        return read(path);
    }

    if let Some(path) = default_config_path() {
        if path.is_file() {
            return read(path);
        }
        debug!("no config at {}, using defaults", path.display());
    }

    Ok(RuntimeConfig::default())
}

fn read(path: PathBuf) -> Result<RuntimeConfig> {
    let txt = fs::read_to_string(&path).map_err(|e| NewsError::Config {
        path: path.clone(),
        reason: e.to_string(),
    })?;
    let parsed = parse(&txt).map_err(|e| NewsError::Config {
        path: path.clone(),
        reason: e.to_string(),
    })?;
    debug!("loaded config from {}", path.display());
    Ok(parsed)
}

pub fn parse(txt: &str) -> Result<RuntimeConfig, toml::de::Error> {
    let parsed: AppConfig = toml::from_str(txt)?;
    Ok(parsed.into())
}

fn default_config_path() -> Option<PathBuf> {
    if let Ok(xdg) = env::var("XDG_CONFIG_HOME") {
        let mut p = PathBuf::from(xdg);
        p.push("newsapi-cli");
        p.push("config.toml");
        return Some(p);
    }
    if let Ok(home) = env::var("HOME") {
        let mut p = PathBuf::from(home);
        p.push(".config");
        p.push("newsapi-cli");
        p.push("config.toml");
        return Some(p);
    }
    None
}
