//! Command-line client for the NewsAPI headlines and search endpoints.
//!
//! The binary loads (or sets up) a preferences file holding the API key and
//! default country, turns its flags into one request, performs a single GET
//! and prints one line per article title.

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod logger;
pub mod news;
pub mod prefs;
pub mod ui;
pub mod util;

pub use error::NewsError;
