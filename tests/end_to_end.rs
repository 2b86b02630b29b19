//! Drives the full pipeline against a local mock of the NewsAPI endpoints.
//!
//! The mock listens on a random port and records every query string it
//! receives. Each test writes its own config and preferences files into a
//! scratch directory and points `api_base` at the mock.

use axum::{
    Json, Router,
    extract::{RawQuery, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use clap::Parser;
use newsapi_cli::app;
use newsapi_cli::cli::{Cli, normalize_args};
use newsapi_cli::prefs::{self, Preferences, Prompter};
use serde_json::json;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::net::TcpListener;

const GOOD_KEY: &str = "good-key";

type Seen = Arc<Mutex<Vec<String>>>;

fn api_key(query: &str) -> Option<&str> {
    query.split('&').find_map(|p| p.strip_prefix("apiKey="))
}

async fn headlines(State(seen): State<Seen>, RawQuery(query): RawQuery) -> Response {
    let query = query.unwrap_or_default();
    seen.lock().unwrap().push(format!("top-headlines?{query}"));
    if api_key(&query) != Some(GOOD_KEY) {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({"status": "error", "code": "apiKeyInvalid", "message": "Your API key is invalid."})),
        )
            .into_response();
    }
    Json(json!({
        "status": "ok",
        "totalResults": 2,
        "articles": [
            {"source": {"id": null, "name": "Wire"}, "author": null, "title": "A", "description": "first"},
            {"source": {"id": null, "name": "Wire"}, "author": "Bo", "title": "B", "description": null}
        ]
    }))
    .into_response()
}

async fn everything(State(seen): State<Seen>, RawQuery(query): RawQuery) -> Response {
    let query = query.unwrap_or_default();
    seen.lock().unwrap().push(format!("everything?{query}"));
    if query.contains("q=broken") {
        return (StatusCode::OK, "{\"articles\": [").into_response();
    }
    if query.contains("q=down") {
        return StatusCode::SERVICE_UNAVAILABLE.into_response();
    }
    Json(json!({"status": "ok", "totalResults": 1, "articles": [{"title": "Only"}]})).into_response()
}

async fn start_mock() -> (String, Seen) {
    let seen: Seen = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new()
        .route("/v2/top-headlines", get(headlines))
        .route("/v2/everything", get(everything))
        .with_state(seen.clone());
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move { axum::serve(listener, app).await });
    (format!("http://{addr}/v2"), seen)
}

struct Workspace {
    dir: PathBuf,
    config: PathBuf,
    prefs: PathBuf,
}

impl Workspace {
    fn new(api_base: &str, tag: &str) -> Self {
        let nanos = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_nanos();
        let dir = std::env::temp_dir().join(format!("newsapi-cli-e2e-{tag}-{nanos}"));
        std::fs::create_dir_all(&dir).unwrap();
        let prefs = dir.join("preferences.json");
        let config = dir.join("config.toml");
        std::fs::write(
            &config,
            format!(
                "api_base = \"{api_base}\"\npreferences_path = \"{}\"\ntimeout_secs = 5\n",
                prefs.display()
            ),
        )
        .unwrap();
        Workspace { dir, config, prefs }
    }

    fn with_prefs(self, key: &str, country: &str) -> Self {
        prefs::save(&self.prefs, &Preferences::new(key, country)).unwrap();
        self
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.dir);
    }
}

struct Scripted {
    key: &'static str,
    country: &'static str,
    asked: usize,
}

impl Scripted {
    fn new(key: &'static str, country: &'static str) -> Self {
        Scripted { key, country, asked: 0 }
    }
}

impl Prompter for Scripted {
    fn api_key(&mut self) -> anyhow::Result<String> {
        self.asked += 1;
        Ok(self.key.into())
    }
    fn country(&mut self, _default: &str) -> anyhow::Result<String> {
        Ok(self.country.into())
    }
    fn notify(&mut self, _message: &str) {}
}

async fn invoke(ws: &Workspace, flags: &[&str], prompter: &mut Scripted) -> (anyhow::Result<ExitCode>, String) {
    let mut args = vec!["newsapi-cli".to_string()];
    args.extend(flags.iter().map(|f| f.to_string()));
    args.push("--config".into());
    args.push(ws.config.display().to_string());
    let bare = flags.is_empty();
    let cli = Cli::parse_from(normalize_args(args));
    let mut out = Vec::new();
    let res = app::run(&cli, bare, prompter, &mut out).await;
    (res, String::from_utf8(out).unwrap())
}

#[tokio::test]
async fn no_arguments_prints_default_headlines() {
    let (base, seen) = start_mock().await;
    let ws = Workspace::new(&base, "bare").with_prefs(GOOD_KEY, "gb");
    let mut prompter = Scripted::new("unused", "us");

    let (res, out) = invoke(&ws, &[], &mut prompter).await;

    assert_eq!(res.unwrap(), ExitCode::SUCCESS);
    assert_eq!(out, " - \tA\n - \tB\n");
    assert_eq!(prompter.asked, 0);
    assert_eq!(
        seen.lock().unwrap().as_slice(),
        [format!("top-headlines?country=gb&apiKey={GOOD_KEY}")]
    );
}

#[tokio::test]
async fn search_flags_reach_the_everything_endpoint() {
    let (base, seen) = start_mock().await;
    let ws = Workspace::new(&base, "search").with_prefs(GOOD_KEY, "gb");
    let mut prompter = Scripted::new("unused", "us");

    let (res, out) = invoke(
        &ws,
        &["-e", "-keyword=tech", "-lang=en", "-sort=popularity", "-from=someday"],
        &mut prompter,
    )
    .await;

    assert_eq!(res.unwrap(), ExitCode::SUCCESS);
    assert_eq!(out, " - \tOnly\n");
    assert_eq!(
        seen.lock().unwrap().as_slice(),
        [format!("everything?q=tech&language=en&sortBy=popularity&apiKey={GOOD_KEY}")]
    );
}

#[tokio::test]
async fn invalid_country_falls_back_to_preference() {
    let (base, seen) = start_mock().await;
    let ws = Workspace::new(&base, "country").with_prefs(GOOD_KEY, "fr");
    let mut prompter = Scripted::new("unused", "us");

    let (res, _) = invoke(&ws, &["-country=zz", "-category=weather"], &mut prompter).await;

    assert_eq!(res.unwrap(), ExitCode::SUCCESS);
    assert_eq!(
        seen.lock().unwrap().as_slice(),
        [format!("top-headlines?country=fr&apiKey={GOOD_KEY}")]
    );
}

#[tokio::test]
async fn http_error_prints_one_line() {
    let (base, _) = start_mock().await;
    let ws = Workspace::new(&base, "status").with_prefs("revoked", "gb");
    let mut prompter = Scripted::new("unused", "us");

    let (res, out) = invoke(&ws, &["--keyword", "x"], &mut prompter).await;

    assert_eq!(res.unwrap(), ExitCode::SUCCESS);
    assert_eq!(out, "Error! 401: Your API key is invalid.\n");

    let (res, out) = invoke(&ws, &["-e", "--keyword", "down"], &mut prompter).await;
    assert_eq!(res.unwrap(), ExitCode::SUCCESS);
    assert_eq!(out, "Error! 503\n");
}

#[tokio::test]
async fn malformed_body_is_fatal() {
    let (base, _) = start_mock().await;
    let ws = Workspace::new(&base, "decode").with_prefs(GOOD_KEY, "gb");
    let mut prompter = Scripted::new("unused", "us");

    let (res, out) = invoke(&ws, &["-e", "-keyword=broken"], &mut prompter).await;

    let err = res.unwrap_err();
    assert!(format!("{err:#}").contains("could not decode response body"));
    assert!(out.is_empty());
}

#[tokio::test]
async fn first_run_validates_and_saves() {
    let (base, seen) = start_mock().await;
    let ws = Workspace::new(&base, "setup");
    let mut prompter = Scripted::new(GOOD_KEY, "de");

    let (res, out) = invoke(&ws, &[], &mut prompter).await;

    assert_eq!(res.unwrap(), ExitCode::SUCCESS);
    assert_eq!(out.lines().count(), 2);
    let saved = prefs::load(&ws.prefs).unwrap().unwrap();
    assert_eq!(saved.api_key, GOOD_KEY);
    assert_eq!(saved.country, "de");
    assert_eq!(
        seen.lock().unwrap().as_slice(),
        [
            format!("top-headlines?country=us&apiKey={GOOD_KEY}"),
            format!("top-headlines?country=de&apiKey={GOOD_KEY}"),
        ]
    );
}

#[tokio::test]
async fn first_run_with_rejected_key_exits_with_failure() {
    let (base, seen) = start_mock().await;
    let ws = Workspace::new(&base, "reject");
    let mut prompter = Scripted::new("nope", "us");

    let (res, out) = invoke(&ws, &[], &mut prompter).await;

    assert_eq!(res.unwrap(), ExitCode::FAILURE);
    assert!(out.is_empty());
    assert!(!ws.prefs.exists());
    assert_eq!(seen.lock().unwrap().len(), 1);
}
