use crate::cli::Cli;
use crate::config;
use crate::news::{self, NewsClient, NewsRequest};
use crate::prefs::{self, ApiKeyCheck, Prompter};
use anyhow::{Context, Result};
use log::{error, info};
use std::io::Write;
use std::process::ExitCode;

/// Runs one invocation. `bare` is true when no arguments followed the
/// program name; the default headlines request is used then.
pub async fn run<P: Prompter, W: Write>(
    cli: &Cli,
    bare: bool,
    prompter: &mut P,
    out: &mut W,
) -> Result<ExitCode> {
    let mut cfg = config::load(cli.config.clone())?;
    if let Some(path) = &cli.prefs {
        cfg.preferences_path = path.clone();
    }

    let client = NewsClient::new(&cfg)?;
    let check = ApiKeyCheck {
        client: &client,
        api_base: &cfg.api_base,
    };
    let prefs = prefs::ensure(&cfg.preferences_path, &cfg.default_country, prompter, &check).await?;
    if !prefs.valid {
        error!(
            "preferences in {} are not usable; remove the file to set up again",
            cfg.preferences_path.display()
        );
        return Ok(ExitCode::FAILURE);
    }

    let request = if bare {
        NewsRequest::default_headlines()
    } else {
        cli.request()
    };
    info!("request: {request:?}");

    let text = news::run(&client, &cfg, &prefs, &request, cli.format()).await?;
    out.write_all(text.as_bytes()).context("failed to write output")?;
    out.flush().context("failed to write output")?;
    Ok(ExitCode::SUCCESS)
}
