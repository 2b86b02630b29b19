use anyhow::Result;
use clap::Parser;
use newsapi_cli::cli::{Cli, normalize_args};
use newsapi_cli::ui::TerminalPrompter;
use newsapi_cli::{app, logger};
use std::{env, io, process::ExitCode};

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let args = normalize_args(env::args());
    let bare = args.len() <= 1;
    let cli = Cli::parse_from(args);
    logger::init(cli.verbose);

    let mut prompter = TerminalPrompter::new();
    let mut stdout = io::stdout();
    app::run(&cli, bare, &mut prompter, &mut stdout).await
}
