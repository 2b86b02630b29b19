use env_logger::{Builder, Target};
use log::{LevelFilter, debug};

/// Logs go to stderr so stdout carries only prompts and articles.
/// `RUST_LOG` overrides the level picked from `-v`.
pub fn init(verbosity: u8) {
    let level = match verbosity {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    let res = Builder::new()
        .filter_level(level)
        .parse_default_env()
        .target(Target::Stderr)
        .format_timestamp(None)
        .try_init();
    if res.is_ok() {
        debug!("logger initialized at {level}");
    }
}
