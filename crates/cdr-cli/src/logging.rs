//! Subscriber setup. Logs go to stderr so command output on stdout can be
//! piped into a prompt unchanged.

use std::io;

use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// `RUST_LOG` wins unless a level was asked for explicitly on the command
/// line.
pub fn build_env_filter(level: LevelFilter, explicit: bool) -> EnvFilter {
    let fallback = || EnvFilter::new(level.to_string().to_lowercase());
    if explicit {
        return fallback();
    }
    EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback())
}

pub fn init_logging(level: LevelFilter, explicit: bool, format: LogFormat) {
    let builder = tracing_subscriber::fmt()
        .with_env_filter(build_env_filter(level, explicit))
        .with_writer(io::stderr);

    match format {
        LogFormat::Pretty => builder.with_target(false).init(),
        LogFormat::Json => builder.json().init(),
    }
}
