//! `cdr` command-line tool.

use cdr_cli::logging::{init_logging, LogFormat};
use clap::Parser;
use eyre::Result;

mod cli;
mod commands;

use crate::cli::{Cli, Command, LogFormatArg};
use crate::commands::Settings;

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    let format = match cli.log_format {
        LogFormatArg::Pretty => LogFormat::Pretty,
        LogFormatArg::Json => LogFormat::Json,
    };
    init_logging(
        cli.verbosity.tracing_level_filter(),
        cli.verbosity.is_present(),
        format,
    );

    let settings = Settings::resolve(cli.config.clone(), cli.corpus.clone())?;

    match &cli.command {
        Command::Index => commands::run_index(&settings),
        Command::Show { rule } => commands::run_show(&settings, rule),
        Command::Context(args) => commands::run_context(&settings, args),
        Command::Rules => commands::run_rules(),
        Command::Evaluate(args) => commands::run_evaluate(args),
        Command::Validate => commands::run_validate(&settings),
        Command::Publish(args) => commands::run_publish(&settings, args).await,
        Command::InitConfig => commands::run_init_config(&settings),
    }
}
