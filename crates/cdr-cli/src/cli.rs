//! Command-line arguments for `cdr`.

use std::path::PathBuf;

use cdr_scoring::schema::InputValue;
use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{InfoLevel, Verbosity};

#[derive(Parser)]
#[command(
    name = "cdr",
    version,
    about = "Clinical decision rule catalog and prompt context builder"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Config file (default: <config dir>/cdr/config.json).
    #[arg(long, value_name = "PATH", global = true)]
    pub config: Option<PathBuf>,

    /// Corpus markdown file, overriding the config and CDR_CORPUS.
    #[arg(long, value_name = "PATH", global = true)]
    pub corpus: Option<PathBuf>,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for warnings only).
    #[command(flatten)]
    pub verbosity: Verbosity<InfoLevel>,

    /// Log output format.
    #[arg(long = "log-format", value_enum, default_value = "pretty", global = true)]
    pub log_format: LogFormatArg,
}

#[derive(Subcommand)]
pub enum Command {
    /// Print the compact catalog index, one line per category.
    Index,

    /// Print the full text of a corpus rule, by id or name.
    Show {
        #[arg(value_name = "RULE")]
        rule: String,
    },

    /// Rank rules for a presentation and print the bounded context block.
    Context(ContextArgs),

    /// List the built-in structured rules.
    Rules,

    /// Score a structured rule from component values.
    Evaluate(EvaluateArgs),

    /// Check the structured rule definitions and the corpus.
    Validate,

    /// Publish the structured rules (and optionally the corpus) to the document store.
    Publish(PublishArgs),

    /// Write the effective configuration to the config file.
    InitConfig,
}

#[derive(Args)]
pub struct ContextArgs {
    /// Presenting chief complaint.
    #[arg(long)]
    pub complaint: String,

    /// Free-text history and findings.
    #[arg(long)]
    pub text: Option<String>,

    /// Character budget (default from config).
    #[arg(long = "max-chars")]
    pub max_chars: Option<usize>,

    /// Maximum number of candidate rules considered.
    #[arg(long, default_value_t = cdr_context::rank::DEFAULT_LIMIT)]
    pub limit: usize,
}

#[derive(Args)]
pub struct EvaluateArgs {
    /// Structured rule id (see `cdr rules`).
    #[arg(value_name = "RULE")]
    pub rule: String,

    /// Component values as `id=value`, e.g. `age=45-64` or `hemoptysis=yes`.
    #[arg(value_name = "ID=VALUE", value_parser = parse_input)]
    pub inputs: Vec<(String, InputValue)>,

    /// Print the evaluation as JSON instead of prompt text.
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct PublishArgs {
    /// Target bucket, overriding the config and CDR_BUCKET.
    #[arg(long)]
    pub bucket: Option<String>,

    /// Also upload the corpus file.
    #[arg(long = "with-corpus")]
    pub with_corpus: bool,
}

#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Json,
}

/// Parse one `id=value` pair.
pub fn parse_input(raw: &str) -> Result<(String, InputValue), String> {
    let (id, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected ID=VALUE, got '{raw}'"))?;
    let id = id.trim();
    if id.is_empty() {
        return Err(format!("missing component id in '{raw}'"));
    }
    Ok((id.to_string(), InputValue::parse(value)))
}
