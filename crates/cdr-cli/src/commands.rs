use std::collections::BTreeMap;
use std::path::PathBuf;

use cdr_core::models::presentation::Presentation;
use cdr_corpus::CatalogLoader;
use cdr_scoring::schema::{Inputs, Scoring, StructuredRule};
use cdr_scoring::{all_rules, get_rule, DecisionRule};
use eyre::{eyre, Result};
use tracing::{info, warn};

use crate::cli::{ContextArgs, EvaluateArgs, PublishArgs};
use cdr_cli::config::{self, CdrConfig};

/// Effective configuration plus where it came from.
pub struct Settings {
    pub path: PathBuf,
    pub config: CdrConfig,
}

impl Settings {
    /// Config file, then environment, then command-line overrides.
    pub fn resolve(path: Option<PathBuf>, corpus: Option<PathBuf>) -> Result<Self> {
        let path = match path {
            Some(path) => path,
            None => config::default_path()?,
        };
        let mut config = config::load_or_default(&path)?;
        config.apply_env(|key| std::env::var(key).ok());
        if let Some(corpus) = corpus {
            config.corpus_path = corpus;
        }
        Ok(Self { path, config })
    }

    pub fn loader(&self) -> CatalogLoader {
        CatalogLoader::with_parser(self.config.corpus_path.clone(), self.config.parser())
    }
}

pub fn run_index(settings: &Settings) -> Result<()> {
    let index = settings.loader().index()?;
    if index.is_empty() {
        warn!(corpus = %settings.config.corpus_path.display(), "catalog is empty");
    }
    println!("{index}");
    Ok(())
}

pub fn run_show(settings: &Settings, key: &str) -> Result<()> {
    let catalog = settings.loader().load()?;
    let rule = catalog
        .get(key)
        .ok_or_else(|| eyre!("no rule '{key}' in the catalog"))?;
    println!("{}", rule.full_text);
    Ok(())
}

pub fn run_context(settings: &Settings, args: &ContextArgs) -> Result<()> {
    let catalog = settings.loader().load()?;
    let mut presentation = Presentation::new(args.complaint.clone());
    if let Some(text) = &args.text {
        presentation = presentation.with_narrative(text.clone());
    }

    let builtin = all_rules();
    let structured: Vec<&StructuredRule> = builtin.iter().map(|r| r.definition()).collect();
    let ranked = cdr_context::rank(&catalog, &presentation, &structured, args.limit);
    info!(candidates = ranked.len(), "ranked rules for presentation");

    let max_chars = args.max_chars.unwrap_or(settings.config.max_context_chars);
    let block = cdr_context::assemble(ranked.iter().map(|r| r.rule), &catalog.index(), max_chars);
    println!("{block}");
    Ok(())
}

fn method_name(rule: &StructuredRule) -> &'static str {
    match rule.scoring {
        Scoring::Sum { .. } => "sum",
        Scoring::Threshold { .. } => "threshold",
        Scoring::Algorithm { .. } => "algorithm",
    }
}

pub fn run_rules() -> Result<()> {
    for rule in all_rules() {
        let definition = rule.definition();
        println!(
            "{}\t{}\t{}\t{}",
            definition.id,
            definition.category,
            method_name(definition),
            definition.full_name
        );
    }
    Ok(())
}

pub fn run_evaluate(args: &EvaluateArgs) -> Result<()> {
    let rule = get_rule(&args.rule)?;
    let inputs: Inputs = args.inputs.iter().cloned().collect::<BTreeMap<_, _>>();

    let problems = rule.validate_inputs(&inputs);
    for problem in problems.iter().filter(|p| !p.is_fatal()) {
        warn!(rule = rule.id(), "{problem}");
    }

    let evaluation = rule.evaluate(&inputs)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&evaluation)?);
    } else {
        print!("{}", rule.to_structured_input(&inputs, &evaluation));
    }
    Ok(())
}

/// Check every structured definition and that each one has a narrative
/// counterpart in the corpus.
pub fn run_validate(settings: &Settings) -> Result<()> {
    let mut failures = 0;
    for rule in all_rules() {
        let errors = rule.validate_definition();
        if errors.is_empty() {
            info!(rule = rule.id(), "definition ok");
        }
        for error in &errors {
            eprintln!("error: {error}");
        }
        failures += errors.len();
    }

    let catalog = settings.loader().load()?;
    info!(
        categories = catalog.categories().len(),
        rules = catalog.len(),
        "corpus loaded"
    );
    for rule in all_rules() {
        let definition = rule.definition();
        let found = catalog.get(&definition.name).or_else(|| catalog.get(&definition.full_name));
        if found.is_none() {
            warn!(rule = rule.id(), "no corpus entry for structured rule");
        }
    }

    if failures > 0 {
        return Err(eyre!("{failures} definition problem(s) found"));
    }
    println!("{} structured rules valid, {} corpus rules loaded", all_rules().len(), catalog.len());
    Ok(())
}

pub async fn run_publish(settings: &Settings, args: &PublishArgs) -> Result<()> {
    let bucket = args
        .bucket
        .clone()
        .or_else(|| settings.config.bucket.clone())
        .ok_or_else(|| eyre!("no bucket configured (use --bucket or CDR_BUCKET)"))?;

    let client = cdr_storage::client::build_client(settings.config.region.as_deref()).await;

    let builtin = all_rules();
    let keys = cdr_storage::documents::publish_rules(
        &client,
        &bucket,
        builtin.iter().map(|r| r.definition()),
    )
    .await?;
    for key in &keys {
        println!("s3://{bucket}/{key}");
    }

    if args.with_corpus {
        let raw = std::fs::read_to_string(&settings.config.corpus_path).map_err(|e| {
            eyre!(
                "failed to read corpus at {}: {e}",
                settings.config.corpus_path.display()
            )
        })?;
        cdr_storage::documents::publish_corpus(&client, &bucket, &raw).await?;
        println!("s3://{bucket}/{}", cdr_core::s3_keys::CORPUS);
    }
    Ok(())
}

pub fn run_init_config(settings: &Settings) -> Result<()> {
    config::save_config(&settings.path, &settings.config)?;
    println!("{}", settings.path.display());
    Ok(())
}
