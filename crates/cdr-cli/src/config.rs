use std::path::{Path, PathBuf};

use cdr_context::DEFAULT_MAX_CHARS;
use cdr_corpus::CorpusParser;
use serde::{Deserialize, Serialize};

/// Current config version. Bump this when adding fields or changing shape.
/// Each bump requires a corresponding entry in [`migrate`].
pub const CURRENT_VERSION: u32 = 1;

pub const ENV_CORPUS: &str = "CDR_CORPUS";
pub const ENV_BUCKET: &str = "CDR_BUCKET";
pub const ENV_REGION: &str = "AWS_REGION";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CdrConfig {
    /// Schema version. Missing or 0 = pre-versioned config.
    #[serde(default)]
    pub config_version: u32,
    pub corpus_path: PathBuf,
    /// Character budget for assembled context blocks. Added in v1.
    #[serde(default = "default_max_context_chars")]
    pub max_context_chars: usize,
    /// Replaces the built-in list of category headers the parser accepts.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bucket: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub region: Option<String>,
}

fn default_max_context_chars() -> usize {
    DEFAULT_MAX_CHARS
}

impl Default for CdrConfig {
    fn default() -> Self {
        Self {
            config_version: CURRENT_VERSION,
            corpus_path: PathBuf::from("corpus/cdr-corpus.md"),
            max_context_chars: DEFAULT_MAX_CHARS,
            categories: None,
            bucket: None,
            region: None,
        }
    }
}

impl CdrConfig {
    /// Override fields from environment variables looked up through `var`.
    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(path) = var(ENV_CORPUS) {
            self.corpus_path = PathBuf::from(path);
        }
        if let Some(bucket) = var(ENV_BUCKET) {
            self.bucket = Some(bucket);
        }
        if let Some(region) = var(ENV_REGION) {
            self.region = Some(region);
        }
    }

    pub fn parser(&self) -> CorpusParser {
        match &self.categories {
            Some(categories) => CorpusParser::with_categories(categories),
            None => CorpusParser::new(),
        }
    }
}

/// `<config dir>/cdr/config.json`.
pub fn default_path() -> eyre::Result<PathBuf> {
    let base = dirs::config_dir().ok_or_else(|| eyre::eyre!("no config directory found"))?;
    Ok(base.join("cdr").join("config.json"))
}

pub fn load_config(path: &Path) -> eyre::Result<CdrConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("failed to read config at {}: {e}", path.display()))?;

    // Parse as raw JSON so we can run migrations before deserializing.
    let json: serde_json::Value = serde_json::from_str(&contents)?;
    let on_disk_version = json
        .get("config_version")
        .and_then(|v| v.as_u64())
        .unwrap_or(0) as u32;

    let migrated = migrate(json, on_disk_version)?;
    Ok(serde_json::from_value(migrated)?)
}

/// The config at `path`, or the defaults when no file exists there yet.
pub fn load_or_default(path: &Path) -> eyre::Result<CdrConfig> {
    if path.exists() {
        load_config(path)
    } else {
        tracing::debug!(path = %path.display(), "no config file, using defaults");
        Ok(CdrConfig::default())
    }
}

/// Run sequential migrations from `from_version` up to [`CURRENT_VERSION`].
pub fn migrate(mut json: serde_json::Value, from_version: u32) -> eyre::Result<serde_json::Value> {
    if from_version > CURRENT_VERSION {
        return Err(eyre::eyre!(
            "config_version {from_version} is newer than this build supports ({CURRENT_VERSION})"
        ));
    }

    // v0 -> v1: add max_context_chars
    if from_version < 1 {
        let obj = json
            .as_object_mut()
            .ok_or_else(|| eyre::eyre!("config is not a JSON object"))?;
        obj.entry("max_context_chars")
            .or_insert(serde_json::Value::Number(DEFAULT_MAX_CHARS.into()));
        obj.insert(
            "config_version".to_string(),
            serde_json::Value::Number(1.into()),
        );
        tracing::info!("migrated config v0 -> v1 (added max_context_chars)");
    }

    Ok(json)
}

/// Write `config` to `path`, stamped with the current version.
pub fn save_config(path: &Path, config: &CdrConfig) -> eyre::Result<()> {
    let dir = path
        .parent()
        .ok_or_else(|| eyre::eyre!("config path {} has no parent", path.display()))?;
    std::fs::create_dir_all(dir)?;

    let mut stamped = config.clone();
    stamped.config_version = CURRENT_VERSION;
    let json = serde_json::to_string_pretty(&stamped)?;

    // Write to a temp file then rename for atomicity
    let tmp_path = path.with_extension("json.tmp");
    std::fs::write(&tmp_path, json.as_bytes())?;
    std::fs::rename(&tmp_path, path)?;

    tracing::info!(path = %path.display(), "config saved");
    Ok(())
}
