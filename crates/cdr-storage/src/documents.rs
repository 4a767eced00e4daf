//! Structured rule documents.
//!
//! Each definition is stored as JSON at `rules/{id}.json`. Keys depend only
//! on the rule id, so publishing the same rule again overwrites it.

use aws_sdk_s3::Client;
use cdr_core::s3_keys;
use cdr_scoring::schema::StructuredRule;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::StorageError;
use crate::objects;

const JSON: &str = "application/json";
const MARKDOWN: &str = "text/markdown; charset=utf-8";

/// A structured rule as published, with an optional embedding the ranking
/// side uses to find candidates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleDocument {
    #[serde(flatten)]
    pub rule: StructuredRule,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub embedding: Option<Vec<f32>>,
    pub published_at: jiff::Timestamp,
}

impl RuleDocument {
    pub fn new(rule: StructuredRule) -> Self {
        Self {
            rule,
            embedding: None,
            published_at: jiff::Timestamp::now(),
        }
    }

    pub fn with_embedding(mut self, embedding: Vec<f32>) -> Self {
        self.embedding = Some(embedding);
        self
    }
}

/// Text an embedding for `rule` is computed over.
pub fn embedding_text(rule: &StructuredRule) -> String {
    [rule.name.as_str(), &rule.full_name, &rule.application]
        .into_iter()
        .chain(rule.applicable_chief_complaints.iter().map(String::as_str))
        .chain(rule.keywords.iter().map(String::as_str))
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Publish one document. Returns its key.
pub async fn publish_document(
    client: &Client,
    bucket: &str,
    document: &RuleDocument,
) -> Result<String, StorageError> {
    let key = s3_keys::rule_definition(&document.rule.id)?;
    let body = serde_json::to_vec_pretty(document)?;
    objects::put_object(client, bucket, &key, body, JSON).await?;
    debug!(%key, "rule document written");
    Ok(key)
}

/// Publish every rule, stamped with the current time. Returns the keys
/// written, in input order.
pub async fn publish_rules<'a>(
    client: &Client,
    bucket: &str,
    rules: impl IntoIterator<Item = &'a StructuredRule>,
) -> Result<Vec<String>, StorageError> {
    let mut keys = Vec::new();
    for rule in rules {
        let document = RuleDocument::new(rule.clone());
        keys.push(publish_document(client, bucket, &document).await?);
    }
    info!(bucket, count = keys.len(), "published rule documents");
    Ok(keys)
}

pub async fn fetch_rule(client: &Client, bucket: &str, id: &str) -> Result<RuleDocument, StorageError> {
    let key = s3_keys::rule_definition(id)?;
    let body = objects::get_object(client, bucket, &key).await?;
    Ok(serde_json::from_slice(&body)?)
}

/// Ids of every published rule. Keys that do not look like rule documents
/// are ignored.
pub async fn list_rule_ids(client: &Client, bucket: &str) -> Result<Vec<String>, StorageError> {
    let keys = objects::list_keys(client, bucket, s3_keys::RULES_PREFIX).await?;
    Ok(keys
        .iter()
        .filter_map(|k| s3_keys::rule_id_from_key(k))
        .map(str::to_string)
        .collect())
}

/// Upload the narrative corpus alongside the rule documents.
pub async fn publish_corpus(client: &Client, bucket: &str, raw: &str) -> Result<(), StorageError> {
    objects::put_object(client, bucket, s3_keys::CORPUS, raw.as_bytes().to_vec(), MARKDOWN).await?;
    info!(bucket, key = s3_keys::CORPUS, "published corpus");
    Ok(())
}

pub async fn fetch_corpus(client: &Client, bucket: &str) -> Result<String, StorageError> {
    let body = objects::get_object(client, bucket, s3_keys::CORPUS).await?;
    String::from_utf8(body).map_err(|_| StorageError::NotUtf8 {
        key: s3_keys::CORPUS.to_string(),
    })
}
