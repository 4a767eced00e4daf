use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A decision rule as it appears in the narrative corpus.
///
/// `full_text` is the verbatim rule block, header included, and is what the
/// context assembler hands to the prompt consumer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Rule {
    pub id: String,
    pub name: String,
    pub category: String,
    pub full_text: String,
    /// The `**Application:**` sentence, empty when the block has none.
    #[serde(default)]
    pub application: String,
    pub keywords: BTreeSet<String>,
}

impl Rule {
    /// The `--- name (category) ---` block the context assembler emits for
    /// this rule.
    pub fn block(&self) -> String {
        format!("--- {} ({}) ---\n{}\n", self.name, self.category, self.full_text)
    }
}

/// A level-1 section of the corpus with its rules in document order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Category {
    pub name: String,
    pub rules: Vec<Rule>,
}

/// Deterministic identifier for a rule name: lower-case alphanumeric runs
/// joined by `_`. `"HEART Score"` becomes `"heart_score"`.
pub fn slugify(name: &str) -> String {
    name.split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|part| !part.is_empty())
        .map(str::to_ascii_lowercase)
        .collect::<Vec<_>>()
        .join("_")
}
