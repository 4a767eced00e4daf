//! Document store key conventions.
//!
//! Pure string functions with no AWS SDK dependency. Structured rule documents
//! are keyed by rule id so re-publishing the same rule overwrites in place.

use crate::error::CoreError;

pub const RULES_PREFIX: &str = "rules/";

pub const CORPUS: &str = "corpus/cdr-corpus.md";

pub fn rule_definition(id: &str) -> Result<String, CoreError> {
    if !is_valid_rule_id(id) {
        return Err(CoreError::InvalidRuleId(id.to_string()));
    }
    Ok(format!("{RULES_PREFIX}{id}.json"))
}

/// Recover the rule id from an object key under [`RULES_PREFIX`].
pub fn rule_id_from_key(key: &str) -> Option<&str> {
    key.strip_prefix(RULES_PREFIX)?
        .strip_suffix(".json")
        .filter(|id| is_valid_rule_id(id))
}

/// Rule ids are lower-case ASCII slugs: letters, digits, `_` and `-`.
pub fn is_valid_rule_id(id: &str) -> bool {
    !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_' || c == '-')
}
