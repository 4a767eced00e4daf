//! Bounded context block builder.
//!
//! The block is the preamble, the catalog index, as many candidate rule
//! definitions as fit the character budget, and the usage instructions,
//! joined by newlines. Lengths are counted in characters.

use cdr_core::models::rule::Rule;
use tracing::debug;

pub const DEFAULT_MAX_CHARS: usize = 16_000;

pub const PREAMBLE: &str = "You have access to the following Clinical Decision Rules (CDRs). \
Use them to structure your assessment of the presentation.";

pub const CATALOG_HEADER: &str = "Available CDR Catalog:";

pub const DEFINITIONS_HEADER: &str = "Relevant CDR definitions:";

pub const FALLBACK: &str = "No specific CDR definitions matched this presentation. \
Use your clinical judgment to select any applicable rules from the catalog above.";

pub const INSTRUCTIONS: &str = "For each relevant CDR above:
1. Check whether the patient meets the rule's prerequisites and application criteria.
2. Identify which data points are present in the presentation and which are missing.
3. Calculate the score from the available data, stating whether it is partial or complete.
4. State the interpretation and risk category for the calculated score.
5. Note any missing data that would change the score or the interpretation.
6. If a rule does not apply, briefly explain why.";

fn chars(s: &str) -> usize {
    s.chars().count()
}

/// Characters taken by `parts` once joined with newlines.
fn joined_len(parts: &[&str]) -> usize {
    parts.iter().map(|p| chars(p)).sum::<usize>() + parts.len().saturating_sub(1)
}

/// Characters the block uses before any rule definition is admitted.
pub fn fixed_overhead(catalog_index: &str) -> usize {
    joined_len(&[PREAMBLE, CATALOG_HEADER, catalog_index, DEFINITIONS_HEADER, INSTRUCTIONS])
}

/// Build the context block.
///
/// `candidates` must already be in priority order; this never reorders
/// them. Each rule definition is admitted if it still fits the remaining
/// budget; one that does not is skipped and later, smaller ones are still
/// tried. The fixed parts are never truncated, so the result can exceed
/// `max_chars` only when the fixed parts alone do.
///
/// Returns an empty string when `catalog_index` is empty.
pub fn assemble<'a>(
    candidates: impl IntoIterator<Item = &'a Rule>,
    catalog_index: &str,
    max_chars: usize,
) -> String {
    if catalog_index.is_empty() {
        return String::new();
    }

    let mut parts: Vec<String> = vec![
        PREAMBLE.to_string(),
        CATALOG_HEADER.to_string(),
        catalog_index.to_string(),
    ];

    let candidates: Vec<&Rule> = candidates
        .into_iter()
        .filter(|r| !r.full_text.is_empty())
        .collect();
    if candidates.is_empty() {
        parts.push(FALLBACK.to_string());
        return parts.join("\n");
    }

    let mut remaining = max_chars.saturating_sub(fixed_overhead(catalog_index));
    let mut admitted = Vec::new();
    for rule in candidates {
        let block = rule.block();
        // One newline joins the block to what precedes it.
        let cost = chars(&block) + 1;
        if cost <= remaining {
            remaining -= cost;
            admitted.push(block);
        } else {
            debug!(rule = %rule.name, cost, remaining, "rule definition does not fit, skipped");
        }
    }

    parts.push(DEFINITIONS_HEADER.to_string());
    parts.extend(admitted);
    parts.push(INSTRUCTIONS.to_string());
    parts.join("\n")
}
