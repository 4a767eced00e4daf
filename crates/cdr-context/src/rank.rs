//! Candidate selection for a presentation.
//!
//! A narrative rule scores one point per keyword it shares with the
//! presentation text. Rules with a structured definition whose applicable
//! chief complaints match the presentation's chief complaint get
//! [`COMPLAINT_BOOST`] on top. Equal scores keep catalog order.

use std::collections::BTreeSet;

use cdr_core::models::presentation::Presentation;
use cdr_core::models::rule::Rule;
use cdr_corpus::keywords::{self, APPLICATION_MIN_EXCLUSIVE};
use cdr_corpus::Catalog;
use cdr_scoring::schema::StructuredRule;

pub const COMPLAINT_BOOST: usize = 5;

pub const DEFAULT_LIMIT: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ranked<'a> {
    pub rule: &'a Rule,
    pub score: usize,
}

/// Whether a listed complaint and the presented one name the same thing.
fn complaint_matches(listed: &str, presented: &str) -> bool {
    let listed = listed.trim().to_lowercase();
    !listed.is_empty() && (presented.contains(&listed) || listed.contains(presented))
}

/// Narrative rules whose structured definition lists the presented
/// complaint, by catalog id.
fn boosted_ids(
    catalog: &Catalog,
    presentation: &Presentation,
    structured: &[&StructuredRule],
) -> BTreeSet<String> {
    let presented = presentation.chief_complaint.trim().to_lowercase();
    if presented.is_empty() {
        return BTreeSet::new();
    }
    structured
        .iter()
        .filter(|s| {
            s.applicable_chief_complaints
                .iter()
                .any(|c| complaint_matches(c, &presented))
        })
        .filter_map(|s| {
            catalog
                .get(&s.id)
                .or_else(|| catalog.get(&s.name))
                .or_else(|| catalog.get(&s.full_name))
        })
        .map(|r| r.id.clone())
        .collect()
}

/// Rank catalog rules for `presentation`, best first, dropping rules that
/// score zero and keeping at most `limit`.
pub fn rank<'a>(
    catalog: &'a Catalog,
    presentation: &Presentation,
    structured: &[&StructuredRule],
    limit: usize,
) -> Vec<Ranked<'a>> {
    let terms = keywords::extract(&presentation.text(), APPLICATION_MIN_EXCLUSIVE);
    let boosted = boosted_ids(catalog, presentation, structured);

    let mut ranked: Vec<Ranked<'a>> = catalog
        .rules()
        .map(|rule| {
            let overlap = rule.keywords.intersection(&terms).count();
            let boost = if boosted.contains(&rule.id) {
                COMPLAINT_BOOST
            } else {
                0
            };
            Ranked {
                rule,
                score: overlap + boost,
            }
        })
        .filter(|r| r.score > 0)
        .collect();

    // Stable, so ties stay in catalog order.
    ranked.sort_by(|a, b| b.score.cmp(&a.score));
    ranked.truncate(limit);
    ranked
}
