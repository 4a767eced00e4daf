use cdr_context::rank::{rank, COMPLAINT_BOOST, DEFAULT_LIMIT};
use cdr_context::assemble;
use cdr_core::models::presentation::Presentation;
use cdr_corpus::parse;
use cdr_scoring::get_rule;

const FIXTURE: &str = include_str!("fixtures/corpus.md");

fn embolism_presentation() -> Presentation {
    Presentation::new("chest pain").with_narrative("pleuritic pain, suspected pulmonary embolism")
}

#[test]
fn keyword_overlap_ranks_and_ties_keep_catalog_order() {
    let catalog = parse(FIXTURE);
    let ranked = rank(&catalog, &embolism_presentation(), &[], DEFAULT_LIMIT);

    let ids: Vec<&str> = ranked.iter().map(|r| r.rule.id.as_str()).collect();
    assert_eq!(ids, ["heart_score", "wells_criteria_for_pe", "perc_rule"]);
    assert!(ranked.iter().all(|r| r.score == 2));
}

#[test]
fn matching_chief_complaint_boosts_structured_rules() {
    let catalog = parse(FIXTURE);
    let perc = get_rule("perc").unwrap();
    let ranked = rank(
        &catalog,
        &embolism_presentation(),
        &[perc.definition()],
        DEFAULT_LIMIT,
    );

    assert_eq!(ranked[0].rule.id, "perc_rule");
    assert_eq!(ranked[0].score, 2 + COMPLAINT_BOOST);
    assert_eq!(ranked[1].rule.id, "heart_score");
}

#[test]
fn unrelated_complaint_gets_no_boost() {
    let catalog = parse(FIXTURE);
    let heart = get_rule("heart").unwrap();
    let ranked = rank(
        &catalog,
        &Presentation::new("minor head injury"),
        &[heart.definition()],
        DEFAULT_LIMIT,
    );
    let ids: Vec<&str> = ranked.iter().map(|r| r.rule.id.as_str()).collect();
    assert_eq!(ids, ["canadian_ct_head_rule"]);
}

#[test]
fn zero_scores_dropped_and_limit_applied() {
    let catalog = parse(FIXTURE);
    assert!(rank(&catalog, &Presentation::new("toothache"), &[], DEFAULT_LIMIT).is_empty());

    let ranked = rank(&catalog, &embolism_presentation(), &[], 2);
    assert_eq!(ranked.len(), 2);
}

#[test]
fn ranked_rules_feed_the_assembler_in_rank_order() {
    let catalog = parse(FIXTURE);
    let perc = get_rule("perc").unwrap();
    let ranked = rank(&catalog, &embolism_presentation(), &[perc.definition()], 2);

    let block = assemble(ranked.iter().map(|r| r.rule), &catalog.index(), 16_000);
    let perc_at = block.find("--- PERC Rule (PULMONARY) ---").unwrap();
    let heart_at = block.find("--- HEART Score (CARDIOVASCULAR) ---").unwrap();
    assert!(perc_at < heart_at);
    assert!(!block.contains("--- Wells' Criteria for PE"));
}
