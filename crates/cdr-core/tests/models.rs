use cdr_core::models::presentation::Presentation;
use cdr_core::models::rule::{slugify, Rule};
use cdr_core::s3_keys;

#[test]
fn slugify_collapses_punctuation_and_case() {
    assert_eq!(slugify("HEART Score"), "heart_score");
    assert_eq!(slugify("Wells' Criteria for PE"), "wells_criteria_for_pe");
    assert_eq!(slugify("  CURB-65 "), "curb_65");
    assert_eq!(slugify("---"), "");
}

#[test]
fn rule_block_wraps_full_text() {
    let rule = Rule {
        id: "heart_score".to_string(),
        name: "HEART Score".to_string(),
        category: "CARDIOVASCULAR".to_string(),
        full_text: "## HEART Score\nbody".to_string(),
        application: String::new(),
        keywords: Default::default(),
    };
    assert_eq!(
        rule.block(),
        "--- HEART Score (CARDIOVASCULAR) ---\n## HEART Score\nbody\n"
    );
}

#[test]
fn presentation_text_joins_complaint_and_narrative() {
    assert_eq!(Presentation::new("chest pain").text(), "chest pain");
    let p = Presentation::new("chest pain").with_narrative("diaphoretic, 58 yo");
    assert_eq!(p.text(), "chest pain diaphoretic, 58 yo");
}

#[test]
fn rule_keys_round_trip_through_prefix() {
    let key = s3_keys::rule_definition("heart").unwrap();
    assert_eq!(key, "rules/heart.json");
    assert_eq!(s3_keys::rule_id_from_key(&key), Some("heart"));
    assert_eq!(s3_keys::rule_id_from_key("corpus/cdr-corpus.md"), None);
}

#[test]
fn rule_keys_reject_unsafe_ids() {
    assert!(s3_keys::rule_definition("../etc").is_err());
    assert!(s3_keys::rule_definition("").is_err());
    assert!(s3_keys::rule_definition("Heart").is_err());
}

#[test]
fn narrative_rule_json_is_camel_case_and_application_optional() {
    let json = serde_json::json!({
        "id": "nexus_criteria",
        "name": "NEXUS Criteria",
        "category": "TRAUMA",
        "fullText": "## NEXUS Criteria",
        "keywords": ["nexus", "criteria"]
    });
    let rule: Rule = serde_json::from_value(json).unwrap();
    assert_eq!(rule.full_text, "## NEXUS Criteria");
    assert!(rule.application.is_empty());
    assert_eq!(rule.keywords.len(), 2);

    let presentation: Presentation =
        serde_json::from_value(serde_json::json!({ "chiefComplaint": "neck pain" })).unwrap();
    assert_eq!(presentation.text(), "neck pain");
}
