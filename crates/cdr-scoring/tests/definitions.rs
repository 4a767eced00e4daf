use std::collections::BTreeMap;

use cdr_scoring::schema::{
    Component, ComponentSource, ComponentType, ProcedureStep, ScoreBand, Scoring, StepCondition,
    StructuredRule,
};
use cdr_scoring::validate::{
    reachable_totals, total_domain, validate_definition, DefinitionError,
};
use cdr_scoring::{all_rules, get_rule};

fn rule_with(components: Vec<Component>, scoring: Scoring) -> StructuredRule {
    StructuredRule {
        id: "draft".to_string(),
        name: "Draft".to_string(),
        full_name: "Draft".to_string(),
        category: "TRAUMA".to_string(),
        application: String::new(),
        applicable_chief_complaints: Vec::new(),
        keywords: Vec::new(),
        required_tests: Vec::new(),
        components,
        scoring,
        suggested_treatments: BTreeMap::new(),
    }
}

#[test]
fn builtin_rules_are_valid() {
    for rule in all_rules() {
        let errors = rule.validate_definition();
        assert!(errors.is_empty(), "{}: {errors:?}", rule.id());
    }
}

#[test]
fn builtin_rule_ids_are_unique_and_resolvable() {
    let rules = all_rules();
    for rule in &rules {
        assert_eq!(get_rule(rule.id()).unwrap().name(), rule.name());
    }
    let mut ids: Vec<&str> = rules.iter().map(|r| r.id()).collect();
    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), rules.len());
    assert!(get_rule("alvarado").is_err());
}

#[test]
fn treatments_are_keyed_by_declared_risk_labels() {
    for rule in all_rules() {
        let definition = rule.definition();
        let risks: Vec<&str> = match &definition.scoring {
            Scoring::Sum { ranges } | Scoring::Threshold { ranges } => {
                ranges.iter().map(|b| b.risk.as_str()).collect()
            }
            Scoring::Algorithm { steps } => steps.iter().map(|s| s.risk.as_str()).collect(),
        };
        for key in definition.suggested_treatments.keys() {
            assert!(risks.contains(&key.as_str()), "{}: {key}", definition.id);
        }
    }
}

#[test]
fn total_domain_sums_component_extremes() {
    let heart = get_rule("heart").unwrap();
    assert_eq!(total_domain(heart.definition()), (0.0, 10.0));
    let perc = get_rule("perc").unwrap();
    assert_eq!(total_domain(perc.definition()), (0.0, 8.0));
}

#[test]
fn overlapping_and_gapped_bands_are_reported() {
    let overlapping = rule_with(
        vec![Component::number_range("x", "X", 0.0, 10.0)],
        Scoring::Sum {
            ranges: vec![
                ScoreBand::new(0.0, 4.0, "Low", ""),
                ScoreBand::new(4.0, 10.0, "High", ""),
            ],
        },
    );
    assert!(matches!(
        validate_definition(&overlapping).as_slice(),
        [DefinitionError::OverlappingBands { .. }]
    ));

    let gapped = rule_with(
        vec![Component::number_range("x", "X", 0.0, 10.0)],
        Scoring::Sum {
            ranges: vec![
                ScoreBand::new(0.0, 3.0, "Low", ""),
                ScoreBand::new(6.0, 10.0, "High", ""),
            ],
        },
    );
    assert!(matches!(
        validate_definition(&gapped).as_slice(),
        [DefinitionError::BandGap { .. }]
    ));
}

#[test]
fn fractional_weights_landing_between_bands_are_a_gap() {
    let rule = rule_with(
        vec![
            Component::boolean("a", "A", 1.5),
            Component::boolean("b", "B", 1.5),
        ],
        Scoring::Sum {
            ranges: vec![
                ScoreBand::new(0.0, 1.0, "Low", ""),
                ScoreBand::new(2.0, 3.0, "High", ""),
            ],
        },
    );
    assert_eq!(reachable_totals(&rule), Some(vec![0.0, 1.5, 3.0]));
    assert!(matches!(
        validate_definition(&rule).as_slice(),
        [DefinitionError::BandGap { lower, upper, .. }] if lower == "Low" && upper == "High"
    ));
}

#[test]
fn gap_no_total_can_reach_is_accepted() {
    let rule = rule_with(
        vec![
            Component::boolean("a", "A", 2.0),
            Component::boolean("b", "B", 2.0),
        ],
        Scoring::Sum {
            ranges: vec![
                ScoreBand::new(0.0, 0.0, "Low", ""),
                ScoreBand::new(2.0, 4.0, "High", ""),
            ],
        },
    );
    assert!(validate_definition(&rule).is_empty());
}

#[test]
fn reachable_totals_of_builtin_rules() {
    let wells = get_rule("wells_pe").unwrap();
    let totals = reachable_totals(wells.definition()).unwrap();
    assert!(totals.iter().all(|t| (t * 2.0).fract() == 0.0));
    assert_eq!(totals.first(), Some(&0.0));
    assert_eq!(totals.last(), Some(&12.5));

    let perc = get_rule("perc").unwrap();
    assert_eq!(reachable_totals(perc.definition()).unwrap().len(), 9);

    let continuous = rule_with(
        vec![Component::number_range("x", "X", 0.0, 10.0)],
        Scoring::Sum { ranges: Vec::new() },
    );
    assert_eq!(reachable_totals(&continuous), None);
}

#[test]
fn bands_must_cover_every_achievable_total() {
    let rule = rule_with(
        vec![
            Component::boolean("a", "A", 2.0),
            Component::boolean("b", "B", 3.0),
        ],
        Scoring::Sum {
            ranges: vec![ScoreBand::new(0.0, 4.0, "Low", "")],
        },
    );
    let errors = validate_definition(&rule);
    assert!(errors.iter().any(|e| matches!(
        e,
        DefinitionError::UncoveredTotals { max, covered_max, .. } if *max == 5.0 && *covered_max == 4.0
    )));
}

#[test]
fn component_shape_problems_are_reported() {
    let mut bad_range = Component::number_range("x", "X", 5.0, 1.0);
    bad_range.source = ComponentSource::Section2;
    let mut unbounded = Component::number_range("y", "Y", 0.0, 1.0);
    unbounded.max = None;
    let rule = rule_with(
        vec![
            Component::select("s", "S", &[]),
            bad_range,
            unbounded,
            Component::boolean("s", "Duplicate", 1.0),
        ],
        Scoring::Sum {
            ranges: vec![ScoreBand::new(-100.0, 100.0, "Any", "")],
        },
    );
    let errors = validate_definition(&rule);
    assert!(errors.iter().any(|e| matches!(e, DefinitionError::MissingOptions { .. })));
    assert!(errors.iter().any(|e| matches!(e, DefinitionError::InvertedBounds { .. })));
    assert!(errors.iter().any(|e| matches!(e, DefinitionError::MissingBounds { .. })));
    assert!(errors.iter().any(|e| matches!(e, DefinitionError::DuplicateComponent { .. })));
}

#[test]
fn algorithm_steps_are_checked() {
    let rule = rule_with(
        vec![Component::criterion("a", "A")],
        Scoring::Algorithm {
            steps: vec![
                ProcedureStep::new(StepCondition::any_of(&["a", "zzz"]), "One", ""),
                ProcedureStep::new(StepCondition::at_least(3, &["a"]), "Two", ""),
                ProcedureStep::new(StepCondition::Always, "Else", ""),
                ProcedureStep::new(StepCondition::any_of(&["a"]), "Never", ""),
            ],
        },
    );
    let errors = validate_definition(&rule);
    assert!(errors.contains(&DefinitionError::UnknownStepComponent {
        rule: "draft".to_string(),
        step: 0,
        component: "zzz".to_string(),
    }));
    assert!(errors.iter().any(|e| matches!(e, DefinitionError::UnsatisfiableStep { step: 1, .. })));
    assert!(errors.contains(&DefinitionError::UnreachableStep {
        rule: "draft".to_string(),
        step: 3,
    }));

    let empty = rule_with(Vec::new(), Scoring::Algorithm { steps: Vec::new() });
    assert!(matches!(
        validate_definition(&empty).as_slice(),
        [DefinitionError::Empty { .. }]
    ));
}

#[test]
fn document_json_uses_camel_case_and_method_tags() {
    let perc = get_rule("perc").unwrap();
    let json = serde_json::to_value(perc.definition()).unwrap();
    assert_eq!(json["fullName"], "Pulmonary Embolism Rule-out Criteria");
    assert_eq!(json["scoring"]["method"], "threshold");
    assert_eq!(json["components"][0]["type"], "boolean");
    assert_eq!(json["components"][0]["source"], "section1");
    assert!(json["applicableChiefComplaints"].is_array());
}

#[test]
fn legacy_algorithm_ranges_become_ordered_steps() {
    let json = serde_json::json!({
        "id": "legacy",
        "name": "Legacy",
        "fullName": "Legacy Rule",
        "category": "TRAUMA",
        "application": "",
        "applicableChiefComplaints": [],
        "keywords": [],
        "components": [
            { "id": "a", "label": "A", "type": "boolean", "value": 2, "source": "user_input" }
        ],
        "scoring": {
            "method": "algorithm",
            "ranges": [
                { "min": 2, "max": 2, "risk": "High", "interpretation": "step one" },
                { "min": 0, "max": 2, "risk": "Low", "interpretation": "step two" }
            ]
        }
    });
    let rule: StructuredRule = serde_json::from_value(json).unwrap();
    let Scoring::Algorithm { steps } = &rule.scoring else {
        panic!("expected algorithm scoring");
    };
    assert_eq!(steps.len(), 2);
    assert_eq!(
        steps[0].condition,
        StepCondition::TotalBetween { min: 2.0, max: 2.0 }
    );
    assert_eq!(rule.components[0].kind, ComponentType::Boolean);
    assert!(rule.suggested_treatments.is_empty());
}

#[test]
fn legacy_sum_shape_reads_unchanged() {
    let scoring: serde_json::Value = serde_json::json!({
        "method": "sum",
        "ranges": [{ "min": 0, "max": 3, "risk": "Low", "interpretation": "" }]
    });
    let parsed: Scoring = serde_json::from_value(scoring).unwrap();
    assert_eq!(
        parsed,
        Scoring::Sum {
            ranges: vec![ScoreBand::new(0.0, 3.0, "Low", "")]
        }
    );
}
