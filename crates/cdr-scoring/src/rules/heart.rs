use std::collections::BTreeMap;
use std::sync::LazyLock;

use crate::schema::{Component, ComponentSource, ScoreBand, Scoring, StructuredRule};
use crate::DecisionRule;

/// HEART Score for major adverse cardiac events.
/// Five criteria scored 0–2 each. Total 0–10.
pub struct Heart;

impl DecisionRule for Heart {
    fn definition(&self) -> &StructuredRule {
        static RULE: LazyLock<StructuredRule> = LazyLock::new(|| StructuredRule {
            id: "heart".to_string(),
            name: "HEART Score".to_string(),
            full_name: "HEART Score for Major Cardiac Events".to_string(),
            category: "CARDIOVASCULAR".to_string(),
            application: "Predicts 6-week risk of major adverse cardiac events in patients \
                          presenting with chest pain."
                .to_string(),
            applicable_chief_complaints: vec![
                "chest pain".to_string(),
                "chest pressure".to_string(),
                "angina".to_string(),
            ],
            keywords: ["heart", "mace", "acs", "troponin", "chest", "cardiac"]
                .map(String::from)
                .to_vec(),
            required_tests: vec!["ECG".to_string(), "Troponin".to_string()],
            components: vec![
                Component::select(
                    "history",
                    "History",
                    &[
                        ("Slightly suspicious", 0.0),
                        ("Moderately suspicious", 1.0),
                        ("Highly suspicious", 2.0),
                    ],
                )
                .from_source(ComponentSource::Section1),
                Component::select(
                    "ecg",
                    "EKG",
                    &[
                        ("Normal", 0.0),
                        ("Non-specific repolarization disturbance", 1.0),
                        ("Significant ST deviation", 2.0),
                    ],
                )
                .from_source(ComponentSource::Section2),
                Component::select(
                    "age",
                    "Age",
                    &[("<45", 0.0), ("45-64", 1.0), (">=65", 2.0)],
                )
                .from_source(ComponentSource::Section1)
                .auto_populate("patient.age"),
                Component::select(
                    "risk_factors",
                    "Risk factors",
                    &[
                        ("No known risk factors", 0.0),
                        ("1-2 risk factors", 1.0),
                        (">=3 risk factors or history of atherosclerotic disease", 2.0),
                    ],
                )
                .from_source(ComponentSource::Section1),
                Component::select(
                    "troponin",
                    "Initial troponin",
                    &[
                        ("<=normal limit", 0.0),
                        ("1-3x normal limit", 1.0),
                        (">3x normal limit", 2.0),
                    ],
                )
                .from_source(ComponentSource::Section2),
            ],
            scoring: Scoring::Sum {
                ranges: vec![
                    ScoreBand::new(0.0, 3.0, "Low", "0.9-1.7% risk of MACE at 6 weeks."),
                    ScoreBand::new(4.0, 6.0, "Moderate", "12-16.6% risk of MACE at 6 weeks."),
                    ScoreBand::new(7.0, 10.0, "High", "50-65% risk of MACE at 6 weeks."),
                ],
            },
            suggested_treatments: BTreeMap::from([
                (
                    "Low".to_string(),
                    vec!["Consider discharge with outpatient follow-up".to_string()],
                ),
                (
                    "Moderate".to_string(),
                    vec![
                        "Admit for observation and serial troponins".to_string(),
                        "Consider non-invasive cardiac testing".to_string(),
                    ],
                ),
                (
                    "High".to_string(),
                    vec![
                        "Early invasive strategy".to_string(),
                        "Cardiology consultation".to_string(),
                    ],
                ),
            ]),
        });
        &RULE
    }
}
