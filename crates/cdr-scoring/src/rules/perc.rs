use std::collections::BTreeMap;
use std::sync::LazyLock;

use crate::schema::{Component, ComponentSource, ScoreBand, Scoring, StructuredRule};
use crate::DecisionRule;

/// PERC Rule for pulmonary embolism. Eight criteria; any one present means
/// PE cannot be ruled out by the rule.
pub struct Perc;

impl DecisionRule for Perc {
    fn definition(&self) -> &StructuredRule {
        static RULE: LazyLock<StructuredRule> = LazyLock::new(|| {
            let criteria = [
                ("age_50", "Age >= 50", ComponentSource::Section1),
                ("heart_rate_100", "Heart rate >= 100", ComponentSource::Section2),
                ("sao2_below_95", "SaO2 on room air < 95%", ComponentSource::Section2),
                ("unilateral_leg_swelling", "Unilateral leg swelling", ComponentSource::Section2),
                ("hemoptysis", "Hemoptysis", ComponentSource::Section1),
                (
                    "recent_surgery_or_trauma",
                    "Surgery or trauma within 4 weeks requiring general anesthesia",
                    ComponentSource::Section1,
                ),
                ("prior_pe_dvt", "Prior PE or DVT", ComponentSource::Section1),
                ("hormone_use", "Hormone use", ComponentSource::Section1),
            ];

            StructuredRule {
                id: "perc".to_string(),
                name: "PERC Rule".to_string(),
                full_name: "Pulmonary Embolism Rule-out Criteria".to_string(),
                category: "PULMONARY".to_string(),
                application: "Rules out PE in patients with low pretest probability \
                              without further testing."
                    .to_string(),
                applicable_chief_complaints: vec![
                    "shortness of breath".to_string(),
                    "pleuritic chest pain".to_string(),
                    "chest pain".to_string(),
                ],
                keywords: ["perc", "pulmonary", "embolism", "rule-out", "d-dimer"]
                    .map(String::from)
                    .to_vec(),
                required_tests: vec!["Pulse oximetry".to_string()],
                components: criteria
                    .iter()
                    .map(|(id, label, source)| Component::boolean(id, label, 1.0).from_source(*source))
                    .collect(),
                scoring: Scoring::Threshold {
                    ranges: vec![
                        ScoreBand::new(
                            0.0,
                            0.0,
                            "PERC negative",
                            "No criteria present. With low pretest probability (< 15%), PE is ruled out without further testing.",
                        ),
                        ScoreBand::new(
                            1.0,
                            8.0,
                            "PERC positive",
                            "At least one criterion present. PE cannot be ruled out by PERC.",
                        ),
                    ],
                },
                suggested_treatments: BTreeMap::from([(
                    "PERC positive".to_string(),
                    vec!["Obtain D-dimer or proceed per Wells risk".to_string()],
                )]),
            }
        });
        &RULE
    }
}
