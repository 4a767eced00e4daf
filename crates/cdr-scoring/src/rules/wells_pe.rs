use std::collections::BTreeMap;
use std::sync::LazyLock;

use crate::schema::{Component, ComponentSource, ScoreBand, Scoring, StructuredRule};
use crate::DecisionRule;

/// Wells' Criteria for pulmonary embolism, three-tier model.
/// Seven weighted criteria. Total 0–12.5 in half-point steps.
pub struct WellsPe;

impl DecisionRule for WellsPe {
    fn definition(&self) -> &StructuredRule {
        static RULE: LazyLock<StructuredRule> = LazyLock::new(|| StructuredRule {
            id: "wells_pe".to_string(),
            name: "Wells' Criteria for PE".to_string(),
            full_name: "Wells' Criteria for Pulmonary Embolism".to_string(),
            category: "PULMONARY".to_string(),
            application: "Estimates pretest probability of pulmonary embolism.".to_string(),
            applicable_chief_complaints: vec![
                "shortness of breath".to_string(),
                "dyspnea".to_string(),
                "pleuritic chest pain".to_string(),
                "hemoptysis".to_string(),
            ],
            keywords: ["wells", "pulmonary", "embolism", "pe", "dvt", "d-dimer"]
                .map(String::from)
                .to_vec(),
            required_tests: Vec::new(),
            components: vec![
                Component::boolean("dvt_signs", "Clinical signs and symptoms of DVT", 3.0)
                    .from_source(ComponentSource::Section2),
                Component::boolean(
                    "pe_most_likely",
                    "PE is the #1 diagnosis or equally likely",
                    3.0,
                ),
                Component::boolean("heart_rate_over_100", "Heart rate > 100", 1.5)
                    .from_source(ComponentSource::Section2)
                    .auto_populate("vitals.heart_rate"),
                Component::boolean(
                    "immobilization_or_surgery",
                    "Immobilization at least 3 days or surgery in the previous 4 weeks",
                    1.5,
                )
                .from_source(ComponentSource::Section1),
                Component::boolean("previous_dvt_pe", "Previously diagnosed PE or DVT", 1.5)
                    .from_source(ComponentSource::Section1),
                Component::boolean("hemoptysis", "Hemoptysis", 1.0)
                    .from_source(ComponentSource::Section1),
                Component::boolean(
                    "malignancy",
                    "Malignancy with treatment within 6 months or palliative",
                    1.0,
                )
                .from_source(ComponentSource::Section1),
            ],
            scoring: Scoring::Sum {
                ranges: vec![
                    ScoreBand::new(0.0, 1.5, "Low", "1.3% prevalence of PE in the emergency department."),
                    ScoreBand::new(2.0, 6.0, "Moderate", "16.2% prevalence of PE."),
                    ScoreBand::new(6.5, 12.5, "High", "37.5% prevalence of PE."),
                ],
            },
            suggested_treatments: BTreeMap::from([
                (
                    "Low".to_string(),
                    vec!["Apply PERC; if any criterion is positive, obtain D-dimer".to_string()],
                ),
                (
                    "Moderate".to_string(),
                    vec!["Obtain high-sensitivity D-dimer; CT pulmonary angiography if positive".to_string()],
                ),
                (
                    "High".to_string(),
                    vec![
                        "CT pulmonary angiography".to_string(),
                        "Consider empiric anticoagulation if no contraindication".to_string(),
                    ],
                ),
            ]),
        });
        &RULE
    }
}
