use std::collections::BTreeMap;
use std::sync::LazyLock;

use crate::schema::{Component, ComponentSource, ScoreBand, Scoring, StructuredRule};
use crate::DecisionRule;

/// CURB-65 severity score for community-acquired pneumonia.
/// Five criteria, one point each. Total 0–5.
pub struct Curb65;

impl DecisionRule for Curb65 {
    fn definition(&self) -> &StructuredRule {
        static RULE: LazyLock<StructuredRule> = LazyLock::new(|| {
            let criteria = [
                ("confusion", "Confusion", ComponentSource::Section2),
                ("bun_over_19", "BUN > 19 mg/dL (> 7 mmol/L urea)", ComponentSource::Section2),
                ("respiratory_rate_30", "Respiratory rate >= 30", ComponentSource::Section2),
                (
                    "low_blood_pressure",
                    "Systolic BP < 90 mmHg or diastolic BP <= 60 mmHg",
                    ComponentSource::Section2,
                ),
                ("age_65", "Age >= 65", ComponentSource::Section1),
            ];

            StructuredRule {
                id: "curb65".to_string(),
                name: "CURB-65".to_string(),
                full_name: "CURB-65 Score for Pneumonia Severity".to_string(),
                category: "INFECTIOUS DISEASE".to_string(),
                application: "Estimates mortality of community-acquired pneumonia to help \
                              determine inpatient vs. outpatient treatment."
                    .to_string(),
                applicable_chief_complaints: vec![
                    "cough".to_string(),
                    "fever".to_string(),
                    "pneumonia".to_string(),
                    "shortness of breath".to_string(),
                ],
                keywords: ["curb", "pneumonia", "cap", "mortality", "admission"]
                    .map(String::from)
                    .to_vec(),
                required_tests: vec!["BUN".to_string()],
                components: criteria
                    .iter()
                    .map(|(id, label, source)| Component::boolean(id, label, 1.0).from_source(*source))
                    .collect(),
                scoring: Scoring::Sum {
                    ranges: vec![
                        ScoreBand::new(0.0, 1.0, "Low", "0.6-2.7% 30-day mortality."),
                        ScoreBand::new(2.0, 2.0, "Moderate", "6.8% 30-day mortality."),
                        ScoreBand::new(3.0, 5.0, "High", "14-27.8% 30-day mortality."),
                    ],
                },
                suggested_treatments: BTreeMap::from([
                    ("Low".to_string(), vec!["Consider outpatient treatment".to_string()]),
                    (
                        "Moderate".to_string(),
                        vec!["Consider short inpatient stay or closely supervised outpatient treatment".to_string()],
                    ),
                    (
                        "High".to_string(),
                        vec![
                            "Admit; manage as severe pneumonia".to_string(),
                            "Assess for ICU admission, especially with a score of 4-5".to_string(),
                        ],
                    ),
                ]),
            }
        });
        &RULE
    }
}
