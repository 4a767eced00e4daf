use std::collections::BTreeMap;
use std::sync::LazyLock;

use crate::schema::{
    Component, ComponentSource, ProcedureStep, Scoring, StepCondition, StructuredRule,
};
use crate::DecisionRule;

const HIGH_RISK: [&str; 5] = [
    "gcs_below_15_at_2h",
    "suspected_skull_fracture",
    "basal_skull_fracture_signs",
    "vomiting_twice",
    "age_65",
];

const MEDIUM_RISK: [&str; 2] = ["retrograde_amnesia_30min", "dangerous_mechanism"];

/// Canadian CT Head Rule. Walked as a procedure: any high-risk finding
/// requires CT, otherwise any medium-risk finding recommends it.
pub struct CanadianCtHead;

impl DecisionRule for CanadianCtHead {
    fn definition(&self) -> &StructuredRule {
        static RULE: LazyLock<StructuredRule> = LazyLock::new(|| StructuredRule {
            id: "canadian_ct_head".to_string(),
            name: "Canadian CT Head Rule".to_string(),
            full_name: "Canadian CT Head Injury/Trauma Rule".to_string(),
            category: "TRAUMA".to_string(),
            application: "Determines if CT is needed in patients with minor head injury."
                .to_string(),
            applicable_chief_complaints: vec![
                "head injury".to_string(),
                "head trauma".to_string(),
                "fall".to_string(),
                "loss of consciousness".to_string(),
            ],
            keywords: ["head", "injury", "trauma", "imaging", "concussion", "gcs"]
                .map(String::from)
                .to_vec(),
            required_tests: Vec::new(),
            components: vec![
                Component::criterion("gcs_below_15_at_2h", "GCS < 15 at 2 hours after injury")
                    .from_source(ComponentSource::Section2),
                Component::criterion("suspected_skull_fracture", "Suspected open or depressed skull fracture")
                    .from_source(ComponentSource::Section2),
                Component::criterion(
                    "basal_skull_fracture_signs",
                    "Any sign of basal skull fracture",
                )
                .from_source(ComponentSource::Section2),
                Component::criterion("vomiting_twice", "Vomiting >= 2 episodes")
                    .from_source(ComponentSource::Section1),
                Component::criterion("age_65", "Age >= 65")
                    .from_source(ComponentSource::Section1)
                    .auto_populate("patient.age"),
                Component::criterion(
                    "retrograde_amnesia_30min",
                    "Retrograde amnesia to the event >= 30 minutes",
                )
                .from_source(ComponentSource::Section1),
                Component::criterion("dangerous_mechanism", "Dangerous mechanism of injury")
                    .from_source(ComponentSource::Section1),
            ],
            scoring: Scoring::Algorithm {
                steps: vec![
                    ProcedureStep::new(
                        StepCondition::any_of(&HIGH_RISK),
                        "High",
                        "CT head required: high risk for neurosurgical intervention.",
                    ),
                    ProcedureStep::new(
                        StepCondition::any_of(&MEDIUM_RISK),
                        "Medium",
                        "CT head recommended: medium risk for brain injury on CT.",
                    ),
                    ProcedureStep::new(
                        StepCondition::Always,
                        "Low",
                        "No high- or medium-risk findings: CT head not required by the rule.",
                    ),
                ],
            },
            suggested_treatments: BTreeMap::from([
                ("High".to_string(), vec!["Non-contrast CT head".to_string()]),
                (
                    "Medium".to_string(),
                    vec!["Non-contrast CT head, or observation per local protocol".to_string()],
                ),
                (
                    "Low".to_string(),
                    vec!["Discharge with head injury return precautions".to_string()],
                ),
            ]),
        });
        &RULE
    }
}
