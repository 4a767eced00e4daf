//! cdr-scoring
//!
//! Structured decision rule definitions and their evaluation. Pure data and
//! arithmetic with no I/O. A rule lists scored components and a scoring method;
//! evaluating it turns supplied component values into a total, a risk label,
//! an interpretation, and suggested actions.

pub mod error;
pub mod evaluate;
pub mod legacy;
pub mod rules;
pub mod schema;
pub mod validate;

use error::{InputError, ScoringError};
use evaluate::Evaluation;
use schema::{Inputs, Scoring, StructuredRule};
use validate::DefinitionError;

/// Trait implemented by each authored decision rule.
pub trait DecisionRule: Send + Sync {
    /// The full structured definition.
    fn definition(&self) -> &StructuredRule;

    /// Unique identifier (e.g., "heart", "wells_pe").
    fn id(&self) -> &str {
        &self.definition().id
    }

    /// Human-readable name (e.g., "HEART Score").
    fn name(&self) -> &str {
        &self.definition().name
    }

    fn evaluate(&self, inputs: &Inputs) -> Result<Evaluation, ScoringError> {
        evaluate::evaluate(self.definition(), inputs)
    }

    fn validate_inputs(&self, inputs: &Inputs) -> Vec<InputError> {
        evaluate::validate_inputs(self.definition(), inputs)
    }

    fn validate_definition(&self) -> Vec<DefinitionError> {
        validate::validate_definition(self.definition())
    }

    /// Format supplied values and their evaluation as text for a prompt.
    fn to_structured_input(&self, inputs: &Inputs, evaluation: &Evaluation) -> String {
        let rule = self.definition();
        let mut output = format!("## {}\n\n", rule.full_name);
        for component in &rule.components {
            match inputs.get(&component.id) {
                Some(value) => output.push_str(&format!("- {}: {}\n", component.label, value)),
                None => output.push_str(&format!("- {}: not provided\n", component.label)),
            }
        }

        let method = match rule.scoring {
            Scoring::Sum { .. } => "Total score",
            Scoring::Threshold { .. } => "Criteria present",
            Scoring::Algorithm { .. } => "Points",
        };
        output.push_str(&format!("\n{method}: {}\n", evaluation.total));
        output.push_str(&format!("Risk: {}", evaluation.risk));
        if evaluation.clamped {
            output.push_str(" (total outside the published ranges; nearest range used)");
        }
        output.push('\n');
        output.push_str(&format!("Interpretation: {}\n", evaluation.interpretation));

        if !evaluation.missing.is_empty() {
            output.push_str(&format!(
                "Missing: {} of {} criteria not provided\n",
                evaluation.missing.len(),
                rule.components.len()
            ));
        }
        if !evaluation.treatments.is_empty() {
            output.push_str("Suggested actions:\n");
            for action in &evaluation.treatments {
                output.push_str(&format!("- {action}\n"));
            }
        }
        output
    }
}

/// Definitions loaded from the document store score the same way as the
/// built-in ones.
impl DecisionRule for StructuredRule {
    fn definition(&self) -> &StructuredRule {
        self
    }
}

/// Return all built-in rules.
pub fn all_rules() -> Vec<Box<dyn DecisionRule>> {
    vec![
        Box::new(rules::heart::Heart),
        Box::new(rules::wells_pe::WellsPe),
        Box::new(rules::perc::Perc),
        Box::new(rules::curb65::Curb65),
        Box::new(rules::canadian_ct_head::CanadianCtHead),
    ]
}

/// Look up a built-in rule by ID.
pub fn get_rule(id: &str) -> Result<Box<dyn DecisionRule>, ScoringError> {
    all_rules()
        .into_iter()
        .find(|r| r.id() == id)
        .ok_or_else(|| ScoringError::UnknownRule(id.to_string()))
}
