//! Turning supplied component values into a risk label.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use ts_rs::TS;

use crate::error::{InputError, ScoringError};
use crate::schema::{
    Component, ComponentType, InputValue, Inputs, ProcedureStep, ScoreBand, Scoring,
    StepCondition, StructuredRule,
};

/// Risk label reported when no algorithm step applies to the inputs.
pub const INDETERMINATE_RISK: &str = "Indeterminate";

const INDETERMINATE_INTERPRETATION: &str =
    "No step of the decision procedure applies to the supplied values.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Evaluation {
    pub rule_id: String,
    /// Weighted sum for `sum` and `algorithm` rules, count of criteria
    /// present for `threshold` rules.
    pub total: f64,
    pub risk: String,
    pub interpretation: String,
    /// The total fell outside every band and the nearest band was used.
    pub clamped: bool,
    /// Index into the rule's ranges or steps of the entry that produced the
    /// result. `None` when no algorithm step applied.
    pub matched: Option<usize>,
    /// Components with no supplied value; they contributed nothing.
    pub missing: Vec<String>,
    pub treatments: Vec<String>,
}

/// Points a single supplied value contributes.
pub fn contribution(component: &Component, value: &InputValue) -> Result<f64, InputError> {
    let mismatch = || InputError::KindMismatch {
        component: component.id.clone(),
        expected: component.kind,
    };

    match (component.kind, value) {
        (ComponentType::Boolean | ComponentType::Algorithm, InputValue::Flag(present)) => {
            Ok(if *present { component.points() } else { 0.0 })
        }
        (ComponentType::Select, InputValue::Choice(label)) => component
            .options
            .iter()
            .find(|o| o.label.eq_ignore_ascii_case(label))
            .map(|o| o.value)
            .ok_or_else(|| InputError::UnknownChoice {
                component: component.id.clone(),
                choice: label.clone(),
            }),
        (ComponentType::Select, InputValue::Number(n)) => component
            .options
            .iter()
            .find(|o| (o.value - n).abs() < f64::EPSILON)
            .map(|o| o.value)
            .ok_or_else(|| InputError::UnknownChoice {
                component: component.id.clone(),
                choice: n.to_string(),
            }),
        (ComponentType::NumberRange, InputValue::Number(n)) if !n.is_finite() => {
            Err(InputError::NotFinite {
                component: component.id.clone(),
                value: *n,
            })
        }
        (ComponentType::NumberRange, InputValue::Number(n)) => Ok(*n),
        _ => Err(mismatch()),
    }
}

/// Report every problem with `inputs`, including out-of-range numbers that
/// [`evaluate`] tolerates.
pub fn validate_inputs(rule: &StructuredRule, inputs: &Inputs) -> Vec<InputError> {
    let mut errors = Vec::new();
    for (id, value) in inputs {
        let Some(component) = rule.component(id) else {
            errors.push(InputError::UnknownComponent {
                component: id.clone(),
            });
            continue;
        };
        match contribution(component, value) {
            Err(e) => errors.push(e),
            Ok(n) => {
                if let (ComponentType::NumberRange, Some(min), Some(max)) =
                    (component.kind, component.min, component.max)
                    && (n < min || n > max)
                {
                    errors.push(InputError::OutOfRange {
                        component: id.clone(),
                        value: n,
                        min,
                        max,
                    });
                }
            }
        }
    }
    errors
}

struct Tally {
    weighted: f64,
    present: Vec<String>,
    missing: Vec<String>,
}

impl Tally {
    fn is_present(&self, id: &str) -> bool {
        self.present.iter().any(|p| p == id)
    }

    fn count_present(&self, ids: &[String]) -> usize {
        ids.iter().filter(|id| self.is_present(id)).count()
    }
}

/// Yes/no criteria are present when answered yes, whatever their weight.
/// Scored components are present when they add something.
fn is_present(component: &Component, value: &InputValue, points: f64) -> bool {
    match component.kind {
        ComponentType::Boolean | ComponentType::Algorithm => {
            matches!(value, InputValue::Flag(true))
        }
        ComponentType::Select | ComponentType::NumberRange => points != 0.0,
    }
}

fn tally(rule: &StructuredRule, inputs: &Inputs) -> Result<Tally, InputError> {
    if let Some(unknown) = inputs.keys().find(|id| rule.component(id).is_none()) {
        return Err(InputError::UnknownComponent {
            component: unknown.clone(),
        });
    }

    let mut tally = Tally {
        weighted: 0.0,
        present: Vec::new(),
        missing: Vec::new(),
    };
    for component in &rule.components {
        match inputs.get(&component.id) {
            None => tally.missing.push(component.id.clone()),
            Some(value) => {
                let points = contribution(component, value)?;
                tally.weighted += points;
                if is_present(component, value, points) {
                    tally.present.push(component.id.clone());
                }
            }
        }
    }
    Ok(tally)
}

/// Pick the band for `total`: the first band by ascending `min` that
/// contains it, or, when none does, the nearest band (lower one on a tie)
/// with the clamp flag set.
pub fn select_band(ranges: &[ScoreBand], total: f64) -> Option<(usize, bool)> {
    let mut order: Vec<usize> = (0..ranges.len()).collect();
    order.sort_by(|&a, &b| ranges[a].min.total_cmp(&ranges[b].min));

    if let Some(&hit) = order.iter().find(|&&i| ranges[i].contains(total)) {
        return Some((hit, false));
    }

    let mut nearest: Option<usize> = None;
    for &i in &order {
        match nearest {
            Some(n) if ranges[n].distance(total) <= ranges[i].distance(total) => {}
            _ => nearest = Some(i),
        }
    }
    nearest.map(|i| (i, true))
}

fn condition_holds(condition: &StepCondition, tally: &Tally) -> bool {
    match condition {
        StepCondition::Always => true,
        StepCondition::AnyOf { components } => components.iter().any(|id| tally.is_present(id)),
        StepCondition::AllOf { components } => components.iter().all(|id| tally.is_present(id)),
        StepCondition::AtLeast { count, components } => {
            tally.count_present(components) >= *count
        }
        StepCondition::TotalBetween { min, max } => {
            tally.weighted >= *min && tally.weighted <= *max
        }
    }
}

/// Walk `steps` in order and return the first whose condition holds.
fn first_step<'a>(steps: &'a [ProcedureStep], tally: &Tally) -> Option<(usize, &'a ProcedureStep)> {
    steps
        .iter()
        .enumerate()
        .find(|(_, step)| condition_holds(&step.condition, tally))
}

/// Score `inputs` against `rule`.
///
/// Missing components contribute nothing and are listed in
/// [`Evaluation::missing`]. A total outside every band is clamped rather
/// than rejected. Only inputs that cannot be read at all (unknown
/// component, wrong kind of value, unknown option) are errors.
pub fn evaluate(rule: &StructuredRule, inputs: &Inputs) -> Result<Evaluation, ScoringError> {
    let tally = tally(rule, inputs)?;

    let (total, risk, interpretation, clamped, matched) = match &rule.scoring {
        Scoring::Sum { ranges } | Scoring::Threshold { ranges } => {
            let total = if matches!(rule.scoring, Scoring::Threshold { .. }) {
                tally.present.len() as f64
            } else {
                tally.weighted
            };
            let (idx, clamped) =
                select_band(ranges, total).ok_or_else(|| ScoringError::NoRanges {
                    rule_id: rule.id.clone(),
                })?;
            if clamped {
                warn!(
                    rule = %rule.id,
                    total,
                    band = %ranges[idx].risk,
                    "total outside every interpretation range, clamped to nearest"
                );
            }
            let band = &ranges[idx];
            (
                total,
                band.risk.clone(),
                band.interpretation.clone(),
                clamped,
                Some(idx),
            )
        }
        Scoring::Algorithm { steps } => match first_step(steps, &tally) {
            Some((idx, step)) => (
                tally.weighted,
                step.risk.clone(),
                step.interpretation.clone(),
                false,
                Some(idx),
            ),
            None => {
                debug!(rule = %rule.id, "no algorithm step applies");
                (
                    tally.weighted,
                    INDETERMINATE_RISK.to_string(),
                    INDETERMINATE_INTERPRETATION.to_string(),
                    false,
                    None,
                )
            }
        },
    };

    let treatments = rule.treatments_for(&risk).to_vec();
    Ok(Evaluation {
        rule_id: rule.id.clone(),
        total,
        risk,
        interpretation,
        clamped,
        matched,
        missing: tally.missing,
        treatments,
    })
}
