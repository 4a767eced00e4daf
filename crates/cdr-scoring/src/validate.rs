use std::collections::HashSet;

use thiserror::Error;

use crate::schema::{ComponentType, Scoring, ScoreBand, StepCondition, StructuredRule};

/// Rules with a `number_range` component are checked assuming whole-unit
/// inputs: bands further apart than this leave totals that map to no band.
const MAX_BAND_STEP: f64 = 1.0;

/// Enumeration of achievable totals stops past this many distinct values.
const MAX_REACHABLE: usize = 4096;

const EPSILON: f64 = 1e-9;

/// An authoring mistake in a rule definition.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DefinitionError {
    #[error("{rule}: component id '{component}' is used more than once")]
    DuplicateComponent { rule: String, component: String },

    #[error("{rule}: select component '{component}' has no options")]
    MissingOptions { rule: String, component: String },

    #[error("{rule}: number_range component '{component}' needs both min and max")]
    MissingBounds { rule: String, component: String },

    #[error("{rule}: component '{component}' has min {min} greater than max {max}")]
    InvertedBounds {
        rule: String,
        component: String,
        min: f64,
        max: f64,
    },

    #[error("{rule}: scoring has no ranges or steps")]
    Empty { rule: String },

    #[error("{rule}: range '{risk}' has min {min} greater than max {max}")]
    InvertedBand {
        rule: String,
        risk: String,
        min: f64,
        max: f64,
    },

    #[error("{rule}: ranges '{lower}' and '{upper}' overlap")]
    OverlappingBands {
        rule: String,
        lower: String,
        upper: String,
    },

    #[error("{rule}: gap between ranges '{lower}' and '{upper}'")]
    BandGap {
        rule: String,
        lower: String,
        upper: String,
    },

    #[error("{rule}: ranges cover [{covered_min}, {covered_max}] but totals span [{min}, {max}]")]
    UncoveredTotals {
        rule: String,
        min: f64,
        max: f64,
        covered_min: f64,
        covered_max: f64,
    },

    #[error("{rule}: step {step} refers to unknown component '{component}'")]
    UnknownStepComponent {
        rule: String,
        step: usize,
        component: String,
    },

    #[error("{rule}: step {step} needs {count} criteria but lists {available}")]
    UnsatisfiableStep {
        rule: String,
        step: usize,
        count: usize,
        available: usize,
    },

    #[error("{rule}: step {step} can never be reached")]
    UnreachableStep { rule: String, step: usize },
}

/// Smallest and largest totals the components can produce when every
/// component is answered.
pub fn total_domain(rule: &StructuredRule) -> (f64, f64) {
    if matches!(rule.scoring, Scoring::Threshold { .. }) {
        return (0.0, rule.components.len() as f64);
    }

    let mut low = 0.0;
    let mut high = 0.0;
    for component in &rule.components {
        let (lo, hi) = match component.kind {
            ComponentType::Boolean | ComponentType::Algorithm => {
                let points = component.points();
                (points.min(0.0), points.max(0.0))
            }
            ComponentType::Select => {
                let values = component.options.iter().map(|o| o.value);
                let lo = values.clone().fold(f64::INFINITY, f64::min);
                let hi = values.fold(f64::NEG_INFINITY, f64::max);
                if lo.is_finite() { (lo, hi) } else { (0.0, 0.0) }
            }
            ComponentType::NumberRange => (
                component.min.unwrap_or(0.0),
                component.max.unwrap_or(0.0),
            ),
        };
        low += lo;
        high += hi;
    }
    (low, high)
}

/// Every total the components can produce, ascending, counting unanswered
/// components as contributing nothing. `None` when a `number_range`
/// component makes the totals continuous or there are too many to list.
pub fn reachable_totals(rule: &StructuredRule) -> Option<Vec<f64>> {
    if matches!(rule.scoring, Scoring::Threshold { .. }) {
        return Some((0..=rule.components.len()).map(|n| n as f64).collect());
    }

    let mut totals = vec![0.0];
    for component in &rule.components {
        let choices: Vec<f64> = match component.kind {
            ComponentType::Boolean | ComponentType::Algorithm => vec![0.0, component.points()],
            ComponentType::Select => std::iter::once(0.0)
                .chain(component.options.iter().map(|o| o.value))
                .collect(),
            ComponentType::NumberRange => return None,
        };
        let mut next: Vec<f64> = totals
            .iter()
            .flat_map(|t| choices.iter().map(move |c| t + c))
            .collect();
        next.sort_by(f64::total_cmp);
        next.dedup_by(|a, b| (*a - *b).abs() < EPSILON);
        if next.len() > MAX_REACHABLE {
            return None;
        }
        totals = next;
    }
    Some(totals)
}

/// Check a definition for authoring mistakes. Returns every problem found.
pub fn validate_definition(rule: &StructuredRule) -> Vec<DefinitionError> {
    let mut errors = Vec::new();
    check_components(rule, &mut errors);
    match &rule.scoring {
        Scoring::Sum { ranges } | Scoring::Threshold { ranges } => {
            check_bands(rule, ranges, &mut errors)
        }
        Scoring::Algorithm { .. } => check_steps(rule, &mut errors),
    }
    errors
}

fn check_components(rule: &StructuredRule, errors: &mut Vec<DefinitionError>) {
    let mut seen = HashSet::new();
    for component in &rule.components {
        if !seen.insert(component.id.as_str()) {
            errors.push(DefinitionError::DuplicateComponent {
                rule: rule.id.clone(),
                component: component.id.clone(),
            });
        }
        match component.kind {
            ComponentType::Select if component.options.is_empty() => {
                errors.push(DefinitionError::MissingOptions {
                    rule: rule.id.clone(),
                    component: component.id.clone(),
                });
            }
            ComponentType::NumberRange => match (component.min, component.max) {
                (Some(min), Some(max)) if min > max => {
                    errors.push(DefinitionError::InvertedBounds {
                        rule: rule.id.clone(),
                        component: component.id.clone(),
                        min,
                        max,
                    });
                }
                (Some(_), Some(_)) => {}
                _ => errors.push(DefinitionError::MissingBounds {
                    rule: rule.id.clone(),
                    component: component.id.clone(),
                }),
            },
            _ => {}
        }
    }
}

fn check_bands(rule: &StructuredRule, ranges: &[ScoreBand], errors: &mut Vec<DefinitionError>) {
    if ranges.is_empty() {
        errors.push(DefinitionError::Empty {
            rule: rule.id.clone(),
        });
        return;
    }

    for band in ranges {
        if band.min > band.max {
            errors.push(DefinitionError::InvertedBand {
                rule: rule.id.clone(),
                risk: band.risk.clone(),
                min: band.min,
                max: band.max,
            });
        }
    }

    let mut sorted: Vec<&ScoreBand> = ranges.iter().collect();
    sorted.sort_by(|a, b| a.min.total_cmp(&b.min));

    let reachable = reachable_totals(rule);
    for pair in sorted.windows(2) {
        let (lower, upper) = (pair[0], pair[1]);
        let gap = match &reachable {
            Some(totals) => totals
                .iter()
                .any(|&t| t > lower.max + EPSILON && t < upper.min - EPSILON),
            None => upper.min - lower.max > MAX_BAND_STEP + EPSILON,
        };
        if upper.min <= lower.max {
            errors.push(DefinitionError::OverlappingBands {
                rule: rule.id.clone(),
                lower: lower.risk.clone(),
                upper: upper.risk.clone(),
            });
        } else if gap {
            errors.push(DefinitionError::BandGap {
                rule: rule.id.clone(),
                lower: lower.risk.clone(),
                upper: upper.risk.clone(),
            });
        }
    }

    let (min, max) = total_domain(rule);
    let covered_min = sorted[0].min;
    let covered_max = sorted.iter().map(|b| b.max).fold(f64::NEG_INFINITY, f64::max);
    if covered_min > min + EPSILON || covered_max + EPSILON < max {
        errors.push(DefinitionError::UncoveredTotals {
            rule: rule.id.clone(),
            min,
            max,
            covered_min,
            covered_max,
        });
    }
}

fn check_steps(rule: &StructuredRule, errors: &mut Vec<DefinitionError>) {
    let Scoring::Algorithm { steps } = &rule.scoring else {
        return;
    };
    if steps.is_empty() {
        errors.push(DefinitionError::Empty {
            rule: rule.id.clone(),
        });
        return;
    }

    let mut catch_all_seen = false;
    for (i, step) in steps.iter().enumerate() {
        if catch_all_seen {
            errors.push(DefinitionError::UnreachableStep {
                rule: rule.id.clone(),
                step: i,
            });
        }

        for id in step.condition.components() {
            if rule.component(id).is_none() {
                errors.push(DefinitionError::UnknownStepComponent {
                    rule: rule.id.clone(),
                    step: i,
                    component: id.clone(),
                });
            }
        }

        match &step.condition {
            StepCondition::Always => catch_all_seen = true,
            StepCondition::AtLeast { count, components } if *count > components.len() => {
                errors.push(DefinitionError::UnsatisfiableStep {
                    rule: rule.id.clone(),
                    step: i,
                    count: *count,
                    available: components.len(),
                });
            }
            StepCondition::TotalBetween { min, max } if min > max => {
                errors.push(DefinitionError::InvertedBand {
                    rule: rule.id.clone(),
                    risk: step.risk.clone(),
                    min: *min,
                    max: *max,
                });
            }
            _ => {}
        }
    }
}
