//! Machine-evaluable definition of a decision rule.
//!
//! A [`StructuredRule`] lists its scored criteria ([`Component`]s) and how
//! their values turn into a risk label ([`Scoring`]). Numeric methods
//! partition the total score into inclusive [`ScoreBand`]s; the algorithm
//! method is an ordered list of [`ProcedureStep`]s, each guarded by its own
//! [`StepCondition`].

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::legacy;

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct StructuredRule {
    pub id: String,
    pub name: String,
    pub full_name: String,
    pub category: String,
    pub application: String,
    pub applicable_chief_complaints: Vec<String>,
    pub keywords: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required_tests: Vec<String>,
    pub components: Vec<Component>,
    #[serde(deserialize_with = "legacy::deserialize_scoring")]
    pub scoring: Scoring,
    /// Recommended actions keyed by risk label.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub suggested_treatments: BTreeMap<String, Vec<String>>,
}

impl StructuredRule {
    pub fn component(&self, id: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.id == id)
    }

    /// Actions suggested for `risk`. Empty when the rule has none for it.
    pub fn treatments_for(&self, risk: &str) -> &[String] {
        self.suggested_treatments
            .get(risk)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ComponentType {
    Select,
    Boolean,
    NumberRange,
    /// A yes/no criterion that feeds an algorithm step rather than a sum.
    Algorithm,
}

impl fmt::Display for ComponentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ComponentType::Select => "select",
            ComponentType::Boolean => "boolean",
            ComponentType::NumberRange => "number_range",
            ComponentType::Algorithm => "algorithm",
        };
        f.write_str(name)
    }
}

/// Where a component's value is gathered in the intake form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ComponentSource {
    /// History and presenting complaint.
    Section1,
    /// Examination, vitals, and results.
    Section2,
    #[default]
    UserInput,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SelectOption {
    pub label: String,
    pub value: f64,
}

/// One scored criterion.
///
/// `options` is used by `select`, `min`/`max` by `number_range`, and `value`
/// by `boolean`/`algorithm` (the points added when the criterion is present,
/// 1 when unset).
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Component {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: ComponentType,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<SelectOption>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(default)]
    pub source: ComponentSource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auto_populate_from: Option<String>,
}

impl Component {
    fn new(id: &str, label: &str, kind: ComponentType) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            kind,
            options: Vec::new(),
            min: None,
            max: None,
            value: None,
            source: ComponentSource::UserInput,
            auto_populate_from: None,
        }
    }

    pub fn boolean(id: &str, label: &str, points: f64) -> Self {
        Self {
            value: Some(points),
            ..Self::new(id, label, ComponentType::Boolean)
        }
    }

    pub fn criterion(id: &str, label: &str) -> Self {
        Self::new(id, label, ComponentType::Algorithm)
    }

    pub fn select(id: &str, label: &str, options: &[(&str, f64)]) -> Self {
        Self {
            options: options
                .iter()
                .map(|(label, value)| SelectOption {
                    label: label.to_string(),
                    value: *value,
                })
                .collect(),
            ..Self::new(id, label, ComponentType::Select)
        }
    }

    pub fn number_range(id: &str, label: &str, min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
            ..Self::new(id, label, ComponentType::NumberRange)
        }
    }

    pub fn from_source(mut self, source: ComponentSource) -> Self {
        self.source = source;
        self
    }

    pub fn auto_populate(mut self, path: &str) -> Self {
        self.auto_populate_from = Some(path.to_string());
        self
    }

    /// Points added when a boolean or algorithm criterion is present.
    pub fn points(&self) -> f64 {
        self.value.unwrap_or(1.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "method", rename_all = "snake_case")]
#[ts(export)]
pub enum Scoring {
    /// Weighted sum of component contributions.
    Sum { ranges: Vec<ScoreBand> },
    /// Unweighted count of criteria present.
    Threshold { ranges: Vec<ScoreBand> },
    /// Ordered decision steps; the first whose condition holds wins.
    Algorithm { steps: Vec<ProcedureStep> },
}

/// An inclusive interpretation band, `min <= total <= max`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ScoreBand {
    pub min: f64,
    pub max: f64,
    pub risk: String,
    pub interpretation: String,
}

impl ScoreBand {
    pub fn new(min: f64, max: f64, risk: &str, interpretation: &str) -> Self {
        Self {
            min,
            max,
            risk: risk.to_string(),
            interpretation: interpretation.to_string(),
        }
    }

    pub fn contains(&self, total: f64) -> bool {
        total >= self.min && total <= self.max
    }

    /// Distance from `total` to the nearest edge of the band, 0 inside it.
    pub fn distance(&self, total: f64) -> f64 {
        if total < self.min {
            self.min - total
        } else if total > self.max {
            total - self.max
        } else {
            0.0
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProcedureStep {
    pub condition: StepCondition,
    pub risk: String,
    pub interpretation: String,
}

impl ProcedureStep {
    pub fn new(condition: StepCondition, risk: &str, interpretation: &str) -> Self {
        Self {
            condition,
            risk: risk.to_string(),
            interpretation: interpretation.to_string(),
        }
    }
}

/// Guard of an algorithm step. Component ids refer to criteria that count as
/// present when a yes/no criterion is answered yes, or when a select or
/// number_range component contributes a non-zero value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[ts(export)]
pub enum StepCondition {
    Always,
    AnyOf { components: Vec<String> },
    AllOf { components: Vec<String> },
    AtLeast { count: usize, components: Vec<String> },
    /// Weighted total within `[min, max]`, inclusive.
    TotalBetween { min: f64, max: f64 },
}

impl StepCondition {
    pub fn any_of(ids: &[&str]) -> Self {
        StepCondition::AnyOf {
            components: ids.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn all_of(ids: &[&str]) -> Self {
        StepCondition::AllOf {
            components: ids.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn at_least(count: usize, ids: &[&str]) -> Self {
        StepCondition::AtLeast {
            count,
            components: ids.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Component ids the condition reads.
    pub fn components(&self) -> &[String] {
        match self {
            StepCondition::AnyOf { components }
            | StepCondition::AllOf { components }
            | StepCondition::AtLeast { components, .. } => components,
            StepCondition::Always | StepCondition::TotalBetween { .. } => &[],
        }
    }
}

/// A value supplied for one component.
///
/// Booleans answer `boolean`/`algorithm` criteria, numbers answer
/// `number_range` components (or pick a `select` option by value), and
/// strings pick a `select` option by label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(untagged)]
#[ts(export)]
pub enum InputValue {
    Flag(bool),
    Number(f64),
    Choice(String),
}

impl InputValue {
    /// Parse a command-line style value: `true`/`yes`, `false`/`no`, a
    /// number, or anything else as an option label.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_lowercase().as_str() {
            "true" | "yes" | "y" => return InputValue::Flag(true),
            "false" | "no" | "n" => return InputValue::Flag(false),
            _ => {}
        }
        match raw.trim().parse::<f64>() {
            Ok(n) => InputValue::Number(n),
            Err(_) => InputValue::Choice(raw.trim().to_string()),
        }
    }
}

impl fmt::Display for InputValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InputValue::Flag(true) => f.write_str("yes"),
            InputValue::Flag(false) => f.write_str("no"),
            InputValue::Number(n) => write!(f, "{n}"),
            InputValue::Choice(label) => f.write_str(label),
        }
    }
}

/// Supplied values keyed by component id.
pub type Inputs = BTreeMap<String, InputValue>;
