use thiserror::Error;

use crate::schema::ComponentType;

#[derive(Debug, Error)]
pub enum ScoringError {
    #[error("unknown rule: {0}")]
    UnknownRule(String),

    #[error("invalid input: {0}")]
    Input(#[from] InputError),

    #[error("rule '{rule_id}' has no interpretation ranges")]
    NoRanges { rule_id: String },
}

/// A supplied value that does not fit the component it was given for.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InputError {
    #[error("unknown component '{component}'")]
    UnknownComponent { component: String },

    #[error("component '{component}' expects a {expected} value")]
    KindMismatch {
        component: String,
        expected: ComponentType,
    },

    #[error("'{choice}' is not an option of component '{component}'")]
    UnknownChoice { component: String, choice: String },

    #[error("component '{component}' value {value} is not a finite number")]
    NotFinite { component: String, value: f64 },

    #[error("component '{component}' value {value} is outside range [{min}, {max}]")]
    OutOfRange {
        component: String,
        value: f64,
        min: f64,
        max: f64,
    },
}

impl InputError {
    /// Out-of-range values are still scored (and the result clamped); every
    /// other input error makes the value unusable.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, InputError::OutOfRange { .. })
    }
}
