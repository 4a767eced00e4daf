use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid rule id: {0:?}")]
    InvalidRuleId(String),
}
