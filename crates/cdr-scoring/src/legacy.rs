//! Reading definitions written in the older single-shape scoring format.
//!
//! Older documents describe every method as `{method, ranges}`, including
//! `algorithm`, whose "ranges" are really ordered decision steps over the
//! total. Sum and threshold documents already match [`Scoring`]; algorithm
//! documents are converted to steps guarded by [`StepCondition::TotalBetween`],
//! kept in the order given.

use serde::{Deserialize, Deserializer};

use crate::schema::{ProcedureStep, ScoreBand, Scoring, StepCondition};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LegacyMethod {
    Sum,
    Threshold,
    Algorithm,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LegacyScoring {
    pub method: LegacyMethod,
    pub ranges: Vec<ScoreBand>,
}

impl From<LegacyScoring> for Scoring {
    fn from(legacy: LegacyScoring) -> Self {
        match legacy.method {
            LegacyMethod::Sum => Scoring::Sum {
                ranges: legacy.ranges,
            },
            LegacyMethod::Threshold => Scoring::Threshold {
                ranges: legacy.ranges,
            },
            LegacyMethod::Algorithm => Scoring::Algorithm {
                steps: legacy
                    .ranges
                    .into_iter()
                    .map(|band| ProcedureStep {
                        condition: StepCondition::TotalBetween {
                            min: band.min,
                            max: band.max,
                        },
                        risk: band.risk,
                        interpretation: band.interpretation,
                    })
                    .collect(),
            },
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AnyScoring {
    Current(Scoring),
    Legacy(LegacyScoring),
}

/// Accept either the current tagged shape or the legacy `{method, ranges}`.
pub fn deserialize_scoring<'de, D>(deserializer: D) -> Result<Scoring, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match AnyScoring::deserialize(deserializer)? {
        AnyScoring::Current(scoring) => scoring,
        AnyScoring::Legacy(legacy) => legacy.into(),
    })
}
