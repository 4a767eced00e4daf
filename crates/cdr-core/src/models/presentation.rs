use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// A clinical presentation the ranker matches candidate rules against.
#[derive(Debug, Clone, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct Presentation {
    pub chief_complaint: String,
    /// Free-text history, exam findings, or triage notes.
    #[serde(default)]
    pub narrative: String,
}

impl Presentation {
    pub fn new(chief_complaint: impl Into<String>) -> Self {
        Self {
            chief_complaint: chief_complaint.into(),
            narrative: String::new(),
        }
    }

    pub fn with_narrative(mut self, narrative: impl Into<String>) -> Self {
        self.narrative = narrative.into();
        self
    }

    /// Chief complaint and narrative joined for keyword extraction.
    pub fn text(&self) -> String {
        if self.narrative.is_empty() {
            self.chief_complaint.clone()
        } else {
            format!("{} {}", self.chief_complaint, self.narrative)
        }
    }
}
