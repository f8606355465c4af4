use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::identity::OwnerId;
use crate::workflows::assessments::AssessmentId;
use crate::workflows::validation::{normalize_optional, required_text, ValidationError};

pub const TITLE_MAX_CHARS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ReportId(pub u64);

impl fmt::Display for ReportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Named collection of assessments plus the last generated conclusion.
///
/// `conclusion` is only written by conclusion generation; membership edits leave it stale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub id: ReportId,
    pub title: String,
    pub description: Option<String>,
    pub assessment_ids: Vec<AssessmentId>,
    pub conclusion: String,
    pub generated_by: OwnerId,
    pub created_at: DateTime<Utc>,
}

impl Report {
    pub fn contains(&self, id: AssessmentId) -> bool {
        self.assessment_ids.contains(&id)
    }

    /// Drop a member link, returning whether one was removed.
    pub fn detach(&mut self, id: AssessmentId) -> bool {
        let before = self.assessment_ids.len();
        self.assessment_ids.retain(|member| *member != id);
        before != self.assessment_ids.len()
    }
}

/// Report create/update payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportInput {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub assessment_ids: Option<Vec<u64>>,
}

impl ReportInput {
    pub fn validate(self) -> Result<ReportDraft, ValidationError> {
        let title = required_text("title", self.title, TITLE_MAX_CHARS)?;
        Ok(ReportDraft {
            title,
            description: normalize_optional(self.description),
            assessment_ids: self.assessment_ids.map(|ids| dedup_ids(&ids)),
        })
    }
}

/// Validated report content. `assessment_ids` of `None` leaves membership untouched on update.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportDraft {
    pub title: String,
    pub description: Option<String>,
    pub assessment_ids: Option<Vec<AssessmentId>>,
}

fn dedup_ids(raw: &[u64]) -> Vec<AssessmentId> {
    let mut ids: Vec<AssessmentId> = Vec::with_capacity(raw.len());
    for id in raw.iter().copied().map(AssessmentId) {
        if !ids.contains(&id) {
            ids.push(id);
        }
    }
    ids
}
