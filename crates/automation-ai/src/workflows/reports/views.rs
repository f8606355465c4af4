use chrono::{DateTime, Utc};
use serde::Serialize;

use super::aggregation::SuitabilityCounts;
use super::domain::{Report, ReportId};
use crate::identity::OwnerId;
use crate::workflows::assessments::{Assessment, AssessmentSummaryView};

#[derive(Debug, Clone, Serialize)]
pub struct ReportView {
    pub id: ReportId,
    pub title: String,
    pub description: Option<String>,
    pub assessments: Vec<AssessmentSummaryView>,
    pub generated_by: OwnerId,
    pub ai_conclusion: String,
    pub highly_automatable_count: usize,
    pub possibly_automatable_count: usize,
    pub not_suitable_count: usize,
    pub created_at: DateTime<Utc>,
}

impl Report {
    /// Render with resolved members; counts are taken from the members as they are now.
    pub fn view(&self, members: &[Assessment]) -> ReportView {
        let counts = SuitabilityCounts::from_assessments(members);
        ReportView {
            id: self.id,
            title: self.title.clone(),
            description: self.description.clone(),
            assessments: members.iter().map(Assessment::summary_view).collect(),
            generated_by: self.generated_by.clone(),
            ai_conclusion: self.conclusion.clone(),
            highly_automatable_count: counts.highly_automatable,
            possibly_automatable_count: counts.possibly_automatable,
            not_suitable_count: counts.not_suitable,
            created_at: self.created_at,
        }
    }
}
