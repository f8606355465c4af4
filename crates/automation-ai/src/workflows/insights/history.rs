use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use crate::identity::OwnerId;
use crate::workflows::assessments::RepositoryError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AnalysisId(pub u64);

impl fmt::Display for AnalysisId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnalysisType {
    Similarity,
    Optimization,
    Prediction,
}

impl AnalysisType {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Similarity => "Similarity Analysis",
            Self::Optimization => "Optimization Suggestions",
            Self::Prediction => "Automation Success Prediction",
        }
    }
}

/// Persisted trace of one insights call: what was asked and what was answered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub id: AnalysisId,
    pub process_name: String,
    pub analysis_type: AnalysisType,
    pub input_data: Value,
    pub results: Value,
    pub confidence_score: f64,
    pub owner: OwnerId,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnalysisRecordView {
    pub id: AnalysisId,
    pub process_name: String,
    pub analysis_type: AnalysisType,
    pub analysis_type_display: &'static str,
    pub input_data: Value,
    pub results: Value,
    pub confidence_score: f64,
    pub created_at: DateTime<Utc>,
}

impl AnalysisRecord {
    pub fn view(&self) -> AnalysisRecordView {
        AnalysisRecordView {
            id: self.id,
            process_name: self.process_name.clone(),
            analysis_type: self.analysis_type,
            analysis_type_display: self.analysis_type.label(),
            input_data: self.input_data.clone(),
            results: self.results.clone(),
            confidence_score: self.confidence_score,
            created_at: self.created_at,
        }
    }
}

pub trait AnalysisRepository: Send + Sync {
    fn insert(&self, record: AnalysisRecord) -> Result<AnalysisRecord, RepositoryError>;
    fn list_by_owner(&self, owner: &OwnerId) -> Result<Vec<AnalysisRecord>, RepositoryError>;
}

/// Newest first.
pub fn sort_for_listing(records: &mut [AnalysisRecord]) {
    records.sort_by(|left, right| {
        right
            .created_at
            .cmp(&left.created_at)
            .then_with(|| right.id.cmp(&left.id))
    });
}
