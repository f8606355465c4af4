use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, warn};

use super::clustering::{analyze_similarity, Clusterer, ClusteringError, SimilarityOutcome};
use super::history::{sort_for_listing, AnalysisId, AnalysisRecord, AnalysisRepository, AnalysisType};
use super::prediction::{predict_success, SuccessPrediction};
use super::recommendations::{recommend, FactorReadings, SuggestionBuckets};
use crate::identity::OwnerId;
use crate::workflows::assessments::{AssessmentRepository, RepositoryError};
use crate::workflows::validation::{normalize_optional, ValidationError};

pub const UNKNOWN_PROCESS: &str = "Unknown Process";

const SIMILARITY_CONFIDENCE: f64 = 0.8;
const PREDICTION_CONFIDENCE: f64 = 0.85;
const OPTIMIZATION_CONFIDENCE: f64 = 0.9;

/// Body shared by the prediction and optimization endpoints.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ScoreRequest {
    #[serde(default)]
    pub process_name: Option<String>,
    #[serde(default)]
    pub scores: BTreeMap<String, f64>,
}

impl ScoreRequest {
    fn process_name(&self) -> String {
        normalize_optional(self.process_name.clone()).unwrap_or_else(|| UNKNOWN_PROCESS.to_string())
    }
}

/// A stored analysis together with the answer handed back to the caller.
#[derive(Debug, Clone)]
pub struct Analysis<T> {
    pub record: AnalysisRecord,
    pub outcome: T,
}

/// Suggestions, predictions and similarity grouping, each call leaving an analysis record
/// in the caller's history.
pub struct InsightsService<R, H, C> {
    assessments: Arc<R>,
    history: Arc<H>,
    clusterer: C,
    max_clusters: usize,
}

static ANALYSIS_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_analysis_id() -> AnalysisId {
    AnalysisId(ANALYSIS_SEQUENCE.fetch_add(1, Ordering::Relaxed))
}

impl<R, H, C> InsightsService<R, H, C>
where
    R: AssessmentRepository + 'static,
    H: AnalysisRepository + 'static,
    C: Clusterer + 'static,
{
    pub fn new(assessments: Arc<R>, history: Arc<H>, clusterer: C, max_clusters: usize) -> Self {
        Self {
            assessments,
            history,
            clusterer,
            max_clusters: max_clusters.max(1),
        }
    }

    /// Cluster every assessment the owner has made.
    pub fn similarity(
        &self,
        owner: &OwnerId,
    ) -> Result<Analysis<SimilarityOutcome>, InsightsServiceError> {
        let assessments = self.assessments.list_by_owner(owner)?;
        let outcome = analyze_similarity(&assessments, self.max_clusters, &self.clusterer)
            .map_err(|error| {
                warn!(owner = %owner, samples = assessments.len(), %error, "similarity analysis refused");
                error
            })?;

        let record = self.record(
            owner,
            AnalysisType::Similarity.label().to_string(),
            AnalysisType::Similarity,
            json!({ "processes_analyzed": outcome.processes_analyzed }),
            json!({
                "clusters": serde_json::to_value(&outcome.cluster_groups)?,
                "insights": serde_json::to_value(&outcome.insights)?,
            }),
            SIMILARITY_CONFIDENCE,
        )?;
        info!(
            analysis_id = %record.id,
            owner = %owner,
            samples = assessments.len(),
            groups = outcome.cluster_groups.len(),
            insights = outcome.insights.len(),
            "similarity analysis stored"
        );
        Ok(Analysis { record, outcome })
    }

    pub fn predict(
        &self,
        owner: &OwnerId,
        request: ScoreRequest,
    ) -> Result<Analysis<SuccessPrediction>, InsightsServiceError> {
        let outcome = predict_success(&request.scores).map_err(|error| {
            warn!(owner = %owner, %error, "prediction rejected");
            error
        })?;
        let record = self.record(
            owner,
            request.process_name(),
            AnalysisType::Prediction,
            serde_json::to_value(&request.scores)?,
            json!({
                "success_probability": outcome.success_probability,
                "recommendation": outcome.recommendation,
                "risk_factors": outcome.risk_factors,
            }),
            PREDICTION_CONFIDENCE,
        )?;
        info!(
            analysis_id = %record.id,
            owner = %owner,
            success_probability = outcome.success_probability,
            "success prediction stored"
        );
        Ok(Analysis { record, outcome })
    }

    pub fn optimize(
        &self,
        owner: &OwnerId,
        request: ScoreRequest,
    ) -> Result<Analysis<SuggestionBuckets>, InsightsServiceError> {
        let suggestions = recommend(&FactorReadings::from_named(&request.scores));
        let listed = serde_json::to_value(&suggestions)?;
        let outcome = SuggestionBuckets::partition(suggestions);
        let results = json!({
            "suggestions": listed,
            "high_priority_count": outcome.high.len(),
            "medium_priority_count": outcome.medium.len(),
        });

        let record = self.record(
            owner,
            request.process_name(),
            AnalysisType::Optimization,
            serde_json::to_value(&request.scores)?,
            results,
            OPTIMIZATION_CONFIDENCE,
        )?;
        info!(
            analysis_id = %record.id,
            owner = %owner,
            high = outcome.high.len(),
            medium = outcome.medium.len(),
            low = outcome.low.len(),
            "optimization suggestions stored"
        );
        Ok(Analysis { record, outcome })
    }

    /// The owner's analyses, newest first.
    pub fn history(&self, owner: &OwnerId) -> Result<Vec<AnalysisRecord>, InsightsServiceError> {
        let mut records = self.history.list_by_owner(owner)?;
        sort_for_listing(&mut records);
        Ok(records)
    }

    fn record(
        &self,
        owner: &OwnerId,
        process_name: String,
        analysis_type: AnalysisType,
        input_data: Value,
        results: Value,
        confidence_score: f64,
    ) -> Result<AnalysisRecord, InsightsServiceError> {
        let record = AnalysisRecord {
            id: next_analysis_id(),
            process_name,
            analysis_type,
            input_data,
            results,
            confidence_score,
            owner: owner.clone(),
            created_at: Utc::now(),
        };
        Ok(self.history.insert(record)?)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum InsightsServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Clustering(#[from] ClusteringError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error("failed to encode analysis payload: {0}")]
    Serialization(#[from] serde_json::Error),
}
