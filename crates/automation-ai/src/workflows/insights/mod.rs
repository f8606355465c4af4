//! Insights over assessments: rule-based optimization suggestions, weighted success
//! prediction and similarity grouping. Every run is kept in the caller's analysis
//! history. The plan builder used by the automation workflow lives here too.

pub mod clustering;
pub mod history;
pub mod prediction;
pub mod recommendations;
pub mod router;
pub mod service;


pub use clustering::{
    analyze_similarity, standardize, ClusterMember, Clusterer, ClusteringError, KMeansClusterer,
    SimilarityInsight, SimilarityOutcome, MIN_SIMILARITY_SAMPLES,
};
pub use history::{AnalysisId, AnalysisRecord, AnalysisRecordView, AnalysisRepository, AnalysisType};
pub use prediction::{predict_success, SuccessPrediction, PREDICTION_CONFIDENCE};
pub use recommendations::{
    automation_plan, recommend, AutomationPlan, FactorReadings, Suggestion, SuggestionBuckets,
    WELL_SUITED,
};
pub use router::insights_router;
pub use service::{Analysis, InsightsService, InsightsServiceError, ScoreRequest, UNKNOWN_PROCESS};
