use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;

use super::clustering::{Clusterer, ClusteringError, MIN_SIMILARITY_SAMPLES};
use super::history::AnalysisRepository;
use super::service::{InsightsService, InsightsServiceError, ScoreRequest};
use crate::identity::acting_user;
use crate::workflows::assessments::AssessmentRepository;
use crate::workflows::responses::{bad_json, internal_error};

/// Router for the insight endpoints.
pub fn insights_router<R, H, C>(service: Arc<InsightsService<R, H, C>>) -> Router
where
    R: AssessmentRepository + 'static,
    H: AnalysisRepository + 'static,
    C: Clusterer + 'static,
{
    Router::new()
        .route(
            "/api/v1/ai/similarity-analysis",
            post(similarity_handler::<R, H, C>),
        )
        .route("/api/v1/ai/predict-success", post(predict_handler::<R, H, C>))
        .route(
            "/api/v1/ai/optimization-suggestions",
            post(optimization_handler::<R, H, C>),
        )
        .route("/api/v1/ai/analysis-history", get(history_handler::<R, H, C>))
        .with_state(service)
}

fn error_response(error: InsightsServiceError) -> Response {
    match error {
        InsightsServiceError::Validation(error) => error.into_response(),
        InsightsServiceError::Clustering(ClusteringError::TooFewSamples { .. }) => {
            let payload = json!({
                "error": format!(
                    "Need at least {MIN_SIMILARITY_SAMPLES} assessments for similarity analysis"
                ),
            });
            (StatusCode::BAD_REQUEST, Json(payload)).into_response()
        }
        InsightsServiceError::Clustering(error) => {
            let payload = json!({ "error": format!("Analysis failed: {error}") });
            (StatusCode::BAD_REQUEST, Json(payload)).into_response()
        }
        other => internal_error(&other),
    }
}

pub(crate) async fn similarity_handler<R, H, C>(
    State(service): State<Arc<InsightsService<R, H, C>>>,
    headers: HeaderMap,
) -> Response
where
    R: AssessmentRepository + 'static,
    H: AnalysisRepository + 'static,
    C: Clusterer + 'static,
{
    let owner = match acting_user(&headers) {
        Ok(owner) => owner,
        Err(rejection) => return rejection.into_response(),
    };
    match service.similarity(&owner) {
        Ok(analysis) => {
            let payload = json!({
                "analysis_id": analysis.record.id,
                "insights": analysis.outcome.insights,
                "cluster_groups": analysis.outcome.cluster_groups,
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn predict_handler<R, H, C>(
    State(service): State<Arc<InsightsService<R, H, C>>>,
    headers: HeaderMap,
    payload: Result<Json<ScoreRequest>, JsonRejection>,
) -> Response
where
    R: AssessmentRepository + 'static,
    H: AnalysisRepository + 'static,
    C: Clusterer + 'static,
{
    let owner = match acting_user(&headers) {
        Ok(owner) => owner,
        Err(rejection) => return rejection.into_response(),
    };
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return bad_json(rejection),
    };
    match service.predict(&owner, request) {
        Ok(analysis) => {
            let prediction = analysis.outcome;
            let payload = json!({
                "analysis_id": analysis.record.id,
                "success_probability": prediction.success_probability,
                "recommendation": prediction.recommendation,
                "risk_factors": prediction.risk_factors,
                "confidence": prediction.confidence,
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn optimization_handler<R, H, C>(
    State(service): State<Arc<InsightsService<R, H, C>>>,
    headers: HeaderMap,
    payload: Result<Json<ScoreRequest>, JsonRejection>,
) -> Response
where
    R: AssessmentRepository + 'static,
    H: AnalysisRepository + 'static,
    C: Clusterer + 'static,
{
    let owner = match acting_user(&headers) {
        Ok(owner) => owner,
        Err(rejection) => return rejection.into_response(),
    };
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => return bad_json(rejection),
    };
    match service.optimize(&owner, request) {
        Ok(analysis) => {
            let buckets = analysis.outcome;
            let payload = json!({
                "analysis_id": analysis.record.id,
                "total_suggestions": buckets.total(),
                "high_priority_suggestions": buckets.high,
                "medium_priority_suggestions": buckets.medium,
                "low_priority_suggestions": buckets.low,
            });
            (StatusCode::OK, Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn history_handler<R, H, C>(
    State(service): State<Arc<InsightsService<R, H, C>>>,
    headers: HeaderMap,
) -> Response
where
    R: AssessmentRepository + 'static,
    H: AnalysisRepository + 'static,
    C: Clusterer + 'static,
{
    let owner = match acting_user(&headers) {
        Ok(owner) => owner,
        Err(rejection) => return rejection.into_response(),
    };
    match service.history(&owner) {
        Ok(records) => {
            let views: Vec<_> = records.iter().map(|record| record.view()).collect();
            (StatusCode::OK, Json(views)).into_response()
        }
        Err(error) => error_response(error),
    }
}
