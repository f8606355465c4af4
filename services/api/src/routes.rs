use crate::infra::{AppState, InMemoryStore};
use automation_ai::config::AppConfig;
use automation_ai::error::AppError;
use automation_ai::workflows::assessments::{assessment_router, AssessmentService};
use automation_ai::workflows::automation::{automation_router, AutomationService};
use automation_ai::workflows::categories::{category_router, CategoryService};
use automation_ai::workflows::insights::{insights_router, InsightsService, KMeansClusterer};
use automation_ai::workflows::reports::{report_router, ReportService};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde_json::json;
use std::sync::Arc;

/// Wire every workflow router against one store, plus the operational endpoints.
/// Default automation templates are seeded into the store on the way.
pub(crate) fn app_router(
    store: Arc<InMemoryStore>,
    config: &AppConfig,
) -> Result<axum::Router, AppError> {
    let assessments = Arc::new(AssessmentService::new(store.clone(), store.clone()));
    let reports = Arc::new(ReportService::new(
        store.clone(),
        store.clone(),
        config.export.rows_per_page,
    ));
    let insights = Arc::new(InsightsService::new(
        store.clone(),
        store.clone(),
        KMeansClusterer::default(),
        config.insights.max_clusters,
    ));
    let categories = Arc::new(CategoryService::new(store.clone()));
    let automation = AutomationService::new(store.clone(), store);
    automation.seed_defaults()?;

    Ok(assessment_router(assessments)
        .merge(report_router(reports))
        .merge(insights_router(insights))
        .merge(category_router(categories))
        .merge(automation_router(Arc::new(automation)))
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint)))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}
