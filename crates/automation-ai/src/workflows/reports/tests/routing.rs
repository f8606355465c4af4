use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::identity::USER_HEADER;
use crate::workflows::assessments::{AssessmentService, AssessmentServiceError};
use crate::workflows::reports::{report_router, ReportService};
use crate::workflows::testing::{input, owner, read_json_body, MemoryStore};

struct Harness {
    router: axum::Router,
    assessments: AssessmentService<MemoryStore, MemoryStore>,
}

fn harness() -> Harness {
    let store = Arc::new(MemoryStore::default());
    let reports = ReportService::new(store.clone(), store.clone(), 30);
    Harness {
        router: report_router(Arc::new(reports)),
        assessments: AssessmentService::new(store.clone(), store),
    }
}

fn request(method: Method, uri: &str, user: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(USER_HEADER, user);
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

fn seed(harness: &Harness, scores: &[[i64; 6]]) -> Result<Vec<u64>, AssessmentServiceError> {
    scores
        .iter()
        .map(|scores| {
            harness
                .assessments
                .create(&owner("alice"), input("Seeded", *scores))
                .map(|assessment| assessment.id.0)
        })
        .collect()
}

async fn create_report(harness: &Harness, ids: &[u64]) -> u64 {
    let response = harness
        .router
        .clone()
        .oneshot(request(
            Method::POST,
            "/api/v1/reports",
            "alice",
            Some(json!({ "title": "Q3 Finance", "assessment_ids": ids })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    read_json_body(response).await["id"].as_u64().unwrap()
}

#[tokio::test]
async fn create_returns_members_and_counts() {
    let harness = harness();
    let ids = seed(&harness, &[[5; 6], [3; 6], [1; 6]]).expect("seeded");

    let response = harness
        .router
        .clone()
        .oneshot(request(
            Method::POST,
            "/api/v1/reports",
            "alice",
            Some(json!({ "title": "Q3 Finance", "assessment_ids": ids })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json_body(response).await;
    assert_eq!(body["assessments"].as_array().map(Vec::len), Some(3));
    assert_eq!(body["highly_automatable_count"], 1);
    assert_eq!(body["possibly_automatable_count"], 1);
    assert_eq!(body["not_suitable_count"], 1);
    assert_eq!(body["ai_conclusion"], "");
}

#[tokio::test]
async fn blank_title_is_rejected() {
    let harness = harness();
    let response = harness
        .router
        .oneshot(request(
            Method::POST,
            "/api/v1/reports",
            "alice",
            Some(json!({ "title": "  " })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json_body(response).await["field"], "title");
}

#[tokio::test]
async fn conclusion_endpoint_returns_generated_text() {
    let harness = harness();
    let ids = seed(&harness, &[[5; 6], [5; 6], [3; 6]]).expect("seeded");
    let report_id = create_report(&harness, &ids).await;

    let response = harness
        .router
        .clone()
        .oneshot(request(
            Method::POST,
            &format!("/api/v1/reports/{report_id}/conclusion"),
            "alice",
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert!(body["ai_conclusion"]
        .as_str()
        .unwrap_or_default()
        .contains("(2/3 = 66.7%)"));
}

#[tokio::test]
async fn csv_download_sets_headers() {
    let harness = harness();
    let ids = seed(&harness, &[[5; 6], [2; 6]]).expect("seeded");
    let report_id = create_report(&harness, &ids).await;

    let response = harness
        .router
        .clone()
        .oneshot(request(
            Method::GET,
            &format!("/api/v1/reports/{report_id}/export/csv"),
            "alice",
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/csv");
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"Q3 Finance_report.csv\""
    );
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("body");
    let text = String::from_utf8(body.to_vec()).expect("utf-8");
    assert_eq!(text.lines().count(), 3);
}

#[tokio::test]
async fn pdf_download_sets_headers() {
    let harness = harness();
    let ids = seed(&harness, &[[4; 6]]).expect("seeded");
    let report_id = create_report(&harness, &ids).await;

    let response = harness
        .router
        .clone()
        .oneshot(request(
            Method::GET,
            &format!("/api/v1/reports/{report_id}/export/pdf"),
            "alice",
            None,
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
    let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
        .await
        .expect("body");
    assert!(body.starts_with(b"%PDF-1.4"));
}

#[tokio::test]
async fn foreign_report_is_not_found_on_every_route() {
    let harness = harness();
    let ids = seed(&harness, &[[4; 6]]).expect("seeded");
    let report_id = create_report(&harness, &ids).await;

    let routes = [
        (Method::GET, format!("/api/v1/reports/{report_id}"), None),
        (
            Method::PUT,
            format!("/api/v1/reports/{report_id}"),
            Some(json!({ "title": "Taken" })),
        ),
        (Method::DELETE, format!("/api/v1/reports/{report_id}"), None),
        (
            Method::POST,
            format!("/api/v1/reports/{report_id}/conclusion"),
            None,
        ),
        (
            Method::GET,
            format!("/api/v1/reports/{report_id}/export/csv"),
            None,
        ),
        (
            Method::GET,
            format!("/api/v1/reports/{report_id}/export/pdf"),
            None,
        ),
    ];

    for (method, uri, body) in routes {
        let response = harness
            .router
            .clone()
            .oneshot(request(method.clone(), &uri, "mallory", body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{method} {uri}");
    }
}

#[tokio::test]
async fn delete_then_get_is_not_found() {
    let harness = harness();
    let report_id = create_report(&harness, &[]).await;
    let uri = format!("/api/v1/reports/{report_id}");

    let deleted = harness
        .router
        .clone()
        .oneshot(request(Method::DELETE, &uri, "alice", None))
        .await
        .unwrap();
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

    let fetched = harness
        .router
        .clone()
        .oneshot(request(Method::GET, &uri, "alice", None))
        .await
        .unwrap();
    assert_eq!(fetched.status(), StatusCode::NOT_FOUND);
}
