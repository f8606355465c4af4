use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::identity::USER_HEADER;
use crate::workflows::assessments::{assessment_router, AssessmentService};
use crate::workflows::testing::{read_json_body, MemoryStore, UnavailableStore};

fn router() -> axum::Router {
    let store = MemoryStore::default();
    let service = AssessmentService::new(Arc::new(store.clone()), Arc::new(store));
    assessment_router(Arc::new(service))
}

fn request(method: Method, uri: &str, user: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(user) = user {
        builder = builder.header(USER_HEADER, user);
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_vec(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

fn payload(name: &str, score: i64) -> Value {
    json!({
        "process_name": name,
        "department": "Finance",
        "repetitiveness_score": score,
        "rule_based_score": score,
        "complexity_score": score,
        "volume_score": score,
        "standardization_score": score,
        "current_errors_score": score,
        "implementation_effort": "medium"
    })
}

#[tokio::test]
async fn create_returns_derived_fields() {
    let response = router()
        .oneshot(request(
            Method::POST,
            "/api/v1/assessments",
            Some("alice"),
            Some(payload("Invoice matching", 4)),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json_body(response).await;
    assert_eq!(body["total_score"], 24);
    assert_eq!(body["automation_suitability"], "highly_automatable");
    assert_eq!(body["automation_suitability_display"], "Highly Automatable");
    assert_eq!(body["priority"], "high");
    assert_eq!(body["priority_display"], "High");
    assert_eq!(body["implementation_effort_display"], "Medium (1-2 months)");
    assert_eq!(body["assessed_by"], "alice");
}

#[tokio::test]
async fn derived_fields_in_payload_are_ignored() {
    let mut body = payload("Sneaky", 1);
    body["total_score"] = json!(30);
    body["automation_suitability"] = json!("highly_automatable");

    let response = router()
        .oneshot(request(Method::POST, "/api/v1/assessments", Some("alice"), Some(body)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json_body(response).await;
    assert_eq!(body["total_score"], 6);
    assert_eq!(body["automation_suitability"], "not_suitable");
}

#[tokio::test]
async fn missing_identity_is_unauthorized() {
    let response = router()
        .oneshot(request(Method::GET, "/api/v1/assessments", None, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn out_of_range_score_is_bad_request_with_field() {
    let mut body = payload("Broken", 3);
    body["volume_score"] = json!(7);

    let response = router()
        .oneshot(request(Method::POST, "/api/v1/assessments", Some("alice"), Some(body)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json_body(response).await;
    assert_eq!(body["field"], "volume_score");
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/assessments")
        .header(USER_HEADER, "alice")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"process_name\": "))
        .unwrap();

    let response = router().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = read_json_body(response).await;
    assert!(body["error"]
        .as_str()
        .unwrap_or_default()
        .starts_with("malformed request body"));
}

#[tokio::test]
async fn foreign_assessment_is_not_found() {
    let app = router();
    let created = app
        .clone()
        .oneshot(request(
            Method::POST,
            "/api/v1/assessments",
            Some("alice"),
            Some(payload("Private", 3)),
        ))
        .await
        .unwrap();
    let id = read_json_body(created).await["id"].as_u64().unwrap();

    for method in [Method::GET, Method::DELETE] {
        let response = app
            .clone()
            .oneshot(request(
                method,
                &format!("/api/v1/assessments/{id}"),
                Some("bob"),
                None,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    let response = app
        .oneshot(request(
            Method::PUT,
            &format!("/api/v1/assessments/{id}"),
            Some("bob"),
            Some(payload("Hijack", 5)),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn bulk_create_reports_count_and_rejects_partial_batches() {
    let app = router();

    let mut bad = payload("Bad", 3);
    bad["rule_based_score"] = json!(0);
    let rejected = app
        .clone()
        .oneshot(request(
            Method::POST,
            "/api/v1/assessments/bulk",
            Some("alice"),
            Some(json!({ "processes": [payload("Good", 3), bad] })),
        ))
        .await
        .unwrap();
    assert_eq!(rejected.status(), StatusCode::BAD_REQUEST);
    let body = read_json_body(rejected).await;
    assert_eq!(body["field"], "processes[1].rule_based_score");

    let listed = app
        .clone()
        .oneshot(request(Method::GET, "/api/v1/assessments", Some("alice"), None))
        .await
        .unwrap();
    assert_eq!(read_json_body(listed).await, json!([]));

    let accepted = app
        .oneshot(request(
            Method::POST,
            "/api/v1/assessments/bulk",
            Some("alice"),
            Some(json!({ "processes": [payload("One", 2), payload("Two", 5)] })),
        ))
        .await
        .unwrap();
    assert_eq!(accepted.status(), StatusCode::CREATED);
    let body = read_json_body(accepted).await;
    assert_eq!(body["message"], "Successfully created 2 assessments");
    assert_eq!(body["processes"].as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn dashboard_stats_aggregate_own_assessments() {
    let app = router();
    for (name, score) in [("A", 5), ("B", 3), ("C", 1)] {
        app.clone()
            .oneshot(request(
                Method::POST,
                "/api/v1/assessments",
                Some("alice"),
                Some(payload(name, score)),
            ))
            .await
            .unwrap();
    }

    let response = app
        .oneshot(request(Method::GET, "/api/v1/dashboard/stats", Some("alice"), None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["total_processes"], 3);
    assert_eq!(body["highly_automatable"], 1);
    assert_eq!(body["possibly_automatable"], 1);
    assert_eq!(body["not_suitable"], 1);
    assert_eq!(body["average_score"], 18.0);
    assert_eq!(body["total_estimated_savings"], 0.0);
}

#[tokio::test]
async fn repository_outage_is_internal_error_without_detail() {
    let service = AssessmentService::new(
        Arc::new(UnavailableStore),
        Arc::new(MemoryStore::default()),
    );
    let response = assessment_router(Arc::new(service))
        .oneshot(request(
            Method::POST,
            "/api/v1/assessments",
            Some("alice"),
            Some(payload("Payroll", 3)),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = read_json_body(response).await;
    assert_eq!(body["error"], "internal server error");
}

#[tokio::test]
async fn patch_changes_only_sent_fields_and_reclassifies() {
    let app = router();
    let response = app
        .clone()
        .oneshot(request(
            Method::POST,
            "/api/v1/assessments",
            Some("alice"),
            Some(payload("Vendor onboarding", 3)),
        ))
        .await
        .unwrap();
    let created = read_json_body(response).await;
    assert_eq!(created["total_score"], 18);
    let uri = format!("/api/v1/assessments/{}", created["id"]);

    let response = app
        .clone()
        .oneshot(request(
            Method::PATCH,
            &uri,
            Some("alice"),
            Some(json!({ "volume_score": 5, "rule_based_score": 5, "complexity_score": 5 })),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["total_score"], 24);
    assert_eq!(body["automation_suitability"], "highly_automatable");
    assert_eq!(body["process_name"], "Vendor onboarding");
    assert_eq!(body["department"], "Finance");
    assert_eq!(body["repetitiveness_score"], 3);

    let response = app
        .clone()
        .oneshot(request(
            Method::PATCH,
            &uri,
            Some("alice"),
            Some(json!({ "department": "d".repeat(101) })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json_body(response).await["field"], "department");

    let response = app
        .oneshot(request(
            Method::PATCH,
            &uri,
            Some("bob"),
            Some(json!({ "volume_score": 1 })),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn dashboard_savings_are_summed_to_the_cent() {
    let app = router();
    for (name, savings) in [("First", 0.1), ("Second", 0.2)] {
        let mut body = payload(name, 3);
        body["estimated_cost_savings"] = json!(savings);
        let response = app
            .clone()
            .oneshot(request(Method::POST, "/api/v1/assessments", Some("alice"), Some(body)))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let response = app
        .clone()
        .oneshot(request(Method::GET, "/api/v1/dashboard/stats", Some("alice"), None))
        .await
        .unwrap();
    let body = read_json_body(response).await;
    assert_eq!(body["total_estimated_savings"].to_string(), "0.3");

    let mut body = payload("Fractional", 3);
    body["estimated_cost_savings"] = json!(10.005);
    let response = app
        .oneshot(request(Method::POST, "/api/v1/assessments", Some("alice"), Some(body)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(read_json_body(response).await["field"], "estimated_cost_savings");
}
