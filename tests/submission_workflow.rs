//! End-to-end scenarios for the submission routing workflow, driven through
//! the public service facade and the HTTP router so lifecycle, routing, and
//! scheduling behavior is validated without reaching into private modules.

mod common {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::{header, Request};
    use axum::response::Response;
    use axum::Router;
    use serde_json::{json, Value};

    use broker_ai::workflows::submission::{
        submission_router, ApplicantSnapshot, ClassificationSnapshot, InMemorySubmissionStore,
        MappedFormOutput, OperationsSnapshot, PremisesSnapshot, RoutingConfig, SocialContextNotes,
        StaticDirectory, SubmissionService,
    };

    pub(super) fn mapped_output() -> MappedFormOutput {
        MappedFormOutput {
            applicant: Some(ApplicantSnapshot {
                legal_name: Some("Teddy's Tavern LLC".to_string()),
                dba: Some("Teddy's Tavern".to_string()),
            }),
            classification: Some(ClassificationSnapshot {
                industry_code: Some("722410".to_string()),
                description: Some("Neighborhood bar with live piano".to_string()),
            }),
            premises: Some(PremisesSnapshot {
                city: Some("Savannah".to_string()),
                state: Some("GA".to_string()),
            }),
            operations: Some(OperationsSnapshot {
                hazards: vec!["cooking equipment".to_string()],
                alcohol_sales_pct: Some(60.0),
                liquor_liability_required: true,
                live_entertainment: true,
            }),
            revenue: None,
            open_task_count: 2,
            social_context: SocialContextNotes {
                availability_notes: Some("Unavailable until Tuesday 1:00 PM".to_string()),
                ..SocialContextNotes::default()
            },
        }
    }

    pub(super) fn build_router() -> Router {
        let service = SubmissionService::new(
            Arc::new(InMemorySubmissionStore::default()),
            Arc::new(StaticDirectory::standard_panel()),
            RoutingConfig::default(),
        );
        submission_router(Arc::new(service))
    }

    pub(super) fn json_request(method: &str, uri: &str, payload: &Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(payload.to_string()))
            .expect("request builds")
    }

    pub(super) fn submit_request() -> Request<Body> {
        let payload = serde_json::to_value(mapped_output()).expect("mapped output serializes");
        json_request("POST", "/api/v1/submissions", &payload)
    }

    pub(super) fn event_request(uri: &str) -> Request<Body> {
        json_request("POST", uri, &json!({ "at": "2025-03-03T10:00:00" }))
    }

    pub(super) async fn read_json_body(response: Response) -> Value {
        let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("read body");
        serde_json::from_slice(&body).expect("json payload")
    }
}

use axum::http::StatusCode;
use serde_json::json;
use tower::ServiceExt;

use common::{build_router, event_request, json_request, read_json_body, submit_request};

#[tokio::test]
async fn submit_returns_accepted_status_view() {
    let router = build_router();

    let response = router
        .oneshot(submit_request())
        .await
        .expect("router responds");

    assert_eq!(response.status(), StatusCode::ACCEPTED);
    let body = read_json_body(response).await;
    assert_eq!(body["state"], "mapped");
    assert_eq!(body["business_name"], "Teddy's Tavern");
    assert_eq!(body["pending_tasks"], 2);
    assert_eq!(body["transitions"], 2);
}

#[tokio::test]
async fn full_workflow_reaches_acknowledged_over_http() {
    let router = build_router();

    let response = router
        .clone()
        .oneshot(submit_request())
        .await
        .expect("submit responds");
    let body = read_json_body(response).await;
    let id = body["submission_id"].as_str().expect("id present").to_string();
    let base = format!("/api/v1/submissions/{id}");

    let response = router
        .clone()
        .oneshot(json_request(
            "POST",
            &format!("{base}/route"),
            &json!({ "top_n": 3, "at": "2025-03-03T10:00:00" }),
        ))
        .await
        .expect("route responds");
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["state"], "routed");
    assert!(body["recommended_underwriter"].is_string());

    let response = router
        .clone()
        .oneshot(event_request(&format!("{base}/approve")))
        .await
        .expect("approve responds");
    assert_eq!(response.status(), StatusCode::OK);

    // Monday receipt, client out until Tuesday afternoon.
    let response = router
        .clone()
        .oneshot(event_request(&format!("{base}/schedule")))
        .await
        .expect("schedule responds");
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["state"], "scheduled");
    assert_eq!(body["scheduled_contact"], "2025-03-04T13:00:00");
    assert!(body["contact_reason"]
        .as_str()
        .expect("reason present")
        .contains("explicit availability"));

    let response = router
        .clone()
        .oneshot(event_request(&format!("{base}/dispatch")))
        .await
        .expect("dispatch responds");
    assert_eq!(response.status(), StatusCode::OK);

    let response = router
        .clone()
        .oneshot(event_request(&format!("{base}/acknowledge")))
        .await
        .expect("acknowledge responds");
    let body = read_json_body(response).await;
    assert_eq!(body["state"], "acknowledged");
    assert_eq!(body["transitions"], 7);

    let response = router
        .oneshot(
            axum::http::Request::builder()
                .method("GET")
                .uri(base)
                .body(axum::body::Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("status responds");
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json_body(response).await;
    assert_eq!(body["state"], "acknowledged");
}

#[tokio::test]
async fn out_of_order_event_returns_conflict() {
    let router = build_router();

    let response = router
        .clone()
        .oneshot(submit_request())
        .await
        .expect("submit responds");
    let body = read_json_body(response).await;
    let id = body["submission_id"].as_str().expect("id present").to_string();

    // Scheduling straight from `mapped` skips routing and approval.
    let response = router
        .oneshot(event_request(&format!("/api/v1/submissions/{id}/schedule")))
        .await
        .expect("schedule responds");

    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body = read_json_body(response).await;
    assert!(body["error"]
        .as_str()
        .expect("error present")
        .contains("invalid transition"));
}

#[tokio::test]
async fn unknown_submission_returns_not_found() {
    let router = build_router();

    let response = router
        .oneshot(
            axum::http::Request::builder()
                .method("GET")
                .uri("/api/v1/submissions/sub-does-not-exist")
                .body(axum::body::Body::empty())
                .expect("request builds"),
        )
        .await
        .expect("status responds");

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
