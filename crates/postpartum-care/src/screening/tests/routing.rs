use std::sync::Arc;

use axum::http::{Method, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use super::common::*;
use crate::screening::{screening_router, ScreeningService};

#[tokio::test]
async fn question_bank_is_public() {
    let (service, _) = build_service();
    let router = screening_router(Arc::new(service));

    let response = router
        .clone()
        .oneshot(json_request(
            Method::GET,
            "/api/v1/screening/questions",
            None,
            None,
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    let questions = payload.as_array().expect("array");
    assert_eq!(questions.len(), 10);
    assert_eq!(questions[9]["number"], json!(10));
    assert_eq!(questions[0]["options"].as_array().map(Vec::len), Some(4));

    let response = router
        .oneshot(json_request(
            Method::GET,
            "/api/v1/screening/questions/11",
            None,
            None,
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn submit_returns_result_view() {
    let (service, _) = build_service();
    let router = screening_router(Arc::new(service));

    let response = router
        .oneshot(json_request(
            Method::POST,
            "/api/v1/screening/sessions",
            Some(signed_in(MAYA)),
            Some(Value::Object(form([2, 2, 2, 1, 1, 1, 0, 0, 1, 0]))),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    assert_eq!(payload["total_score"], json!(10));
    assert_eq!(payload["max_score"], json!(30));
    assert_eq!(payload["result_category"], json!("ppd"));
    assert_eq!(payload["urgent"], json!(false));
    assert_eq!(payload["responses"].as_array().map(Vec::len), Some(10));
    assert!(payload.get("emergency_contacts").is_none());
}

#[tokio::test]
async fn urgent_results_include_emergency_contacts() {
    let (service, _) = build_service();
    let router = screening_router(Arc::new(service));

    let response = router
        .oneshot(json_request(
            Method::POST,
            "/api/v1/screening/sessions",
            Some(signed_in(MAYA)),
            Some(json!({ "answers": form([0, 0, 0, 0, 0, 0, 0, 0, 0, 1]) })),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;
    assert_eq!(payload["result_category"], json!("psychosis_warning"));
    assert_eq!(payload["urgent"], json!(true));
    assert_eq!(
        payload["emergency_contacts"][0]["number"],
        json!("988")
    );
}

#[tokio::test]
async fn incomplete_submission_names_the_question() {
    let (service, _) = build_service();
    let router = screening_router(Arc::new(service));

    let mut fields = form([0; 10]);
    fields.remove("q10");
    fields.insert("q4".to_string(), json!("3"));

    let response = router
        .oneshot(json_request(
            Method::POST,
            "/api/v1/screening/sessions",
            Some(signed_in(MAYA)),
            Some(Value::Object(fields)),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert_eq!(payload["question"], json!(10));
}

#[tokio::test]
async fn unknown_field_is_unprocessable() {
    let (service, _) = build_service();
    let router = screening_router(Arc::new(service));

    let mut fields = form([0; 10]);
    fields.insert("q11".to_string(), json!(1));

    let response = router
        .oneshot(json_request(
            Method::POST,
            "/api/v1/screening/sessions",
            Some(signed_in(MAYA)),
            Some(Value::Object(fields)),
        ))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let payload = read_json_body(response).await;
    assert!(payload.get("question").is_none());
}

#[tokio::test]
async fn sessions_require_sign_in() {
    let (service, _) = build_service();
    let router = screening_router(Arc::new(service));

    let response = router
        .oneshot(json_request(
            Method::GET,
            "/api/v1/screening/sessions",
            None,
            None,
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn session_lookup_is_scoped_to_owner() {
    let (service, _) = build_service();
    let service = Arc::new(service);
    let record = service
        .submit(MAYA, &sheet([1; 10]))
        .await
        .expect("submits");
    let router = screening_router(service);
    let uri = format!("/api/v1/screening/sessions/{}", record.session.id.0);

    let own = router
        .clone()
        .oneshot(json_request(Method::GET, &uri, Some(signed_in(MAYA)), None))
        .await
        .expect("route executes");
    assert_eq!(own.status(), StatusCode::OK);
    let payload = read_json_body(own).await;
    assert_eq!(payload["responses"][0]["answer_value"], json!(1));
    assert!(payload["responses"][0]["prompt"].is_string());

    let other = router
        .oneshot(json_request(Method::GET, &uri, Some(signed_in(NOOR)), None))
        .await
        .expect("route executes");
    assert_eq!(other.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn repository_failure_is_internal_error() {
    let router = screening_router(Arc::new(ScreeningService::new(Arc::new(
        UnavailableRepository,
    ))));

    let response = router
        .oneshot(json_request(
            Method::POST,
            "/api/v1/screening/sessions",
            Some(signed_in(MAYA)),
            Some(Value::Object(form([0; 10]))),
        ))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
