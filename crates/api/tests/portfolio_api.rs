//! Integration tests for portfolio listing, form definitions, and step
//! validation.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, post_json, CLOSED_SLUG, EMPTY_SLUG, FORM_SLUG};
use serde_json::json;

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

#[tokio::test]
async fn list_returns_active_portfolios_in_order() {
    let app = common::build_test_app();
    let response = get(app, "/api/v1/portfolios").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let slugs: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["slug"].as_str().unwrap())
        .collect();
    assert_eq!(slugs, vec![FORM_SLUG, EMPTY_SLUG]);
}

// ---------------------------------------------------------------------------
// Form definition
// ---------------------------------------------------------------------------

#[tokio::test]
async fn definition_carries_questions_steps_and_parsed_options() {
    let app = common::build_test_app();
    let response = get(app, &format!("/api/v1/portfolios/{FORM_SLUG}")).await;

    assert_eq!(response.status(), StatusCode::OK);
    let data = body_json(response).await["data"].clone();

    assert_eq!(data["portfolio"]["slug"], FORM_SLUG);
    assert_eq!(data["is_configured"], true);
    assert_eq!(data["steps"], json!([1, 2]));
    assert_eq!(data["position"]["current_step"], 1);
    assert_eq!(data["position"]["progress_percent"], 50);
    assert_eq!(data["configuration_issues"], json!([]));

    let questions = data["questions"].as_array().unwrap();
    assert_eq!(questions.len(), 6);
    assert_eq!(questions[0]["id"], 10);
    assert_eq!(questions[0]["question_type"], "notice");
    assert!(questions[1]["parsed_options"].is_null());
    assert_eq!(questions[2]["parsed_options"]["kind"], "checkbox");
    assert_eq!(questions[2]["parsed_options"]["checkboxes"][1]["label"], "기타");
    assert_eq!(questions[4]["parsed_options"]["kind"], "repeatable");
}

#[tokio::test]
async fn inactive_portfolio_is_not_found() {
    let app = common::build_test_app();
    let response = get(app, &format!("/api/v1/portfolios/{CLOSED_SLUG}")).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");
}

#[tokio::test]
async fn portfolio_without_questions_is_not_configured() {
    let app = common::build_test_app();
    let response = get(app, &format!("/api/v1/portfolios/{EMPTY_SLUG}")).await;

    assert_eq!(response.status(), StatusCode::OK);
    let data = body_json(response).await["data"].clone();
    assert_eq!(data["is_configured"], false);
    assert!(data["position"].is_null());
    assert_eq!(data["questions"], json!([]));
}

// ---------------------------------------------------------------------------
// Step validation
// ---------------------------------------------------------------------------

#[tokio::test]
async fn empty_first_step_reports_required_questions_only() {
    let app = common::build_test_app();
    let response = post_json(
        app,
        &format!("/api/v1/portfolios/{FORM_SLUG}/steps/validate"),
        json!({"step": 1, "responses": {"11": "   "}}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let data = body_json(response).await["data"].clone();
    assert_eq!(data["valid"], false);
    assert_eq!(data["errors"]["11"]["kind"], "required");
    assert_eq!(data["errors"]["11"]["message"], "이 항목은 필수입니다.");
    assert_eq!(data["errors"]["12"]["kind"], "checkbox_empty");
    assert!(data["errors"].get("10").is_none());
    assert_eq!(data["position"]["current_step"], 1);
}

#[tokio::test]
async fn valid_step_advances_position() {
    let app = common::build_test_app();
    let response = post_json(
        app,
        &format!("/api/v1/portfolios/{FORM_SLUG}/steps/validate"),
        json!({
            "step": 1,
            "responses": {"11": "홍길동", "12": {"checked": ["기타"], "inputs": {}}},
        }),
    )
    .await;

    let data = body_json(response).await["data"].clone();
    assert_eq!(data["valid"], true);
    assert_eq!(data["errors"], json!({}));
    assert_eq!(data["position"]["current_step"], 2);
    assert_eq!(data["position"]["is_last_step"], true);
    assert_eq!(data["position"]["progress_percent"], 100);
}

#[tokio::test]
async fn last_step_is_validated_in_place() {
    let app = common::build_test_app();
    let response = post_json(
        app,
        &format!("/api/v1/portfolios/{FORM_SLUG}/steps/validate"),
        json!({"step": 2, "responses": {"14": [], "15": {"agreed": false}}}),
    )
    .await;

    let data = body_json(response).await["data"].clone();
    assert_eq!(data["valid"], false);
    assert_eq!(data["errors"]["14"]["message"], "최소 하나 이상 입력해주세요.");
    assert_eq!(data["errors"]["15"]["kind"], "agreement_required");
    assert!(data["errors"].get("13").is_none());
    assert_eq!(data["position"]["current_step"], 2);
}

#[tokio::test]
async fn out_of_range_step_is_clamped() {
    let app = common::build_test_app();
    let response = post_json(
        app,
        &format!("/api/v1/portfolios/{FORM_SLUG}/steps/validate"),
        json!({"step": 40, "responses": {}}),
    )
    .await;

    let data = body_json(response).await["data"].clone();
    assert_eq!(data["position"]["current_step"], 2);
}

#[tokio::test]
async fn validating_unconfigured_portfolio_is_rejected() {
    let app = common::build_test_app();
    let response = post_json(
        app,
        &format!("/api/v1/portfolios/{EMPTY_SLUG}/steps/validate"),
        json!({"step": 1, "responses": {}}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(response).await["code"], "NOT_CONFIGURED");
}

#[tokio::test]
async fn malformed_response_keys_are_rejected() {
    let app = common::build_test_app();
    let response = post_json(
        app,
        &format!("/api/v1/portfolios/{FORM_SLUG}/steps/validate"),
        json!({"step": 1, "responses": {"note": "not a question"}}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}
