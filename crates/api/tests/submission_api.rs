//! Integration tests for saving, resuming, and looking up submissions.

mod common;

use axum::http::StatusCode;
use axum::Router;
use common::{body_json, complete_responses, post_json, EMPTY_SLUG, FORM_SLUG};
use serde_json::{json, Value};

fn submissions_uri() -> String {
    format!("/api/v1/portfolios/{FORM_SLUG}/submissions")
}

async fn save(app: Router, company: &str, pin: &str, responses: Value, is_draft: bool) -> Value {
    let response = post_json(
        app,
        &submissions_uri(),
        json!({
            "companyName": company,
            "password": pin,
            "responses": responses,
            "isDraft": is_draft,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["data"].clone()
}

async fn check(app: Router, company: &str, pin: &str) -> (StatusCode, Value) {
    let response = post_json(
        app,
        &format!("{}/check", submissions_uri()),
        json!({"companyName": company, "password": pin}),
    )
    .await;
    let status = response.status();
    (status, body_json(response).await)
}

// ---------------------------------------------------------------------------
// Drafts and resume
// ---------------------------------------------------------------------------

#[tokio::test]
async fn draft_is_stored_without_validation_and_resumable() {
    let app = common::build_test_app();

    let saved = save(app.clone(), " 스테이 한옥 ", "1234", json!({"11": ""}), true).await;
    assert_eq!(saved["company_name"], "스테이 한옥");
    assert_eq!(saved["is_draft"], true);
    assert!(saved["completed_at"].is_null());
    assert!(saved.get("pin_hash").is_none());
    assert!(saved.get("ip_address").is_none());

    let (status, json) = check(app, "스테이 한옥", "1234").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["id"], saved["id"]);
    assert_eq!(json["data"]["responses"]["11"], "");
}

#[tokio::test]
async fn check_for_new_company_returns_null() {
    let app = common::build_test_app();
    let (status, json) = check(app, "처음 방문", "1234").await;

    assert_eq!(status, StatusCode::OK);
    assert!(json["data"].is_null());
}

#[tokio::test]
async fn check_with_wrong_pin_is_unauthorized() {
    let app = common::build_test_app();
    save(app.clone(), "스테이", "1234", json!({}), true).await;

    let (status, json) = check(app, "스테이", "9999").await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["error"], "비밀번호가 일치하지 않습니다.");
}

#[tokio::test]
async fn saving_twice_updates_the_same_row() {
    let app = common::build_test_app();

    let first = save(app.clone(), "스테이", "1234", json!({"11": "가"}), true).await;
    let second = save(app, "스테이", "1234", json!({"11": "나"}), true).await;

    assert_eq!(first["id"], second["id"]);
    assert_eq!(second["responses"]["11"], "나");
}

#[tokio::test]
async fn malformed_pin_is_rejected_before_storage() {
    let app = common::build_test_app();
    let response = post_json(
        app,
        &submissions_uri(),
        json!({"companyName": "스테이", "password": "12a4", "responses": {}, "isDraft": true}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["error"],
        "4자리 숫자 비밀번호를 입력해주세요."
    );
}

#[tokio::test]
async fn unknown_question_ids_are_rejected() {
    let app = common::build_test_app();
    let response = post_json(
        app,
        &submissions_uri(),
        json!({"companyName": "스테이", "password": "1234", "responses": {"999": "x"}, "isDraft": true}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn unconfigured_portfolio_cannot_be_saved() {
    let app = common::build_test_app();
    let response = post_json(
        app,
        &format!("/api/v1/portfolios/{EMPTY_SLUG}/submissions"),
        json!({"companyName": "스테이", "password": "1234", "responses": {}, "isDraft": true}),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body_json(response).await["code"], "NOT_CONFIGURED");
}

// ---------------------------------------------------------------------------
// Final submit
// ---------------------------------------------------------------------------

#[tokio::test]
async fn incomplete_final_submit_returns_field_errors() {
    let app = common::build_test_app();
    let response = post_json(
        app,
        &submissions_uri(),
        json!({
            "companyName": "스테이",
            "password": "1234",
            "responses": {"11": "홍길동"},
            "isDraft": false,
        }),
    )
    .await;

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    let fields = json["fields"].as_object().unwrap();
    let ids: Vec<&str> = fields.keys().map(String::as_str).collect();
    assert_eq!(ids, vec!["12", "14", "15"]);
}

#[tokio::test]
async fn complete_final_submit_is_stamped() {
    let app = common::build_test_app();

    save(app.clone(), "스테이", "1234", json!({"11": "홍길동"}), true).await;
    let saved = save(app, "스테이", "1234", complete_responses(), false).await;

    assert_eq!(saved["is_draft"], false);
    assert!(saved["completed_at"].is_string());
    assert_eq!(saved["responses"]["rooms"][0]["name"], "디럭스");
}

// ---------------------------------------------------------------------------
// Lookup
// ---------------------------------------------------------------------------

#[tokio::test]
async fn lookup_returns_matching_submissions_with_portfolio() {
    let app = common::build_test_app();
    save(app.clone(), "스테이", "1234", json!({}), true).await;

    let response = post_json(
        app.clone(),
        "/api/v1/submissions/lookup",
        json!({"companyName": "스테이", "password": "1234"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let entries = body_json(response).await["data"].clone();
    assert_eq!(entries.as_array().unwrap().len(), 1);
    assert_eq!(entries[0]["portfolio"]["slug"], FORM_SLUG);
    assert_eq!(entries[0]["company_name"], "스테이");
    assert!(entries[0].get("pin_hash").is_none());

    let response = post_json(
        app,
        "/api/v1/submissions/lookup",
        json!({"companyName": "스테이", "password": "0000"}),
    )
    .await;
    assert_eq!(body_json(response).await["data"], json!([]));
}
