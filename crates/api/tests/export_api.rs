//! Integration tests for the admin CSV export.

mod common;

use axum::http::StatusCode;
use axum::Router;
use common::{body_bytes, body_json, complete_responses, get, get_with_token, post_json, token_for, FORM_SLUG};
use serde_json::{json, Value};

fn export_uri() -> String {
    format!("/api/v1/admin/portfolios/{FORM_SLUG}/export")
}

async fn submit(app: Router, company: &str, responses: Value, is_draft: bool) {
    let response = post_json(
        app,
        &format!("/api/v1/portfolios/{FORM_SLUG}/submissions"),
        json!({
            "companyName": company,
            "password": "1234",
            "responses": responses,
            "isDraft": is_draft,
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

// ---------------------------------------------------------------------------
// Access control
// ---------------------------------------------------------------------------

#[tokio::test]
async fn export_requires_a_token() {
    let app = common::build_test_app();
    let response = get(app, &export_uri()).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(body_json(response).await["code"], "UNAUTHORIZED");
}

#[tokio::test]
async fn export_requires_an_admin_role() {
    let app = common::build_test_app();
    let response = get_with_token(app, &export_uri(), &token_for("MEMBER")).await;

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

// ---------------------------------------------------------------------------
// Content
// ---------------------------------------------------------------------------

#[tokio::test]
async fn drafts_alone_export_nothing() {
    let app = common::build_test_app();
    submit(app.clone(), "스테이", json!({"11": "홍길동"}), true).await;

    let response = get_with_token(app, &export_uri(), &token_for("ADMIN")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn final_submissions_export_as_csv_with_room_columns() {
    let app = common::build_test_app();
    submit(app.clone(), "스테이 한옥", complete_responses(), false).await;

    let response = get_with_token(app, &export_uri(), &token_for("SUPER_ADMIN")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let headers = response.headers();
    assert_eq!(headers["content-type"], "text/csv; charset=utf-8");
    let disposition = headers["content-disposition"].to_str().unwrap();
    assert!(disposition.starts_with("attachment; filename=\"accommodation-info_submissions_"));

    let bytes = body_bytes(response).await;
    assert!(bytes.starts_with(b"\xEF\xBB\xBF"));
    let text = String::from_utf8(bytes[3..].to_vec()).unwrap();
    let mut lines = text.split("\r\n");
    assert_eq!(
        lines.next().unwrap(),
        "순번,상호명,안내,대표자명,숙소 유형,담당자,개인정보 수집 동의,\
         객실1 이름,객실1 설명,객실1 형태,객실1 요금"
    );
    assert_eq!(
        lines.next().unwrap(),
        "1,스테이 한옥,,홍길동,호텔,김담당,동의함,디럭스,,더블,100000"
    );
}
