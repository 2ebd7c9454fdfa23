//! Shared helpers for the HTTP integration tests.
//!
//! Every test app runs the production router over a [`MemoryFormStore`]
//! seeded with [`seed_store`], so no database is needed.

#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use folio_api::auth::jwt::{Claims, JwtConfig};
use folio_api::config::{ServerConfig, UploadConfig};
use folio_api::router::build_app_router;
use folio_api::state::AppState;
use folio_api::storage::LocalDiskUploader;
use folio_core::collection::CollectionSchema;
use folio_core::schema::{Portfolio, Question, QuestionType};
use folio_core::store::MemoryFormStore;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

pub const FORM_SLUG: &str = "accommodation-info";
pub const EMPTY_SLUG: &str = "empty-portfolio";
pub const CLOSED_SLUG: &str = "closed-portfolio";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    test_config_with_uploads(&std::env::temp_dir().join("folio-api-tests"), 1024 * 1024)
}

pub fn test_config_with_uploads(dir: &Path, max_bytes: usize) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 5,
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
        },
        upload: UploadConfig {
            dir: dir.to_path_buf(),
            public_base: "/uploads".to_string(),
            max_bytes,
        },
    }
}

fn portfolio(id: i64, slug: &str, title: &str, is_active: bool) -> Portfolio {
    Portfolio {
        id,
        title: title.to_string(),
        description: None,
        slug: slug.to_string(),
        is_active,
        order: id as i32,
        collections: Vec::new(),
    }
}

/// Seed three portfolios:
///
/// - `accommodation-info`: two steps of questions plus the rooms collection
/// - `empty-portfolio`: active, no questions
/// - `closed-portfolio`: inactive
pub fn seed_store() -> MemoryFormStore {
    let store = MemoryFormStore::new();

    let mut form = portfolio(1, FORM_SLUG, "숙소 정보 등록", true);
    form.collections = vec![CollectionSchema::rooms()];
    store
        .insert_portfolio(
            form,
            vec![
                Question::new(10, 1, 1, "안내", QuestionType::Notice),
                Question::new(11, 1, 2, "대표자명", QuestionType::Text).required(),
                Question::new(12, 1, 3, "숙소 유형", QuestionType::Checkbox)
                    .required()
                    .with_options(
                        r#"{"checkboxes":[{"label":"호텔"},{"label":"기타","hasInput":true}]}"#,
                    ),
                Question::new(13, 2, 1, "사업자등록증", QuestionType::File),
                Question::new(14, 2, 2, "담당자", QuestionType::Repeatable)
                    .required()
                    .with_options(r#"{"fields":[{"label":"이름","type":"text"}]}"#),
                Question::new(15, 2, 3, "개인정보 수집 동의", QuestionType::Agreement).required(),
            ],
        )
        .unwrap();

    store
        .insert_portfolio(portfolio(2, EMPTY_SLUG, "준비 중", true), Vec::new())
        .unwrap();

    store
        .insert_portfolio(
            portfolio(3, CLOSED_SLUG, "마감", false),
            vec![Question::new(30, 1, 1, "소개", QuestionType::Textarea)],
        )
        .unwrap();

    store
}

/// Build the full application router over a freshly seeded store.
pub fn build_test_app() -> Router {
    build_test_app_with_config(test_config())
}

pub fn build_test_app_with_config(config: ServerConfig) -> Router {
    let state = AppState {
        store: Arc::new(seed_store()),
        uploader: Arc::new(LocalDiskUploader::new(&config.upload)),
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

/// Bearer token for `role`, signed with the test secret the way the admin
/// service issues them.
pub fn token_for(role: &str) -> String {
    let now = chrono::Utc::now().timestamp();
    let claims = Claims {
        sub: 1,
        role: role.to_string(),
        exp: now + 15 * 60,
        iat: now,
        jti: uuid::Uuid::new_v4().to_string(),
    };
    jsonwebtoken::encode(
        &jsonwebtoken::Header::default(),
        &claims,
        &jsonwebtoken::EncodingKey::from_secret(test_config().jwt.secret.as_bytes()),
    )
    .unwrap()
}

/// A complete set of answers for `accommodation-info`, with one room.
pub fn complete_responses() -> Value {
    json!({
        "11": "홍길동",
        "12": {"checked": ["호텔"], "inputs": {}},
        "14": [{"이름": "김담당"}],
        "15": {"agreed": true},
        "rooms": [{"name": "디럭스", "desc": "", "type": "더블", "price": "100000"}],
    })
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn get_with_token(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .header("authorization", format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
