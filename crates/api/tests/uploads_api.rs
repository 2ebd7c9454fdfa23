//! Integration tests for multipart uploads and serving the stored files.

mod common;

use axum::body::Body;
use axum::http::{Method, Request, Response, StatusCode};
use axum::Router;
use common::{body_bytes, body_json, get};
use tower::ServiceExt;

const BOUNDARY: &str = "folio-test-boundary";

fn multipart_body(field: &str, file_name: &str, content_type: &str, bytes: &[u8]) -> Vec<u8> {
    let mut body = format!(
        "--{BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n\
         Content-Type: {content_type}\r\n\r\n"
    )
    .into_bytes();
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

async fn upload(app: Router, body: Vec<u8>) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/uploads")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

#[tokio::test]
async fn image_is_stored_and_served_back() {
    let dir = tempfile::tempdir().unwrap();
    let app = common::build_test_app_with_config(common::test_config_with_uploads(dir.path(), 1024));

    let response = upload(
        app.clone(),
        multipart_body("file", "room 1.png", "image/png", b"\x89PNG-bytes"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let url = body_json(response).await["data"]["url"]
        .as_str()
        .unwrap()
        .to_string();
    assert!(url.starts_with("/uploads/"));
    assert!(url.ends_with("_room_1.png"));

    let served = get(app, &url).await;
    assert_eq!(served.status(), StatusCode::OK);
    assert_eq!(body_bytes(served).await, b"\x89PNG-bytes");
}

#[tokio::test]
async fn unsupported_type_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let app = common::build_test_app_with_config(common::test_config_with_uploads(dir.path(), 1024));

    let response = upload(app, multipart_body("file", "notes.txt", "text/plain", b"hi")).await;

    assert_eq!(response.status(), StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(body_json(response).await["code"], "UNSUPPORTED_MEDIA_TYPE");
}

#[tokio::test]
async fn oversized_file_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let app = common::build_test_app_with_config(common::test_config_with_uploads(dir.path(), 8));

    let response = upload(
        app,
        multipart_body("file", "scan.pdf", "application/pdf", &[b'x'; 32]),
    )
    .await;

    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(body_json(response).await["code"], "PAYLOAD_TOO_LARGE");
}

#[tokio::test]
async fn missing_file_field_is_a_bad_request() {
    let dir = tempfile::tempdir().unwrap();
    let app = common::build_test_app_with_config(common::test_config_with_uploads(dir.path(), 1024));

    let response = upload(app, multipart_body("other", "a.png", "image/png", b"x")).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
}
