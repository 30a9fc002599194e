//! Router-level tests that need no running database.
//!
//! The pool is built lazily, so only routes that reach PostgreSQL would fail;
//! everything here is answered before that point.

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use serde_json::Value;
use shop_rs::api::middleware::REQUEST_ID_HEADER;
use shop_rs::api::routes::create_router;
use shop_rs::config::Settings;
use shop_rs::db::lazy_async_connection_pool;
use shop_rs::state::AppState;
use tempfile::TempDir;
use tower::ServiceExt;

const BOUNDARY: &str = "shop-rs-test-boundary";

fn test_app() -> (Router, TempDir) {
    let upload_dir = tempfile::tempdir().unwrap();

    let mut settings = Settings::default();
    settings.database.url = "postgres://postgres@127.0.0.1:1/shop_test".to_string();
    settings.database.connection_timeout = 1;
    settings.files.upload_dir = upload_dir.path().to_string_lossy().into_owned();
    settings.files.host_api = "http://localhost:3000/api".to_string();
    settings.files.max_file_size = 1024;

    let pool = lazy_async_connection_pool(&settings.database);
    let router = create_router(AppState::new(pool, settings.files.clone()));
    (router, upload_dir)
}

fn multipart_body(field: &str, file_name: &str, content_type: &str, contents: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\nContent-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(contents);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn upload_request(body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/files/product")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_upload_then_download_image() {
    let (app, _dir) = test_app();

    let response = app
        .clone()
        .oneshot(upload_request(multipart_body(
            "file",
            "shirt.png",
            "image/png",
            b"\x89PNG fake",
        )))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = json_body(response).await;
    let secure_url = json["secureUrl"].as_str().unwrap();
    let prefix = "http://localhost:3000/api/files/product/";
    assert!(secure_url.starts_with(prefix));
    let file_name = &secure_url[prefix.len()..];
    assert!(file_name.ends_with(".png"));

    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/api/files/product/{file_name}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");

    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    assert_eq!(&bytes[..], b"\x89PNG fake");
}

#[tokio::test]
async fn test_upload_rejects_non_image() {
    let (app, dir) = test_app();

    let response = app
        .oneshot(upload_request(multipart_body(
            "file",
            "notes.txt",
            "text/plain",
            b"hello",
        )))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = json_body(response).await;
    assert_eq!(json["message"], "Make sure that the file is an image");
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[tokio::test]
async fn test_upload_without_file_field() {
    let (app, _dir) = test_app();

    let response = app
        .oneshot(upload_request(multipart_body(
            "picture",
            "shirt.png",
            "image/png",
            b"png",
        )))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(response).await["message"],
        "Make sure that the file is an image"
    );
}

#[tokio::test]
async fn test_upload_over_size_limit() {
    let (app, _dir) = test_app();

    let response = app
        .oneshot(upload_request(multipart_body(
            "file",
            "big.png",
            "image/png",
            &vec![0u8; 4096],
        )))
        .await
        .unwrap();
    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn test_download_missing_image() {
    let (app, _dir) = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/files/product/missing.jpg")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = json_body(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["message"], "No product found with image missing.jpg");
    assert!(json["request_id"].is_string());
}

#[tokio::test]
async fn test_download_rejects_path_traversal() {
    let (app, _dir) = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/files/product/..%2F..%2Fetc%2Fpasswd")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_route_returns_json_error() {
    let (app, _dir) = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/nothing-here")
                .header(REQUEST_ID_HEADER, "req-42")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(response.headers()[REQUEST_ID_HEADER], "req-42");

    let json = json_body(response).await;
    assert_eq!(json["code"], "NOT_FOUND");
    assert_eq!(json["request_id"], "req-42");
}

#[tokio::test]
async fn test_create_product_validation_error() {
    let (app, _dir) = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/products")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    r#"{"title":"","sizes":["M"],"gender":"aliens","price":-1}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = json_body(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    let fields: Vec<&str> = json["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert!(fields.contains(&"title"));
    assert!(fields.contains(&"gender"));
    assert!(fields.contains(&"price"));
}

#[tokio::test]
async fn test_create_product_malformed_json() {
    let (app, _dir) = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/products")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from("{not json"))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_list_products_rejects_bad_pagination() {
    let (app, _dir) = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/products?limit=0&offset=-1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_product_requires_uuid() {
    let (app, _dir) = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .method("PATCH")
                .uri("/api/products/shirt")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"stock":3}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(response).await["message"],
        "Validation failed (uuid is expected): shirt"
    );
}

#[tokio::test]
async fn test_liveness_probe() {
    let (app, _dir) = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health/live")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key(REQUEST_ID_HEADER));
}

#[tokio::test]
async fn test_openapi_document_lists_routes() {
    let (app, _dir) = test_app();

    let response = app
        .oneshot(
            Request::builder()
                .uri("/api-docs/openapi.json")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let json = json_body(response).await;
    let paths = json["paths"].as_object().unwrap();
    assert!(paths.contains_key("/api/products/{term}"));
    assert!(paths.contains_key("/api/files/product"));
    assert!(paths.contains_key("/api/files/product/{image_name}"));
    assert!(paths.contains_key("/health/live"));
}
