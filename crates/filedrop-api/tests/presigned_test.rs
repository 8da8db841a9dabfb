//! Presigned URL endpoint integration tests.
//!
//! Run with: `cargo test -p filedrop-api --test presigned_test`
//!
//! The test backend is LocalStorage, which cannot mint presigned credentials,
//! so the fully-valid case exercises the 500 configuration path; all
//! validation failures are checked before storage is touched.

mod helpers;

use helpers::setup_test_app;
use serde_json::json;

#[tokio::test]
async fn presigned_request_with_missing_fields_rejected() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/api/v0/uploads/presigned")
        .json(&json!({ "fileName": "plan.docx" }))
        .await;

    assert_eq!(response.status_code(), 400);
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn presigned_request_with_non_numeric_size_rejected() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/api/v0/uploads/presigned")
        .json(&json!({
            "fileName": "plan.docx",
            "fileType": "application/pdf",
            "fileSize": "big"
        }))
        .await;

    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn presigned_request_for_empty_file_rejected() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/api/v0/uploads/presigned")
        .json(&json!({
            "fileName": "plan.docx",
            "fileType":
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
            "fileSize": 0
        }))
        .await;

    assert_eq!(response.status_code(), 400);
    let body: serde_json::Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("Empty"));
}

#[tokio::test]
async fn presigned_request_for_oversized_file_rejected() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/api/v0/uploads/presigned")
        .json(&json!({
            "fileName": "photo.jpg",
            "fileType": "image/jpeg",
            "fileSize": 6 * 1024 * 1024
        }))
        .await;

    assert_eq!(response.status_code(), 400);
    let body: serde_json::Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("5 MB"));
}

#[tokio::test]
async fn presigned_request_for_bad_extension_rejected() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/api/v0/uploads/presigned")
        .json(&json!({
            "fileName": "setup.exe",
            "fileType": "application/pdf",
            "fileSize": 1024
        }))
        .await;

    assert_eq!(response.status_code(), 400);
}

#[tokio::test]
async fn presigned_request_with_unknown_mime_rejected() {
    let app = setup_test_app().await;

    // The declared type is signed into the credential, so unlike the
    // server-proxied path an unknown MIME is a hard failure here.
    let response = app
        .client()
        .post("/api/v0/uploads/presigned")
        .json(&json!({
            "fileName": "plan.docx",
            "fileType": "application/octet-stream",
            "fileSize": 1024
        }))
        .await;

    assert_eq!(response.status_code(), 400);
    let body: serde_json::Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("Content type"));
}

#[tokio::test]
async fn presigned_request_on_local_backend_is_config_error() {
    let app = setup_test_app().await;

    let response = app
        .client()
        .post("/api/v0/uploads/presigned")
        .json(&json!({
            "fileName": "plan.docx",
            "fileType":
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
            "fileSize": 1_000_000
        }))
        .await;

    assert_eq!(response.status_code(), 500);
    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], false);
    // Generic configuration message only; backend details stay server-side.
    assert!(!body["error"].as_str().unwrap().contains("S3"));
}
