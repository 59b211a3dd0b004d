//! Upload Integration Tests
//!
//! Run with: cargo test -p messenger-integration-tests --test upload_tests

use messenger_integration_tests::{assert_json, assert_status, TestServer};
use reqwest::{multipart, StatusCode};
use serde_json::Value;

#[tokio::test]
async fn test_upload_and_fetch_file() {
    let server = TestServer::start().await.expect("Failed to start server");
    let bytes = b"\x89PNG fake image".to_vec();

    let response = server
        .upload("cat.png", "image/png", bytes.clone())
        .await
        .unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();

    let url = body["url"].as_str().unwrap();
    assert!(url.starts_with("/uploads/"));
    assert!(url.ends_with(".png"));
    assert_eq!(body["type"], "image/png");
    assert_eq!(body["size"], bytes.len());

    let stored = server.upload_dir.join(url.trim_start_matches("/uploads/"));
    assert!(stored.is_file());

    let fetched = server.get(url).await.unwrap();
    assert_eq!(fetched.status(), StatusCode::OK);
    assert_eq!(fetched.bytes().await.unwrap().as_ref(), bytes.as_slice());
}

#[tokio::test]
async fn test_upload_without_extension_gets_bin() {
    let server = TestServer::start().await.unwrap();

    let response = server
        .upload("notes", "application/octet-stream", b"plain".to_vec())
        .await
        .unwrap();
    let body: Value = assert_json(response, StatusCode::OK).await.unwrap();

    assert!(body["url"].as_str().unwrap().ends_with(".bin"));
}

#[tokio::test]
async fn test_upload_without_file_field() {
    let server = TestServer::start().await.unwrap();

    let form = multipart::Form::new().text("comment", "no file here");
    let response = server.post_form(form).await.unwrap();
    let body: Value = assert_json(response, StatusCode::BAD_REQUEST).await.unwrap();

    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("No files were uploaded."));
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_upload_without_multipart_body() {
    let server = TestServer::start().await.unwrap();

    let response = server
        .client
        .post(format!("{}/upload", server.base_url()))
        .body("raw")
        .send()
        .await
        .unwrap();

    assert_status(response, StatusCode::BAD_REQUEST).await.unwrap();
}
