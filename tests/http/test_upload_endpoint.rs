// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! POST /v1/images/upload

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
};
use fabstir_relight_node::api::http_server::{create_app, AppState};
use fabstir_relight_node::api::UploadResponse;
use std::sync::Arc;
use tower::util::ServiceExt;

use crate::common::png_bytes;

const BOUNDARY: &str = "relight-test-boundary";

fn multipart_request(field: &str, payload: &[u8]) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"photo.png\"\r\n",
            field
        )
        .as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: image/png\r\n\r\n");
    body.extend_from_slice(payload);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method(Method::POST)
        .uri("/v1/images/upload")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn upload(field: &str, payload: &[u8]) -> axum::response::Response {
    create_app(Arc::new(AppState::new_for_test()))
        .oneshot(multipart_request(field, payload))
        .await
        .unwrap()
}

#[tokio::test]
async fn test_landscape_upload() {
    let response = upload("image", &png_bytes(2000, 1000)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let uploaded: UploadResponse = serde_json::from_slice(&bytes).unwrap();
    assert_eq!((uploaded.width, uploaded.height), (1024, 512));
    assert_eq!(
        (uploaded.original_width, uploaded.original_height),
        (2000, 1000)
    );
    assert!(uploaded.image_url.starts_with("data:image/png;base64,"));
}

#[tokio::test]
async fn test_portrait_upload() {
    let response = upload("image", &png_bytes(1000, 2000)).await;
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let uploaded: UploadResponse = serde_json::from_slice(&bytes).unwrap();
    assert_eq!((uploaded.width, uploaded.height), (512, 1024));
    assert_eq!(uploaded.width % 8, 0);
}

#[tokio::test]
async fn test_upload_requires_image_field() {
    let response = upload("file", &png_bytes(10, 10)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_upload_rejects_non_images() {
    let response = upload("image", b"definitely not a picture").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
