// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Sidecar transport against an in-process stub sidecar

use axum::http::StatusCode;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use fabstir_relight_node::diffusion::{
    AdapterGate, AdapterHost, AdapterLifecycle, AdapterSpec, EditEngine, EditError,
    EngineRequest, SidecarClient,
};
use fabstir_relight_node::imaging::{self, MAX_IMAGE_SIZE};
use image::{DynamicImage, Rgb, RgbImage};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

use crate::common::{rgb_image, SidecarReplies, SidecarStub};

fn request(height: Option<u32>, width: Option<u32>) -> EngineRequest {
    EngineRequest {
        image: rgb_image(8, 8),
        prompt: "Light source from the Left".to_string(),
        height,
        width,
        num_inference_steps: 4,
        guidance_scale: 1.0,
        seed: 42,
    }
}

fn client(endpoint: &str) -> SidecarClient {
    SidecarClient::new(endpoint, "Qwen/Qwen-Image-Edit-2509", Duration::from_secs(2)).unwrap()
}

#[test]
fn test_trailing_slash_is_trimmed() {
    let client = client("http://localhost:8082/");
    assert_eq!(client.endpoint(), "http://localhost:8082");
    assert_eq!(client.model_name(), "Qwen/Qwen-Image-Edit-2509");
}

#[test]
fn test_edit_body_carries_prompt_and_settings() {
    let body = client("http://localhost:8082").edit_body(&request(Some(512), Some(1024)), "AAAA");

    assert_eq!(body["model"], "Qwen/Qwen-Image-Edit-2509");
    assert_eq!(body["image"], "AAAA");
    assert_eq!(body["prompt"], "Light source from the Left");
    assert_eq!(body["seed"], 42);
    assert_eq!(body["num_inference_steps"], 4);
    assert_eq!(body["guidance_scale"], 1.0);
    assert_eq!(body["height"], 512);
    assert_eq!(body["width"], 1024);
    assert_eq!(body["response_format"], "b64_json");
}

#[test]
fn test_edit_body_omits_auto_dimensions() {
    let body = client("http://localhost:8082").edit_body(&request(None, None), "AAAA");
    let object = body.as_object().unwrap();
    assert!(!object.contains_key("height"));
    assert!(!object.contains_key("width"));
}

#[tokio::test]
async fn test_unreachable_sidecar() {
    // Port 9 (discard) is not expected to run an HTTP server
    let client = client("http://127.0.0.1:9");

    assert!(!client.health_check().await);
    assert!(matches!(
        client.edit(&request(None, None)).await,
        Err(EditError::Engine(_))
    ));
}

#[tokio::test]
async fn test_edit_round_trip_decodes_b64_json() {
    let stub = SidecarStub::spawn(SidecarReplies::image(&rgb_image(24, 16))).await;
    let client = client(&stub.endpoint);

    let output = client.edit(&request(Some(512), None)).await.unwrap();
    assert_eq!((output.image.width(), output.image.height()), (24, 16));

    let bodies = stub.requests_to("/v1/images/edits");
    assert_eq!(bodies.len(), 1);
    assert_eq!(bodies[0]["prompt"], "Light source from the Left");
    assert_eq!(bodies[0]["height"], 512);
    assert!(bodies[0].get("width").is_none());
    let (sent, _) = imaging::decode_image_input(bodies[0]["image"].as_str().unwrap()).unwrap();
    assert_eq!((sent.width(), sent.height()), (8, 8));
}

#[tokio::test]
async fn test_edit_output_above_upload_cap_is_accepted() {
    let mut rng = StdRng::seed_from_u64(2048);
    let noise = DynamicImage::ImageRgb8(RgbImage::from_fn(2048, 2048, |_, _| Rgb(rng.gen())));
    let png = imaging::encode_png(&noise).unwrap();
    assert!(png.len() > MAX_IMAGE_SIZE, "noise PNG only {} bytes", png.len());

    let stub = SidecarStub::spawn(SidecarReplies::body(
        json!({ "data": [{ "b64_json": STANDARD.encode(&png) }] }),
    ))
    .await;
    let client = SidecarClient::new(&stub.endpoint, "Qwen/Qwen-Image-Edit-2509", Duration::from_secs(60))
        .unwrap();

    let output = client.edit(&request(Some(2048), Some(2048))).await.unwrap();
    assert_eq!((output.image.width(), output.image.height()), (2048, 2048));
}

#[tokio::test]
async fn test_edit_rejects_empty_or_incomplete_responses() {
    for body in [json!({ "data": [] }), json!({ "data": [{}] }), json!({ "data": [{ "b64_json": "!!" }] })] {
        let stub = SidecarStub::spawn(SidecarReplies::body(body.clone())).await;
        let result = client(&stub.endpoint).edit(&request(None, None)).await;
        assert!(
            matches!(result, Err(EditError::Engine(_))),
            "expected engine error for {}",
            body
        );
    }
}

#[tokio::test]
async fn test_edit_non_success_status_is_engine_error() {
    let stub = SidecarStub::spawn(SidecarReplies {
        edit_status: StatusCode::INTERNAL_SERVER_ERROR,
        ..SidecarReplies::body(json!({ "error": "CUDA out of memory" }))
    })
    .await;

    match client(&stub.endpoint).edit(&request(None, None)).await {
        Err(EditError::Engine(message)) => {
            assert!(message.contains("500"));
            assert!(message.contains("CUDA out of memory"));
        }
        other => panic!("expected engine error, got {:?}", other.map(|o| o.image.width())),
    }
}

#[tokio::test]
async fn test_adapter_calls_send_spec_and_full_weight() {
    let stub = SidecarStub::spawn(SidecarReplies::body(json!({ "data": [] }))).await;
    let client = client(&stub.endpoint);
    let spec = AdapterSpec::default();

    client.load_adapter(&spec).await.unwrap();
    client
        .activate_adapters(&[spec.adapter_name.clone()], &[spec.weight])
        .await
        .unwrap();
    client.set_attention_processor("fa3").await.unwrap();

    let load = stub.requests_to("/v1/adapters/load");
    assert_eq!(
        load,
        vec![json!({
            "repo": "dx8152/Qwen-Edit-2509-Multi-Angle-Lighting",
            "weight_name": "多角度灯光-251116.safetensors",
            "adapter_name": "multi-angle-lighting",
        })]
    );
    let activate = stub.requests_to("/v1/adapters/activate");
    assert_eq!(
        activate,
        vec![json!({
            "adapter_names": ["multi-angle-lighting"],
            "adapter_weights": [1.0],
        })]
    );
    assert_eq!(
        stub.requests_to("/v1/attention/processor"),
        vec![json!({ "processor": "fa3" })]
    );
    assert!(client.health_check().await);
}

#[tokio::test]
async fn test_adapter_failures_map_to_attach_errors() {
    let stub = SidecarStub::spawn(SidecarReplies {
        adapter_status: StatusCode::NOT_FOUND,
        ..SidecarReplies::body(json!({ "data": [] }))
    })
    .await;
    let client = client(&stub.endpoint);

    assert!(matches!(
        client.load_adapter(&AdapterSpec::default()).await,
        Err(EditError::AdapterAttach(_))
    ));
    assert!(matches!(
        client
            .activate_adapters(&["multi-angle-lighting".to_string()], &[1.0])
            .await,
        Err(EditError::AdapterAttach(_))
    ));
    assert!(matches!(
        client.set_attention_processor("fa3").await,
        Err(EditError::Engine(_))
    ));
}

#[tokio::test]
async fn test_gate_attaches_through_sidecar_once() {
    let stub = SidecarStub::spawn(SidecarReplies::image(&rgb_image(8, 8))).await;
    let client = Arc::new(client(&stub.endpoint));
    let gate = AdapterGate::new(client.clone(), AdapterSpec::default());

    gate.ensure_ready().await.unwrap();
    gate.ensure_ready().await.unwrap();

    assert_eq!(stub.requests_to("/v1/adapters/load").len(), 1);
    assert_eq!(stub.requests_to("/v1/adapters/activate").len(), 1);
}
