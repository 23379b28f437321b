// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! RelightService against in-process fakes

use fabstir_relight_node::diffusion::{EditError, EditRequest, EditSettings, MAX_SEED};
use fabstir_relight_node::lighting::LightingAngle;
use image::ColorType;
use std::sync::Arc;

use crate::common::{rgb_image, rgba_image, service_with, FakeAdapters, FakeEngine};

fn fixed_seed(seed: u32) -> EditSettings {
    EditSettings {
        seed,
        randomize_seed: false,
        ..EditSettings::default()
    }
}

#[tokio::test]
async fn test_missing_image_is_rejected_before_any_side_effect() {
    let engine = Arc::new(FakeEngine::new());
    let adapters = Arc::new(FakeAdapters::new());
    let service = service_with(engine.clone(), adapters.clone());

    let result = service.edit(EditRequest::default()).await;

    assert!(matches!(result, Err(EditError::MissingImage)));
    assert_eq!(
        result.unwrap_err().to_string(),
        "Please upload an image first."
    );
    assert_eq!(engine.call_count(), 0);
    assert_eq!(adapters.attempts(), 0);
}

#[tokio::test]
async fn test_fixed_seed_is_passed_through_unchanged() {
    let engine = Arc::new(FakeEngine::new());
    let service = service_with(engine.clone(), Arc::new(FakeAdapters::new()));

    for _ in 0..2 {
        let result = service
            .edit(EditRequest {
                image: Some(rgb_image(64, 48)),
                angle: LightingAngle::new(90.0, 0.0),
                settings: fixed_seed(42),
            })
            .await
            .unwrap();
        assert_eq!(result.seed, 42);
        assert_eq!(result.prompt, "Light source from the Right");
    }

    let requests = engine.requests();
    assert_eq!(requests.len(), 2);
    assert!(requests.iter().all(|r| r.seed == 42));
    assert!(requests
        .iter()
        .all(|r| r.prompt == "Light source from the Right"));
}

#[tokio::test]
async fn test_random_seed_is_in_range_and_echoed() {
    let engine = Arc::new(FakeEngine::new());
    let service = service_with(engine.clone(), Arc::new(FakeAdapters::new()));

    let result = service
        .edit(EditRequest {
            image: Some(rgb_image(32, 32)),
            angle: LightingAngle::default(),
            settings: EditSettings::default(),
        })
        .await
        .unwrap();

    assert!(result.seed <= MAX_SEED);
    assert_eq!(engine.requests()[0].seed, result.seed);
}

#[tokio::test]
async fn test_adapter_is_ensured_before_every_edit() {
    let adapters = Arc::new(FakeAdapters::new());
    let service = service_with(Arc::new(FakeEngine::new()), adapters.clone());
    assert!(!service.adapters_ready());

    for _ in 0..3 {
        service
            .edit(EditRequest {
                image: Some(rgb_image(16, 16)),
                ..EditRequest::default()
            })
            .await
            .unwrap();
    }

    assert_eq!(adapters.attempts(), 3);
    assert!(service.adapters_ready());
}

#[tokio::test]
async fn test_adapter_failure_blocks_the_edit() {
    let engine = Arc::new(FakeEngine::new());
    let service = service_with(engine.clone(), Arc::new(FakeAdapters::failing()));

    let result = service
        .edit(EditRequest {
            image: Some(rgb_image(16, 16)),
            ..EditRequest::default()
        })
        .await;

    assert!(matches!(result, Err(EditError::AdapterAttach(_))));
    assert_eq!(engine.call_count(), 0);
}

#[tokio::test]
async fn test_engine_failure_propagates() {
    let engine = Arc::new(FakeEngine::failing("CUDA out of memory"));
    let service = service_with(engine.clone(), Arc::new(FakeAdapters::new()));

    let result = service
        .edit(EditRequest {
            image: Some(rgb_image(16, 16)),
            ..EditRequest::default()
        })
        .await;

    match result {
        Err(EditError::Engine(message)) => assert!(message.contains("out of memory")),
        other => panic!("expected engine error, got {:?}", other.map(|r| r.seed)),
    }
    assert_eq!(engine.call_count(), 1);
}

#[tokio::test]
async fn test_zero_dimensions_mean_auto() {
    let engine = Arc::new(FakeEngine::new());
    let service = service_with(engine.clone(), Arc::new(FakeAdapters::new()));

    service
        .edit(EditRequest {
            image: Some(rgb_image(16, 16)),
            angle: LightingAngle::default(),
            settings: EditSettings {
                height: 0,
                width: 0,
                ..fixed_seed(1)
            },
        })
        .await
        .unwrap();

    let request = &engine.requests()[0];
    assert_eq!(request.height, None);
    assert_eq!(request.width, None);
}

#[tokio::test]
async fn test_settings_reach_the_engine() {
    let engine = Arc::new(FakeEngine::new());
    let service = service_with(engine.clone(), Arc::new(FakeAdapters::new()));

    service
        .edit(EditRequest {
            image: Some(rgb_image(16, 16)),
            angle: LightingAngle::new(0.0, 90.0),
            settings: EditSettings {
                guidance_scale: 3.5,
                num_inference_steps: 8,
                height: 771,
                width: 1030,
                ..fixed_seed(7)
            },
        })
        .await
        .unwrap();

    let request = &engine.requests()[0];
    assert_eq!(request.prompt, "Light source from Above");
    assert_eq!(request.guidance_scale, 3.5);
    assert_eq!(request.num_inference_steps, 8);
    assert_eq!(request.height, Some(768));
    assert_eq!(request.width, Some(1024));
}

#[tokio::test]
async fn test_input_is_normalized_to_rgb() {
    let engine = Arc::new(FakeEngine::new());
    let service = service_with(engine.clone(), Arc::new(FakeAdapters::new()));

    service
        .edit(EditRequest {
            image: Some(rgba_image(20, 10)),
            ..EditRequest::default()
        })
        .await
        .unwrap();

    let request = &engine.requests()[0];
    assert_eq!(request.image.color(), ColorType::Rgb8);
    assert_eq!((request.image.width(), request.image.height()), (20, 10));
}

#[tokio::test]
async fn test_invalid_settings_are_rejected_before_attach() {
    let adapters = Arc::new(FakeAdapters::new());
    let engine = Arc::new(FakeEngine::new());
    let service = service_with(engine.clone(), adapters.clone());

    let result = service
        .edit(EditRequest {
            image: Some(rgb_image(16, 16)),
            angle: LightingAngle::default(),
            settings: EditSettings {
                num_inference_steps: 50,
                ..EditSettings::default()
            },
        })
        .await;

    assert!(matches!(
        result,
        Err(EditError::InvalidSettings {
            field: "numInferenceSteps",
            ..
        })
    ));
    assert_eq!(adapters.attempts(), 0);
    assert_eq!(engine.call_count(), 0);
}
