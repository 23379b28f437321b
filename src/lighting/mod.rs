// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Lighting direction model: quantization, prompt text and UI state sync

pub mod angle;
pub mod prompt;
pub mod quantizer;
pub mod sync;

pub use angle::{LightingAngle, QuantizedAngle, MAX_ELEVATION, MIN_ELEVATION};
pub use prompt::{build_lighting_prompt, AzimuthBucket, ElevationBucket, LightingPrompt};
pub use quantizer::{snap_to_nearest, AZIMUTH_GRID, ELEVATION_GRID};
pub use sync::{
    parse_widget_value, LightingCoordinator, LightingIntent, LightingSnapshot, SliderAxis,
    SurfaceUpdate,
};

/// Slider domains exposed to the UI: (min, max, step)
pub const AZIMUTH_SLIDER: (f64, f64, f64) = (0.0, 315.0, 45.0);
pub const ELEVATION_SLIDER: (f64, f64, f64) = (-90.0, 90.0, 90.0);
