// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Lighting state coordinator
//!
//! The widget, the slider pair and the prompt preview never write to each
//! other. Each one sends a [`LightingIntent`] here; the coordinator updates
//! the single canonical bucket pair and returns the [`SurfaceUpdate`]s to
//! push, never addressed back to the surface that produced the intent.
//!
//! Programmatic pushes come back as intents when a surface re-emits its new
//! value. Those echoes leave the canonical pair unchanged and therefore
//! produce no further updates, which is what keeps the graph acyclic.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::angle::{LightingAngle, QuantizedAngle};
use super::prompt::{AzimuthBucket, ElevationBucket, LightingPrompt};

/// Which slider an intent refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SliderAxis {
    Azimuth,
    Elevation,
}

/// A user action reported by one surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LightingIntent {
    /// Widget drag finished; `value` is the widget's raw `{azimuth, elevation}` payload
    WidgetChange { value: Value },
    /// Slider moving (continuous step events)
    SliderChange { axis: SliderAxis, value: f64 },
    /// Slider gesture finished
    SliderRelease { axis: SliderAxis, value: f64 },
    /// New input image; carried as a data URL for the widget preview
    ImageUpload {
        #[serde(rename = "imageUrl")]
        image_url: String,
    },
    ImageClear,
}

/// A push the caller must apply to one surface
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "surface", rename_all = "snake_case")]
pub enum SurfaceUpdate {
    Widget { azimuth: f64, elevation: f64 },
    WidgetImage {
        #[serde(rename = "imageUrl")]
        image_url: Option<String>,
    },
    Sliders { azimuth: f64, elevation: f64 },
    PromptPreview { prompt: String },
}

/// Serializable view of the coordinator's state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LightingSnapshot {
    pub azimuth: f64,
    pub elevation: f64,
    pub azimuth_label: String,
    pub elevation_label: String,
    pub prompt: String,
    pub image_url: Option<String>,
}

/// Owner of the canonical lighting value for one UI session
#[derive(Debug, Clone, Default)]
pub struct LightingCoordinator {
    angle: QuantizedAngle,
    reference_image: Option<String>,
}

impl LightingCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_angle(angle: LightingAngle) -> Self {
        Self {
            angle: angle.quantize(),
            reference_image: None,
        }
    }

    pub fn current(&self) -> QuantizedAngle {
        self.angle
    }

    pub fn prompt(&self) -> LightingPrompt {
        self.angle.prompt()
    }

    pub fn reference_image(&self) -> Option<&str> {
        self.reference_image.as_deref()
    }

    pub fn snapshot(&self) -> LightingSnapshot {
        let degrees = self.angle.to_angle();
        LightingSnapshot {
            azimuth: degrees.azimuth,
            elevation: degrees.elevation,
            azimuth_label: self.angle.azimuth.label().to_string(),
            elevation_label: self.angle.elevation.label().to_string(),
            prompt: self.prompt().into_string(),
            image_url: self.reference_image.clone(),
        }
    }

    /// Apply one intent and return the pushes for the other surfaces
    pub fn apply(&mut self, intent: LightingIntent) -> Vec<SurfaceUpdate> {
        match intent {
            LightingIntent::WidgetChange { value } => self.on_widget_change(&value),
            LightingIntent::SliderChange { axis, value } => self.on_slider_change(axis, value),
            LightingIntent::SliderRelease { axis, value } => self.on_slider_release(axis, value),
            LightingIntent::ImageUpload { image_url } => {
                self.reference_image = Some(image_url.clone());
                vec![SurfaceUpdate::WidgetImage {
                    image_url: Some(image_url),
                }]
            }
            LightingIntent::ImageClear => {
                self.reference_image = None;
                vec![SurfaceUpdate::WidgetImage { image_url: None }]
            }
        }
    }

    fn on_widget_change(&mut self, value: &Value) -> Vec<SurfaceUpdate> {
        let Some(angle) = parse_widget_value(value) else {
            debug!("ignoring malformed widget value: {}", value);
            return Vec::new();
        };

        let next = angle.quantize();
        if next == self.angle {
            return Vec::new();
        }
        self.angle = next;

        let degrees = next.to_angle();
        vec![
            SurfaceUpdate::Sliders {
                azimuth: degrees.azimuth,
                elevation: degrees.elevation,
            },
            self.prompt_update(),
        ]
    }

    fn on_slider_change(&mut self, axis: SliderAxis, value: f64) -> Vec<SurfaceUpdate> {
        let next = with_axis(self.angle, axis, value);
        if next == self.angle {
            return Vec::new();
        }
        self.angle = next;
        // The widget keeps animating on its own until the slider is released.
        vec![self.prompt_update()]
    }

    fn on_slider_release(&mut self, axis: SliderAxis, value: f64) -> Vec<SurfaceUpdate> {
        self.angle = with_axis(self.angle, axis, value);
        let degrees = self.angle.to_angle();
        vec![
            SurfaceUpdate::Widget {
                azimuth: degrees.azimuth,
                elevation: degrees.elevation,
            },
            self.prompt_update(),
        ]
    }

    fn prompt_update(&self) -> SurfaceUpdate {
        SurfaceUpdate::PromptPreview {
            prompt: self.prompt().into_string(),
        }
    }
}

fn with_axis(angle: QuantizedAngle, axis: SliderAxis, value: f64) -> QuantizedAngle {
    match axis {
        SliderAxis::Azimuth => QuantizedAngle {
            azimuth: AzimuthBucket::nearest(value),
            ..angle
        },
        SliderAxis::Elevation => QuantizedAngle {
            elevation: ElevationBucket::nearest(value),
            ..angle
        },
    }
}

/// Read a widget payload.
///
/// Objects with missing fields default that axis to 0; anything that is not
/// an object, or carries a non-numeric field, is rejected.
pub fn parse_widget_value(value: &Value) -> Option<LightingAngle> {
    let object = value.as_object()?;
    let field = |name: &str| match object.get(name) {
        None | Some(Value::Null) => Some(0.0),
        Some(v) => v.as_f64(),
    };
    Some(LightingAngle::new(field("azimuth")?, field("elevation")?))
}
