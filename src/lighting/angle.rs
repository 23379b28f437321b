// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Lighting angle value object

use serde::{Deserialize, Serialize};

use super::prompt::{AzimuthBucket, ElevationBucket, LightingPrompt};

pub const MIN_ELEVATION: f64 = -90.0;
pub const MAX_ELEVATION: f64 = 90.0;

/// Raw lighting direction in degrees.
///
/// Azimuth is kept as given; [`LightingAngle::wrapped_azimuth`] offers the
/// [0, 360) view for display. Elevation is clamped to [-90, 90].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LightingAngle {
    pub azimuth: f64,
    pub elevation: f64,
}

impl LightingAngle {
    pub fn new(azimuth: f64, elevation: f64) -> Self {
        Self {
            azimuth,
            elevation: clamp_elevation(elevation),
        }
    }

    pub fn wrapped_azimuth(&self) -> f64 {
        self.azimuth.rem_euclid(360.0)
    }

    pub fn quantize(&self) -> QuantizedAngle {
        QuantizedAngle {
            azimuth: AzimuthBucket::nearest(self.azimuth),
            elevation: ElevationBucket::nearest(self.elevation),
        }
    }

    pub fn prompt(&self) -> LightingPrompt {
        self.quantize().prompt()
    }
}

impl Default for LightingAngle {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// A bucket pair: the only input the prompt depends on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct QuantizedAngle {
    pub azimuth: AzimuthBucket,
    pub elevation: ElevationBucket,
}

impl QuantizedAngle {
    pub fn prompt(&self) -> LightingPrompt {
        LightingPrompt::from_buckets(self.azimuth, self.elevation)
    }

    /// Back to degrees, suitable for sliders and the widget
    pub fn to_angle(&self) -> LightingAngle {
        LightingAngle::new(self.azimuth.degrees(), self.elevation.degrees())
    }
}

impl Default for QuantizedAngle {
    fn default() -> Self {
        Self {
            azimuth: AzimuthBucket::Front,
            elevation: ElevationBucket::Level,
        }
    }
}

fn clamp_elevation(elevation: f64) -> f64 {
    if elevation.is_nan() {
        return 0.0;
    }
    elevation.clamp(MIN_ELEVATION, MAX_ELEVATION)
}
