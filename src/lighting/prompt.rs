// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Lighting buckets and the prompt template built from them

use serde::{Deserialize, Serialize};
use std::fmt;

use super::quantizer::{nearest_index, AZIMUTH_GRID, ELEVATION_GRID};

/// One of the eight horizontal light directions, 45° apart
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AzimuthBucket {
    Front,
    RightFront,
    Right,
    RightRear,
    Rear,
    LeftRear,
    Left,
    LeftFront,
}

impl AzimuthBucket {
    /// All buckets in grid order (0°, 45°, ... 315°)
    pub const ALL: [AzimuthBucket; 8] = [
        AzimuthBucket::Front,
        AzimuthBucket::RightFront,
        AzimuthBucket::Right,
        AzimuthBucket::RightRear,
        AzimuthBucket::Rear,
        AzimuthBucket::LeftRear,
        AzimuthBucket::Left,
        AzimuthBucket::LeftFront,
    ];

    /// Quantize a raw azimuth (no wrapping) to its nearest bucket
    pub fn nearest(azimuth: f64) -> Self {
        Self::ALL[nearest_index(azimuth, &AZIMUTH_GRID)]
    }

    pub fn degrees(self) -> f64 {
        AZIMUTH_GRID[self as usize]
    }

    pub fn label(self) -> &'static str {
        match self {
            AzimuthBucket::Front => "Front",
            AzimuthBucket::RightFront => "Right Front",
            AzimuthBucket::Right => "Right",
            AzimuthBucket::RightRear => "Right Rear",
            AzimuthBucket::Rear => "Rear",
            AzimuthBucket::LeftRear => "Left Rear",
            AzimuthBucket::Left => "Left",
            AzimuthBucket::LeftFront => "Left Front",
        }
    }
}

/// Vertical light position: below, level or above the subject
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ElevationBucket {
    Below,
    Level,
    Above,
}

impl ElevationBucket {
    pub const ALL: [ElevationBucket; 3] = [
        ElevationBucket::Below,
        ElevationBucket::Level,
        ElevationBucket::Above,
    ];

    pub fn nearest(elevation: f64) -> Self {
        Self::ALL[nearest_index(elevation, &ELEVATION_GRID)]
    }

    pub fn degrees(self) -> f64 {
        ELEVATION_GRID[self as usize]
    }

    /// Display label; the level bucket has an empty label
    pub fn label(self) -> &'static str {
        match self {
            ElevationBucket::Below => "Below",
            ElevationBucket::Level => "",
            ElevationBucket::Above => "Above",
        }
    }
}

/// The instruction text sent to the edit engine.
///
/// Built only from a bucket pair, never from raw angles. When the elevation
/// is not level the azimuth does not appear in the text at all.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LightingPrompt(String);

impl LightingPrompt {
    pub fn from_buckets(azimuth: AzimuthBucket, elevation: ElevationBucket) -> Self {
        let text = match elevation {
            ElevationBucket::Level => format!("Light source from the {}", azimuth.label()),
            ElevationBucket::Below | ElevationBucket::Above => {
                format!("Light source from {}", elevation.label())
            }
        };
        Self(text)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Every prompt the builder can produce: eight level directions plus
    /// the below and above variants.
    pub fn all() -> Vec<LightingPrompt> {
        let mut prompts: Vec<LightingPrompt> = AzimuthBucket::ALL
            .iter()
            .map(|&azimuth| Self::from_buckets(azimuth, ElevationBucket::Level))
            .collect();
        prompts.push(Self::from_buckets(AzimuthBucket::Front, ElevationBucket::Below));
        prompts.push(Self::from_buckets(AzimuthBucket::Front, ElevationBucket::Above));
        prompts
    }
}

impl fmt::Display for LightingPrompt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for LightingPrompt {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Quantize a raw angle pair and render its lighting prompt
pub fn build_lighting_prompt(azimuth: f64, elevation: f64) -> String {
    LightingPrompt::from_buckets(
        AzimuthBucket::nearest(azimuth),
        ElevationBucket::nearest(elevation),
    )
    .into_string()
}
