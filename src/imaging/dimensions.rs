// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Default edit size derived from an uploaded image

use serde::{Deserialize, Serialize};

/// Longest output side used when a new image is uploaded
pub const DEFAULT_LONG_SIDE: u32 = 1024;

/// Output dimensions; both sides are multiples of 8
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditDimensions {
    pub width: u32,
    pub height: u32,
}

impl Default for EditDimensions {
    fn default() -> Self {
        Self {
            width: DEFAULT_LONG_SIDE,
            height: DEFAULT_LONG_SIDE,
        }
    }
}

/// Scale the longest side to 1024, keep the aspect ratio, then floor both
/// sides to a multiple of 8. Landscape images pin the width, everything else
/// (including squares) pins the height.
pub fn derive_edit_dimensions(original_width: u32, original_height: u32) -> EditDimensions {
    if original_width == 0 || original_height == 0 {
        return EditDimensions::default();
    }

    let long = DEFAULT_LONG_SIDE as u64;
    let (width, height) = if original_width > original_height {
        let height = long * original_height as u64 / original_width as u64;
        (long, height)
    } else {
        let width = long * original_width as u64 / original_height as u64;
        (width, long)
    };

    EditDimensions {
        width: floor_to_multiple_of_8(width as u32),
        height: floor_to_multiple_of_8(height as u32),
    }
}

pub fn floor_to_multiple_of_8(value: u32) -> u32 {
    (value / 8) * 8
}
