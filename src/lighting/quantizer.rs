// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Nearest-bucket quantization for lighting angles
//!
//! Values are never wrapped before snapping: an azimuth of 360 lands on the
//! 315 bucket and -45 lands on 0, because only absolute distance is compared.

/// Azimuth grid in degrees, ascending
pub const AZIMUTH_GRID: [f64; 8] = [0.0, 45.0, 90.0, 135.0, 180.0, 225.0, 270.0, 315.0];

/// Elevation grid in degrees, ascending
pub const ELEVATION_GRID: [f64; 3] = [-90.0, 0.0, 90.0];

/// Snap `value` to the closest entry of `options`.
///
/// Ties go to the first option reaching the minimum distance, so with an
/// ascending grid the lowest value wins. Returns `None` only when `options`
/// is empty. A NaN input compares false against every distance and resolves
/// to the first option.
pub fn snap_to_nearest(value: f64, options: &[f64]) -> Option<f64> {
    let mut iter = options.iter().copied();
    let first = iter.next()?;
    let mut best = first;
    let mut best_distance = (first - value).abs();

    for option in iter {
        let distance = (option - value).abs();
        if distance < best_distance {
            best = option;
            best_distance = distance;
        }
    }

    Some(best)
}

/// Index of the closest entry in `options`, same tie rule as [`snap_to_nearest`]
pub(crate) fn nearest_index(value: f64, options: &[f64]) -> usize {
    let mut best = 0;
    let mut best_distance = f64::INFINITY;
    for (index, option) in options.iter().enumerate() {
        let distance = (option - value).abs();
        if distance < best_distance {
            best = index;
            best_distance = distance;
        }
    }
    best
}
