// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Seed resolution for reproducible edits

use rand::Rng;

/// Largest seed handed out: the non-negative range of a signed 32-bit integer
pub const MAX_SEED: u32 = i32::MAX as u32;

/// Draw a fresh seed when asked to, otherwise pass the caller's through unchanged
pub fn resolve_seed<R: Rng + ?Sized>(seed: u32, randomize: bool, rng: &mut R) -> u32 {
    if randomize {
        rng.gen_range(0..=MAX_SEED)
    } else {
        seed
    }
}
