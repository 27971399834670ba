// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Versioned coefficient selection policy and the coefficient LSB quantizer.
//!
//! A policy fixes which DCT positions of every block carry payload bits, in
//! which order, and the quantizer step used to read and write them. Embedder
//! and extractor must agree on all three, so the tables here are part of the
//! stego format: never edit a published table, add a new version instead.
//!
//! Bits live in the least-significant bit of the quantized coefficient index
//! `q = round(c / step)`. Writing a bit moves `q` by at most one step toward
//! the original coefficient, so the change to `c` never exceeds `step`.

use crate::carrier::dct::{cosine_table, norm_table};

/// A fixed table of mid-frequency coefficient positions plus quantizer step.
#[derive(Debug, PartialEq)]
pub struct CoefficientPolicy {
    pub version: u16,
    /// `(row, col)` frequency positions in embedding order.
    pub positions: &'static [(usize, usize)],
    /// Quantizer step for the coefficient LSB.
    pub step: f64,
}

/// Policy v1: eight mid-frequency positions in rows/cols 1–3.
///
/// DC and the first row and column are left alone (most visible), as are the
/// high bins (first casualties of lossy re-encoding) and every index-4 basis
/// function. Without index 4 the largest per-axis cosine sum is 5.226, which
/// keeps the worst-case rounding error on a selected coefficient at
/// `0.25 · 5.226² · 0.5 ≈ 3.41`, below the `step / 2 = 4` decision margin.
pub static POLICY_V1: CoefficientPolicy = CoefficientPolicy {
    version: 1,
    positions: &[(1, 2), (2, 1), (2, 2), (1, 3), (3, 1), (2, 3), (3, 2), (3, 3)],
    step: 8.0,
};

static POLICIES: [&CoefficientPolicy; 1] = [&POLICY_V1];

impl CoefficientPolicy {
    pub const CURRENT_VERSION: u16 = 1;

    pub fn by_version(version: u16) -> Option<&'static CoefficientPolicy> {
        POLICIES.iter().copied().find(|p| p.version == version)
    }

    /// Payload bits carried by one fully used block.
    pub fn bits_per_block(&self) -> usize {
        self.positions.len()
    }

    /// Largest spatial change (in sample units) that writing every position
    /// of one block can cause.
    ///
    /// Samples of a payload block are pulled into `[margin, 255 - margin]`
    /// before embedding so the inverse transform never clips.
    pub fn sample_margin(&self) -> f64 {
        let cos = cosine_table();
        let c = norm_table();
        let peak = |k: usize| c[k] * cos[k].iter().fold(0.0f64, |m, v| m.max(v.abs()));
        let sum: f64 = self.positions.iter().map(|&(u, v)| peak(u) * peak(v)).sum();
        (0.25 * self.step * sum).ceil()
    }

    /// Quantize `coeff` so its index LSB equals `bit`.
    pub fn embed_bit(&self, coeff: f64, bit: u8) -> f64 {
        debug_assert!(bit <= 1);
        let scaled = coeff / self.step;
        let mut q = scaled.round() as i64;
        if q.rem_euclid(2) as u8 != bit {
            q += if scaled >= q as f64 { 1 } else { -1 };
        }
        q as f64 * self.step
    }

    /// Read the index LSB of `coeff`.
    pub fn read_bit(&self, coeff: f64) -> u8 {
        ((coeff / self.step).round() as i64).rem_euclid(2) as u8
    }
}
