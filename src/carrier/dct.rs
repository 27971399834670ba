// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! 8×8 block DCT-II / DCT-III pair.
//!
//! `F(u,v) = 1/4 · C(u) · C(v) · Σx Σy f(x,y) · cos((2x+1)uπ/16) · cos((2y+1)vπ/16)`
//! with `C(0) = 1/√2` and `C(k) = 1` otherwise. The inverse applies the same
//! basis in the synthesis direction. Both are evaluated directly (64 × 64
//! multiply-adds per block) against a cosine table built once per process.

use std::sync::OnceLock;

use super::error::{CarrierError, Result};

/// Block edge length in samples.
pub const BLOCK_SIZE: usize = 8;

/// Samples per block.
pub const BLOCK_LEN: usize = BLOCK_SIZE * BLOCK_SIZE;

/// `COSINE[u][x] = cos((2x + 1) · u · π / 16)`
static COSINE: OnceLock<[[f64; BLOCK_SIZE]; BLOCK_SIZE]> = OnceLock::new();

/// Axis normalization: `C(0) = 1/√2`, `C(k > 0) = 1`.
static NORM: OnceLock<[f64; BLOCK_SIZE]> = OnceLock::new();

pub(crate) fn cosine_table() -> &'static [[f64; BLOCK_SIZE]; BLOCK_SIZE] {
    COSINE.get_or_init(|| {
        let mut table = [[0.0f64; BLOCK_SIZE]; BLOCK_SIZE];
        for (u, row) in table.iter_mut().enumerate() {
            for (x, c) in row.iter_mut().enumerate() {
                *c = ((2 * x + 1) as f64 * u as f64 * std::f64::consts::PI / 16.0).cos();
            }
        }
        table
    })
}

pub(crate) fn norm_table() -> &'static [f64; BLOCK_SIZE] {
    NORM.get_or_init(|| {
        let mut n = [1.0f64; BLOCK_SIZE];
        n[0] = std::f64::consts::FRAC_1_SQRT_2;
        n
    })
}

/// An 8×8 matrix of real values in row-major order (`row * 8 + col`).
///
/// Holds either spatial samples or DCT coefficients; the two share a shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Block {
    values: [f64; BLOCK_LEN],
}

impl Block {
    pub fn new(values: [f64; BLOCK_LEN]) -> Self {
        Self { values }
    }

    pub fn zeros() -> Self {
        Self { values: [0.0; BLOCK_LEN] }
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        debug_assert!(row < BLOCK_SIZE && col < BLOCK_SIZE);
        self.values[row * BLOCK_SIZE + col]
    }

    pub fn set(&mut self, row: usize, col: usize, val: f64) {
        debug_assert!(row < BLOCK_SIZE && col < BLOCK_SIZE);
        self.values[row * BLOCK_SIZE + col] = val;
    }

    pub fn values(&self) -> &[f64; BLOCK_LEN] {
        &self.values
    }

    pub fn values_mut(&mut self) -> &mut [f64; BLOCK_LEN] {
        &mut self.values
    }
}

impl TryFrom<&[f64]> for Block {
    type Error = CarrierError;

    fn try_from(slice: &[f64]) -> Result<Self> {
        let values: [f64; BLOCK_LEN] = slice
            .try_into()
            .map_err(|_| CarrierError::InvalidBlockSize(slice.len()))?;
        Ok(Self { values })
    }
}

/// Forward 2D DCT of one block.
pub fn forward(block: &Block) -> Block {
    let cos = cosine_table();
    let c = norm_table();
    let f = &block.values;

    let mut out = Block::zeros();
    for u in 0..BLOCK_SIZE {
        for v in 0..BLOCK_SIZE {
            let mut sum = 0.0;
            for x in 0..BLOCK_SIZE {
                let cu = cos[u][x];
                for y in 0..BLOCK_SIZE {
                    sum += f[x * BLOCK_SIZE + y] * cu * cos[v][y];
                }
            }
            out.values[u * BLOCK_SIZE + v] = 0.25 * c[u] * c[v] * sum;
        }
    }
    out
}

/// Inverse 2D DCT of one coefficient block.
pub fn inverse(coeffs: &Block) -> Block {
    let cos = cosine_table();
    let c = norm_table();
    let big_f = &coeffs.values;

    let mut out = Block::zeros();
    for x in 0..BLOCK_SIZE {
        for y in 0..BLOCK_SIZE {
            let mut sum = 0.0;
            for u in 0..BLOCK_SIZE {
                let cu = c[u] * cos[u][x];
                for v in 0..BLOCK_SIZE {
                    sum += cu * c[v] * big_f[u * BLOCK_SIZE + v] * cos[v][y];
                }
            }
            out.values[x * BLOCK_SIZE + y] = 0.25 * sum;
        }
    }
    out
}

/// Forward DCT over an arbitrary slice; fails unless it holds exactly 64 values.
pub fn forward_slice(samples: &[f64]) -> Result<Block> {
    Block::try_from(samples).map(|b| forward(&b))
}

/// Inverse DCT over an arbitrary slice; fails unless it holds exactly 64 values.
pub fn inverse_slice(coeffs: &[f64]) -> Result<Block> {
    Block::try_from(coeffs).map(|b| inverse(&b))
}
