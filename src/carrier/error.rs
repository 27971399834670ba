// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Error types for carrier construction and block access.

use std::fmt;

/// Errors raised while validating a carrier buffer or slicing it into blocks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CarrierError {
    /// The sample buffer is empty or one of the dimensions is zero.
    Empty,
    /// Channel count outside the supported 1–4 range.
    UnsupportedChannels(usize),
    /// Sample buffer length does not match `width * height * channels`.
    LengthMismatch { expected: usize, actual: usize },
    /// A transform input was not exactly 64 samples.
    InvalidBlockSize(usize),
    /// Block coordinates fall outside the full-block grid.
    BlockOutOfBounds { block_row: usize, block_col: usize, channel: usize },
}

impl fmt::Display for CarrierError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "carrier has no samples"),
            Self::UnsupportedChannels(c) => write!(f, "unsupported channel count: {c} (expected 1-4)"),
            Self::LengthMismatch { expected, actual } => {
                write!(f, "sample buffer holds {actual} samples, geometry needs {expected}")
            }
            Self::InvalidBlockSize(n) => write!(f, "transform block must hold 64 samples, got {n}"),
            Self::BlockOutOfBounds { block_row, block_col, channel } => {
                write!(f, "block ({block_row}, {block_col}) channel {channel} is outside the carrier")
            }
        }
    }
}

impl std::error::Error for CarrierError {}

pub type Result<T> = std::result::Result<T, CarrierError>;
