// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Carrier capacity model.
//!
//! Capacity is the smaller of two bounds:
//! - the embedding ratio: at most `ratio` payload bits per pixel, which keeps
//!   the payload sparse across the image;
//! - the block bound: full 8×8 blocks × channels × policy positions.
//!
//! Carriers smaller than the configured minimum report zero. Nothing is cached;
//! every query recomputes from the carrier it is given.

use crate::carrier::Carrier;
use crate::stego::config::StegoConfig;
use crate::stego::error::StegoError;
use crate::stego::frame::{HEADER_LEN, TAG_LEN};
use crate::stego::policy::CoefficientPolicy;

/// Embeddable bits in one carrier under one configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capacity {
    bits: usize,
    overhead: usize,
}

impl Capacity {
    /// Total embeddable bits, header included.
    pub fn bits(&self) -> usize {
        self.bits
    }

    /// Total embeddable whole bytes, header included.
    pub fn bytes(&self) -> usize {
        self.bits / 8
    }

    /// Largest plaintext payload (in bytes) that still fits.
    pub fn max_payload_len(&self) -> usize {
        self.bytes().saturating_sub(self.overhead)
    }

    /// Fail with [`StegoError::PayloadTooLarge`] unless `frame_len` bytes fit.
    pub fn check_fits(&self, frame_len: usize) -> Result<(), StegoError> {
        let needed_bits = frame_len.saturating_mul(8);
        if needed_bits > self.bits {
            return Err(StegoError::PayloadTooLarge { needed_bits, available_bits: self.bits });
        }
        Ok(())
    }
}

/// Ratio bound: `floor(pixels × ratio)` bits, zero below `min_samples`.
pub fn ratio_capacity_bits(sample_count: usize, channels: usize, ratio: f64, min_samples: usize) -> usize {
    if sample_count < min_samples || channels == 0 {
        return 0;
    }
    let pixels = sample_count / channels;
    (pixels as f64 * ratio).floor() as usize
}

/// Block bound: one bit per policy position in every full channel block.
pub fn block_capacity_bits(carrier: &Carrier, policy: &CoefficientPolicy) -> usize {
    carrier.total_blocks() * policy.bits_per_block()
}

/// Capacity of `carrier` under `config`.
///
/// # Errors
/// [`StegoError::InvalidConfig`] if the configuration does not validate.
pub fn capacity(carrier: &Carrier, config: &StegoConfig) -> Result<Capacity, StegoError> {
    let policy = config.validate()?;
    let ratio_bits = ratio_capacity_bits(
        carrier.samples().len(),
        carrier.channels(),
        config.embedding_ratio,
        config.min_carrier_samples,
    );
    let bits = ratio_bits.min(block_capacity_bits(carrier, policy));
    let overhead = HEADER_LEN + if config.integrity_tag { TAG_LEN } else { 0 };
    Ok(Capacity { bits, overhead })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stego::policy::POLICY_V1;

    fn rgb(width: usize, height: usize) -> Carrier {
        Carrier::new(width, height, 3, vec![128; width * height * 3]).unwrap()
    }

    #[test]
    fn ratio_bound_matches_formula() {
        // 9,000 RGB samples = 3,000 pixels × 0.3 = 900 bits.
        assert_eq!(ratio_capacity_bits(9_000, 3, 0.3, 100), 900);
        // 30,000 samples = 10,000 pixels.
        assert_eq!(ratio_capacity_bits(30_000, 3, 0.3, 100), 3_000);
    }

    #[test]
    fn below_minimum_is_zero() {
        assert_eq!(ratio_capacity_bits(99, 3, 0.3, 100), 0);
        assert_eq!(ratio_capacity_bits(0, 3, 0.3, 100), 0);
        assert!(ratio_capacity_bits(100, 1, 0.3, 100) > 0);
    }

    #[test]
    fn ratio_bound_is_monotonic() {
        let mut last = 0;
        for n in 0..5_000 {
            let c = ratio_capacity_bits(n, 3, 0.3, 100);
            assert!(c >= last, "capacity dropped at {n}: {c} < {last}");
            last = c;
        }
    }

    #[test]
    fn concrete_scenario_60x50_rgb() {
        let carrier = rgb(60, 50);
        let cfg = StegoConfig::default();
        let cap = capacity(&carrier, &cfg).unwrap();
        // Block bound: 7 × 6 blocks × 3 channels × 8 = 1,008 > 900.
        assert_eq!(block_capacity_bits(&carrier, &POLICY_V1), 1_008);
        assert_eq!(cap.bits(), 900);
        assert_eq!(cap.bytes(), 112);
        assert_eq!(cap.max_payload_len(), 108);

        assert!(cap.check_fits(HEADER_LEN + 10).is_ok());
        assert!(matches!(
            cap.check_fits(HEADER_LEN + 200),
            Err(StegoError::PayloadTooLarge { needed_bits: 1632, available_bits: 900 })
        ));
    }

    #[test]
    fn block_bound_wins_for_ragged_carriers() {
        // 15×15 holds a single full block per channel.
        let carrier = rgb(15, 15);
        let cap = capacity(&carrier, &StegoConfig::default()).unwrap();
        assert_eq!(cap.bits(), 24);
    }

    #[test]
    fn integrity_tag_reduces_payload_room() {
        let carrier = rgb(60, 50);
        let cfg = StegoConfig { integrity_tag: true, ..Default::default() };
        let cap = capacity(&carrier, &cfg).unwrap();
        assert_eq!(cap.max_payload_len(), 112 - HEADER_LEN - TAG_LEN);
    }

    #[test]
    fn capacity_query_is_idempotent() {
        let carrier = rgb(64, 64);
        let cfg = StegoConfig::default();
        let a = capacity(&carrier, &cfg).unwrap();
        let b = capacity(&carrier, &cfg).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn ratio_is_threaded_through_config() {
        let carrier = rgb(64, 64);
        let low = capacity(&carrier, &StegoConfig { embedding_ratio: 0.1, ..Default::default() }).unwrap();
        let high = capacity(&carrier, &StegoConfig { embedding_ratio: 0.3, ..Default::default() }).unwrap();
        assert!(low.bits() < high.bits());
        assert_eq!(low.bits(), 409);
    }
}
