// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Engine configuration.
//!
//! Every policy knob the capacity model and the embedding engine share lives
//! in [`StegoConfig`] and is passed explicitly into both, so different policies
//! can coexist in one process. The struct is `serde`-friendly; missing fields
//! fall back to [`StegoConfig::default`].

use serde::{Deserialize, Serialize};

use crate::stego::error::StegoError;
use crate::stego::policy::CoefficientPolicy;

/// Default fraction of pixels that may carry one payload bit.
pub const DEFAULT_EMBEDDING_RATIO: f64 = 0.3;

/// Carriers with fewer samples than this have zero capacity.
pub const DEFAULT_MIN_CARRIER_SAMPLES: usize = 100;

/// Argon2id cost parameters handed to the key-derivation collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KdfParams {
    /// Number of passes over memory.
    pub time_cost: u32,
    /// Memory in KiB.
    pub memory_cost_kib: u32,
    /// Lanes.
    pub parallelism: u32,
    /// Keystream length in bytes.
    pub output_len: usize,
}

impl Default for KdfParams {
    /// Matches `argon2::Params::DEFAULT` with a 64-byte output.
    fn default() -> Self {
        Self {
            time_cost: 2,
            memory_cost_kib: 19 * 1024,
            parallelism: 1,
            output_len: 64,
        }
    }
}

/// How the password becomes cipher key material.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scheme", rename_all = "snake_case")]
pub enum KeySchedule {
    /// The password bytes are the keystream, repeated over the payload.
    RawPassword,
    /// The keystream is derived from the password with the KDF collaborator.
    Derived(KdfParams),
}

impl Default for KeySchedule {
    fn default() -> Self {
        Self::Derived(KdfParams::default())
    }
}

/// Policy shared by the capacity model, embedder and extractor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StegoConfig {
    /// Payload bits allowed per carrier pixel, in `(0, 1]`.
    pub embedding_ratio: f64,
    /// Carriers below this many samples report zero capacity.
    pub min_carrier_samples: usize,
    /// Version of the coefficient policy table.
    pub policy_version: u16,
    /// Key material scheme.
    pub key_schedule: KeySchedule,
    /// Append a digest-derived tag to the payload and verify it on extract.
    pub integrity_tag: bool,
}

impl Default for StegoConfig {
    fn default() -> Self {
        Self {
            embedding_ratio: DEFAULT_EMBEDDING_RATIO,
            min_carrier_samples: DEFAULT_MIN_CARRIER_SAMPLES,
            policy_version: CoefficientPolicy::CURRENT_VERSION,
            key_schedule: KeySchedule::default(),
            integrity_tag: false,
        }
    }
}

impl StegoConfig {
    /// Check ranges and resolve the policy table.
    ///
    /// # Errors
    /// [`StegoError::InvalidConfig`] for a ratio outside `(0, 1]`, an unknown
    /// policy version or a zero-length derived keystream.
    pub fn validate(&self) -> Result<&'static CoefficientPolicy, StegoError> {
        if !self.embedding_ratio.is_finite() || self.embedding_ratio <= 0.0 || self.embedding_ratio > 1.0 {
            return Err(StegoError::InvalidConfig("embedding ratio must be in (0, 1]"));
        }
        if let KeySchedule::Derived(params) = &self.key_schedule {
            if params.output_len == 0 {
                return Err(StegoError::InvalidConfig("derived key length must be non-zero"));
            }
        }
        self.policy()
    }

    /// The coefficient policy table this config selects.
    pub fn policy(&self) -> Result<&'static CoefficientPolicy, StegoError> {
        CoefficientPolicy::by_version(self.policy_version)
            .ok_or(StegoError::InvalidConfig("unknown coefficient policy version"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let cfg = StegoConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.embedding_ratio, 0.3);
        assert_eq!(cfg.min_carrier_samples, 100);
    }

    #[test]
    fn ratio_out_of_range_rejected() {
        for ratio in [0.0, -0.1, 1.5, f64::NAN] {
            let cfg = StegoConfig { embedding_ratio: ratio, ..Default::default() };
            assert!(
                matches!(cfg.validate(), Err(StegoError::InvalidConfig(_))),
                "ratio {ratio} should be rejected"
            );
        }
        let full = StegoConfig { embedding_ratio: 1.0, ..Default::default() };
        assert!(full.validate().is_ok());
    }

    #[test]
    fn unknown_policy_rejected() {
        let cfg = StegoConfig { policy_version: 999, ..Default::default() };
        assert!(matches!(cfg.validate(), Err(StegoError::InvalidConfig(_))));
    }

    #[test]
    fn zero_length_keystream_rejected() {
        let cfg = StegoConfig {
            key_schedule: KeySchedule::Derived(KdfParams { output_len: 0, ..Default::default() }),
            ..Default::default()
        };
        assert!(cfg.validate().is_err());
    }
}
