// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Key-derivation and digest collaborators.
//!
//! The engine only sees two narrow capabilities:
//!
//! - [`KeyDerivation`]: `(password, salt, params) -> key bytes`, backed in
//!   production by Argon2id ([`Argon2Kdf`]).
//! - [`MessageDigest`]: `bytes -> 64-byte digest`, backed by SHA3-512
//!   ([`Sha3_512Digest`]).
//!
//! Tests substitute cheap deterministic stand-ins for both.
//!
//! The salt for derivation is not stored in the carrier: it is the first
//! [`SALT_LEN`] bytes of `digest(SALT_DOMAIN || password)`, so the extractor
//! reproduces it from the password alone.

use argon2::{Algorithm, Argon2, Params, Version};
use sha3::{Digest, Sha3_512};
use zeroize::Zeroizing;

use crate::stego::config::{KdfParams, KeySchedule};
use crate::stego::error::StegoError;

/// Salt length handed to the key-derivation collaborator.
pub const SALT_LEN: usize = 16;

/// Domain separator for salt derivation.
const SALT_DOMAIN: &[u8] = b"stegdct-salt-v1";

/// Password-based key derivation.
pub trait KeyDerivation {
    /// Derive `params.output_len` bytes from `password` and `salt`.
    fn derive(&self, password: &[u8], salt: &[u8], params: &KdfParams) -> Result<Zeroizing<Vec<u8>>, StegoError>;
}

/// Fixed-width 64-byte message digest.
pub trait MessageDigest {
    fn digest(&self, data: &[u8]) -> [u8; 64];
}

/// Argon2id v1.3 key derivation.
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2Kdf;

impl KeyDerivation for Argon2Kdf {
    fn derive(&self, password: &[u8], salt: &[u8], params: &KdfParams) -> Result<Zeroizing<Vec<u8>>, StegoError> {
        let argon_params = Params::new(
            params.memory_cost_kib,
            params.time_cost,
            params.parallelism,
            Some(params.output_len),
        )
        .map_err(|e| StegoError::KeyDerivationFailed(format!("invalid argon2 parameters: {e}")))?;
        let argon = Argon2::new(Algorithm::Argon2id, Version::V0x13, argon_params);

        let mut key = Zeroizing::new(vec![0u8; params.output_len]);
        argon
            .hash_password_into(password, salt, key.as_mut_slice())
            .map_err(|e| StegoError::KeyDerivationFailed(e.to_string()))?;
        Ok(key)
    }
}

/// SHA3-512 digest.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha3_512Digest;

impl MessageDigest for Sha3_512Digest {
    fn digest(&self, data: &[u8]) -> [u8; 64] {
        let mut out = [0u8; 64];
        out.copy_from_slice(&Sha3_512::digest(data));
        out
    }
}

/// Derive the per-password salt. Both the digest and the salt are wiped on drop.
pub fn derive_salt(digest: &dyn MessageDigest, password: &[u8]) -> Zeroizing<[u8; SALT_LEN]> {
    let mut input = Zeroizing::new(Vec::with_capacity(SALT_DOMAIN.len() + password.len()));
    input.extend_from_slice(SALT_DOMAIN);
    input.extend_from_slice(password);
    let full = Zeroizing::new(digest.digest(&input));
    let mut salt = Zeroizing::new([0u8; SALT_LEN]);
    salt.copy_from_slice(&full[..SALT_LEN]);
    salt
}

/// Produce the cipher keystream for one call.
///
/// `RawPassword` returns a copy of the password bytes; `Derived` runs the
/// key-derivation collaborator once over the password and its derived salt.
pub fn key_material(
    schedule: &KeySchedule,
    password: &[u8],
    kdf: &dyn KeyDerivation,
    digest: &dyn MessageDigest,
) -> Result<Zeroizing<Vec<u8>>, StegoError> {
    match schedule {
        KeySchedule::RawPassword => {
            if password.is_empty() {
                tracing::warn!("empty password with raw key schedule: payload is embedded unciphered");
            }
            Ok(Zeroizing::new(password.to_vec()))
        }
        KeySchedule::Derived(params) => {
            let salt = derive_salt(digest, password);
            kdf.derive(password, salt.as_slice(), params)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_params() -> KdfParams {
        KdfParams { time_cost: 1, memory_cost_kib: 64, parallelism: 1, output_len: 32 }
    }

    #[test]
    fn sha3_512_known_vector() {
        // SHA3-512("abc"), FIPS 202 example.
        let d = Sha3_512Digest.digest(b"abc");
        assert_eq!(&d[..8], &[0xb7, 0x51, 0x85, 0x0b, 0x1a, 0x57, 0x16, 0x8a]);
    }

    #[test]
    fn salt_is_deterministic_and_password_bound() {
        let a = derive_salt(&Sha3_512Digest, b"mypass");
        let b = derive_salt(&Sha3_512Digest, b"mypass");
        let c = derive_salt(&Sha3_512Digest, b"other");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn salt_is_sha3_prefix_of_domain_and_password() {
        let salt: Zeroizing<[u8; SALT_LEN]> = derive_salt(&Sha3_512Digest, b"test123");
        let full = Sha3_512Digest.digest(b"stegdct-salt-v1test123");
        assert_eq!(salt.as_slice(), &full[..SALT_LEN]);
    }

    #[test]
    fn argon2_key_deterministic() {
        let salt = derive_salt(&Sha3_512Digest, b"pw");
        let a = Argon2Kdf.derive(b"pw", salt.as_slice(), &fast_params()).unwrap();
        let b = Argon2Kdf.derive(b"pw", salt.as_slice(), &fast_params()).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.len(), 32);
    }

    #[test]
    fn argon2_key_differs_by_password() {
        let salt = [7u8; SALT_LEN];
        let a = Argon2Kdf.derive(b"pass1", &salt, &fast_params()).unwrap();
        let b = Argon2Kdf.derive(b"pass2", &salt, &fast_params()).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn argon2_rejects_bad_params() {
        let params = KdfParams { memory_cost_kib: 1, ..fast_params() };
        let result = Argon2Kdf.derive(b"pw", &[0u8; SALT_LEN], &params);
        assert!(matches!(result, Err(StegoError::KeyDerivationFailed(_))));
    }

    #[test]
    fn raw_schedule_returns_password_bytes() {
        let key = key_material(&KeySchedule::RawPassword, b"test123", &Argon2Kdf, &Sha3_512Digest).unwrap();
        assert_eq!(&key[..], b"test123");
    }

    #[test]
    fn derived_schedule_uses_kdf_length() {
        let schedule = KeySchedule::Derived(fast_params());
        let key = key_material(&schedule, b"test123", &Argon2Kdf, &Sha3_512Digest).unwrap();
        assert_eq!(key.len(), 32);
        assert_ne!(&key[..7], b"test123");
    }
}
