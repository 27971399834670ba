// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Steganographic embedding and extraction.
//!
//! Payload bits are written into the quantized LSB of mid-frequency DCT
//! coefficients of full 8×8 sample blocks. The payload is framed with a
//! length header and run through a password-keyed XOR cipher first.
//!
//! The free functions here use [`StegoConfig::default`]; build an
//! [`Engine`] for any other policy or for injected collaborators.

pub mod error;
pub mod config;
pub mod policy;
pub mod capacity;
pub mod crypto;
pub mod cipher;
pub mod frame;
mod pipeline;

pub use capacity::Capacity;
pub use config::{KdfParams, KeySchedule, StegoConfig};
pub use crypto::{Argon2Kdf, KeyDerivation, MessageDigest, Sha3_512Digest};
pub use error::{ErrorKind, StegoError};
pub use pipeline::{Embedded, Engine};
pub use policy::CoefficientPolicy;

use crate::carrier::Carrier;

/// Hide `payload` in a copy of `carrier` under the default configuration.
///
/// # Errors
/// See [`Engine::embed`].
pub fn embed(carrier: &Carrier, payload: &[u8], password: &[u8]) -> Result<Embedded, StegoError> {
    Engine::default().embed(carrier, payload, password)
}

/// Recover a payload hidden with [`embed`].
///
/// # Errors
/// See [`Engine::extract`].
pub fn extract(carrier: &Carrier, password: &[u8]) -> Result<Vec<u8>, StegoError> {
    Engine::default().extract(carrier, password)
}

/// Capacity of `carrier` under the default configuration.
pub fn capacity(carrier: &Carrier) -> Result<Capacity, StegoError> {
    capacity::capacity(carrier, &StegoConfig::default())
}
