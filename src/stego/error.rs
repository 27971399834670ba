// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Error types for the embedding and extraction pipelines.
//!
//! [`StegoError`] covers every failure from carrier validation through key
//! derivation and frame parsing. [`ErrorKind`] groups the variants into the
//! coarse categories callers branch on.

use core::fmt;

use crate::carrier::error::CarrierError;

/// Coarse failure category of a [`StegoError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Empty or malformed carrier, payload or configuration.
    InvalidInput,
    /// The payload frame does not fit the carrier's capacity.
    PayloadTooLarge,
    /// A transform was handed something other than an 8×8 block.
    InvalidBlockSize,
    /// The extracted length header or integrity tag is implausible.
    HeaderCorrupt,
    /// The key-derivation collaborator rejected its inputs.
    KeyDerivation,
    /// A buffer could not be allocated.
    AllocationFailure,
}

/// Errors that can occur during embedding or extraction.
#[derive(Debug)]
pub enum StegoError {
    /// Caller input is empty or unusable.
    InvalidInput(&'static str),
    /// The carrier buffer failed validation or block access.
    InvalidCarrier(CarrierError),
    /// The configuration is out of range.
    InvalidConfig(&'static str),
    /// The framed payload needs more bits than the carrier offers.
    PayloadTooLarge { needed_bits: usize, available_bits: usize },
    /// The decoded length header exceeds what the carrier can hold.
    HeaderCorrupt { declared: usize, max: usize },
    /// The recovered payload does not match its integrity tag.
    IntegrityMismatch,
    /// Key derivation failed.
    KeyDerivationFailed(String),
    /// Allocating a buffer of the given byte size failed.
    AllocationFailure(usize),
}

impl StegoError {
    /// The category this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidInput(_) | Self::InvalidConfig(_) => ErrorKind::InvalidInput,
            Self::InvalidCarrier(CarrierError::InvalidBlockSize(_)) => ErrorKind::InvalidBlockSize,
            Self::InvalidCarrier(_) => ErrorKind::InvalidInput,
            Self::PayloadTooLarge { .. } => ErrorKind::PayloadTooLarge,
            Self::HeaderCorrupt { .. } | Self::IntegrityMismatch => ErrorKind::HeaderCorrupt,
            Self::KeyDerivationFailed(_) => ErrorKind::KeyDerivation,
            Self::AllocationFailure(_) => ErrorKind::AllocationFailure,
        }
    }
}

impl fmt::Display for StegoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
            Self::InvalidCarrier(e) => write!(f, "invalid carrier: {e}"),
            Self::InvalidConfig(msg) => write!(f, "invalid configuration: {msg}"),
            Self::PayloadTooLarge { needed_bits, available_bits } => write!(
                f,
                "payload too large for carrier: needs {needed_bits} bits, capacity is {available_bits} bits"
            ),
            Self::HeaderCorrupt { declared, max } => write!(
                f,
                "length header declares {declared} bytes but the carrier holds at most {max} (wrong password?)"
            ),
            Self::IntegrityMismatch => write!(f, "payload integrity tag mismatch (wrong password?)"),
            Self::KeyDerivationFailed(msg) => write!(f, "key derivation failed: {msg}"),
            Self::AllocationFailure(n) => write!(f, "failed to allocate {n} bytes"),
        }
    }
}

impl std::error::Error for StegoError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::InvalidCarrier(e) => Some(e),
            _ => None,
        }
    }
}

impl From<CarrierError> for StegoError {
    fn from(e: CarrierError) -> Self {
        Self::InvalidCarrier(e)
    }
}
