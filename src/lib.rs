// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! # stegdct
//!
//! Pure-Rust steganography core that hides a password-ciphered payload in a
//! raw image buffer. Payload bits go into the quantized least-significant bit
//! of mid-frequency 8×8 DCT coefficients, so the change is spread over whole
//! blocks instead of sitting in individual sample LSBs.
//!
//! - `carrier`: sample buffer, block partitioning and the 8×8 DCT pair.
//! - `stego`: capacity model, payload cipher, framing and the embed/extract
//!   engine.
//!
//! Image container decoding and encoding stay with the caller: build a
//! [`Carrier`] from decoded samples and write the returned carrier back out
//! with a lossless codec.
//!
//! # Quick start
//!
//! ```rust,ignore
//! use stegdct::{Carrier, embed, extract};
//!
//! let carrier = Carrier::new(width, height, 3, rgb_samples)?;
//! let stego = embed(&carrier, b"secret message", b"passphrase")?;
//! let payload = extract(&stego.carrier, b"passphrase")?;
//! assert_eq!(payload, b"secret message");
//! ```

pub mod carrier;
pub mod stego;

pub use carrier::error::CarrierError;
pub use carrier::{BlockCoord, Carrier};
pub use stego::{capacity, embed, extract};
pub use stego::{Capacity, Embedded, Engine, ErrorKind, StegoConfig, StegoError};
pub use stego::{Argon2Kdf, KdfParams, KeyDerivation, KeySchedule, MessageDigest, Sha3_512Digest};
