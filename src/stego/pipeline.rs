// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Embed and extract pipelines.
//!
//! Embedding is one linear pass over the carrier:
//! 1. Validate the payload and config, check capacity (before any key work)
//! 2. Derive key material and cipher the body (plaintext + optional tag)
//! 3. Prefix the 4-byte length header and unpack the frame into bits
//! 4. For each block in visiting order: pull samples into the safe range,
//!    forward DCT, write one bit per policy position, inverse DCT, write back
//!
//! Extraction walks the same blocks, reads the header, bounds it against
//! capacity and then reads exactly the declared body.

use tracing::{debug, trace};
use zeroize::Zeroizing;

use crate::carrier::dct::{self, Block};
use crate::carrier::{BlockCoord, Carrier};
use crate::stego::capacity::{self, Capacity};
use crate::stego::cipher;
use crate::stego::config::StegoConfig;
use crate::stego::crypto::{self, Argon2Kdf, KeyDerivation, MessageDigest, Sha3_512Digest};
use crate::stego::error::StegoError;
use crate::stego::frame::{self, HEADER_BITS, HEADER_LEN, TAG_LEN};
use crate::stego::policy::CoefficientPolicy;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Result of a successful embed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Embedded {
    /// Modified carrier with the input's geometry.
    pub carrier: Carrier,
    /// Bits written, header included.
    pub frame_bits: usize,
    /// Blocks that carry at least one bit.
    pub blocks_used: usize,
}

/// Embedding and extraction engine bound to one configuration.
///
/// Holds no per-call state; the same engine can serve any number of carriers.
#[derive(Debug, Clone)]
pub struct Engine<K = Argon2Kdf, D = Sha3_512Digest> {
    config: StegoConfig,
    kdf: K,
    digest: D,
}

impl Engine {
    /// Engine with the Argon2id / SHA3-512 collaborators.
    pub fn new(config: StegoConfig) -> Self {
        Self { config, kdf: Argon2Kdf, digest: Sha3_512Digest }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(StegoConfig::default())
    }
}

impl<K: KeyDerivation, D: MessageDigest> Engine<K, D> {
    /// Engine with caller-supplied key-derivation and digest collaborators.
    pub fn with_collaborators(config: StegoConfig, kdf: K, digest: D) -> Self {
        Self { config, kdf, digest }
    }

    pub fn config(&self) -> &StegoConfig {
        &self.config
    }

    /// Capacity of `carrier` under this engine's configuration.
    pub fn capacity(&self, carrier: &Carrier) -> Result<Capacity, StegoError> {
        capacity::capacity(carrier, &self.config)
    }

    /// Hide `payload` in a copy of `carrier`.
    ///
    /// # Errors
    /// - [`StegoError::InvalidInput`] if `payload` is empty.
    /// - [`StegoError::InvalidConfig`] if the configuration does not validate.
    /// - [`StegoError::PayloadTooLarge`] if the frame exceeds capacity.
    /// - [`StegoError::KeyDerivationFailed`] if the KDF rejects its inputs.
    /// - [`StegoError::AllocationFailure`] if a working buffer cannot be allocated.
    pub fn embed(&self, carrier: &Carrier, payload: &[u8], password: &[u8]) -> Result<Embedded, StegoError> {
        if payload.is_empty() {
            return Err(StegoError::InvalidInput("payload is empty"));
        }
        let policy = self.config.validate()?;
        let cap = self.capacity(carrier)?;
        let frame_len = HEADER_LEN
            .saturating_add(payload.len())
            .saturating_add(self.tag_len());
        if let Err(e) = cap.check_fits(frame_len) {
            debug!(payload_len = payload.len(), capacity_bits = cap.bits(), "payload does not fit carrier");
            return Err(e);
        }

        let key = crypto::key_material(&self.config.key_schedule, password, &self.kdf, &self.digest)?;
        let mut body = frame::build_body(payload, self.tag_digest())?;
        cipher::apply(&mut body, &key);
        let framed = frame::build_frame(&body)?;
        let bits = frame::bytes_to_bits(&framed)?;

        let mut samples = frame::try_alloc(carrier.samples().len())?;
        samples.extend_from_slice(carrier.samples());
        let mut out = Carrier::new(carrier.width(), carrier.height(), carrier.channels(), samples)?;
        let blocks_used = embed_bits(&mut out, policy, &bits)?;

        debug!(
            width = carrier.width(),
            height = carrier.height(),
            channels = carrier.channels(),
            frame_bits = bits.len(),
            capacity_bits = cap.bits(),
            blocks_used,
            "payload embedded"
        );
        Ok(Embedded { carrier: out, frame_bits: bits.len(), blocks_used })
    }

    /// Recover the payload hidden in `carrier`.
    ///
    /// # Errors
    /// - [`StegoError::InvalidInput`] if the carrier cannot hold a header.
    /// - [`StegoError::HeaderCorrupt`] if the decoded length is implausible.
    /// - [`StegoError::IntegrityMismatch`] if the integrity tag does not verify.
    /// - [`StegoError::KeyDerivationFailed`] if the KDF rejects its inputs.
    pub fn extract(&self, carrier: &Carrier, password: &[u8]) -> Result<Vec<u8>, StegoError> {
        let policy = self.config.validate()?;
        let cap = self.capacity(carrier)?;
        if cap.bits() < HEADER_BITS {
            return Err(StegoError::InvalidInput("carrier too small to hold a payload frame"));
        }

        let header = read_bits(carrier, policy, HEADER_BITS)?;
        let declared = frame::decode_header(&header);
        let max = cap.bytes().saturating_sub(HEADER_LEN);
        let min = 1 + self.tag_len();
        if declared > max || declared < min {
            debug!(declared, max, "length header out of range");
            return Err(StegoError::HeaderCorrupt { declared, max });
        }

        let bits = read_bits(carrier, policy, (HEADER_LEN + declared) * 8)?;
        let mut framed = frame::bits_to_bytes(&bits)?;
        let key = crypto::key_material(&self.config.key_schedule, password, &self.kdf, &self.digest)?;
        cipher::apply(&mut framed[HEADER_LEN..], &key);
        let plaintext = frame::open_body(&framed[HEADER_LEN..], self.tag_digest())?;

        let mut out = frame::try_alloc(plaintext.len())?;
        out.extend_from_slice(plaintext);
        debug!(payload_len = out.len(), capacity_bits = cap.bits(), "payload extracted");
        Ok(out)
    }

    fn tag_len(&self) -> usize {
        if self.config.integrity_tag { TAG_LEN } else { 0 }
    }

    fn tag_digest(&self) -> Option<&dyn MessageDigest> {
        if self.config.integrity_tag {
            Some(&self.digest as &dyn MessageDigest)
        } else {
            None
        }
    }
}

/// Write `bits` into consecutive blocks of `carrier`, returning the blocks used.
fn embed_bits(carrier: &mut Carrier, policy: &CoefficientPolicy, bits: &[u8]) -> Result<usize, StegoError> {
    let per_block = policy.bits_per_block();
    let mut jobs = frame::try_alloc(bits.len().div_ceil(per_block))?;
    for (index, chunk) in bits.chunks(per_block).enumerate() {
        let coord = carrier.block_coord(index).ok_or_else(|| StegoError::PayloadTooLarge {
            needed_bits: bits.len(),
            available_bits: capacity::block_capacity_bits(carrier, policy),
        })?;
        jobs.push((coord, chunk));
    }

    let blocks = transform_jobs(carrier, policy, &jobs)?;
    for (coord, block) in &blocks {
        carrier.write_block(*coord, block)?;
    }
    Ok(blocks.len())
}

/// Compute the modified sample block for every job. Blocks are disjoint, so
/// the jobs are independent; results are written back by the caller.
fn transform_jobs(
    carrier: &Carrier,
    policy: &CoefficientPolicy,
    jobs: &[(BlockCoord, &[u8])],
) -> Result<Vec<(BlockCoord, Block)>, StegoError> {
    let margin = policy.sample_margin();
    let job = |&(coord, bits): &(BlockCoord, &[u8])| -> Result<(BlockCoord, Block), StegoError> {
        let samples = carrier.read_block(coord)?;
        trace!(?coord, bits = bits.len(), "embedding block");
        Ok((coord, embed_block(&samples, bits, policy, margin)))
    };

    #[cfg(feature = "parallel")]
    let blocks = jobs.par_iter().map(job).collect();

    #[cfg(not(feature = "parallel"))]
    let blocks = jobs.iter().map(job).collect();

    blocks
}

/// Embed up to `policy.bits_per_block()` bits into one sample block.
fn embed_block(samples: &Block, bits: &[u8], policy: &CoefficientPolicy, margin: f64) -> Block {
    let mut pulled = *samples;
    for v in pulled.values_mut() {
        *v = v.clamp(margin, 255.0 - margin);
    }
    let mut coeffs = dct::forward(&pulled);
    for (&(u, v), &bit) in policy.positions.iter().zip(bits) {
        coeffs.set(u, v, policy.embed_bit(coeffs.get(u, v), bit));
    }
    dct::inverse(&coeffs)
}

/// Read the first `count` bits in visiting order.
fn read_bits(carrier: &Carrier, policy: &CoefficientPolicy, count: usize) -> Result<Zeroizing<Vec<u8>>, StegoError> {
    let per_block = policy.bits_per_block();
    let n_blocks = count.div_ceil(per_block);
    let read_one = |index: usize| -> Result<Zeroizing<Vec<u8>>, StegoError> {
        let coord = carrier
            .block_coord(index)
            .ok_or(StegoError::InvalidInput("frame extends past the last carrier block"))?;
        let coeffs = dct::forward(&carrier.read_block(coord)?);
        Ok(Zeroizing::new(
            policy.positions.iter().map(|&(u, v)| policy.read_bit(coeffs.get(u, v))).collect(),
        ))
    };

    #[cfg(feature = "parallel")]
    let per_block_bits: Vec<Zeroizing<Vec<u8>>> = (0..n_blocks).into_par_iter().map(read_one).collect::<Result<_, _>>()?;

    #[cfg(not(feature = "parallel"))]
    let per_block_bits: Vec<Zeroizing<Vec<u8>>> = (0..n_blocks).map(read_one).collect::<Result<_, _>>()?;

    let mut bits = Zeroizing::new(frame::try_alloc(n_blocks * per_block)?);
    for chunk in &per_block_bits {
        bits.extend_from_slice(chunk);
    }
    bits.truncate(count);
    Ok(bits)
}
