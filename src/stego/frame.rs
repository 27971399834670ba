// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Payload frame construction and parsing.
//!
//! The frame is the byte string actually written into the carrier:
//!
//! ```text
//! [4 bytes] body length L (big-endian u32)
//! [L bytes] ciphered body
//! ```
//!
//! The body is the plaintext, optionally followed by an 8-byte integrity tag
//! (first bytes of the plaintext digest), with the whole body run through the
//! payload cipher. The header itself is not ciphered so the extractor can
//! bound the read before any key material is involved.
//!
//! Bits are packed MSB-first within each byte.

use zeroize::Zeroizing;

use crate::stego::crypto::MessageDigest;
use crate::stego::error::StegoError;

/// Length prefix size in bytes.
pub const HEADER_LEN: usize = 4;

/// Integrity tag size in bytes.
pub const TAG_LEN: usize = 8;

/// Header size in bits.
pub const HEADER_BITS: usize = HEADER_LEN * 8;

/// Allocate an empty buffer of `len` capacity, surfacing allocator failure.
pub(crate) fn try_alloc<T>(len: usize) -> Result<Vec<T>, StegoError> {
    let mut v = Vec::new();
    v.try_reserve_exact(len)
        .map_err(|_| StegoError::AllocationFailure(len.saturating_mul(std::mem::size_of::<T>())))?;
    Ok(v)
}

/// Build the body: plaintext plus the optional integrity tag, not yet ciphered.
pub fn build_body(plaintext: &[u8], digest: Option<&dyn MessageDigest>) -> Result<Zeroizing<Vec<u8>>, StegoError> {
    let tag_len = if digest.is_some() { TAG_LEN } else { 0 };
    let mut body = Zeroizing::new(try_alloc(plaintext.len() + tag_len)?);
    body.extend_from_slice(plaintext);
    if let Some(d) = digest {
        body.extend_from_slice(integrity_tag(d, plaintext).as_slice());
    }
    Ok(body)
}

/// Split a deciphered body into plaintext and verify its tag.
///
/// Returns [`StegoError::IntegrityMismatch`] if the tag does not match.
pub fn open_body<'a>(body: &'a [u8], digest: Option<&dyn MessageDigest>) -> Result<&'a [u8], StegoError> {
    let Some(d) = digest else {
        return Ok(body);
    };
    if body.len() < TAG_LEN {
        return Err(StegoError::IntegrityMismatch);
    }
    let (plaintext, tag) = body.split_at(body.len() - TAG_LEN);
    if integrity_tag(d, plaintext).as_slice() != tag {
        return Err(StegoError::IntegrityMismatch);
    }
    Ok(plaintext)
}

/// First [`TAG_LEN`] bytes of the plaintext digest, wiped on drop.
pub fn integrity_tag(digest: &dyn MessageDigest, plaintext: &[u8]) -> Zeroizing<[u8; TAG_LEN]> {
    let full = Zeroizing::new(digest.digest(plaintext));
    let mut tag = Zeroizing::new([0u8; TAG_LEN]);
    tag.copy_from_slice(&full[..TAG_LEN]);
    tag
}

/// Prefix the ciphered body with its length header.
///
/// Fails with [`StegoError::PayloadTooLarge`] if the body overflows the u32 header.
pub fn build_frame(body: &[u8]) -> Result<Zeroizing<Vec<u8>>, StegoError> {
    let len = u32::try_from(body.len()).map_err(|_| StegoError::PayloadTooLarge {
        needed_bits: body.len().saturating_add(HEADER_LEN).saturating_mul(8),
        available_bits: (u32::MAX as usize).saturating_mul(8),
    })?;
    let mut frame = Zeroizing::new(try_alloc(HEADER_LEN + body.len())?);
    frame.extend_from_slice(&len.to_be_bytes());
    frame.extend_from_slice(body);
    Ok(frame)
}

/// Decode the body length from the first [`HEADER_BITS`] bits.
pub fn decode_header(bits: &[u8]) -> usize {
    debug_assert!(bits.len() >= HEADER_BITS);
    bits[..HEADER_BITS]
        .iter()
        .fold(0u32, |acc, &b| (acc << 1) | (b & 1) as u32) as usize
}

/// Convert bytes to a bit vector (MSB first within each byte).
pub fn bytes_to_bits(bytes: &[u8]) -> Result<Zeroizing<Vec<u8>>, StegoError> {
    let mut bits = Zeroizing::new(try_alloc(bytes.len() * 8)?);
    for &byte in bytes {
        for bit_pos in (0..8).rev() {
            bits.push((byte >> bit_pos) & 1);
        }
    }
    Ok(bits)
}

/// Convert a bit vector (MSB first) back to bytes.
/// Pads the last byte with zero bits if `bits.len()` is not a multiple of 8.
pub fn bits_to_bytes(bits: &[u8]) -> Result<Zeroizing<Vec<u8>>, StegoError> {
    let mut bytes = Zeroizing::new(try_alloc(bits.len().div_ceil(8))?);
    for chunk in bits.chunks(8) {
        let mut byte = 0u8;
        for (i, &bit) in chunk.iter().enumerate() {
            byte |= (bit & 1) << (7 - i);
        }
        bytes.push(byte);
    }
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct XorDigest;

    impl MessageDigest for XorDigest {
        fn digest(&self, data: &[u8]) -> [u8; 64] {
            let mut out = [0u8; 64];
            for (i, &b) in data.iter().enumerate() {
                out[i % 64] ^= b.rotate_left(i as u32 % 8);
            }
            out[63] = data.len() as u8;
            out
        }
    }

    #[test]
    fn frame_layout() {
        let frame = build_frame(&[0xAA, 0xBB, 0xCC]).unwrap();
        assert_eq!(&frame[..], &[0, 0, 0, 3, 0xAA, 0xBB, 0xCC]);
    }

    #[test]
    fn header_decodes_from_bits() {
        let frame = build_frame(&vec![7u8; 300]).unwrap();
        let bits = bytes_to_bits(&frame).unwrap();
        assert_eq!(bits.len(), (HEADER_LEN + 300) * 8);
        assert_eq!(decode_header(&bits), 300);
    }

    #[test]
    fn bit_order_is_msb_first() {
        let bits = bytes_to_bits(&[0b1000_0001, 0x40]).unwrap();
        assert_eq!(&bits[..8], &[1, 0, 0, 0, 0, 0, 0, 1]);
        assert_eq!(&bits[8..], &[0, 1, 0, 0, 0, 0, 0, 0]);
        assert_eq!(&bits_to_bytes(&bits).unwrap()[..], &[0b1000_0001, 0x40]);
    }

    #[test]
    fn partial_byte_is_zero_padded() {
        assert_eq!(&bits_to_bytes(&[1, 1, 1]).unwrap()[..], &[0b1110_0000]);
    }

    #[test]
    fn body_without_tag_is_plaintext() {
        let body = build_body(b"hello", None).unwrap();
        assert_eq!(&body[..], b"hello");
        assert_eq!(open_body(&body, None).unwrap(), b"hello");
    }

    #[test]
    fn tagged_body_verifies() {
        let body = build_body(b"hello", Some(&XorDigest)).unwrap();
        assert_eq!(body.len(), 5 + TAG_LEN);
        assert_eq!(open_body(&body, Some(&XorDigest)).unwrap(), b"hello");
    }

    #[test]
    fn tag_is_wiped_digest_prefix() {
        let tag: Zeroizing<[u8; TAG_LEN]> = integrity_tag(&XorDigest, b"hello");
        assert_eq!(tag.as_slice(), &XorDigest.digest(b"hello")[..TAG_LEN]);
    }

    #[test]
    fn tampered_body_fails_tag() {
        let mut body = build_body(b"hello", Some(&XorDigest)).unwrap();
        body[0] ^= 0x01;
        assert!(matches!(open_body(&body, Some(&XorDigest)), Err(StegoError::IntegrityMismatch)));
        assert!(matches!(open_body(&[1, 2, 3], Some(&XorDigest)), Err(StegoError::IntegrityMismatch)));
    }
}
