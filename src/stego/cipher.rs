// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Repeating-key XOR over the payload body.
//!
//! Reversible obfuscation only: no diffusion between bytes and no
//! authentication. Applying it twice with the same key restores the input.
//! Callers who need confidentiality must encrypt the payload themselves
//! before handing it to the engine.

/// XOR `data` in place with `key`, repeating the key as needed.
///
/// An empty key leaves `data` untouched.
pub fn apply(data: &mut [u8], key: &[u8]) {
    if key.is_empty() {
        return;
    }
    for (byte, k) in data.iter_mut().zip(key.iter().cycle()) {
        *byte ^= k;
    }
}
