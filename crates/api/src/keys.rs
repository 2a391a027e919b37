// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Key and digest minting utilities.
//!
//! Per-session signing secrets and refresh tokens are 256-bit random
//! values rendered as hex. Secrets are never derived from each other or
//! from user data, which is what makes per-session revocation possible.

use sha2::{Digest, Sha256};

fn to_hex(bytes: &[u8]) -> String {
    use std::fmt::Write;
    bytes.iter().fold(
        String::with_capacity(bytes.len() * 2),
        |mut out, byte| {
            let _ = write!(out, "{byte:02x}");
            out
        },
    )
}

/// Computes the SHA-256 digest of a string, hex-encoded.
#[must_use]
pub fn generate_hash(raw: &str) -> String {
    to_hex(&Sha256::digest(raw.as_bytes()))
}

/// Generates a 256-bit random key, hex-encoded.
///
/// When `hash` is true the random value is additionally passed through
/// SHA-256, so the returned string reveals nothing about the generator
/// output even if it leaks.
#[must_use]
pub fn generate_secure_random_key(hash: bool) -> String {
    let bytes: [u8; 32] = rand::random();
    if hash {
        to_hex(&Sha256::digest(bytes))
    } else {
        to_hex(&bytes)
    }
}
