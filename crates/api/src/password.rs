// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Password encoding and verification.

use thiserror::Error;
use tracing::warn;

/// Credential encoder errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PasswordError {
    /// The raw password was empty or absent.
    #[error("rawPassword can not be empty")]
    EmptyRawPassword,

    /// The bcrypt library failed.
    #[error("Password hashing failed: {0}")]
    Hash(String),
}

/// One-way password encoder backed by bcrypt.
///
/// Encoding embeds a fresh random salt on every call, so two encodings
/// of the same password never match each other but both verify.
/// Verification is intentionally slow.
#[derive(Debug, Clone, Copy, Default)]
pub struct BcryptPasswordEncoder;

impl BcryptPasswordEncoder {
    /// Creates a new encoder.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Encodes a raw password with a per-call random salt.
    ///
    /// # Errors
    ///
    /// Returns `PasswordError::EmptyRawPassword` for an empty input, or
    /// `PasswordError::Hash` if bcrypt fails.
    pub fn encode(&self, raw_password: &str) -> Result<String, PasswordError> {
        if raw_password.is_empty() {
            return Err(PasswordError::EmptyRawPassword);
        }
        bcrypt::hash(raw_password, bcrypt::DEFAULT_COST)
            .map_err(|e| PasswordError::Hash(e.to_string()))
    }

    /// Compares a raw password against a stored encoding.
    ///
    /// Fails closed rather than erroring on bad stored data: an empty or
    /// non-bcrypt `encoded_password` yields `Ok(false)` so a malformed
    /// stored credential can never crash the authentication path. An
    /// empty `raw_password` is a caller bug and is an error.
    ///
    /// # Errors
    ///
    /// Returns `PasswordError::EmptyRawPassword` for an empty raw
    /// password, or `PasswordError::Hash` if bcrypt itself fails on a
    /// well-formed hash.
    pub fn matches(
        &self,
        raw_password: &str,
        encoded_password: &str,
    ) -> Result<bool, PasswordError> {
        if raw_password.is_empty() {
            return Err(PasswordError::EmptyRawPassword);
        }

        if encoded_password.is_empty() {
            warn!("Empty encoded password");
            return Ok(false);
        }

        if !looks_like_bcrypt(encoded_password) {
            warn!("Encoded password does not look like BCrypt");
            return Ok(false);
        }

        bcrypt::verify(raw_password, encoded_password)
            .map_err(|e| PasswordError::Hash(e.to_string()))
    }
}

/// Checks the `$2[ayb]$NN$<53 chars of [./0-9A-Za-z]>` bcrypt shape.
fn looks_like_bcrypt(encoded: &str) -> bool {
    let Some(rest) = encoded.strip_prefix("$2") else {
        return false;
    };
    let rest = rest
        .strip_prefix(['a', 'y', 'b'])
        .unwrap_or(rest);
    let Some(rest) = rest.strip_prefix('$') else {
        return false;
    };
    let bytes = rest.as_bytes();
    if bytes.len() != 2 + 1 + 53 {
        return false;
    }
    if !bytes[0].is_ascii_digit() || !bytes[1].is_ascii_digit() || bytes[2] != b'$' {
        return false;
    }
    bytes[3..]
        .iter()
        .all(|b| b.is_ascii_alphanumeric() || *b == b'.' || *b == b'/')
}
