// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during persistence operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    /// A store lock was poisoned by a panicking writer.
    LockPoisoned(String),
    /// A session record with the same token already exists.
    DuplicateToken(String),
    /// The record targeted by a rotation no longer exists.
    SessionNotFound(String),
    /// A general storage error occurred.
    Other(String),
}

impl std::fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::LockPoisoned(msg) => write!(f, "Store lock poisoned: {msg}"),
            Self::DuplicateToken(token) => {
                write!(f, "Session record already exists for token: {token}")
            }
            Self::SessionNotFound(token) => write!(f, "Session not found: {token}"),
            Self::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for PersistenceError {}
