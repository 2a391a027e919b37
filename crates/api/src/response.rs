// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Wire envelopes shared by every endpoint.
//!
//! Failures always serialize as `{"status":"failed","code":...,"message":...}`
//! and successes as `{"status":"success","data":...}`.

use serde::{Deserialize, Serialize};

use crate::error::AuthError;

/// The structured failure payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiFailure {
    /// Always `"failed"`.
    pub status: String,
    /// The stable wire code, e.g. `AUTH_401`.
    pub code: String,
    /// A human-readable description.
    pub message: String,
}

impl ApiFailure {
    /// Builds a failure payload from an explicit code and message.
    #[must_use]
    pub fn new(code: &str, message: &str) -> Self {
        Self {
            status: String::from("failed"),
            code: code.to_string(),
            message: message.to_string(),
        }
    }
}

impl From<&AuthError> for ApiFailure {
    fn from(err: &AuthError) -> Self {
        Self::new(err.code(), &err.to_string())
    }
}

/// The structured success payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiSuccess<T> {
    /// Always `"success"`.
    pub status: String,
    /// The operation-specific payload.
    pub data: T,
}

impl<T> ApiSuccess<T> {
    /// Wraps a payload in the success envelope.
    #[must_use]
    pub fn new(data: T) -> Self {
        Self {
            status: String::from("success"),
            data,
        }
    }
}
