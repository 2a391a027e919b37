// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use vbms_domain::Role;

/// A persisted session row binding an access token to its verification
/// material.
///
/// One record exists per outstanding login. The record is created on
/// successful credential verification, read on every protected request,
/// and deleted on logout or on the first verification that fails because
/// the token expired. No two active records share a `secret_key`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionTokenRecord {
    /// The opaque signed access token; unique primary lookup key.
    pub token: String,
    /// The per-session random signing secret, generated at login and
    /// never reused across sessions.
    pub secret_key: String,
    /// The owning principal's login name.
    pub username: String,
    /// The rotation credential paired 1:1 with this record.
    pub refresh_token: String,
    /// When this session was created.
    pub created_at: OffsetDateTime,
}

/// A stored credential row for a user.
///
/// This is the contract of the credential-store collaborator consumed by
/// `authenticate`; user management itself is outside the core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    /// The unique login name.
    pub username: String,
    /// The bcrypt-encoded password.
    pub password_hash: String,
    /// The role assigned to the user.
    pub role: Role,
}
