// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all
)]

//! Authentication and authorization core for VBMS.
//!
//! This crate implements credential verification, per-session token
//! issuance and verification with lazy expiry revocation, refresh-token
//! rotation, and the composable authorization chain (role membership plus
//! resource-ownership checks) applied to every protected request.
//!
//! HTTP transport lives in the server crate; persistence lives behind the
//! contracts in `vbms_persistence`. Every service here is explicitly
//! constructed and takes its collaborators by injection, so the whole
//! chain is testable against in-memory doubles.

mod authorize;
mod error;
mod keys;
mod password;
mod response;
mod token;

#[cfg(test)]
mod tests;

pub use authorize::{AuthContext, AuthorizationChain};
pub use error::AuthError;
pub use keys::{generate_hash, generate_secure_random_key};
pub use password::{BcryptPasswordEncoder, PasswordError};
pub use response::{ApiFailure, ApiSuccess};
pub use token::{
    AuthConfig, AuthSession, AuthenticationService, RefreshTransport, SigninData, Verification,
};
