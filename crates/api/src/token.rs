// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Session token issuance, verification, refresh, and revocation.
//!
//! Every session is signed with its own random secret, stored server-side
//! in the session record. Verification looks the secret up by token, so
//! deleting the record revokes the session in O(1) with no blocklist.
//! Revocation happens on logout or lazily on the first verification that
//! finds the token expired; there is no background sweep.

use std::sync::Arc;

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};
use tracing::{debug, info, warn};
use vbms_domain::{Principal, Role};
use vbms_persistence::{SessionStore, SessionTokenRecord, UserStore};

use crate::error::AuthError;
use crate::keys::generate_secure_random_key;
use crate::password::{BcryptPasswordEncoder, PasswordError};

/// How the refresh token reaches the client.
///
/// Both modes exist in production: browser-facing deployments keep the
/// refresh token out of JSON bodies and carry it only in an http-only
/// cookie, while the admin-facing API returns it in the body for
/// non-browser clients.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefreshTransport {
    /// Refresh token travels only in the `refresh_token` cookie and is
    /// stripped from response bodies.
    Cookie,
    /// Refresh token is returned in the response body.
    Body,
}

/// Token service configuration.
#[derive(Debug, Clone, Copy)]
pub struct AuthConfig {
    /// Validity window of an access token.
    pub access_token_lifetime: Duration,
    /// Validity window of the refresh cookie.
    pub refresh_token_lifetime: Duration,
    /// How the refresh token is exposed to clients.
    pub refresh_transport: RefreshTransport,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            access_token_lifetime: Duration::minutes(15),
            refresh_token_lifetime: Duration::days(30),
            refresh_transport: RefreshTransport::Cookie,
        }
    }
}

/// JWT claims carried by an access token.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    user: Principal,
    iat: i64,
    exp: i64,
}

/// The outcome of verifying an access token.
///
/// Expiry and forgery are values to branch on, not errors to catch;
/// only genuinely unexpected failures surface as `AuthError`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verification {
    /// Signature and expiry check out; here is the decoded principal.
    Valid(Principal),
    /// The token expired. Its session record has been revoked.
    Expired,
    /// No session record exists for the token.
    Invalid,
}

/// A freshly issued session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    /// The signed access token.
    pub token: String,
    /// The paired rotation credential.
    pub refresh_token: String,
    /// The authenticated principal.
    pub principal: Principal,
}

/// Response payload for signin and refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SigninData {
    /// The signed access token.
    pub token: String,
    /// The refresh token; present only in body transport mode.
    #[serde(rename = "refreshToken", skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// The authenticated user's login name.
    pub username: String,
    /// The authenticated user's role.
    #[serde(rename = "roleName")]
    pub role: Role,
}

/// Session-based authentication service.
///
/// State machine per session: issued → valid while unexpired →
/// verified on each request, or expired-and-revoked on the first
/// verification after expiry. Logout is the other path to revocation.
#[derive(Clone)]
pub struct AuthenticationService {
    sessions: Arc<dyn SessionStore>,
    users: Arc<dyn UserStore>,
    encoder: BcryptPasswordEncoder,
    config: AuthConfig,
}

impl AuthenticationService {
    /// Creates a new authentication service with injected collaborators.
    #[must_use]
    pub fn new(sessions: Arc<dyn SessionStore>, users: Arc<dyn UserStore>, config: AuthConfig) -> Self {
        Self {
            sessions,
            users,
            encoder: BcryptPasswordEncoder::new(),
            config,
        }
    }

    /// Returns the service configuration.
    #[must_use]
    pub const fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Verifies credentials and opens a new session.
    ///
    /// On success a fresh per-session secret is minted, the claims
    /// `{user, iat, exp}` are signed with it, and the record (token,
    /// secret, username, refresh token) is persisted. Concurrent logins
    /// for the same user produce independent session records.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` on an unknown username or
    /// a password mismatch, without revealing which one was wrong.
    pub fn authenticate(&self, username: &str, password: &str) -> Result<AuthSession, AuthError> {
        let Some(user) = self.users.find_user(username)? else {
            debug!(username, "Authentication failed: unknown user");
            return Err(AuthError::InvalidCredentials);
        };

        let matched = match self.encoder.matches(password, &user.password_hash) {
            Ok(matched) => matched,
            Err(PasswordError::EmptyRawPassword) => false,
            Err(e) => return Err(AuthError::Internal(e.to_string())),
        };
        if !matched {
            debug!(username, "Authentication failed: password mismatch");
            return Err(AuthError::InvalidCredentials);
        }

        let principal = Principal::new(user.username, user.role);
        let session = self.issue_session(principal)?;

        info!(username = %session.principal.username, "Session opened");
        Ok(session)
    }

    /// Verifies an access token against its stored session secret.
    ///
    /// An unknown token yields `Verification::Invalid`. An expired token
    /// deletes the session record (one-shot, irreversible) and yields
    /// `Verification::Expired`; a replayed expired token then fails as
    /// `Invalid` because the record is gone.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::Internal` for signature failures other than
    /// expiry (those indicate a corrupt record, never a normal client),
    /// or if the store fails.
    pub fn verify(&self, token: &str) -> Result<Verification, AuthError> {
        if token.is_empty() {
            return Ok(Verification::Invalid);
        }

        let Some(record) = self.sessions.find(token)? else {
            debug!("Verification failed: no session record for token");
            return Ok(Verification::Invalid);
        };

        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;

        match decode::<Claims>(
            token,
            &DecodingKey::from_secret(record.secret_key.as_bytes()),
            &validation,
        ) {
            Ok(data) => Ok(Verification::Valid(data.claims.user)),
            Err(e) if matches!(e.kind(), ErrorKind::ExpiredSignature) => {
                warn!(username = %record.username, "Expired token presented; revoking session");
                self.sessions.delete(token)?;
                Ok(Verification::Expired)
            }
            Err(e) => Err(AuthError::Internal(format!(
                "Token verification failed: {e}"
            ))),
        }
    }

    /// Resolves which user a refresh token belongs to.
    ///
    /// Used by the refresh route guard before rotation.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub fn owner_of_refresh_token(
        &self,
        refresh_token: &str,
    ) -> Result<Option<String>, AuthError> {
        Ok(self
            .sessions
            .find_by_refresh_token(refresh_token)?
            .map(|record| record.username))
    }

    /// Rotates a session: new access token, new secret, new refresh
    /// token, all replacing the old record atomically.
    ///
    /// The old signing secret is discarded with the old record, so the
    /// previous access token immediately stops verifying. This is the
    /// anti-replay property of rotation.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidRefresh` if the refresh token is
    /// unknown or belongs to a different user; the store is untouched in
    /// that case.
    pub fn refresh(&self, refresh_token: &str, username: &str) -> Result<AuthSession, AuthError> {
        let Some(record) = self.sessions.find_by_refresh_token(refresh_token)? else {
            warn!(username, "Refresh failed: unknown refresh token");
            return Err(AuthError::InvalidRefresh);
        };
        if record.username != username {
            warn!(username, "Refresh failed: refresh token owner mismatch");
            return Err(AuthError::InvalidRefresh);
        }

        let Some(user) = self.users.find_user(&record.username)? else {
            return Err(AuthError::InvalidRefresh);
        };
        let principal = Principal::new(user.username, user.role);

        let (successor, session) = self.mint(principal)?;
        self.sessions.replace(&record.token, successor)?;

        info!(username = %session.principal.username, "Session rotated");
        Ok(session)
    }

    /// Closes a session by deleting its record.
    ///
    /// Idempotent: logging out a token that is already gone is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error only if the store fails.
    pub fn logout(&self, principal: &Principal, token: &str) -> Result<(), AuthError> {
        let removed = self.sessions.delete(token)?;
        info!(username = %principal.username, removed, "Session closed");
        Ok(())
    }

    /// Shapes a session into the signin/refresh response payload,
    /// honoring the configured refresh transport.
    #[must_use]
    pub fn signin_data(&self, session: &AuthSession) -> SigninData {
        let refresh_token = match self.config.refresh_transport {
            RefreshTransport::Cookie => None,
            RefreshTransport::Body => Some(session.refresh_token.clone()),
        };
        SigninData {
            token: session.token.clone(),
            refresh_token,
            username: session.principal.username.clone(),
            role: session.principal.role,
        }
    }

    fn issue_session(&self, principal: Principal) -> Result<AuthSession, AuthError> {
        let (record, session) = self.mint(principal)?;
        self.sessions.create(record)?;
        Ok(session)
    }

    /// Signs a new token for the principal and builds its session
    /// record, without touching the store.
    fn mint(&self, principal: Principal) -> Result<(SessionTokenRecord, AuthSession), AuthError> {
        let secret_key = generate_secure_random_key(false);
        let refresh_token = generate_secure_random_key(true);

        let now = OffsetDateTime::now_utc();
        let claims = Claims {
            user: principal.clone(),
            iat: now.unix_timestamp(),
            exp: (now + self.config.access_token_lifetime).unix_timestamp(),
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(secret_key.as_bytes()),
        )
        .map_err(|e| AuthError::Internal(format!("Token signing failed: {e}")))?;

        let record = SessionTokenRecord {
            token: token.clone(),
            secret_key,
            username: principal.username.clone(),
            refresh_token: refresh_token.clone(),
            created_at: now,
        };

        Ok((
            record,
            AuthSession {
                token,
                refresh_token,
                principal,
            },
        ))
    }
}
