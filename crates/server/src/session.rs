// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Session extraction and authorization guards for the server.
//!
//! This module owns the transport contract of the authentication core:
//! the access token travels in `Authorization: Bearer <token>`, the
//! refresh token in an http-only cookie. Guards are Axum extractors;
//! each runs the authorization chain with its route's accepted role set
//! and rejects with the structured `{status, code, message}` payload.
//! Rejections caused by token verification also clear the client's
//! refresh cookie, so a dead access token stops being offered for
//! renewal.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{HeaderMap, StatusCode, header::SET_COOKIE, request::Parts},
    response::{IntoResponse, Response},
};
use tracing::{debug, warn};
use vbms_api::{ApiFailure, AuthContext, AuthError};
use vbms_domain::Role;

use crate::AppState;

/// Name of the refresh token cookie.
pub const REFRESH_TOKEN_COOKIE: &str = "refresh_token";

const COMMON_ROLES: &[Role] = &[Role::Admin, Role::Player];
const ADMIN_ROLES: &[Role] = &[Role::Admin];
const PLAYER_ROLES: &[Role] = &[Role::Player];

/// Extracts the bearer token from the `Authorization` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get("Authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::to_string)
}

/// Extracts a cookie value from the `Cookie` header.
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    let cookies = headers.get("cookie").and_then(|v| v.to_str().ok())?;
    cookies.split(';').find_map(|pair| {
        let (key, value) = pair.trim().split_once('=')?;
        (key == name).then(|| value.to_string())
    })
}

/// Builds the `Set-Cookie` value carrying a refresh token.
///
/// `HttpOnly` always; `Secure` only in production-equivalent
/// environments so local development over plain HTTP keeps working.
#[must_use]
pub fn refresh_cookie(value: &str, max_age_seconds: i64, production: bool) -> String {
    let secure = if production { "; Secure" } else { "" };
    format!("{REFRESH_TOKEN_COOKIE}={value}; Path=/; HttpOnly; Max-Age={max_age_seconds}{secure}")
}

/// Builds the `Set-Cookie` value that clears the refresh cookie.
#[must_use]
pub fn clear_refresh_cookie(production: bool) -> String {
    refresh_cookie("", 0, production)
}

/// Converts an authorization failure into its HTTP response.
///
/// When `clear_cookie` is set the response also expires the client's
/// refresh cookie.
pub fn failure_response(error: &AuthError, clear_cookie: bool, production: bool) -> Response {
    let status =
        StatusCode::from_u16(error.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut response = (status, Json(ApiFailure::from(error))).into_response();
    if clear_cookie {
        if let Ok(header) = clear_refresh_cookie(production).parse() {
            response.headers_mut().insert(SET_COOKIE, header);
        }
    }
    response
}

/// An authorization guard rejection, convertible to a response.
#[derive(Debug)]
pub struct AuthRejection {
    error: AuthError,
    clear_cookie: bool,
    production: bool,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        failure_response(&self.error, self.clear_cookie, self.production)
    }
}

fn guard(parts: &Parts, state: &AppState, roles: &[Role]) -> Result<AuthContext, AuthRejection> {
    let token = bearer_token(&parts.headers);
    state
        .chain
        .authorize(token.as_deref(), roles)
        .map_err(|error| {
            warn!(code = error.code(), "Request rejected by authorization chain");
            AuthRejection {
                clear_cookie: error.is_verification_failure(),
                production: state.production,
                error,
            }
        })
}

/// Guard for routes open to any authenticated user.
pub struct CommonUser(pub AuthContext);

impl FromRequestParts<AppState> for CommonUser {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        guard(parts, state, COMMON_ROLES).map(Self)
    }
}

/// Guard for admin-only routes.
pub struct AdminUser(pub AuthContext);

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        guard(parts, state, ADMIN_ROLES).map(Self)
    }
}

/// Guard for player-only routes.
pub struct PlayerUser(pub AuthContext);

impl FromRequestParts<AppState> for PlayerUser {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        guard(parts, state, PLAYER_ROLES).map(Self)
    }
}

/// Guard for the refresh route: validates the refresh cookie and
/// resolves its owner without touching the access token.
pub struct RefreshUser {
    /// The user the refresh cookie belongs to.
    pub username: String,
    /// The presented refresh token.
    pub refresh_token: String,
}

impl FromRequestParts<AppState> for RefreshUser {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let cookie = cookie_value(&parts.headers, REFRESH_TOKEN_COOKIE);
        match state.chain.authorize_refresh(cookie.as_deref()) {
            Ok(username) => {
                debug!(username = %username, "Refresh cookie accepted");
                Ok(Self {
                    username,
                    refresh_token: cookie.unwrap_or_default(),
                })
            }
            Err(error) => Err(AuthRejection {
                error,
                clear_cookie: true,
                production: state.production,
            }),
        }
    }
}
