// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Authentication and authorization failure taxonomy.
//!
//! Every recognized failure maps to a stable wire code and an HTTP
//! status. Recognized failures are handled as values inside the chain;
//! anything unrecognized is folded into `Internal` at the outermost
//! stage so no error ever escapes as a panic.

use thiserror::Error;
use vbms_persistence::PersistenceError;

/// Authentication and authorization errors.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    /// Wrong username or password. Deliberately does not reveal which.
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// The presented access token is absent from the store, forged, or
    /// otherwise unusable.
    #[error("Auth token is invalid")]
    InvalidToken,

    /// The access token failed verification because it expired. The
    /// session record has been revoked as a side effect.
    #[error("Auth token has expired")]
    ExpiredSession,

    /// The refresh token does not match any stored session for the
    /// requesting user.
    #[error("Refresh token is invalid")]
    InvalidRefresh,

    /// No bearer token was found in the request.
    #[error("Auth token not found in the request body/ header")]
    MissingToken,

    /// No refresh token cookie was found on a refresh route.
    #[error("Refresh token not found in the request cookies")]
    MissingRefreshCookie,

    /// The verified principal's role is not in the route's accepted set.
    #[error("You are not authorized to perform this action")]
    RoleNotPermitted,

    /// A team-scoped route was called without a team identifier.
    #[error("Team ID not found in the request")]
    MissingTeamId,

    /// The principal's current player is not on the target team.
    #[error("You are not authorized to perform this action")]
    TeamOwnership,

    /// A player-scoped route was called without a player identifier.
    #[error("Player ID is not found in the request body/ params")]
    MissingPlayerId,

    /// A teammate-scoped route was called without a player identifier.
    ///
    /// Responds 401 rather than 400; existing clients depend on the
    /// discrepancy with `MissingPlayerId`, so it stays.
    #[error("Player ID is not found in the request body/ params")]
    MissingTeammateId,

    /// The principal's current player does not own or share a team with
    /// the target player.
    #[error("You are not authorized to perform this action")]
    PlayerOwnership,

    /// An unexpected failure in a store or lookup collaborator.
    #[error("Something went wrong! Reason: {0}")]
    Internal(String),
}

impl AuthError {
    /// Returns the stable wire code for this failure.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidCredentials | Self::InvalidToken => "AUTH_401",
            Self::ExpiredSession => "AUTH_EXP_401",
            Self::InvalidRefresh => "AUTH_403",
            Self::MissingToken => "ACC_401",
            Self::MissingRefreshCookie => "ACC_REFRESH_400",
            Self::RoleNotPermitted => "ACC_ROLE_403",
            Self::MissingTeamId => "ACC_TEAM_400",
            Self::TeamOwnership => "ACC_TEAM_403",
            Self::MissingPlayerId => "ACC_PLAYER_400",
            Self::MissingTeammateId => "ACC_PLAYER_401",
            Self::PlayerOwnership => "ACC_PLAYER_403",
            Self::Internal(_) => "ERR_500",
        }
    }

    /// Returns the HTTP status this failure responds with.
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        match self {
            Self::InvalidCredentials
            | Self::InvalidToken
            | Self::ExpiredSession
            | Self::MissingToken
            | Self::MissingTeammateId => 401,
            Self::InvalidRefresh
            | Self::RoleNotPermitted
            | Self::TeamOwnership
            | Self::PlayerOwnership => 403,
            Self::MissingRefreshCookie | Self::MissingTeamId | Self::MissingPlayerId => 400,
            Self::Internal(_) => 500,
        }
    }

    /// Returns whether this failure came out of token verification.
    ///
    /// The transport boundary clears the client refresh cookie for these
    /// (and only these) failures before responding.
    #[must_use]
    pub const fn is_verification_failure(&self) -> bool {
        matches!(
            self,
            Self::InvalidToken | Self::ExpiredSession | Self::MissingToken | Self::RoleNotPermitted
        )
    }
}

impl From<PersistenceError> for AuthError {
    fn from(err: PersistenceError) -> Self {
        Self::Internal(err.to_string())
    }
}
