// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The authorization chain applied to every protected request.
//!
//! Stages run in a fixed order and short-circuit on the first failure:
//! token extraction, token verification, role membership, then the
//! optional resource-ownership check the route asked for. Role checks
//! know nothing about resource identifiers; ownership checks always
//! resolve the principal's *current* player server-side and never trust
//! client-supplied identity.

use std::sync::Arc;

use tracing::{debug, warn};
use vbms_domain::{Player, PlayerId, Principal, Role, TeamId};
use vbms_persistence::{PlayerDirectory, TeamDirectory};

use crate::error::AuthError;
use crate::token::{AuthenticationService, Verification};

/// The request context produced by a successful authorization.
///
/// Ownership stages attach the resolved current player for downstream
/// handlers, mirroring what the route ultimately operates on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    /// The verified principal.
    pub principal: Principal,
    /// The bearer token the request arrived with.
    pub token: String,
    /// Whether the principal carries the Admin role.
    pub is_admin: bool,
    /// The principal's current player, if an ownership stage ran.
    pub player: Option<Player>,
}

/// Composable, ordered authorization checks.
///
/// Constructed once with its collaborators and shared across requests;
/// holds no per-request state.
#[derive(Clone)]
pub struct AuthorizationChain {
    auth: AuthenticationService,
    players: Arc<dyn PlayerDirectory>,
    teams: Arc<dyn TeamDirectory>,
}

impl AuthorizationChain {
    /// Creates a new chain with injected collaborators.
    #[must_use]
    pub const fn new(
        auth: AuthenticationService,
        players: Arc<dyn PlayerDirectory>,
        teams: Arc<dyn TeamDirectory>,
    ) -> Self {
        Self {
            auth,
            players,
            teams,
        }
    }

    /// Returns the underlying token service.
    #[must_use]
    pub const fn auth(&self) -> &AuthenticationService {
        &self.auth
    }

    /// Runs the token and role stages for a protected route.
    ///
    /// # Errors
    ///
    /// - `AuthError::MissingToken` when no bearer token was extracted.
    /// - `AuthError::InvalidToken` when no session record matches.
    /// - `AuthError::ExpiredSession` when the token expired (the session
    ///   is revoked as a side effect).
    /// - `AuthError::RoleNotPermitted` when the principal's role is not
    ///   in `roles`.
    /// - `AuthError::Internal` for unexpected verification or store
    ///   failures.
    pub fn authorize(
        &self,
        bearer_token: Option<&str>,
        roles: &[Role],
    ) -> Result<AuthContext, AuthError> {
        let Some(token) = bearer_token.filter(|t| !t.is_empty()) else {
            return Err(AuthError::MissingToken);
        };

        let principal = match self.auth.verify(token)? {
            Verification::Valid(principal) => principal,
            Verification::Expired => return Err(AuthError::ExpiredSession),
            Verification::Invalid => return Err(AuthError::InvalidToken),
        };

        if !roles.contains(&principal.role) {
            warn!(
                username = %principal.username,
                role = %principal.role,
                "Role not permitted for this route"
            );
            return Err(AuthError::RoleNotPermitted);
        }

        debug!(username = %principal.username, role = %principal.role, "Request authorized");
        let is_admin = principal.is_admin();
        Ok(AuthContext {
            principal,
            token: token.to_string(),
            is_admin,
            player: None,
        })
    }

    /// Guards the refresh route: resolves which user owns the refresh
    /// cookie, without touching the access token.
    ///
    /// # Errors
    ///
    /// - `AuthError::MissingRefreshCookie` when no cookie was presented.
    /// - `AuthError::InvalidRefresh` when no session matches the cookie.
    pub fn authorize_refresh(&self, refresh_cookie: Option<&str>) -> Result<String, AuthError> {
        let Some(refresh_token) = refresh_cookie.filter(|t| !t.is_empty()) else {
            return Err(AuthError::MissingRefreshCookie);
        };

        self.auth
            .owner_of_refresh_token(refresh_token)?
            .ok_or(AuthError::InvalidRefresh)
    }

    /// Ownership stage: the target resource is a team and the current
    /// player must be on it.
    ///
    /// Admins bypass the comparison unconditionally. On success the
    /// resolved current player is attached to the context.
    ///
    /// # Errors
    ///
    /// - `AuthError::MissingTeamId` when the route carried no team
    ///   identifier (checked before any lookup).
    /// - `AuthError::TeamOwnership` when the current player's team does
    ///   not match the target team.
    pub fn authorize_same_team(
        &self,
        ctx: &mut AuthContext,
        team_id: Option<TeamId>,
    ) -> Result<(), AuthError> {
        let Some(team_id) = team_id else {
            return Err(AuthError::MissingTeamId);
        };

        if ctx.is_admin {
            ctx.player = self.players.player_by_username(&ctx.principal.username)?;
            return Ok(());
        }

        let current = self.current_player(ctx, AuthError::TeamOwnership)?;
        let target = self.teams.team_by_id(team_id)?;

        match target {
            Some(team) if current.is_on_team(team.team_id) => {
                ctx.player = Some(current);
                Ok(())
            }
            _ => {
                warn!(
                    username = %ctx.principal.username,
                    team_id = %team_id,
                    "Team ownership check failed"
                );
                Err(AuthError::TeamOwnership)
            }
        }
    }

    /// Ownership stage: the target resource is a player and must be the
    /// current player themselves.
    ///
    /// The identifier may come from route parameters or the request
    /// body; the parameter takes precedence.
    ///
    /// # Errors
    ///
    /// - `AuthError::MissingPlayerId` when neither source carried an
    ///   identifier.
    /// - `AuthError::PlayerOwnership` on an identity mismatch.
    pub fn authorize_same_player(
        &self,
        ctx: &mut AuthContext,
        param_player_id: Option<PlayerId>,
        body_player_id: Option<PlayerId>,
    ) -> Result<(), AuthError> {
        let Some(player_id) = param_player_id.or(body_player_id) else {
            return Err(AuthError::MissingPlayerId);
        };

        self.check_target_player(ctx, player_id, |current, target| {
            current.player_id == target.player_id
        })
    }

    /// Ownership stage: the target resource is a player who must share a
    /// team with the current player (teammate-of, not identity).
    ///
    /// # Errors
    ///
    /// - `AuthError::MissingTeammateId` when the route carried no player
    ///   identifier (401, kept for wire compatibility).
    /// - `AuthError::PlayerOwnership` when the two players are on
    ///   different teams.
    pub fn authorize_current_player_team(
        &self,
        ctx: &mut AuthContext,
        param_player_id: Option<PlayerId>,
    ) -> Result<(), AuthError> {
        let Some(player_id) = param_player_id else {
            return Err(AuthError::MissingTeammateId);
        };

        self.check_target_player(ctx, player_id, Player::is_teammate_of)
    }

    fn check_target_player(
        &self,
        ctx: &mut AuthContext,
        player_id: PlayerId,
        related: impl Fn(&Player, &Player) -> bool,
    ) -> Result<(), AuthError> {
        if ctx.is_admin {
            ctx.player = self.players.player_by_username(&ctx.principal.username)?;
            return Ok(());
        }

        let current = self.current_player(ctx, AuthError::PlayerOwnership)?;
        let target = self.players.player_by_id(player_id)?;

        match target {
            Some(target) if related(&current, &target) => {
                ctx.player = Some(current);
                Ok(())
            }
            _ => {
                warn!(
                    username = %ctx.principal.username,
                    player_id = %player_id,
                    "Player ownership check failed"
                );
                Err(AuthError::PlayerOwnership)
            }
        }
    }

    /// Resolves the current player for a non-admin principal.
    ///
    /// A principal with no player row can never pass an ownership
    /// comparison, so the stage's 403 is returned rather than a 500.
    fn current_player(&self, ctx: &AuthContext, denial: AuthError) -> Result<Player, AuthError> {
        match self.players.player_by_username(&ctx.principal.username)? {
            Some(player) => Ok(player),
            None => {
                warn!(
                    username = %ctx.principal.username,
                    "No current player for principal"
                );
                Err(denial)
            }
        }
    }
}
