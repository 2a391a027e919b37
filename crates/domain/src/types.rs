// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// User roles for authorization.
///
/// The role set is closed: authorization logic is defined only for these
/// two roles and composite sets built from them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    /// Admin role: back-office operators with full authority.
    ///
    /// Admins may perform any role-gated action and bypass every
    /// resource-ownership comparison unconditionally.
    Admin,
    /// Player role: end users of the application.
    ///
    /// Players may only act on resources they own or share a team with,
    /// as determined by the per-route ownership checks.
    Player,
}

impl FromStr for Role {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ADMIN" => Ok(Self::Admin),
            "PLAYER" => Ok(Self::Player),
            _ => Err(DomainError::InvalidRole(s.to_string())),
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Role {
    /// Converts this role to its wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "ADMIN",
            Self::Player => "PLAYER",
        }
    }
}

/// An authenticated identity derived from a verified token.
///
/// Immutable within a request; supplied by the token service as the
/// payload of a verified access token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    /// The unique login name of the user.
    pub username: String,
    /// The role assigned to the user.
    #[serde(rename = "roleName")]
    pub role: Role,
}

impl Principal {
    /// Creates a new principal.
    #[must_use]
    pub const fn new(username: String, role: Role) -> Self {
        Self { username, role }
    }

    /// Returns whether this principal carries the Admin role.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin)
    }
}

/// Canonical numeric identifier of a player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub i64);

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Canonical numeric identifier of a team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamId(pub i64);

impl std::fmt::Display for TeamId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The team a player currently belongs to, embedded in a `Player`.
///
/// A player belongs to exactly one team at a time; ownership checks
/// assume single-team membership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamRef {
    /// The team identifier.
    pub id: TeamId,
    /// The team display name.
    pub name: String,
}

/// A player entity, read-only to the authentication core.
///
/// Resolved via the player lookup collaborator, either as the "current
/// player" of an authenticated principal or as the target of a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// The player identifier.
    #[serde(rename = "playerId")]
    pub player_id: PlayerId,
    /// The owning principal's login name.
    pub username: String,
    /// The player display name.
    pub name: String,
    /// The team the player currently belongs to.
    pub team: TeamRef,
}

impl Player {
    /// Returns whether this player is on the given team.
    #[must_use]
    pub fn is_on_team(&self, team_id: TeamId) -> bool {
        self.team.id == team_id
    }

    /// Returns whether this player shares a team with another player.
    #[must_use]
    pub fn is_teammate_of(&self, other: &Self) -> bool {
        self.team.id == other.team.id
    }
}

/// A team entity, read-only to the authentication core.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Team {
    /// The team identifier.
    #[serde(rename = "teamId")]
    pub team_id: TeamId,
    /// The team display name.
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_round_trips_through_wire_names() {
        assert_eq!("ADMIN".parse::<Role>().unwrap(), Role::Admin);
        assert_eq!("PLAYER".parse::<Role>().unwrap(), Role::Player);
        assert_eq!(Role::Admin.as_str(), "ADMIN");
        assert_eq!(Role::Player.as_str(), "PLAYER");
    }

    #[test]
    fn unknown_role_is_rejected() {
        let err = "COACH".parse::<Role>().unwrap_err();
        assert_eq!(err, DomainError::InvalidRole(String::from("COACH")));
    }

    #[test]
    fn principal_serializes_role_name_field() {
        let principal = Principal::new(String::from("alice"), Role::Player);
        let json = serde_json::to_value(&principal).unwrap();
        assert_eq!(json["username"], "alice");
        assert_eq!(json["roleName"], "PLAYER");
    }

    #[test]
    fn admin_is_admin() {
        assert!(Principal::new(String::from("root"), Role::Admin).is_admin());
        assert!(!Principal::new(String::from("alice"), Role::Player).is_admin());
    }
}
