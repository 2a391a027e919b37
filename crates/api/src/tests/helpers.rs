// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Test fixtures: in-memory collaborators seeded with a small roster.

use std::sync::Arc;

use time::Duration;
use vbms_domain::{Player, PlayerId, Role, Team, TeamId, TeamRef};
use vbms_persistence::{InMemoryRoster, InMemorySessionStore, InMemoryUserStore, UserRecord};

use crate::{AuthConfig, AuthenticationService, AuthorizationChain, RefreshTransport};

pub const ALICE_PASSWORD: &str = "alice-password-1";
pub const BOB_PASSWORD: &str = "bob-password-1";
pub const ADMIN_PASSWORD: &str = "admin-password-1";

pub struct Fixture {
    pub auth: AuthenticationService,
    pub chain: AuthorizationChain,
    pub sessions: Arc<InMemorySessionStore>,
}

// bcrypt does not export MIN_COST; its value (4) is inlined here.
const MIN_COST: u32 = 4;

/// Low-cost bcrypt for test seeding only.
fn seed_hash(password: &str) -> String {
    bcrypt::hash(password, MIN_COST).unwrap()
}

fn seed_users() -> Arc<InMemoryUserStore> {
    let users = Arc::new(InMemoryUserStore::new());
    users
        .insert(UserRecord {
            username: String::from("alice"),
            password_hash: seed_hash(ALICE_PASSWORD),
            role: Role::Player,
        })
        .unwrap();
    users
        .insert(UserRecord {
            username: String::from("bob"),
            password_hash: seed_hash(BOB_PASSWORD),
            role: Role::Player,
        })
        .unwrap();
    users
        .insert(UserRecord {
            username: String::from("root"),
            password_hash: seed_hash(ADMIN_PASSWORD),
            role: Role::Admin,
        })
        .unwrap();
    users
}

/// Teams T1/T2; alice and bob on T1, carol on T2.
fn seed_roster() -> Arc<InMemoryRoster> {
    let roster = Arc::new(InMemoryRoster::new());
    roster
        .add_team(Team {
            team_id: TeamId(1),
            name: String::from("Spikers"),
        })
        .unwrap();
    roster
        .add_team(Team {
            team_id: TeamId(2),
            name: String::from("Blockers"),
        })
        .unwrap();

    let spikers = TeamRef {
        id: TeamId(1),
        name: String::from("Spikers"),
    };
    let blockers = TeamRef {
        id: TeamId(2),
        name: String::from("Blockers"),
    };

    roster
        .add_player(Player {
            player_id: PlayerId(10),
            username: String::from("alice"),
            name: String::from("Alice"),
            team: spikers.clone(),
        })
        .unwrap();
    roster
        .add_player(Player {
            player_id: PlayerId(11),
            username: String::from("bob"),
            name: String::from("Bob"),
            team: spikers,
        })
        .unwrap();
    roster
        .add_player(Player {
            player_id: PlayerId(12),
            username: String::from("carol"),
            name: String::from("Carol"),
            team: blockers,
        })
        .unwrap();
    roster
}

pub fn fixture_with_config(config: AuthConfig) -> Fixture {
    let sessions = Arc::new(InMemorySessionStore::new());
    let auth = AuthenticationService::new(sessions.clone(), seed_users(), config);
    let roster = seed_roster();
    let chain = AuthorizationChain::new(auth.clone(), roster.clone(), roster);
    Fixture {
        auth,
        chain,
        sessions,
    }
}

pub fn fixture() -> Fixture {
    fixture_with_config(AuthConfig::default())
}

/// A fixture whose access tokens are already expired when issued.
pub fn expired_fixture() -> Fixture {
    fixture_with_config(AuthConfig {
        access_token_lifetime: Duration::minutes(-5),
        ..AuthConfig::default()
    })
}

/// A fixture that returns refresh tokens in response bodies.
pub fn body_transport_fixture() -> Fixture {
    fixture_with_config(AuthConfig {
        refresh_transport: RefreshTransport::Body,
        ..AuthConfig::default()
    })
}
