// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Tests for the in-memory store implementations.

use time::OffsetDateTime;
use vbms_domain::{Player, PlayerId, Role, Team, TeamId, TeamRef};

use crate::{
    InMemoryRoster, InMemorySessionStore, InMemoryUserStore, PersistenceError, PlayerDirectory,
    SessionStore, SessionTokenRecord, TeamDirectory, UserRecord, UserStore,
};

fn record(token: &str, username: &str, refresh: &str) -> SessionTokenRecord {
    SessionTokenRecord {
        token: token.to_string(),
        secret_key: format!("secret-for-{token}"),
        username: username.to_string(),
        refresh_token: refresh.to_string(),
        created_at: OffsetDateTime::now_utc(),
    }
}

#[test]
fn find_returns_created_record() {
    let store = InMemorySessionStore::new();
    store.create(record("tok-1", "alice", "ref-1")).unwrap();

    let found = store.find("tok-1").unwrap().unwrap();
    assert_eq!(found.username, "alice");
    assert_eq!(found.refresh_token, "ref-1");
}

#[test]
fn create_rejects_duplicate_token() {
    let store = InMemorySessionStore::new();
    store.create(record("tok-1", "alice", "ref-1")).unwrap();

    let err = store.create(record("tok-1", "bob", "ref-2")).unwrap_err();
    assert_eq!(err, PersistenceError::DuplicateToken(String::from("tok-1")));
}

#[test]
fn delete_is_idempotent() {
    let store = InMemorySessionStore::new();
    store.create(record("tok-1", "alice", "ref-1")).unwrap();

    assert!(store.delete("tok-1").unwrap());
    assert!(!store.delete("tok-1").unwrap());
    assert!(store.find("tok-1").unwrap().is_none());
}

#[test]
fn find_by_refresh_token_matches_exactly() {
    let store = InMemorySessionStore::new();
    store.create(record("tok-1", "alice", "ref-1")).unwrap();
    store.create(record("tok-2", "bob", "ref-2")).unwrap();

    let found = store.find_by_refresh_token("ref-2").unwrap().unwrap();
    assert_eq!(found.username, "bob");
    assert!(store.find_by_refresh_token("ref-3").unwrap().is_none());
}

#[test]
fn replace_swaps_old_record_for_new() {
    let store = InMemorySessionStore::new();
    store.create(record("tok-1", "alice", "ref-1")).unwrap();

    store
        .replace("tok-1", record("tok-2", "alice", "ref-2"))
        .unwrap();

    assert!(store.find("tok-1").unwrap().is_none());
    let rotated = store.find("tok-2").unwrap().unwrap();
    assert_eq!(rotated.refresh_token, "ref-2");
    assert_eq!(store.len().unwrap(), 1);
}

#[test]
fn replace_of_missing_record_fails_without_inserting() {
    let store = InMemorySessionStore::new();

    let err = store
        .replace("tok-gone", record("tok-2", "alice", "ref-2"))
        .unwrap_err();
    assert_eq!(
        err,
        PersistenceError::SessionNotFound(String::from("tok-gone"))
    );
    assert!(store.is_empty().unwrap());
}

#[test]
fn sessions_for_same_user_coexist() {
    let store = InMemorySessionStore::new();
    store.create(record("tok-1", "alice", "ref-1")).unwrap();
    store.create(record("tok-2", "alice", "ref-2")).unwrap();

    assert_eq!(store.len().unwrap(), 2);
    assert!(store.find("tok-1").unwrap().is_some());
    assert!(store.find("tok-2").unwrap().is_some());
}

#[test]
fn user_store_finds_inserted_users() {
    let store = InMemoryUserStore::new();
    store
        .insert(UserRecord {
            username: String::from("alice"),
            password_hash: String::from("$2b$10$abcdefghijklmnopqrstuv"),
            role: Role::Player,
        })
        .unwrap();

    let user = store.find_user("alice").unwrap().unwrap();
    assert_eq!(user.role, Role::Player);
    assert!(store.find_user("bob").unwrap().is_none());
}

#[test]
fn roster_resolves_players_and_teams() {
    let roster = InMemoryRoster::new();
    roster
        .add_team(Team {
            team_id: TeamId(1),
            name: String::from("Spikers"),
        })
        .unwrap();
    roster
        .add_player(Player {
            player_id: PlayerId(10),
            username: String::from("alice"),
            name: String::from("Alice"),
            team: TeamRef {
                id: TeamId(1),
                name: String::from("Spikers"),
            },
        })
        .unwrap();

    let by_name = roster.player_by_username("alice").unwrap().unwrap();
    assert_eq!(by_name.player_id, PlayerId(10));
    let by_id = roster.player_by_id(PlayerId(10)).unwrap().unwrap();
    assert_eq!(by_id.username, "alice");
    assert!(roster.player_by_id(PlayerId(99)).unwrap().is_none());

    let team = roster.team_by_id(TeamId(1)).unwrap().unwrap();
    assert_eq!(team.name, "Spikers");
    assert!(roster.team_by_id(TeamId(2)).unwrap().is_none());
}
