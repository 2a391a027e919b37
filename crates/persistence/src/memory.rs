// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! In-memory store implementations.
//!
//! These are the reference implementations of the store contracts: a
//! `RwLock`-guarded map per store, with every mutation performed under a
//! single write lock so records are created, replaced, and deleted
//! atomically.

use std::collections::HashMap;
use std::sync::RwLock;

use tracing::debug;
use vbms_domain::{Player, PlayerId, Team, TeamId};

use crate::error::PersistenceError;
use crate::records::{SessionTokenRecord, UserRecord};
use crate::store::{PlayerDirectory, SessionStore, TeamDirectory, UserStore};

fn poisoned<T>(_: T) -> PersistenceError {
    PersistenceError::LockPoisoned(String::from("in-memory store lock"))
}

/// In-memory session token store keyed by access token.
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    records: RwLock<HashMap<String, SessionTokenRecord>>,
}

impl InMemorySessionStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of active session records.
    ///
    /// # Errors
    ///
    /// Returns an error if the store lock is poisoned.
    pub fn len(&self) -> Result<usize, PersistenceError> {
        Ok(self.records.read().map_err(poisoned)?.len())
    }

    /// Returns whether the store holds no records.
    ///
    /// # Errors
    ///
    /// Returns an error if the store lock is poisoned.
    pub fn is_empty(&self) -> Result<bool, PersistenceError> {
        Ok(self.records.read().map_err(poisoned)?.is_empty())
    }
}

impl SessionStore for InMemorySessionStore {
    fn find(&self, token: &str) -> Result<Option<SessionTokenRecord>, PersistenceError> {
        Ok(self.records.read().map_err(poisoned)?.get(token).cloned())
    }

    fn create(&self, record: SessionTokenRecord) -> Result<(), PersistenceError> {
        let mut records = self.records.write().map_err(poisoned)?;
        if records.contains_key(&record.token) {
            return Err(PersistenceError::DuplicateToken(record.token));
        }
        debug!(username = %record.username, "Creating session record");
        records.insert(record.token.clone(), record);
        Ok(())
    }

    fn delete(&self, token: &str) -> Result<bool, PersistenceError> {
        let removed = self
            .records
            .write()
            .map_err(poisoned)?
            .remove(token)
            .is_some();
        debug!(removed, "Deleting session record");
        Ok(removed)
    }

    fn find_by_refresh_token(
        &self,
        refresh_token: &str,
    ) -> Result<Option<SessionTokenRecord>, PersistenceError> {
        Ok(self
            .records
            .read()
            .map_err(poisoned)?
            .values()
            .find(|record| record.refresh_token == refresh_token)
            .cloned())
    }

    fn replace(
        &self,
        old_token: &str,
        record: SessionTokenRecord,
    ) -> Result<(), PersistenceError> {
        let mut records = self.records.write().map_err(poisoned)?;
        if records.remove(old_token).is_none() {
            return Err(PersistenceError::SessionNotFound(old_token.to_string()));
        }
        debug!(username = %record.username, "Rotating session record");
        records.insert(record.token.clone(), record);
        Ok(())
    }
}

/// In-memory credential store keyed by username.
#[derive(Debug, Default)]
pub struct InMemoryUserStore {
    users: RwLock<HashMap<String, UserRecord>>,
}

impl InMemoryUserStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or overwrites a user's stored credentials.
    ///
    /// # Errors
    ///
    /// Returns an error if the store lock is poisoned.
    pub fn insert(&self, record: UserRecord) -> Result<(), PersistenceError> {
        self.users
            .write()
            .map_err(poisoned)?
            .insert(record.username.clone(), record);
        Ok(())
    }
}

impl UserStore for InMemoryUserStore {
    fn find_user(&self, username: &str) -> Result<Option<UserRecord>, PersistenceError> {
        Ok(self.users.read().map_err(poisoned)?.get(username).cloned())
    }
}

/// In-memory player and team directory.
///
/// Serves as both lookup collaborators; tests and single-process
/// deployments seed it directly.
#[derive(Debug, Default)]
pub struct InMemoryRoster {
    players: RwLock<Vec<Player>>,
    teams: RwLock<Vec<Team>>,
}

impl InMemoryRoster {
    /// Creates an empty roster.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a player to the roster.
    ///
    /// # Errors
    ///
    /// Returns an error if the roster lock is poisoned.
    pub fn add_player(&self, player: Player) -> Result<(), PersistenceError> {
        self.players.write().map_err(poisoned)?.push(player);
        Ok(())
    }

    /// Adds a team to the roster.
    ///
    /// # Errors
    ///
    /// Returns an error if the roster lock is poisoned.
    pub fn add_team(&self, team: Team) -> Result<(), PersistenceError> {
        self.teams.write().map_err(poisoned)?.push(team);
        Ok(())
    }
}

impl PlayerDirectory for InMemoryRoster {
    fn player_by_username(&self, username: &str) -> Result<Option<Player>, PersistenceError> {
        Ok(self
            .players
            .read()
            .map_err(poisoned)?
            .iter()
            .find(|player| player.username == username)
            .cloned())
    }

    fn player_by_id(&self, player_id: PlayerId) -> Result<Option<Player>, PersistenceError> {
        Ok(self
            .players
            .read()
            .map_err(poisoned)?
            .iter()
            .find(|player| player.player_id == player_id)
            .cloned())
    }
}

impl TeamDirectory for InMemoryRoster {
    fn team_by_id(&self, team_id: TeamId) -> Result<Option<Team>, PersistenceError> {
        Ok(self
            .teams
            .read()
            .map_err(poisoned)?
            .iter()
            .find(|team| team.team_id == team_id)
            .cloned())
    }
}
