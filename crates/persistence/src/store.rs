// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::PersistenceError;
use crate::records::{SessionTokenRecord, UserRecord};
use vbms_domain::{Player, PlayerId, Team, TeamId};

/// The session token store consumed by the token service.
///
/// Implementations must be safe for concurrent use and must make every
/// mutation atomic per record: a record with a token but no secret must
/// never be observable. `delete` is idempotent so that racing deletions
/// of the same token are harmless.
pub trait SessionStore: Send + Sync {
    /// Looks up a session record by its access token.
    ///
    /// # Errors
    ///
    /// Returns an error if the store itself fails.
    fn find(&self, token: &str) -> Result<Option<SessionTokenRecord>, PersistenceError>;

    /// Persists a new session record.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::DuplicateToken` if a record with the
    /// same token already exists, or an error if the store fails.
    fn create(&self, record: SessionTokenRecord) -> Result<(), PersistenceError>;

    /// Deletes the session record for the given token.
    ///
    /// Returns whether a record existed. Deleting an absent record is a
    /// no-op, not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the store itself fails.
    fn delete(&self, token: &str) -> Result<bool, PersistenceError>;

    /// Looks up a session record by its refresh token.
    ///
    /// # Errors
    ///
    /// Returns an error if the store itself fails.
    fn find_by_refresh_token(
        &self,
        refresh_token: &str,
    ) -> Result<Option<SessionTokenRecord>, PersistenceError>;

    /// Atomically replaces the record stored under `old_token` with a
    /// successor record.
    ///
    /// Used for refresh rotation: the old record (and with it the old
    /// signing secret) must disappear in the same step that the new
    /// record appears, so no interleaved reader ever sees both or
    /// neither.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError::SessionNotFound` if `old_token` has no
    /// record, or an error if the store fails.
    fn replace(
        &self,
        old_token: &str,
        record: SessionTokenRecord,
    ) -> Result<(), PersistenceError>;
}

/// The credential store consumed by `authenticate`.
pub trait UserStore: Send + Sync {
    /// Looks up a user's stored credentials by login name.
    ///
    /// # Errors
    ///
    /// Returns an error if the store itself fails.
    fn find_user(&self, username: &str) -> Result<Option<UserRecord>, PersistenceError>;
}

/// Read-only player lookup collaborator used by ownership checks.
pub trait PlayerDirectory: Send + Sync {
    /// Resolves the current player for a principal's login name.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup service fails.
    fn player_by_username(&self, username: &str) -> Result<Option<Player>, PersistenceError>;

    /// Resolves a player by identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup service fails.
    fn player_by_id(&self, player_id: PlayerId) -> Result<Option<Player>, PersistenceError>;
}

/// Read-only team lookup collaborator used by ownership checks.
pub trait TeamDirectory: Send + Sync {
    /// Resolves a team by identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the lookup service fails.
    fn team_by_id(&self, team_id: TeamId) -> Result<Option<Team>, PersistenceError>;
}
