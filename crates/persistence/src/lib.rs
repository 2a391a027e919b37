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

//! Persistence contracts for the VBMS authentication core.
//!
//! The core treats all storage as external collaborators: a session token
//! store (per-session signing secrets and refresh tokens), a credential
//! store, and read-only player/team directories. This crate defines those
//! contracts and provides in-memory implementations, which are the
//! reference backend for tests and single-process deployments. SQL-backed
//! implementations live outside this repository.

mod error;
mod memory;
mod records;
mod store;

#[cfg(test)]
mod tests;

pub use error::PersistenceError;
pub use memory::{InMemoryRoster, InMemorySessionStore, InMemoryUserStore};
pub use records::{SessionTokenRecord, UserRecord};
pub use store::{PlayerDirectory, SessionStore, TeamDirectory, UserStore};
