// src/repository/error.rs
// =============================================================================
// Typed errors for the site repository.
//
// The command handlers match on these to print a friendly failure message
// instead of aborting. Everything above the repository uses anyhow.
// =============================================================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RepoError {
    /// The underlying SQLite call failed (open, schema, constraint, query)
    #[error("database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// The record was rejected before reaching the database
    #[error("invalid site record: {0}")]
    InvalidRecord(String),

    /// Another thread panicked while holding the connection
    #[error("database connection lock poisoned")]
    LockPoisoned,
}

pub type RepoResult<T> = std::result::Result<T, RepoError>;
