// src/repository/mod.rs
// =============================================================================
// Persistent storage for saved sites and the login credential.
//
// Submodules:
// - store: the SQLite-backed SiteRepository
// - error: the typed RepoError returned by every repository call
// =============================================================================

mod error;
mod store;

pub use error::RepoError;
pub use store::{SiteRecord, SiteRepository};
