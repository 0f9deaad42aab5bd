// src/repository/store.rs
// =============================================================================
// SQLite-backed storage for the site list and the login credential.
//
// Tables:
// - users:    a single (username, password) row, seeded on first open
// - websites: one row per saved site, ids assigned by SQLite
//
// The connection lives behind Arc<Mutex<..>> so the repository can be cloned
// into spawned probe-cycle tasks. Readers get an owned Vec<SiteRecord>, which
// is the snapshot a probe cycle works from.
// =============================================================================

use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, info};

use super::error::{RepoError, RepoResult};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS users (
    username TEXT PRIMARY KEY,
    password TEXT
);
CREATE TABLE IF NOT EXISTS websites (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT,
    url TEXT,
    category TEXT
);
";

// Credential seeded into an empty users table
const DEFAULT_USERNAME: &str = "admin";
const DEFAULT_PASSWORD: &str = "admin123";

/// One saved website.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteRecord {
    pub id: i64,
    pub name: String,
    /// As typed by the user, may lack a scheme ("archive.org")
    pub url: String,
    pub category: String,
}

#[derive(Clone)]
pub struct SiteRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SiteRepository {
    /// Opens (or creates) the database file and makes sure the schema exists.
    pub fn open(path: &Path) -> RepoResult<Self> {
        info!(path = %path.display(), "opening site repository");
        let conn = Connection::open(path)?;
        Self::init(conn)
    }

    /// In-memory store, used by tests.
    pub fn memory() -> RepoResult<Self> {
        let conn = Connection::open_in_memory()?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> RepoResult<Self> {
        conn.execute_batch(SCHEMA)?;

        let has_user: Option<String> = conn
            .query_row("SELECT username FROM users LIMIT 1", [], |row| row.get(0))
            .optional()?;
        if has_user.is_none() {
            debug!("seeding default credential");
            conn.execute(
                "INSERT INTO users (username, password) VALUES (?1, ?2)",
                params![DEFAULT_USERNAME, DEFAULT_PASSWORD],
            )?;
        }

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn lock(&self) -> RepoResult<MutexGuard<'_, Connection>> {
        self.conn.lock().map_err(|_| RepoError::LockPoisoned)
    }

    /// Saves a new site and returns the id SQLite assigned to it.
    pub fn insert(&self, name: &str, url: &str, category: &str) -> RepoResult<i64> {
        if name.trim().is_empty() {
            return Err(RepoError::InvalidRecord("name must not be empty".to_string()));
        }
        if url.trim().is_empty() {
            return Err(RepoError::InvalidRecord("url must not be empty".to_string()));
        }

        let conn = self.lock()?;
        conn.execute(
            "INSERT INTO websites (name, url, category) VALUES (?1, ?2, ?3)",
            params![name.trim(), url.trim(), category.trim()],
        )?;
        let id = conn.last_insert_rowid();
        debug!(id, name, url, "site inserted");
        Ok(id)
    }

    /// All saved sites in insertion order.
    pub fn list_all(&self) -> RepoResult<Vec<SiteRecord>> {
        let conn = self.lock()?;
        let mut stmt =
            conn.prepare("SELECT id, name, url, category FROM websites ORDER BY id ASC")?;

        let rows = stmt.query_map([], |row| {
            Ok(SiteRecord {
                id: row.get(0)?,
                // Columns are nullable, older rows may hold NULLs
                name: row.get::<_, Option<String>>(1)?.unwrap_or_default(),
                url: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                category: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
            })
        })?;

        let mut sites = Vec::new();
        for site in rows {
            sites.push(site?);
        }
        Ok(sites)
    }

    /// Removes a site. Returns false when no row had that id.
    pub fn delete(&self, id: i64) -> RepoResult<bool> {
        let conn = self.lock()?;
        let removed = conn.execute("DELETE FROM websites WHERE id = ?1", params![id])?;
        debug!(id, removed, "site delete");
        Ok(removed > 0)
    }

    /// Exact, plaintext match against the stored credential.
    pub fn verify_credential(&self, username: &str, password: &str) -> RepoResult<bool> {
        let conn = self.lock()?;
        let found: Option<String> = conn
            .query_row(
                "SELECT username FROM users WHERE username = ?1 AND password = ?2",
                params![username, password],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why Arc<Mutex<Connection>>?
//    - rusqlite::Connection can move between threads but can't be shared
//    - Mutex makes sharing safe, Arc lets several owners hold it
//
// 2. .optional()
//    - query_row errors when there is no row
//    - OptionalExtension turns "no rows" into Ok(None)
// -----------------------------------------------------------------------------
