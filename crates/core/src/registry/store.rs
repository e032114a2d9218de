use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use crate::model::Z_LANG_EN;
use crate::registry::{RawEntry, RegistryLookup};

/// Minimum schema version we know how to handle.
///
/// `0` means "no schema yet" (fresh DB).
const MIN_SUPPORTED_SCHEMA_VERSION: i32 = 0;

/// Latest schema version this crate knows about.
pub const CURRENT_SCHEMA_VERSION: i32 = 2;

/// Error type for object store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Underlying SQLite error.
    #[error("SQLite error: {0}")]
    Sql(#[from] rusqlite::Error),

    /// Stored content is not valid JSON.
    #[error("Stored object {zid} is not valid JSON: {source}")]
    Content { zid: String, source: serde_json::Error },

    /// The database was created with a newer schema version than we support.
    #[error(
        "Unsupported schema version {found}; supported range is {min_supported}..={max_supported}"
    )]
    UnsupportedSchemaVersion { found: i32, min_supported: i32, max_supported: i32 },
}

/// Convenience result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Listing row for a stored object.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredObject {
    pub zid: String,
    pub label: Option<String>,
    /// ZID of the inner value's type, if the object is well formed.
    pub kind: Option<String>,
    pub content_hash: String,
    pub updated_at: String,
}

/// SQLite-backed object store, usable as a registry.
///
/// The connection sits behind a mutex so one store can serve lookups from
/// several threads.
#[derive(Debug)]
pub struct ObjectStore {
    conn: Mutex<Connection>,
}

impl ObjectStore {
    /// Open (or create) a store at the given path and ensure the schema exists.
    pub fn open(path: &Path) -> StoreResult<Self> {
        let conn = Connection::open(path)?;
        apply_migrations(&conn)?;
        Ok(Self { conn: Mutex::new(conn) })
    }

    /// Open a throwaway in-memory store.
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        apply_migrations(&conn)?;
        Ok(Self { conn: Mutex::new(conn) })
    }

    fn conn(&self) -> MutexGuard<'_, Connection> {
        self.conn.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Insert or replace an object. Returns `true` when the stored content changed.
    pub fn upsert(&self, entry: &RawEntry) -> StoreResult<bool> {
        let content = entry.content().to_string();
        let content_hash = sha256_hex(content.as_bytes());
        let label = entry.label(Z_LANG_EN);
        let kind = entry.kind().map(|k| k.zid().to_string());
        let now = Utc::now().to_rfc3339();

        let affected = self.conn().execute(
            r#"
            INSERT INTO zobjects (zid, label, kind, content, content_hash, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(zid) DO UPDATE SET
                label = excluded.label,
                kind = excluded.kind,
                content = excluded.content,
                content_hash = excluded.content_hash,
                updated_at = excluded.updated_at
            WHERE zobjects.content_hash != excluded.content_hash
            "#,
            params![entry.zid(), label, kind, content, content_hash, now],
        )?;
        Ok(affected > 0)
    }

    /// Fetch a single object by ZID.
    pub fn fetch(&self, zid: &str) -> StoreResult<Option<RawEntry>> {
        let content: Option<String> = self
            .conn()
            .query_row("SELECT content FROM zobjects WHERE zid = ?1", params![zid], |row| {
                row.get(0)
            })
            .optional()?;
        match content {
            Some(json) => RawEntry::from_json(zid, &json)
                .map(Some)
                .map_err(|source| StoreError::Content { zid: zid.to_string(), source }),
            None => Ok(None),
        }
    }

    /// List all stored objects (ordered by ZID).
    pub fn list(&self) -> StoreResult<Vec<StoredObject>> {
        let conn = self.conn();
        let mut stmt = conn.prepare(
            r#"
            SELECT zid, label, kind, content_hash, updated_at
            FROM zobjects
            ORDER BY zid
            "#,
        )?;
        let rows = stmt.query_map([], |row| {
            Ok(StoredObject {
                zid: row.get(0)?,
                label: row.get(1)?,
                kind: row.get(2)?,
                content_hash: row.get(3)?,
                updated_at: row.get(4)?,
            })
        })?;

        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }

    /// Remove an object. Returns `true` if it existed.
    pub fn delete(&self, zid: &str) -> StoreResult<bool> {
        let affected = self.conn().execute("DELETE FROM zobjects WHERE zid = ?1", params![zid])?;
        Ok(affected > 0)
    }
}

impl RegistryLookup for ObjectStore {
    fn resolve_by_name(&self, name: &str) -> Option<RawEntry> {
        match self.fetch(name) {
            Ok(entry) => entry,
            Err(err) => {
                // An unreadable row renders like a missing page.
                tracing::warn!(zid = name, error = %err, "object store lookup failed");
                None
            }
        }
    }
}

fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// Apply schema migrations to bring the database to the latest version.
///
/// We use `PRAGMA user_version` as the schema version indicator.
///
/// Version map:
/// - 0: no schema
/// - 1: zobjects table (zid, content, updated_at)
/// - 2: add label, kind, content_hash columns
fn apply_migrations(conn: &Connection) -> StoreResult<()> {
    let current_version = current_schema_version(conn)?;

    // Reject DBs created with a newer schema than we support.
    if current_version > CURRENT_SCHEMA_VERSION {
        return Err(StoreError::UnsupportedSchemaVersion {
            found: current_version,
            min_supported: MIN_SUPPORTED_SCHEMA_VERSION,
            max_supported: CURRENT_SCHEMA_VERSION,
        });
    }

    if current_version < 1 {
        conn.execute_batch(
            r#"
            BEGIN;
            CREATE TABLE IF NOT EXISTS zobjects (
                zid        TEXT PRIMARY KEY,
                content    TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            PRAGMA user_version = 1;
            COMMIT;
            "#,
        )?;
    }

    if current_version < 2 {
        conn.execute_batch(
            r#"
            BEGIN;
            ALTER TABLE zobjects ADD COLUMN label TEXT;
            ALTER TABLE zobjects ADD COLUMN kind TEXT;
            ALTER TABLE zobjects ADD COLUMN content_hash TEXT NOT NULL DEFAULT '';
            PRAGMA user_version = 2;
            COMMIT;
            "#,
        )?;
    }

    Ok(())
}

/// Read the SQLite schema version from `PRAGMA user_version`.
fn current_schema_version(conn: &Connection) -> StoreResult<i32> {
    let version: i32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    Ok(version)
}
