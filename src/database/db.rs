//! SQLite-backed scheduler state
//!
//! Stores one JSON snapshot per user in the `scheduler_state` table, so the
//! scheduler's in-memory model never has to know about SQL.

use crate::error::Result;
use crate::models::Snapshot;
use crate::store::StateStore;
use chrono::Utc;
use rusqlite::{Connection, OptionalExtension, params};
use serde_json::Value;
use std::path::Path;
use tracing::debug;

pub struct SqliteStore {
    conn: Connection,
}

impl SqliteStore {
    /// Opens (or creates) the database file and its tables
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let conn = Connection::open(path.as_ref())?;
        debug!(path = %path.as_ref().display(), "opened scheduler database");
        Self::with_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        init_database(&conn)?;
        Ok(Self { conn })
    }

    /// Ids of every user with stored state
    pub fn users(&self) -> Result<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT user_id FROM scheduler_state ORDER BY user_id")?;
        let users = stmt
            .query_map([], |row| row.get(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;
        Ok(users)
    }

    /// Removes a user's stored state. Returns whether a row existed.
    pub fn delete(&self, user_id: &str) -> Result<bool> {
        let removed = self.conn.execute(
            "DELETE FROM scheduler_state WHERE user_id = ?1",
            params![user_id],
        )?;
        Ok(removed > 0)
    }
}

/// Creates the snapshot table if it does not exist yet
fn init_database(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS scheduler_state (
            user_id TEXT PRIMARY KEY,
            snapshot TEXT NOT NULL,
            updated_at TEXT NOT NULL
        )",
        (),
    )?;
    Ok(())
}

impl StateStore for SqliteStore {
    fn load(&self, user_id: &str) -> Result<Option<Value>> {
        let stored: Option<String> = self
            .conn
            .query_row(
                "SELECT snapshot FROM scheduler_state WHERE user_id = ?1",
                params![user_id],
                |row| row.get(0),
            )
            .optional()?;

        match stored {
            Some(text) => Ok(Some(serde_json::from_str(&text)?)),
            None => Ok(None),
        }
    }

    fn save(&self, user_id: &str, snapshot: &Snapshot) -> Result<()> {
        let text = serde_json::to_string(snapshot)?;
        self.conn.execute(
            "INSERT INTO scheduler_state (user_id, snapshot, updated_at) VALUES (?1, ?2, ?3)
             ON CONFLICT(user_id) DO UPDATE SET snapshot = excluded.snapshot, updated_at = excluded.updated_at",
            params![user_id, text, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }
}
