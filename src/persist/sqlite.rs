//! League documents in a single SQLite table, one row per storage key.

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use rusqlite::{Connection, OptionalExtension, params};

use super::{PersistResult, StateSink};

const SELECT_PAYLOAD: &str = "SELECT payload FROM documents WHERE key = ?1";
const SELECT_TS: &str = "SELECT ts_ms FROM documents WHERE key = ?1";
const UPSERT: &str = "INSERT INTO documents(key, ts_ms, payload) VALUES (?1, ?2, ?3)
     ON CONFLICT(key) DO UPDATE SET ts_ms = excluded.ts_ms, payload = excluded.payload";

/// Durable [`StateSink`]; each `store` replaces the row for its key.
pub struct SqliteStateSink {
    conn: Connection,
}

impl SqliteStateSink {
    /// Opens the database file at `path`, creating the table if needed.
    ///
    /// The connection runs in WAL mode with `synchronous=NORMAL`.
    pub fn open(path: impl AsRef<Path>) -> PersistResult<Self> {
        Self::prepare(Connection::open(path)?)
    }

    /// Sink over a private in-memory database.
    pub fn open_in_memory() -> PersistResult<Self> {
        Self::prepare(Connection::open_in_memory()?)
    }

    fn prepare(conn: Connection) -> PersistResult<Self> {
        conn.execute_batch(include_str!("schema.sql"))?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        conn.pragma_update(None, "synchronous", "NORMAL")?;
        Ok(Self { conn })
    }

    /// Unix-millisecond time of the last write under `key`.
    pub fn last_written_ms(&self, key: &str) -> PersistResult<Option<u64>> {
        let mut stmt = self.conn.prepare_cached(SELECT_TS)?;
        let ts: Option<i64> = stmt.query_row(params![key], |row| row.get(0)).optional()?;
        Ok(ts.and_then(|v| u64::try_from(v).ok()))
    }
}

impl StateSink for SqliteStateSink {
    fn load(&self, key: &str) -> PersistResult<Option<String>> {
        let mut stmt = self.conn.prepare_cached(SELECT_PAYLOAD)?;
        Ok(stmt.query_row(params![key], |row| row.get(0)).optional()?)
    }

    fn store(&mut self, key: &str, payload: &str) -> PersistResult<()> {
        let mut stmt = self.conn.prepare_cached(UPSERT)?;
        stmt.execute(params![key, unix_ms(), payload])?;
        Ok(())
    }

    fn flush(&mut self) -> PersistResult<()> {
        self.conn.execute_batch("PRAGMA wal_checkpoint(PASSIVE);")?;
        Ok(())
    }
}

fn unix_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| i64::try_from(d.as_millis()).unwrap_or(i64::MAX))
        .unwrap_or(0)
}
