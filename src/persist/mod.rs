//! Document persistence behind the [`StateSink`] trait.

/// Shared in-memory sink.
pub mod memory;
/// SQLite document table.
pub mod sqlite;

use thiserror::Error;

/// Key the league document is stored under.
pub const STORAGE_KEY: &str = "fantasy_league_state";

/// Failure reading or writing a stored document.
#[derive(Debug, Error)]
pub enum PersistError {
    /// SQLite driver failure.
    #[error("sqlite: {0}")]
    Sqlite(#[from] rusqlite::Error),
    /// Document (de)serialization failure.
    #[error("serde: {0}")]
    Serde(#[from] serde_json::Error),
    /// Any other sink failure.
    #[error("{0}")]
    Message(String),
}

/// Result alias for sink operations.
pub type PersistResult<T> = Result<T, PersistError>;

/// Keyed storage for serialized league documents.
pub trait StateSink: Send {
    /// Payload stored under `key`, if any.
    fn load(&self, key: &str) -> PersistResult<Option<String>>;
    /// Replaces the payload under `key`.
    fn store(&mut self, key: &str, payload: &str) -> PersistResult<()>;
    /// Pushes buffered writes to durable storage.
    fn flush(&mut self) -> PersistResult<()> {
        Ok(())
    }
}
