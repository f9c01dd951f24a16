//! Repository implementations: process-local tables and SQLite.

mod memory;
mod sqlite;

use std::sync::{Mutex, MutexGuard};

pub use memory::{InMemoryAnalysisRepository, InMemoryScreeningRepository, InMemoryUserRepository};
pub use sqlite::{
    Database, SqliteAnalysisRepository, SqliteScreeningRepository, SqliteUserRepository,
};

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
    #[error("stored record is invalid: {0}")]
    Invalid(String),
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Rows in insertion order plus the next auto-increment id.
#[derive(Debug)]
pub(crate) struct Table<T> {
    rows: Vec<T>,
    next_id: u64,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            next_id: 1,
        }
    }
}

impl<T> Table<T> {
    pub(crate) fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    pub(crate) fn push(&mut self, row: T) {
        self.rows.push(row);
    }

    pub(crate) fn rows(&self) -> &[T] {
        &self.rows
    }
}

pub(crate) fn lock<'a, T>(
    mutex: &'a Mutex<T>,
    name: &str,
) -> Result<MutexGuard<'a, T>, RepositoryError> {
    mutex
        .lock()
        .map_err(|_| RepositoryError::Unavailable(format!("{name} table lock poisoned")))
}
