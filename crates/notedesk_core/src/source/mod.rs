//! Data source contracts and shipped implementations.
//!
//! # Responsibility
//! - Define the injected collaborator traits the stores depend on.
//! - Provide in-memory and SQLite-backed implementations.
//!
//! # Invariants
//! - Sources allocate note ids; callers never pick them.
//! - `last_modified` is written from the stamp the caller provides, never
//!   from draft input.

use crate::db::DbError;
use crate::model::note::NoteId;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod notes;
pub mod sqlite;
pub mod users;

pub use notes::{MemoryNoteSource, NoteSource};
pub use sqlite::SqliteNoteSource;
pub use users::{MemoryUserDirectory, UserDirectory};

pub type SourceResult<T> = Result<T, SourceError>;

/// Generic error for data source operations.
#[derive(Debug)]
pub enum SourceError {
    /// Target note does not exist.
    NoteNotFound(NoteId),
    /// Source cannot be reached or refused the operation.
    Unavailable(String),
    /// Storage-layer failure from the SQLite-backed source.
    Db(DbError),
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoteNotFound(id) => write!(f, "note not found: {id}"),
            Self::Unavailable(reason) => write!(f, "source unavailable: {reason}"),
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SourceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for SourceError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for SourceError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}
