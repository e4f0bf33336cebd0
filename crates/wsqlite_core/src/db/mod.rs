//! SQLite store access for table binders.
//!
//! # Responsibility
//! - Open short-lived, configured SQLite connections per operation.
//! - Introspect live table structure (`PRAGMA table_info`).
//!
//! # Invariants
//! - Connections are never cached; every caller owns and drops its own.
//! - The live column set is the only schema record; no metadata table exists.

use std::error::Error;
use std::fmt::{Display, Formatter};

mod introspect;
mod open;

pub use introspect::{table_columns, table_exists, ColumnInfo};
pub use open::{open_store, DEFAULT_BUSY_TIMEOUT};

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    /// Introspection was requested for a table that does not exist.
    MissingTable(String),
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::MissingTable(table) => write!(f, "table `{table}` does not exist"),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::MissingTable(_) => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
