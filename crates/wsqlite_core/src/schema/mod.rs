//! Schema synchronization between record types and live tables.
//!
//! # Responsibility
//! - Render `CREATE TABLE` / `ADD COLUMN` statements from field descriptors.
//! - Diff declared fields against live columns without touching the store.
//! - Apply the additive reconciliation on a connection.
//!
//! # Invariants
//! - Sync never drops, renames or retypes a column.
//! - Constraints apply only when the table is created; added columns are
//!   unconstrained and default to null.

use crate::db::DbError;
use std::error::Error;
use std::fmt::{Display, Formatter};

mod ddl;
mod diff;
mod sync;

pub use ddl::{add_column_sql, column_definition, create_table_sql};
pub use diff::missing_columns;
pub use sync::{sync_schema, SyncReport};

pub type SchemaResult<T> = Result<T, SchemaError>;

#[derive(Debug)]
pub enum SchemaError {
    /// The store refused a DDL statement.
    Rejected {
        table: String,
        statement: String,
        source: rusqlite::Error,
    },
    Db(DbError),
}

impl Display for SchemaError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Rejected {
                table,
                statement,
                source,
            } => write!(
                f,
                "schema statement for table `{table}` rejected: {source} (statement: {statement})"
            ),
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for SchemaError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Rejected { source, .. } => Some(source),
            Self::Db(err) => Some(err),
        }
    }
}

impl From<DbError> for SchemaError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for SchemaError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}
