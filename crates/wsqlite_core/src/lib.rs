//! Record-to-table binding over embedded SQLite.
//! A record type is bound to one table, kept in sync additively, and exposed
//! through basic CRUD.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod schema;

pub use logging::{default_log_level, init_logging, logging_status, LogLevel, LoggingError};
pub use model::{
    Constraint, Constraints, FieldDescriptor, PrimitiveType, Record, RecordType, ValidationError,
    Value,
};
pub use repo::options::{BinderOptions, NullPolicy};
pub use repo::table_repo::{BinderError, Filter, RecordRepository, RepoResult, TableBinder};
pub use schema::{SchemaError, SyncReport};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
