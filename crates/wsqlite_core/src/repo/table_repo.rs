//! Table binder: schema sync plus CRUD over one record type.
//!
//! # Responsibility
//! - Create or extend the backing table when a binder is constructed.
//! - Translate record CRUD calls into parameterized SQLite statements.
//!
//! # Invariants
//! - The live column set stays a superset of the bound record type's fields.
//! - Values are always bound positionally; only validated identifiers are
//!   interpolated into SQL.
//! - Rows are keyed by the hard-coded `id` column for update and delete.
//! - Zero rows affected by update/delete is not an error.

use super::options::BinderOptions;
use crate::db::{open_store, table_columns, ColumnInfo, DbError};
use crate::model::{is_valid_identifier, Record, RecordType, ValidationError, Value};
use crate::schema::{sync_schema, SchemaError, SyncReport};
use log::{debug, error, warn};
use rusqlite::{params, params_from_iter, Connection, ErrorCode, Params, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::iter;
use std::path::{Path, PathBuf};
use std::time::Instant;

/// Column used to address rows in update and delete.
const ID_COLUMN: &str = "id";

pub type RepoResult<T> = Result<T, BinderError>;

/// Error taxonomy for binder construction and CRUD operations.
#[derive(Debug)]
pub enum BinderError {
    /// A record or filter was rejected before reaching the store.
    Validation(ValidationError),
    /// A create/alter statement was rejected during schema sync.
    Schema(SchemaError),
    /// A primary key, unique, not-null or type constraint failed on write.
    ConstraintViolation { table: String, message: String },
    /// Any other store failure, e.g. a missing table or column.
    Store(DbError),
    /// A stored value cannot be read back as its declared type.
    InvalidData(String),
}

impl Display for BinderError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Schema(err) => write!(f, "{err}"),
            Self::ConstraintViolation { table, message } => {
                write!(f, "constraint violation on `{table}`: {message}")
            }
            Self::Store(err) => write!(f, "{err}"),
            Self::InvalidData(message) => write!(f, "invalid stored data: {message}"),
        }
    }
}

impl Error for BinderError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Schema(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::ConstraintViolation { .. } | Self::InvalidData(_) => None,
        }
    }
}

impl From<ValidationError> for BinderError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<SchemaError> for BinderError {
    fn from(value: SchemaError) -> Self {
        Self::Schema(value)
    }
}

impl From<DbError> for BinderError {
    fn from(value: DbError) -> Self {
        Self::Store(value)
    }
}

impl From<rusqlite::Error> for BinderError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Store(DbError::Sqlite(value))
    }
}

/// Conjunctive equality filter; conditions keep the order they were added in.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    conditions: Vec<(String, Value)>,
}

impl Filter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a `field = value` condition.
    ///
    /// `Null` values are rejected by [`RecordRepository::get_by_field`], since
    /// `field = NULL` is never true in SQL.
    pub fn where_eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.conditions.push((field.into(), value.into()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.conditions
            .iter()
            .map(|(field, value)| (field.as_str(), value))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Filter {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        iter.into_iter()
            .fold(Self::new(), |filter, (field, value)| filter.where_eq(field, value))
    }
}

/// CRUD contract over records of one record type.
pub trait RecordRepository {
    /// Inserts `record` and returns the SQLite rowid of the new row.
    fn insert(&self, record: &Record) -> RepoResult<i64>;
    fn get_all(&self) -> RepoResult<Vec<Record>>;
    /// Returns rows matching every condition; an empty filter returns all rows.
    ///
    /// A condition against `Null` fails with `ValidationError::NullFilter`.
    fn get_by_field(&self, filter: &Filter) -> RepoResult<Vec<Record>>;
    /// Overwrites every field of the row whose `id` equals `id`.
    fn update(&self, id: impl Into<Value>, record: &Record) -> RepoResult<usize>;
    fn delete(&self, id: impl Into<Value>) -> RepoResult<usize>;
}

/// Pairs one record type with its SQLite table.
///
/// The binder holds no connection: every operation opens the store, runs a
/// single statement and closes it before returning.
#[derive(Debug, Clone)]
pub struct TableBinder {
    record_type: RecordType,
    table_name: String,
    location: PathBuf,
    options: BinderOptions,
    last_sync: SyncReport,
}

impl TableBinder {
    /// Binds `record_type` to its table in the database at `location` using
    /// default options.
    pub fn bind(record_type: RecordType, location: impl AsRef<Path>) -> RepoResult<Self> {
        Self::bind_with_options(record_type, location, BinderOptions::default())
    }

    /// Binds `record_type`, creating the table if absent and appending any
    /// missing columns.
    ///
    /// # Errors
    /// - `Schema` when the store rejects the create or alter statements.
    /// - `Store` when the database cannot be opened.
    pub fn bind_with_options(
        record_type: RecordType,
        location: impl AsRef<Path>,
        options: BinderOptions,
    ) -> RepoResult<Self> {
        let location = location.as_ref().to_path_buf();
        let mut conn = open_store(&location, options.busy_timeout)?;
        let last_sync = sync_schema(&mut conn, &record_type)?;

        Ok(Self {
            table_name: record_type.table_name(),
            record_type,
            location,
            options,
            last_sync,
        })
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    pub fn record_type(&self) -> &RecordType {
        &self.record_type
    }

    pub fn location(&self) -> &Path {
        &self.location
    }

    pub fn options(&self) -> &BinderOptions {
        &self.options
    }

    /// Schema changes applied when this binder was constructed.
    pub fn last_sync(&self) -> &SyncReport {
        &self.last_sync
    }

    /// Reads the table's current columns from the store.
    pub fn live_columns(&self) -> RepoResult<Vec<ColumnInfo>> {
        let conn = self.connect()?;
        Ok(table_columns(&conn, &self.table_name)?)
    }

    fn connect(&self) -> RepoResult<Connection> {
        Ok(open_store(&self.location, self.options.busy_timeout)?)
    }

    fn column_list(&self) -> String {
        self.record_type
            .fields()
            .iter()
            .map(|field| field.name())
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn select_sql(&self) -> String {
        format!("SELECT {} FROM {}", self.column_list(), self.table_name)
    }

    fn read_rows<P: Params>(&self, sql: &str, params: P) -> RepoResult<Vec<Record>> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(sql)?;
        let mut rows = stmt.query(params)?;
        let mut records = Vec::new();

        while let Some(row) = rows.next()? {
            records.push(self.decode_row(row)?);
        }

        Ok(records)
    }

    /// Rebuilds a record from a row selected with [`Self::column_list`].
    fn decode_row(&self, row: &Row<'_>) -> RepoResult<Record> {
        let fields = self.record_type.fields();
        let mut values = Vec::with_capacity(fields.len());

        for (index, field) in fields.iter().enumerate() {
            let raw = row.get_ref(index)?;
            let value = Value::from_column(field.kind(), raw).map_err(|reason| {
                BinderError::InvalidData(format!(
                    "{}.{}: {reason}",
                    self.table_name,
                    field.name()
                ))
            })?;
            values.push((field.name(), self.options.null_policy.apply(field, value)));
        }

        Ok(self.record_type.construct(values)?)
    }

    fn write_error(&self, err: rusqlite::Error) -> BinderError {
        match err.sqlite_error_code() {
            Some(ErrorCode::ConstraintViolation | ErrorCode::TypeMismatch) => {
                BinderError::ConstraintViolation {
                    table: self.table_name.clone(),
                    message: err.to_string(),
                }
            }
            _ => BinderError::Store(DbError::Sqlite(err)),
        }
    }

    /// Runs `op` and emits one metadata-only event for its outcome.
    fn traced<T>(&self, event: &str, op: impl FnOnce() -> RepoResult<T>) -> RepoResult<T> {
        let started_at = Instant::now();
        let result = op();
        let duration_ms = started_at.elapsed().as_millis();

        match &result {
            Ok(_) => debug!(
                "event={event} module=repo status=ok table={} duration_ms={duration_ms}",
                self.table_name
            ),
            Err(err @ (BinderError::Validation(_) | BinderError::ConstraintViolation { .. })) => {
                warn!(
                    "event={event} module=repo status=rejected table={} duration_ms={duration_ms} error={err}",
                    self.table_name
                )
            }
            Err(err) => error!(
                "event={event} module=repo status=error table={} duration_ms={duration_ms} error={err}",
                self.table_name
            ),
        }

        result
    }
}

impl RecordRepository for TableBinder {
    fn insert(&self, record: &Record) -> RepoResult<i64> {
        self.traced("binder_insert", || {
            self.record_type.check_record(record)?;

            let placeholders = (1..=record.len())
                .map(|index| format!("?{index}"))
                .collect::<Vec<_>>()
                .join(", ");
            let sql = format!(
                "INSERT INTO {} ({}) VALUES ({placeholders});",
                self.table_name,
                self.column_list()
            );

            let conn = self.connect()?;
            conn.execute(&sql, params_from_iter(record.values()))
                .map_err(|err| self.write_error(err))?;
            Ok(conn.last_insert_rowid())
        })
    }

    fn get_all(&self) -> RepoResult<Vec<Record>> {
        self.traced("binder_get_all", || {
            self.read_rows(&format!("{};", self.select_sql()), [])
        })
    }

    fn get_by_field(&self, filter: &Filter) -> RepoResult<Vec<Record>> {
        if filter.is_empty() {
            return self.get_all();
        }

        self.traced("binder_get_by_field", || {
            let mut conditions = Vec::new();
            for (index, (field, value)) in filter.iter().enumerate() {
                if !is_valid_identifier(field) {
                    return Err(ValidationError::InvalidIdentifier(field.to_string()).into());
                }
                if value.is_null() {
                    return Err(ValidationError::NullFilter(field.to_string()).into());
                }
                conditions.push(format!("{field} = ?{}", index + 1));
            }

            let sql = format!("{} WHERE {};", self.select_sql(), conditions.join(" AND "));
            self.read_rows(&sql, params_from_iter(filter.iter().map(|(_, value)| value)))
        })
    }

    fn update(&self, id: impl Into<Value>, record: &Record) -> RepoResult<usize> {
        let id = id.into();
        self.traced("binder_update", || {
            self.record_type.check_record(record)?;

            let assignments = record
                .iter()
                .enumerate()
                .map(|(index, (field, _))| format!("{field} = ?{}", index + 1))
                .collect::<Vec<_>>()
                .join(", ");
            let sql = format!(
                "UPDATE {} SET {assignments} WHERE {ID_COLUMN} = ?{};",
                self.table_name,
                record.len() + 1
            );

            let conn = self.connect()?;
            conn.execute(&sql, params_from_iter(record.values().chain(iter::once(&id))))
                .map_err(|err| self.write_error(err))
        })
    }

    fn delete(&self, id: impl Into<Value>) -> RepoResult<usize> {
        let id = id.into();
        self.traced("binder_delete", || {
            let sql = format!("DELETE FROM {} WHERE {ID_COLUMN} = ?1;", self.table_name);
            let conn = self.connect()?;
            conn.execute(&sql, params![id]).map_err(|err| self.write_error(err))
        })
    }
}
