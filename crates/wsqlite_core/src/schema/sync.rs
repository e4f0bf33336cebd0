//! Schema sync: create the table if absent, then append missing columns.

use super::{add_column_sql, create_table_sql, missing_columns, SchemaError, SchemaResult};
use crate::db::{table_columns, table_exists};
use crate::model::RecordType;
use log::{error, info};
use rusqlite::Connection;
use std::time::Instant;

/// Outcome of one schema synchronization pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    /// True when the table did not exist and was created by this pass.
    pub created: bool,
    /// Columns appended by this pass, in the order they were added.
    pub added_columns: Vec<String>,
}

impl SyncReport {
    /// Returns whether the pass changed the live schema at all.
    pub fn is_noop(&self) -> bool {
        !self.created && self.added_columns.is_empty()
    }
}

/// Creates the table for `record_type` if absent, then appends every
/// declared field missing from the live column set.
///
/// Added columns are applied in a single transaction, so a rejected
/// `ALTER TABLE` leaves the column set untouched.
///
/// # Side effects
/// - May create the table and add columns.
/// - Emits `schema_sync` logging events with duration and status.
pub fn sync_schema(conn: &mut Connection, record_type: &RecordType) -> SchemaResult<SyncReport> {
    let started_at = Instant::now();
    let table = record_type.table_name();

    match apply(conn, record_type, &table) {
        Ok(report) => {
            info!(
                "event=schema_sync module=schema status=ok table={} created={} added={} duration_ms={}",
                table,
                report.created,
                report.added_columns.len(),
                started_at.elapsed().as_millis()
            );
            Ok(report)
        }
        Err(err) => {
            error!(
                "event=schema_sync module=schema status=error table={} duration_ms={} error={}",
                table,
                started_at.elapsed().as_millis(),
                err
            );
            Err(err)
        }
    }
}

fn apply(conn: &mut Connection, record_type: &RecordType, table: &str) -> SchemaResult<SyncReport> {
    let existed = table_exists(conn, table)?;

    let create_sql = create_table_sql(record_type);
    conn.execute_batch(&create_sql)
        .map_err(|source| rejected(table, &create_sql, source))?;

    let live: Vec<String> = table_columns(conn, table)?
        .into_iter()
        .map(|column| column.name)
        .collect();
    let missing = missing_columns(record_type.fields(), &live);

    let mut report = SyncReport {
        created: !existed,
        added_columns: Vec::with_capacity(missing.len()),
    };
    if missing.is_empty() {
        return Ok(report);
    }

    let tx = conn.transaction()?;
    for field in missing {
        let alter_sql = add_column_sql(table, field);
        tx.execute_batch(&alter_sql)
            .map_err(|source| rejected(table, &alter_sql, source))?;
        report.added_columns.push(field.name().to_string());
    }
    tx.commit()?;

    Ok(report)
}

fn rejected(table: &str, statement: &str, source: rusqlite::Error) -> SchemaError {
    SchemaError::Rejected {
        table: table.to_string(),
        statement: statement.to_string(),
        source,
    }
}
