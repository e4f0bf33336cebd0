//! Live schema introspection over `sqlite_master` and `PRAGMA table_info`.

use super::{DbError, DbResult};
use rusqlite::Connection;

/// One live column as reported by `PRAGMA table_info`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnInfo {
    pub name: String,
    /// Declared SQL type text, e.g. `INTEGER` or `BOOLEAN`.
    pub declared_type: String,
    pub not_null: bool,
    /// True when the column participates in the primary key.
    pub primary_key: bool,
}

/// Returns whether a table named `table` exists in the connected database.
///
/// Names compare case-insensitively, as SQLite resolves them.
pub fn table_exists(conn: &Connection, table: &str) -> DbResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1 COLLATE NOCASE
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

/// Lists the live columns of `table` in physical column order.
///
/// Returns [`DbError::MissingTable`] when the table does not exist, since
/// `PRAGMA table_info` silently yields no rows in that case.
pub fn table_columns(conn: &Connection, table: &str) -> DbResult<Vec<ColumnInfo>> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    let mut columns = Vec::new();

    while let Some(row) = rows.next()? {
        columns.push(ColumnInfo {
            name: row.get(1)?,
            declared_type: row.get(2)?,
            not_null: row.get::<_, i64>(3)? != 0,
            primary_key: row.get::<_, i64>(5)? != 0,
        });
    }

    if columns.is_empty() && !table_exists(conn, table)? {
        return Err(DbError::MissingTable(table.to_string()));
    }

    Ok(columns)
}
