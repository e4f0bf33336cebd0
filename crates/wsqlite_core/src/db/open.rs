//! Per-operation connection bootstrap.
//!
//! # Responsibility
//! - Open a file-backed SQLite connection for exactly one binder operation.
//! - Apply connection settings shared by every operation.
//!
//! # Invariants
//! - Returned connections carry the requested busy timeout.
//! - Failures are logged with duration and never panic.

use super::DbResult;
use log::{debug, error};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

/// Busy timeout applied when callers do not configure one.
pub const DEFAULT_BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens the SQLite database at `path`, creating the file if needed.
///
/// The returned connection is meant to be dropped at the end of the calling
/// operation; dropping it closes the underlying handle on every path.
///
/// # Side effects
/// - Creates the database file when it does not exist yet.
/// - Emits `store_open` debug/error events.
pub fn open_store(path: impl AsRef<Path>, busy_timeout: Duration) -> DbResult<Connection> {
    let started_at = Instant::now();
    let path = path.as_ref();

    let conn = match Connection::open(path) {
        Ok(conn) => conn,
        Err(err) => {
            error!(
                "event=store_open module=db status=error duration_ms={} error_code=store_open_failed error={}",
                started_at.elapsed().as_millis(),
                err
            );
            return Err(err.into());
        }
    };

    if let Err(err) = conn.busy_timeout(busy_timeout) {
        error!(
            "event=store_open module=db status=error duration_ms={} error_code=store_configure_failed error={}",
            started_at.elapsed().as_millis(),
            err
        );
        return Err(err.into());
    }

    debug!(
        "event=store_open module=db status=ok duration_ms={}",
        started_at.elapsed().as_millis()
    );
    Ok(conn)
}
