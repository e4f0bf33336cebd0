//! Repository layer binding record types to SQLite tables.
//!
//! # Responsibility
//! - Define the storage-agnostic CRUD contract over records.
//! - Keep SQL construction and error classification inside core.
//!
//! # Invariants
//! - Write paths validate records against the bound record type before SQL.
//! - Each operation is one statement on its own connection; nothing spans
//!   operations.

pub mod options;
pub mod table_repo;
