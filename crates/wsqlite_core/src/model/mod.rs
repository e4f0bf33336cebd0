//! Record description facility.
//!
//! # Responsibility
//! - Enumerate field names, primitive types and per-field constraints.
//! - Build and validate record instances before they reach the store.
//!
//! # Invariants
//! - A record type is immutable once built; schema evolution means binding a
//!   new record type with added fields.

pub mod field;
pub mod record;
pub mod value;

pub use field::{Constraint, Constraints, FieldDescriptor, PrimitiveType};
pub use record::{is_valid_identifier, Record, RecordType, ValidationError};
pub use value::Value;
