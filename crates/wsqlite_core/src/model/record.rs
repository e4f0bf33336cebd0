//! Record types and validated record instances.
//!
//! # Responsibility
//! - Describe one logical entity as an ordered list of field descriptors.
//! - Build record instances that satisfy the declared types.
//!
//! # Invariants
//! - Record type and field names are plain SQL identifiers, so they can be
//!   interpolated into statements.
//! - A `Record` always holds every field of its type, in declaration order.

use super::field::{FieldDescriptor, PrimitiveType};
use super::value::Value;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

static IDENTIFIER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid identifier regex"));

/// Returns whether `name` can be interpolated as an unquoted SQL identifier.
pub fn is_valid_identifier(name: &str) -> bool {
    IDENTIFIER_RE.is_match(name)
}

/// Validation errors raised before any value reaches the store.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    EmptyName,
    InvalidIdentifier(String),
    DuplicateField(String),
    NoFields,
    UnknownField(String),
    MissingField(String),
    TypeMismatch {
        field: String,
        expected: PrimitiveType,
        found: &'static str,
    },
    NullNotAllowed(String),
    /// A filter condition compared a field against `Null`, which never matches.
    NullFilter(String),
    /// A record built for one record type was handed to a binder of another.
    RecordTypeMismatch {
        expected: String,
        found: String,
    },
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "record type name cannot be empty"),
            Self::InvalidIdentifier(name) => write!(f, "`{name}` is not a valid identifier"),
            Self::DuplicateField(name) => write!(f, "field `{name}` is declared twice"),
            Self::NoFields => write!(f, "record type must declare at least one field"),
            Self::UnknownField(name) => write!(f, "unknown field `{name}`"),
            Self::MissingField(name) => write!(f, "missing value for required field `{name}`"),
            Self::TypeMismatch {
                field,
                expected,
                found,
            } => write!(
                f,
                "field `{field}` expects {} but got {found}",
                expected.as_str()
            ),
            Self::NullNotAllowed(name) => write!(f, "field `{name}` is not optional"),
            Self::NullFilter(name) => {
                write!(f, "filter on `{name}` compares against null and can never match")
            }
            Self::RecordTypeMismatch { expected, found } => {
                write!(f, "expected a `{expected}` record, got `{found}`")
            }
        }
    }
}

impl Error for ValidationError {}

/// Named, ordered description of one logical entity.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordType {
    name: String,
    fields: Vec<FieldDescriptor>,
}

impl RecordType {
    /// Builds a record type after checking names and field uniqueness.
    pub fn new(
        name: impl Into<String>,
        fields: impl IntoIterator<Item = FieldDescriptor>,
    ) -> Result<Self, ValidationError> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if !is_valid_identifier(&name) {
            return Err(ValidationError::InvalidIdentifier(name));
        }

        let fields: Vec<FieldDescriptor> = fields.into_iter().collect();
        if fields.is_empty() {
            return Err(ValidationError::NoFields);
        }

        let mut seen = HashSet::new();
        for field in &fields {
            if !is_valid_identifier(field.name()) {
                return Err(ValidationError::InvalidIdentifier(field.name().to_string()));
            }
            // SQLite column names are case-insensitive.
            if !seen.insert(field.name().to_ascii_lowercase()) {
                return Err(ValidationError::DuplicateField(field.name().to_string()));
            }
        }

        Ok(Self { name, fields })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the backing table: the record type name, lower-cased.
    pub fn table_name(&self) -> String {
        self.name.to_lowercase()
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|field| field.name() == name)
    }

    /// Builds a validated record from `(field name, value)` pairs.
    ///
    /// Pairs may come in any order. Omitted optional fields become `Null`.
    ///
    /// # Errors
    /// - `UnknownField` for a name the type does not declare.
    /// - `DuplicateField` when a name is supplied twice.
    /// - `MissingField` when a required field is omitted.
    /// - `NullNotAllowed` / `TypeMismatch` when a value does not fit its field.
    pub fn construct<K, I>(&self, values: I) -> Result<Record, ValidationError>
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Value)>,
    {
        let mut slots: Vec<Option<Value>> = vec![None; self.fields.len()];

        for (name, value) in values {
            let name = name.into();
            let index = self
                .fields
                .iter()
                .position(|field| field.name() == name)
                .ok_or_else(|| ValidationError::UnknownField(name.clone()))?;
            if slots[index].is_some() {
                return Err(ValidationError::DuplicateField(name));
            }
            slots[index] = Some(value);
        }

        let mut entries = Vec::with_capacity(self.fields.len());
        for (field, slot) in self.fields.iter().zip(slots) {
            let value = match slot {
                Some(value) => check_value(field, value)?,
                None if field.is_optional() => Value::Null,
                None => return Err(ValidationError::MissingField(field.name().to_string())),
            };
            entries.push((field.name().to_string(), value));
        }

        Ok(Record {
            type_name: self.name.clone(),
            entries,
        })
    }

    /// Checks that `record` was built for a type with exactly these fields.
    pub fn check_record(&self, record: &Record) -> Result<(), ValidationError> {
        let same_fields = record.entries.len() == self.fields.len()
            && record
                .entries
                .iter()
                .zip(&self.fields)
                .all(|((name, _), field)| name == field.name());

        if record.type_name != self.name || !same_fields {
            return Err(ValidationError::RecordTypeMismatch {
                expected: self.name.clone(),
                found: record.type_name.clone(),
            });
        }
        Ok(())
    }
}

fn check_value(field: &FieldDescriptor, value: Value) -> Result<Value, ValidationError> {
    if value.is_null() {
        if field.is_optional() || field.kind() == PrimitiveType::Untyped {
            return Ok(Value::Null);
        }
        return Err(ValidationError::NullNotAllowed(field.name().to_string()));
    }

    if !field.kind().accepts(&value) {
        return Err(ValidationError::TypeMismatch {
            field: field.name().to_string(),
            expected: field.kind(),
            found: value.type_name(),
        });
    }

    Ok(match (field.kind(), value) {
        (PrimitiveType::Real, Value::Integer(number)) => Value::Real(number as f64),
        (_, value) => value,
    })
}

/// One validated instance of a [`RecordType`].
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    type_name: String,
    entries: Vec<(String, Value)>,
}

impl Record {
    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.entries
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    /// Iterates `(field name, value)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.iter().map(|(_, value)| value)
    }

    pub fn into_values(self) -> Vec<Value> {
        self.entries.into_iter().map(|(_, value)| value).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}
