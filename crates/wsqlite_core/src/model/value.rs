//! Dynamically typed field values and their SQLite encoding.

use super::field::PrimitiveType;
use rusqlite::types::{ToSql, ToSqlOutput, Value as SqlValue, ValueRef};
use serde::Serialize;

/// One field value of a record instance.
///
/// Booleans are stored as `0`/`1` integers, matching SQLite's own encoding
/// for `BOOLEAN` columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Integer(i64),
    Real(f64),
    Text(String),
    Boolean(bool),
}

impl Value {
    /// Short lowercase name of the value variant, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Integer(_) => "integer",
            Self::Real(_) => "real",
            Self::Text(_) => "text",
            Self::Boolean(_) => "boolean",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(value) => Some(value.as_str()),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Boolean(value) => Some(*value),
            _ => None,
        }
    }

    /// Decodes a stored column value according to the field's declared type.
    ///
    /// Returns a human-readable reason when the stored representation cannot
    /// be read as `kind`.
    pub(crate) fn from_column(kind: PrimitiveType, raw: ValueRef<'_>) -> Result<Self, String> {
        match (kind, raw) {
            (_, ValueRef::Null) => Ok(Self::Null),
            (PrimitiveType::Integer, ValueRef::Integer(value)) => Ok(Self::Integer(value)),
            (PrimitiveType::Real, ValueRef::Real(value)) => Ok(Self::Real(value)),
            (PrimitiveType::Real, ValueRef::Integer(value)) => Ok(Self::Real(value as f64)),
            (PrimitiveType::Boolean, ValueRef::Integer(0)) => Ok(Self::Boolean(false)),
            (PrimitiveType::Boolean, ValueRef::Integer(1)) => Ok(Self::Boolean(true)),
            (PrimitiveType::Text | PrimitiveType::Untyped, ValueRef::Text(bytes)) => {
                String::from_utf8(bytes.to_vec())
                    .map(Self::Text)
                    .map_err(|_| "text is not valid UTF-8".to_string())
            }
            (kind, other) => Err(format!(
                "cannot read stored {:?} as {}",
                other.data_type(),
                kind.as_str()
            )),
        }
    }
}

impl ToSql for Value {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            Self::Null => ToSqlOutput::Owned(SqlValue::Null),
            Self::Integer(value) => ToSqlOutput::Owned(SqlValue::Integer(*value)),
            Self::Real(value) => ToSqlOutput::Owned(SqlValue::Real(*value)),
            Self::Text(value) => ToSqlOutput::Borrowed(ValueRef::Text(value.as_bytes())),
            Self::Boolean(value) => ToSqlOutput::Owned(SqlValue::Integer(i64::from(*value))),
        })
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Self::Integer(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Real(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}
