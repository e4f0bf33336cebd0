//! Binder configuration.

use crate::db::DEFAULT_BUSY_TIMEOUT;
use crate::model::{FieldDescriptor, Value};
use std::time::Duration;

/// How stored nulls in required fields are handled on read.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NullPolicy {
    /// Replace the null with the field type's default (`""`, `0`, `false`,
    /// `0.0`). Lossy: a stored null and a stored default read back the same.
    /// Optional fields are never substituted.
    #[default]
    SubstituteDefaults,
    /// Keep the null, which makes reads of required fields fail validation.
    Reject,
}

impl NullPolicy {
    /// Post-read transform applied to each decoded column value.
    pub fn apply(self, field: &FieldDescriptor, value: Value) -> Value {
        match self {
            Self::SubstituteDefaults if value.is_null() && !field.is_optional() => {
                field.kind().default_value()
            }
            _ => value,
        }
    }
}

/// Options fixed for the lifetime of one binder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BinderOptions {
    pub null_policy: NullPolicy,
    /// How long each operation waits on a locked database before failing.
    pub busy_timeout: Duration,
}

impl Default for BinderOptions {
    fn default() -> Self {
        Self {
            null_policy: NullPolicy::default(),
            busy_timeout: DEFAULT_BUSY_TIMEOUT,
        }
    }
}
