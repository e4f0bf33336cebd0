//! Field descriptors: primitive types, column constraints and hint parsing.
//!
//! # Invariants
//! - Constraint keywords always render in the order
//!   `PRIMARY KEY`, `UNIQUE`, `NOT NULL`, whatever order they were declared in.
//! - Free-form hints are matched case-insensitively by substring.

use super::value::Value;
use serde::{Deserialize, Serialize};

/// Primitive type of a record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrimitiveType {
    Integer,
    Text,
    Boolean,
    Real,
    /// No dedicated SQL mapping; stored with the `TEXT` fallback, so only text
    /// values are accepted and read back unchanged.
    Untyped,
}

impl PrimitiveType {
    /// SQL column type used in `CREATE TABLE` / `ADD COLUMN` statements.
    pub fn sql_type(self) -> &'static str {
        match self {
            Self::Integer => "INTEGER",
            Self::Text => "TEXT",
            Self::Boolean => "BOOLEAN",
            Self::Real => "REAL",
            Self::Untyped => "TEXT",
        }
    }

    /// Value substituted for a stored null in a required field.
    pub fn default_value(self) -> Value {
        match self {
            Self::Integer => Value::Integer(0),
            Self::Text => Value::Text(String::new()),
            Self::Boolean => Value::Boolean(false),
            Self::Real => Value::Real(0.0),
            Self::Untyped => Value::Null,
        }
    }

    /// Whether a non-null `value` satisfies this type.
    ///
    /// Integers are accepted for `Real` fields and widened on construction.
    pub fn accepts(self, value: &Value) -> bool {
        matches!(
            (self, value),
            (Self::Integer, Value::Integer(_))
                | (Self::Text | Self::Untyped, Value::Text(_))
                | (Self::Boolean, Value::Boolean(_))
                | (Self::Real, Value::Real(_) | Value::Integer(_))
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Text => "text",
            Self::Boolean => "boolean",
            Self::Real => "real",
            Self::Untyped => "untyped",
        }
    }
}

/// Column constraint honored at table-creation time only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Constraint {
    PrimaryKey,
    Unique,
    NotNull,
}

impl Constraint {
    /// Every constraint, in rendering order.
    pub const ALL: [Constraint; 3] = [Self::PrimaryKey, Self::Unique, Self::NotNull];

    pub fn keyword(self) -> &'static str {
        match self {
            Self::PrimaryKey => "PRIMARY KEY",
            Self::Unique => "UNIQUE",
            Self::NotNull => "NOT NULL",
        }
    }

    /// Lowercase substring that selects this constraint inside a hint.
    fn hint_token(self) -> &'static str {
        match self {
            Self::PrimaryKey => "primary",
            Self::Unique => "unique",
            Self::NotNull => "not null",
        }
    }
}

/// Set of constraints attached to one field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Constraints {
    primary_key: bool,
    unique: bool,
    not_null: bool,
}

impl Constraints {
    pub fn none() -> Self {
        Self::default()
    }

    /// Derives constraints from a free-form description.
    ///
    /// Each of `primary`, `unique` and `not null` is checked independently, so
    /// `"Primary key, unique"` yields two constraints. Text containing none of
    /// them yields no constraint.
    pub fn from_hint(hint: &str) -> Self {
        let lowered = hint.to_lowercase();
        Constraint::ALL
            .into_iter()
            .filter(|constraint| lowered.contains(constraint.hint_token()))
            .fold(Self::none(), Self::with)
    }

    pub fn with(mut self, constraint: Constraint) -> Self {
        *self.slot_mut(constraint) = true;
        self
    }

    pub fn union(self, other: Self) -> Self {
        other.iter().fold(self, Self::with)
    }

    pub fn contains(&self, constraint: Constraint) -> bool {
        match constraint {
            Constraint::PrimaryKey => self.primary_key,
            Constraint::Unique => self.unique,
            Constraint::NotNull => self.not_null,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    /// Iterates the contained constraints in rendering order.
    pub fn iter(&self) -> impl Iterator<Item = Constraint> + '_ {
        Constraint::ALL
            .into_iter()
            .filter(move |constraint| self.contains(*constraint))
    }

    fn slot_mut(&mut self, constraint: Constraint) -> &mut bool {
        match constraint {
            Constraint::PrimaryKey => &mut self.primary_key,
            Constraint::Unique => &mut self.unique,
            Constraint::NotNull => &mut self.not_null,
        }
    }
}

/// Declaration of one record field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    name: String,
    kind: PrimitiveType,
    constraints: Constraints,
    optional: bool,
    hint: Option<String>,
}

impl FieldDescriptor {
    /// Creates a required, unconstrained field.
    pub fn new(name: impl Into<String>, kind: PrimitiveType) -> Self {
        Self {
            name: name.into(),
            kind,
            constraints: Constraints::none(),
            optional: false,
            hint: None,
        }
    }

    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, PrimitiveType::Integer)
    }

    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, PrimitiveType::Text)
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, PrimitiveType::Boolean)
    }

    pub fn real(name: impl Into<String>) -> Self {
        Self::new(name, PrimitiveType::Real)
    }

    /// Attaches a free-form description and merges the constraints it names.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        let hint = hint.into();
        self.constraints = self.constraints.union(Constraints::from_hint(&hint));
        self.hint = Some(hint);
        self
    }

    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.constraints = self.constraints.with(constraint);
        self
    }

    pub fn primary_key(self) -> Self {
        self.with_constraint(Constraint::PrimaryKey)
    }

    pub fn unique(self) -> Self {
        self.with_constraint(Constraint::Unique)
    }

    pub fn not_null(self) -> Self {
        self.with_constraint(Constraint::NotNull)
    }

    /// Marks the field as nullable: records may omit it or hold `Null`, and
    /// stored nulls are read back as `Null` instead of a type default.
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> PrimitiveType {
        self.kind
    }

    pub fn constraints(&self) -> Constraints {
        self.constraints
    }

    pub fn is_optional(&self) -> bool {
        self.optional
    }

    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }
}
