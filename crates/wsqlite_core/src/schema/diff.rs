//! Pure diff between declared fields and live table columns.

use crate::model::FieldDescriptor;
use std::collections::HashSet;

/// Returns declared fields that have no live column, in declaration order.
///
/// Column names compare case-insensitively, as SQLite does.
pub fn missing_columns<'a, S: AsRef<str>>(
    declared: &'a [FieldDescriptor],
    live: &[S],
) -> Vec<&'a FieldDescriptor> {
    let live: HashSet<String> = live
        .iter()
        .map(|column| column.as_ref().to_ascii_lowercase())
        .collect();

    declared
        .iter()
        .filter(|field| !live.contains(&field.name().to_ascii_lowercase()))
        .collect()
}
