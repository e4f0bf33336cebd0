//! DDL rendering for record types: `CREATE TABLE` and `ADD COLUMN`.

use crate::model::{FieldDescriptor, RecordType};

/// Renders `name TYPE [PRIMARY KEY] [UNIQUE] [NOT NULL]` for one field.
pub fn column_definition(field: &FieldDescriptor) -> String {
    let mut definition = format!("{} {}", field.name(), field.kind().sql_type());
    for constraint in field.constraints().iter() {
        definition.push(' ');
        definition.push_str(constraint.keyword());
    }
    definition
}

/// Renders the create-if-absent statement listing every field with its
/// constraints.
pub fn create_table_sql(record_type: &RecordType) -> String {
    let columns = record_type
        .fields()
        .iter()
        .map(column_definition)
        .collect::<Vec<_>>()
        .join(", ");
    format!(
        "CREATE TABLE IF NOT EXISTS {} ({columns});",
        record_type.table_name()
    )
}

/// Renders the statement adding `field` to an existing table.
///
/// Constraints on `field` are ignored here.
pub fn add_column_sql(table: &str, field: &FieldDescriptor) -> String {
    format!(
        "ALTER TABLE {table} ADD COLUMN {} {} DEFAULT NULL;",
        field.name(),
        field.kind().sql_type()
    )
}

#[cfg(test)]
mod tests {
    use super::{add_column_sql, column_definition, create_table_sql};
    use crate::model::{FieldDescriptor, PrimitiveType, RecordType};

    #[test]
    fn column_definition_maps_types_and_constraints() {
        assert_eq!(
            column_definition(&FieldDescriptor::integer("id").with_hint("Primary Key")),
            "id INTEGER PRIMARY KEY"
        );
        assert_eq!(
            column_definition(&FieldDescriptor::text("email").with_hint("not null, UNIQUE")),
            "email TEXT UNIQUE NOT NULL"
        );
        assert_eq!(
            column_definition(&FieldDescriptor::boolean("is_active")),
            "is_active BOOLEAN"
        );
        assert_eq!(
            column_definition(&FieldDescriptor::new("blob", PrimitiveType::Untyped)),
            "blob TEXT"
        );
    }

    #[test]
    fn create_table_uses_lowercased_type_name() {
        let rt = RecordType::new(
            "SimpleModel",
            [
                FieldDescriptor::integer("id").primary_key(),
                FieldDescriptor::text("name").not_null(),
            ],
        )
        .unwrap();
        assert_eq!(
            create_table_sql(&rt),
            "CREATE TABLE IF NOT EXISTS simplemodel (id INTEGER PRIMARY KEY, name TEXT NOT NULL);"
        );
    }

    #[test]
    fn add_column_drops_constraints() {
        let field = FieldDescriptor::text("email").unique().not_null();
        assert_eq!(
            add_column_sql("users", &field),
            "ALTER TABLE users ADD COLUMN email TEXT DEFAULT NULL;"
        );
    }
}
