use serde_json::json;
use wsqlite_core::{
    Constraint, FieldDescriptor, PrimitiveType, RecordType, ValidationError, Value,
};

fn contact() -> RecordType {
    RecordType::new(
        "Contact",
        [
            FieldDescriptor::integer("id").primary_key(),
            FieldDescriptor::text("name"),
            FieldDescriptor::boolean("is_active"),
            FieldDescriptor::real("balance"),
            FieldDescriptor::text("email").with_hint("Unique address").optional(),
        ],
    )
    .unwrap()
}

#[test]
fn record_serializes_as_field_map() {
    let record = contact()
        .construct([
            ("id", Value::from(7)),
            ("name", Value::from("Ana")),
            ("is_active", Value::from(true)),
            ("balance", Value::from(12.5)),
        ])
        .unwrap();

    let json = serde_json::to_value(&record).unwrap();
    assert_eq!(
        json,
        json!({
            "id": 7,
            "name": "Ana",
            "is_active": true,
            "balance": 12.5,
            "email": null
        })
    );
}

#[test]
fn dump_follows_declaration_order() {
    let record = contact()
        .construct([
            ("email", Value::from("ana@example.com")),
            ("balance", Value::from(1)),
            ("is_active", Value::from(false)),
            ("name", Value::from("Ana")),
            ("id", Value::from(1)),
        ])
        .unwrap();

    assert_eq!(record.type_name(), "Contact");
    assert_eq!(
        record.into_values(),
        vec![
            Value::Integer(1),
            Value::from("Ana"),
            Value::Boolean(false),
            Value::Real(1.0),
            Value::from("ana@example.com"),
        ]
    );
}

#[test]
fn record_type_exposes_field_metadata() {
    let rt = contact();
    assert_eq!(rt.table_name(), "contact");

    let email = rt.field("email").unwrap();
    assert_eq!(email.kind(), PrimitiveType::Text);
    assert!(email.is_optional());
    assert!(email.constraints().contains(Constraint::Unique));
    assert_eq!(email.hint(), Some("Unique address"));

    assert!(rt.field("missing").is_none());
}

#[test]
fn invalid_record_types_are_rejected() {
    assert_eq!(
        RecordType::new("", [FieldDescriptor::integer("id")]).unwrap_err(),
        ValidationError::EmptyName
    );
    assert_eq!(
        RecordType::new("Empty", Vec::<FieldDescriptor>::new()).unwrap_err(),
        ValidationError::NoFields
    );
    assert!(matches!(
        RecordType::new("Bad Name", [FieldDescriptor::integer("id")]),
        Err(ValidationError::InvalidIdentifier(_))
    ));
    assert!(matches!(
        RecordType::new("Ok", [FieldDescriptor::integer("bad-field")]),
        Err(ValidationError::InvalidIdentifier(name)) if name == "bad-field"
    ));
}

#[test]
fn duplicate_values_in_construct_are_rejected() {
    let err = contact()
        .construct([("id", Value::from(1)), ("id", Value::from(2))])
        .unwrap_err();
    assert_eq!(err, ValidationError::DuplicateField("id".to_string()));
}
