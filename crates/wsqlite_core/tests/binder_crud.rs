use rusqlite::Connection;
use std::path::Path;
use wsqlite_core::{
    BinderError, FieldDescriptor, Filter, PrimitiveType, Record, RecordRepository, RecordType,
    TableBinder, ValidationError, Value,
};

fn simple_model() -> RecordType {
    RecordType::new(
        "SimpleModel",
        [
            FieldDescriptor::integer("id"),
            FieldDescriptor::text("name"),
            FieldDescriptor::integer("age"),
            FieldDescriptor::boolean("is_active"),
        ],
    )
    .unwrap()
}

fn person(rt: &RecordType, id: i64, name: &str, age: i64, is_active: bool) -> Record {
    rt.construct([
        ("id", Value::from(id)),
        ("name", Value::from(name)),
        ("age", Value::from(age)),
        ("is_active", Value::from(is_active)),
    ])
    .unwrap()
}

fn seeded_binder(path: &Path) -> (TableBinder, Vec<Record>) {
    let binder = TableBinder::bind(simple_model(), path).unwrap();
    let rt = binder.record_type().clone();
    let people = vec![
        person(&rt, 1, "Juan Perez", 30, true),
        person(&rt, 2, "Ana Lopez", 25, true),
        person(&rt, 3, "Pedro Gomez", 40, false),
    ];
    for record in &people {
        binder.insert(record).unwrap();
    }
    (binder, people)
}

fn ids(records: &[Record]) -> Vec<i64> {
    records
        .iter()
        .map(|record| record.get("id").and_then(Value::as_i64).unwrap())
        .collect()
}

#[test]
fn insert_then_get_all_roundtrips_every_field() {
    let dir = tempfile::tempdir().unwrap();
    let (binder, people) = seeded_binder(&dir.path().join("crud.db"));

    let loaded = binder.get_all().unwrap();
    assert_eq!(loaded, people);
    assert_eq!(loaded[2].get("is_active"), Some(&Value::Boolean(false)));
}

#[test]
fn get_by_field_matches_single_condition() {
    let dir = tempfile::tempdir().unwrap();
    let (binder, people) = seeded_binder(&dir.path().join("crud.db"));

    let found = binder
        .get_by_field(&Filter::new().where_eq("name", "Juan Perez"))
        .unwrap();
    assert_eq!(found, vec![people[0].clone()]);
}

#[test]
fn get_by_field_combines_conditions_with_and() {
    let dir = tempfile::tempdir().unwrap();
    let (binder, people) = seeded_binder(&dir.path().join("crud.db"));
    binder
        .insert(&person(binder.record_type(), 4, "Luis Diaz", 25, false))
        .unwrap();

    let filter: Filter = [("age", Value::from(25)), ("is_active", Value::from(true))]
        .into_iter()
        .collect();
    let found = binder.get_by_field(&filter).unwrap();
    assert_eq!(found, vec![people[1].clone()]);

    let none = binder
        .get_by_field(&Filter::new().where_eq("age", 40).where_eq("is_active", true))
        .unwrap();
    assert!(none.is_empty());
}

#[test]
fn empty_filter_behaves_like_get_all() {
    let dir = tempfile::tempdir().unwrap();
    let (binder, _) = seeded_binder(&dir.path().join("crud.db"));

    assert_eq!(
        binder.get_by_field(&Filter::new()).unwrap(),
        binder.get_all().unwrap()
    );
}

#[test]
fn update_overwrites_row_and_ignores_missing_ids() {
    let dir = tempfile::tempdir().unwrap();
    let (binder, _) = seeded_binder(&dir.path().join("crud.db"));
    let rt = binder.record_type().clone();

    let updated = person(&rt, 1, "Juan Perez", 31, false);
    assert_eq!(binder.update(1, &updated).unwrap(), 1);

    let found = binder
        .get_by_field(&Filter::new().where_eq("id", 1))
        .unwrap();
    assert_eq!(found, vec![updated]);

    let ghost = person(&rt, 99, "Nobody", 1, true);
    assert_eq!(binder.update(99, &ghost).unwrap(), 0);
    assert_eq!(binder.get_all().unwrap().len(), 3);
}

#[test]
fn delete_removes_one_row_and_is_idempotent() {
    let dir = tempfile::tempdir().unwrap();
    let (binder, _) = seeded_binder(&dir.path().join("crud.db"));

    assert_eq!(binder.delete(3).unwrap(), 1);
    assert_eq!(ids(&binder.get_all().unwrap()), [1, 2]);

    assert_eq!(binder.delete(3).unwrap(), 0);
    assert_eq!(ids(&binder.get_all().unwrap()), [1, 2]);
}

#[test]
fn data_persists_across_binder_instances() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("crud.db");
    let (_, people) = seeded_binder(&path);

    let reopened = TableBinder::bind(simple_model(), &path).unwrap();
    assert!(reopened.last_sync().is_noop());
    assert_eq!(reopened.get_all().unwrap(), people);
}

#[test]
fn records_of_another_type_are_rejected_before_sql() {
    let dir = tempfile::tempdir().unwrap();
    let binder = TableBinder::bind(simple_model(), dir.path().join("crud.db")).unwrap();

    let pet_type = RecordType::new("Pet", [FieldDescriptor::integer("id")]).unwrap();
    let pet = pet_type.construct([("id", Value::from(1))]).unwrap();

    let err = binder.insert(&pet).unwrap_err();
    assert!(matches!(
        err,
        BinderError::Validation(ValidationError::RecordTypeMismatch { .. })
    ));
    assert!(binder.get_all().unwrap().is_empty());
}

#[test]
fn filter_names_are_validated_and_unknown_columns_fail_in_store() {
    let dir = tempfile::tempdir().unwrap();
    let (binder, _) = seeded_binder(&dir.path().join("crud.db"));

    let err = binder
        .get_by_field(&Filter::new().where_eq("name; DROP TABLE simplemodel", 1))
        .unwrap_err();
    assert!(matches!(
        err,
        BinderError::Validation(ValidationError::InvalidIdentifier(_))
    ));

    let err = binder
        .get_by_field(&Filter::new().where_eq("nickname", "x"))
        .unwrap_err();
    assert!(matches!(err, BinderError::Store(_)));
    assert_eq!(binder.get_all().unwrap().len(), 3);
}

#[test]
fn writes_to_a_dropped_table_surface_store_errors() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("crud.db");
    let binder = TableBinder::bind(simple_model(), &path).unwrap();

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("DROP TABLE simplemodel;").unwrap();
    drop(conn);

    let record = person(binder.record_type(), 1, "Ana", 25, true);
    let err = binder.insert(&record).unwrap_err();
    assert!(matches!(err, BinderError::Store(_)));
    assert!(matches!(binder.get_all().unwrap_err(), BinderError::Store(_)));
}

#[test]
fn real_and_untyped_fields_read_back_as_inserted() {
    let dir = tempfile::tempdir().unwrap();
    let rt = RecordType::new(
        "Thing",
        [
            FieldDescriptor::integer("id"),
            FieldDescriptor::real("weight"),
            FieldDescriptor::new("payload", PrimitiveType::Untyped),
        ],
    )
    .unwrap();
    let binder = TableBinder::bind(rt, dir.path().join("things.db")).unwrap();

    let inserted: Vec<_> = [(1, 1.5, "5"), (2, -0.25, "true")]
        .into_iter()
        .map(|(id, weight, payload)| {
            binder
                .record_type()
                .construct([
                    ("id", Value::from(id)),
                    ("weight", Value::from(weight)),
                    ("payload", Value::from(payload)),
                ])
                .unwrap()
        })
        .collect();
    for record in &inserted {
        binder.insert(record).unwrap();
    }

    assert_eq!(binder.get_all().unwrap(), inserted);

    let err = binder
        .record_type()
        .construct([
            ("id", Value::from(3)),
            ("weight", Value::from(1.0)),
            ("payload", Value::from(5)),
        ])
        .unwrap_err();
    assert!(matches!(
        err,
        ValidationError::TypeMismatch { ref field, found: "integer", .. } if field == "payload"
    ));
}

#[test]
fn null_filter_values_are_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let (binder, _) = seeded_binder(&dir.path().join("crud.db"));

    let err = binder
        .get_by_field(&Filter::new().where_eq("name", Value::Null))
        .unwrap_err();
    assert!(matches!(
        err,
        BinderError::Validation(ValidationError::NullFilter(ref field)) if field == "name"
    ));
}
