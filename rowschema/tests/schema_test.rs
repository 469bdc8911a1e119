use std::sync::Arc;

use rowschema::config::SchemaConfig;
use rowschema::types::{get_type_info, DataType};
use rowschema::{ColumnDescriptor, ErrorKind, RowSchema, RowSchemaBuilder};

use crate::utils::{column, fixed_type, set_up};

mod utils;

#[test]
fn test_id_name_schema() {
    set_up();

    let schema = RowSchema::with_key_columns(
        vec![
            column("id", DataType::Int32, false),
            column("name", DataType::String, false),
        ],
        1,
    )
    .unwrap();

    let string_size = DataType::String.size();
    assert_eq!(schema.column_offsets(), &[0, 4, 4 + string_size]);
    assert_eq!(schema.find_column("id"), Some(0));
    assert_eq!(schema.find_column("name"), Some(1));
    assert_eq!(
        schema.to_string(),
        "Schema [id[type='int32' NOT NULL], name[type='string' NOT NULL]]"
    );
}

#[test]
fn test_rejected_schemas() {
    set_up();

    let cases = [
        (
            vec![column("a", DataType::Int32, true)],
            vec![],
            1,
            "Nullable key columns not supported",
        ),
        (
            vec![
                column("a", DataType::Int32, false),
                column("a", DataType::Int32, false),
            ],
            vec![],
            0,
            "Duplicate name present in schema!",
        ),
        (
            vec![
                column("a", DataType::Int32, false),
                column("b", DataType::Int32, false),
                column("c", DataType::Int32, false),
            ],
            vec![5, 9],
            0,
            "The number of ids does not match with the number of columns",
        ),
        (
            vec![column("a", DataType::Int32, false)],
            vec![],
            2,
            "More key columns than columns",
        ),
    ];

    for (columns, ids, key_columns, message) in cases {
        let err = RowSchema::new(columns, ids, key_columns).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidSchema);
        assert_eq!(err.message(), message);
        assert_eq!(err.context("category"), Some("Bad schema"));
    }
}

#[test]
fn test_custom_type_layout() {
    set_up();

    let wide = fixed_type("fixed100", 100);
    let schema = RowSchema::new(
        vec![
            ColumnDescriptor::required("k", wide.clone()),
            column("flag", DataType::Bool, true),
            ColumnDescriptor::optional("payload", wide),
        ],
        vec![100, 200, 300],
        1,
    )
    .unwrap();

    assert_eq!(schema.column_offsets(), &[0, 100, 101, 201]);
    assert_eq!(schema.byte_size(), 201);
    assert_eq!(schema.key_byte_size(), 100);
    assert_eq!(schema.find_column_by_id(300), Some(2));
    assert_eq!(
        schema.column(2).to_string(),
        "payload[type='fixed100' NULLABLE]"
    );
    // Both columns share one type descriptor.
    assert!(Arc::ptr_eq(
        schema.column(0).type_info(),
        schema.column(2).type_info()
    ));
}

#[test]
fn test_schema_shared_across_threads() {
    set_up();

    let schema = Arc::new(
        RowSchemaBuilder::new()
            .add_key_column_with_id(0, "ts", get_type_info(DataType::Int64))
            .add_key_column_with_id(1, "host", get_type_info(DataType::String))
            .add_column_with_id(2, "cpu", get_type_info(DataType::Double), true)
            .build()
            .unwrap(),
    );

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let schema = schema.clone();
            std::thread::spawn(move || {
                (
                    schema.column_offset(2),
                    schema.find_column("cpu"),
                    schema.find_column_by_id(1),
                )
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), (24, Some(2), Some(1)));
    }
}

#[test]
fn test_admission_check() {
    set_up();

    let columns = (0..10)
        .map(|i| column(&format!("c{i}"), DataType::UInt64, i > 0))
        .collect();
    let schema = RowSchema::with_key_columns(columns, 1).unwrap();

    let config = SchemaConfig {
        max_num_columns: 8,
        ..Default::default()
    };
    assert_eq!(
        config.check(&schema).unwrap_err().kind(),
        ErrorKind::SchemaLimitExceeded
    );
    assert!(SchemaConfig::default().check(&schema).is_ok());
}

#[test]
fn test_row_size_overflow() {
    set_up();

    let huge = fixed_type("huge", usize::MAX / 2 + 1);
    let columns: Vec<_> = ["a", "b", "c"]
        .iter()
        .map(|name| ColumnDescriptor::optional(*name, huge.clone()))
        .collect();

    let err = RowSchema::with_key_columns(columns.clone(), 0).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidSchema);
    assert_eq!(err.message(), "Row size overflows");
    assert_eq!(err.context("column"), Some("b"));

    let mut schema =
        RowSchema::with_key_columns(vec![column("k", DataType::Int32, false)], 1).unwrap();
    assert!(schema.reset(columns, vec![], 0).is_err());
    assert_eq!(schema.column_offsets(), &[0, 4]);
    assert_eq!(schema.find_column("a"), None);
}
