//! Error surface tests: every failure names its layer and its context

use std::io::Cursor;

use rowbind::prelude::*;
use rowbind::{ConversionError, Error, XlsxWriter};
use rust_decimal::Decimal;

#[derive(Debug, Default, Clone, PartialEq)]
struct Product {
    label: String,
    price: Option<Decimal>,
}

impl Record for Product {
    fn schema() -> Result<Schema, SchemaError> {
        Schema::builder()
            .field(FieldDescriptor::new("label", DataKind::Text, "Label"))
            .field(FieldDescriptor::new("price", DataKind::Decimal, "Price"))
            .build()
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "label" => Some(FieldValue::Text(self.label.clone())),
            "price" => self.price.map(FieldValue::Decimal),
            _ => None,
        }
    }

    fn set_field(&mut self, name: &str, value: FieldValue) {
        match (name, value) {
            ("label", FieldValue::Text(v)) => self.label = v,
            ("price", FieldValue::Decimal(v)) => self.price = Some(v),
            _ => {}
        }
    }
}

/// Scenario C: a sheet name absent from the workbook is a schema error
#[test]
fn test_sheet_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("products.xlsx");

    rowbind::configure::<Product>()
        .with_path(&path)
        .unwrap()
        .with_sheet_name("Products")
        .write(&[Product::default()])
        .unwrap();

    let err = rowbind::configure::<Product>()
        .with_path(&path)
        .unwrap()
        .with_sheet_name("Missing")
        .read()
        .unwrap_err();

    match &err {
        Error::Schema(SchemaError::SheetNotFound(name)) => assert_eq!(name, "Missing"),
        other => panic!("unexpected error: {:?}", other),
    }
    assert_eq!(err.to_string(), "Sheet not found: Missing");
}

/// Scenario D: malformed decimal text names the field and the raw text
#[test]
fn test_malformed_decimal_cell() {
    let mut workbook = Workbook::empty();
    workbook.add_worksheet_with_name("Sheet1").unwrap();
    let sheet = workbook.worksheet_mut(0).unwrap();
    sheet.set_value_at(0, 0, "Label").unwrap();
    sheet.set_value_at(0, 1, "Price").unwrap();
    sheet.set_value_at(1, 0, "widget").unwrap();
    sheet.set_value_at(1, 1, "12a.3").unwrap();

    let mut buf = Vec::new();
    XlsxWriter::write(&workbook, Cursor::new(&mut buf)).unwrap();

    let err = rowbind::configure::<Product>()
        .read_from(Cursor::new(&buf))
        .unwrap_err();

    match &err {
        Error::Conversion(ConversionError::Read { field, row, .. }) => {
            assert_eq!(field, "price");
            assert_eq!(*row, 1);
        }
        other => panic!("unexpected error: {:?}", other),
    }

    let message = err.to_string();
    assert!(message.contains("price"), "message: {}", message);
    assert!(message.contains("12a.3"), "message: {}", message);
}

/// Unrecognized extensions fail before any I/O happens
#[test]
fn test_path_validation() {
    for bad in ["report.xls", "report.txt", "report", "report.xlsx.bak"] {
        let err = rowbind::configure::<Product>().with_path(bad).unwrap_err();
        assert!(
            matches!(err, Error::PathValidation(_)),
            "{} should be rejected",
            bad
        );
    }
}

#[test]
fn test_terminal_ops_require_path() {
    let err = rowbind::configure::<Product>()
        .write(&[Product::default()])
        .unwrap_err();
    assert!(matches!(err, Error::MissingPath));

    let err = rowbind::configure::<Product>().read().unwrap_err();
    assert!(matches!(err, Error::MissingPath));
}

/// A missing input file is a stream error, not a validation error
#[test]
fn test_missing_file_is_stream_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("does-not-exist.xlsx");

    let err = rowbind::configure::<Product>()
        .with_path(&path)
        .unwrap()
        .read()
        .unwrap_err();

    assert!(matches!(err, Error::Stream { .. }));
}

/// Duplicate explicit indices are rejected when the schema is built
#[test]
fn test_invalid_schema_surfaces_on_write() {
    #[derive(Debug, Default)]
    struct Clashing;

    impl Record for Clashing {
        fn schema() -> Result<Schema, SchemaError> {
            Schema::builder()
                .field(FieldDescriptor::new("a", DataKind::Text, "A").with_column_index(2))
                .field(FieldDescriptor::new("b", DataKind::Text, "B").with_column_index(2))
                .build()
        }

        fn field(&self, _name: &str) -> Option<FieldValue> {
            None
        }

        fn set_field(&mut self, _name: &str, _value: FieldValue) {}
    }

    let err = rowbind::configure::<Clashing>()
        .write_to(&[Clashing], Cursor::new(&mut Vec::new()))
        .unwrap_err();

    assert!(matches!(
        err,
        Error::Schema(SchemaError::DuplicateColumnIndex { index: 2, .. })
    ));
}
