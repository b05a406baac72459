//! End-to-end binding tests (write records -> container -> read back)

use std::io::Cursor;

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use rowbind::prelude::*;
use rowbind::{XlsxReader, XlsxWriter};
use rust_decimal::Decimal;

#[derive(Debug, Default, Clone, PartialEq)]
struct Person {
    name: String,
    age: Option<i32>,
    address: String,
}

impl Record for Person {
    fn schema() -> Result<Schema, SchemaError> {
        Schema::builder()
            .field(
                FieldDescriptor::new("name", DataKind::Text, "姓名")
                    .with_header_fill(Color::LIGHT_BLUE)
                    .with_column_width(16.0),
            )
            .field(FieldDescriptor::new("age", DataKind::Integer, "年龄").centered())
            .field(FieldDescriptor::new("address", DataKind::Text, "地址"))
            .build()
    }

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "name" => Some(FieldValue::Text(self.name.clone())),
            "age" => self.age.map(FieldValue::Integer),
            "address" => Some(FieldValue::Text(self.address.clone())),
            _ => None,
        }
    }

    fn set_field(&mut self, name: &str, value: FieldValue) {
        match (name, value) {
            ("name", FieldValue::Text(v)) => self.name = v,
            ("age", FieldValue::Integer(v)) => self.age = Some(v),
            ("address", FieldValue::Text(v)) => self.address = v,
            _ => {}
        }
    }
}

fn person(name: &str, age: i32, address: &str) -> Person {
    Person {
        name: name.into(),
        age: Some(age),
        address: address.into(),
    }
}

/// Scenario A: three records written to disk come back equal
#[test]
fn test_write_then_read_back() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("people.xlsx");

    let people = vec![
        person("张三", 22, "江西"),
        person("李四", 30, "北京"),
        person("王五", 45, "上海"),
    ];

    rowbind::configure::<Person>()
        .with_path(&path)
        .unwrap()
        .with_sheet_name("测试")
        .write(&people)
        .unwrap();

    let back = rowbind::configure::<Person>()
        .with_path(&path)
        .unwrap()
        .with_sheet_name("测试")
        .read()
        .unwrap();

    assert_eq!(back, people);
}

#[test]
fn test_header_styling_lands_in_container() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("styled.xlsx");

    rowbind::configure::<Person>()
        .with_path(&path)
        .unwrap()
        .write(&[person("张三", 22, "江西")])
        .unwrap();

    let workbook = XlsxReader::read_file(&path).unwrap();
    let sheet = workbook.worksheet(0).unwrap();

    assert_eq!(sheet.text_at(0, 0).as_deref(), Some("姓名"));
    let header_style = sheet.cell_style_at(0, 0).expect("styled header cell");
    assert_eq!(header_style.fill.color(), Some(Color::LIGHT_BLUE));
    assert!(!header_style.border.is_empty());

    let age_style = sheet.cell_style_at(0, 1).expect("styled header cell");
    assert_eq!(age_style.alignment.horizontal, HorizontalAlignment::Center);

    assert!((sheet.column_width(0) - 16.0).abs() < 0.001);
}

/// Scenario B: an explicit column index wins over header position on
/// both paths
#[test]
fn test_explicit_index_precedence() {
    #[derive(Debug, Default, Clone, PartialEq)]
    struct Pinned {
        name: String,
        age: Option<i32>,
    }

    impl Record for Pinned {
        fn schema() -> Result<Schema, SchemaError> {
            Schema::builder()
                .field(FieldDescriptor::new("name", DataKind::Text, "姓名"))
                .field(
                    FieldDescriptor::new("age", DataKind::Integer, "年龄").with_column_index(5),
                )
                .build()
        }

        fn field(&self, name: &str) -> Option<FieldValue> {
            match name {
                "name" => Some(FieldValue::Text(self.name.clone())),
                "age" => self.age.map(FieldValue::Integer),
                _ => None,
            }
        }

        fn set_field(&mut self, name: &str, value: FieldValue) {
            match (name, value) {
                ("name", FieldValue::Text(v)) => self.name = v,
                ("age", FieldValue::Integer(v)) => self.age = Some(v),
                _ => {}
            }
        }
    }

    let records = vec![Pinned {
        name: "张三".into(),
        age: Some(22),
    }];

    // Write: header stays in schema order, data obeys the pinned index
    let mut buf = Vec::new();
    rowbind::configure::<Pinned>()
        .write_to(&records, Cursor::new(&mut buf))
        .unwrap();

    let workbook = XlsxReader::read(Cursor::new(&buf)).unwrap();
    let sheet = workbook.worksheet(0).unwrap();
    assert_eq!(sheet.text_at(0, 1).as_deref(), Some("年龄"));
    assert_eq!(sheet.text_at(1, 5).as_deref(), Some("22"));
    assert_eq!(sheet.text_at(1, 1), None);

    // Read: column 5 is used even though the header names column 1
    let mut tampered = Workbook::empty();
    tampered.add_worksheet_with_name("Sheet1").unwrap();
    let sheet = tampered.worksheet_mut(0).unwrap();
    sheet.set_value_at(0, 0, "姓名").unwrap();
    sheet.set_value_at(0, 1, "年龄").unwrap();
    sheet.set_value_at(1, 0, "张三").unwrap();
    sheet.set_value_at(1, 1, "999").unwrap();
    sheet.set_value_at(1, 5, "22").unwrap();

    let mut buf = Vec::new();
    XlsxWriter::write(&tampered, Cursor::new(&mut buf)).unwrap();

    let back: Vec<Pinned> = rowbind::configure::<Pinned>()
        .read_from(Cursor::new(&buf))
        .unwrap();
    assert_eq!(back[0].age, Some(22));
}

/// Missing-field tolerance: a reader schema with a column the sheet
/// lacks leaves that field at its default
#[test]
fn test_missing_header_field_defaults() {
    #[derive(Debug, Default, Clone, PartialEq)]
    struct Extended {
        name: String,
        email: Option<String>,
    }

    impl Record for Extended {
        fn schema() -> Result<Schema, SchemaError> {
            Schema::builder()
                .field(FieldDescriptor::new("name", DataKind::Text, "姓名"))
                .field(FieldDescriptor::new("email", DataKind::Text, "邮箱"))
                .build()
        }

        fn field(&self, name: &str) -> Option<FieldValue> {
            match name {
                "name" => Some(FieldValue::Text(self.name.clone())),
                "email" => self.email.clone().map(FieldValue::Text),
                _ => None,
            }
        }

        fn set_field(&mut self, name: &str, value: FieldValue) {
            match (name, value) {
                ("name", FieldValue::Text(v)) => self.name = v,
                ("email", FieldValue::Text(v)) => self.email = Some(v),
                _ => {}
            }
        }
    }

    let mut buf = Vec::new();
    rowbind::configure::<Person>()
        .write_to(&[person("张三", 22, "江西")], Cursor::new(&mut buf))
        .unwrap();

    let back: Vec<Extended> = rowbind::configure::<Extended>()
        .read_from(Cursor::new(&buf))
        .unwrap();

    assert_eq!(back.len(), 1);
    assert_eq!(back[0].name, "张三");
    assert_eq!(back[0].email, None);
}

/// All the richer kinds survive a stream round-trip
#[test]
fn test_rich_kinds_roundtrip() {
    #[derive(Debug, Default, Clone, PartialEq)]
    struct Order {
        id: Option<i64>,
        total: Option<Decimal>,
        ratio: Option<f64>,
        paid: Option<bool>,
        grade: Option<char>,
        placed: Option<chrono::NaiveDateTime>,
    }

    impl Record for Order {
        fn schema() -> Result<Schema, SchemaError> {
            Schema::builder()
                .field(FieldDescriptor::new("id", DataKind::Long, "Id"))
                .field(FieldDescriptor::new("total", DataKind::Decimal, "Total"))
                .field(FieldDescriptor::new("ratio", DataKind::Double, "Ratio"))
                .field(FieldDescriptor::new("paid", DataKind::Boolean, "Paid"))
                .field(FieldDescriptor::new("grade", DataKind::Char, "Grade"))
                .field(
                    FieldDescriptor::new("placed", DataKind::DateTime, "Placed")
                        .with_pattern("%Y-%m-%d %H:%M"),
                )
                .build()
        }

        fn field(&self, name: &str) -> Option<FieldValue> {
            match name {
                "id" => self.id.map(FieldValue::Long),
                "total" => self.total.map(FieldValue::Decimal),
                "ratio" => self.ratio.map(FieldValue::Double),
                "paid" => self.paid.map(FieldValue::Boolean),
                "grade" => self.grade.map(FieldValue::Char),
                "placed" => self.placed.map(FieldValue::DateTime),
                _ => None,
            }
        }

        fn set_field(&mut self, name: &str, value: FieldValue) {
            match (name, value) {
                ("id", FieldValue::Long(v)) => self.id = Some(v),
                ("total", FieldValue::Decimal(v)) => self.total = Some(v),
                ("ratio", FieldValue::Double(v)) => self.ratio = Some(v),
                ("paid", FieldValue::Boolean(v)) => self.paid = Some(v),
                ("grade", FieldValue::Char(v)) => self.grade = Some(v),
                ("placed", FieldValue::DateTime(v)) => self.placed = Some(v),
                _ => {}
            }
        }
    }

    let orders = vec![
        Order {
            id: Some(9_000_000_001),
            total: Some("123.45".parse().unwrap()),
            ratio: Some(0.75),
            paid: Some(true),
            grade: Some('A'),
            placed: NaiveDate::from_ymd_opt(2024, 6, 1)
                .unwrap()
                .and_hms_opt(9, 30, 0),
        },
        // Second record leaves everything unset
        Order::default(),
    ];

    let mut buf = Vec::new();
    rowbind::configure::<Order>()
        .write_to(&orders, Cursor::new(&mut buf))
        .unwrap();

    let back: Vec<Order> = rowbind::configure::<Order>()
        .read_from(Cursor::new(&buf))
        .unwrap();

    assert_eq!(back, orders);
}

#[test]
fn test_csv_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("people.csv");

    let people = vec![person("Ada", 36, "London"), person("Lin", 28, "Shanghai")];

    rowbind::configure::<Person>()
        .with_path(&path)
        .unwrap()
        .write(&people)
        .unwrap();

    let back = rowbind::configure::<Person>()
        .with_path(&path)
        .unwrap()
        .read()
        .unwrap();

    assert_eq!(back, people);
}

#[test]
fn test_read_empty_sheet_yields_no_records() {
    let mut workbook = Workbook::new();
    workbook
        .worksheet_mut(0)
        .unwrap()
        .clear_cell_at(0, 0);

    let mut buf = Vec::new();
    XlsxWriter::write(&workbook, Cursor::new(&mut buf)).unwrap();

    let back: Vec<Person> = rowbind::configure::<Person>()
        .read_from(Cursor::new(&buf))
        .unwrap();
    assert!(back.is_empty());
}
