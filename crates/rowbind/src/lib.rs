//! # rowbind
//!
//! Declarative record/spreadsheet binding for Rust.
//!
//! A record type declares its columns once (display name, data kind,
//! optional explicit column index, format pattern, styling hints); the
//! same schema then drives both directions of conversion:
//!
//! - **write**: a record slice becomes a styled sheet (header row plus
//!   one data row per record) persisted as XLSX or CSV
//! - **read**: sheet rows become typed records, with columns matched by
//!   explicit index or header name
//!
//! ## Example
//!
//! ```no_run
//! use rowbind::prelude::*;
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Person {
//!     name: String,
//!     age: Option<i32>,
//!     address: String,
//! }
//!
//! impl Record for Person {
//!     fn schema() -> Result<Schema, SchemaError> {
//!         Schema::builder()
//!             .field(
//!                 FieldDescriptor::new("name", DataKind::Text, "姓名")
//!                     .with_header_fill(Color::LIGHT_BLUE),
//!             )
//!             .field(FieldDescriptor::new("age", DataKind::Integer, "年龄"))
//!             .field(FieldDescriptor::new("address", DataKind::Text, "地址"))
//!             .build()
//!     }
//!
//!     fn field(&self, name: &str) -> Option<FieldValue> {
//!         match name {
//!             "name" => Some(FieldValue::Text(self.name.clone())),
//!             "age" => self.age.map(FieldValue::Integer),
//!             "address" => Some(FieldValue::Text(self.address.clone())),
//!             _ => None,
//!         }
//!     }
//!
//!     fn set_field(&mut self, name: &str, value: FieldValue) {
//!         match (name, value) {
//!             ("name", FieldValue::Text(v)) => self.name = v,
//!             ("age", FieldValue::Integer(v)) => self.age = Some(v),
//!             ("address", FieldValue::Text(v)) => self.address = v,
//!             _ => {}
//!         }
//!     }
//! }
//!
//! # fn main() -> rowbind::Result<()> {
//! let people = vec![Person {
//!     name: "张三".into(),
//!     age: Some(22),
//!     address: "江西".into(),
//! }];
//!
//! rowbind::configure::<Person>()
//!     .with_path("people.xlsx")?
//!     .with_sheet_name("测试")
//!     .write(&people)?;
//!
//! let back = rowbind::configure::<Person>()
//!     .with_path("people.xlsx")?
//!     .with_sheet_name("测试")
//!     .read()?;
//! assert_eq!(back, people);
//! # Ok(())
//! # }
//! ```
//!
//! Streams work too: [`Binding::write_to`] and [`Binding::read_from`]
//! bind the same schema to any `Write + Seek` sink or `Read + Seek`
//! source as XLSX.

pub mod binding;
pub mod error;
pub mod prelude;

pub use binding::{configure, Binding};
pub use error::{Error, Result};

// Re-export the mapping layer
pub use rowbind_schema::{
    BindError, CoercionError, ColumnStyle, ConversionError, DataKind, FieldDescriptor, FieldValue,
    Record, RowReader, RowWriter, Schema, SchemaBuilder, SchemaError, DEFAULT_DATETIME_PATTERN,
};

// Re-export core types
pub use rowbind_core::{
    Alignment, BorderEdge, BorderLineStyle, BorderStyle, CellAddress, CellData, CellValue, Color,
    FillStyle, HorizontalAlignment, Style, StylePool, VerticalAlignment, Workbook, Worksheet,
    MAX_COLS, MAX_ROWS, MAX_SHEET_NAME_LEN,
};

// Re-export I/O types
pub use rowbind_csv::{CsvError, CsvReadOptions, CsvReader, CsvWriteOptions, CsvWriter};
pub use rowbind_xlsx::{XlsxError, XlsxReader, XlsxWriter};
