//! # rowbind-schema
//!
//! The mapping core of rowbind: declarative field schemas, text
//! coercion per data kind, and the row writer/reader pair converting
//! between typed records and the sheet model.
//!
//! A record type declares its columns once via the [`Record`] trait;
//! [`RowWriter`] and [`RowReader`] then drive both directions of
//! conversion through the same schema:
//!
//! ```rust
//! use rowbind_core::Worksheet;
//! use rowbind_schema::{
//!     DataKind, FieldDescriptor, FieldValue, Record, RowReader, RowWriter, Schema, SchemaError,
//! };
//!
//! #[derive(Debug, Default, PartialEq)]
//! struct Person {
//!     name: String,
//!     age: Option<i32>,
//! }
//!
//! impl Record for Person {
//!     fn schema() -> Result<Schema, SchemaError> {
//!         Schema::builder()
//!             .field(FieldDescriptor::new("name", DataKind::Text, "Name"))
//!             .field(FieldDescriptor::new("age", DataKind::Integer, "Age"))
//!             .build()
//!     }
//!
//!     fn field(&self, name: &str) -> Option<FieldValue> {
//!         match name {
//!             "name" => Some(FieldValue::Text(self.name.clone())),
//!             "age" => self.age.map(FieldValue::Integer),
//!             _ => None,
//!         }
//!     }
//!
//!     fn set_field(&mut self, name: &str, value: FieldValue) {
//!         match (name, value) {
//!             ("name", FieldValue::Text(v)) => self.name = v,
//!             ("age", FieldValue::Integer(v)) => self.age = Some(v),
//!             _ => {}
//!         }
//!     }
//! }
//!
//! let schema = Person::schema().unwrap();
//! let people = vec![Person { name: "Ada".into(), age: Some(36) }];
//!
//! let mut sheet = Worksheet::new("People");
//! RowWriter::write(&schema, &people, &mut sheet).unwrap();
//! let back: Vec<Person> = RowReader::read(&schema, &sheet).unwrap();
//! assert_eq!(back, people);
//! ```

pub mod descriptor;
pub mod error;
pub mod kind;
pub mod reader;
pub mod record;
pub mod schema;
pub mod value;
pub mod writer;

pub use descriptor::{ColumnStyle, FieldDescriptor};
pub use error::{BindError, CoercionError, ConversionError, SchemaError};
pub use kind::{DataKind, DEFAULT_DATETIME_PATTERN};
pub use reader::RowReader;
pub use record::Record;
pub use schema::{Schema, SchemaBuilder};
pub use value::FieldValue;
pub use writer::RowWriter;
