//! Common imports for rowbind users
//!
//! ```rust
//! use rowbind::prelude::*;
//! ```

pub use crate::binding::{configure, Binding};
pub use crate::error::{Error, Result};

pub use rowbind_schema::{
    ColumnStyle, DataKind, FieldDescriptor, FieldValue, Record, Schema, SchemaBuilder,
    SchemaError,
};

pub use rowbind_core::{
    CellValue, Color, HorizontalAlignment, Style, VerticalAlignment, Workbook, Worksheet,
};
