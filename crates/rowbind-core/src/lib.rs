//! # rowbind-core
//!
//! Core data structures for the rowbind record/spreadsheet binding library.
//!
//! This crate provides the sheet model the mapping layer and the container
//! backends exchange:
//! - [`CellValue`] and [`CellData`] - cell contents and style reference
//! - [`CellAddress`] - A1-style addressing
//! - [`Style`] - cell formatting (fills, borders, alignment)
//! - [`Workbook`], [`Worksheet`] - the document structures
//!
//! ## Example
//!
//! ```rust
//! use rowbind_core::{CellValue, Worksheet};
//!
//! let mut sheet = Worksheet::new("People");
//! sheet.set_value_at(0, 0, "name").unwrap();
//! sheet.set_value_at(1, 0, CellValue::text("Ada")).unwrap();
//!
//! assert_eq!(sheet.text_at(1, 0).as_deref(), Some("Ada"));
//! ```

pub mod address;
pub mod cell;
pub mod error;
pub mod style;
pub mod workbook;
pub mod worksheet;

// Re-exports for convenience
pub use address::CellAddress;
pub use cell::{CellData, CellValue};
pub use error::{Error, Result};
pub use workbook::Workbook;
pub use worksheet::Worksheet;

// Re-export all style types for convenience
pub use style::{
    Alignment, BorderEdge, BorderLineStyle, BorderStyle, Color, FillStyle, HorizontalAlignment,
    Style, StylePool, VerticalAlignment,
};

/// Maximum number of rows in a worksheet (container format limit)
pub const MAX_ROWS: u32 = 1_048_576;

/// Maximum number of columns in a worksheet (container format limit)
pub const MAX_COLS: u16 = 16_384;

/// Maximum length of a sheet name
pub const MAX_SHEET_NAME_LEN: usize = 31;
