//! # rowbind-xlsx
//!
//! XLSX (Office Open XML) reader and writer for rowbind's sheet model.
//!
//! The container covers what the mapping layer produces: cell text,
//! numbers and booleans, solid fills, borders, alignment, custom row
//! heights and column widths.

mod error;
mod reader;
mod styles;
mod writer;

pub use error::{XlsxError, XlsxResult};
pub use reader::XlsxReader;
pub use writer::XlsxWriter;
