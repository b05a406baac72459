//! Error types for the mapping layer

use thiserror::Error;

use crate::kind::DataKind;

/// Errors detected while building or applying a schema
///
/// Schema errors are fatal: the whole read or write aborts.
#[derive(Debug, Error)]
pub enum SchemaError {
    /// The requested sheet does not exist in the workbook
    #[error("Sheet not found: {0}")]
    SheetNotFound(String),

    /// The schema maps no fields at all
    #[error("schema has no mapped fields")]
    Empty,

    /// Two descriptors share a declared field name
    #[error("duplicate field `{0}` in schema")]
    DuplicateField(String),

    /// Two descriptors claim the same explicit column index
    #[error("duplicate explicit column index {index} (fields `{first}` and `{second}`)")]
    DuplicateColumnIndex {
        index: u16,
        first: String,
        second: String,
    },

    /// An explicit column index beyond the container format's limit
    #[error("column index {index} for field `{field}` exceeds the maximum of {max}")]
    ColumnIndexOutOfRange { field: String, index: u16, max: u16 },
}

/// A single value failing to convert between text and its kind
///
/// Carries the raw input and the target kind; the row loops wrap it
/// into a [`ConversionError`] with field context.
#[derive(Debug, Error)]
pub enum CoercionError {
    /// Cell text that does not parse as the target kind
    #[error("cannot parse {text:?} as {kind}")]
    Malformed { text: String, kind: DataKind },

    /// A record value whose variant does not match the descriptor's kind
    #[error("expected {expected} value, got {actual}")]
    KindMismatch { expected: DataKind, actual: DataKind },

    /// A date/time format pattern chrono cannot interpret
    #[error("invalid date/time pattern {pattern:?}")]
    BadPattern { pattern: String },
}

impl CoercionError {
    /// Attach field and row context for the read path
    pub(crate) fn on_read(self, field: &str, row: u32) -> ConversionError {
        ConversionError::Read {
            field: field.to_string(),
            row,
            source: self,
        }
    }

    /// Attach field context for the write path
    pub(crate) fn on_write(self, field: &str) -> ConversionError {
        ConversionError::Write {
            field: field.to_string(),
            source: self,
        }
    }
}

/// A field failing to convert during a read or write
///
/// Conversion errors are fatal: remaining rows are not processed.
#[derive(Debug, Error)]
pub enum ConversionError {
    /// A cell failed to parse while reading records
    #[error("field `{field}` at row {row}: {source}")]
    Read {
        field: String,
        row: u32,
        #[source]
        source: CoercionError,
    },

    /// A record value failed to format while writing
    #[error("field `{field}`: {source}")]
    Write {
        field: String,
        #[source]
        source: CoercionError,
    },
}

/// Any error produced by the mapping layer
#[derive(Debug, Error)]
pub enum BindError {
    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error(transparent)]
    Conversion(#[from] ConversionError),

    #[error(transparent)]
    Sheet(#[from] rowbind_core::Error),
}
