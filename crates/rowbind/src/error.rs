//! Facade error type

use std::path::PathBuf;

use thiserror::Error;

use rowbind_schema::{BindError, ConversionError, SchemaError};

/// Result type alias defaulting to [`Error`]
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Any error a binding operation can surface
///
/// Every failure aborts the whole read or write; the variant tells the
/// caller which layer rejected the operation.
#[derive(Debug, Error)]
pub enum Error {
    /// Schema building or sheet resolution failed
    #[error(transparent)]
    Schema(#[from] SchemaError),

    /// A field value failed to convert
    #[error(transparent)]
    Conversion(#[from] ConversionError),

    /// Sheet model violation
    #[error(transparent)]
    Core(#[from] rowbind_core::Error),

    /// XLSX container failure
    #[error(transparent)]
    Xlsx(#[from] rowbind_xlsx::XlsxError),

    /// CSV container failure
    #[error(transparent)]
    Csv(#[from] rowbind_csv::CsvError),

    /// The source or sink could not be opened
    #[error("cannot open {path}: {source}")]
    Stream {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file extension is not a recognized spreadsheet format
    ///
    /// Raised by [`Binding::with_path`](crate::Binding::with_path)
    /// before any I/O happens.
    #[error("unsupported spreadsheet extension: {0}")]
    PathValidation(PathBuf),

    /// A terminal operation ran with no path configured
    #[error("no file path configured; use with_path or the stream entry points")]
    MissingPath,
}

impl From<BindError> for Error {
    fn from(err: BindError) -> Self {
        match err {
            BindError::Schema(e) => Error::Schema(e),
            BindError::Conversion(e) => Error::Conversion(e),
            BindError::Sheet(e) => Error::Core(e),
        }
    }
}
