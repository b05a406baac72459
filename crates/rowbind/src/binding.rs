//! The builder entry point

use std::fs::File;
use std::io::{Read, Seek, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use rowbind_core::Workbook;
use rowbind_csv::{CsvReadOptions, CsvReader, CsvWriteOptions, CsvWriter};
use rowbind_schema::{Record, RowReader, RowWriter, SchemaError};
use rowbind_xlsx::{XlsxReader, XlsxWriter};

use crate::error::{Error, Result};

/// Start configuring a binding for the record type `T`
///
/// ```no_run
/// use rowbind::prelude::*;
///
/// # #[derive(Debug, Default)]
/// # struct Person { name: String }
/// # impl Record for Person {
/// #     fn schema() -> Result<Schema, SchemaError> {
/// #         Schema::builder()
/// #             .field(FieldDescriptor::new("name", DataKind::Text, "Name"))
/// #             .build()
/// #     }
/// #     fn field(&self, name: &str) -> Option<FieldValue> {
/// #         (name == "name").then(|| FieldValue::Text(self.name.clone()))
/// #     }
/// #     fn set_field(&mut self, name: &str, value: FieldValue) {
/// #         if let ("name", FieldValue::Text(v)) = (name, value) { self.name = v; }
/// #     }
/// # }
/// let people = vec![Person::default()];
/// rowbind::configure::<Person>()
///     .with_path("people.xlsx")?
///     .with_sheet_name("People")
///     .write(&people)?;
///
/// let back: Vec<Person> = rowbind::configure::<Person>()
///     .with_path("people.xlsx")?
///     .with_sheet_name("People")
///     .read()?;
/// # Ok::<(), rowbind::Error>(())
/// ```
pub fn configure<T: Record>() -> Binding<T> {
    Binding::new()
}

/// Container format, derived from the file extension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SheetFormat {
    Xlsx,
    Csv,
}

impl SheetFormat {
    /// Recognize a path's extension; anything else is a validation error
    fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase());

        match extension.as_deref() {
            Some("xlsx") | Some("xlsm") => Ok(SheetFormat::Xlsx),
            Some("csv") => Ok(SheetFormat::Csv),
            _ => Err(Error::PathValidation(path.to_path_buf())),
        }
    }
}

/// A configured record/spreadsheet binding
///
/// Each terminal call builds the schema fresh, owns its source or sink
/// for the call's duration, and releases it on every exit path. Nothing
/// is shared between calls.
#[derive(Debug)]
pub struct Binding<T: Record> {
    path: Option<(PathBuf, SheetFormat)>,
    sheet_name: Option<String>,
    _record: PhantomData<T>,
}

impl<T: Record> Binding<T> {
    /// Create an unconfigured binding
    pub fn new() -> Self {
        Self {
            path: None,
            sheet_name: None,
            _record: PhantomData,
        }
    }

    /// Bind to a file path
    ///
    /// The extension is validated eagerly: `xlsx`/`xlsm` and `csv` are
    /// recognized, anything else fails with [`Error::PathValidation`]
    /// before any I/O.
    pub fn with_path<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let format = SheetFormat::from_path(&path)?;
        self.path = Some((path, format));
        Ok(self)
    }

    /// Name the sheet to write or read
    ///
    /// Defaults to "Sheet1" on write and the first sheet on read.
    /// Ignored by the CSV container, which has no sheets.
    pub fn with_sheet_name<S: Into<String>>(mut self, name: S) -> Self {
        self.sheet_name = Some(name.into());
        self
    }

    /// Write `records` to the configured path
    ///
    /// The whole record set converts or the call fails; a failed
    /// conversion leaves no partially written file behind the caller's
    /// back (the sink is only opened once conversion succeeded).
    pub fn write(&self, records: &[T]) -> Result<()> {
        let (path, format) = self.path.as_ref().ok_or(Error::MissingPath)?;
        log::debug!("writing {} records to {}", records.len(), path.display());

        let workbook = self.build_workbook(records)?;

        match format {
            SheetFormat::Xlsx => {
                let file = File::create(path).map_err(|e| Error::Stream {
                    path: path.clone(),
                    source: e,
                })?;
                XlsxWriter::write(&workbook, file)?;
            }
            SheetFormat::Csv => {
                let file = File::create(path).map_err(|e| Error::Stream {
                    path: path.clone(),
                    source: e,
                })?;
                let sheet = workbook.worksheet(0).expect("workbook built with one sheet");
                CsvWriter::write(sheet, file, &CsvWriteOptions::default())?;
            }
        }

        Ok(())
    }

    /// Read records of type `T` from the configured path
    pub fn read(&self) -> Result<Vec<T>> {
        let (path, format) = self.path.as_ref().ok_or(Error::MissingPath)?;
        log::debug!("reading records from {}", path.display());

        match format {
            SheetFormat::Xlsx => {
                let file = File::open(path).map_err(|e| Error::Stream {
                    path: path.clone(),
                    source: e,
                })?;
                let workbook = XlsxReader::read(file)?;
                self.read_records(&workbook)
            }
            SheetFormat::Csv => {
                let file = File::open(path).map_err(|e| Error::Stream {
                    path: path.clone(),
                    source: e,
                })?;
                // Raw text cells; the coercion layer does the typing
                let sheet = CsvReader::read(file, &CsvReadOptions::default())?;
                let schema = T::schema()?;
                RowReader::read(&schema, &sheet).map_err(Into::into)
            }
        }
    }

    /// Write `records` to a caller-supplied sink as XLSX
    ///
    /// The stream-bound twin of [`Binding::write`] for sinks that never
    /// touch the filesystem (network peers, in-memory buffers).
    pub fn write_to<W: Write + Seek>(&self, records: &[T], sink: W) -> Result<()> {
        let workbook = self.build_workbook(records)?;
        XlsxWriter::write(&workbook, sink)?;
        Ok(())
    }

    /// Read records of type `T` from a caller-supplied XLSX source
    pub fn read_from<R: Read + Seek>(&self, source: R) -> Result<Vec<T>> {
        let workbook = XlsxReader::read(source)?;
        self.read_records(&workbook)
    }

    /// Build the transient workbook for a write call
    fn build_workbook(&self, records: &[T]) -> Result<Workbook> {
        let schema = T::schema()?;

        let mut workbook = Workbook::empty();
        let index = workbook.add_worksheet_with_name(self.sheet_name())?;
        let sheet = workbook.worksheet_mut(index).expect("just added");
        RowWriter::write(&schema, records, sheet)?;

        Ok(workbook)
    }

    /// Resolve the target sheet and decompose it into records
    fn read_records(&self, workbook: &Workbook) -> Result<Vec<T>> {
        let schema = T::schema()?;

        let sheet = match &self.sheet_name {
            Some(name) => workbook
                .worksheet_by_name(name)
                .ok_or_else(|| SchemaError::SheetNotFound(name.clone()))?,
            None => match workbook.worksheet(0) {
                Some(sheet) => sheet,
                None => return Ok(Vec::new()),
            },
        };

        RowReader::read(&schema, sheet).map_err(Into::into)
    }

    fn sheet_name(&self) -> &str {
        self.sheet_name.as_deref().unwrap_or("Sheet1")
    }
}

impl<T: Record> Default for Binding<T> {
    fn default() -> Self {
        Self::new()
    }
}
