//! CSV reader

use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::CsvResult;
use crate::options::CsvReadOptions;
use rowbind_core::{CellValue, Worksheet};

/// CSV file reader
pub struct CsvReader;

impl CsvReader {
    /// Read a CSV file into a worksheet
    pub fn read_file<P: AsRef<Path>>(path: P, options: &CsvReadOptions) -> CsvResult<Worksheet> {
        let file = File::open(path)?;
        Self::read(file, options)
    }

    /// Read CSV from a reader into a worksheet
    ///
    /// With `has_header`, the header line lands on row 0 so the sheet
    /// keeps the same shape the mapping layer expects from any container.
    pub fn read<R: Read>(reader: R, options: &CsvReadOptions) -> CsvResult<Worksheet> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .delimiter(options.delimiter)
            .quote(options.quote)
            .has_headers(options.has_header)
            .flexible(true)
            .from_reader(reader);

        let mut worksheet = Worksheet::new("Sheet1");
        let mut row_idx = 0u32;

        if options.has_header {
            if let Ok(headers) = csv_reader.headers() {
                let headers = headers.clone();
                for (col, value) in headers.iter().enumerate() {
                    worksheet.set_value_at(row_idx, col as u16, value)?;
                }
                row_idx += 1;
            }
        }

        for result in csv_reader.records() {
            let record = result?;

            for (col, field) in record.iter().enumerate() {
                if field.is_empty() {
                    continue;
                }
                let value = if options.auto_detect_types {
                    Self::detect_type(field)
                } else {
                    CellValue::text(field)
                };
                worksheet.set_value_at(row_idx, col as u16, value)?;
            }

            row_idx += 1;
        }

        Ok(worksheet)
    }

    /// Detect the type of a field value
    fn detect_type(field: &str) -> CellValue {
        let trimmed = field.trim();

        match trimmed.to_lowercase().as_str() {
            "true" => return CellValue::Boolean(true),
            "false" => return CellValue::Boolean(false),
            _ => {}
        }

        if let Ok(n) = trimmed.parse::<f64>() {
            return CellValue::Number(n);
        }

        CellValue::text(field)
    }
}
