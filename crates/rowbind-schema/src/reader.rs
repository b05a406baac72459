//! Row reader: worksheet → records

use std::collections::HashMap;

use rowbind_core::Worksheet;

use crate::error::BindError;
use crate::record::Record;
use crate::schema::Schema;

/// Reconstructs typed records from header and data rows
pub struct RowReader;

impl RowReader {
    /// Read every data row of `sheet` into a fresh record
    ///
    /// Row 0 supplies the display-name → column mapping; a sheet with no
    /// header row yields an empty vec. Descriptors resolve their source
    /// column by explicit index first, header name second; a descriptor
    /// matching neither leaves its field at the record's default value.
    pub fn read<T: Record>(schema: &Schema, sheet: &Worksheet) -> Result<Vec<T>, BindError> {
        let mut rows = sheet.rows();

        let header = match rows.next() {
            Some((0, cells)) => {
                let mut header: HashMap<String, u16> = HashMap::new();
                for (col, cell) in cells {
                    let text = cell.value.to_text();
                    if text.is_empty() {
                        continue;
                    }
                    // First occurrence wins for repeated header names
                    if let Some(first) = header.get(&text) {
                        log::warn!(
                            "duplicate header {:?} at column {}, keeping column {}",
                            text,
                            col,
                            first
                        );
                    } else {
                        header.insert(text, col);
                    }
                }
                header
            }
            // No header row: nothing to bind against
            _ => return Ok(Vec::new()),
        };

        let mut records = Vec::new();
        for (row, cells) in rows {
            let mut record = T::default();

            for descriptor in schema.fields() {
                let col = match descriptor.column_index() {
                    Some(index) => index,
                    None => match header.get(descriptor.display_name()) {
                        Some(&col) => col,
                        None => continue,
                    },
                };

                let Some(text) = cells
                    .iter()
                    .find(|(c, _)| *c == col)
                    .map(|(_, cell)| cell.value.to_text())
                else {
                    continue;
                };

                let parsed = descriptor
                    .kind()
                    .parse(&text, descriptor.pattern())
                    .map_err(|e| e.on_read(descriptor.name(), row))?;
                if let Some(value) = parsed {
                    record.set_field(descriptor.name(), value);
                }
            }

            records.push(record);
        }

        Ok(records)
    }
}
