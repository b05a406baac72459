//! Row writer: records → worksheet

use rowbind_core::{
    BorderLineStyle, BorderStyle, Color, HorizontalAlignment, Style, VerticalAlignment, Worksheet,
};

use crate::error::BindError;
use crate::record::Record;
use crate::schema::Schema;

/// Converts a record slice into header and data rows
pub struct RowWriter;

impl RowWriter {
    /// Write the header row and one data row per record into `sheet`
    ///
    /// The header occupies row 0 in schema order; data cells land at the
    /// descriptor's explicit column index when pinned, else at the
    /// field's schema position. The whole record set converts or the
    /// call fails - there is no partial output contract.
    pub fn write<T: Record>(
        schema: &Schema,
        records: &[T],
        sheet: &mut Worksheet,
    ) -> Result<(), BindError> {
        Self::write_header(schema, sheet)?;

        for (i, record) in records.iter().enumerate() {
            let row = i as u32 + 1;
            for (position, descriptor) in schema.fields().iter().enumerate() {
                let value = record.field(descriptor.name());
                let text = descriptor
                    .kind()
                    .format(value.as_ref(), descriptor.pattern())
                    .map_err(|e| e.on_write(descriptor.name()))?;
                sheet.set_value_at(row, schema.data_column(position), text)?;
            }
        }

        Ok(())
    }

    /// Header cells carry the display names plus the descriptor's
    /// styling hints; they stay in schema order even when data columns
    /// are pinned elsewhere.
    fn write_header(schema: &Schema, sheet: &mut Worksheet) -> Result<(), BindError> {
        for (position, descriptor) in schema.fields().iter().enumerate() {
            let col = position as u16;
            sheet.set_value_at(0, col, descriptor.display_name())?;

            let hints = descriptor.style();
            let mut style = Style::new().border(BorderStyle::all(BorderLineStyle::Thin, Color::BLACK));
            if let Some(color) = hints.header_fill {
                style = style.fill_color(color);
            }
            if hints.center_horizontal {
                style = style.horizontal_alignment(HorizontalAlignment::Center);
            }
            if hints.center_vertical {
                style = style.vertical_alignment(VerticalAlignment::Center);
            }
            sheet.set_cell_style_at(0, col, &style)?;

            if let Some(height) = hints.row_height {
                sheet.set_row_height(0, height);
            }
            if let Some(width) = hints.column_width {
                sheet.set_column_width(col, width);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::FieldDescriptor;
    use crate::error::{ConversionError, SchemaError};
    use crate::kind::DataKind;
    use crate::value::FieldValue;
    use pretty_assertions::assert_eq;

    #[derive(Debug, Default, Clone, PartialEq)]
    struct Person {
        name: String,
        age: Option<i32>,
        address: String,
    }

    impl Record for Person {
        fn schema() -> Result<Schema, SchemaError> {
            Schema::builder()
                .field(
                    FieldDescriptor::new("name", DataKind::Text, "Name")
                        .with_header_fill(Color::GREEN)
                        .with_column_width(16.0),
                )
                .field(FieldDescriptor::new("age", DataKind::Integer, "Age").centered())
                .field(FieldDescriptor::new("address", DataKind::Text, "Address"))
                .build()
        }

        fn field(&self, name: &str) -> Option<FieldValue> {
            match name {
                "name" => Some(FieldValue::Text(self.name.clone())),
                "age" => self.age.map(FieldValue::Integer),
                "address" => Some(FieldValue::Text(self.address.clone())),
                _ => None,
            }
        }

        fn set_field(&mut self, name: &str, value: FieldValue) {
            match (name, value) {
                ("name", FieldValue::Text(v)) => self.name = v,
                ("age", FieldValue::Integer(v)) => self.age = Some(v),
                ("address", FieldValue::Text(v)) => self.address = v,
                _ => {}
            }
        }
    }

    fn person(name: &str, age: i32, address: &str) -> Person {
        Person {
            name: name.into(),
            age: Some(age),
            address: address.into(),
        }
    }

    #[test]
    fn test_header_and_data_rows() {
        let schema = Person::schema().unwrap();
        let records = vec![person("Ada", 36, "London"), person("Lin", 28, "Shanghai")];

        let mut sheet = Worksheet::new("People");
        RowWriter::write(&schema, &records, &mut sheet).unwrap();

        assert_eq!(sheet.text_at(0, 0).as_deref(), Some("Name"));
        assert_eq!(sheet.text_at(0, 1).as_deref(), Some("Age"));
        assert_eq!(sheet.text_at(0, 2).as_deref(), Some("Address"));

        assert_eq!(sheet.text_at(1, 0).as_deref(), Some("Ada"));
        assert_eq!(sheet.text_at(1, 1).as_deref(), Some("36"));
        assert_eq!(sheet.text_at(2, 2).as_deref(), Some("Shanghai"));
    }

    #[test]
    fn test_header_styling() {
        let schema = Person::schema().unwrap();
        let mut sheet = Worksheet::new("People");
        RowWriter::write(&schema, &[person("Ada", 36, "London")], &mut sheet).unwrap();

        let name_style = sheet.cell_style_at(0, 0).unwrap();
        assert_eq!(name_style.fill.color(), Some(Color::GREEN));
        assert!(!name_style.border.is_empty());

        let age_style = sheet.cell_style_at(0, 1).unwrap();
        assert_eq!(age_style.alignment.horizontal, HorizontalAlignment::Center);

        assert!((sheet.column_width(0) - 16.0).abs() < 0.001);
    }

    #[test]
    fn test_explicit_index_placement() {
        let schema = Schema::builder()
            .field(FieldDescriptor::new("name", DataKind::Text, "Name"))
            .field(FieldDescriptor::new("age", DataKind::Integer, "Age").with_column_index(5))
            .build()
            .unwrap();

        let mut sheet = Worksheet::new("People");
        RowWriter::write(&schema, &[person("Ada", 36, "-")], &mut sheet).unwrap();

        // Header stays in schema order, data obeys the pinned index
        assert_eq!(sheet.text_at(0, 1).as_deref(), Some("Age"));
        assert_eq!(sheet.text_at(1, 5).as_deref(), Some("36"));
        assert_eq!(sheet.text_at(1, 1), None);
    }

    #[test]
    fn test_absent_value_writes_empty_cell() {
        let schema = Person::schema().unwrap();
        let record = Person {
            name: "Ada".into(),
            age: None,
            address: "London".into(),
        };

        let mut sheet = Worksheet::new("People");
        RowWriter::write(&schema, &[record], &mut sheet).unwrap();

        assert_eq!(sheet.value_at(1, 1).as_str(), Some(""));
    }

    #[test]
    fn test_kind_mismatch_aborts() {
        // A record lying about its kinds is a conversion error
        #[derive(Debug, Default)]
        struct Lying;

        impl Record for Lying {
            fn schema() -> Result<Schema, SchemaError> {
                Schema::builder()
                    .field(FieldDescriptor::new("n", DataKind::Integer, "N"))
                    .build()
            }

            fn field(&self, _name: &str) -> Option<FieldValue> {
                Some(FieldValue::Text("not a number".into()))
            }

            fn set_field(&mut self, _name: &str, _value: FieldValue) {}
        }

        let schema = Lying::schema().unwrap();
        let mut sheet = Worksheet::new("S");
        let err = RowWriter::write(&schema, &[Lying], &mut sheet).unwrap_err();
        assert!(matches!(
            err,
            BindError::Conversion(ConversionError::Write { field, .. }) if field == "n"
        ));
    }
}
