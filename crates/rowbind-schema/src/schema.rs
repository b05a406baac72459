//! Ordered field schemas

use std::collections::{HashMap, HashSet};

use rowbind_core::MAX_COLS;

use crate::descriptor::FieldDescriptor;
use crate::error::SchemaError;

/// The ordered set of descriptors for a record type
///
/// Immutable once built; validation happens in
/// [`SchemaBuilder::build`]. Field order is registration order, which
/// record types keep equal to their declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    fields: Vec<FieldDescriptor>,
}

impl Schema {
    /// Start building a schema
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::new()
    }

    /// The descriptors in schema order
    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    /// Number of mapped fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// A schema is never empty once built
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Look up a descriptor by declared field name
    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|d| d.name() == name)
    }

    /// The column a field occupies on the data rows
    ///
    /// The explicit index wins; otherwise the field's position in
    /// schema order.
    pub fn data_column(&self, position: usize) -> u16 {
        self.fields[position]
            .column_index()
            .unwrap_or(position as u16)
    }
}

/// Builder registering descriptors in declaration order
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    fields: Vec<FieldDescriptor>,
}

impl SchemaBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the next field descriptor
    pub fn field(mut self, descriptor: FieldDescriptor) -> Self {
        self.fields.push(descriptor);
        self
    }

    /// Validate and freeze the schema
    ///
    /// Fails with [`SchemaError`] on an empty schema, duplicate field
    /// names, or duplicate/out-of-range explicit column indices.
    pub fn build(self) -> Result<Schema, SchemaError> {
        if self.fields.is_empty() {
            return Err(SchemaError::Empty);
        }

        let mut names: HashSet<&str> = HashSet::new();
        let mut indices: HashMap<u16, &str> = HashMap::new();

        for descriptor in &self.fields {
            if !names.insert(descriptor.name()) {
                return Err(SchemaError::DuplicateField(descriptor.name().to_string()));
            }

            if let Some(index) = descriptor.column_index() {
                if index >= MAX_COLS {
                    return Err(SchemaError::ColumnIndexOutOfRange {
                        field: descriptor.name().to_string(),
                        index,
                        max: MAX_COLS - 1,
                    });
                }
                if let Some(first) = indices.insert(index, descriptor.name()) {
                    return Err(SchemaError::DuplicateColumnIndex {
                        index,
                        first: first.to_string(),
                        second: descriptor.name().to_string(),
                    });
                }
            }
        }

        Ok(Schema {
            fields: self.fields,
        })
    }
}
