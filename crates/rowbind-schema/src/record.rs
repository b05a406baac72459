//! The record access seam

use crate::error::SchemaError;
use crate::schema::Schema;
use crate::value::FieldValue;

/// A type whose fields map to spreadsheet columns
///
/// Replaces runtime reflection with an explicit, per-type registration:
/// [`Record::schema`] declares the mapped fields in declaration order,
/// and [`Record::field`]/[`Record::set_field`] move values across the
/// seam by declared name. The mapping layer never touches concrete
/// field types.
///
/// Fields the type does not register are invisible to the mapping:
/// they are neither written nor read.
///
/// ```rust
/// use rowbind_schema::{DataKind, FieldDescriptor, FieldValue, Record, Schema, SchemaError};
///
/// #[derive(Debug, Default, PartialEq)]
/// struct City {
///     name: String,
///     population: Option<i64>,
/// }
///
/// impl Record for City {
///     fn schema() -> Result<Schema, SchemaError> {
///         Schema::builder()
///             .field(FieldDescriptor::new("name", DataKind::Text, "City"))
///             .field(FieldDescriptor::new("population", DataKind::Long, "Population"))
///             .build()
///     }
///
///     fn field(&self, name: &str) -> Option<FieldValue> {
///         match name {
///             "name" => Some(FieldValue::Text(self.name.clone())),
///             "population" => self.population.map(FieldValue::Long),
///             _ => None,
///         }
///     }
///
///     fn set_field(&mut self, name: &str, value: FieldValue) {
///         match (name, value) {
///             ("name", FieldValue::Text(v)) => self.name = v,
///             ("population", FieldValue::Long(v)) => self.population = Some(v),
///             _ => {}
///         }
///     }
/// }
/// ```
pub trait Record: Default {
    /// The ordered column schema for this record type
    ///
    /// Derived fresh on each call; two calls must yield identical
    /// descriptors in the same order.
    fn schema() -> Result<Schema, SchemaError>;

    /// Current value of a mapped field; `None` when the field is unset
    fn field(&self, name: &str) -> Option<FieldValue>;

    /// Assign a parsed value to a mapped field
    ///
    /// Called only with names and value variants matching the schema;
    /// implementations ignore anything else.
    fn set_field(&mut self, name: &str, value: FieldValue);
}
