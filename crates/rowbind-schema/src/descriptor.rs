//! Per-field column descriptors

use rowbind_core::Color;

use crate::kind::DataKind;

/// Configuration controlling how one record field maps to one column
///
/// Built fluently and registered with a
/// [`SchemaBuilder`](crate::schema::SchemaBuilder):
///
/// ```rust
/// use rowbind_schema::{DataKind, FieldDescriptor};
///
/// let age = FieldDescriptor::new("age", DataKind::Integer, "Age")
///     .with_column_index(5)
///     .with_column_width(12.0)
///     .centered();
/// assert_eq!(age.column_index(), Some(5));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDescriptor {
    /// Declared field name on the record type
    name: String,
    /// Data kind governing format/parse behavior
    kind: DataKind,
    /// Column header text
    display_name: String,
    /// Explicit column index; `None` means "match by display name"
    column_index: Option<u16>,
    /// Format pattern (date/time kinds)
    pattern: Option<String>,
    /// Header/column styling hints
    style: ColumnStyle,
}

impl FieldDescriptor {
    /// Create a descriptor mapping `name` to a column headed `display_name`
    pub fn new<N, D>(name: N, kind: DataKind, display_name: D) -> Self
    where
        N: Into<String>,
        D: Into<String>,
    {
        Self {
            name: name.into(),
            kind,
            display_name: display_name.into(),
            column_index: None,
            pattern: None,
            style: ColumnStyle::default(),
        }
    }

    /// Pin the field to an explicit column index
    ///
    /// An explicit index takes precedence over header-name matching on
    /// both the write and the read path.
    pub fn with_column_index(mut self, index: u16) -> Self {
        self.column_index = Some(index);
        self
    }

    /// Set the format pattern (strftime template for date/time kinds)
    pub fn with_pattern<S: Into<String>>(mut self, pattern: S) -> Self {
        self.pattern = Some(pattern.into());
        self
    }

    /// Fill the header cell with a color
    pub fn with_header_fill(mut self, color: Color) -> Self {
        self.style.header_fill = Some(color);
        self
    }

    /// Set the header row height in points
    pub fn with_row_height(mut self, height: f64) -> Self {
        self.style.row_height = Some(height);
        self
    }

    /// Set the column width in characters
    pub fn with_column_width(mut self, width: f64) -> Self {
        self.style.column_width = Some(width);
        self
    }

    /// Center the header cell horizontally
    pub fn centered(mut self) -> Self {
        self.style.center_horizontal = true;
        self
    }

    /// Center the header cell vertically
    pub fn centered_vertically(mut self) -> Self {
        self.style.center_vertical = true;
        self
    }

    /// Declared field name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Data kind
    pub fn kind(&self) -> DataKind {
        self.kind
    }

    /// Column header text
    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    /// Explicit column index, if pinned
    pub fn column_index(&self) -> Option<u16> {
        self.column_index
    }

    /// Format pattern, if set
    pub fn pattern(&self) -> Option<&str> {
        self.pattern.as_deref()
    }

    /// Styling hints
    pub fn style(&self) -> &ColumnStyle {
        &self.style
    }
}

/// Styling hints carried by a descriptor
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ColumnStyle {
    /// Header cell fill color
    pub header_fill: Option<Color>,
    /// Header row height in points
    pub row_height: Option<f64>,
    /// Column width in characters
    pub column_width: Option<f64>,
    /// Center the header cell horizontally
    pub center_horizontal: bool,
    /// Center the header cell vertically
    pub center_vertical: bool,
}
