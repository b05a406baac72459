//! Worksheet type

use std::collections::BTreeMap;

use crate::cell::{CellData, CellValue};
use crate::error::{Error, Result};
use crate::style::{Style, StylePool};
use crate::{MAX_COLS, MAX_ROWS};

/// A worksheet (single sheet in a workbook)
///
/// Cells are stored sparsely, keyed by (row, column); iteration is
/// row-major. Row 0 is the header row by the mapping layer's convention.
#[derive(Debug)]
pub struct Worksheet {
    /// Sheet name
    name: String,
    /// Sparse cell storage
    cells: BTreeMap<(u32, u16), CellData>,
    /// Deduplicated cell styles
    styles: StylePool,
    /// Custom row heights in points
    row_heights: BTreeMap<u32, f64>,
    /// Custom column widths in characters
    col_widths: BTreeMap<u16, f64>,
}

impl Worksheet {
    /// Create a new worksheet with the given name
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            cells: BTreeMap::new(),
            styles: StylePool::new(),
            row_heights: BTreeMap::new(),
            col_widths: BTreeMap::new(),
        }
    }

    /// Get the sheet name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Set the sheet name
    pub fn set_name<S: Into<String>>(&mut self, name: S) {
        self.name = name.into();
    }

    // === Cell access ===

    /// Get a cell by row and column indices
    pub fn cell_at(&self, row: u32, col: u16) -> Option<&CellData> {
        self.cells.get(&(row, col))
    }

    /// Get a cell's value by indices ([`CellValue::Empty`] when absent)
    pub fn value_at(&self, row: u32, col: u16) -> CellValue {
        self.cells
            .get(&(row, col))
            .map(|c| c.value.clone())
            .unwrap_or(CellValue::Empty)
    }

    /// Canonical cell text at a position
    ///
    /// Returns `None` for missing or empty cells, the rendered text
    /// otherwise (numbers via `Display`, booleans as `true`/`false`).
    pub fn text_at(&self, row: u32, col: u16) -> Option<String> {
        match self.cells.get(&(row, col)) {
            Some(cell) if !cell.value.is_empty() => Some(cell.value.to_text()),
            _ => None,
        }
    }

    // === Cell modification ===

    /// Set a cell value by row and column indices
    pub fn set_value_at<V: Into<CellValue>>(&mut self, row: u32, col: u16, value: V) -> Result<()> {
        self.validate_cell_position(row, col)?;
        let value = value.into();
        match self.cells.get_mut(&(row, col)) {
            Some(cell) => cell.value = value,
            None => {
                self.cells.insert((row, col), CellData::new(value));
            }
        }
        Ok(())
    }

    /// Set a cell style by row and column indices
    ///
    /// Creates a style-only cell if the position is empty.
    pub fn set_cell_style_at(&mut self, row: u32, col: u16, style: &Style) -> Result<()> {
        self.validate_cell_position(row, col)?;
        let style_index = self.styles.get_or_insert(style.clone());
        self.cells
            .entry((row, col))
            .or_insert_with(|| CellData::new(CellValue::Empty))
            .style_index = style_index;
        Ok(())
    }

    /// Assign a pooled style index directly (container readers)
    pub fn set_style_index_at(&mut self, row: u32, col: u16, style_index: u32) -> Result<()> {
        self.validate_cell_position(row, col)?;
        self.cells
            .entry((row, col))
            .or_insert_with(|| CellData::new(CellValue::Empty))
            .style_index = style_index;
        Ok(())
    }

    /// Clear a cell by indices
    pub fn clear_cell_at(&mut self, row: u32, col: u16) {
        self.cells.remove(&(row, col));
    }

    // === Styles ===

    /// Get a style by its index in this worksheet's style pool
    pub fn style_by_index(&self, style_index: u32) -> Option<&Style> {
        self.styles.get(style_index)
    }

    /// Get the non-default style applied to a cell, if any
    pub fn cell_style_at(&self, row: u32, col: u16) -> Option<&Style> {
        let idx = self.cells.get(&(row, col)).map(|c| c.style_index)?;
        if idx == 0 {
            None
        } else {
            self.styles.get(idx)
        }
    }

    /// The worksheet's style pool
    pub fn style_pool(&self) -> &StylePool {
        &self.styles
    }

    /// Mutable access to the style pool (container readers)
    pub fn style_pool_mut(&mut self) -> &mut StylePool {
        &mut self.styles
    }

    // === Row/column dimensions ===

    /// Get row height in points
    pub fn row_height(&self, row: u32) -> f64 {
        self.row_heights.get(&row).copied().unwrap_or(15.0)
    }

    /// Set row height in points
    pub fn set_row_height(&mut self, row: u32, height: f64) {
        self.row_heights.insert(row, height);
    }

    /// Get column width in characters
    pub fn column_width(&self, col: u16) -> f64 {
        self.col_widths.get(&col).copied().unwrap_or(8.43)
    }

    /// Set column width in characters
    pub fn set_column_width(&mut self, col: u16, width: f64) {
        self.col_widths.insert(col, width);
    }

    /// All custom row heights (row index → height in points)
    pub fn custom_row_heights(&self) -> &BTreeMap<u32, f64> {
        &self.row_heights
    }

    /// All custom column widths (column index → width in characters)
    pub fn custom_column_widths(&self) -> &BTreeMap<u16, f64> {
        &self.col_widths
    }

    // === Iteration ===

    /// Bounds of all cells: (min_row, min_col, max_row, max_col)
    pub fn used_range(&self) -> Option<(u32, u16, u32, u16)> {
        let mut bounds: Option<(u32, u16, u32, u16)> = None;
        for &(row, col) in self.cells.keys() {
            bounds = Some(match bounds {
                None => (row, col, row, col),
                Some((min_r, min_c, max_r, max_c)) => (
                    min_r.min(row),
                    min_c.min(col),
                    max_r.max(row),
                    max_c.max(col),
                ),
            });
        }
        bounds
    }

    /// Iterate over all cells in row-major order
    pub fn iter_cells(&self) -> impl Iterator<Item = (u32, u16, &CellData)> {
        self.cells.iter().map(|(&(row, col), cell)| (row, col, cell))
    }

    /// Iterate over non-empty rows: (row index, cells as (col, data))
    pub fn rows(&self) -> impl Iterator<Item = (u32, Vec<(u16, &CellData)>)> {
        let mut rows: Vec<(u32, Vec<(u16, &CellData)>)> = Vec::new();
        for (&(row, col), cell) in &self.cells {
            match rows.last_mut() {
                Some((r, cells)) if *r == row => cells.push((col, cell)),
                _ => rows.push((row, vec![(col, cell)])),
            }
        }
        rows.into_iter()
    }

    /// Get the number of cells
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Check if the worksheet has no cells
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Validate cell position
    fn validate_cell_position(&self, row: u32, col: u16) -> Result<()> {
        if row >= MAX_ROWS {
            return Err(Error::RowOutOfBounds(row, MAX_ROWS - 1));
        }
        if col >= MAX_COLS {
            return Err(Error::ColumnOutOfBounds(col, MAX_COLS - 1));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::Color;

    #[test]
    fn test_new_worksheet() {
        let ws = Worksheet::new("Test");
        assert_eq!(ws.name(), "Test");
        assert!(ws.is_empty());
    }

    #[test]
    fn test_set_cell_values() {
        let mut ws = Worksheet::new("Test");

        ws.set_value_at(0, 0, "Hello").unwrap();
        ws.set_value_at(0, 1, 42.0).unwrap();
        ws.set_value_at(0, 2, true).unwrap();

        assert_eq!(ws.value_at(0, 0).as_str(), Some("Hello"));
        assert_eq!(ws.value_at(0, 1).as_number(), Some(42.0));
        assert_eq!(ws.value_at(0, 2).as_bool(), Some(true));
        assert_eq!(ws.value_at(5, 5), CellValue::Empty);
    }

    #[test]
    fn test_text_at() {
        let mut ws = Worksheet::new("Test");
        ws.set_value_at(1, 0, "abc").unwrap();
        ws.set_value_at(1, 1, 12.0).unwrap();

        assert_eq!(ws.text_at(1, 0).as_deref(), Some("abc"));
        assert_eq!(ws.text_at(1, 1).as_deref(), Some("12"));
        assert_eq!(ws.text_at(1, 2), None);
    }

    #[test]
    fn test_out_of_bounds() {
        let mut ws = Worksheet::new("Test");
        assert!(ws.set_value_at(MAX_ROWS, 0, "x").is_err());
    }

    #[test]
    fn test_cell_style() {
        let mut ws = Worksheet::new("Test");
        ws.set_value_at(0, 0, "header").unwrap();

        let style = Style::new().fill_color(Color::GREEN);
        ws.set_cell_style_at(0, 0, &style).unwrap();

        assert_eq!(ws.cell_style_at(0, 0), Some(&style));
        assert_eq!(ws.cell_style_at(0, 1), None);
    }

    #[test]
    fn test_used_range() {
        let mut ws = Worksheet::new("Test");
        assert!(ws.used_range().is_none());

        ws.set_value_at(5, 3, "A").unwrap();
        ws.set_value_at(10, 7, "B").unwrap();

        assert_eq!(ws.used_range(), Some((5, 3, 10, 7)));
    }

    #[test]
    fn test_rows_grouping() {
        let mut ws = Worksheet::new("Test");
        ws.set_value_at(0, 0, "a").unwrap();
        ws.set_value_at(0, 2, "b").unwrap();
        ws.set_value_at(3, 1, "c").unwrap();

        let rows: Vec<_> = ws.rows().collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].0, 0);
        assert_eq!(rows[0].1.len(), 2);
        assert_eq!(rows[1].0, 3);
        assert_eq!(rows[1].1[0].0, 1);
    }

    #[test]
    fn test_row_column_dimensions() {
        let mut ws = Worksheet::new("Test");

        assert!((ws.row_height(0) - 15.0).abs() < 0.001);
        assert!((ws.column_width(0) - 8.43).abs() < 0.001);

        ws.set_row_height(5, 30.0);
        ws.set_column_width(3, 20.0);

        assert!((ws.row_height(5) - 30.0).abs() < 0.001);
        assert!((ws.column_width(3) - 20.0).abs() < 0.001);
    }
}
