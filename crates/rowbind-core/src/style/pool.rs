//! Style pool for deduplication

use std::collections::HashMap;

use super::Style;

/// Style pool for deduplicating styles
///
/// Spreadsheets typically have many cells sharing the same style.
/// The style pool ensures each unique style is stored only once,
/// and cells reference styles by index. Index 0 is always the
/// default style.
#[derive(Debug)]
pub struct StylePool {
    /// All unique styles (index 0 is default)
    styles: Vec<Style>,
    /// Fast lookup for deduplication
    index_map: HashMap<Style, u32>,
}

impl StylePool {
    /// Create a new style pool with the default style at index 0
    pub fn new() -> Self {
        let mut pool = Self {
            styles: Vec::new(),
            index_map: HashMap::new(),
        };
        pool.styles.push(Style::default());
        pool.index_map.insert(Style::default(), 0);
        pool
    }

    /// Get or create a style, returning its index
    ///
    /// If an identical style already exists, returns its index.
    /// Otherwise, adds the style and returns the new index.
    pub fn get_or_insert(&mut self, style: Style) -> u32 {
        if let Some(&idx) = self.index_map.get(&style) {
            return idx;
        }
        let idx = self.styles.len() as u32;
        self.index_map.insert(style.clone(), idx);
        self.styles.push(style);
        idx
    }

    /// Get a style by index
    pub fn get(&self, index: u32) -> Option<&Style> {
        self.styles.get(index as usize)
    }

    /// Get the number of styles
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    /// Check if the pool only holds the default style
    pub fn is_empty(&self) -> bool {
        self.styles.len() <= 1
    }

    /// Iterate over all styles with their indices
    pub fn iter(&self) -> impl Iterator<Item = (u32, &Style)> {
        self.styles.iter().enumerate().map(|(i, s)| (i as u32, s))
    }
}

impl Default for StylePool {
    fn default() -> Self {
        Self::new()
    }
}
