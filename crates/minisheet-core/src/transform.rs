//! Text transforms applied to cells: trimming, case changes, duplicate row
//! removal and find/replace.
//!
//! Transforms only touch `Text` cells. Numbers and empty cells are left
//! alone, so a transform can never turn a number into text.

use serde::{Deserialize, Serialize};

use crate::cell::CellValue;
use crate::error::SheetError;
use crate::grid::Grid;
use crate::range::CellAddress;

/// Number of leading columns compared when removing duplicate rows
pub const DEFAULT_DEDUPE_KEY_COLUMNS: usize = 2;

/// A single-cell text transform
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseTransform {
    Trim,
    Upper,
    Lower,
}

impl CaseTransform {
    fn apply(self, text: &str) -> String {
        match self {
            CaseTransform::Trim => text.trim().to_string(),
            CaseTransform::Upper => text.to_uppercase(),
            CaseTransform::Lower => text.to_lowercase(),
        }
    }
}

/// Apply a transform to one cell. Returns whether the cell changed.
pub fn transform_cell(
    grid: &mut Grid,
    addr: CellAddress,
    transform: CaseTransform,
) -> Result<bool, SheetError> {
    let cell = grid.cell_mut(addr.row, addr.col)?;

    let CellValue::Text(text) = cell else {
        return Ok(false);
    };

    let updated = transform.apply(text);
    if updated == *text {
        return Ok(false);
    }

    *text = updated;
    tracing::debug!(cell = %addr, ?transform, "transformed cell");
    Ok(true)
}

/// Remove data rows whose first `key_columns` cells repeat an earlier row.
/// A `key_columns` of zero compares whole rows. The header row is always
/// kept. Returns the number of rows removed.
pub fn remove_duplicates(grid: &mut Grid, key_columns: usize) -> usize {
    let before = grid.row_count();
    let mut seen: Vec<Vec<CellValue>> = Vec::new();

    grid.retain_data_rows(|row| {
        let width = match key_columns {
            0 => row.len(),
            n => n.min(row.len()),
        };
        let key = &row[..width];
        if seen.iter().any(|k| k.as_slice() == key) {
            false
        } else {
            seen.push(key.to_vec());
            true
        }
    });

    let removed = before - grid.row_count();
    tracing::debug!(removed, key_columns, "removed duplicate rows");
    removed
}

/// Options for replacing text in cells
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplaceOptions {
    /// The literal text to look for
    pub find: String,
    /// Replacement text
    pub replacement: String,
    /// Whether to match case-sensitively
    #[serde(default = "default_true")]
    pub match_case: bool,
    /// Replace every occurrence in a cell rather than the first one
    #[serde(default)]
    pub replace_all: bool,
}

fn default_true() -> bool {
    true
}

impl ReplaceOptions {
    pub fn new(find: impl Into<String>, replacement: impl Into<String>) -> Self {
        ReplaceOptions {
            find: find.into(),
            replacement: replacement.into(),
            match_case: true,
            replace_all: false,
        }
    }

    /// Byte ranges in `text` that match the query
    fn match_ranges(&self, text: &str) -> Vec<(usize, usize)> {
        let len = self.find.len();
        let starts: Vec<usize> = if self.match_case {
            text.match_indices(&self.find).map(|(i, _)| i).collect()
        } else {
            // Lowercasing can change byte lengths outside ASCII, so only
            // fold ASCII to keep offsets aligned with the original text
            let lower_text = text.to_ascii_lowercase();
            let lower_find = self.find.to_ascii_lowercase();
            lower_text.match_indices(&lower_find).map(|(i, _)| i).collect()
        };

        let mut ranges: Vec<(usize, usize)> = starts.into_iter().map(|i| (i, i + len)).collect();
        if !self.replace_all {
            ranges.truncate(1);
        }
        ranges
    }

    fn apply(&self, text: &str) -> Option<String> {
        let ranges = self.match_ranges(text);
        if ranges.is_empty() {
            return None;
        }

        let mut result = String::with_capacity(text.len());
        let mut last_end = 0;
        for (start, end) in ranges {
            result.push_str(&text[last_end..start]);
            result.push_str(&self.replacement);
            last_end = end;
        }
        result.push_str(&text[last_end..]);
        Some(result)
    }
}

/// Replace text in every data cell that contains the query.
/// Returns the number of cells changed.
pub fn find_replace(grid: &mut Grid, options: &ReplaceOptions) -> usize {
    if options.find.is_empty() {
        return 0;
    }

    let mut changed = 0;
    for cell in grid.data_cells_mut() {
        if let CellValue::Text(text) = cell {
            if let Some(updated) = options.apply(text) {
                *text = updated;
                changed += 1;
            }
        }
    }

    tracing::debug!(find = %options.find, changed, "find and replace");
    changed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> CellValue {
        CellValue::from(s)
    }

    #[test]
    fn test_trim_upper_lower() {
        let mut grid = Grid::sample();
        grid.set(1, 1, text("  Alice  ")).unwrap();
        let addr = CellAddress::new(1, 1);

        assert!(transform_cell(&mut grid, addr, CaseTransform::Trim).unwrap());
        assert_eq!(grid.get(1, 1), Some(&text("Alice")));
        assert!(!transform_cell(&mut grid, addr, CaseTransform::Trim).unwrap());

        assert!(transform_cell(&mut grid, addr, CaseTransform::Upper).unwrap());
        assert_eq!(grid.get(1, 1), Some(&text("ALICE")));

        assert!(transform_cell(&mut grid, addr, CaseTransform::Lower).unwrap());
        assert_eq!(grid.get(1, 1), Some(&text("alice")));
    }

    #[test]
    fn test_transform_skips_numbers_and_empty() {
        let mut grid = Grid::sample();
        grid.add_row();

        assert!(!transform_cell(&mut grid, CellAddress::new(1, 0), CaseTransform::Upper).unwrap());
        assert_eq!(grid.get(1, 0), Some(&CellValue::Number(1.0)));

        assert!(!transform_cell(&mut grid, CellAddress::new(4, 0), CaseTransform::Trim).unwrap());
        assert_eq!(grid.get(4, 0), Some(&CellValue::Empty));

        assert!(transform_cell(&mut grid, CellAddress::new(9, 0), CaseTransform::Trim).is_err());
    }

    #[test]
    fn test_remove_duplicates_by_key_columns() {
        let mut grid = Grid::sample();
        grid.add_row();
        grid.set(4, 0, CellValue::Number(1.0)).unwrap();
        grid.set(4, 1, text("Alice")).unwrap();
        grid.set(4, 2, CellValue::Number(99.0)).unwrap();

        assert_eq!(remove_duplicates(&mut grid, DEFAULT_DEDUPE_KEY_COLUMNS), 1);
        assert_eq!(grid.row_count(), 4);
        assert_eq!(grid.get(1, 2), Some(&CellValue::Number(25.0)));
        assert_eq!(grid.header()[0], text("ID"));
    }

    #[test]
    fn test_remove_duplicates_keeps_header() {
        let mut grid = Grid::new(["Name"]).unwrap();
        grid.add_row();
        grid.set(1, 0, text("Name")).unwrap();

        assert_eq!(remove_duplicates(&mut grid, 1), 0);
        assert_eq!(grid.row_count(), 2);
    }

    #[test]
    fn test_remove_duplicates_whole_row() {
        let mut grid = Grid::sample();
        grid.add_row();
        grid.set(4, 0, CellValue::Number(1.0)).unwrap();
        grid.set(4, 1, text("Alice")).unwrap();

        assert_eq!(remove_duplicates(&mut grid, 0), 0);
        grid.set(4, 2, CellValue::Number(25.0)).unwrap();
        assert_eq!(remove_duplicates(&mut grid, 0), 1);
    }

    #[test]
    fn test_remove_duplicates_empty_rows() {
        let mut grid = Grid::sample();
        grid.add_row();
        grid.add_row();

        assert_eq!(remove_duplicates(&mut grid, DEFAULT_DEDUPE_KEY_COLUMNS), 1);
        assert_eq!(grid.row_count(), 5);
    }

    #[test]
    fn test_find_replace_first_occurrence() {
        let mut grid = Grid::sample();
        grid.set(2, 1, text("Bob Bob")).unwrap();

        let changed = find_replace(&mut grid, &ReplaceOptions::new("Bob", "Rob"));
        assert_eq!(changed, 1);
        assert_eq!(grid.get(2, 1), Some(&text("Rob Bob")));
        assert_eq!(grid.get(1, 1), Some(&text("Alice")));
    }

    #[test]
    fn test_find_replace_all_and_case() {
        let mut grid = Grid::sample();
        grid.set(2, 1, text("bob BOB")).unwrap();

        let options = ReplaceOptions {
            match_case: false,
            replace_all: true,
            ..ReplaceOptions::new("Bob", "Rob")
        };
        assert_eq!(find_replace(&mut grid, &options), 1);
        assert_eq!(grid.get(2, 1), Some(&text("Rob Rob")));
    }

    #[test]
    fn test_find_replace_leaves_header_and_numbers() {
        let mut grid = Grid::sample();
        assert_eq!(find_replace(&mut grid, &ReplaceOptions::new("Name", "Who")), 0);
        assert_eq!(grid.header()[1], text("Name"));

        assert_eq!(find_replace(&mut grid, &ReplaceOptions::new("2", "3")), 0);
        assert_eq!(grid.get(2, 0), Some(&CellValue::Number(2.0)));

        assert_eq!(find_replace(&mut grid, &ReplaceOptions::new("", "x")), 0);
    }
}
