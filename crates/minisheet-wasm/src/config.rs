use minisheet_core::{Grid, SheetError, DEFAULT_DEDUPE_KEY_COLUMNS};
use serde::{Deserialize, Serialize};

/// Sheet configuration passed from JavaScript as JSON.
///
/// Every field is optional:
/// {
///   "headers": ["Item", "Qty"],   // start from these column labels
///   "rows": 3,                    // data rows of a fresh sheet
///   "cols": 3,                    // columns when no headers are given
///   "sample": true,               // demo sheet when no size or headers are given
///   "dedupe_key_columns": 2,
///   "match_case": true
/// }
///
/// `headers`, `rows` or `cols` each ask for a fresh sheet and take
/// precedence over `sample`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetConfig {
    pub headers: Option<Vec<String>>,
    pub rows: Option<usize>,
    pub cols: Option<usize>,
    pub sample: bool,
    pub dedupe_key_columns: usize,
    pub match_case: bool,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            headers: None,
            rows: None,
            cols: None,
            sample: true,
            dedupe_key_columns: DEFAULT_DEDUPE_KEY_COLUMNS,
            match_case: true,
        }
    }
}

/// Size of a fresh sheet when only part of it is configured
pub const DEFAULT_SHEET_SIZE: usize = 3;

impl SheetConfig {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Build the initial grid described by this configuration
    pub fn build_grid(&self) -> Result<Grid, SheetError> {
        let rows = self.rows.unwrap_or(DEFAULT_SHEET_SIZE);
        let cols = self.cols.unwrap_or(DEFAULT_SHEET_SIZE);

        if let Some(headers) = &self.headers {
            let mut grid = Grid::new(headers.iter().cloned())?;
            for _ in 0..rows {
                grid.add_row();
            }
            return Ok(grid);
        }

        let sized = self.rows.is_some() || self.cols.is_some();
        if self.sample && !sized {
            Ok(Grid::sample())
        } else {
            Grid::blank(rows, cols)
        }
    }
}
