use minisheet_calc::AggregateKind;
use minisheet_core::{
    col_to_label, find_replace, parse_range, remove_duplicates, transform_cell, CaseTransform,
    CellAddress, CellValue, Grid, ReplaceOptions, Selection, SheetError,
};
use serde::{Deserialize, Serialize};
use wasm_bindgen::prelude::*;

use crate::config::SheetConfig;

/// Spreadsheet session exposed to JavaScript.
///
/// Owns the grid, the active cell, the range typed by the user and the last
/// result shown next to the calculator buttons.
#[wasm_bindgen]
pub struct SheetEngine {
    grid: Grid,
    selection: Selection,
    range: String,
    result: Option<f64>,
    config: SheetConfig,
}

/// Structured error object for JavaScript
#[derive(Serialize)]
pub struct JsSheetError {
    code: String,
    message: String,
}

impl From<SheetError> for JsSheetError {
    fn from(err: SheetError) -> Self {
        Self {
            code: err.code().to_string(),
            message: err.to_string(),
        }
    }
}

impl JsSheetError {
    fn from_error<E: std::fmt::Display>(code: &str, err: E) -> JsValue {
        let error = Self {
            code: code.to_string(),
            message: err.to_string(),
        };
        serde_wasm_bindgen::to_value(&error).unwrap_or(JsValue::NULL)
    }

    fn from_config_error<E: std::fmt::Display>(err: E) -> JsValue {
        Self::from_error(INVALID_CONFIG, err)
    }

    fn from_options_error<E: std::fmt::Display>(err: E) -> JsValue {
        Self::from_error(INVALID_OPTIONS, err)
    }
}

/// Error code for a malformed `withConfig` JSON
pub const INVALID_CONFIG: &str = "INVALID_CONFIG";
/// Error code for malformed replace options JSON
pub const INVALID_OPTIONS: &str = "INVALID_OPTIONS";

/// Parse replace options sent from JavaScript
fn parse_replace_options(options_json: &str) -> Result<ReplaceOptions, serde_json::Error> {
    serde_json::from_str(options_json)
}

fn to_js_error(err: SheetError) -> JsValue {
    #[cfg(target_arch = "wasm32")]
    web_sys::console::error_1(&format!("[MiniSheet] {}", err).into());

    let js_error = JsSheetError::from(err);
    serde_wasm_bindgen::to_value(&js_error).unwrap_or(JsValue::NULL)
}

/// Cell data for JavaScript
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellData {
    pub row: usize,
    pub col: usize,
    pub display_value: String,
    pub is_number: bool,
    pub is_header: bool,
    pub is_active: bool,
}

/// Rust-side API, also used by the bindings below
impl SheetEngine {
    pub fn from_config(config: SheetConfig) -> Result<Self, SheetError> {
        Ok(Self {
            grid: config.build_grid()?,
            selection: Selection::new(),
            range: String::new(),
            result: None,
            config,
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn active_cell(&self) -> Option<CellAddress> {
        self.selection.active()
    }

    pub fn set_cell(&mut self, row: usize, col: usize, input: &str) -> Result<(), SheetError> {
        self.grid.set_input(row, col, input)?;
        Ok(())
    }

    pub fn cell_data(&self, row: usize, col: usize) -> Option<CellData> {
        let value = self.grid.get(row, col)?;
        Some(CellData {
            row,
            col,
            display_value: value.as_text(),
            is_number: matches!(value, CellValue::Number(_)),
            is_header: row == minisheet_core::HEADER_ROW,
            is_active: self.selection.active() == Some(CellAddress::new(row, col)),
        })
    }

    pub fn select(&mut self, row: usize, col: usize) -> Result<(), SheetError> {
        self.selection.select(CellAddress::new(row, col), &self.grid)
    }

    /// Run an aggregate over the current range text.
    ///
    /// When nothing can be computed the previous result stays on display.
    pub fn calculate_kind(&mut self, kind: AggregateKind) -> Option<f64> {
        let spec = parse_range(&self.range)?;
        let value = minisheet_calc::aggregate(&self.grid, &spec, kind)?;

        #[cfg(all(debug_assertions, target_arch = "wasm32"))]
        web_sys::console::log_1(&format!("[Calc] {}({}) = {}", kind, spec, value).into());

        self.result = Some(value);
        Some(value)
    }

    /// Apply a text transform to the active cell
    pub fn transform_active(&mut self, transform: CaseTransform) -> Result<bool, SheetError> {
        let addr = self.selection.require_active()?;
        transform_cell(&mut self.grid, addr, transform)
    }

    pub fn delete_last_row(&mut self) -> Result<(), SheetError> {
        self.grid.delete_row()?;
        self.selection.retain_within(&self.grid);
        Ok(())
    }

    pub fn delete_last_column(&mut self) -> Result<(), SheetError> {
        self.grid.delete_column()?;
        self.selection.retain_within(&self.grid);
        Ok(())
    }

    pub fn replace_text(&mut self, options: &ReplaceOptions) -> usize {
        find_replace(&mut self.grid, options)
    }

    pub fn dedupe_rows(&mut self) -> usize {
        let removed = remove_duplicates(&mut self.grid, self.config.dedupe_key_columns);
        self.selection.retain_within(&self.grid);
        removed
    }
}

impl Default for SheetEngine {
    fn default() -> Self {
        Self {
            grid: Grid::sample(),
            selection: Selection::new(),
            range: String::new(),
            result: None,
            config: SheetConfig::default(),
        }
    }
}

#[wasm_bindgen]
impl SheetEngine {
    /// Create a session holding the demo sheet
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session from a JSON configuration
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(config_json: &str) -> Result<SheetEngine, JsValue> {
        let config = SheetConfig::from_json(config_json).map_err(JsSheetError::from_config_error)?;
        Self::from_config(config).map_err(to_js_error)
    }

    // --- Cells ---

    /// Store user input in a cell; numeric input is stored as a number
    #[wasm_bindgen(js_name = setCellValue)]
    pub fn set_cell_value(&mut self, row: usize, col: usize, value: &str) -> Result<(), JsValue> {
        self.set_cell(row, col, value).map_err(to_js_error)
    }

    /// Get a cell's display data, or null outside the grid
    #[wasm_bindgen(js_name = getCellData)]
    pub fn get_cell_data(&self, row: usize, col: usize) -> JsValue {
        match self.cell_data(row, col) {
            Some(data) => serde_wasm_bindgen::to_value(&data).unwrap_or(JsValue::NULL),
            None => JsValue::NULL,
        }
    }

    /// All rows as display strings, header first, as JSON
    #[wasm_bindgen(js_name = getGrid)]
    pub fn get_grid(&self) -> String {
        serde_json::to_string(&self.grid.display_rows()).unwrap_or_else(|_| "[]".to_string())
    }

    #[wasm_bindgen(js_name = rowCount)]
    pub fn row_count(&self) -> usize {
        self.grid.row_count()
    }

    #[wasm_bindgen(js_name = colCount)]
    pub fn col_count(&self) -> usize {
        self.grid.col_count()
    }

    /// Column label shown above a column (A, B, ..., AA)
    #[wasm_bindgen(js_name = columnLabel)]
    pub fn column_label(col: usize) -> String {
        col_to_label(col)
    }

    // --- Rows and columns ---

    #[wasm_bindgen(js_name = addRow)]
    pub fn add_row(&mut self) {
        self.grid.add_row();
    }

    #[wasm_bindgen(js_name = addColumn)]
    pub fn add_column(&mut self) {
        self.grid.add_column();
    }

    /// Delete the last row. Returns false when only one row is left.
    #[wasm_bindgen(js_name = deleteRow)]
    pub fn delete_row(&mut self) -> bool {
        self.delete_last_row().is_ok()
    }

    /// Delete the last column. Returns false when only one column is left.
    #[wasm_bindgen(js_name = deleteColumn)]
    pub fn delete_column(&mut self) -> bool {
        self.delete_last_column().is_ok()
    }

    // --- Selection ---

    #[wasm_bindgen(js_name = selectCell)]
    pub fn select_cell(&mut self, row: usize, col: usize) -> Result<(), JsValue> {
        self.select(row, col).map_err(to_js_error)
    }

    #[wasm_bindgen(js_name = clearSelection)]
    pub fn clear_selection(&mut self) {
        self.selection.clear();
    }

    /// Active cell as `[row, col]`, or an empty array
    #[wasm_bindgen(js_name = getActiveCell)]
    pub fn get_active_cell(&self) -> Vec<u32> {
        self.selection
            .active()
            .map(|addr| vec![addr.row as u32, addr.col as u32])
            .unwrap_or_default()
    }

    // --- Calculator ---

    /// Set the range text typed by the user, e.g. "A1:C5"
    #[wasm_bindgen(js_name = setRange)]
    pub fn set_range(&mut self, range: &str) {
        self.range = range.to_string();
    }

    #[wasm_bindgen(js_name = getRange)]
    pub fn get_range(&self) -> String {
        self.range.clone()
    }

    /// Run SUM, AVERAGE, MAX, MIN or COUNT over the current range.
    /// Returns undefined when there is nothing to compute.
    #[wasm_bindgen]
    pub fn calculate(&mut self, function: &str) -> Option<f64> {
        let kind = match function.parse::<AggregateKind>() {
            Ok(kind) => kind,
            Err(_err) => {
                #[cfg(target_arch = "wasm32")]
                web_sys::console::error_1(&format!("[Calc] {}", _err).into());
                return None;
            }
        };
        self.calculate_kind(kind)
    }

    /// The last computed result
    #[wasm_bindgen]
    pub fn result(&self) -> Option<f64> {
        self.result
    }

    // --- Text transforms ---

    /// Trim the active cell. Returns whether it changed.
    #[wasm_bindgen(js_name = trimCell)]
    pub fn trim_cell(&mut self) -> bool {
        self.transform_active(CaseTransform::Trim).unwrap_or(false)
    }

    #[wasm_bindgen(js_name = upperCaseCell)]
    pub fn upper_case_cell(&mut self) -> bool {
        self.transform_active(CaseTransform::Upper).unwrap_or(false)
    }

    #[wasm_bindgen(js_name = lowerCaseCell)]
    pub fn lower_case_cell(&mut self) -> bool {
        self.transform_active(CaseTransform::Lower).unwrap_or(false)
    }

    /// Remove duplicate data rows. Returns the number removed.
    #[wasm_bindgen(js_name = removeDuplicates)]
    pub fn remove_duplicates(&mut self) -> usize {
        self.dedupe_rows()
    }

    /// Replace the first occurrence of `find` in every text cell.
    /// Returns the number of cells changed.
    #[wasm_bindgen(js_name = findAndReplace)]
    pub fn find_and_replace(&mut self, find: &str, replacement: &str) -> usize {
        let options = ReplaceOptions {
            match_case: self.config.match_case,
            ..ReplaceOptions::new(find, replacement)
        };
        self.replace_text(&options)
    }

    /// Replace text using JSON options:
    /// { "find": "a", "replacement": "b", "match_case": true, "replace_all": false }
    #[wasm_bindgen(js_name = replaceWithOptions)]
    pub fn replace_with_options(&mut self, options_json: &str) -> Result<usize, JsValue> {
        let options =
            parse_replace_options(options_json).map_err(JsSheetError::from_options_error)?;
        Ok(self.replace_text(&options))
    }
}
