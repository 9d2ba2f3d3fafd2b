pub mod cell;
pub mod error;
pub mod grid;
pub mod range;
pub mod selection;
pub mod transform;

pub use cell::{parse_cell_input, CellValue};
pub use error::SheetError;
pub use grid::{Grid, HEADER_ROW};
pub use range::{col_from_letter, col_to_label, parse_range, CellAddress, RangeIter, RangeSpec};
pub use selection::Selection;
pub use transform::{
    find_replace, remove_duplicates, transform_cell, CaseTransform, ReplaceOptions,
    DEFAULT_DEDUPE_KEY_COLUMNS,
};
