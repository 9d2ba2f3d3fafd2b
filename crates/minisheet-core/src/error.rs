use thiserror::Error;

/// Errors raised by grid editing operations
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SheetError {
    /// A coordinate lies outside the current grid
    #[error("cell ({row}, {col}) is outside the {rows}x{cols} grid")]
    OutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    /// The header row cannot be edited as data
    #[error("the header row is read-only")]
    HeaderReadOnly,

    /// The last remaining row cannot be deleted
    #[error("cannot delete the last row")]
    LastRow,

    /// The last remaining column cannot be deleted
    #[error("cannot delete the last column")]
    LastColumn,

    /// A grid needs at least a header row with one column
    #[error("grid must have at least one row and one column")]
    EmptyGrid,

    /// A row does not have the same width as the header row
    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// No cell is selected
    #[error("no active cell")]
    NoActiveCell,

    /// An aggregate function name that is not supported
    #[error("unknown aggregate function: {0}")]
    UnknownAggregate(String),
}

impl SheetError {
    /// Stable machine-readable code for the error
    pub fn code(&self) -> &'static str {
        match self {
            SheetError::OutOfBounds { .. } => "OUT_OF_BOUNDS",
            SheetError::HeaderReadOnly => "HEADER_READ_ONLY",
            SheetError::LastRow => "LAST_ROW",
            SheetError::LastColumn => "LAST_COLUMN",
            SheetError::EmptyGrid => "EMPTY_GRID",
            SheetError::RaggedRow { .. } => "RAGGED_ROW",
            SheetError::NoActiveCell => "NO_ACTIVE_CELL",
            SheetError::UnknownAggregate(_) => "UNKNOWN_AGGREGATE",
        }
    }
}
