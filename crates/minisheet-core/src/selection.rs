use serde::{Deserialize, Serialize};

use crate::error::SheetError;
use crate::grid::{Grid, HEADER_ROW};
use crate::range::CellAddress;

/// The single active cell of a sheet
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    active: Option<CellAddress>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<CellAddress> {
        self.active
    }

    /// The active cell, or an error when nothing is selected
    pub fn require_active(&self) -> Result<CellAddress, SheetError> {
        self.active.ok_or(SheetError::NoActiveCell)
    }

    /// Make `addr` the active cell. It must be a data cell inside the grid.
    pub fn select(&mut self, addr: CellAddress, grid: &Grid) -> Result<(), SheetError> {
        if addr.row == HEADER_ROW {
            return Err(SheetError::HeaderReadOnly);
        }
        if !grid.contains(addr) {
            return Err(SheetError::OutOfBounds {
                row: addr.row,
                col: addr.col,
                rows: grid.row_count(),
                cols: grid.col_count(),
            });
        }
        self.active = Some(addr);
        Ok(())
    }

    pub fn clear(&mut self) {
        self.active = None;
    }

    /// Drop the active cell if the grid no longer contains it
    pub fn retain_within(&mut self, grid: &Grid) {
        if self.active.is_some_and(|addr| !grid.contains(addr)) {
            tracing::debug!("active cell fell outside the grid, clearing selection");
            self.active = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_select_and_clear() {
        let grid = Grid::sample();
        let mut selection = Selection::new();
        assert_eq!(selection.require_active(), Err(SheetError::NoActiveCell));

        selection.select(CellAddress::new(2, 1), &grid).unwrap();
        assert_eq!(selection.active(), Some(CellAddress::new(2, 1)));

        assert!(selection.select(CellAddress::new(2, 3), &grid).is_err());
        assert_eq!(selection.active(), Some(CellAddress::new(2, 1)));

        selection.clear();
        assert_eq!(selection.active(), None);
    }

    #[test]
    fn test_header_row_cannot_be_selected() {
        let grid = Grid::sample();
        let mut selection = Selection::new();
        selection.select(CellAddress::new(1, 1), &grid).unwrap();

        assert_eq!(
            selection.select(CellAddress::new(0, 1), &grid),
            Err(SheetError::HeaderReadOnly)
        );
        assert_eq!(selection.active(), Some(CellAddress::new(1, 1)));
    }

    #[test]
    fn test_retain_within_shrunk_grid() {
        let mut grid = Grid::sample();
        let mut selection = Selection::new();
        selection.select(CellAddress::new(3, 2), &grid).unwrap();

        grid.delete_column().unwrap();
        selection.retain_within(&grid);
        assert_eq!(selection.active(), None);

        selection.select(CellAddress::new(1, 0), &grid).unwrap();
        grid.delete_row().unwrap();
        selection.retain_within(&grid);
        assert_eq!(selection.active(), Some(CellAddress::new(1, 0)));
    }
}
