use serde::{Deserialize, Serialize};

use crate::cell::{parse_cell_input, CellValue};
use crate::error::SheetError;
use crate::range::{col_to_label, CellAddress};

/// Index of the header row. It holds column labels and is never aggregated.
pub const HEADER_ROW: usize = 0;

/// A rectangular grid of cells with a header row.
///
/// Every row has the same number of cells; all mutators keep it that way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<CellValue>>", into = "Vec<Vec<CellValue>>")]
pub struct Grid {
    rows: Vec<Vec<CellValue>>,
}

impl Grid {
    /// Create a grid holding only a header row
    pub fn new<I, S>(headers: I) -> Result<Self, SheetError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let header: Vec<CellValue> = headers
            .into_iter()
            .map(|h| CellValue::Text(h.into()))
            .collect();
        Self::from_rows(vec![header])
    }

    /// Create a grid with lettered headers and `data_rows` empty rows
    pub fn blank(data_rows: usize, cols: usize) -> Result<Self, SheetError> {
        let mut grid = Self::new((0..cols).map(col_to_label))?;
        for _ in 0..data_rows {
            grid.add_row();
        }
        Ok(grid)
    }

    /// Create a grid from raw rows. The first row is the header.
    pub fn from_rows(rows: Vec<Vec<CellValue>>) -> Result<Self, SheetError> {
        let width = match rows.first() {
            Some(header) if !header.is_empty() => header.len(),
            _ => return Err(SheetError::EmptyGrid),
        };

        if let Some((row, found)) = rows
            .iter()
            .enumerate()
            .find(|(_, r)| r.len() != width)
            .map(|(i, r)| (i, r.len()))
        {
            return Err(SheetError::RaggedRow {
                row,
                expected: width,
                found,
            });
        }

        Ok(Grid { rows })
    }

    /// The demo sheet a fresh session starts with
    pub fn sample() -> Self {
        let row = |id: f64, name: &str, age: f64| {
            vec![CellValue::Number(id), CellValue::from(name), CellValue::Number(age)]
        };

        Grid {
            rows: vec![
                vec![
                    CellValue::from("ID"),
                    CellValue::from("Name"),
                    CellValue::from("Age"),
                ],
                row(1.0, "Alice", 25.0),
                row(2.0, "Bob", 30.0),
                row(3.0, "Charlie", 35.0),
            ],
        }
    }

    /// Number of rows, header included
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn col_count(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    /// Number of rows below the header
    pub fn data_row_count(&self) -> usize {
        self.rows.len().saturating_sub(1)
    }

    pub fn header(&self) -> &[CellValue] {
        &self.rows[HEADER_ROW]
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    /// Rows below the header
    pub fn data_rows(&self) -> &[Vec<CellValue>] {
        &self.rows[HEADER_ROW + 1..]
    }

    /// Get a cell, or `None` when the coordinate is outside the grid
    pub fn get(&self, row: usize, col: usize) -> Option<&CellValue> {
        self.rows.get(row)?.get(col)
    }

    pub fn get_at(&self, addr: CellAddress) -> Option<&CellValue> {
        self.get(addr.row, addr.col)
    }

    pub fn contains(&self, addr: CellAddress) -> bool {
        addr.is_valid(self.row_count(), self.col_count())
    }

    fn out_of_bounds(&self, row: usize, col: usize) -> SheetError {
        SheetError::OutOfBounds {
            row,
            col,
            rows: self.row_count(),
            cols: self.col_count(),
        }
    }

    pub(crate) fn cell_mut(&mut self, row: usize, col: usize) -> Result<&mut CellValue, SheetError> {
        let err = self.out_of_bounds(row, col);
        self.rows
            .get_mut(row)
            .and_then(|r| r.get_mut(col))
            .ok_or(err)
    }

    /// Iterate mutably over every cell below the header
    pub(crate) fn data_cells_mut(&mut self) -> impl Iterator<Item = &mut CellValue> + '_ {
        self.rows.iter_mut().skip(HEADER_ROW + 1).flatten()
    }

    pub(crate) fn retain_data_rows<F>(&mut self, mut keep: F)
    where
        F: FnMut(&[CellValue]) -> bool,
    {
        let mut index = 0;
        self.rows.retain(|row| {
            let is_header = index == HEADER_ROW;
            index += 1;
            is_header || keep(row)
        });
    }

    /// Store a value, returning the previous one. The header row may be
    /// written here so labels can be changed.
    pub fn set(&mut self, row: usize, col: usize, value: CellValue) -> Result<CellValue, SheetError> {
        let cell = self.cell_mut(row, col)?;
        Ok(std::mem::replace(cell, value))
    }

    /// Store user input in a data cell, parsing numbers
    pub fn set_input(&mut self, row: usize, col: usize, input: &str) -> Result<CellValue, SheetError> {
        if row == HEADER_ROW {
            return Err(SheetError::HeaderReadOnly);
        }
        self.set(row, col, parse_cell_input(input))
    }

    /// Append an empty row
    pub fn add_row(&mut self) {
        let width = self.col_count();
        self.rows.push(vec![CellValue::Empty; width]);
        tracing::debug!(rows = self.row_count(), "added row");
    }

    /// Append an empty column
    pub fn add_column(&mut self) {
        for row in &mut self.rows {
            row.push(CellValue::Empty);
        }
        tracing::debug!(cols = self.col_count(), "added column");
    }

    /// Remove the last row. The grid always keeps at least one row.
    pub fn delete_row(&mut self) -> Result<Vec<CellValue>, SheetError> {
        if self.rows.len() <= 1 {
            tracing::warn!("refusing to delete the last row");
            return Err(SheetError::LastRow);
        }
        let removed = self.rows.pop().ok_or(SheetError::LastRow)?;
        tracing::debug!(rows = self.row_count(), "deleted row");
        Ok(removed)
    }

    /// Remove the last column. The grid always keeps at least one column.
    pub fn delete_column(&mut self) -> Result<(), SheetError> {
        if self.col_count() <= 1 {
            tracing::warn!("refusing to delete the last column");
            return Err(SheetError::LastColumn);
        }
        for row in &mut self.rows {
            row.pop();
        }
        tracing::debug!(cols = self.col_count(), "deleted column");
        Ok(())
    }

    /// Display strings for every row, header included
    pub fn display_rows(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|row| row.iter().map(CellValue::as_text).collect())
            .collect()
    }

    /// Serialize the grid to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Deserialize a grid from JSON, validating its shape
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

impl Default for Grid {
    fn default() -> Self {
        Self::sample()
    }
}

impl TryFrom<Vec<Vec<CellValue>>> for Grid {
    type Error = SheetError;

    fn try_from(rows: Vec<Vec<CellValue>>) -> Result<Self, Self::Error> {
        Grid::from_rows(rows)
    }
}

impl From<Grid> for Vec<Vec<CellValue>> {
    fn from(grid: Grid) -> Self {
        grid.rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_rectangular(grid: &Grid) {
        let width = grid.col_count();
        assert!(grid.rows().iter().all(|r| r.len() == width));
    }

    #[test]
    fn test_sample_grid() {
        let grid = Grid::sample();
        assert_eq!(grid.row_count(), 4);
        assert_eq!(grid.col_count(), 3);
        assert_eq!(grid.data_row_count(), 3);
        assert_eq!(grid.get(0, 1), Some(&CellValue::from("Name")));
        assert_eq!(grid.get(2, 2), Some(&CellValue::Number(30.0)));
        assert_eq!(grid.get(4, 0), None);
        assert_eq!(grid.get(0, 3), None);
    }

    #[test]
    fn test_from_rows_validation() {
        assert_eq!(Grid::from_rows(vec![]), Err(SheetError::EmptyGrid));
        assert_eq!(Grid::from_rows(vec![vec![]]), Err(SheetError::EmptyGrid));

        let ragged = vec![
            vec![CellValue::from("A"), CellValue::from("B")],
            vec![CellValue::Number(1.0)],
        ];
        assert_eq!(
            Grid::from_rows(ragged),
            Err(SheetError::RaggedRow {
                row: 1,
                expected: 2,
                found: 1
            })
        );
    }

    #[test]
    fn test_blank_grid_has_letter_headers() {
        let grid = Grid::blank(2, 3).unwrap();
        assert_eq!(grid.row_count(), 3);
        assert_eq!(grid.header()[2], CellValue::from("C"));
        assert_eq!(grid.get(2, 2), Some(&CellValue::Empty));
        assert_eq!(Grid::blank(2, 0), Err(SheetError::EmptyGrid));
    }

    #[test]
    fn test_set_input() {
        let mut grid = Grid::sample();

        let old = grid.set_input(1, 2, "26").unwrap();
        assert_eq!(old, CellValue::Number(25.0));
        assert_eq!(grid.get(1, 2), Some(&CellValue::Number(26.0)));

        grid.set_input(1, 1, "Alicia").unwrap();
        assert_eq!(grid.get(1, 1), Some(&CellValue::from("Alicia")));

        grid.set_input(1, 1, "").unwrap();
        assert_eq!(grid.get(1, 1), Some(&CellValue::Empty));

        assert_eq!(grid.set_input(0, 0, "x"), Err(SheetError::HeaderReadOnly));
        assert!(matches!(
            grid.set_input(9, 0, "x"),
            Err(SheetError::OutOfBounds { row: 9, .. })
        ));
    }

    #[test]
    fn test_add_and_delete_rows() {
        let mut grid = Grid::sample();
        grid.add_row();
        assert_eq!(grid.row_count(), 5);
        assert_eq!(grid.rows()[4], vec![CellValue::Empty; 3]);
        assert_rectangular(&grid);

        for _ in 0..4 {
            grid.delete_row().unwrap();
        }
        assert_eq!(grid.row_count(), 1);
        assert_eq!(grid.delete_row(), Err(SheetError::LastRow));
        assert_eq!(grid.row_count(), 1);
    }

    #[test]
    fn test_add_and_delete_columns() {
        let mut grid = Grid::sample();
        grid.add_column();
        assert_eq!(grid.col_count(), 4);
        assert_rectangular(&grid);
        assert_eq!(grid.get(3, 3), Some(&CellValue::Empty));

        for _ in 0..3 {
            grid.delete_column().unwrap();
        }
        assert_eq!(grid.col_count(), 1);
        assert_rectangular(&grid);
        assert_eq!(grid.delete_column(), Err(SheetError::LastColumn));
        assert_eq!(grid.col_count(), 1);
    }

    #[test]
    fn test_display_rows() {
        let grid = Grid::sample();
        let rows = grid.display_rows();
        assert_eq!(rows[0], vec!["ID", "Name", "Age"]);
        assert_eq!(rows[3], vec!["3", "Charlie", "35"]);
    }

    #[test]
    fn test_json_round_trip_validates_shape() {
        let grid = Grid::sample();
        let json = grid.to_json().unwrap();
        assert_eq!(Grid::from_json(&json).unwrap(), grid);

        let ragged = r#"[[{"type":"Text","value":"A"}],[]]"#;
        assert!(Grid::from_json(ragged).is_err());
    }
}
