use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::OnceLock;

/// Matches `<letter><digits>:<letter><digits>` anywhere in the input.
const RANGE_PATTERN: &str = r"([A-Z])([0-9]+):([A-Z])([0-9]+)";

fn range_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(RANGE_PATTERN).expect("range pattern is a valid regex"))
}

/// Cell address (0-indexed)
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub struct CellAddress {
    pub row: usize,
    pub col: usize,
}

impl CellAddress {
    pub const fn new(row: usize, col: usize) -> Self {
        CellAddress { row, col }
    }

    /// Check if this address is within bounds
    pub fn is_valid(&self, rows: usize, cols: usize) -> bool {
        self.row < rows && self.col < cols
    }
}

impl fmt::Display for CellAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", col_to_label(self.col), self.row)
    }
}

/// Convert column index (0-indexed) to label (A, B, ..., Z, AA, AB, ...)
pub fn col_to_label(col: usize) -> String {
    let mut label = String::new();
    let mut n = col as u128 + 1;

    while n > 0 {
        n -= 1;
        label.insert(0, char::from(b'A' + (n % 26) as u8));
        n /= 26;
    }

    label
}

/// Convert a single column letter (A-Z) to its 0-indexed column
pub fn col_from_letter(letter: char) -> Option<usize> {
    if letter.is_ascii_uppercase() {
        Some(letter as usize - 'A' as usize)
    } else {
        None
    }
}

/// An inclusive rectangular region of the grid.
///
/// Start and end are normalized on construction, so `start_row <= end_row`
/// and `start_col <= end_col` always hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RangeSpec {
    pub start_row: usize,
    pub end_row: usize,
    pub start_col: usize,
    pub end_col: usize,
}

impl RangeSpec {
    pub fn new(start_row: usize, end_row: usize, start_col: usize, end_col: usize) -> Self {
        RangeSpec {
            start_row: start_row.min(end_row),
            end_row: start_row.max(end_row),
            start_col: start_col.min(end_col),
            end_col: start_col.max(end_col),
        }
    }

    /// Build a range spanning two corner addresses
    pub fn from_corners(a: CellAddress, b: CellAddress) -> Self {
        RangeSpec::new(a.row, b.row, a.col, b.col)
    }

    pub fn start(&self) -> CellAddress {
        CellAddress::new(self.start_row, self.start_col)
    }

    pub fn end(&self) -> CellAddress {
        CellAddress::new(self.end_row, self.end_col)
    }

    /// Check if an address is within this range
    pub fn contains(&self, addr: CellAddress) -> bool {
        addr.row >= self.start_row
            && addr.row <= self.end_row
            && addr.col >= self.start_col
            && addr.col <= self.end_col
    }

    pub fn row_count(&self) -> usize {
        (self.end_row - self.start_row).saturating_add(1)
    }

    pub fn col_count(&self) -> usize {
        (self.end_col - self.start_col).saturating_add(1)
    }

    pub fn cell_count(&self) -> usize {
        self.row_count().saturating_mul(self.col_count())
    }

    /// Intersect with a `rows` x `cols` grid.
    /// Returns `None` when the range lies entirely outside it.
    pub fn clamp_to(&self, rows: usize, cols: usize) -> Option<Self> {
        if rows == 0 || cols == 0 || self.start_row >= rows || self.start_col >= cols {
            return None;
        }

        Some(RangeSpec {
            start_row: self.start_row,
            end_row: self.end_row.min(rows - 1),
            start_col: self.start_col,
            end_col: self.end_col.min(cols - 1),
        })
    }

    /// Iterate over all addresses in the range (row by row)
    pub fn iter(&self) -> RangeIter {
        RangeIter {
            range: *self,
            current_row: self.start_row,
            current_col: self.start_col,
            done: false,
        }
    }
}

impl fmt::Display for RangeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.start(), self.end())
    }
}

impl IntoIterator for RangeSpec {
    type Item = CellAddress;
    type IntoIter = RangeIter;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over addresses in a range
pub struct RangeIter {
    range: RangeSpec,
    current_row: usize,
    current_col: usize,
    done: bool,
}

impl Iterator for RangeIter {
    type Item = CellAddress;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let addr = CellAddress::new(self.current_row, self.current_col);

        if self.current_col < self.range.end_col {
            self.current_col += 1;
        } else if self.current_row < self.range.end_row {
            self.current_col = self.range.start_col;
            self.current_row += 1;
        } else {
            self.done = true;
        }

        Some(addr)
    }
}

/// Parse a range expression such as `A1:C5`.
///
/// The pattern is searched for, so surrounding text is ignored. Column
/// letters map to `letter - 'A'`; row numbers are used as written, which
/// lines `A1` up with grid row 1, the first row below the header. Row
/// numbers too large for `usize` saturate; they lie outside any grid and are
/// clipped during aggregation. Returns `None` when no range is found.
pub fn parse_range(text: &str) -> Option<RangeSpec> {
    let Some(caps) = range_regex().captures(text) else {
        tracing::debug!(input = text, "no range expression found");
        return None;
    };

    let letter = |i: usize| caps[i].chars().next().and_then(col_from_letter);
    // The pattern guarantees ASCII digits, so parsing only fails on overflow
    let number = |i: usize| caps[i].parse::<usize>().unwrap_or(usize::MAX);

    let start_col = letter(1)?;
    let start_row = number(2);
    let end_col = letter(3)?;
    let end_row = number(4);

    let spec = RangeSpec::new(start_row, end_row, start_col, end_col);
    tracing::debug!(input = text, range = %spec, "parsed range");
    Some(spec)
}
