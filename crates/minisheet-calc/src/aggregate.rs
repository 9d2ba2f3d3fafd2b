use minisheet_core::{Grid, RangeSpec, SheetError, HEADER_ROW};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::functions::math;

/// An aggregate function that reduces a range to one number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AggregateKind {
    Sum,
    Average,
    Max,
    Min,
    Count,
}

impl AggregateKind {
    pub const ALL: [AggregateKind; 5] = [
        AggregateKind::Sum,
        AggregateKind::Average,
        AggregateKind::Max,
        AggregateKind::Min,
        AggregateKind::Count,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            AggregateKind::Sum => "SUM",
            AggregateKind::Average => "AVERAGE",
            AggregateKind::Max => "MAX",
            AggregateKind::Min => "MIN",
            AggregateKind::Count => "COUNT",
        }
    }

    /// Reduce collected values. `None` when there are no values.
    pub fn apply(&self, values: &[f64]) -> Option<f64> {
        match self {
            AggregateKind::Sum => math::sum(values),
            AggregateKind::Average => math::average(values),
            AggregateKind::Max => math::max(values),
            AggregateKind::Min => math::min(values),
            AggregateKind::Count => math::count(values),
        }
    }
}

impl fmt::Display for AggregateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AggregateKind {
    type Err = SheetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let name = s.trim();
        AggregateKind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| SheetError::UnknownAggregate(name.to_string()))
    }
}

/// Collect the numbers inside `spec`, row by row.
///
/// Coordinates outside the grid and the header row are skipped, as are
/// text and empty cells.
pub fn collect_numbers(grid: &Grid, spec: &RangeSpec) -> Vec<f64> {
    let Some(clipped) = spec.clamp_to(grid.row_count(), grid.col_count()) else {
        return Vec::new();
    };

    clipped
        .iter()
        .filter(|addr| addr.row != HEADER_ROW)
        .filter_map(|addr| grid.get_at(addr).and_then(|cell| cell.as_number()))
        .collect()
}

/// Aggregate the numbers in a range.
/// Returns `None` when the range holds no numbers.
pub fn aggregate(grid: &Grid, spec: &RangeSpec, kind: AggregateKind) -> Option<f64> {
    let values = collect_numbers(grid, spec);
    let result = kind.apply(&values);
    tracing::debug!(range = %spec, %kind, found = values.len(), ?result, "aggregated range");
    result
}

/// Aggregate using a function name such as `"SUM"`.
/// Unknown names produce `None`.
pub fn aggregate_named(grid: &Grid, spec: &RangeSpec, name: &str) -> Option<f64> {
    match name.parse::<AggregateKind>() {
        Ok(kind) => aggregate(grid, spec, kind),
        Err(err) => {
            tracing::debug!(%err, "skipping aggregation");
            None
        }
    }
}
