pub mod aggregate;
pub mod functions;

pub use aggregate::{aggregate, aggregate_named, collect_numbers, AggregateKind};

use minisheet_core::{parse_range, Grid};

/// Parse `range` and aggregate it in one step.
///
/// Returns `None` when the range text is malformed, the function name is
/// unknown, or the range holds no numbers.
pub fn evaluate(grid: &Grid, range: &str, function: &str) -> Option<f64> {
    let spec = parse_range(range)?;
    aggregate_named(grid, &spec, function)
}
