//! Numeric reductions over the values collected from a range.
//!
//! Every function returns `None` for an empty slice: there is nothing to
//! show for a range without numbers.

/// SUM - Sum of all values
pub fn sum(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum())
}

/// AVERAGE - Arithmetic mean
pub fn average(values: &[f64]) -> Option<f64> {
    sum(values).map(|total| total / values.len() as f64)
}

/// MAX - Largest value
pub fn max(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::max)
}

/// MIN - Smallest value
pub fn min(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::min)
}

/// COUNT - Number of values
pub fn count(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sum() {
        assert_eq!(sum(&[1.0, 2.0, 3.0]), Some(6.0));
        assert_eq!(sum(&[-1.5, 1.5]), Some(0.0));
        assert_eq!(sum(&[]), None);
    }

    #[test]
    fn test_average() {
        assert_eq!(average(&[2.0, 4.0]), Some(3.0));
        assert_eq!(average(&[1.0, 2.0]), Some(1.5));
        assert_eq!(average(&[]), None);
    }

    #[test]
    fn test_max_min() {
        assert_eq!(max(&[3.0, -2.0, 7.5]), Some(7.5));
        assert_eq!(min(&[3.0, -2.0, 7.5]), Some(-2.0));
        assert_eq!(max(&[5.0]), Some(5.0));
        assert_eq!(min(&[5.0]), Some(5.0));
        assert_eq!(max(&[]), None);
        assert_eq!(min(&[]), None);
    }

    #[test]
    fn test_count() {
        assert_eq!(count(&[0.0, 0.0, 0.0]), Some(3.0));
        assert_eq!(count(&[]), None);
    }
}
