//! Small descriptive statistics over `f64` samples.

// ── Percentile helper ─────────────────────────────────────────────────────────

/// Compute the `p`-th percentile of a **sorted** slice using linear
/// interpolation between closest ranks (NumPy / pandas default).
///
/// Returns `None` for an empty slice.
pub fn percentile(sorted_data: &[f64], p: f64) -> Option<f64> {
    let (first, rest) = sorted_data.split_first()?;
    if rest.is_empty() {
        return Some(*first);
    }
    let len = sorted_data.len();
    let rank = (p.clamp(0.0, 100.0) / 100.0) * (len as f64 - 1.0);
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    if lo == hi {
        return Some(sorted_data[lo]);
    }
    let frac = rank - lo as f64;
    Some(sorted_data[lo] + frac * (sorted_data[hi] - sorted_data[lo]))
}

/// Quantile in `[0, 1]`; shorthand for `percentile(sorted, q * 100)`.
pub fn quantile(sorted_data: &[f64], q: f64) -> Option<f64> {
    percentile(sorted_data, q * 100.0)
}

/// Median of a **sorted** slice.
pub fn median(sorted_data: &[f64]) -> Option<f64> {
    percentile(sorted_data, 50.0)
}

/// Arithmetic mean, `None` when empty.
pub fn mean(data: &[f64]) -> Option<f64> {
    if data.is_empty() {
        return None;
    }
    Some(data.iter().sum::<f64>() / data.len() as f64)
}

/// Copy `values` into a new vector sorted ascending by total order.
pub fn sorted(values: impl IntoIterator<Item = f64>) -> Vec<f64> {
    let mut out: Vec<f64> = values.into_iter().collect();
    out.sort_by(f64::total_cmp);
    out
}

/// Smallest and largest value in one pass, `None` when empty.
pub fn min_max(values: impl IntoIterator<Item = f64>) -> Option<(f64, f64)> {
    values.into_iter().fold(None, |acc, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── percentile ────────────────────────────────────────────────────────────

    #[test]
    fn test_percentile_empty() {
        assert!(percentile(&[], 50.0).is_none());
    }

    #[test]
    fn test_percentile_single() {
        assert_eq!(percentile(&[42.0], 90.0), Some(42.0));
    }

    #[test]
    fn test_percentile_interpolates() {
        let data = [1.0, 2.0, 3.0, 4.0];
        // rank = 0.25 * 3 = 0.75 -> 1 + 0.75 * (2 - 1)
        assert!((percentile(&data, 25.0).unwrap() - 1.75).abs() < 1e-12);
        assert_eq!(percentile(&data, 0.0), Some(1.0));
        assert_eq!(percentile(&data, 100.0), Some(4.0));
    }

    #[test]
    fn test_percentile_clamps_out_of_range_p() {
        let data = [1.0, 2.0, 3.0];
        assert_eq!(percentile(&data, 150.0), Some(3.0));
        assert_eq!(percentile(&data, -5.0), Some(1.0));
    }

    // ── median / quantile ─────────────────────────────────────────────────────

    #[test]
    fn test_median_odd_and_even() {
        assert_eq!(median(&[100.0, 150.0, 200.0]), Some(150.0));
        assert_eq!(median(&[100.0, 200.0]), Some(150.0));
    }

    #[test]
    fn test_quantile_matches_percentile() {
        let data = [10.0, 20.0, 30.0, 40.0, 50.0];
        assert_eq!(quantile(&data, 0.75), percentile(&data, 75.0));
        assert_eq!(quantile(&data, 0.75), Some(40.0));
    }

    // ── mean / sorted / min_max ───────────────────────────────────────────────

    #[test]
    fn test_mean() {
        assert!(mean(&[]).is_none());
        assert_eq!(mean(&[100.0, 200.0, 150.0]), Some(150.0));
    }

    #[test]
    fn test_sorted_orders_ascending() {
        assert_eq!(sorted([3.0, -1.0, 2.0]), vec![-1.0, 2.0, 3.0]);
    }

    #[test]
    fn test_min_max() {
        assert!(min_max(std::iter::empty()).is_none());
        assert_eq!(min_max([5.0, -2.0, 9.5, 0.0]), Some((-2.0, 9.5)));
    }
}
