//! Equal-width histogram binning.
//!
//! Edges always span the min..max of the values being binned, so callers
//! that bin a filtered subset get edges that move with the filter.

use billing_core::models::HistogramBin;
use billing_core::stats;

/// Bin count used by both dashboard histograms.
pub const DEFAULT_BIN_COUNT: usize = 10;

/// Equal-width edges over `[min, max]`.
///
/// Bins are half-open `[lower, upper)` except the last, which also holds
/// `max`. When every value is equal there is a single bin `[min, max]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BinEdges {
    min: f64,
    max: f64,
    count: usize,
}

impl BinEdges {
    /// Edges spanning `values`, or `None` when there are no values.
    pub fn spanning(values: impl IntoIterator<Item = f64>, bins: usize) -> Option<Self> {
        let (min, max) = stats::min_max(values)?;
        let count = if min == max { 1 } else { bins.max(1) };
        Some(Self { min, max, count })
    }

    pub fn bin_count(&self) -> usize {
        self.count
    }

    fn width(&self) -> f64 {
        (self.max - self.min) / self.count as f64
    }

    /// `(lower, upper)` of bin `i`. The last upper edge is exactly `max`.
    pub fn bounds(&self, i: usize) -> (f64, f64) {
        let lower = self.min + i as f64 * self.width();
        let upper = if i + 1 >= self.count {
            self.max
        } else {
            self.min + (i + 1) as f64 * self.width()
        };
        (lower, upper)
    }

    /// Bin holding `value`, or `None` when it lies outside `[min, max]`.
    pub fn index_of(&self, value: f64) -> Option<usize> {
        if !(self.min..=self.max).contains(&value) {
            return None;
        }
        if self.count == 1 {
            return Some(0);
        }
        let last = self.count - 1;
        let mut i = (((value - self.min) / self.width()).floor() as usize).min(last);
        // The division can land one bin off the edges `bounds` reports.
        let (lower, upper) = self.bounds(i);
        if value < lower && i > 0 {
            i -= 1;
        } else if value >= upper && i < last {
            i += 1;
        }
        Some(i)
    }
}

/// Count `values` into `bins` equal-width bins spanning their own range.
///
/// Returns no bins for empty input.
pub fn histogram(values: &[f64], bins: usize) -> Vec<HistogramBin> {
    let Some(edges) = BinEdges::spanning(values.iter().copied(), bins) else {
        return Vec::new();
    };

    let mut counts = vec![0usize; edges.bin_count()];
    for &v in values {
        if let Some(i) = edges.index_of(v) {
            counts[i] += 1;
        }
    }

    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| {
            let (lower, upper) = edges.bounds(i);
            HistogramBin {
                lower,
                upper,
                count,
            }
        })
        .collect()
}
