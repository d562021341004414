//! Headline statistics and widget domains for the dashboard.

use billing_core::formatting::format_mark_label;
use billing_core::stats;
use serde::Serialize;

use crate::dataset::Dataset;

/// Step the billing slider moves by.
pub const BILLING_SLIDER_STEP: f64 = 100.0;

/// Quantiles at which the billing slider is labelled.
pub const BILLING_MARK_QUANTILES: [f64; 5] = [0.0, 0.25, 0.5, 0.75, 1.0];

// ── DatasetSummary ────────────────────────────────────────────────────────────

/// Header numbers shown above the charts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetSummary {
    pub total_records: usize,
    /// Records whose billing amount is present.
    pub billed_records: usize,
    /// Mean of present billing amounts.
    pub average_billing: Option<f64>,
    /// Sum of present billing amounts.
    pub total_billing: f64,
}

impl DatasetSummary {
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let amounts = dataset.sorted_billing_amounts();
        Self {
            total_records: dataset.len(),
            billed_records: amounts.len(),
            average_billing: stats::mean(amounts),
            total_billing: amounts.iter().sum(),
        }
    }
}

// ── BillingRange ──────────────────────────────────────────────────────────────

/// A labelled point on the billing slider.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SliderMark {
    pub value: f64,
    pub label: String,
}

/// Domain of the billing ceiling control.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BillingRange {
    pub min: f64,
    pub max: f64,
    /// Default ceiling.
    pub median: f64,
    pub step: f64,
    pub marks: Vec<SliderMark>,
}

impl BillingRange {
    /// `None` when no record carries a billing amount.
    pub fn from_dataset(dataset: &Dataset) -> Option<Self> {
        let sorted = dataset.sorted_billing_amounts();
        let min = *sorted.first()?;
        let max = *sorted.last()?;
        let median = stats::median(sorted)?;

        let marks = BILLING_MARK_QUANTILES
            .iter()
            .filter_map(|q| stats::quantile(sorted, *q))
            .map(|value| SliderMark {
                value,
                label: format_mark_label(value),
            })
            .collect();

        Some(Self {
            min,
            max,
            median,
            step: BILLING_SLIDER_STEP,
            marks,
        })
    }

    /// Clamp a user-entered ceiling into `[min, max]`. NaN maps to the median.
    pub fn clamp(&self, value: f64) -> f64 {
        if value.is_nan() {
            return self.median;
        }
        value.clamp(self.min, self.max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use billing_core::models::Record;
    use chrono::NaiveDate;

    fn dataset(amounts: &[Option<f64>]) -> Dataset {
        let day = NaiveDate::from_ymd_opt(2022, 4, 1).unwrap();
        Dataset::from_records(
            amounts
                .iter()
                .map(|a| Record::new("Female", 50, "Asthma", "Cigna", *a, day))
                .collect(),
        )
    }

    // ── DatasetSummary ────────────────────────────────────────────────────────

    #[test]
    fn test_summary_excludes_absent_amounts() {
        let ds = dataset(&[Some(100.0), Some(200.0), Some(150.0), None]);
        let summary = DatasetSummary::from_dataset(&ds);

        assert_eq!(summary.total_records, 4);
        assert_eq!(summary.billed_records, 3);
        assert_eq!(summary.average_billing, Some(150.0));
        assert_eq!(summary.total_billing, 450.0);
    }

    #[test]
    fn test_summary_without_amounts() {
        let summary = DatasetSummary::from_dataset(&dataset(&[None, None]));
        assert_eq!(summary.total_records, 2);
        assert!(summary.average_billing.is_none());
        assert_eq!(summary.total_billing, 0.0);
    }

    // ── BillingRange ──────────────────────────────────────────────────────────

    #[test]
    fn test_billing_range_quartile_marks() {
        let ds = dataset(&[Some(400.0), Some(100.0), None, Some(300.0), Some(200.0), Some(500.0)]);
        let range = BillingRange::from_dataset(&ds).unwrap();

        assert_eq!(range.min, 100.0);
        assert_eq!(range.max, 500.0);
        assert_eq!(range.median, 300.0);
        assert_eq!(range.step, 100.0);

        let labels: Vec<&str> = range.marks.iter().map(|m| m.label.as_str()).collect();
        assert_eq!(labels, vec!["$100", "$200", "$300", "$400", "$500"]);
    }

    #[test]
    fn test_billing_range_marks_truncate_labels() {
        let ds = dataset(&[Some(1_000.75), Some(2_000.25)]);
        let range = BillingRange::from_dataset(&ds).unwrap();
        assert_eq!(range.marks[2].value, 1_500.5);
        assert_eq!(range.marks[2].label, "$1500");
    }

    #[test]
    fn test_billing_range_none_without_amounts() {
        assert!(BillingRange::from_dataset(&dataset(&[None])).is_none());
    }

    #[test]
    fn test_clamp() {
        let ds = dataset(&[Some(100.0), Some(300.0), Some(500.0)]);
        let range = BillingRange::from_dataset(&ds).unwrap();
        assert_eq!(range.clamp(50.0), 100.0);
        assert_eq!(range.clamp(250.0), 250.0);
        assert_eq!(range.clamp(9_999.0), 500.0);
        assert_eq!(range.clamp(f64::NAN), 300.0);
    }
}
