//! Assembles the requested views into one serialisable report.

use billing_core::models::{ChartKind, FilterParams, QueryResult};
use billing_data::dataset::Dataset;
use billing_data::pipeline::Pipeline;
use billing_data::summary::{BillingRange, DatasetSummary};
use serde::Serialize;
use tracing::info;

/// Header statistics plus the option lists the filter widgets offer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryView {
    pub stats: DatasetSummary,
    pub genders: Vec<String>,
    pub medical_conditions: Vec<String>,
    pub billing_range: Option<BillingRange>,
}

impl SummaryView {
    pub fn from_dataset(dataset: &Dataset) -> Self {
        Self {
            stats: DatasetSummary::from_dataset(dataset),
            genders: dataset.genders().into_iter().map(String::from).collect(),
            medical_conditions: dataset
                .medical_conditions()
                .into_iter()
                .map(String::from)
                .collect(),
            billing_range: BillingRange::from_dataset(dataset),
        }
    }
}

/// Everything one invocation renders.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<SummaryView>,
    pub filters: FilterParams,
    pub charts: Vec<QueryResult>,
}

/// Which parts a `--view` value selects: `(include summary, charts)`.
pub fn views_for(view: &str) -> (bool, Vec<ChartKind>) {
    match view {
        "summary" => (true, Vec::new()),
        "age" => (false, vec![ChartKind::AgeDistribution]),
        "conditions" => (false, vec![ChartKind::MedicalConditionDistribution]),
        "insurance" => (false, vec![ChartKind::InsuranceComparison]),
        "billing" => (false, vec![ChartKind::BillingDistribution]),
        "trends" => (false, vec![ChartKind::AdmissionTrends]),
        _ => (true, ChartKind::ALL.to_vec()),
    }
}

/// Clamp the requested ceiling into the dataset's billing range.
pub fn clamp_ceiling(mut params: FilterParams, range: Option<&BillingRange>) -> FilterParams {
    if let (Some(requested), Some(range)) = (params.billing_ceiling, range) {
        let clamped = range.clamp(requested);
        if clamped != requested {
            info!("Billing ceiling {} clamped to {}", requested, clamped);
        }
        params.billing_ceiling = Some(clamped);
    }
    params
}

/// Build the report for `view`. Chart queries run on scoped threads and are
/// collected back in dashboard order.
pub fn build_report(dataset: &Dataset, view: &str, params: FilterParams) -> Report {
    let (with_summary, kinds) = views_for(view);
    let summary = with_summary.then(|| SummaryView::from_dataset(dataset));
    let params = clamp_ceiling(
        params,
        summary
            .as_ref()
            .map(|s| s.billing_range.clone())
            .unwrap_or_else(|| BillingRange::from_dataset(dataset))
            .as_ref(),
    );

    let pipeline = Pipeline::new(dataset);
    let charts: Vec<QueryResult> = std::thread::scope(|s| {
        let handles: Vec<_> = kinds
            .iter()
            .map(|&kind| {
                let params = &params;
                s.spawn(move || pipeline.query(kind, params))
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| {
                handle
                    .join()
                    .unwrap_or_else(|panic| std::panic::resume_unwind(panic))
            })
            .collect()
    });

    Report {
        summary,
        filters: params,
        charts,
    }
}
