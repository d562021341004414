//! Filter-then-aggregate queries behind each dashboard chart.
//!
//! Every query is a pure function of the borrowed [`Dataset`] and a
//! [`FilterParams`] value. Unknown filter values are not errors: they simply
//! match nothing and yield an empty series.

use std::collections::{BTreeMap, BTreeSet};

use billing_core::models::{
    AdmissionPeriod, AdmissionTrends, AgeBin, AgeDistribution, BillingDistribution,
    CategoryCount, ChartKind, ConditionAmount, ConditionDistribution, FilterParams,
    InsuranceComparison, PeriodCount, ProviderBilling, QueryResult, Record,
};
use tracing::debug;

use crate::dataset::Dataset;
use crate::histogram::{histogram, BinEdges, DEFAULT_BIN_COUNT};

/// Stateless query surface over a borrowed [`Dataset`].
#[derive(Debug, Clone, Copy)]
pub struct Pipeline<'a> {
    dataset: &'a Dataset,
}

impl<'a> Pipeline<'a> {
    pub fn new(dataset: &'a Dataset) -> Self {
        Self { dataset }
    }

    /// Run the query behind `kind`.
    pub fn query(&self, kind: ChartKind, params: &FilterParams) -> QueryResult {
        let result = match kind {
            ChartKind::AgeDistribution => {
                QueryResult::AgeDistribution(self.age_distribution(params))
            }
            ChartKind::MedicalConditionDistribution => {
                QueryResult::MedicalConditionDistribution(
                    self.medical_condition_distribution(params),
                )
            }
            ChartKind::InsuranceComparison => {
                QueryResult::InsuranceComparison(self.insurance_comparison(params))
            }
            ChartKind::BillingDistribution => {
                QueryResult::BillingDistribution(self.billing_distribution(params))
            }
            ChartKind::AdmissionTrends => {
                QueryResult::AdmissionTrends(self.admission_trends(params))
            }
        };
        debug!(?kind, empty = result.is_empty(), "query evaluated");
        result
    }

    /// Age histogram over the gender-filtered subset, each bin split by
    /// gender. Edges span that subset's own min..max age.
    pub fn age_distribution(&self, params: &FilterParams) -> AgeDistribution {
        let subset: Vec<&Record> = self.by_gender(params.gender()).collect();
        let Some(edges) =
            BinEdges::spanning(subset.iter().map(|r| f64::from(r.age)), DEFAULT_BIN_COUNT)
        else {
            return AgeDistribution::default();
        };

        let genders: BTreeSet<&str> = subset.iter().map(|r| r.gender.as_str()).collect();
        let mut bins: Vec<AgeBin> = (0..edges.bin_count())
            .map(|i| {
                let (lower, upper) = edges.bounds(i);
                AgeBin {
                    lower,
                    upper,
                    counts: genders.iter().map(|g| (g.to_string(), 0)).collect(),
                }
            })
            .collect();

        for record in &subset {
            if let Some(i) = edges.index_of(f64::from(record.age)) {
                if let Some(count) = bins[i].counts.get_mut(record.gender.as_str()) {
                    *count += 1;
                }
            }
        }

        AgeDistribution { bins }
    }

    /// Record count per medical condition in the gender-filtered subset.
    pub fn medical_condition_distribution(&self, params: &FilterParams) -> ConditionDistribution {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for record in self.by_gender(params.gender()) {
            *counts.entry(record.medical_condition.as_str()).or_default() += 1;
        }

        let mut slices: Vec<CategoryCount> = counts
            .into_iter()
            .map(|(category, count)| CategoryCount {
                category: category.to_string(),
                count,
            })
            .collect();
        // Stable sort keeps the alphabetical order from the BTreeMap for ties.
        slices.sort_by(|a, b| b.count.cmp(&a.count));

        ConditionDistribution { slices }
    }

    /// Billing sums per (provider, condition) in the gender-filtered subset.
    /// Absent amounts add nothing but still create their group.
    pub fn insurance_comparison(&self, params: &FilterParams) -> InsuranceComparison {
        let mut sums: BTreeMap<&str, BTreeMap<&str, f64>> = BTreeMap::new();
        for record in self.by_gender(params.gender()) {
            *sums
                .entry(record.insurance_provider.as_str())
                .or_default()
                .entry(record.medical_condition.as_str())
                .or_default() += record.billing_amount.unwrap_or(0.0);
        }

        let providers = sums
            .into_iter()
            .map(|(provider, conditions)| ProviderBilling {
                provider: provider.to_string(),
                conditions: conditions
                    .into_iter()
                    .map(|(condition, amount)| ConditionAmount {
                        condition: condition.to_string(),
                        amount,
                    })
                    .collect(),
            })
            .collect();

        InsuranceComparison { providers }
    }

    /// Histogram of present billing amounts `<= ceiling` in the
    /// gender-filtered subset. The ceiling defaults to the dataset median.
    pub fn billing_distribution(&self, params: &FilterParams) -> BillingDistribution {
        let ceiling = params
            .billing_ceiling
            .or_else(|| self.dataset.median_billing());

        let values: Vec<f64> = match ceiling {
            Some(ceiling) => self
                .by_gender(params.gender())
                .filter_map(|r| r.billing_amount)
                .filter(|amount| *amount <= ceiling)
                .collect(),
            None => Vec::new(),
        };

        BillingDistribution {
            ceiling,
            bins: histogram(&values, DEFAULT_BIN_COUNT),
        }
    }

    /// Admissions per year-month for the condition-filtered subset, in
    /// ascending period order.
    pub fn admission_trends(&self, params: &FilterParams) -> AdmissionTrends {
        let condition = params.medical_condition();
        let mut counts: BTreeMap<AdmissionPeriod, usize> = BTreeMap::new();
        for record in self
            .dataset
            .iter()
            .filter(|r| condition.map_or(true, |c| r.medical_condition == c))
        {
            *counts.entry(record.admission_period).or_default() += 1;
        }

        AdmissionTrends {
            chart_type: params.chart_type(),
            points: counts
                .into_iter()
                .map(|(period, count)| PeriodCount { period, count })
                .collect(),
        }
    }

    fn by_gender<'p>(self, gender: Option<&'p str>) -> impl Iterator<Item = &'a Record> + 'p
    where
        'a: 'p,
    {
        self.dataset
            .iter()
            .filter(move |r| gender.map_or(true, |g| r.gender == g))
    }
}
