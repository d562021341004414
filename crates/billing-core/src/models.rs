use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

// ── AdmissionPeriod ───────────────────────────────────────────────────────────

/// A calendar year-month bucket derived from an admission date.
///
/// Field order makes the derived `Ord` chronological, and the `YYYY-MM`
/// display form sorts the same way lexicographically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AdmissionPeriod {
    pub year: i32,
    pub month: u32,
}

impl AdmissionPeriod {
    /// Truncate `date` to its year and month.
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for AdmissionPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for AdmissionPeriod {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ── Record ────────────────────────────────────────────────────────────────────

/// One patient billing entry from the source dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub gender: String,
    pub age: u32,
    pub medical_condition: String,
    pub insurance_provider: String,
    /// `None` when the raw cell was empty or not a finite number.
    pub billing_amount: Option<f64>,
    pub admission_date: NaiveDate,
    /// Always `AdmissionPeriod::from_date(admission_date)`; set by [`Record::new`].
    pub admission_period: AdmissionPeriod,
}

impl Record {
    /// Build a record, deriving its admission period from `admission_date`.
    pub fn new(
        gender: impl Into<String>,
        age: u32,
        medical_condition: impl Into<String>,
        insurance_provider: impl Into<String>,
        billing_amount: Option<f64>,
        admission_date: NaiveDate,
    ) -> Self {
        Self {
            gender: gender.into(),
            age,
            medical_condition: medical_condition.into(),
            insurance_provider: insurance_provider.into(),
            billing_amount,
            admission_date,
            admission_period: AdmissionPeriod::from_date(admission_date),
        }
    }
}

// ── ChartType ─────────────────────────────────────────────────────────────────

/// Presentation hint for the admission trends chart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartType {
    #[default]
    Line,
    Bar,
}

impl fmt::Display for ChartType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChartType::Line => write!(f, "line"),
            ChartType::Bar => write!(f, "bar"),
        }
    }
}

impl FromStr for ChartType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "line" => Ok(ChartType::Line),
            "bar" => Ok(ChartType::Bar),
            other => Err(format!("unknown chart type: {other}")),
        }
    }
}

// ── ChartKind ─────────────────────────────────────────────────────────────────

/// The five chart series the pipeline can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    AgeDistribution,
    MedicalConditionDistribution,
    InsuranceComparison,
    BillingDistribution,
    AdmissionTrends,
}

impl ChartKind {
    /// All chart kinds in dashboard order.
    pub const ALL: [ChartKind; 5] = [
        ChartKind::AgeDistribution,
        ChartKind::MedicalConditionDistribution,
        ChartKind::InsuranceComparison,
        ChartKind::BillingDistribution,
        ChartKind::AdmissionTrends,
    ];

    /// Human-readable chart title.
    pub fn title(&self) -> &'static str {
        match self {
            ChartKind::AgeDistribution => "Age Distribution by Gender",
            ChartKind::MedicalConditionDistribution => "Medical Condition Distribution",
            ChartKind::InsuranceComparison => "Insurance Provider Price Comparison",
            ChartKind::BillingDistribution => "Billing Amount Distribution",
            ChartKind::AdmissionTrends => "Trends in Admissions",
        }
    }
}

// ── FilterParams ──────────────────────────────────────────────────────────────

/// User-selected constraints applied before aggregation.
///
/// Empty strings behave like `None`, matching an unset dropdown.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub medical_condition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub billing_ceiling: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chart_type: Option<ChartType>,
}

impl FilterParams {
    pub fn with_gender(mut self, gender: impl Into<String>) -> Self {
        self.gender = Some(gender.into());
        self
    }

    pub fn with_medical_condition(mut self, condition: impl Into<String>) -> Self {
        self.medical_condition = Some(condition.into());
        self
    }

    pub fn with_billing_ceiling(mut self, ceiling: f64) -> Self {
        self.billing_ceiling = Some(ceiling);
        self
    }

    pub fn with_chart_type(mut self, chart_type: ChartType) -> Self {
        self.chart_type = Some(chart_type);
        self
    }

    /// Active gender filter, if any.
    pub fn gender(&self) -> Option<&str> {
        non_empty(self.gender.as_deref())
    }

    /// Active medical condition filter, if any.
    pub fn medical_condition(&self) -> Option<&str> {
        non_empty(self.medical_condition.as_deref())
    }

    /// Requested chart type, defaulting to [`ChartType::Line`].
    pub fn chart_type(&self) -> ChartType {
        self.chart_type.unwrap_or_default()
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

// ── Query results ─────────────────────────────────────────────────────────────

/// One age histogram bin, with its count split by gender.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgeBin {
    pub lower: f64,
    pub upper: f64,
    pub counts: BTreeMap<String, usize>,
}

impl AgeBin {
    /// Records in this bin across all genders.
    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AgeDistribution {
    pub bins: Vec<AgeBin>,
}

/// A `(category, count)` pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryCount {
    pub category: String,
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ConditionDistribution {
    /// Slices ordered by descending count, ties broken by name.
    pub slices: Vec<CategoryCount>,
}

impl ConditionDistribution {
    pub fn total(&self) -> usize {
        self.slices.iter().map(|s| s.count).sum()
    }
}

/// Billing sum for one medical condition within a provider group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConditionAmount {
    pub condition: String,
    pub amount: f64,
}

/// All condition sums for one insurance provider.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProviderBilling {
    pub provider: String,
    pub conditions: Vec<ConditionAmount>,
}

impl ProviderBilling {
    pub fn total(&self) -> f64 {
        self.conditions.iter().map(|c| c.amount).sum()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InsuranceComparison {
    pub providers: Vec<ProviderBilling>,
}

impl InsuranceComparison {
    pub fn total(&self) -> f64 {
        self.providers.iter().map(ProviderBilling::total).sum()
    }
}

/// One equal-width histogram bin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BillingDistribution {
    /// The ceiling that was applied; `None` when the dataset has no billing
    /// amounts to take a default median from.
    pub ceiling: Option<f64>,
    pub bins: Vec<HistogramBin>,
}

impl BillingDistribution {
    pub fn total(&self) -> usize {
        self.bins.iter().map(|b| b.count).sum()
    }
}

/// Admissions in one year-month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PeriodCount {
    pub period: AdmissionPeriod,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdmissionTrends {
    pub chart_type: ChartType,
    /// Strictly ascending by period.
    pub points: Vec<PeriodCount>,
}

/// The output of one pipeline invocation, ready for chart binding.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "chart", rename_all = "snake_case")]
pub enum QueryResult {
    AgeDistribution(AgeDistribution),
    MedicalConditionDistribution(ConditionDistribution),
    InsuranceComparison(InsuranceComparison),
    BillingDistribution(BillingDistribution),
    AdmissionTrends(AdmissionTrends),
}

impl QueryResult {
    pub fn kind(&self) -> ChartKind {
        match self {
            QueryResult::AgeDistribution(_) => ChartKind::AgeDistribution,
            QueryResult::MedicalConditionDistribution(_) => {
                ChartKind::MedicalConditionDistribution
            }
            QueryResult::InsuranceComparison(_) => ChartKind::InsuranceComparison,
            QueryResult::BillingDistribution(_) => ChartKind::BillingDistribution,
            QueryResult::AdmissionTrends(_) => ChartKind::AdmissionTrends,
        }
    }

    /// `true` when the series has nothing to plot.
    pub fn is_empty(&self) -> bool {
        match self {
            QueryResult::AgeDistribution(r) => r.bins.is_empty(),
            QueryResult::MedicalConditionDistribution(r) => r.slices.is_empty(),
            QueryResult::InsuranceComparison(r) => r.providers.is_empty(),
            QueryResult::BillingDistribution(r) => r.bins.is_empty(),
            QueryResult::AdmissionTrends(r) => r.points.is_empty(),
        }
    }
}
