//! CSV loading for the healthcare billing dataset.
//!
//! Reads the source file once, coerces billing amounts, parses admission
//! dates and hands back an immutable [`Dataset`].

use std::io::Read;
use std::path::Path;
use std::time::Instant;

use billing_core::error::{DashboardError, Result};
use billing_core::models::Record;
use billing_core::time_utils::parse_admission_date;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::dataset::Dataset;

/// Header names the pipeline depends on. Any other column is ignored.
pub const REQUIRED_COLUMNS: [&str; 6] = [
    "Gender",
    "Age",
    "Medical Condition",
    "Insurance Provider",
    "Billing Amount",
    "Date of Admission",
];

/// One CSV row as text, before coercion.
#[derive(Debug, Deserialize)]
struct RawRow {
    #[serde(rename = "Gender")]
    gender: String,
    #[serde(rename = "Age")]
    age: String,
    #[serde(rename = "Medical Condition")]
    medical_condition: String,
    #[serde(rename = "Insurance Provider")]
    insurance_provider: String,
    #[serde(rename = "Billing Amount")]
    billing_amount: String,
    #[serde(rename = "Date of Admission")]
    admission_date: String,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load the dataset from a CSV file on disk.
pub fn load_dataset(path: &Path) -> Result<Dataset> {
    let start = Instant::now();
    let file = std::fs::File::open(path).map_err(|source| DashboardError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    let dataset = load_from_reader(file)?;

    info!("Loaded {} records from {}", dataset.len(), path.display());
    debug!(
        "Dataset load took {:.3}s",
        start.elapsed().as_secs_f64()
    );
    Ok(dataset)
}

/// Load the dataset from any CSV byte source with a header row.
pub fn load_from_reader<R: Read>(source: R) -> Result<Dataset> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(source);

    let headers = reader.headers()?.clone();
    if let Some(missing) = REQUIRED_COLUMNS
        .iter()
        .find(|col| !headers.iter().any(|h| h == **col))
    {
        return Err(DashboardError::MissingColumn((*missing).to_string()));
    }

    let mut records = Vec::new();
    let mut coerced = 0usize;

    for (i, row) in reader.deserialize::<RawRow>().enumerate() {
        let row_no = i + 1;
        let raw = row?;

        let age = parse_age(&raw.age).ok_or_else(|| DashboardError::InvalidAge {
            row: row_no,
            value: raw.age.clone(),
        })?;
        let admission_date =
            parse_admission_date(&raw.admission_date).ok_or_else(|| {
                DashboardError::InvalidDate {
                    row: row_no,
                    value: raw.admission_date.clone(),
                }
            })?;

        let billing_amount = coerce_billing(&raw.billing_amount);
        if billing_amount.is_none() {
            coerced += 1;
            debug!(
                "Row {}: billing amount {:?} treated as absent",
                row_no, raw.billing_amount
            );
        }

        records.push(Record::new(
            raw.gender,
            age,
            raw.medical_condition,
            raw.insurance_provider,
            billing_amount,
            admission_date,
        ));
    }

    if coerced > 0 {
        warn!(
            "{} of {} rows had a non-numeric billing amount",
            coerced,
            records.len()
        );
    }

    Ok(Dataset::from_records(records))
}

// ── Coercion helpers ──────────────────────────────────────────────────────────

/// Numeric billing value, or `None` for empty, non-numeric or non-finite text.
pub fn coerce_billing(raw: &str) -> Option<f64> {
    raw.trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// Whole, non-negative age. Accepts `"45"` and `"45.0"`.
fn parse_age(raw: &str) -> Option<u32> {
    let raw = raw.trim();
    if let Ok(age) = raw.parse::<u32>() {
        return Some(age);
    }
    let value = raw.parse::<f64>().ok()?;
    (value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= u32::MAX as f64)
        .then_some(value as u32)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
