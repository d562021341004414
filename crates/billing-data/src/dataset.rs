//! The immutable in-memory dataset.

use std::collections::HashSet;

use billing_core::models::Record;
use billing_core::stats;

/// All loaded records in file order.
///
/// Built once and never mutated; share it by reference across queries and
/// threads.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<Record>,
    /// Present billing amounts, sorted ascending.
    sorted_billing: Vec<f64>,
}

impl Dataset {
    pub fn from_records(records: Vec<Record>) -> Self {
        let sorted_billing = stats::sorted(records.iter().filter_map(|r| r.billing_amount));
        Self {
            records,
            sorted_billing,
        }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Every present billing amount, sorted ascending.
    pub fn sorted_billing_amounts(&self) -> &[f64] {
        &self.sorted_billing
    }

    /// Dataset-wide median billing amount; the default billing ceiling.
    pub fn median_billing(&self) -> Option<f64> {
        stats::median(&self.sorted_billing)
    }

    /// Distinct genders in first-appearance order.
    pub fn genders(&self) -> Vec<&str> {
        distinct(self.records.iter().map(|r| r.gender.as_str()))
    }

    /// Distinct medical conditions in first-appearance order.
    pub fn medical_conditions(&self) -> Vec<&str> {
        distinct(self.records.iter().map(|r| r.medical_condition.as_str()))
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = HashSet::new();
    values.filter(|v| seen.insert(*v)).collect()
}
