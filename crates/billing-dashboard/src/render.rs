//! Plain-text rendering of a [`Report`].
//!
//! Each chart becomes a titled, column-aligned table. Empty series print
//! `(no data)`, mirroring the dashboard's blank figure.

use billing_core::formatting::{
    format_bin_range, format_currency, format_number, percentage,
};
use billing_core::models::{
    AdmissionTrends, AgeDistribution, BillingDistribution, ConditionDistribution,
    FilterParams, InsuranceComparison, QueryResult,
};

use crate::report::{Report, SummaryView};

const NO_DATA: &str = "(no data)";

/// Render the whole report as text.
pub fn render_report(report: &Report) -> String {
    let mut sections = Vec::new();
    if let Some(summary) = &report.summary {
        sections.push(render_summary(summary));
    }
    sections.push(render_filters(&report.filters));
    sections.extend(report.charts.iter().map(render_chart));
    sections.join("\n")
}

/// Header statistics and filter domains.
pub fn render_summary(summary: &SummaryView) -> String {
    let mut out = title("Healthcare Billing Dashboard");
    let stats = &summary.stats;
    out.push_str(&format!("Total Patient Records: {}\n", stats.total_records));
    out.push_str(&format!(
        "Average Billing Amount: {}\n",
        stats
            .average_billing
            .map(format_currency)
            .unwrap_or_else(|| "n/a".to_string())
    ));
    out.push_str(&format!(
        "Total Billing Amount: {}\n",
        format_currency(stats.total_billing)
    ));
    out.push_str(&format!("Genders: {}\n", summary.genders.join(", ")));
    out.push_str(&format!(
        "Medical Conditions: {}\n",
        summary.medical_conditions.join(", ")
    ));
    if let Some(range) = &summary.billing_range {
        let marks: Vec<&str> = range.marks.iter().map(|m| m.label.as_str()).collect();
        out.push_str(&format!(
            "Billing ceiling: {} to {} (default {}, step {})\n",
            format_currency(range.min),
            format_currency(range.max),
            format_currency(range.median),
            format_number(range.step, 0)
        ));
        out.push_str(&format!("Marks: {}\n", marks.join(" | ")));
    }
    out
}

/// The filters the charts below were computed with.
pub fn render_filters(filters: &FilterParams) -> String {
    let mut active = Vec::new();
    if let Some(gender) = filters.gender() {
        active.push(format!("gender={gender}"));
    }
    if let Some(condition) = filters.medical_condition() {
        active.push(format!("condition={condition}"));
    }
    if let Some(ceiling) = filters.billing_ceiling {
        active.push(format!("ceiling={}", format_currency(ceiling)));
    }
    if active.is_empty() {
        "Filters: none\n".to_string()
    } else {
        format!("Filters: {}\n", active.join(", "))
    }
}

/// One chart as a titled table.
pub fn render_chart(result: &QueryResult) -> String {
    let mut out = title(result.kind().title());
    if result.is_empty() {
        out.push_str(NO_DATA);
        out.push('\n');
        return out;
    }
    let body = match result {
        QueryResult::AgeDistribution(r) => age_table(r),
        QueryResult::MedicalConditionDistribution(r) => condition_table(r),
        QueryResult::InsuranceComparison(r) => insurance_table(r),
        QueryResult::BillingDistribution(r) => billing_table(r),
        QueryResult::AdmissionTrends(r) => trends_table(r),
    };
    out.push_str(&body);
    out
}

// ── Per-chart tables ──────────────────────────────────────────────────────────

fn age_table(dist: &AgeDistribution) -> String {
    let genders: Vec<&String> = dist
        .bins
        .first()
        .map(|b| b.counts.keys().collect())
        .unwrap_or_default();

    let mut headers = vec!["Age range".to_string()];
    headers.extend(genders.iter().map(|g| g.to_string()));
    headers.push("Total".to_string());

    let last = dist.bins.len() - 1;
    let rows = dist
        .bins
        .iter()
        .enumerate()
        .map(|(i, bin)| {
            let mut row = vec![format_bin_range(bin.lower, bin.upper, 1, i == last)];
            row.extend(genders.iter().map(|g| bin.counts[*g].to_string()));
            row.push(bin.total().to_string());
            row
        })
        .collect();

    table(&headers, rows)
}

fn condition_table(dist: &ConditionDistribution) -> String {
    let total = dist.total() as f64;
    let rows = dist
        .slices
        .iter()
        .map(|s| {
            vec![
                s.category.clone(),
                s.count.to_string(),
                format!("{:.1}%", percentage(s.count as f64, total, 1)),
            ]
        })
        .collect();
    table(&strings(&["Condition", "Patients", "Share"]), rows)
}

fn insurance_table(cmp: &InsuranceComparison) -> String {
    let mut rows = Vec::new();
    for provider in &cmp.providers {
        for c in &provider.conditions {
            rows.push(vec![
                provider.provider.clone(),
                c.condition.clone(),
                format_currency(c.amount),
            ]);
        }
        rows.push(vec![
            provider.provider.clone(),
            "(all)".to_string(),
            format_currency(provider.total()),
        ]);
    }
    table(&strings(&["Provider", "Condition", "Billing"]), rows)
}

fn billing_table(dist: &BillingDistribution) -> String {
    let mut out = String::new();
    if let Some(ceiling) = dist.ceiling {
        out.push_str(&format!("Ceiling: {}\n", format_currency(ceiling)));
    }
    let last = dist.bins.len() - 1;
    let rows = dist
        .bins
        .iter()
        .enumerate()
        .map(|(i, bin)| {
            vec![
                format_bin_range(bin.lower, bin.upper, 2, i == last),
                bin.count.to_string(),
            ]
        })
        .collect();
    out.push_str(&table(&strings(&["Billing range", "Patients"]), rows));
    out
}

fn trends_table(trends: &AdmissionTrends) -> String {
    let mut out = format!("Chart type: {}\n", trends.chart_type);
    let rows = trends
        .points
        .iter()
        .map(|p| vec![p.period.to_string(), p.count.to_string()])
        .collect();
    out.push_str(&table(&strings(&["Period", "Admissions"]), rows));
    out
}

// ── Table layout ──────────────────────────────────────────────────────────────

fn title(text: &str) -> String {
    format!("== {text} ==\n")
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

/// Lay out `rows` under `headers`. The first column is left-aligned and the
/// rest right-aligned.
fn table(headers: &[String], rows: Vec<Vec<String>>) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_row(&mut out, headers, &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    push_row(&mut out, &rule, &widths);
    for row in &rows {
        push_row(&mut out, row, &widths);
    }
    out
}

fn push_row(out: &mut String, cells: &[String], widths: &[usize]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths)
        .enumerate()
        .map(|(i, (cell, &w))| {
            if i == 0 {
                format!("{cell:<w$}")
            } else {
                format!("{cell:>w$}")
            }
        })
        .collect();
    out.push_str(line.join("  ").trim_end());
    out.push('\n');
}
