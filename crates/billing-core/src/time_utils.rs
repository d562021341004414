use chrono::{DateTime, NaiveDate, NaiveDateTime};

// ── Admission date parsing ────────────────────────────────────────────────────

/// Plain calendar-date layouts accepted for `Date of Admission`.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y"];

/// Date-time layouts whose time component is discarded.
const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Parse an admission date cell.
///
/// Tries the plain date layouts first, then naive date-times and finally
/// RFC 3339. Returns `None` when nothing matches.
pub fn parse_admission_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }

    if let Some(date) = DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
    {
        return Some(date);
    }

    if let Some(dt) = DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
    {
        return Some(dt.date());
    }

    DateTime::parse_from_rfc3339(s).ok().map(|dt| dt.date_naive())
}
