//! Pure derivations over result collections.
//!
//! Every function here borrows its input and returns new data; nothing is
//! reordered or mutated in place.

use crate::models::{EmissionRecord, EmissionStatus, StatusSummary, TrendPoint};
use std::fmt;

/// Presentation class for a status badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BadgeClass {
    High,
    Low,
}

impl BadgeClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            BadgeClass::High => "high",
            BadgeClass::Low => "low",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            BadgeClass::High => "🔴",
            BadgeClass::Low => "🟢",
        }
    }
}

impl fmt::Display for BadgeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The `n` records with the highest predicted value, highest first.
///
/// Equal values keep their fetch order (the sort is stable).
pub fn top_n(records: &[EmissionRecord], n: usize) -> Vec<EmissionRecord> {
    let mut ranked = records.to_vec();
    ranked.sort_by(|a, b| b.predicted_value.total_cmp(&a.predicted_value));
    ranked.truncate(n);
    ranked
}

/// Records in fetch order, each tagged with its 1-based position.
pub fn trend_sequence(records: &[EmissionRecord]) -> Vec<TrendPoint> {
    records
        .iter()
        .enumerate()
        .map(|(i, record)| TrendPoint {
            index: i + 1,
            record: record.clone(),
        })
        .collect()
}

/// Number of records whose status equals `target`.
pub fn count_by_status(records: &[EmissionRecord], target: &EmissionStatus) -> usize {
    records.iter().filter(|r| &r.status == target).count()
}

/// Badge for a status. Anything that is not HIGH gets the low badge.
pub fn classify_badge(status: &EmissionStatus) -> BadgeClass {
    match status {
        EmissionStatus::High => BadgeClass::High,
        _ => BadgeClass::Low,
    }
}

/// The aggregate cards: HIGH counts and totals for both collections.
pub fn summarize(vehicles: &[EmissionRecord], industries: &[EmissionRecord]) -> StatusSummary {
    StatusSummary {
        high_vehicles: count_by_status(vehicles, &EmissionStatus::High),
        high_industries: count_by_status(industries, &EmissionStatus::High),
        total_vehicles: vehicles.len(),
        total_industries: industries.len(),
    }
}

/// Format a value en-US style: comma grouping, at most two decimals.
pub fn format_value(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }

    // Scaling by 100 overflows near f64::MAX; such values have no fraction anyway
    let rounded = if value.abs() < 1e15 {
        (value * 100.0).round() / 100.0
    } else {
        value
    };
    let fixed = format!("{:.2}", rounded.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac_part = frac_part.trim_end_matches('0');

    let sign = if rounded < 0.0 { "-" } else { "" };
    let grouped = group_thousands(int_part);

    if frac_part.is_empty() {
        format!("{}{}", sign, grouped)
    } else {
        format!("{}{}.{}", sign, grouped, frac_part)
    }
}

fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}
