use crate::config::{DateRange, FilterConfig};
use crate::model::{Observation, ObservationTable, RatedObservation};
use chrono::NaiveDate;
use std::collections::HashSet;
use tracing::{info, warn};

/// A filtered observation: date and value are guaranteed present.
#[derive(Debug, Clone, PartialEq)]
pub struct CleanObservation {
    pub date: NaiveDate,
    pub category_code: String,
    pub value: f64,
}

/// Drops unusable rows, keeps the configured frequency / adjustment / index type
/// and sorts ascending by date. Equal dates keep their file order.
pub fn normalize_all(table: &ObservationTable, filters: &FilterConfig) -> Vec<CleanObservation> {
    let mut out: Vec<CleanObservation> = table
        .observations
        .iter()
        .filter(|obs| keep(obs, table, filters))
        .filter_map(|obs| {
            Some(CleanObservation {
                date: obs.date?,
                category_code: obs.category_code.clone(),
                value: obs.value?,
            })
        })
        .collect();
    out.sort_by_key(|obs| obs.date);

    info!(
        "Kept {} of {} observations after filtering",
        out.len(),
        table.observations.len()
    );
    let duplicates = count_duplicate_keys(&out);
    if duplicates > 0 {
        warn!(
            "{} duplicate (category, date) rows kept; positional rates will treat them as separate months",
            duplicates
        );
    }
    out
}

fn keep(obs: &Observation, table: &ObservationTable, filters: &FilterConfig) -> bool {
    let passes = |present: bool, cell: &Option<String>, marker: &str| {
        !present || cell.as_deref() == Some(marker)
    };
    passes(table.columns.frequency, &obs.frequency, &filters.frequency)
        && passes(
            table.columns.seasonal_adjustment,
            &obs.seasonal_adjustment,
            &filters.seasonal_adjustment,
        )
        && passes(table.columns.index_type, &obs.index_type, &filters.index_type)
}

fn count_duplicate_keys(rows: &[CleanObservation]) -> usize {
    let mut seen = HashSet::new();
    rows.iter()
        .filter(|obs| !seen.insert((obs.category_code.as_str(), obs.date)))
        .count()
}

/// Rows of a rated table whose date falls inside the inclusive range.
pub fn within_range(rows: &[RatedObservation], range: &DateRange) -> Vec<RatedObservation> {
    rows.iter()
        .filter(|r| r.date >= range.start && r.date <= range.end)
        .cloned()
        .collect()
}
