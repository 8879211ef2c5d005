use crate::model::{Observation, ObservationTable};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnMissing {
    pub column: &'static str,
    pub missing: usize,
    pub missing_pct: f64,
}

/// Raw-table health figures, before any filtering.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityReport {
    pub rows: usize,
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
    pub missing: Vec<ColumnMissing>,
    pub missing_total: usize,
    pub duplicate_rows: usize,
    pub unique_months: usize,
}

type Check = (&'static str, fn(&Observation) -> bool);

fn checks(table: &ObservationTable) -> Vec<Check> {
    let mut checks: Vec<Check> = Vec::new();
    checks.push(("date", |o: &Observation| o.date.is_none()));
    checks.push(("value", |o: &Observation| o.value.is_none()));
    checks.push(("category_code", |o: &Observation| o.category_code.is_empty()));
    if table.columns.frequency {
        checks.push(("frequency", |o: &Observation| o.frequency.is_none()));
    }
    if table.columns.index_type {
        checks.push(("index_type", |o: &Observation| o.index_type.is_none()));
    }
    if table.columns.seasonal_adjustment {
        checks.push(("seasonal_adjustment", |o: &Observation| {
            o.seasonal_adjustment.is_none()
        }));
    }
    checks
}

pub fn basic_quality(table: &ObservationTable) -> QualityReport {
    let rows = table.observations.len();
    let dates = || table.observations.iter().filter_map(|o| o.date);

    let missing: Vec<ColumnMissing> = checks(table)
        .into_iter()
        .map(|(column, is_missing)| {
            let missing = table.observations.iter().filter(|o| is_missing(o)).count();
            let pct = if rows == 0 {
                0.0
            } else {
                (missing as f64 / rows as f64 * 10_000.0).round() / 100.0
            };
            ColumnMissing {
                column,
                missing,
                missing_pct: pct,
            }
        })
        .collect();

    let mut seen = HashSet::new();
    let duplicate_rows = table
        .observations
        .iter()
        .filter(|o| {
            let key = (
                o.date,
                o.category_code.as_str(),
                o.value.map(f64::to_bits),
                o.frequency.as_deref(),
                o.index_type.as_deref(),
                o.seasonal_adjustment.as_deref(),
            );
            !seen.insert(key)
        })
        .count();

    QualityReport {
        rows,
        start: dates().min(),
        end: dates().max(),
        missing_total: missing.iter().map(|m| m.missing).sum(),
        missing,
        duplicate_rows,
        unique_months: dates().collect::<HashSet<_>>().len(),
    }
}
