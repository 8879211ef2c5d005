use crate::model::{RatedObservation, VolatilityScore};
use crate::utils::{desc_none_last, median, sample_std_dev};
use std::collections::BTreeMap;

fn sign(x: f64) -> i8 {
    if x > 0.0 {
        1
    } else if x < 0.0 {
        -1
    } else {
        0
    }
}

/// Sign flips across consecutive defined yoy values.
///
/// Counts `sign[i] != sign[i - 1]` including the leading comparison against
/// nothing, then subtracts one; series with fewer than two signs count zero.
pub fn sign_changes(values: &[f64]) -> usize {
    if values.len() < 2 {
        return 0;
    }
    let signs: Vec<i8> = values.iter().copied().map(sign).collect();
    let shifted_differs = 1 + signs.windows(2).filter(|w| w[0] != w[1]).count();
    shifted_differs - 1
}

/// Defined yoy values per category, in row order.
fn yoy_by_category(rows: &[RatedObservation]) -> BTreeMap<&str, Vec<f64>> {
    let mut grouped: BTreeMap<&str, Vec<f64>> = BTreeMap::new();
    for row in rows {
        let values = grouped.entry(row.category_code.as_str()).or_default();
        if let Some(yoy) = row.yoy {
            values.push(yoy);
        }
    }
    grouped
}

/// Volatility (sample std of yoy) and persistence per category, most volatile first.
pub fn volatility_persistence(rows: &[RatedObservation]) -> Vec<VolatilityScore> {
    let mut scores: Vec<VolatilityScore> = yoy_by_category(rows)
        .into_iter()
        .map(|(code, values)| {
            let n = values.len();
            let changes = sign_changes(&values);
            VolatilityScore {
                category_code: code.to_string(),
                vol: sample_std_dev(&values),
                n,
                sign_changes: changes,
                persistence: 1.0 - changes as f64 / n.max(1) as f64,
            }
        })
        .collect();
    scores.sort_by(|a, b| desc_none_last(a.vol, b.vol));
    scores
}

/// Median defined yoy per category, highest first.
pub fn median_yoy(rows: &[RatedObservation]) -> Vec<(String, f64)> {
    let mut medians: Vec<(String, f64)> = yoy_by_category(rows)
        .into_iter()
        .filter_map(|(code, values)| Some((code.to_string(), median(&values)?)))
        .collect();
    medians.sort_by(|a, b| b.1.total_cmp(&a.1));
    medians
}
