use crate::config::YearRange;
use crate::model::{RatedObservation, SeasonalProfile, SeasonalShift};
use crate::utils::{desc_none_last, mean};
use chrono::Datelike;
use std::collections::BTreeMap;

type MonthKey<'a> = (&'a str, u32);

/// Mean mom per (category, month) over rows whose year lies in `years`.
/// A group with only absent mom values still appears, with no mean.
fn monthly_means<'a>(
    rows: &'a [RatedObservation],
    years: &YearRange,
) -> BTreeMap<MonthKey<'a>, Option<f64>> {
    let mut groups: BTreeMap<MonthKey<'a>, Vec<Option<f64>>> = BTreeMap::new();
    for row in rows.iter().filter(|r| years.contains(r.date.year())) {
        groups
            .entry((row.category_code.as_str(), row.date.month()))
            .or_default()
            .push(row.mom);
    }
    groups.into_iter().map(|(key, moms)| (key, mean(moms))).collect()
}

/// Pre/post era mean mom per (category, calendar month), outer-joined.
pub fn seasonality_profiles(
    rows: &[RatedObservation],
    pre: &YearRange,
    post: &YearRange,
) -> Vec<SeasonalProfile> {
    let pre_means = monthly_means(rows, pre);
    let post_means = monthly_means(rows, post);

    let mut joined: BTreeMap<MonthKey, (Option<f64>, Option<f64>)> = BTreeMap::new();
    for (key, m) in pre_means {
        joined.entry(key).or_default().0 = m;
    }
    for (key, m) in post_means {
        joined.entry(key).or_default().1 = m;
    }

    joined
        .into_iter()
        .map(|((code, month), (mom_pre, mom_post))| SeasonalProfile {
            category_code: code.to_string(),
            month,
            mom_pre,
            mom_post,
        })
        .collect()
}

/// Per category, how much post-era months outpace pre-era ones on average,
/// plus the months with the largest and smallest change. Largest shift first.
pub fn seasonal_shifts(profiles: &[SeasonalProfile]) -> Vec<SeasonalShift> {
    let mut deltas: BTreeMap<&str, Vec<(u32, f64)>> = BTreeMap::new();
    for p in profiles {
        let entry = deltas.entry(p.category_code.as_str()).or_default();
        if let (Some(pre), Some(post)) = (p.mom_pre, p.mom_post) {
            entry.push((p.month, post - pre));
        }
    }

    let mut shifts: Vec<SeasonalShift> = deltas
        .into_iter()
        .map(|(code, months)| SeasonalShift {
            category_code: code.to_string(),
            mean_delta: mean(months.iter().map(|&(_, d)| Some(d))),
            strongest_month: months
                .iter()
                .max_by(|a, b| a.1.total_cmp(&b.1))
                .map(|&(m, _)| m),
            weakest_month: months
                .iter()
                .min_by(|a, b| a.1.total_cmp(&b.1))
                .map(|&(m, _)| m),
        })
        .collect();
    shifts.sort_by(|a, b| desc_none_last(a.mean_delta, b.mean_delta));
    shifts
}
