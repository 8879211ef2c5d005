use crate::model::{GapRecord, RatedObservation};
use crate::utils::{desc_none_last, mean, months_before};
use chrono::NaiveDate;
use std::collections::BTreeMap;

const WINDOW_MONTHS: u32 = 11;

/// First month of the trailing 12-month window ending at the latest date in `rows`.
fn window_start(rows: &[RatedObservation]) -> Option<NaiveDate> {
    let latest = rows.iter().map(|r| r.date).max()?;
    months_before(latest, WINDOW_MONTHS)
}

/// Trailing-12-month mean yoy per category minus the headline's own trailing mean,
/// ranked descending. Each input uses its own latest date as window end.
pub fn last12_gap_vs_headline(
    categories: &[RatedObservation],
    headline: &[RatedObservation],
) -> Vec<GapRecord> {
    let Some(start) = window_start(categories) else {
        return Vec::new();
    };
    let head_mean = window_start(headline).and_then(|head_start| {
        mean(
            headline
                .iter()
                .filter(|r| r.date >= head_start)
                .map(|r| r.yoy),
        )
    });

    let mut windows: BTreeMap<&str, Vec<Option<f64>>> = BTreeMap::new();
    for row in categories.iter().filter(|r| r.date >= start) {
        windows.entry(row.category_code.as_str()).or_default().push(row.yoy);
    }

    let mut gaps: Vec<GapRecord> = windows
        .into_iter()
        .map(|(code, yoys)| GapRecord {
            category_code: code.to_string(),
            gap: mean(yoys).zip(head_mean).map(|(cat, head)| cat - head),
        })
        .collect();
    gaps.sort_by(|a, b| desc_none_last(a.gap, b.gap));
    gaps
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Months;

    fn yoy_series(code: &str, start: (i32, u32), yoys: &[Option<f64>]) -> Vec<RatedObservation> {
        let first = NaiveDate::from_ymd_opt(start.0, start.1, 1).unwrap();
        yoys.iter()
            .enumerate()
            .map(|(i, &yoy)| RatedObservation {
                date: first.checked_add_months(Months::new(i as u32)).unwrap(),
                category_code: code.to_string(),
                value: 100.0,
                mom: None,
                yoy,
            })
            .collect()
    }

    #[test]
    fn equal_means_give_zero_gap() {
        let yoys: Vec<Option<f64>> = (0..24).map(|i| Some(i as f64 / 4.0)).collect();
        let head = yoy_series("CP00", (2020, 1), &yoys);
        let cat = yoy_series("CP04", (2020, 1), &yoys);
        let gaps = last12_gap_vs_headline(&cat, &head);
        assert_eq!(gaps.len(), 1);
        assert!(gaps[0].gap.unwrap().abs() < 1e-12);
    }

    #[test]
    fn identical_category_as_reference_gives_zero() {
        let yoys: Vec<Option<f64>> = (0..18).map(|i| Some((i as f64).cos())).collect();
        let a = yoy_series("CP06", (2021, 3), &yoys);
        let b = yoy_series("CP09", (2021, 3), &yoys);
        let gaps = last12_gap_vs_headline(&a, &b);
        assert!(gaps[0].gap.unwrap().abs() < 1e-12);
    }

    #[test]
    fn ranks_descending_with_absent_last() {
        let mut cats = yoy_series("CP01", (2022, 1), &[Some(1.0); 12]);
        cats.extend(yoy_series("CP02", (2022, 1), &[Some(5.0); 12]));
        cats.extend(yoy_series("CP03", (2022, 1), &[None; 12]));
        let head = yoy_series("CP00", (2022, 1), &[Some(2.0); 12]);
        let gaps = last12_gap_vs_headline(&cats, &head);
        let codes: Vec<_> = gaps.iter().map(|g| g.category_code.as_str()).collect();
        assert_eq!(codes, vec!["CP02", "CP01", "CP03"]);
        assert_eq!(gaps[0].gap, Some(3.0));
        assert_eq!(gaps[1].gap, Some(-1.0));
        assert_eq!(gaps[2].gap, None);
    }

    #[test]
    fn windows_are_trailing_twelve_months_per_input() {
        // category: 1.0 for a year, then 3.0 for the last year
        let mut yoys = vec![Some(1.0); 12];
        yoys.extend(vec![Some(3.0); 12]);
        let cats = yoy_series("CP07", (2020, 1), &yoys);
        // headline ends a year earlier; its own window is its last 12 months
        let mut head_yoys = vec![Some(10.0); 6];
        head_yoys.extend(vec![Some(2.0); 12]);
        let head = yoy_series("CP00", (2019, 7), &head_yoys);
        let gaps = last12_gap_vs_headline(&cats, &head);
        assert_eq!(gaps[0].gap, Some(1.0));
    }

    #[test]
    fn empty_inputs() {
        assert!(last12_gap_vs_headline(&[], &[]).is_empty());
        let cats = yoy_series("CP01", (2022, 1), &[Some(1.0)]);
        let gaps = last12_gap_vs_headline(&cats, &[]);
        assert_eq!(gaps[0].gap, None);
    }
}
