use crate::model::{HeadlineSummary, RatedObservation};

const TRAILING: usize = 12;

/// Peak, latest and trailing-year figures of the headline, computed over
/// rows with a defined yoy. `None` when there are none.
pub fn headline_summary(headline: &[RatedObservation]) -> Option<HeadlineSummary> {
    let defined: Vec<&RatedObservation> = headline.iter().filter(|r| r.yoy.is_some()).collect();
    let latest = *defined.last()?;

    let mut peak = defined[0];
    for &row in &defined[1..] {
        // first occurrence wins on ties
        if row.yoy > peak.yoy {
            peak = row;
        }
    }

    let tail = &defined[defined.len().saturating_sub(TRAILING)..];
    let trailing_avg_yoy = tail.iter().filter_map(|r| r.yoy).sum::<f64>() / tail.len() as f64;
    let positive_mom_months = tail
        .iter()
        .filter(|r| r.mom.is_some_and(|m| m > 0.0))
        .count();

    Some(HeadlineSummary {
        peak_yoy: peak.yoy?,
        peak_date: peak.date,
        latest_yoy: latest.yoy?,
        latest_date: latest.date,
        trailing_avg_yoy,
        positive_mom_months,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Months, NaiveDate};

    fn head(points: &[(Option<f64>, Option<f64>)]) -> Vec<RatedObservation> {
        let start = NaiveDate::from_ymd_opt(2021, 1, 1).unwrap();
        points
            .iter()
            .enumerate()
            .map(|(i, &(mom, yoy))| RatedObservation {
                date: start.checked_add_months(Months::new(i as u32)).unwrap(),
                category_code: "CP00".into(),
                value: 100.0,
                mom,
                yoy,
            })
            .collect()
    }

    #[test]
    fn summarises_peak_latest_and_trailing_year() {
        let mut points = vec![(Some(0.1), None); 3];
        points.push((Some(0.5), Some(6.0)));
        points.push((Some(-0.2), Some(6.0)));
        points.extend(vec![(Some(0.3), Some(2.0)); 12]);
        let rows = head(&points);
        let s = headline_summary(&rows).unwrap();
        assert_eq!(s.peak_yoy, 6.0);
        assert_eq!(s.peak_date, NaiveDate::from_ymd_opt(2021, 4, 1).unwrap());
        assert_eq!(s.latest_yoy, 2.0);
        assert_eq!(s.trailing_avg_yoy, 2.0);
        assert_eq!(s.positive_mom_months, 12);
    }

    #[test]
    fn short_series_uses_what_exists() {
        let rows = head(&[(Some(1.0), Some(1.0)), (Some(-1.0), Some(3.0))]);
        let s = headline_summary(&rows).unwrap();
        assert_eq!(s.trailing_avg_yoy, 2.0);
        assert_eq!(s.positive_mom_months, 1);
        assert_eq!(s.latest_date, NaiveDate::from_ymd_opt(2021, 2, 1).unwrap());
    }

    #[test]
    fn no_yoy_means_no_summary() {
        assert!(headline_summary(&head(&[(Some(1.0), None)])).is_none());
        assert!(headline_summary(&[]).is_none());
    }
}
