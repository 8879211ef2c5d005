use crate::config::LagMode;
use crate::model::{HEADLINE_CODE, RatedObservation};
use crate::normalizer::CleanObservation;
use crate::utils::months_before;
use chrono::NaiveDate;
use std::collections::HashMap;
use tracing::debug;

const MOM_LAG: usize = 1;
const YOY_LAG: usize = 12;

/// Percentage change from `base` to `current`; zero base gives no rate.
fn pct_change(current: f64, base: f64) -> Option<f64> {
    if base == 0.0 {
        return None;
    }
    let rate = (current / base - 1.0) * 100.0;
    rate.is_finite().then_some(rate)
}

/// `true` for the second-level `CPnn` codes, headline excluded.
pub fn is_top_category(code: &str) -> bool {
    let bytes = code.as_bytes();
    bytes.len() == 4
        && code.starts_with("CP")
        && bytes[2].is_ascii_digit()
        && bytes[3].is_ascii_digit()
        && code != HEADLINE_CODE
}

/// Annotates every row with `mom` and `yoy`, each category on its own.
/// Output keeps the input row order.
pub fn compute_rates(rows: &[CleanObservation], mode: LagMode) -> Vec<RatedObservation> {
    let rates = match mode {
        LagMode::Positional => positional_rates(rows),
        LagMode::Calendar => calendar_rates(rows),
    };
    rows.iter()
        .zip(rates)
        .map(|(obs, (mom, yoy))| RatedObservation {
            date: obs.date,
            category_code: obs.category_code.clone(),
            value: obs.value,
            mom,
            yoy,
        })
        .collect()
}

type Rates = (Option<f64>, Option<f64>);

fn positional_rates(rows: &[CleanObservation]) -> Vec<Rates> {
    let mut history: HashMap<&str, Vec<f64>> = HashMap::new();
    rows.iter()
        .map(|obs| {
            let series = history.entry(obs.category_code.as_str()).or_default();
            let lagged = |lag: usize| {
                series
                    .len()
                    .checked_sub(lag)
                    .and_then(|i| pct_change(obs.value, series[i]))
            };
            let rates = (lagged(MOM_LAG), lagged(YOY_LAG));
            series.push(obs.value);
            rates
        })
        .collect()
}

fn calendar_rates(rows: &[CleanObservation]) -> Vec<Rates> {
    // later duplicates overwrite earlier ones
    let index: HashMap<(&str, NaiveDate), f64> = rows
        .iter()
        .map(|obs| ((obs.category_code.as_str(), obs.date), obs.value))
        .collect();
    rows.iter()
        .map(|obs| {
            let lagged = |months: u32| {
                let past = months_before(obs.date, months)?;
                let base = index.get(&(obs.category_code.as_str(), past))?;
                pct_change(obs.value, *base)
            };
            (lagged(MOM_LAG as u32), lagged(YOY_LAG as u32))
        })
        .collect()
}

/// The headline series with its rates.
pub fn headline(rows: &[CleanObservation], mode: LagMode) -> Vec<RatedObservation> {
    let head: Vec<CleanObservation> = rows
        .iter()
        .filter(|obs| obs.category_code == HEADLINE_CODE)
        .cloned()
        .collect();
    debug!("Headline rows: {}", head.len());
    compute_rates(&head, mode)
}

/// The second-level category series with their rates.
pub fn top_categories(rows: &[CleanObservation], mode: LagMode) -> Vec<RatedObservation> {
    let cats: Vec<CleanObservation> = rows
        .iter()
        .filter(|obs| is_top_category(&obs.category_code))
        .cloned()
        .collect();
    debug!("Category rows: {}", cats.len());
    compute_rates(&cats, mode)
}
