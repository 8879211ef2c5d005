use crate::analyzer::gap::last12_gap_vs_headline;
use crate::analyzer::rates;
use crate::analyzer::seasonality::{seasonal_shifts, seasonality_profiles};
use crate::analyzer::summary::headline_summary;
use crate::analyzer::volatility::{median_yoy, volatility_persistence};
use crate::config::{AppConfig, DateRange, LagMode, YearRange};
use crate::model::{
    GapRecord, HeadlineSummary, RatedObservation, SeasonalProfile, SeasonalShift, VolatilityScore,
};
use crate::normalizer::{CleanObservation, within_range};
use serde::Serialize;
use tracing::info;

/// Interface the presentation layer calls into.
pub trait Analyzer {
    fn headline(&self, rows: &[CleanObservation]) -> Vec<RatedObservation>;
    fn categories(&self, rows: &[CleanObservation]) -> Vec<RatedObservation>;
    fn gap_vs_headline(
        &self,
        categories: &[RatedObservation],
        headline: &[RatedObservation],
    ) -> Vec<GapRecord>;
    fn volatility(&self, categories: &[RatedObservation]) -> Vec<VolatilityScore>;
    fn seasonality(&self, categories: &[RatedObservation]) -> Vec<SeasonalProfile>;
}

/// Analyzer configured with a lag mode and the two seasonal eras.
pub struct AnalyzerImpl {
    lag_mode: LagMode,
    pre: YearRange,
    post: YearRange,
}

impl AnalyzerImpl {
    pub fn new(lag_mode: LagMode, pre: YearRange, post: YearRange) -> Self {
        Self { lag_mode, pre, post }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(config.lag_mode, config.pre_years, config.post_years)
    }
}

impl Default for AnalyzerImpl {
    fn default() -> Self {
        Self::from_config(&AppConfig::default())
    }
}

impl Analyzer for AnalyzerImpl {
    fn headline(&self, rows: &[CleanObservation]) -> Vec<RatedObservation> {
        rates::headline(rows, self.lag_mode)
    }

    fn categories(&self, rows: &[CleanObservation]) -> Vec<RatedObservation> {
        rates::top_categories(rows, self.lag_mode)
    }

    fn gap_vs_headline(
        &self,
        categories: &[RatedObservation],
        headline: &[RatedObservation],
    ) -> Vec<GapRecord> {
        last12_gap_vs_headline(categories, headline)
    }

    fn volatility(&self, categories: &[RatedObservation]) -> Vec<VolatilityScore> {
        volatility_persistence(categories)
    }

    fn seasonality(&self, categories: &[RatedObservation]) -> Vec<SeasonalProfile> {
        seasonality_profiles(categories, &self.pre, &self.post)
    }
}

/// Every derived table for one prepared dataset.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisResult {
    pub headline: Vec<RatedObservation>,
    pub categories: Vec<RatedObservation>,
    pub summary: Option<HeadlineSummary>,
    pub gaps: Vec<GapRecord>,
    pub volatility: Vec<VolatilityScore>,
    pub median_yoy: Vec<(String, f64)>,
    pub seasonality: Vec<SeasonalProfile>,
    pub seasonal_shifts: Vec<SeasonalShift>,
}

impl AnalyzerImpl {
    /// Runs the full pipeline. Rates are always computed on the complete
    /// history; `range` only narrows the rated tables before the analytics.
    pub fn analyze(&self, rows: &[CleanObservation], range: Option<&DateRange>) -> AnalysisResult {
        let mut headline = self.headline(rows);
        let mut categories = self.categories(rows);
        if let Some(range) = range {
            headline = within_range(&headline, range);
            categories = within_range(&categories, range);
            info!("Restricted to {} .. {}", range.start, range.end);
        }

        let summary = headline_summary(&headline);
        let gaps = self.gap_vs_headline(&categories, &headline);
        let volatility = self.volatility(&categories);
        let median_yoy = median_yoy(&categories);
        let seasonality = self.seasonality(&categories);
        let seasonal_shifts = seasonal_shifts(&seasonality);

        info!(
            "Analysis done: {} headline rows, {} category rows, {} categories ranked",
            headline.len(),
            categories.len(),
            gaps.len()
        );

        AnalysisResult {
            headline,
            categories,
            summary,
            gaps,
            volatility,
            median_yoy,
            seasonality,
            seasonal_shifts,
        }
    }
}
