// Core structs: Observation, RatedObservation, analytics records and errors
use chrono::NaiveDate;
use serde::Serialize;
use std::path::PathBuf;

/// Reserved code of the "all items" aggregate.
pub const HEADLINE_CODE: &str = "CP00";

/// One raw row of the observation file.
#[derive(Debug, Clone, PartialEq)]
pub struct Observation {
    pub date: Option<NaiveDate>,
    pub category_code: String,
    pub value: Option<f64>,
    pub frequency: Option<String>,
    pub index_type: Option<String>,
    pub seasonal_adjustment: Option<String>,
}

/// Which optional filter columns were present in the source header.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterColumns {
    pub frequency: bool,
    pub index_type: bool,
    pub seasonal_adjustment: bool,
}

#[derive(Debug, Clone, Default)]
pub struct ObservationTable {
    pub columns: FilterColumns,
    pub observations: Vec<Observation>,
}

/// A filtered observation annotated with its growth rates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatedObservation {
    pub date: NaiveDate,
    pub category_code: String,
    pub value: f64,
    pub mom: Option<f64>,
    pub yoy: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GapRecord {
    pub category_code: String,
    pub gap: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolatilityScore {
    pub category_code: String,
    pub vol: Option<f64>,
    pub n: usize,
    pub sign_changes: usize,
    pub persistence: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonalProfile {
    pub category_code: String,
    pub month: u32,
    pub mom_pre: Option<f64>,
    pub mom_post: Option<f64>,
}

/// Average change of seasonal intensity between the two eras.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonalShift {
    pub category_code: String,
    pub mean_delta: Option<f64>,
    pub strongest_month: Option<u32>,
    pub weakest_month: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeadlineSummary {
    pub peak_yoy: f64,
    pub peak_date: NaiveDate,
    pub latest_yoy: f64,
    pub latest_date: NaiveDate,
    pub trailing_avg_yoy: f64,
    pub positive_mom_months: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelledCode {
    pub code: String,
    pub label: Option<String>,
}

impl LabelledCode {
    /// Label when known, raw code otherwise.
    pub fn display(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.code)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ParserError {
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed delimited input: {0}")]
    Csv(#[from] csv::Error),
    #[error("required column `{0}` is missing")]
    MissingColumn(String),
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Parser(#[from] ParserError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("cannot write report {path}: {source}")]
    Report {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot encode report: {0}")]
    Encode(#[from] serde_json::Error),
}
