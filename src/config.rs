use crate::model::ConfigError;
use chrono::NaiveDate;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// How the rate engine finds the reference observation for a lag.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LagMode {
    /// N rows back within the category series, regardless of calendar gaps.
    #[default]
    Positional,
    /// Exactly N calendar months back; a missing month yields no rate.
    Calendar,
}

/// Inclusive calendar-year range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct YearRange {
    pub start: i32,
    pub end: i32,
}

impl YearRange {
    pub const fn new(start: i32, end: i32) -> Self {
        Self { start, end }
    }

    pub fn contains(&self, year: i32) -> bool {
        (self.start..=self.end).contains(&year)
    }
}

/// Inclusive date range used to narrow a rated table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    pub frequency: String,
    pub seasonal_adjustment: String,
    pub index_type: String,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            frequency: "M".into(),
            seasonal_adjustment: "N".into(),
            index_type: "HICP".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub data_path: PathBuf,
    pub metadata_path: PathBuf,
    pub report_path: PathBuf,
    pub delimiter: char,
    pub filters: FilterConfig,
    pub lag_mode: LagMode,
    pub pre_years: YearRange,
    pub post_years: YearRange,
    pub range: Option<DateRange>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from("data/DS_IPCH_M_data.csv"),
            metadata_path: PathBuf::from("data/DS_IPCH_M_metadata.csv"),
            report_path: PathBuf::from("report.json"),
            delimiter: ';',
            filters: FilterConfig::default(),
            lag_mode: LagMode::default(),
            pre_years: YearRange::new(2016, 2019),
            post_years: YearRange::new(2020, 2025),
            range: None,
        }
    }
}

impl AppConfig {
    /// Delimiter as the single byte the CSV reader expects.
    pub fn delimiter_byte(&self) -> Result<u8, ConfigError> {
        u8::try_from(self.delimiter)
            .ok()
            .filter(u8::is_ascii)
            .ok_or_else(|| {
                ConfigError::Invalid(format!("delimiter {:?} is not ASCII", self.delimiter))
            })
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.delimiter_byte()?;
        for (name, years) in [("pre_years", self.pre_years), ("post_years", self.post_years)] {
            if years.start > years.end {
                return Err(ConfigError::Invalid(format!(
                    "{name}: start {} is after end {}",
                    years.start, years.end
                )));
            }
        }
        if let Some(range) = self.range {
            if range.start > range.end {
                return Err(ConfigError::Invalid(format!(
                    "range: start {} is after end {}",
                    range.start, range.end
                )));
            }
        }
        Ok(())
    }
}

pub fn parse_config(content: &str) -> Result<AppConfig, ConfigError> {
    let config: AppConfig = serde_json::from_str(content)?;
    config.validate()?;
    Ok(config)
}

pub fn load_config(path: &Path) -> Result<AppConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&content)
}
