//! Descriptive statistics over a monthly HICP series: growth rates, gaps
//! against the headline, volatility and seasonal profiles.

pub mod analyzer;
pub mod config;
pub mod labels;
pub mod model;
pub mod normalizer;
pub mod parser;
pub mod quality;
pub mod report;
pub mod storage;
pub mod utils;
