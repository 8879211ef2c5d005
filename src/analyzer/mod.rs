// Analyzer module: aggregates submodules for different aspects of analysis.

pub mod gap;
pub mod pipeline;
pub mod rates;
pub mod seasonality;
pub mod summary;
pub mod volatility;

// Re-export the main Analyzer implementation for ease of use.
pub use pipeline::{AnalysisResult, Analyzer, AnalyzerImpl};
