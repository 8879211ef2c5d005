// Output bundle handed to the presentation layer.
use crate::analyzer::{AnalysisResult, AnalyzerImpl};
use crate::config::AppConfig;
use crate::labels::LabelResolver;
use crate::model::{HEADLINE_CODE, LabelledCode, PipelineError};
use crate::parser::{MetadataParser, Parser};
use crate::quality::{QualityReport, basic_quality};
use crate::storage::SessionCache;
use serde::Serialize;
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Clone, Serialize)]
pub struct DashboardReport {
    pub quality: QualityReport,
    pub labels: Vec<LabelledCode>,
    pub analysis: AnalysisResult,
}

impl DashboardReport {
    pub fn label_for<'a>(&'a self, code: &'a str) -> &'a str {
        self.labels
            .iter()
            .find(|l| l.code == code)
            .map(LabelledCode::display)
            .unwrap_or(code)
    }
}

/// Headline first, then every category code seen in the analysis.
fn codes_in(analysis: &AnalysisResult) -> Vec<String> {
    let cats: BTreeSet<&str> = analysis
        .categories
        .iter()
        .map(|r| r.category_code.as_str())
        .collect();
    std::iter::once(HEADLINE_CODE)
        .chain(cats)
        .map(str::to_string)
        .collect()
}

/// Loads, prepares and analyzes the configured dataset.
pub fn build_report(
    config: &AppConfig,
    cache: &mut SessionCache,
) -> Result<DashboardReport, PipelineError> {
    let prepared = cache.prepare(&config.data_path)?;
    let metadata = MetadataParser::with_delimiter(config.delimiter_byte()?)
        .load(&config.metadata_path)?;
    let resolver = LabelResolver::new(metadata);

    let analysis =
        AnalyzerImpl::from_config(config).analyze(&prepared.clean, config.range.as_ref());
    if analysis.categories.is_empty() {
        warn!("No category rows matched; category tables are empty");
    }

    let labels = resolver.resolve_all(&codes_in(&analysis));
    Ok(DashboardReport {
        quality: basic_quality(&prepared.raw),
        labels,
        analysis,
    })
}

pub fn write_report(report: &DashboardReport, path: &Path) -> Result<(), PipelineError> {
    let json = serde_json::to_string_pretty(report)?;
    fs::write(path, json).map_err(|source| PipelineError::Report {
        path: path.to_path_buf(),
        source,
    })?;
    info!("Report written to {}", path.display());
    Ok(())
}
