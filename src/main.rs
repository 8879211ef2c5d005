use hicp_lens::config::{AppConfig, load_config};
use hicp_lens::parser::ObservationParser;
use hicp_lens::report::{DashboardReport, build_report, write_report};
use hicp_lens::storage::SessionCache;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info, warn};

fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let config_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("config.json"));

    let config: AppConfig = match load_config(&config_path) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Config load error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let delimiter = match config.delimiter_byte() {
        Ok(d) => d,
        Err(e) => {
            error!("Config load error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let mut cache = SessionCache::new(
        ObservationParser::with_delimiter(delimiter),
        config.filters.clone(),
    );

    let report = match build_report(&config, &mut cache) {
        Ok(r) => r,
        Err(e) => {
            error!("Pipeline failed: {}", e);
            return ExitCode::FAILURE;
        }
    };

    log_findings(&report);

    if let Err(e) = write_report(&report, &config.report_path) {
        error!("{}", e);
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}

/// Logs the headline story the dashboard pages would render.
fn log_findings(report: &DashboardReport) {
    let q = &report.quality;
    info!(
        "Rows: {} | missing cells: {} | duplicates: {} | months: {}",
        q.rows, q.missing_total, q.duplicate_rows, q.unique_months
    );

    let analysis = &report.analysis;
    match &analysis.summary {
        Some(s) => info!(
            "Headline: peak {:.2}% ({}) | latest {:.2}% ({}) | 12-month avg {:.2}% | {} positive months",
            s.peak_yoy,
            s.peak_date,
            s.latest_yoy,
            s.latest_date,
            s.trailing_avg_yoy,
            s.positive_mom_months
        ),
        None => warn!("No data: headline series has no year-over-year values"),
    }

    if analysis.gaps.is_empty() {
        warn!("No data: no categories to compare with the headline");
    }
    for gap in &analysis.gaps {
        match gap.gap {
            Some(g) => info!("Gap {:<60} {:+.2} pp", report.label_for(&gap.category_code), g),
            None => info!("Gap {:<60} n/a", report.label_for(&gap.category_code)),
        }
    }

    for score in &analysis.volatility {
        info!(
            "Volatility {:<60} vol = {} | persistence = {:.3}",
            report.label_for(&score.category_code),
            score.vol.map_or_else(|| "n/a".to_string(), |v| format!("{v:.3}")),
            score.persistence
        );
    }

    if let Some(shift) = analysis.seasonal_shifts.first() {
        if let Some(delta) = shift.mean_delta {
            info!(
                "Largest seasonal shift: {} ({:+.2} pp avg MoM post - pre)",
                report.label_for(&shift.category_code),
                delta
            );
        }
    }
}
