use chrono::{Datelike, Months, NaiveDate};
use hicp_lens::config::{AppConfig, YearRange, parse_config};
use hicp_lens::parser::ObservationParser;
use hicp_lens::report::{build_report, write_report};
use hicp_lens::storage::SessionCache;
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

fn month(i: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2018, 1, 1)
        .unwrap()
        .checked_add_months(Months::new(i))
        .unwrap()
}

/// Headline and CP01 rise linearly for three years, CP07 only has five months,
/// CP011 is a sub-category and an annual row must be filtered out by frequency.
fn write_dataset(dir: &Path) -> (std::path::PathBuf, std::path::PathBuf) {
    let mut data =
        String::from("TIME_PERIOD;OBS_VALUE;FREQ;IDX_TYPE;SEASONAL_ADJUST;EXPENDITURE_1999\n");
    for i in 0..36 {
        let d = month(i);
        let period = format!("{}-{:02}", d.year(), d.month());
        let head = format!("{:.1}", 100.0 + i as f64 * 0.5).replace('.', ",");
        writeln!(data, "{period};{head};M;HICP;N;CP00").unwrap();
        writeln!(data, "{period};{};M;HICP;N;CP01", 100.0 + i as f64).unwrap();
        writeln!(data, "{period};{};M;HICP;N;CP011", 50.0 + i as f64).unwrap();
        if i < 5 {
            writeln!(data, "{period};{};M;HICP;N;CP07", 80.0 + i as f64).unwrap();
        }
    }
    data.push_str("2018-01;999;A;HICP;N;CP00\n");
    data.push_str("2018-06;;M;HICP;N;CP00\n");

    let meta = "\
COD_VAR;LIB_VAR;COD_MOD;LIB_MOD
EXPENDITURE_1999;Classification;CP00;Ensemble des produits
EXPENDITURE_1999;Classification;CP01;Produits alimentaires
";
    let data_path = dir.join("data.csv");
    let meta_path = dir.join("meta.csv");
    fs::write(&data_path, data).unwrap();
    fs::write(&meta_path, meta).unwrap();
    (data_path, meta_path)
}

fn config_for(dir: &Path) -> AppConfig {
    let (data_path, metadata_path) = write_dataset(dir);
    AppConfig {
        data_path,
        metadata_path,
        report_path: dir.join("report.json"),
        pre_years: YearRange::new(2018, 2018),
        post_years: YearRange::new(2019, 2020),
        ..AppConfig::default()
    }
}

#[test]
fn end_to_end_report() {
    let dir = tempfile::tempdir().unwrap();
    let config = config_for(dir.path());
    let mut cache = SessionCache::new(ObservationParser::new(), config.filters.clone());
    let report = build_report(&config, &mut cache).unwrap();

    assert_eq!(report.quality.rows, 36 * 3 + 5 + 2);
    assert_eq!(report.quality.missing_total, 1);
    assert_eq!(report.quality.start, NaiveDate::from_ymd_opt(2018, 1, 1));

    let analysis = &report.analysis;
    assert_eq!(analysis.headline.len(), 36);
    let yoys: Vec<f64> = analysis.headline.iter().filter_map(|r| r.yoy).collect();
    assert_eq!(yoys.len(), 24);
    assert!(yoys.iter().all(|y| *y > 0.0));
    assert!(yoys.windows(2).all(|w| w[1] < w[0]));

    // CP07 has five months only: no yoy anywhere
    assert!(
        analysis
            .categories
            .iter()
            .filter(|r| r.category_code == "CP07")
            .all(|r| r.yoy.is_none())
    );
    assert!(analysis.categories.iter().all(|r| r.category_code != "CP011"));

    let cp07 = analysis
        .volatility
        .iter()
        .find(|s| s.category_code == "CP07")
        .unwrap();
    assert_eq!(cp07.n, 0);

    assert_eq!(analysis.gaps.len(), 1);
    assert_eq!(analysis.gaps[0].category_code, "CP01");
    assert!(analysis.gaps[0].gap.unwrap() > 0.0);

    // metadata label wins, fallback fills the rest
    assert_eq!(report.label_for("CP01"), "Produits alimentaires");
    assert_eq!(report.label_for("CP07"), "Transport");
    assert_eq!(report.label_for("CP00"), "Ensemble des produits");

    let jan = analysis
        .seasonality
        .iter()
        .find(|p| p.category_code == "CP07" && p.month == 1)
        .unwrap();
    assert_eq!(jan.mom_pre, None);
    assert_eq!(jan.mom_post, None);

    write_report(&report, &config.report_path).unwrap();
    let written: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&config.report_path).unwrap()).unwrap();
    assert!(written["analysis"]["gaps"].is_array());
    assert_eq!(written["labels"][0]["code"], "CP00");
}

#[test]
fn calendar_mode_from_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let base = config_for(dir.path());
    let json = format!(
        r#"{{ "data_path": {:?}, "metadata_path": {:?}, "lag_mode": "calendar" }}"#,
        base.data_path, base.metadata_path
    );
    let config = parse_config(&json).unwrap();
    let mut cache = SessionCache::new(ObservationParser::new(), config.filters.clone());
    let report = build_report(&config, &mut cache).unwrap();

    // the blank extra June row is dropped, June itself still feeds July's mom
    let july = report
        .analysis
        .headline
        .iter()
        .find(|r| r.date == month(6))
        .unwrap();
    assert!(july.mom.is_some());
    assert_eq!(report.analysis.headline.len(), 36);
}

#[test]
fn missing_metadata_file_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config_for(dir.path());
    config.metadata_path = dir.path().join("absent.csv");
    let mut cache = SessionCache::new(ObservationParser::new(), config.filters.clone());
    let err = build_report(&config, &mut cache).unwrap_err();
    assert!(err.to_string().contains("absent.csv"));
}
