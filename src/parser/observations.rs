// Observation file parsing
use super::{DEFAULT_DELIMITER, Parser, column_index, normalize_header, reader, require_column};
use crate::model::{FilterColumns, Observation, ObservationTable, ParserError};
use crate::utils::{parse_decimal, parse_month};
use std::io::Read;
use tracing::{info, warn};

pub struct ObservationParser {
    delimiter: u8,
}

impl ObservationParser {
    pub fn new() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER,
        }
    }

    pub fn with_delimiter(delimiter: u8) -> Self {
        Self { delimiter }
    }
}

impl Default for ObservationParser {
    fn default() -> Self {
        Self::new()
    }
}

fn optional_cell(record: &csv::StringRecord, idx: Option<usize>) -> Option<String> {
    let cell = record.get(idx?)?.trim();
    (!cell.is_empty()).then(|| cell.to_string())
}

impl Parser for ObservationParser {
    type Output = ObservationTable;

    fn parse<R: Read>(&self, input: R) -> Result<ObservationTable, ParserError> {
        let mut rdr = reader(input, self.delimiter);
        let headers: Vec<String> = rdr.headers()?.iter().map(normalize_header).collect();

        let date_idx = require_column(&headers, "date")?;
        let value_idx = require_column(&headers, "value")?;
        let code_idx = require_column(&headers, "category_code")?;
        let freq_idx = column_index(&headers, "frequency");
        let index_type_idx = column_index(&headers, "index_type");
        let adjust_idx = column_index(&headers, "seasonal_adjustment");

        let columns = FilterColumns {
            frequency: freq_idx.is_some(),
            index_type: index_type_idx.is_some(),
            seasonal_adjustment: adjust_idx.is_some(),
        };

        let mut observations = Vec::new();
        let mut bad_dates = 0usize;
        let mut bad_values = 0usize;

        for record in rdr.records() {
            let record = record?;
            let date = record.get(date_idx).and_then(parse_month);
            let value = record.get(value_idx).and_then(parse_decimal);
            if date.is_none() {
                bad_dates += 1;
            }
            if value.is_none() {
                bad_values += 1;
            }

            observations.push(Observation {
                date,
                category_code: record.get(code_idx).unwrap_or_default().trim().to_string(),
                value,
                frequency: optional_cell(&record, freq_idx),
                index_type: optional_cell(&record, index_type_idx),
                seasonal_adjustment: optional_cell(&record, adjust_idx),
            });
        }

        if bad_dates > 0 || bad_values > 0 {
            warn!(
                "Unparseable cells: {} dates, {} values (kept as absent)",
                bad_dates, bad_values
            );
        }
        info!("Parsed {} observations", observations.len());

        Ok(ObservationTable {
            columns,
            observations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const SAMPLE: &str = "\
TIME_PERIOD;OBS_VALUE; FREQ ;IDX_TYPE;SEASONAL_ADJUST;EXPENDITURE_1999
2020-01;104,5;M;HICP;N;CP00
2020-02;105.1;M;HICP;N;CP01
bad-date;100;M;HICP;N;CP01
2020-03;:;M;HICP;N;CP01
";

    #[test]
    fn parses_rows_and_keeps_unparseable_cells_as_absent() {
        let table = ObservationParser::new().parse(SAMPLE.as_bytes()).unwrap();
        assert_eq!(table.observations.len(), 4);
        assert_eq!(
            table.columns,
            FilterColumns {
                frequency: true,
                index_type: true,
                seasonal_adjustment: true
            }
        );

        let first = &table.observations[0];
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2020, 1, 1));
        assert_eq!(first.value, Some(104.5));
        assert_eq!(first.category_code, "CP00");
        assert_eq!(first.frequency.as_deref(), Some("M"));

        assert_eq!(table.observations[2].date, None);
        assert_eq!(table.observations[2].value, Some(100.0));
        assert_eq!(table.observations[3].value, None);
    }

    #[test]
    fn optional_filter_columns_may_be_absent() {
        let csv = "date;value;category_code\n2021-05-01;1,5;CP07\n";
        let table = ObservationParser::new().parse(csv.as_bytes()).unwrap();
        assert_eq!(table.columns, FilterColumns::default());
        assert_eq!(table.observations[0].frequency, None);
    }

    #[test]
    fn missing_value_column_is_fatal() {
        let csv = "time_period;freq;expenditure_1999\n2020-01;M;CP00\n";
        let err = ObservationParser::new().parse(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, ParserError::MissingColumn(ref c) if c == "value"));
    }

    #[test]
    fn custom_delimiter() {
        let csv = "TIME_PERIOD,OBS_VALUE,EXPENDITURE_1999\n2020-01,100,CP00\n";
        let table = ObservationParser::with_delimiter(b',')
            .parse(csv.as_bytes())
            .unwrap();
        assert_eq!(table.observations[0].value, Some(100.0));
    }

    #[test]
    fn non_finite_values_are_absent() {
        let csv = "date;value;category_code\n2021-01;NaN;CP00\n2021-02;inf;CP00\n";
        let table = ObservationParser::new().parse(csv.as_bytes()).unwrap();
        assert!(table.observations.iter().all(|o| o.value.is_none()));
    }

    #[test]
    fn missing_file_is_fatal() {
        let err = ObservationParser::new()
            .load(std::path::Path::new("/definitely/not/here.csv"))
            .unwrap_err();
        assert!(matches!(err, ParserError::Io { .. }));
    }
}
