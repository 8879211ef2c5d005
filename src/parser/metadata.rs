// Metadata (code -> label) parsing
use super::{DEFAULT_DELIMITER, Parser, normalize_header, reader, require_column};
use crate::model::ParserError;
use std::collections::HashSet;
use std::io::Read;
use tracing::info;

/// Variable name whose modalities are the expenditure categories.
pub const EXPENDITURE_VARIABLE: &str = "EXPENDITURE_1999";

/// Reads the long-format metadata table into `(code, label)` pairs.
pub struct MetadataParser {
    delimiter: u8,
    variable: String,
}

impl MetadataParser {
    pub fn new() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER,
            variable: EXPENDITURE_VARIABLE.to_string(),
        }
    }

    pub fn with_delimiter(delimiter: u8) -> Self {
        Self {
            delimiter,
            ..Self::new()
        }
    }
}

impl Default for MetadataParser {
    fn default() -> Self {
        Self::new()
    }
}

impl Parser for MetadataParser {
    type Output = Vec<(String, String)>;

    fn parse<R: Read>(&self, input: R) -> Result<Self::Output, ParserError> {
        let mut rdr = reader(input, self.delimiter);
        let headers: Vec<String> = rdr.headers()?.iter().map(normalize_header).collect();
        let var_idx = require_column(&headers, "cod_var")?;
        let code_idx = require_column(&headers, "cod_mod")?;
        let label_idx = require_column(&headers, "lib_mod")?;

        let mut seen = HashSet::new();
        let mut labels = Vec::new();
        for record in rdr.records() {
            let record = record?;
            if record.get(var_idx).map(str::trim) != Some(self.variable.as_str()) {
                continue;
            }
            let code = record.get(code_idx).unwrap_or_default().trim();
            let label = record.get(label_idx).unwrap_or_default().trim();
            if code.is_empty() || label.is_empty() {
                continue;
            }
            // first label per code wins
            if seen.insert(code.to_string()) {
                labels.push((code.to_string(), label.to_string()));
            }
        }

        info!("Loaded {} category labels", labels.len());
        Ok(labels)
    }
}
