// Delimited-file ingestion for observations and label metadata.

pub mod metadata;
pub mod observations;

pub use metadata::MetadataParser;
pub use observations::ObservationParser;

use crate::model::ParserError;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Source dataset separator.
pub const DEFAULT_DELIMITER: u8 = b';';

pub trait Parser {
    type Output;

    fn parse<R: Read>(&self, input: R) -> Result<Self::Output, ParserError>;

    /// Opens `path` and parses it; an unreadable file is fatal.
    fn load(&self, path: &Path) -> Result<Self::Output, ParserError> {
        debug!("Opening {}", path.display());
        let file = File::open(path).map_err(|source| ParserError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.parse(file)
    }
}

/// Lower-cases and trims a header, then applies the column rename table.
pub(crate) fn normalize_header(raw: &str) -> String {
    let name = raw.trim().to_lowercase();
    match name.as_str() {
        "time_period" => "date".into(),
        "obs_value" => "value".into(),
        "freq" => "frequency".into(),
        "idx_type" => "index_type".into(),
        "seasonal_adjust" => "seasonal_adjustment".into(),
        "expenditure_1999" => "category_code".into(),
        _ => name,
    }
}

/// Position of `name` among the normalized headers.
pub(crate) fn column_index(headers: &[String], name: &str) -> Option<usize> {
    headers.iter().position(|h| h == name)
}

pub(crate) fn require_column(headers: &[String], name: &str) -> Result<usize, ParserError> {
    column_index(headers, name).ok_or_else(|| ParserError::MissingColumn(name.to_string()))
}

pub(crate) fn reader<R: Read>(input: R, delimiter: u8) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::Headers)
        .from_reader(input)
}
