use crate::config::FilterConfig;
use crate::model::{ObservationTable, ParserError};
use crate::normalizer::{CleanObservation, normalize_all};
use crate::parser::{ObservationParser, Parser};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::SystemTime;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    path: PathBuf,
    modified: Option<SystemTime>,
}

/// Raw and filtered tables loaded from one file.
#[derive(Debug)]
pub struct PreparedData {
    pub raw: ObservationTable,
    pub clean: Vec<CleanObservation>,
}

/// Memoizes ingestion and filtering for the lifetime of one session.
/// Entries are keyed by path and modification time, so a rewritten file
/// is loaded again.
pub struct SessionCache {
    parser: ObservationParser,
    filters: FilterConfig,
    entries: HashMap<CacheKey, Rc<PreparedData>>,
}

impl SessionCache {
    pub fn new(parser: ObservationParser, filters: FilterConfig) -> Self {
        Self {
            parser,
            filters,
            entries: HashMap::new(),
        }
    }

    fn key_for(path: &Path) -> Result<CacheKey, ParserError> {
        let meta = fs::metadata(path).map_err(|source| ParserError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(CacheKey {
            path: path.to_path_buf(),
            modified: meta.modified().ok(),
        })
    }

    /// Loads and filters `path`, or returns the memoized result.
    pub fn prepare(&mut self, path: &Path) -> Result<Rc<PreparedData>, ParserError> {
        let key = Self::key_for(path)?;
        if let Some(hit) = self.entries.get(&key) {
            debug!("Cache hit for {}", path.display());
            return Ok(Rc::clone(hit));
        }

        info!("Loading {}", path.display());
        let raw = self.parser.load(path)?;
        let clean = normalize_all(&raw, &self.filters);
        let prepared = Rc::new(PreparedData { raw, clean });

        // a newer version replaces whatever was cached for this path
        self.entries.retain(|k, _| k.path != key.path);
        self.entries.insert(key, Rc::clone(&prepared));
        Ok(prepared)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
