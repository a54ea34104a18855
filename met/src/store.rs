//! Table sources and the once-initialized table store
//!
//! The default table ships inside the binary. A [`MetStore`] parses its source
//! on first access and then hands out shared references; the application
//! creates one store at startup and passes it (or the table) to whatever needs
//! match equities.

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use log::{info, warn};

use crate::error::{MetError, Result};
use crate::parser::{parse, ParsedTable};
use crate::table::MatchEquityTable;

/// Source text of the embedded 25-away default table
pub const EMBEDDED_MET: &str = include_str!("../data/default.met");

impl MatchEquityTable {
    /// Parse the embedded default table
    pub fn embedded() -> Result<Self> {
        EMBEDDED_MET.parse()
    }

    /// Parse raw bytes, replacing invalid UTF-8 sequences
    pub fn from_bytes(bytes: &[u8]) -> Result<ParsedTable> {
        parse(&String::from_utf8_lossy(bytes))
    }

    /// Read and parse a table file
    pub fn from_path(path: impl AsRef<Path>) -> Result<ParsedTable> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| MetError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_bytes(&bytes)
    }
}

impl FromStr for MatchEquityTable {
    type Err = MetError;

    /// Parse source text, discarding recovered warnings
    fn from_str(source: &str) -> Result<Self> {
        parse(source).map(|parsed| parsed.table)
    }
}

/// Where a store loads its table from
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum MetSource {
    /// The table compiled into the binary
    #[default]
    Embedded,
    /// A MET file on disk
    File(PathBuf),
}

impl MetSource {
    /// Parse the source now, logging any recovered warnings
    pub fn load(&self) -> Result<MatchEquityTable> {
        let parsed = match self {
            MetSource::Embedded => parse(EMBEDDED_MET)?,
            MetSource::File(path) => MatchEquityTable::from_path(path)?,
        };
        for warning in &parsed.warnings {
            warn!("{}: {}", self, warning);
        }
        Ok(parsed.table)
    }
}

impl std::fmt::Display for MetSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetSource::Embedded => write!(f, "embedded table"),
            MetSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Lazily parsed, shared match equity table.
///
/// The first successful [`MetStore::get`] parses the source; concurrent first
/// calls are serialized so the source is parsed once. Later calls only clone
/// the `Arc`. A failed load is not cached, so a later call retries.
#[derive(Debug, Default)]
pub struct MetStore {
    source: MetSource,
    table: OnceLock<Arc<MatchEquityTable>>,
    loading: Mutex<()>,
}

impl MetStore {
    /// Create a store that will load from `source`
    pub fn new(source: MetSource) -> Self {
        MetStore {
            source,
            table: OnceLock::new(),
            loading: Mutex::new(()),
        }
    }

    /// Store backed by the embedded table
    pub fn embedded() -> Self {
        Self::new(MetSource::Embedded)
    }

    /// Where this store loads from
    pub fn source(&self) -> &MetSource {
        &self.source
    }

    /// Whether the table has been parsed yet
    pub fn is_loaded(&self) -> bool {
        self.table.get().is_some()
    }

    /// The table, parsing it on first access
    pub fn get(&self) -> Result<Arc<MatchEquityTable>> {
        if let Some(table) = self.table.get() {
            return Ok(Arc::clone(table));
        }

        let _guard = self.loading.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(table) = self.table.get() {
            return Ok(Arc::clone(table));
        }

        let table = Arc::new(self.source.load()?);
        info!(
            "loaded match equity table {:?} ({}-away) from {}",
            table.info().name,
            table.size(),
            self.source
        );
        Ok(Arc::clone(self.table.get_or_init(|| table)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_embedded_table_parses_cleanly() {
        let parsed = parse(EMBEDDED_MET).unwrap();
        assert!(parsed.warnings.is_empty(), "warnings: {:?}", parsed.warnings);
        assert_eq!(parsed.table.size(), 25);
        assert_eq!(parsed.table.pre_crawford().len(), 25);
        assert_eq!(parsed.table.post_crawford().len(), 25);
    }

    #[test]
    fn test_embedded_table_is_consistent() {
        let met = MatchEquityTable::embedded().unwrap();
        for p in 1..=25 {
            assert_eq!(met.mwc(p, p, false, false), 0.5, "even score {}-away", p);
            for o in 1..=25 {
                let sum = met.mwc(p, o, false, false) + met.mwc(o, p, false, false);
                assert!((sum - 1.0).abs() < 1e-4, "({}, {}) sums to {}", p, o, sum);
            }
        }
    }

    #[test]
    fn test_from_bytes_replaces_invalid_utf8() {
        let mut bytes = b"[Current]\nName=Bad \xff byte\n".to_vec();
        bytes.extend_from_slice(b"[PreCrawford]\n1=0.5\n[PostCrawford]\nData=0.5\n");
        let parsed = MatchEquityTable::from_bytes(&bytes).unwrap();
        assert_eq!(parsed.table.info().name, "Bad \u{fffd} byte");
    }

    #[test]
    fn test_from_path_missing_file() {
        let err = MatchEquityTable::from_path("/definitely/not/here.met").unwrap_err();
        assert!(matches!(err, MetError::Io { .. }));
    }

    #[test]
    fn test_from_path_reads_file() {
        let path = std::env::temp_dir().join(format!("gammon-met-{}.met", std::process::id()));
        std::fs::write(&path, "[PreCrawford]\n1=0.5\n[PostCrawford]\nData=0.5\n").unwrap();
        let store = MetStore::new(MetSource::File(path.clone()));
        assert_eq!(store.get().unwrap().size(), 1);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_store_parses_once_and_shares() {
        let store = MetStore::embedded();
        assert!(!store.is_loaded());
        let a = store.get().unwrap();
        let b = store.get().unwrap();
        assert!(store.is_loaded());
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_store_concurrent_first_access() {
        let store = MetStore::embedded();
        let tables: Vec<Arc<MatchEquityTable>> = thread::scope(|s| {
            let handles: Vec<_> = (0..8).map(|_| s.spawn(|| store.get().unwrap())).collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });
        for table in &tables {
            assert!(Arc::ptr_eq(table, &tables[0]));
        }
    }

    #[test]
    fn test_store_failed_load_is_not_cached() {
        let store = MetStore::new(MetSource::File(PathBuf::from("/definitely/not/here.met")));
        assert!(store.get().is_err());
        assert!(!store.is_loaded());
    }
}
