//! The canonical, read-only table every aggregation runs against.

use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};
use tracing::info;

use crate::error::LoadError;
use crate::loader::{RawRow, load_rows};
use crate::model::{Borough, SchoolRecord};
use crate::normalizer::{SkippedRow, normalize_all};

/// Fully materialized, cleaned dataset. Never mutated after construction.
#[derive(Debug, Default)]
pub struct CanonicalTable {
    records: Vec<SchoolRecord>,
    skipped: Vec<SkippedRow>,
    source: Option<PathBuf>,
}

impl CanonicalTable {
    /// Loads and normalizes the file at `path`.
    #[tracing::instrument(skip_all, fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        let rows = load_rows(path)?;
        let mut table = Self::from_rows(&rows);
        table.source = Some(path.to_path_buf());

        info!(
            records = table.records.len(),
            skipped = table.skipped.len(),
            "Canonical table built"
        );
        Ok(table)
    }

    pub fn from_rows(rows: &[RawRow]) -> Self {
        let (records, skipped) = normalize_all(rows);
        Self {
            records,
            skipped,
            source: None,
        }
    }

    pub fn from_records(records: Vec<SchoolRecord>) -> Self {
        Self {
            records,
            ..Default::default()
        }
    }

    pub fn records(&self) -> &[SchoolRecord] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &SchoolRecord> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Rows dropped during normalization.
    pub fn skipped(&self) -> &[SkippedRow] {
        &self.skipped
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn in_borough(&self, borough: Borough) -> impl Iterator<Item = &SchoolRecord> {
        self.iter().filter(move |r| r.borough == borough)
    }

    pub fn for_school<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a SchoolRecord> {
        self.iter().filter(move |r| r.name == name)
    }
}

/// Holder that lets the table be rebuilt while readers keep using their
/// snapshot. A new table is fully built before it replaces the old one.
#[derive(Debug, Default)]
pub struct SharedTable {
    current: RwLock<Arc<CanonicalTable>>,
}

impl SharedTable {
    pub fn new(table: CanonicalTable) -> Self {
        Self {
            current: RwLock::new(Arc::new(table)),
        }
    }

    /// Current table. The returned snapshot is unaffected by later swaps.
    pub fn snapshot(&self) -> Arc<CanonicalTable> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Builds a table from `path` and swaps it in. On error the current
    /// table is left untouched.
    pub fn reload(&self, path: &Path) -> Result<Arc<CanonicalTable>, LoadError> {
        let table = Arc::new(CanonicalTable::load(path)?);
        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Arc::clone(&table);
        Ok(table)
    }
}
