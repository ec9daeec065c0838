//! Ledger stores: deduplicating persistence keyed by transaction code.
//!
//! Re-importing an overlapping statement is normal, so a duplicate code is an
//! expected outcome and is counted as skipped rather than reported as an error.

use anyhow::{Context, Result};
use pesa_core::TransactionRecord;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::query::{Page, Pagination, TransactionFilter, query_records};

/// Counts reported back after a batch insert
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportOutcome {
    pub imported: usize,
    pub skipped: usize,
}

impl ImportOutcome {
    pub fn total(&self) -> usize {
        self.imported + self.skipped
    }
}

pub trait LedgerStore {
    /// Insert unless a record with the same code exists. Returns whether it was inserted.
    fn insert_if_absent(&mut self, record: TransactionRecord) -> Result<bool>;

    /// All stored records in insertion order
    fn records(&self) -> &[TransactionRecord];

    fn contains(&self, transaction_code: &str) -> bool;

    fn insert_batch(&mut self, records: Vec<TransactionRecord>) -> Result<ImportOutcome> {
        let mut outcome = ImportOutcome::default();
        for record in records {
            if self.insert_if_absent(record)? {
                outcome.imported += 1;
            } else {
                outcome.skipped += 1;
            }
        }
        Ok(outcome)
    }

    fn query(&self, filter: &TransactionFilter, pagination: Pagination) -> Page {
        query_records(self.records(), filter, pagination)
    }

    fn len(&self) -> usize {
        self.records().len()
    }

    fn is_empty(&self) -> bool {
        self.records().is_empty()
    }
}

/// In-process ledger, used for dry runs and tests
#[derive(Debug, Default)]
pub struct MemoryLedger {
    records: Vec<TransactionRecord>,
    codes: HashSet<String>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LedgerStore for MemoryLedger {
    fn insert_if_absent(&mut self, record: TransactionRecord) -> Result<bool> {
        if !self.codes.insert(record.transaction_code.clone()) {
            return Ok(false);
        }
        self.records.push(record);
        Ok(true)
    }

    fn records(&self) -> &[TransactionRecord] {
        &self.records
    }

    fn contains(&self, transaction_code: &str) -> bool {
        self.codes.contains(transaction_code)
    }
}

/// Append-only JSON-lines ledger on disk, one record per line.
#[derive(Debug)]
pub struct JsonlLedger {
    path: PathBuf,
    inner: MemoryLedger,
}

impl JsonlLedger {
    /// Open (or lazily create) the ledger at `path`, loading existing lines.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let mut inner = MemoryLedger::new();

        if path.exists() {
            let f = fs::File::open(&path).with_context(|| format!("open {}", path.display()))?;
            for (lineno, line) in BufReader::new(f).lines().enumerate() {
                let line = line.with_context(|| format!("read {}", path.display()))?;
                if line.trim().is_empty() {
                    continue;
                }
                match serde_json::from_str::<TransactionRecord>(&line) {
                    Ok(record) => {
                        inner.insert_if_absent(record)?;
                    }
                    Err(e) => {
                        tracing::warn!(
                            path = %path.display(),
                            line = lineno + 1,
                            error = %e,
                            "skipping malformed ledger line"
                        );
                    }
                }
            }
        }

        tracing::debug!(path = %path.display(), records = inner.len(), "opened ledger");
        Ok(Self { path, inner })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&self, records: &[&TransactionRecord]) -> Result<()> {
        if records.is_empty() {
            return Ok(());
        }
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
        }

        let f = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("open {}", self.path.display()))?;
        let mut w = BufWriter::new(f);
        for record in records {
            let line = serde_json::to_string(record).context("serialize ledger record")?;
            writeln!(w, "{}", line)?;
        }
        w.flush()
            .with_context(|| format!("write {}", self.path.display()))?;
        Ok(())
    }
}

impl LedgerStore for JsonlLedger {
    fn insert_if_absent(&mut self, record: TransactionRecord) -> Result<bool> {
        if self.inner.contains(&record.transaction_code) {
            return Ok(false);
        }
        self.append(&[&record])?;
        self.inner.insert_if_absent(record)
    }

    /// Writes all new records with a single append.
    fn insert_batch(&mut self, records: Vec<TransactionRecord>) -> Result<ImportOutcome> {
        let before = self.inner.len();
        let outcome = self.inner.insert_batch(records)?;

        let fresh: Vec<&TransactionRecord> = self.inner.records()[before..].iter().collect();
        if let Err(e) = self.append(&fresh) {
            // keep memory consistent with disk
            self.inner = JsonlLedger::open(&self.path)?.inner;
            return Err(e);
        }
        Ok(outcome)
    }

    fn records(&self) -> &[TransactionRecord] {
        self.inner.records()
    }

    fn contains(&self, transaction_code: &str) -> bool {
        self.inner.contains(transaction_code)
    }
}
