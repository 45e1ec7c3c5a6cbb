use std::collections::HashSet;

use chrono::NaiveDate;
use tracing::info;

use crate::models::{Dimension, RawTransaction, Transaction};

/// Rows kept and dropped while building a store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub loaded: usize,
    pub skipped: usize,
}

/// All transactions of one analysis session, sorted by timestamp.
///
/// Built once; nothing hands out mutable access afterwards, so a store can be
/// shared across threads for read-only queries.
#[derive(Debug, Clone, Default)]
pub struct RecordStore {
    records: Vec<Transaction>,
    report: LoadReport,
}

impl RecordStore {
    /// Sort (stable, ascending by timestamp) and derive every row.
    /// `skipped` is the number of rows the loader already dropped.
    pub fn from_raw(rows: Vec<RawTransaction>, skipped: usize) -> Self {
        let mut rows = rows;
        rows.sort_by_key(|r| r.timestamp);
        let records: Vec<Transaction> = rows.into_iter().map(Transaction::new).collect();
        let report = LoadReport {
            loaded: records.len(),
            skipped,
        };
        info!(loaded = report.loaded, skipped = report.skipped, "record store built");
        Self { records, report }
    }

    pub fn records(&self) -> &[Transaction] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn report(&self) -> LoadReport {
        self.report
    }

    /// Distinct values of a dimension in first-seen (timestamp) order.
    pub fn distinct(&self, dimension: Dimension) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        for txn in &self.records {
            let value = dimension.value(txn);
            if seen.insert(value.clone()) {
                out.push(value.into_owned());
            }
        }
        out
    }

    /// First and last transaction dates, `None` for an empty store.
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.records.first()?.date();
        let last = self.records.last()?.date();
        Some((first, last))
    }
}
