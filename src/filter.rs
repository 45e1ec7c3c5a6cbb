use std::collections::BTreeSet;
use std::collections::HashSet;

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::models::{Dimension, Transaction};
use crate::store::RecordStore;

/// Allowed values for one filter dimension.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    All,
    Subset(BTreeSet<String>),
}

impl Selection {
    /// Build from user-supplied values; no values means `All`.
    pub fn from_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let set: BTreeSet<String> = values.into_iter().map(Into::into).collect();
        if set.is_empty() {
            Self::All
        } else {
            Self::Subset(set)
        }
    }

    /// Concrete allowed set. `All` becomes every distinct value in the store.
    fn resolve(&self, store: &RecordStore, dimension: Dimension) -> HashSet<String> {
        match self {
            Self::All => store.distinct(dimension).into_iter().collect(),
            Self::Subset(values) => values.iter().cloned().collect(),
        }
    }
}

/// Inclusive date range over the date part of the timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn is_inverted(&self) -> bool {
        self.start > self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSpec {
    pub date_range: DateRange,
    pub categories: Selection,
    pub payments: Selection,
    pub locations: Selection,
}

impl FilterSpec {
    pub fn new(date_range: DateRange) -> Self {
        Self {
            date_range,
            categories: Selection::All,
            payments: Selection::All,
            locations: Selection::All,
        }
    }

    /// Everything in the store: its full date span and `All` on every dimension.
    /// For an empty store the range is a single arbitrary day, which still
    /// matches nothing.
    pub fn everything(store: &RecordStore) -> Self {
        let (start, end) = store
            .date_bounds()
            .unwrap_or((NaiveDate::MIN, NaiveDate::MIN));
        Self::new(DateRange::new(start, end))
    }
}

/// Passing records in store order.
#[derive(Debug, Clone, Default)]
pub struct FilteredView<'a> {
    records: Vec<&'a Transaction>,
}

impl<'a> FilteredView<'a> {
    pub fn from_records(records: Vec<&'a Transaction>) -> Self {
        Self { records }
    }

    #[allow(dead_code)]
    pub fn records(&self) -> &[&'a Transaction] {
        &self.records
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Transaction> + '_ {
        self.records.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

pub fn apply<'a>(store: &'a RecordStore, spec: &FilterSpec) -> FilteredView<'a> {
    if spec.date_range.is_inverted() {
        warn!(
            start = %spec.date_range.start,
            end = %spec.date_range.end,
            "start date is after end date; nothing can match"
        );
        return FilteredView::default();
    }

    let categories = spec.categories.resolve(store, Dimension::Category);
    let payments = spec.payments.resolve(store, Dimension::PaymentMethod);
    let locations = spec.locations.resolve(store, Dimension::Location);

    let records: Vec<&Transaction> = store
        .records()
        .iter()
        .filter(|t| spec.date_range.contains(t.date()))
        .filter(|t| categories.contains(&t.raw.category))
        .filter(|t| payments.contains(&t.raw.payment_method))
        .filter(|t| locations.contains(&t.raw.location))
        .collect();

    debug!(matched = records.len(), of = store.len(), "filter applied");
    FilteredView::from_records(records)
}
