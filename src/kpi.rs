use std::collections::HashMap;

use crate::filter::FilteredView;
use crate::models::{Channel, Dimension, Measure, Transaction};

// ---------------------------------------------------------------------------
// Scalars
// ---------------------------------------------------------------------------

pub fn total(view: &FilteredView, measure: Measure) -> f64 {
    view.iter().map(|t| measure.value(t)).sum()
}

/// Arithmetic mean of `measure`.
///
/// An empty view yields 0 rather than NaN. This is a reporting policy, not a
/// mathematical identity: callers that must tell "no rows" apart from "mean
/// of zero" should check `view.is_empty()` first.
pub fn mean(view: &FilteredView, measure: Measure) -> f64 {
    if view.is_empty() {
        return 0.0;
    }
    total(view, measure) / view.len() as f64
}

/// Fraction of records matching `predicate`, in [0, 1]. 0 for an empty view.
pub fn rate<F>(view: &FilteredView, predicate: F) -> f64
where
    F: Fn(&Transaction) -> bool,
{
    if view.is_empty() {
        return 0.0;
    }
    let hits = view.iter().filter(|t| predicate(*t)).count();
    hits as f64 / view.len() as f64
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Summary {
    pub transactions: usize,
    pub total_sales: f64,
    pub units: f64,
    pub avg_ticket: f64,
    pub discount_rate: f64,
    pub online_share: f64,
}

pub fn summarize(view: &FilteredView) -> Summary {
    Summary {
        transactions: view.len(),
        total_sales: total(view, Measure::TotalSpent),
        units: total(view, Measure::Quantity),
        avg_ticket: mean(view, Measure::TotalSpent),
        discount_rate: rate(view, |t| t.derived.has_discount),
        online_share: rate(view, |t| t.derived.channel == Channel::Online),
    }
}

// ---------------------------------------------------------------------------
// Grouped totals
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct GroupTotal {
    pub value: String,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GroupCount {
    pub value: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ParetoRow {
    pub value: String,
    pub total: f64,
    pub cumulative_pct: f64,
}

/// Sum per dimension value, largest first. Ties keep first-seen order.
pub fn group_total(view: &FilteredView, dimension: Dimension, measure: Measure) -> Vec<GroupTotal> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<GroupTotal> = Vec::new();
    for txn in view.iter() {
        let value = dimension.value(txn);
        let slot = match index.get(&*value) {
            Some(&i) => i,
            None => {
                index.insert(value.to_string(), groups.len());
                groups.push(GroupTotal {
                    value: value.into_owned(),
                    total: 0.0,
                });
                groups.len() - 1
            }
        };
        groups[slot].total += measure.value(txn);
    }
    // sort_by is stable, so equal totals stay in first-seen order
    groups.sort_by(|a, b| b.total.total_cmp(&a.total));
    groups
}

/// Number of records per dimension value, most frequent first.
pub fn group_count(view: &FilteredView, dimension: Dimension) -> Vec<GroupCount> {
    let mut index: HashMap<String, usize> = HashMap::new();
    let mut groups: Vec<GroupCount> = Vec::new();
    for txn in view.iter() {
        let value = dimension.value(txn);
        match index.get(&*value) {
            Some(&i) => groups[i].count += 1,
            None => {
                index.insert(value.to_string(), groups.len());
                groups.push(GroupCount {
                    value: value.into_owned(),
                    count: 1,
                });
            }
        }
    }
    groups.sort_by(|a, b| b.count.cmp(&a.count));
    groups
}

pub fn top_n(view: &FilteredView, dimension: Dimension, measure: Measure, n: usize) -> Vec<GroupTotal> {
    let mut groups = group_total(view, dimension, measure);
    groups.truncate(n);
    groups
}

/// `group_total` with the running share of the grand total, in percent.
/// Empty when the view is empty or the grand total is zero.
pub fn pareto(view: &FilteredView, dimension: Dimension, measure: Measure) -> Vec<ParetoRow> {
    let groups = group_total(view, dimension, measure);
    let grand: f64 = groups.iter().map(|g| g.total).sum();
    if groups.is_empty() || grand == 0.0 {
        return Vec::new();
    }
    let mut running = 0.0f64;
    groups
        .into_iter()
        .map(|g| {
            running += g.total;
            ParetoRow {
                value: g.value,
                total: g.total,
                cumulative_pct: running / grand * 100.0,
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Heatmap
// ---------------------------------------------------------------------------

/// Row × column sums. `None` marks a cell with no records, which is not the
/// same as a cell whose records sum to zero.
#[derive(Debug, Clone, PartialEq)]
pub struct Heatmap {
    pub rows: Vec<String>,
    pub cols: Vec<String>,
    pub cells: Vec<Vec<Option<f64>>>,
}

impl Heatmap {
    #[allow(dead_code)]
    pub fn cell(&self, row: &str, col: &str) -> Option<f64> {
        let r = self.rows.iter().position(|v| v == row)?;
        let c = self.cols.iter().position(|v| v == col)?;
        self.cells[r][c]
    }
}

/// Cross-tabulate two dimensions in the caller's row and column order.
/// Records whose row or column value is not listed are not counted.
pub fn cross_heatmap(
    view: &FilteredView,
    row_dim: Dimension,
    col_dim: Dimension,
    measure: Measure,
    row_order: &[String],
    col_order: &[String],
) -> Heatmap {
    let row_index: HashMap<&str, usize> =
        row_order.iter().enumerate().map(|(i, v)| (v.as_str(), i)).collect();
    let col_index: HashMap<&str, usize> =
        col_order.iter().enumerate().map(|(i, v)| (v.as_str(), i)).collect();

    let mut cells = vec![vec![None; col_order.len()]; row_order.len()];
    for txn in view.iter() {
        let (Some(&r), Some(&c)) = (
            row_index.get(&*row_dim.value(txn)),
            col_index.get(&*col_dim.value(txn)),
        ) else {
            continue;
        };
        let cell: &mut Option<f64> = &mut cells[r][c];
        *cell = Some(cell.unwrap_or(0.0) + measure.value(txn));
    }

    Heatmap {
        rows: row_order.to_vec(),
        cols: col_order.to_vec(),
        cells,
    }
}
