//! Time bucketing of a filtered view.
//!
//! Every granularity maps a date to the representative date of its period:
//! daily buckets are labelled by the day, weekly by the Monday that starts
//! the week, monthly by the last day of the month and annual by January 1st.
//! Periods without records are left out of the output.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Days, Months, NaiveDate};
use tracing::debug;

use crate::error::AppError;
use crate::filter::FilteredView;
use crate::models::{Dimension, Measure};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Granularity {
    Daily,
    Weekly,
    Monthly,
    Annual,
}

struct BoundaryRule {
    key: &'static str,
    label: &'static str,
    anchor: fn(NaiveDate) -> NaiveDate,
}

fn day_anchor(date: NaiveDate) -> NaiveDate {
    date
}

fn week_start(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.weekday().num_days_from_monday()))
}

fn month_end(date: NaiveDate) -> NaiveDate {
    let first = date.with_day(1).unwrap_or(date);
    first
        .checked_add_months(Months::new(1))
        .and_then(|next| next.pred_opt())
        .unwrap_or(date)
}

fn year_start(date: NaiveDate) -> NaiveDate {
    date.with_ordinal(1).unwrap_or(date)
}

// Indexed by `Granularity as usize`.
static BOUNDARY_RULES: [BoundaryRule; 4] = [
    BoundaryRule { key: "daily", label: "Daily", anchor: day_anchor },
    BoundaryRule { key: "weekly", label: "Weekly", anchor: week_start },
    BoundaryRule { key: "monthly", label: "Monthly", anchor: month_end },
    BoundaryRule { key: "annual", label: "Annual", anchor: year_start },
];

impl Granularity {
    pub const ALL: [Granularity; 4] = [Self::Daily, Self::Weekly, Self::Monthly, Self::Annual];

    fn rule(&self) -> &'static BoundaryRule {
        &BOUNDARY_RULES[*self as usize]
    }

    /// Representative date of the period containing `date`.
    pub fn period_of(&self, date: NaiveDate) -> NaiveDate {
        (self.rule().anchor)(date)
    }

    pub fn key(&self) -> &'static str {
        self.rule().key
    }

    pub fn label(&self) -> &'static str {
        self.rule().label
    }
}

impl FromStr for Granularity {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        let alias = match wanted.as_str() {
            "day" | "d" => "daily",
            "week" | "w" => "weekly",
            "month" | "m" => "monthly",
            "year" | "yearly" | "y" | "a" => "annual",
            other => other,
        };
        Self::ALL
            .into_iter()
            .find(|g| g.key() == alias)
            .ok_or_else(|| AppError::UnknownGranularity(s.to_string()))
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

// ---------------------------------------------------------------------------
// Bucketing
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Bucket {
    pub period: NaiveDate,
    /// One entry per requested measure, in request order.
    pub sums: Vec<(Measure, f64)>,
}

impl Bucket {
    #[allow(dead_code)]
    pub fn get(&self, measure: Measure) -> Option<f64> {
        self.sums.iter().find(|(m, _)| *m == measure).map(|(_, v)| *v)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CrossBucket {
    pub period: NaiveDate,
    pub value: String,
    pub sum: f64,
}

pub fn bucket(view: &FilteredView, granularity: Granularity, measures: &[Measure]) -> Vec<Bucket> {
    let mut periods: BTreeMap<NaiveDate, Vec<f64>> = BTreeMap::new();
    for txn in view.iter() {
        let sums = periods
            .entry(granularity.period_of(txn.date()))
            .or_insert_with(|| vec![0.0; measures.len()]);
        for (slot, measure) in sums.iter_mut().zip(measures) {
            *slot += measure.value(txn);
        }
    }
    debug!(granularity = %granularity, buckets = periods.len(), "bucketed view");
    periods
        .into_iter()
        .map(|(period, sums)| Bucket {
            period,
            sums: measures.iter().copied().zip(sums).collect(),
        })
        .collect()
}

/// Period × dimension cross-tab. Only pairs with at least one record appear;
/// within a period values keep first-seen order.
pub fn bucket_by(
    view: &FilteredView,
    granularity: Granularity,
    dimension: Dimension,
    measure: Measure,
) -> Vec<CrossBucket> {
    let mut periods: BTreeMap<NaiveDate, (HashMap<String, usize>, Vec<(String, f64)>)> =
        BTreeMap::new();
    for txn in view.iter() {
        let (index, cells) = periods.entry(granularity.period_of(txn.date())).or_default();
        let value = dimension.value(txn);
        let slot = match index.get(&*value) {
            Some(&i) => i,
            None => {
                index.insert(value.to_string(), cells.len());
                cells.push((value.into_owned(), 0.0));
                cells.len() - 1
            }
        };
        cells[slot].1 += measure.value(txn);
    }
    periods
        .into_iter()
        .flat_map(|(period, (_, cells))| {
            cells
                .into_iter()
                .map(move |(value, sum)| CrossBucket { period, value, sum })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{apply, FilterSpec};
    use crate::kpi;
    use crate::models::{RawTransaction, Transaction};
    use crate::store::tests::{raw, sample_store};
    use crate::store::RecordStore;
    use proptest::prelude::*;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_boundary_rules() {
        // 2024-01-10 is a Wednesday
        let d = day("2024-01-10");
        assert_eq!(Granularity::Daily.period_of(d), d);
        assert_eq!(Granularity::Weekly.period_of(d), day("2024-01-08"));
        assert_eq!(Granularity::Monthly.period_of(d), day("2024-01-31"));
        assert_eq!(Granularity::Annual.period_of(d), day("2024-01-01"));
    }

    #[test]
    fn test_week_starts_on_monday() {
        assert_eq!(Granularity::Weekly.period_of(day("2024-01-08")), day("2024-01-08"));
        assert_eq!(Granularity::Weekly.period_of(day("2024-01-14")), day("2024-01-08"));
        // Week crossing a year boundary
        assert_eq!(Granularity::Weekly.period_of(day("2025-01-01")), day("2024-12-30"));
    }

    #[test]
    fn test_month_end_handles_short_months() {
        assert_eq!(Granularity::Monthly.period_of(day("2024-02-10")), day("2024-02-29"));
        assert_eq!(Granularity::Monthly.period_of(day("2023-02-01")), day("2023-02-28"));
        assert_eq!(Granularity::Monthly.period_of(day("2024-12-31")), day("2024-12-31"));
    }

    #[test]
    fn test_granularity_parsing() {
        assert_eq!("weekly".parse::<Granularity>().unwrap(), Granularity::Weekly);
        assert_eq!("Month".parse::<Granularity>().unwrap(), Granularity::Monthly);
        assert_eq!("yearly".parse::<Granularity>().unwrap(), Granularity::Annual);
        assert!("hourly".parse::<Granularity>().is_err());
    }

    #[test]
    fn test_weekly_scenario() {
        let store = sample_store();
        let view = apply(&store, &FilterSpec::everything(&store));
        let buckets = bucket(&view, Granularity::Weekly, &[Measure::TotalSpent]);
        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].period, day("2024-01-01"));
        assert_eq!(buckets[0].get(Measure::TotalSpent), Some(30.0));
        assert_eq!(buckets[1].period, day("2024-01-08"));
        assert_eq!(buckets[1].get(Measure::TotalSpent), Some(5.0));
    }

    #[test]
    fn test_empty_periods_are_omitted() {
        let store = RecordStore::from_raw(
            vec![
                raw("2024-01-05", "A", "Cash", "X", 1.0),
                raw("2024-04-05", "A", "Cash", "X", 2.0),
            ],
            0,
        );
        let view = apply(&store, &FilterSpec::everything(&store));
        let buckets = bucket(&view, Granularity::Monthly, &[Measure::TotalSpent]);
        let periods: Vec<NaiveDate> = buckets.iter().map(|b| b.period).collect();
        assert_eq!(periods, vec![day("2024-01-31"), day("2024-04-30")]);
    }

    #[test]
    fn test_multiple_measures() {
        let store = sample_store();
        let view = apply(&store, &FilterSpec::everything(&store));
        let buckets = bucket(&view, Granularity::Annual, &[Measure::Quantity, Measure::TotalSpent]);
        assert_eq!(buckets.len(), 1);
        assert_eq!(buckets[0].period, day("2024-01-01"));
        assert_eq!(
            buckets[0].sums,
            vec![(Measure::Quantity, 3.0), (Measure::TotalSpent, 35.0)]
        );
        assert_eq!(buckets[0].get(Measure::UnitPrice), None);
    }

    #[test]
    fn test_empty_view_has_no_buckets() {
        let view = FilteredView::default();
        assert!(bucket(&view, Granularity::Daily, &[Measure::TotalSpent]).is_empty());
        assert!(bucket_by(&view, Granularity::Daily, Dimension::Channel, Measure::TotalSpent).is_empty());
    }

    #[test]
    fn test_bucket_by_channel() {
        let store = sample_store();
        let view = apply(&store, &FilterSpec::everything(&store));
        let cells = bucket_by(&view, Granularity::Weekly, Dimension::Channel, Measure::TotalSpent);
        assert_eq!(cells.len(), 3);
        assert_eq!(cells[0], CrossBucket { period: day("2024-01-01"), value: "Online".into(), sum: 10.0 });
        assert_eq!(cells[1], CrossBucket { period: day("2024-01-01"), value: "In-Store".into(), sum: 20.0 });
        assert_eq!(cells[2], CrossBucket { period: day("2024-01-08"), value: "Online".into(), sum: 5.0 });
    }

    fn arb_records() -> impl Strategy<Value = Vec<Transaction>> {
        prop::collection::vec(
            (0i64..800, 0usize..3, 0u32..10_000, 0u32..5),
            0..60,
        )
        .prop_map(|rows| {
            let base = day("2023-01-01");
            rows.into_iter()
                .map(|(offset, cat, cents, qty)| {
                    Transaction::new(RawTransaction {
                        timestamp: (base + chrono::Duration::days(offset)).and_hms_opt(9, 0, 0).unwrap(),
                        category: ["A", "B", "C"][cat].to_string(),
                        payment_method: "Cash".to_string(),
                        location: "Online".to_string(),
                        quantity: f64::from(qty),
                        unit_price: 1.0,
                        total_spent: f64::from(cents) / 100.0,
                        discount_applied: 0.0,
                    })
                })
                .collect()
        })
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_bucket_sums_equal_total(records in arb_records()) {
            let view = FilteredView::from_records(records.iter().collect());
            let expected = kpi::total(&view, Measure::TotalSpent);
            for g in Granularity::ALL {
                let buckets = bucket(&view, g, &[Measure::TotalSpent]);
                let sum: f64 = buckets.iter().filter_map(|b| b.get(Measure::TotalSpent)).sum();
                prop_assert!((sum - expected).abs() < 1e-6);
                prop_assert!(buckets.windows(2).all(|w| w[0].period < w[1].period));
            }
        }

        #[test]
        fn prop_every_record_lands_in_its_period(records in arb_records()) {
            let view = FilteredView::from_records(records.iter().collect());
            for g in Granularity::ALL {
                let periods: Vec<NaiveDate> =
                    bucket(&view, g, &[Measure::Quantity]).iter().map(|b| b.period).collect();
                for txn in &records {
                    prop_assert!(periods.contains(&g.period_of(txn.date())));
                }
            }
        }
    }
}
