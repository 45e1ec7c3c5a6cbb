pub mod breakdown;
pub mod config;
pub mod demo;
pub mod export;
pub mod heatmap;
pub mod options;
pub mod rows;
pub mod status;
pub mod summary;
pub mod trend;

use std::path::PathBuf;

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use colored::Colorize;

use crate::aggregate::Granularity;
use crate::error::AppError;
use crate::filter::{self, DateRange, FilterSpec, FilteredView, Selection};
use crate::importer;
use crate::models::{Dimension, Measure};
use crate::settings::{load_settings, Settings};
use crate::store::RecordStore;

#[derive(Parser)]
#[command(name = "shopscope", about = "Slice retail sales by date, category, payment and location.")]
pub struct Cli {
    /// Sales CSV file (default: the file set with `shopscope config use`)
    #[arg(long, global = true)]
    pub file: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Headline KPIs: sales, transactions, units, average ticket, discount and online share.
    Summary {
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Sales over time at a daily, weekly, monthly or annual granularity.
    Trend {
        #[command(flatten)]
        filter: FilterArgs,
        /// daily, weekly, monthly or annual (default from settings)
        #[arg(long, short)]
        granularity: Option<Granularity>,
        /// Measure to sum; repeat for several (default: total_spent)
        #[arg(long = "measure")]
        measures: Vec<Measure>,
        /// Split every period by a dimension, e.g. channel
        #[arg(long)]
        by: Option<Dimension>,
    },
    /// Totals per dimension value, largest first.
    Breakdown {
        #[command(flatten)]
        filter: FilterArgs,
        /// Dimension to group by
        #[arg(long, default_value = "category")]
        by: Dimension,
        /// Measure to sum
        #[arg(long, default_value = "total_spent")]
        measure: Measure,
        /// Only the N largest groups (bare `--top` uses the configured default)
        #[arg(long)]
        top: Option<Option<usize>>,
        /// Add cumulative share of the grand total
        #[arg(long)]
        pareto: bool,
    },
    /// Number of transactions per dimension value.
    Counts {
        #[command(flatten)]
        filter: FilterArgs,
        /// Dimension to count by
        #[arg(long, default_value = "payment")]
        by: Dimension,
    },
    /// Online vs in-store comparison.
    Channels {
        #[command(flatten)]
        filter: FilterArgs,
        #[arg(long, default_value = "total_spent")]
        measure: Measure,
    },
    /// Two-dimensional table of sums, e.g. weekday by month.
    Heatmap {
        #[command(flatten)]
        filter: FilterArgs,
        #[arg(long, default_value = "weekday")]
        rows: Dimension,
        #[arg(long, default_value = "month")]
        cols: Dimension,
        #[arg(long, default_value = "total_spent")]
        measure: Measure,
    },
    /// List the transactions that pass the filter.
    Rows {
        #[command(flatten)]
        filter: FilterArgs,
        /// Show at most N rows
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Write the filtered transactions as CSV.
    Export {
        #[command(flatten)]
        filter: FilterArgs,
        /// Output path (default: stdout)
        #[arg(long)]
        output: Option<String>,
    },
    /// Distinct categories, payment methods and locations, plus the date span.
    Options,
    /// Show settings and how many rows were loaded.
    Status,
    /// Write a synthetic sales file to explore shopscope.
    Demo {
        /// Output path
        #[arg(long, default_value = "shopscope-demo.csv")]
        output: String,
        /// Number of transactions
        #[arg(long, default_value = "500")]
        rows: usize,
        /// Random seed for reproducible files
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Show or change settings.
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Print current settings.
    Show,
    /// Use a sales file by default.
    Use {
        /// Path to the sales CSV
        path: String,
    },
    /// Change defaults.
    Set {
        /// Default trend granularity
        #[arg(long)]
        granularity: Option<Granularity>,
        /// Default number of groups in `breakdown --top`
        #[arg(long = "top-n")]
        top_n: Option<usize>,
        /// Currency symbol for money columns
        #[arg(long)]
        currency: Option<String>,
    },
}

/// Filter flags shared by every query command.
#[derive(Args, Debug, Clone, Default)]
pub struct FilterArgs {
    /// Start date: YYYY-MM-DD (default: first transaction)
    #[arg(long = "from")]
    pub from_date: Option<String>,
    /// End date: YYYY-MM-DD (default: last transaction)
    #[arg(long = "to")]
    pub to_date: Option<String>,
    /// Allowed category; repeat for several (default: all)
    #[arg(long = "category")]
    pub categories: Vec<String>,
    /// Allowed payment method; repeat for several (default: all)
    #[arg(long = "payment")]
    pub payments: Vec<String>,
    /// Allowed location; repeat for several (default: all)
    #[arg(long = "location")]
    pub locations: Vec<String>,
}

fn parse_date(raw: &str) -> crate::error::Result<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| AppError::InvalidDate(raw.to_string()))
}

impl FilterArgs {
    pub fn to_spec(&self, store: &RecordStore) -> crate::error::Result<FilterSpec> {
        let mut spec = FilterSpec::everything(store);
        if let Some(from) = &self.from_date {
            spec.date_range.start = parse_date(from)?;
        }
        if let Some(to) = &self.to_date {
            spec.date_range.end = parse_date(to)?;
        }
        spec.categories = Selection::from_values(self.categories.iter().cloned());
        spec.payments = Selection::from_values(self.payments.iter().cloned());
        spec.locations = Selection::from_values(self.locations.iter().cloned());
        Ok(spec)
    }
}

/// Loaded store plus the settings it was resolved with.
pub struct Session {
    pub store: RecordStore,
    pub settings: Settings,
}

impl Session {
    pub fn open(file: Option<&str>) -> anyhow::Result<Self> {
        let settings = load_settings();
        let path = file
            .map(str::to_string)
            .or_else(|| settings.data_file.clone())
            .map(PathBuf::from)
            .ok_or(AppError::NoDataFile)?;
        let store = importer::load_file(&path)
            .with_context(|| format!("failed to load {}", path.display()))?;
        Ok(Self { store, settings })
    }

    /// Apply the filter flags, warning on stderr when the range is inverted.
    pub fn view(&self, args: &FilterArgs) -> anyhow::Result<FilteredView<'_>> {
        let spec = args.to_spec(&self.store)?;
        warn_if_inverted(&spec.date_range);
        Ok(filter::apply(&self.store, &spec))
    }

    pub fn money(&self, val: f64) -> String {
        crate::fmt::money(val, &self.settings.currency_symbol)
    }

    /// Money or plain number, depending on the measure.
    pub fn measure_value(&self, measure: Measure, val: f64) -> String {
        if measure.is_money() {
            self.money(val)
        } else {
            crate::fmt::number(val)
        }
    }
}

fn warn_if_inverted(range: &DateRange) {
    if range.is_inverted() {
        eprintln!(
            "{} start date {} is after end date {}; no transactions match.",
            "Warning:".yellow().bold(),
            range.start,
            range.end
        );
    }
}
