use std::path::PathBuf;

use chrono::{Days, NaiveDate};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::error::{AppError, Result};

const CATEGORIES: &[&str] = &[
    "Beverages",
    "Butchers",
    "Computers and electric accessories",
    "Electric household essentials",
    "Food",
    "Furniture",
    "Milk Products",
    "Patisserie",
];

const PAYMENTS: &[&str] = &["Cash", "Credit Card", "Digital Wallet"];

const LOCATIONS: &[&str] = &["Online", "In-store"];

/// Two full calendar years of activity.
const SPAN_DAYS: u64 = 731;

/// Roughly one row in a hundred gets a blank date, like real exports do.
const BLANK_DATE_ODDS: f64 = 0.01;

fn first_day() -> Result<NaiveDate> {
    NaiveDate::from_ymd_opt(2023, 1, 1).ok_or_else(|| AppError::Other("bad demo start date".into()))
}

/// Write `rows` synthetic transactions in the retail export layout.
pub fn generate<W: std::io::Write>(writer: W, rows: usize, seed: Option<u64>) -> Result<usize> {
    let mut rng = match seed {
        Some(s) => StdRng::seed_from_u64(s),
        None => StdRng::from_entropy(),
    };
    let start = first_day()?;

    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record([
        "Transaction ID",
        "Category",
        "Price Per Unit",
        "Quantity",
        "Total Spent",
        "Payment Method",
        "Location",
        "Transaction Date",
        "Discount Applied",
    ])?;

    for i in 0..rows {
        let day = start + Days::new(rng.gen_range(0..SPAN_DAYS));
        let date = if rng.gen_bool(BLANK_DATE_ODDS) {
            String::new()
        } else {
            day.format("%Y-%m-%d").to_string()
        };
        let category = CATEGORIES.choose(&mut rng).copied().unwrap_or("Food");
        let payment = PAYMENTS.choose(&mut rng).copied().unwrap_or("Cash");
        let location = LOCATIONS.choose(&mut rng).copied().unwrap_or("Online");
        // Prices move in half-dollar steps between 5 and 41
        let price = f64::from(rng.gen_range(10u32..=82)) / 2.0;
        let quantity = rng.gen_range(1u32..=10);
        let total = price * f64::from(quantity);
        let discount = if rng.gen_bool(0.33) { "True" } else { "False" };

        wtr.write_record([
            format!("TXN_{:07}", i + 1),
            category.to_string(),
            format!("{price:.1}"),
            quantity.to_string(),
            format!("{total:.1}"),
            payment.to_string(),
            location.to_string(),
            date,
            discount.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(rows)
}

pub fn run(output: &str, rows: usize, seed: Option<u64>) -> anyhow::Result<()> {
    let path = PathBuf::from(output);
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let file = std::fs::File::create(&path)?;
    let written = generate(std::io::BufWriter::new(file), rows, seed)?;
    println!("Wrote {written} demo transactions to {}", path.display());
    println!("Try: shopscope --file {} summary", path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::importer::load_reader;

    #[test]
    fn test_demo_is_loadable() {
        let mut buf = Vec::new();
        generate(&mut buf, 200, Some(7)).unwrap();
        let store = load_reader(buf.as_slice()).unwrap();
        let report = store.report();
        assert_eq!(report.loaded + report.skipped, 200);
        assert!(report.loaded > 150);
        let (first, last) = store.date_bounds().unwrap();
        assert!(first >= first_day().unwrap());
        assert!(last <= NaiveDate::from_ymd_opt(2025, 1, 1).unwrap());
    }

    #[test]
    fn test_seed_is_reproducible() {
        let mut a = Vec::new();
        let mut b = Vec::new();
        generate(&mut a, 50, Some(42)).unwrap();
        generate(&mut b, 50, Some(42)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_totals_match_price_times_quantity() {
        let mut buf = Vec::new();
        generate(&mut buf, 100, Some(3)).unwrap();
        let store = load_reader(buf.as_slice()).unwrap();
        for t in store.records() {
            assert!((t.raw.unit_price * t.raw.quantity - t.raw.total_spent).abs() < 1e-9);
        }
    }
}
