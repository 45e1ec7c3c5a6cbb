use std::io::Write;

use serde::Serialize;

use crate::error::Result;
use crate::filter::FilteredView;

pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Column order of exported files. The loader reads these names back.
pub const HEADER: [&str; 8] = [
    "timestamp",
    "category",
    "payment_method",
    "location",
    "quantity",
    "unit_price",
    "total_spent",
    "discount_applied",
];

#[derive(Serialize)]
struct ExportRow<'a> {
    timestamp: String,
    category: &'a str,
    payment_method: &'a str,
    location: &'a str,
    quantity: f64,
    unit_price: f64,
    total_spent: f64,
    discount_applied: f64,
}

/// Write the view as CSV, one row per record in view order. An empty view
/// still produces the header line.
pub fn write_csv<W: Write>(view: &FilteredView, writer: W) -> Result<usize> {
    let mut wtr = csv::WriterBuilder::new().has_headers(false).from_writer(writer);
    wtr.write_record(HEADER)?;
    for txn in view.iter() {
        let raw = &txn.raw;
        wtr.serialize(ExportRow {
            timestamp: raw.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            category: &raw.category,
            payment_method: &raw.payment_method,
            location: &raw.location,
            quantity: raw.quantity,
            unit_price: raw.unit_price,
            total_spent: raw.total_spent,
            discount_applied: raw.discount_applied,
        })?;
    }
    wtr.flush()?;
    Ok(view.len())
}

#[allow(dead_code)]
pub fn to_csv_string(view: &FilteredView) -> Result<String> {
    let mut buf = Vec::new();
    write_csv(view, &mut buf)?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::{apply, FilterSpec, Selection};
    use crate::importer::load_reader;
    use crate::store::tests::{raw, sample_store};
    use crate::store::RecordStore;

    #[test]
    fn test_header_is_stable() {
        let out = to_csv_string(&FilteredView::default()).unwrap();
        assert_eq!(
            out,
            "timestamp,category,payment_method,location,quantity,unit_price,total_spent,discount_applied\n"
        );
    }

    #[test]
    fn test_export_round_trips_records() {
        let mut odd = raw("2024-02-29 17:45:12", "Home, Garden", "Digital \"Wallet\"", "online", 12.345);
        odd.quantity = 3.0;
        odd.unit_price = 4.115;
        odd.discount_applied = 1.0;
        let store = RecordStore::from_raw(
            vec![odd, raw("2024-01-01", "CatB", "Cash", "Store1", 0.1 + 0.2)],
            0,
        );
        let view = apply(&store, &FilterSpec::everything(&store));
        let csv = to_csv_string(&view).unwrap();

        let reloaded = load_reader(csv.as_bytes()).unwrap();
        assert_eq!(reloaded.report().skipped, 0);
        let original: Vec<_> = view.iter().cloned().collect();
        assert_eq!(reloaded.records(), &original[..]);
    }

    #[test]
    fn test_export_follows_view_order_and_filter() {
        let store = sample_store();
        let mut spec = FilterSpec::everything(&store);
        spec.categories = Selection::from_values(["CatA"]);
        let view = apply(&store, &spec);
        let csv = to_csv_string(&view).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("2024-01-01 00:00:00,CatA"));
        assert!(lines[2].starts_with("2024-01-08 00:00:00,CatA"));
    }
}
