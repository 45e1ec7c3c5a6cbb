use std::io::Read;
use std::path::Path;

use chrono::{NaiveDate, NaiveDateTime};
use tracing::{debug, info};

use crate::error::{AppError, Result};
use crate::models::RawTransaction;
use crate::store::RecordStore;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

pub fn parse_amount(raw: &str) -> f64 {
    let s = raw.replace(',', "").replace('"', "").replace('$', "");
    let s = s.trim();
    if s.eq_ignore_ascii_case("true") {
        return 1.0;
    }
    if s.eq_ignore_ascii_case("false") {
        return 0.0;
    }
    if let Some(inner) = s.strip_prefix('(').and_then(|v| v.strip_suffix(')')) {
        return -inner.trim().parse::<f64>().unwrap_or(0.0);
    }
    s.parse().unwrap_or(0.0)
}

const DATETIME_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

/// Parse a timestamp cell; date-only values land at midnight.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    for fmt in DATETIME_FORMATS {
        if let Ok(ts) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(ts);
        }
    }
    for fmt in DATE_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(raw, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }
    None
}

// ---------------------------------------------------------------------------
// Column detection
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
enum Column {
    Timestamp,
    Category,
    PaymentMethod,
    Location,
    Quantity,
    UnitPrice,
    TotalSpent,
    DiscountApplied,
}

impl Column {
    const ALL: [Column; 8] = [
        Column::Timestamp,
        Column::Category,
        Column::PaymentMethod,
        Column::Location,
        Column::Quantity,
        Column::UnitPrice,
        Column::TotalSpent,
        Column::DiscountApplied,
    ];

    fn aliases(&self) -> &'static [&'static str] {
        match self {
            Self::Timestamp => &["timestamp", "transaction date", "transaction_date", "date"],
            Self::Category => &["category"],
            Self::PaymentMethod => &["payment_method", "payment method", "payment"],
            Self::Location => &["location"],
            Self::Quantity => &["quantity", "qty"],
            Self::UnitPrice => &["unit_price", "price per unit", "price_per_unit", "unit price"],
            Self::TotalSpent => &["total_spent", "total spent", "total"],
            Self::DiscountApplied => &["discount_applied", "discount applied", "discount"],
        }
    }

    fn required(&self) -> bool {
        matches!(
            self,
            Self::Timestamp | Self::Category | Self::PaymentMethod | Self::Location | Self::TotalSpent
        )
    }
}

/// Header position of every known column.
struct ColumnMap {
    idx: [Option<usize>; 8],
}

impl ColumnMap {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self> {
        let mut idx = [None; 8];
        for (i, field) in headers.iter().enumerate() {
            let name = field.trim().trim_start_matches('\u{feff}').to_lowercase();
            for (slot, col) in Column::ALL.iter().enumerate() {
                if idx[slot].is_none() && col.aliases().contains(&name.as_str()) {
                    idx[slot] = Some(i);
                }
            }
        }
        for (slot, col) in Column::ALL.iter().enumerate() {
            if col.required() && idx[slot].is_none() {
                return Err(AppError::MissingColumn(col.aliases()[0].to_string()));
            }
        }
        Ok(Self { idx })
    }

    fn get<'r>(&self, record: &'r csv::StringRecord, col: Column) -> &'r str {
        self.idx[col as usize]
            .and_then(|i| record.get(i))
            .map(str::trim)
            .unwrap_or("")
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Read sales rows from CSV. Rows whose timestamp does not parse are
/// dropped and counted in the second element.
pub fn read_rows<R: Read>(reader: R) -> Result<(Vec<RawTransaction>, usize)> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);
    let columns = ColumnMap::from_headers(rdr.headers()?)?;

    let mut rows = Vec::new();
    let mut skipped = 0usize;
    for (line, result) in rdr.records().enumerate() {
        let record = result?;
        if record.iter().all(|f| f.trim().is_empty()) {
            continue;
        }
        let stamp = columns.get(&record, Column::Timestamp);
        let Some(timestamp) = parse_timestamp(stamp) else {
            debug!(row = line + 1, value = stamp, "skipping row with unparseable timestamp");
            skipped += 1;
            continue;
        };
        rows.push(RawTransaction {
            timestamp,
            category: columns.get(&record, Column::Category).to_string(),
            payment_method: columns.get(&record, Column::PaymentMethod).to_string(),
            location: columns.get(&record, Column::Location).to_string(),
            quantity: parse_amount(columns.get(&record, Column::Quantity)),
            unit_price: parse_amount(columns.get(&record, Column::UnitPrice)),
            total_spent: parse_amount(columns.get(&record, Column::TotalSpent)),
            discount_applied: parse_amount(columns.get(&record, Column::DiscountApplied)),
        });
    }
    Ok((rows, skipped))
}

pub fn load_reader<R: Read>(reader: R) -> Result<RecordStore> {
    let (rows, skipped) = read_rows(reader)?;
    Ok(RecordStore::from_raw(rows, skipped))
}

pub fn load_file(file_path: &Path) -> Result<RecordStore> {
    let file = std::fs::File::open(file_path)?;
    info!(path = %file_path.display(), "loading sales file");
    load_reader(std::io::BufReader::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("1,234.56"), 1234.56);
        assert_eq!(parse_amount("\"500.00\""), 500.0);
        assert_eq!(parse_amount("$42.50"), 42.5);
        assert_eq!(parse_amount(""), 0.0);
        assert_eq!(parse_amount("not_a_number"), 0.0);
    }

    #[test]
    fn test_parse_amount_booleans() {
        assert_eq!(parse_amount("True"), 1.0);
        assert_eq!(parse_amount("FALSE"), 0.0);
    }

    #[test]
    fn test_parse_timestamp_formats() {
        assert_eq!(parse_timestamp("2024-01-15").unwrap().to_string(), "2024-01-15 00:00:00");
        assert_eq!(
            parse_timestamp("2024-01-15 09:30:00").unwrap().to_string(),
            "2024-01-15 09:30:00"
        );
        assert_eq!(
            parse_timestamp("2024-01-15T09:30:00").unwrap().to_string(),
            "2024-01-15 09:30:00"
        );
        assert_eq!(parse_timestamp("01/15/2024").unwrap().to_string(), "2024-01-15 00:00:00");
    }

    #[test]
    fn test_parse_timestamp_rejects_garbage() {
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("yesterday").is_none());
        assert!(parse_timestamp("2024-02-30").is_none());
        assert!(parse_timestamp("13/01/2024").is_none());
    }

    #[test]
    fn test_load_retail_headers() {
        let content = "\
Transaction ID,Category,Item,Price Per Unit,Quantity,Total Spent,Payment Method,Location,Transaction Date,Discount Applied
TXN_1,Food,Item_1,5.0,2.0,10.0,Cash,Online,2024-01-03,True
TXN_2,Furniture,Item_2,20.0,1.0,20.0,Credit Card,In-store,2024-01-01,False
TXN_3,Food,Item_3,1.0,1.0,1.0,Cash,In-store,not a date,
";
        let store = load_reader(content.as_bytes()).unwrap();
        assert_eq!(store.len(), 2);
        assert_eq!(store.report().skipped, 1);
        let first = &store.records()[0];
        assert_eq!(first.raw.category, "Furniture");
        assert_eq!(first.raw.payment_method, "Credit Card");
        assert!(!first.derived.has_discount);
        let second = &store.records()[1];
        assert_eq!(second.raw.total_spent, 10.0);
        assert_eq!(second.raw.quantity, 2.0);
        assert_eq!(second.raw.unit_price, 5.0);
        assert!(second.derived.has_discount);
    }

    #[test]
    fn test_load_canonical_headers() {
        let content = "\
timestamp,category,payment_method,location,quantity,unit_price,total_spent,discount_applied
2024-01-01 10:00:00,CatA,Card,Online,1,10,10,0
";
        let store = load_reader(content.as_bytes()).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.records()[0].raw.location, "Online");
    }

    #[test]
    fn test_missing_optional_columns_default_to_zero() {
        let content = "timestamp,category,payment_method,location,total_spent\n2024-01-01,A,Cash,X,3.5\n";
        let store = load_reader(content.as_bytes()).unwrap();
        let txn = &store.records()[0];
        assert_eq!(txn.raw.quantity, 0.0);
        assert_eq!(txn.raw.discount_applied, 0.0);
    }

    #[test]
    fn test_missing_required_column_is_an_error() {
        let content = "timestamp,category,location,total_spent\n2024-01-01,A,X,3.5\n";
        let err = load_reader(content.as_bytes()).unwrap_err();
        assert!(matches!(err, AppError::MissingColumn(ref c) if c == "payment_method"), "got: {err}");
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sales.csv");
        std::fs::write(
            &path,
            "timestamp,category,payment_method,location,total_spent\n2024-05-01,A,Cash,X,3\n",
        )
        .unwrap();
        let store = load_file(&path).unwrap();
        assert_eq!(store.len(), 1);
        assert!(load_file(&dir.path().join("missing.csv")).is_err());
    }
}
