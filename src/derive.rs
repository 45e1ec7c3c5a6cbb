use chrono::{Datelike, Month};

use crate::models::{Channel, Derived, RawTransaction, Transaction};

const MONTHS: [Month; 12] = [
    Month::January,
    Month::February,
    Month::March,
    Month::April,
    Month::May,
    Month::June,
    Month::July,
    Month::August,
    Month::September,
    Month::October,
    Month::November,
    Month::December,
];

pub fn channel_for(location: &str) -> Channel {
    if location.eq_ignore_ascii_case("online") {
        Channel::Online
    } else {
        Channel::InStore
    }
}

/// Compute the auxiliary fields of a row. Pure function of the raw fields.
pub fn derive(raw: &RawTransaction) -> Derived {
    let date = raw.timestamp.date();
    Derived {
        channel: channel_for(&raw.location),
        has_discount: raw.discount_applied > 0.0,
        day_of_week: date.weekday(),
        month: MONTHS[date.month0() as usize],
        year: date.year(),
    }
}

impl Transaction {
    pub fn new(raw: RawTransaction) -> Self {
        let derived = derive(&raw);
        Self { raw, derived }
    }

    /// Recompute the derived fields. A no-op on a record built with `new`.
    #[allow(dead_code)]
    pub fn rederive(&mut self) {
        self.derived = derive(&self.raw);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Weekday};

    fn raw(location: &str, discount: f64) -> RawTransaction {
        RawTransaction {
            timestamp: NaiveDate::from_ymd_opt(2024, 3, 15)
                .unwrap()
                .and_hms_opt(14, 30, 0)
                .unwrap(),
            category: "Food".to_string(),
            payment_method: "Cash".to_string(),
            location: location.to_string(),
            quantity: 2.0,
            unit_price: 5.0,
            total_spent: 10.0,
            discount_applied: discount,
        }
    }

    #[test]
    fn test_channel_is_case_insensitive() {
        assert_eq!(channel_for("Online"), Channel::Online);
        assert_eq!(channel_for("ONLINE"), Channel::Online);
        assert_eq!(channel_for("online"), Channel::Online);
        assert_eq!(channel_for("In-store"), Channel::InStore);
        assert_eq!(channel_for("Store1"), Channel::InStore);
        assert_eq!(channel_for("online shop"), Channel::InStore);
    }

    #[test]
    fn test_calendar_fields() {
        let d = derive(&raw("Store1", 0.0));
        assert_eq!(d.day_of_week, Weekday::Fri);
        assert_eq!(d.month, Month::March);
        assert_eq!(d.month_name(), "March");
        assert_eq!(d.year, 2024);
    }

    #[test]
    fn test_discount_flag() {
        assert!(!derive(&raw("Online", 0.0)).has_discount);
        assert!(derive(&raw("Online", 1.0)).has_discount);
        assert!(!derive(&raw("Online", -3.0)).has_discount);
    }

    #[test]
    fn test_rederive_is_idempotent() {
        let mut txn = Transaction::new(raw("ONLINE", 2.5));
        let before = txn.clone();
        txn.rederive();
        txn.rederive();
        assert_eq!(txn, before);
    }
}
