use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

use chrono::{Month, NaiveDate, NaiveDateTime, Weekday};

use crate::error::AppError;

/// Raw fields of one sales row, as handed over by the loader.
#[derive(Debug, Clone, PartialEq)]
pub struct RawTransaction {
    pub timestamp: NaiveDateTime,
    pub category: String,
    pub payment_method: String,
    pub location: String,
    pub quantity: f64,
    pub unit_price: f64,
    pub total_spent: f64,
    pub discount_applied: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Online,
    InStore,
}

impl Channel {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Online => "Online",
            Self::InStore => "In-Store",
        }
    }
}

/// Fields computed from the raw row once at load.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Derived {
    pub channel: Channel,
    pub has_discount: bool,
    pub day_of_week: Weekday,
    pub month: Month,
    pub year: i32,
}

impl Derived {
    pub fn month_name(&self) -> &'static str {
        self.month.name()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transaction {
    pub raw: RawTransaction,
    pub derived: Derived,
}

impl Transaction {
    pub fn date(&self) -> NaiveDate {
        self.raw.timestamp.date()
    }
}

// ---------------------------------------------------------------------------
// Dimensions and measures
// ---------------------------------------------------------------------------

/// Categorical keys a view can be grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Dimension {
    Category,
    PaymentMethod,
    Location,
    Channel,
    DayOfWeek,
    Month,
    Year,
    Discount,
}

impl Dimension {
    pub fn key(&self) -> &'static str {
        match self {
            Self::Category => "category",
            Self::PaymentMethod => "payment",
            Self::Location => "location",
            Self::Channel => "channel",
            Self::DayOfWeek => "weekday",
            Self::Month => "month",
            Self::Year => "year",
            Self::Discount => "discount",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Category => "Category",
            Self::PaymentMethod => "Payment Method",
            Self::Location => "Location",
            Self::Channel => "Channel",
            Self::DayOfWeek => "Day of Week",
            Self::Month => "Month",
            Self::Year => "Year",
            Self::Discount => "Discount",
        }
    }

    pub fn value<'a>(&self, txn: &'a Transaction) -> Cow<'a, str> {
        match self {
            Self::Category => Cow::Borrowed(&txn.raw.category),
            Self::PaymentMethod => Cow::Borrowed(&txn.raw.payment_method),
            Self::Location => Cow::Borrowed(&txn.raw.location),
            Self::Channel => Cow::Borrowed(txn.derived.channel.label()),
            Self::DayOfWeek => Cow::Owned(txn.derived.day_of_week.to_string()),
            Self::Month => Cow::Borrowed(txn.derived.month_name()),
            Self::Year => Cow::Owned(txn.derived.year.to_string()),
            Self::Discount => Cow::Borrowed(if txn.derived.has_discount { "Yes" } else { "No" }),
        }
    }

    /// Calendar ordering for dimensions that have one (Mon..Sun, January..December).
    pub fn canonical_order(&self) -> Option<Vec<String>> {
        match self {
            Self::DayOfWeek => Some(
                [
                    Weekday::Mon,
                    Weekday::Tue,
                    Weekday::Wed,
                    Weekday::Thu,
                    Weekday::Fri,
                    Weekday::Sat,
                    Weekday::Sun,
                ]
                .iter()
                .map(|d| d.to_string())
                .collect(),
            ),
            Self::Month => Some(
                (1..=12u8)
                    .filter_map(|m| Month::try_from(m).ok())
                    .map(|m| m.name().to_string())
                    .collect(),
            ),
            Self::Channel => Some(vec![
                Channel::Online.label().to_string(),
                Channel::InStore.label().to_string(),
            ]),
            Self::Discount => Some(vec!["Yes".to_string(), "No".to_string()]),
            _ => None,
        }
    }
}

impl FromStr for Dimension {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "category" | "categories" => Ok(Self::Category),
            "payment" | "payment_method" => Ok(Self::PaymentMethod),
            "location" => Ok(Self::Location),
            "channel" => Ok(Self::Channel),
            "weekday" | "day_of_week" | "day" => Ok(Self::DayOfWeek),
            "month" => Ok(Self::Month),
            "year" => Ok(Self::Year),
            "discount" | "has_discount" => Ok(Self::Discount),
            _ => Err(AppError::UnknownDimension(s.to_string())),
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Numeric columns that can be summed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Measure {
    TotalSpent,
    Quantity,
    UnitPrice,
    DiscountApplied,
}

impl Measure {
    pub fn key(&self) -> &'static str {
        match self {
            Self::TotalSpent => "total_spent",
            Self::Quantity => "quantity",
            Self::UnitPrice => "unit_price",
            Self::DiscountApplied => "discount_applied",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::TotalSpent => "Total Spent",
            Self::Quantity => "Quantity",
            Self::UnitPrice => "Unit Price",
            Self::DiscountApplied => "Discount Applied",
        }
    }

    pub fn value(&self, txn: &Transaction) -> f64 {
        match self {
            Self::TotalSpent => txn.raw.total_spent,
            Self::Quantity => txn.raw.quantity,
            Self::UnitPrice => txn.raw.unit_price,
            Self::DiscountApplied => txn.raw.discount_applied,
        }
    }

    /// Whether values of this measure are money amounts.
    pub fn is_money(&self) -> bool {
        matches!(self, Self::TotalSpent | Self::UnitPrice)
    }
}

impl FromStr for Measure {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "total" | "total_spent" | "sales" => Ok(Self::TotalSpent),
            "quantity" | "qty" | "units" => Ok(Self::Quantity),
            "unit_price" | "price" => Ok(Self::UnitPrice),
            "discount" | "discount_applied" => Ok(Self::DiscountApplied),
            _ => Err(AppError::UnknownMeasure(s.to_string())),
        }
    }
}

impl fmt::Display for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}
