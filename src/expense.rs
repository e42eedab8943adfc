//! Expense records as delivered by the backend.

use std::{fmt, str::FromStr};

use chrono::NaiveDate;
use log::warn;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Shown in place of a missing invoice number.
pub const NOT_AVAILABLE: &str = "N/A";

/// The fixed set of expense categories.
///
/// On the wire categories use the backend's Hebrew labels, the English
/// labels are accepted as aliases.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Category {
    Vehicle,
    Food,
    Operations,
    It,
    Training,
    #[default]
    Other,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Vehicle,
        Category::Food,
        Category::Operations,
        Category::It,
        Category::Training,
        Category::Other,
    ];

    /// The value the backend uses for this category.
    pub fn wire_value(self) -> &'static str {
        match self {
            Category::Vehicle => "רכב",
            Category::Food => "מזון",
            Category::Operations => "תפעול",
            Category::It => "IT",
            Category::Training => "הדרכה/הכשרה",
            Category::Other => "אחר",
        }
    }

    /// The English display label.
    pub fn label(self) -> &'static str {
        match self {
            Category::Vehicle => "Vehicle",
            Category::Food => "Food",
            Category::Operations => "Operations",
            Category::It => "IT",
            Category::Training => "Training",
            Category::Other => "Other",
        }
    }

    /// Look up a category by its wire value or English label.
    pub fn from_wire(value: &str) -> Option<Self> {
        let value = value.trim();
        Category::ALL.into_iter().find(|category| {
            category.wire_value() == value || category.label().eq_ignore_ascii_case(value)
        })
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.wire_value())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;

        Ok(Category::from_wire(&raw).unwrap_or_else(|| {
            warn!("unknown expense category \"{raw}\", showing it as Other");
            Category::Other
        }))
    }
}

/// A monetary amount as received, plus its numeric value when it parses.
///
/// The backend may send amounts as JSON numbers or as strings. Values that do
/// not parse keep their raw text for display and have no numeric value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Amount {
    raw: String,
    value: Option<Decimal>,
}

impl Amount {
    pub fn parse(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let value = parse_decimal(raw.trim());

        Self { raw, value }
    }

    pub fn value(&self) -> Option<Decimal> {
        self.value
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    // `Decimal::from_str` would read "1_000" as a thousand.
    if text.contains('_') {
        return None;
    }

    Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok()
        .or_else(|| tiny_scientific(text))
}

/// Values too small for 28 decimal places round towards zero.
fn tiny_scientific(text: &str) -> Option<Decimal> {
    let (mantissa, exponent) = text.split_once(|c| c == 'e' || c == 'E')?;
    let mut value = Decimal::from_str(mantissa).ok()?;
    let exponent: i64 = exponent.parse().ok()?;
    if exponent >= 0 {
        return None;
    }

    for _ in 0..exponent.unsigned_abs() {
        if value.is_zero() {
            break;
        }
        value /= Decimal::TEN;
    }

    if value.is_zero() {
        return Some(Decimal::ZERO);
    }
    Some(value)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawAmount {
    Number(serde_json::Number),
    Text(String),
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = match Option::<RawAmount>::deserialize(deserializer)? {
            Some(RawAmount::Number(number)) => number.to_string(),
            Some(RawAmount::Text(text)) => text,
            None => String::new(),
        };

        Ok(Amount::parse(raw))
    }
}

/// A calendar date as received, plus the parsed date when it is valid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionDate {
    raw: String,
    value: Option<NaiveDate>,
}

impl TransactionDate {
    /// Parse an ISO 8601 date, e.g. `2024-03-01`.
    ///
    /// A full date-time is accepted and truncated to its date.
    pub fn parse(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let trimmed = raw.trim();
        let date_part = trimmed.split_once('T').map_or(trimmed, |(date, _)| date);
        let value = NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok();

        Self { raw, value }
    }

    pub fn value(&self) -> Option<NaiveDate> {
        self.value
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }
}

impl<'de> Deserialize<'de> for TransactionDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?.unwrap_or_default();
        Ok(TransactionDate::parse(raw))
    }
}

impl fmt::Display for TransactionDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value {
            Some(date) => write!(f, "{}", date.format("%Y-%m-%d")),
            None => f.write_str(&self.raw),
        }
    }
}

/// A processed invoice line.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Expense {
    pub id: i64,
    #[serde(default)]
    pub invoice_id: Option<i64>,
    pub business_name: String,
    pub transaction_date: TransactionDate,
    pub amount_before_vat: Amount,
    pub amount_after_vat: Amount,
    pub category: Category,
    #[serde(default)]
    pub invoice_number: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
}

impl Expense {
    /// The invoice number, or [NOT_AVAILABLE] when it is missing or blank.
    pub fn invoice_number_display(&self) -> &str {
        self.invoice_number
            .as_deref()
            .filter(|number| !number.trim().is_empty())
            .unwrap_or(NOT_AVAILABLE)
    }
}
