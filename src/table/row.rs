//! Table rows and the sort keys derived from them.

use std::cmp::Ordering;

use serde::Deserialize;
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::html::format_currency;

const WIRE_DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");
const DISPLAY_DATE_FORMAT: &[BorrowedFormatItem] = format_description!("[day]/[month]/[year]");

/// An invoice or estimate as listed by the upstream service.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub(crate) struct DocumentRecord {
    pub number: String,
    /// The issue date as "YYYY-MM-DD".
    pub date: String,
    pub client: String,
    #[serde(default)]
    pub service: String,
    pub amount: f64,
    #[serde(default = "default_currency_symbol")]
    pub currency_symbol: String,
    #[serde(default)]
    pub status: String,
}

fn default_currency_symbol() -> String {
    "€".to_owned()
}

/// A displayed document with its cell text and the attributes used for
/// sorting and filtering.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct DocumentRow {
    pub number: String,
    /// The date as shown, "dd/mm/yyyy".
    pub date: String,
    /// The date as YYYYMMDD, or `None` if the upstream date could not be parsed.
    pub date_key: Option<u32>,
    pub client: String,
    pub service: String,
    /// The currency formatted amount, e.g. "€1,200.50".
    pub amount: String,
    /// The amount as sent by the upstream service, if known.
    pub amount_number: Option<f64>,
    pub status: String,
    pub visible: bool,
}

impl From<DocumentRecord> for DocumentRow {
    fn from(record: DocumentRecord) -> Self {
        let (date, date_key) = match Date::parse(&record.date, WIRE_DATE_FORMAT) {
            Ok(date) => (
                date.format(DISPLAY_DATE_FORMAT)
                    .unwrap_or_else(|_| record.date.clone()),
                Some(date_key(date)),
            ),
            Err(error) => {
                tracing::warn!(
                    "Document {} has an invalid date \"{}\": {error}",
                    record.number,
                    record.date
                );
                (record.date.clone(), None)
            }
        };

        Self {
            number: record.number,
            date,
            date_key,
            client: record.client,
            service: record.service,
            amount: format_currency(record.amount, &record.currency_symbol),
            amount_number: Some(record.amount),
            status: record.status,
            visible: true,
        }
    }
}

/// The date as a number that orders the same way as the date, e.g. 20250301.
pub(crate) fn date_key(date: Date) -> u32 {
    // Years are limited to 1..=9999 by the wire format.
    date.year().unsigned_abs() * 10_000 + u32::from(u8::from(date.month())) * 100 + u32::from(date.day())
}

/// The numeric value of a currency formatted string, ignoring currency
/// symbols and thousands separators.
///
/// Symbols that contain digits or '.' are not supported.
///
/// Returns `None` if no number remains after stripping.
pub(crate) fn parse_amount(text: &str) -> Option<f64> {
    let digits = text
        .chars()
        .filter(|character| character.is_ascii_digit() || *character == '.' || *character == '-')
        .collect::<String>();

    digits.parse().ok()
}

/// The value a row is ordered by for one column.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum SortKey {
    Number(f64),
    Text(String),
}

impl SortKey {
    /// Three-way comparison of two keys. Keys of different kinds, or numbers
    /// that cannot be ordered, compare equal.
    pub(crate) fn compare(&self, other: &SortKey) -> Ordering {
        match (self, other) {
            (SortKey::Number(left), SortKey::Number(right)) => {
                left.partial_cmp(right).unwrap_or(Ordering::Equal)
            }
            (SortKey::Text(left), SortKey::Text(right)) => left.cmp(right),
            _ => Ordering::Equal,
        }
    }
}

impl DocumentRow {
    /// The text of each cell in display order.
    pub(crate) fn cells(&self) -> [&str; 6] {
        [
            &self.number,
            &self.date,
            &self.client,
            &self.service,
            &self.amount,
            &self.status,
        ]
    }

    /// The value of a filterable attribute, as exposed in the row's `data-*` attributes.
    pub(crate) fn attribute(&self, name: &str) -> Option<&str> {
        match name {
            "number" => Some(&self.number),
            "client" => Some(&self.client),
            "service" => Some(&self.service),
            "status" => Some(&self.status),
            _ => None,
        }
    }

    /// Whether the lower-cased text of any cell contains `query`, which must
    /// already be lower-cased.
    pub(crate) fn text_contains(&self, query: &str) -> bool {
        self.cells()
            .iter()
            .any(|cell| cell.to_lowercase().contains(query))
    }

    /// The amount as a number. Falls back to parsing the amount cell when
    /// the upstream amount is not known.
    pub(crate) fn amount_value(&self) -> Option<f64> {
        self.amount_number.or_else(|| parse_amount(&self.amount))
    }
}
