//! Ordering document rows by a column.

use std::cmp::Ordering;

use serde::Deserialize;

use super::row::{DocumentRow, SortKey};

/// A column of the document table that rows can be sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum SortColumn {
    Number,
    Date,
    Client,
    Service,
    Amount,
    Status,
}

impl SortColumn {
    pub(crate) const ALL: [SortColumn; 6] = [
        SortColumn::Number,
        SortColumn::Date,
        SortColumn::Client,
        SortColumn::Service,
        SortColumn::Amount,
        SortColumn::Status,
    ];

    pub(crate) fn as_str(self) -> &'static str {
        match self {
            SortColumn::Number => "number",
            SortColumn::Date => "date",
            SortColumn::Client => "client",
            SortColumn::Service => "service",
            SortColumn::Amount => "amount",
            SortColumn::Status => "status",
        }
    }

    pub(crate) fn label(self) -> &'static str {
        match self {
            SortColumn::Number => "Number",
            SortColumn::Date => "Date",
            SortColumn::Client => "Client",
            SortColumn::Service => "Service",
            SortColumn::Amount => "Amount",
            SortColumn::Status => "Status",
        }
    }

    /// The key `row` is ordered by for this column, or `None` if the row has
    /// no usable value.
    pub(crate) fn key(self, row: &DocumentRow) -> Option<SortKey> {
        let text = |value: &str| SortKey::Text(value.to_lowercase());

        match self {
            SortColumn::Number => Some(text(&row.number)),
            SortColumn::Date => row.date_key.map(|key| SortKey::Number(f64::from(key))),
            SortColumn::Client => Some(text(&row.client)),
            SortColumn::Service => Some(text(&row.service)),
            SortColumn::Amount => row.amount_value().map(SortKey::Number),
            SortColumn::Status => Some(text(&row.status)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub(crate) enum SortDirection {
    #[serde(rename = "asc")]
    Ascending,
    #[serde(rename = "desc")]
    Descending,
}

impl SortDirection {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            SortDirection::Ascending => "asc",
            SortDirection::Descending => "desc",
        }
    }

    pub(crate) fn is_ascending(self) -> bool {
        self == SortDirection::Ascending
    }
}

/// The column and direction a table is sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct SortState {
    pub column: SortColumn,
    pub direction: SortDirection,
}

impl Default for SortState {
    /// Newest documents first.
    fn default() -> Self {
        Self {
            column: SortColumn::Date,
            direction: SortDirection::Descending,
        }
    }
}

impl SortState {
    /// The sort state after activating the header of `column`.
    ///
    /// A column that is currently sorted ascending flips to descending, any
    /// other column is sorted ascending.
    pub(crate) fn toggled(self, column: SortColumn) -> Self {
        let direction = if self.column == column && self.direction.is_ascending() {
            SortDirection::Descending
        } else {
            SortDirection::Ascending
        };

        Self { column, direction }
    }

    /// The class for the header cell of `column`: the direction for the
    /// sorted column, nothing otherwise.
    pub(crate) fn header_class(self, column: SortColumn) -> Option<&'static str> {
        (self.column == column).then_some(self.direction.as_str())
    }
}

/// Three-way comparison of two rows by `column`. Rows without a key for the
/// column compare equal to every other row.
pub(crate) fn compare_rows(left: &DocumentRow, right: &DocumentRow, column: SortColumn) -> Ordering {
    match (column.key(left), column.key(right)) {
        (Some(left), Some(right)) => left.compare(&right),
        _ => Ordering::Equal,
    }
}

/// Reorder `rows` by `column` in `direction`.
///
/// The sort is stable: rows with equal keys keep their relative order. Rows
/// are moved, never modified.
pub(crate) fn sort_rows(rows: &mut [DocumentRow], column: SortColumn, direction: SortDirection) {
    // Keys that are missing compare equal to everything, which is not a total
    // order, so this is a plain insertion sort rather than `sort_by`.
    for index in 1..rows.len() {
        let mut position = index;

        while position > 0 {
            let ordering = compare_rows(&rows[position - 1], &rows[position], column);
            let ordering = if direction.is_ascending() {
                ordering
            } else {
                ordering.reverse()
            };

            if ordering != Ordering::Greater {
                break;
            }

            rows.swap(position - 1, position);
            position -= 1;
        }
    }
}
