use std::collections::BTreeSet;

use super::row::DocumentRow;

/// Summary figures for the visible rows of a table.
#[derive(Debug, Clone, Default, PartialEq)]
pub(crate) struct TableStats {
    pub visible_count: usize,
    pub total_amount: f64,
    pub unique_clients: usize,
}

impl TableStats {
    /// Compute the stats over the rows that are currently visible. Rows whose
    /// amount cannot be parsed add nothing to the total.
    pub(crate) fn from_rows(rows: &[DocumentRow]) -> Self {
        let visible = rows.iter().filter(|row| row.visible);

        let mut stats = Self::default();
        let mut clients = BTreeSet::new();

        for row in visible {
            stats.visible_count += 1;
            stats.total_amount += row.amount_value().unwrap_or_default();
            clients.insert(row.client.as_str());
        }

        stats.unique_clients = clients.len();
        stats
    }
}
