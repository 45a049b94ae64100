//! The sortable, filterable document table.
//!
//! Rows are built from the upstream document list, filtered by the values of
//! the filter controls and sorted by the active header. Filtering only toggles
//! row visibility and sorting only moves rows, so the two can run in either
//! order.

mod filter;
mod row;
mod sort;
mod stats;
mod view;

pub(crate) use filter::{FilterBinding, FilterConfig, FilterState, initialize_filters};
pub(crate) use row::{DocumentRecord, DocumentRow};
pub(crate) use sort::{SortColumn, SortDirection, SortState, sort_rows};
pub(crate) use stats::TableStats;
pub(crate) use view::{TableLinks, documents_table_view, table_stats_view};
