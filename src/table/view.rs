//! HTML rendering for the document table.

use maud::{Markup, html};

use crate::html::{
    BADGE_STYLE, BUTTON_DELETE_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
    format_currency,
};

use super::{
    row::DocumentRow,
    sort::{SortColumn, SortState},
    stats::TableStats,
};

/// The links a document table needs from the page that renders it.
pub(crate) struct TableLinks<'a> {
    /// The page URL for the table sorted by a given state.
    pub sort_url: &'a dyn Fn(SortState) -> String,
    /// The delete route for a row, if the row can be deleted.
    pub delete_url: &'a dyn Fn(&DocumentRow) -> Option<String>,
    /// The element that header links swap their response into, e.g. "#documents-results".
    pub target: &'a str,
    /// What one row is called in confirmation prompts, e.g. "invoice".
    pub noun: &'a str,
}

fn header_cell(column: SortColumn, sort_state: SortState, links: &TableLinks) -> Markup {
    let url = (links.sort_url)(sort_state.toggled(column));
    let class = match sort_state.header_class(column) {
        Some(direction) => format!("{TABLE_CELL_STYLE} {direction}"),
        None => TABLE_CELL_STYLE.to_owned(),
    };

    html! {
        th scope="col" class=(class) data-sort=(column.as_str())
        {
            a
                href=(url)
                hx-get=(url)
                hx-target=(links.target)
                hx-swap="outerHTML"
                hx-push-url="true"
                class="cursor-pointer select-none"
            {
                (column.label())
            }
        }
    }
}

fn row_view(row: &DocumentRow, links: &TableLinks) -> Markup {
    let confirm_message = format!(
        "Are you sure you want to delete {} {}? This cannot be undone.",
        links.noun, row.number
    );

    html! {
        tr
            class=(TABLE_ROW_STYLE)
            data-number=(row.number)
            data-client=(row.client)
            data-service=(row.service)
            data-status=(row.status)
            hidden[!row.visible]
        {
            td class={ (TABLE_CELL_STYLE) " font-medium text-gray-900 dark:text-white" } { (row.number) }
            td class=(TABLE_CELL_STYLE) { (row.date) }
            td class=(TABLE_CELL_STYLE) { (row.client) }
            td class=(TABLE_CELL_STYLE) { (row.service) }
            td class={ (TABLE_CELL_STYLE) " text-right" } { (row.amount) }
            td class=(TABLE_CELL_STYLE)
            {
                @if !row.status.is_empty() {
                    span class=(BADGE_STYLE) { (row.status) }
                }
            }
            td class=(TABLE_CELL_STYLE)
            {
                @if let Some(delete_url) = (links.delete_url)(row) {
                    button
                        type="button"
                        class=(BUTTON_DELETE_STYLE)
                        hx-get=(delete_url)
                        hx-confirm=(confirm_message)
                    {
                        "Delete"
                    }
                }
            }
        }
    }
}

/// The document table with sortable headers. Hidden rows are rendered with
/// the `hidden` attribute so the row order survives filtering.
pub(crate) fn documents_table_view(
    table_id: &str,
    rows: &[DocumentRow],
    sort_state: SortState,
    links: &TableLinks,
) -> Markup {
    let any_visible = rows.iter().any(|row| row.visible);

    html! {
        table
            id=(table_id)
            class="w-full my-2 text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
        {
            thead class=(TABLE_HEADER_STYLE)
            {
                tr
                {
                    @for column in SortColumn::ALL {
                        (header_cell(column, sort_state, links))
                    }
                    th scope="col" class=(TABLE_CELL_STYLE) { "Actions" }
                }
            }

            tbody
            {
                @for row in rows {
                    (row_view(row, links))
                }

                @if !any_visible {
                    tr
                    {
                        td colspan="7" data-empty-state="true" class="px-6 py-4 text-center"
                        {
                            "No documents match the current filters."
                        }
                    }
                }
            }
        }
    }
}

/// The summary of the visible rows shown above the table.
pub(crate) fn table_stats_view(stats: &TableStats, currency_symbol: &str) -> Markup {
    html! {
        dl id="table-stats" class="grid grid-cols-3 gap-4 text-sm"
        {
            div
            {
                dt class="text-gray-500 dark:text-gray-400" { "Documents" }
                dd id="stats-count" class="text-lg font-semibold dark:text-white" { (stats.visible_count) }
            }
            div
            {
                dt class="text-gray-500 dark:text-gray-400" { "Total" }
                dd id="stats-total" class="text-lg font-semibold dark:text-white"
                {
                    (format_currency(stats.total_amount, currency_symbol))
                }
            }
            div
            {
                dt class="text-gray-500 dark:text-gray-400" { "Clients" }
                dd id="stats-clients" class="text-lg font-semibold dark:text-white" { (stats.unique_clients) }
            }
        }
    }
}
