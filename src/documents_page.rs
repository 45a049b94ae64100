//! The page listing invoices or estimates as a sortable, filterable table,
//! and the routes that delete them.

use std::collections::BTreeSet;

use axum::{
    extract::{FromRef, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use axum_htmx::{HxRedirect, HxRequest};
use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    AppState, Error, UpstreamClient,
    chart::{resolve_year, year_options},
    document_form::DocumentType,
    endpoints::{self, format_endpoint_segment},
    html::{FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, base},
    navigation::NavBar,
    not_found::get_404_not_found_response,
    routing::get_internal_server_error_redirect,
    table::{
        DocumentRecord, DocumentRow, FilterBinding, FilterConfig, FilterState, SortColumn,
        SortDirection, SortState, TableLinks, TableStats, documents_table_view,
        initialize_filters, sort_rows, table_stats_view,
    },
    theme::ThemeContext,
    timezone::local_today,
};

const TABLE_ID: &str = "documents-table";
const RESULTS_ID: &str = "documents-results";
const FILTERS_FORM_ID: &str = "documents-filters";
const SEARCH_CONTROL: &str = "q";

/// Get the documents of `document_type`, optionally limited to one year.
///
/// # Errors
/// Returns an error if the upstream request fails or the list cannot be decoded.
pub(crate) async fn fetch_documents(
    upstream: &UpstreamClient,
    document_type: DocumentType,
    year: Option<i32>,
) -> Result<Vec<DocumentRecord>, Error> {
    let mut query = vec![("type", document_type.as_str().to_owned())];

    if let Some(year) = year {
        query.push(("year", year.to_string()));
    }

    upstream.get_json("/api/documents", &query).await
}

/// The state needed for the document table and delete routes.
#[derive(Debug, Clone)]
pub struct DocumentsState {
    /// The client for the upstream invoice service.
    pub upstream: UpstreamClient,
    /// The local timezone as a canonical timezone name, e.g. "Europe/Madrid".
    pub local_timezone: String,
}

impl FromRef<AppState> for DocumentsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            upstream: state.upstream.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct DocumentsQuery {
    doc_type: Option<String>,
    year: Option<String>,
    sort: Option<String>,
    dir: Option<String>,
    status: Option<String>,
    client: Option<String>,
    q: Option<String>,
}

/// The sort state requested by the `sort` and `dir` query parameters.
///
/// Unknown values fall back to the default sort. A column without a direction
/// is sorted ascending.
fn requested_sort(sort: Option<&str>, dir: Option<&str>) -> SortState {
    let default = SortState::default();
    let column = sort.and_then(|sort| {
        SortColumn::ALL
            .into_iter()
            .find(|column| column.as_str() == sort)
    });
    let direction = match dir {
        Some("asc") => Some(SortDirection::Ascending),
        Some("desc") => Some(SortDirection::Descending),
        _ => None,
    };

    match (column, direction) {
        (Some(column), Some(direction)) => SortState { column, direction },
        (Some(column), None) => SortState {
            column,
            direction: SortDirection::Ascending,
        },
        (None, Some(direction)) => SortState {
            column: default.column,
            direction,
        },
        (None, None) => default,
    }
}

fn filter_bindings() -> Vec<FilterBinding> {
    vec![
        FilterBinding::attribute("status"),
        FilterBinding::attribute("client"),
        FilterBinding::search(SEARCH_CONTROL),
    ]
}

/// Everything the table page needs to render, after filtering and sorting.
struct DocumentsPage {
    document_type: DocumentType,
    year: i32,
    years: Vec<i32>,
    sort_state: SortState,
    filters: FilterState,
    rows: Vec<DocumentRow>,
    stats: TableStats,
    statuses: BTreeSet<String>,
    clients: BTreeSet<String>,
    currency_symbol: String,
    load_failed: bool,
}

impl DocumentsPage {
    /// The page URL with the current type, year and filters and `sort_state`.
    fn url(&self, sort_state: SortState) -> String {
        let year = self.year.to_string();
        let mut params = vec![
            ("doc_type", self.document_type.as_str()),
            ("year", year.as_str()),
            ("sort", sort_state.column.as_str()),
            ("dir", sort_state.direction.as_str()),
        ];

        for control in ["status", "client", SEARCH_CONTROL] {
            let value = self.filters.value(control);
            if !value.is_empty() {
                params.push((control, value));
            }
        }

        match serde_urlencoded::to_string(&params) {
            Ok(query) => format!("{}?{query}", endpoints::DOCUMENTS_VIEW),
            Err(error) => {
                tracing::error!("Could not encode the document table query: {error}");
                endpoints::DOCUMENTS_VIEW.to_owned()
            }
        }
    }
}

/// Display the invoice or estimate table.
///
/// Requests made by htmx get only the results section, which holds the stats
/// and the table.
pub(crate) async fn get_documents_page(
    State(state): State<DocumentsState>,
    HxRequest(is_htmx_request): HxRequest,
    jar: CookieJar,
    Query(query): Query<DocumentsQuery>,
) -> Result<Response, Error> {
    let today = local_today(&state.local_timezone)?;
    let theme = ThemeContext::from_cookies(&jar).get();
    let document_type = DocumentType::from_query(query.doc_type.as_deref());
    let year = resolve_year(query.year.as_deref(), today);

    let (records, load_failed) = match fetch_documents(&state.upstream, document_type, Some(year)).await
    {
        Ok(records) => (records, false),
        Err(error) => {
            tracing::warn!(
                "Could not get {}s for {year}, showing an empty table: {error}",
                document_type.as_str()
            );
            (Vec::new(), true)
        }
    };

    let currency_symbol = records
        .first()
        .map(|record| record.currency_symbol.clone())
        .unwrap_or_else(|| "€".to_owned());

    let mut rows = records.into_iter().map(DocumentRow::from).collect::<Vec<_>>();
    let statuses = rows
        .iter()
        .filter(|row| !row.status.is_empty())
        .map(|row| row.status.clone())
        .collect();
    let clients = rows.iter().map(|row| row.client.clone()).collect();

    let filters = FilterState::default()
        .with("status", query.status.as_deref().unwrap_or_default())
        .with("client", query.client.as_deref().unwrap_or_default())
        .with(SEARCH_CONTROL, query.q.as_deref().unwrap_or_default());

    let mut stats = TableStats::from_rows(&rows);
    {
        let config = FilterConfig::new(filter_bindings())
            .on_change(|rows: &[DocumentRow]| stats = TableStats::from_rows(rows));
        let mut table_filter = initialize_filters(TABLE_ID, config);
        table_filter.apply_filters(&mut rows, &filters);
    }

    let sort_state = requested_sort(query.sort.as_deref(), query.dir.as_deref());
    sort_rows(&mut rows, sort_state.column, sort_state.direction);

    let page = DocumentsPage {
        document_type,
        year,
        years: year_options(year, today),
        sort_state,
        filters,
        rows,
        stats,
        statuses,
        clients,
        currency_symbol,
        load_failed,
    };

    if is_htmx_request {
        return Ok(results_view(&page).into_response());
    }

    let content = html! {
        (NavBar::new(document_type.table_link(), theme).into_html())

        main class=(PAGE_CONTAINER_STYLE)
        {
            header class="flex justify-between flex-wrap items-end mb-4"
            {
                h1 class="text-xl font-bold" { (document_type.plural_title()) }

                a
                    href=(format!("{}?doc_type={}", endpoints::NEW_DOCUMENT_VIEW, document_type.as_str()))
                    class=(LINK_STYLE)
                {
                    "New " (document_type.as_str())
                }
            }

            (filters_view(&page))
            (results_view(&page))
        }
    };

    Ok(base(document_type.plural_title(), theme, &[], &content).into_response())
}

fn select_control(
    name: &str,
    label: &str,
    all_label: &str,
    values: &BTreeSet<String>,
    selected: &str,
) -> Markup {
    html! {
        div
        {
            label for=(name) class=(FORM_LABEL_STYLE) { (label) }
            select id=(name) name=(name) class=(FORM_TEXT_INPUT_STYLE)
            {
                option value="all" selected[selected.is_empty() || selected == "all"] { (all_label) }
                @for value in values {
                    option value=(value) selected[selected == value] { (value) }
                }
            }
        }
    }
}

fn filters_view(page: &DocumentsPage) -> Markup {
    let target = format!("#{RESULTS_ID}");

    html! {
        form
            id=(FILTERS_FORM_ID)
            method="get"
            action=(endpoints::DOCUMENTS_VIEW)
            hx-get=(endpoints::DOCUMENTS_VIEW)
            hx-target=(target)
            hx-swap="outerHTML"
            hx-push-url="true"
            hx-trigger="change, input changed delay:300ms from:#q"
            class="grid grid-cols-1 md:grid-cols-4 gap-4 mb-4"
        {
            input type="hidden" name="doc_type" value=(page.document_type.as_str());

            div
            {
                label for="year" class=(FORM_LABEL_STYLE) { "Year" }
                select id="year" name="year" class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for year in &page.years {
                        option value=(year) selected[*year == page.year] { (year) }
                    }
                }
            }

            (select_control("status", "Status", "All statuses", &page.statuses, page.filters.value("status")))
            (select_control("client", "Client", "All clients", &page.clients, page.filters.value("client")))

            div
            {
                label for=(SEARCH_CONTROL) class=(FORM_LABEL_STYLE) { "Search" }
                input
                    type="search"
                    id=(SEARCH_CONTROL)
                    name=(SEARCH_CONTROL)
                    value=(page.filters.value(SEARCH_CONTROL))
                    placeholder="Number, client, service..."
                    class=(FORM_TEXT_INPUT_STYLE);
            }
        }
    }
}

fn results_view(page: &DocumentsPage) -> Markup {
    let target = format!("#{RESULTS_ID}");
    let sort_url = |sort_state: SortState| page.url(sort_state);
    let delete_endpoint = page.document_type.delete_endpoint();
    let delete_url = |row: &DocumentRow| format_endpoint_segment(delete_endpoint, &row.number);
    let links = TableLinks {
        sort_url: &sort_url,
        delete_url: &delete_url,
        target: &target,
        noun: page.document_type.as_str(),
    };

    html! {
        section id=(RESULTS_ID) class="space-y-4"
        {
            // Swapped with the results so the filter form submits the current sort.
            input type="hidden" form=(FILTERS_FORM_ID) name="sort" value=(page.sort_state.column.as_str());
            input type="hidden" form=(FILTERS_FORM_ID) name="dir" value=(page.sort_state.direction.as_str());

            @if page.load_failed {
                p role="alert" class="text-sm text-red-600 dark:text-red-400"
                {
                    "Could not load " (page.document_type.plural_title().to_lowercase())
                    ". Check that the invoice service is running."
                }
            }

            (table_stats_view(&page.stats, &page.currency_symbol))

            div class="overflow-x-auto rounded"
            {
                (documents_table_view(TABLE_ID, &page.rows, page.sort_state, &links))
            }
        }
    }
}

/// Forward the deletion of a document to the upstream service and send the
/// client back to the document table.
async fn delete_document(
    upstream: &UpstreamClient,
    document_type: DocumentType,
    number: &str,
) -> Response {
    let Some(path) = format_endpoint_segment(document_type.delete_endpoint(), number) else {
        tracing::warn!("Refusing to delete {} \"{number}\"", document_type.as_str());
        return get_404_not_found_response();
    };

    match upstream.get(&path).await {
        Ok(()) => {
            tracing::info!("Deleted {} {number}", document_type.as_str());
            (HxRedirect(document_type.table_link().to_owned()), StatusCode::OK).into_response()
        }
        Err(Error::NotFound) => {
            tracing::warn!(
                "Could not delete {} {number}, it no longer exists",
                document_type.as_str()
            );
            (HxRedirect(document_type.table_link().to_owned()), StatusCode::OK).into_response()
        }
        Err(error) => {
            tracing::error!("Could not delete {} {number}: {error}", document_type.as_str());
            get_internal_server_error_redirect()
        }
    }
}

/// A route handler for deleting an invoice.
pub(crate) async fn delete_invoice(
    State(state): State<DocumentsState>,
    Path(number): Path<String>,
) -> Response {
    delete_document(&state.upstream, DocumentType::Invoice, &number).await
}

/// A route handler for deleting an estimate.
pub(crate) async fn delete_estimate(
    State(state): State<DocumentsState>,
    Path(number): Path<String>,
) -> Response {
    delete_document(&state.upstream, DocumentType::Estimate, &number).await
}
