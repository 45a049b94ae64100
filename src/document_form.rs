//! The page for creating a new invoice or estimate.
//!
//! Both document types share one form. The form renders the content of both
//! variants and a CSS rule keyed on the checked type radio hides the other
//! variant. Each type radio rewrites the form's action when checked, so
//! switching type never touches the network.

use std::sync::Arc;

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use maud::{Markup, PreEscaped, html};
use serde::Deserialize;
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    AppState, Error, UpstreamClient,
    documents_page::fetch_documents,
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, CARD_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE,
        FORM_RADIO_INPUT_STYLE, FORM_RADIO_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, HeadElement,
        PAGE_CONTAINER_STYLE, base, link,
    },
    navigation::{ESTIMATES_LINK, INVOICES_LINK, NavBar},
    selection::{
        DetailKind, DetailSequencer, Details, SelectionGroup, SelectionOption, fetch_details,
        selection_group_view,
    },
    table::{DocumentRow, SortColumn, SortDirection, sort_rows},
    theme::ThemeContext,
    timezone::local_today,
};

/// The number of documents listed under the form.
const RECENT_DOCUMENT_COUNT: usize = 10;

const DATE_INPUT_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// Hides the content of whichever document type is not checked.
const DOCUMENT_TYPE_SWITCH_STYLE: &str = r#"
    #document-page:has(#document-type-estimate:checked) .invoice-only { display: none; }
    #document-page:has(#document-type-invoice:checked) .estimate-only { display: none; }
"#;

/// The kind of document the form creates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum DocumentType {
    #[default]
    Invoice,
    Estimate,
}

impl DocumentType {
    pub(crate) const ALL: [DocumentType; 2] = [DocumentType::Invoice, DocumentType::Estimate];

    pub(crate) fn as_str(self) -> &'static str {
        match self {
            DocumentType::Invoice => "invoice",
            DocumentType::Estimate => "estimate",
        }
    }

    /// Parse a query value, treating anything unknown as an invoice.
    pub(crate) fn from_query(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("estimate") => DocumentType::Estimate,
            _ => DocumentType::Invoice,
        }
    }

    pub(crate) fn plural_title(self) -> &'static str {
        match self {
            DocumentType::Invoice => "Invoices",
            DocumentType::Estimate => "Estimates",
        }
    }

    /// The document table for this type.
    pub(crate) fn table_link(self) -> &'static str {
        match self {
            DocumentType::Invoice => INVOICES_LINK,
            DocumentType::Estimate => ESTIMATES_LINK,
        }
    }

    /// The route that deletes a document of this type.
    pub(crate) fn delete_endpoint(self) -> &'static str {
        match self {
            DocumentType::Invoice => endpoints::DELETE_INVOICE,
            DocumentType::Estimate => endpoints::DELETE_ESTIMATE,
        }
    }

    /// The class that hides an element unless this type is checked.
    fn variant_class(self) -> &'static str {
        match self {
            DocumentType::Invoice => "invoice-only",
            DocumentType::Estimate => "estimate-only",
        }
    }

    pub(crate) fn view(self) -> DocumentTypeView {
        match self {
            DocumentType::Invoice => DocumentTypeView {
                form_target: "/generate_invoice",
                form_title: "Generate New Invoice",
                submit_label: "Generate Invoice",
                date_label: "Invoice Date",
                recent_title: "Recent Invoices",
                show_estimate_fields: false,
                show_tax_options: true,
            },
            DocumentType::Estimate => DocumentTypeView {
                form_target: "/generate_estimate",
                form_title: "Generate New Estimate",
                submit_label: "Generate Estimate",
                date_label: "Estimate Date",
                recent_title: "Recent Estimates",
                show_estimate_fields: true,
                show_tax_options: false,
            },
        }
    }
}

/// What the form shows for one document type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct DocumentTypeView {
    /// The upstream route the form is submitted to.
    pub form_target: &'static str,
    pub form_title: &'static str,
    pub submit_label: &'static str,
    pub date_label: &'static str,
    pub recent_title: &'static str,
    /// Validity, notes and terms inputs.
    pub show_estimate_fields: bool,
    /// The IVA and IRPF checkboxes.
    pub show_tax_options: bool,
}

/// The state needed for the document form page.
#[derive(Debug, Clone)]
pub struct DocumentFormState {
    /// The client for the upstream invoice service.
    pub upstream: UpstreamClient,
    /// The local timezone as a canonical timezone name, e.g. "Europe/Madrid".
    pub local_timezone: String,
    /// Hands out the page key that detail panel requests are tagged with.
    pub sequencer: Arc<DetailSequencer>,
}

impl FromRef<AppState> for DocumentFormState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            upstream: state.upstream.clone(),
            local_timezone: state.local_timezone.clone(),
            sequencer: state.sequencer.clone(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct DocumentFormQuery {
    doc_type: Option<String>,
    client_id: Option<String>,
    service_id: Option<String>,
}

fn options_path(kind: DetailKind) -> &'static str {
    match kind {
        DetailKind::Client => "/api/clients",
        DetailKind::Service => "/api/services",
    }
}

async fn fetch_options(upstream: &UpstreamClient, kind: DetailKind) -> Vec<SelectionOption> {
    upstream
        .get_json(options_path(kind), &[])
        .await
        .inspect_err(|error| tracing::warn!("Could not get the {} list: {error}", kind.as_str()))
        .unwrap_or_default()
}

/// The most recent documents of `document_type`, newest first.
async fn fetch_recent(upstream: &UpstreamClient, document_type: DocumentType) -> Vec<DocumentRow> {
    let records = fetch_documents(upstream, document_type, None)
        .await
        .inspect_err(|error| {
            tracing::warn!("Could not get recent {}s: {error}", document_type.as_str())
        })
        .unwrap_or_default();

    let mut rows = records.into_iter().map(DocumentRow::from).collect::<Vec<_>>();
    sort_rows(&mut rows, SortColumn::Date, SortDirection::Descending);
    rows.truncate(RECENT_DOCUMENT_COUNT);

    rows
}

async fn preselected_details(upstream: &UpstreamClient, group: &SelectionGroup) -> Option<Details> {
    let id = group.selected()?;

    fetch_details(upstream, group.kind, id)
        .await
        .inspect_err(|error| {
            tracing::warn!("Could not get details for {} {id}: {error}", group.kind.as_str())
        })
        .ok()
}

/// Display the form for a new invoice or estimate.
///
/// `?client_id=` and `?service_id=` preselect a client and service, and
/// `?doc_type=estimate` starts on the estimate variant.
pub(crate) async fn get_new_document_page(
    State(state): State<DocumentFormState>,
    jar: CookieJar,
    Query(query): Query<DocumentFormQuery>,
) -> Result<Response, Error> {
    let today = local_today(&state.local_timezone)?;
    let theme = ThemeContext::from_cookies(&jar).get();
    let document_type = DocumentType::from_query(query.doc_type.as_deref());

    let (clients, services, recent_invoices, recent_estimates) = tokio::join!(
        fetch_options(&state.upstream, DetailKind::Client),
        fetch_options(&state.upstream, DetailKind::Service),
        fetch_recent(&state.upstream, DocumentType::Invoice),
        fetch_recent(&state.upstream, DocumentType::Estimate),
    );

    let mut client_group = SelectionGroup::new(DetailKind::Client, clients);
    client_group.select(query.client_id.as_deref().unwrap_or_default());
    let mut service_group = SelectionGroup::new(DetailKind::Service, services);
    service_group.select(query.service_id.as_deref().unwrap_or_default());

    let (client_details, service_details) = tokio::join!(
        preselected_details(&state.upstream, &client_group),
        preselected_details(&state.upstream, &service_group),
    );

    let page = state.sequencer.open_page();

    let content = html! {
        (NavBar::new(endpoints::NEW_DOCUMENT_VIEW, theme).into_html())

        main id="document-page" class=(PAGE_CONTAINER_STYLE)
        {
            (document_form_view(
                document_type,
                today,
                page,
                &client_group,
                client_details.as_ref(),
                &service_group,
                service_details.as_ref(),
            ))

            (recent_documents_view(DocumentType::Invoice, &recent_invoices))
            (recent_documents_view(DocumentType::Estimate, &recent_estimates))
        }
    };

    let head_elements = [HeadElement::Style(PreEscaped(
        DOCUMENT_TYPE_SWITCH_STYLE.to_owned(),
    ))];

    Ok(base("New Document", theme, &head_elements, &content).into_response())
}

/// Inline handler that points the form at the route for `document_type`.
fn switch_target_script(document_type: DocumentType) -> String {
    format!("this.form.action = '{}';", document_type.view().form_target)
}

fn document_type_switch(checked: DocumentType) -> Markup {
    html! {
        fieldset class="grid grid-cols-2 gap-2 mb-4"
        {
            legend class="sr-only" { "Document type" }

            @for document_type in DocumentType::ALL {
                @let input_id = format!("document-type-{}", document_type.as_str());
                div
                {
                    input
                        type="radio"
                        id=(input_id)
                        name="document_type"
                        value=(document_type.as_str())
                        checked[document_type == checked]
                        onchange=(switch_target_script(document_type))
                        class=(FORM_RADIO_INPUT_STYLE);

                    label for=(input_id) class=(FORM_RADIO_LABEL_STYLE)
                    {
                        @match document_type {
                            DocumentType::Invoice => "Invoice",
                            DocumentType::Estimate => "Estimate",
                        }
                    }
                }
            }
        }
    }
}

fn estimate_fields(class: &str) -> Markup {
    html! {
        div class={ "estimate-fields grid gap-4 " (class) }
        {
            div
            {
                label for="valid_until" class=(FORM_LABEL_STYLE) { "Valid Until" }
                input type="date" id="valid_until" name="valid_until" class=(FORM_TEXT_INPUT_STYLE);
            }
            div
            {
                label for="notes" class=(FORM_LABEL_STYLE) { "Notes" }
                textarea id="notes" name="notes" rows="3" class=(FORM_TEXT_INPUT_STYLE) {}
            }
            div
            {
                label for="terms" class=(FORM_LABEL_STYLE) { "Terms" }
                textarea id="terms" name="terms" rows="3" class=(FORM_TEXT_INPUT_STYLE) {}
            }
        }
    }
}

fn tax_options(class: &str) -> Markup {
    html! {
        div id="tax-options-invoice" class={ "flex gap-6 " (class) }
        {
            label class="flex items-center gap-2 text-sm"
            {
                input type="checkbox" name="apply_iva" value="true" checked;
                "Apply IVA"
            }
            label class="flex items-center gap-2 text-sm"
            {
                input type="checkbox" name="apply_irpf" value="true";
                "Apply IRPF"
            }
        }
    }
}

fn document_form_view(
    document_type: DocumentType,
    today: Date,
    page: u64,
    client_group: &SelectionGroup,
    client_details: Option<&Details>,
    service_group: &SelectionGroup,
    service_details: Option<&Details>,
) -> Markup {
    let today = today.format(DATE_INPUT_FORMAT).unwrap_or_default();

    html! {
        form
            id="document-form"
            method="post"
            action=(document_type.view().form_target)
            class=(FORM_CONTAINER_STYLE)
        {
            h2 id="form-title" class="text-xl font-bold mb-4"
            {
                @for variant in DocumentType::ALL {
                    span class=(variant.variant_class()) { (variant.view().form_title) }
                }
            }

            (document_type_switch(document_type))

            div class="grid gap-4"
            {
                (selection_group_view(client_group, client_details, page))
                (selection_group_view(service_group, service_details, page))

                div
                {
                    label for="quantity" class=(FORM_LABEL_STYLE) { "Quantity" }
                    input
                        type="number"
                        id="quantity"
                        name="quantity"
                        min="1"
                        step="1"
                        value="1"
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="invoice_date" class=(FORM_LABEL_STYLE)
                    {
                        @for variant in DocumentType::ALL {
                            span class=(variant.variant_class()) { (variant.view().date_label) }
                        }
                    }
                    input
                        type="date"
                        id="invoice_date"
                        name="invoice_date"
                        value=(today)
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                @for variant in DocumentType::ALL {
                    @let view = variant.view();
                    @if view.show_tax_options {
                        (tax_options(variant.variant_class()))
                    }
                    @if view.show_estimate_fields {
                        (estimate_fields(variant.variant_class()))
                    }
                }

                // A single submit button, so implicit submission uses the form's action.
                button type="submit" id="document-submit" class=(BUTTON_PRIMARY_STYLE)
                {
                    @for variant in DocumentType::ALL {
                        span class=(variant.variant_class()) { (variant.view().submit_label) }
                    }
                }
            }
        }
    }
}

fn recent_documents_view(document_type: DocumentType, rows: &[DocumentRow]) -> Markup {
    let view = document_type.view();

    html! {
        section
            class={ "recent-documents mt-8 " (document_type.variant_class()) }
            data-document-type=(document_type.as_str())
        {
            div class="flex justify-between items-baseline mb-4"
            {
                h3 class="text-xl font-semibold" { (view.recent_title) }
                span class="text-sm" { (link(document_type.table_link(), "View all")) }
            }

            @if rows.is_empty() {
                p class="text-gray-500 dark:text-gray-400"
                {
                    "No " (document_type.plural_title().to_lowercase()) " yet."
                }
            } @else {
                ul class="grid gap-2"
                {
                    @for row in rows {
                        li class={ (CARD_STYLE) " flex justify-between" } data-number=(row.number)
                        {
                            span class="font-medium" { (row.number) }
                            span { (row.date) }
                            span { (row.client) }
                            span { (row.amount) }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, sync::Arc};

    use axum::{
        Json, Router,
        extract::{Path, Query, State},
        http::StatusCode,
        response::{IntoResponse, Response},
        routing::get,
    };
    use axum_extra::extract::CookieJar;
    use scraper::Selector;
    use serde_json::json;

    use crate::{
        UpstreamClient,
        selection::DetailSequencer,
        test_utils::{
            assert_status_ok, assert_valid_html, must_select, parse_html_document, select_texts,
            spawn_upstream, unreachable_upstream,
        },
    };

    use super::{DocumentFormQuery, DocumentFormState, DocumentType, get_new_document_page};

    fn state(upstream: UpstreamClient) -> State<DocumentFormState> {
        State(DocumentFormState {
            upstream,
            local_timezone: "Etc/UTC".to_owned(),
            sequencer: Arc::new(DetailSequencer::default()),
        })
    }

    fn query(doc_type: Option<&str>, client_id: Option<&str>) -> Query<DocumentFormQuery> {
        Query(DocumentFormQuery {
            doc_type: doc_type.map(str::to_owned),
            client_id: client_id.map(str::to_owned),
            service_id: None,
        })
    }

    async fn documents(Query(query): Query<HashMap<String, String>>) -> Response {
        let prefix = match query.get("type").map(String::as_str) {
            Some("invoice") => "INV",
            Some("estimate") => "EST",
            _ => return StatusCode::BAD_REQUEST.into_response(),
        };

        let documents = (1..=12)
            .map(|day| {
                json!({
                    "number": format!("{prefix}-{day:03}"),
                    "date": format!("2025-01-{day:02}"),
                    "client": "ACME",
                    "amount": 100.0 * f64::from(day),
                })
            })
            .collect::<Vec<_>>();

        Json(documents).into_response()
    }

    fn upstream_router() -> Router {
        Router::new()
            .route(
                "/api/clients",
                get(|| async { Json(json!([{"id": 1, "name": "ACME"}, {"id": 2, "name": "Globex"}])) }),
            )
            .route(
                "/api/services",
                get(|| async { Json(json!([{"id": 7, "description": "Web Design"}])) }),
            )
            .route("/api/documents", get(documents))
            .route(
                "/get_client/{id}",
                get(|Path(id): Path<String>| async move {
                    Json(json!({
                        "name": format!("Client {id}"),
                        "tax_id": "B12345678",
                        "address": "Calle Mayor 1",
                        "country": "Spain",
                        "currency_symbol": "€",
                    }))
                }),
            )
    }

    #[test]
    fn views_describe_each_document_type() {
        let invoice = DocumentType::Invoice.view();
        assert_eq!(invoice.form_target, "/generate_invoice");
        assert_eq!(invoice.form_title, "Generate New Invoice");
        assert_eq!(invoice.submit_label, "Generate Invoice");
        assert_eq!(invoice.date_label, "Invoice Date");
        assert_eq!(invoice.recent_title, "Recent Invoices");
        assert!(!invoice.show_estimate_fields);
        assert!(invoice.show_tax_options);

        let estimate = DocumentType::Estimate.view();
        assert_eq!(estimate.form_target, "/generate_estimate");
        assert_eq!(estimate.form_title, "Generate New Estimate");
        assert_eq!(estimate.submit_label, "Generate Estimate");
        assert_eq!(estimate.date_label, "Estimate Date");
        assert_eq!(estimate.recent_title, "Recent Estimates");
        assert!(estimate.show_estimate_fields);
        assert!(!estimate.show_tax_options);
    }

    #[test]
    fn unknown_document_types_are_invoices() {
        assert_eq!(DocumentType::from_query(Some("estimate")), DocumentType::Estimate);
        assert_eq!(DocumentType::from_query(Some("receipt")), DocumentType::Invoice);
        assert_eq!(DocumentType::from_query(None), DocumentType::Invoice);
    }

    #[tokio::test]
    async fn renders_both_variants_with_invoice_checked() {
        let upstream = spawn_upstream(upstream_router()).await;

        let response = get_new_document_page(state(upstream.client), CookieJar::new(), query(None, None))
            .await
            .unwrap();

        assert_status_ok(&response);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let form = must_select(&html, "form#document-form");
        assert_eq!(form.value().attr("action"), Some("/generate_invoice"));
        must_select(&html, "#document-type-invoice[checked]");
        assert_eq!(
            select_texts(&html, "#form-title .invoice-only"),
            ["Generate New Invoice"]
        );
        assert_eq!(
            select_texts(&html, "#form-title .estimate-only"),
            ["Generate New Estimate"]
        );

        assert_eq!(
            select_texts(&html, "#document-submit .estimate-only"),
            ["Generate Estimate"]
        );
        assert_eq!(
            select_texts(&html, "#document-submit .invoice-only"),
            ["Generate Invoice"]
        );

        must_select(&html, ".estimate-fields.estimate-only textarea[name=notes]");
        must_select(&html, "#tax-options-invoice.invoice-only input[name=apply_irpf]");
    }

    #[tokio::test]
    async fn estimate_query_starts_on_estimate() {
        let upstream = spawn_upstream(upstream_router()).await;

        let response = get_new_document_page(
            state(upstream.client),
            CookieJar::new(),
            query(Some("estimate"), None),
        )
        .await
        .unwrap();

        let html = parse_html_document(response).await;
        must_select(&html, "#document-type-estimate[checked]");
        let form = must_select(&html, "form#document-form");
        assert_eq!(form.value().attr("action"), Some("/generate_estimate"));
    }

    #[tokio::test]
    async fn submit_target_follows_the_checked_type() {
        let upstream = spawn_upstream(upstream_router()).await;

        let response = get_new_document_page(
            state(upstream.client),
            CookieJar::new(),
            query(Some("estimate"), None),
        )
        .await
        .unwrap();

        let html = parse_html_document(response).await;
        let submit_buttons = html
            .select(&Selector::parse("form#document-form button[type=submit]").unwrap())
            .collect::<Vec<_>>();
        assert_eq!(submit_buttons.len(), 1, "want exactly one submit button");
        assert_eq!(submit_buttons[0].value().attr("formaction"), None);

        let form = must_select(&html, "form#document-form");
        assert_eq!(form.value().attr("action"), Some("/generate_estimate"));

        let invoice_radio = must_select(&html, "#document-type-invoice");
        assert_eq!(
            invoice_radio.value().attr("onchange"),
            Some("this.form.action = '/generate_invoice';")
        );
        let estimate_radio = must_select(&html, "#document-type-estimate");
        assert_eq!(
            estimate_radio.value().attr("onchange"),
            Some("this.form.action = '/generate_estimate';")
        );
    }

    #[tokio::test]
    async fn preselected_client_shows_its_panel() {
        let upstream = spawn_upstream(upstream_router()).await;

        let response = get_new_document_page(
            state(upstream.client),
            CookieJar::new(),
            query(None, Some("2")),
        )
        .await
        .unwrap();

        let html = parse_html_document(response).await;
        must_select(&html, "input[name=client_id][value=\"2\"][checked]");
        let panel = must_select(&html, "#client-details");
        assert_eq!(panel.value().attr("hidden"), None);
        assert_eq!(select_texts(&html, "#client-details h4"), ["Client 2"]);
        must_select(&html, "#service-details[hidden]");
    }

    #[tokio::test]
    async fn each_render_tags_panel_requests_with_its_own_page() {
        let upstream = spawn_upstream(upstream_router()).await;
        let state = state(upstream.client);

        let mut pages = Vec::new();
        for _ in 0..2 {
            let response = get_new_document_page(state.clone(), CookieJar::new(), query(None, None))
                .await
                .unwrap();
            let html = parse_html_document(response).await;
            let hx_vals = must_select(&html, "input[name=client_id]")
                .value()
                .attr("hx-vals")
                .unwrap()
                .to_owned();
            let hx_vals: serde_json::Value = serde_json::from_str(&hx_vals).unwrap();
            pages.push(hx_vals["page"].as_u64().unwrap());
        }

        assert_ne!(pages[0], pages[1]);
    }

    #[tokio::test]
    async fn lists_ten_most_recent_documents_newest_first() {
        let upstream = spawn_upstream(upstream_router()).await;

        let response = get_new_document_page(state(upstream.client), CookieJar::new(), query(None, None))
            .await
            .unwrap();

        let html = parse_html_document(response).await;
        let numbers = html
            .select(
                &Selector::parse("section[data-document-type=invoice] li[data-number]").unwrap(),
            )
            .map(|item| item.value().attr("data-number").unwrap_or_default().to_owned())
            .collect::<Vec<_>>();

        assert_eq!(numbers.len(), 10);
        assert_eq!(numbers.first().map(String::as_str), Some("INV-012"));
        assert_eq!(numbers.last().map(String::as_str), Some("INV-003"));
    }

    #[tokio::test]
    async fn unreachable_upstream_still_renders_the_form() {
        let response = get_new_document_page(
            state(unreachable_upstream()),
            CookieJar::new(),
            query(None, Some("1")),
        )
        .await
        .unwrap();

        assert_status_ok(&response);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        must_select(&html, "form#document-form");
        must_select(&html, "#client-details[hidden]");
        assert!(
            select_texts(&html, "section[data-document-type=invoice] p")
                .contains(&"No invoices yet.".to_owned())
        );
    }
}
