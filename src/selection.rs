//! Client and service pickers and the detail panels they populate.
//!
//! Picking an option requests the detail panel partial for the option's ID.
//! The panel is filled from the upstream service, or hidden when nothing is
//! picked or the lookup fails.

use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex, MutexGuard, PoisonError,
        atomic::{AtomicU64, Ordering},
    },
};

use axum::{
    extract::{FromRef, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use serde::{Deserialize, Deserializer};
use serde_json::json;

use crate::{
    AppState, Error, UpstreamClient, endpoints,
    endpoints::{format_endpoint, format_endpoint_segment},
    html::{FORM_RADIO_INPUT_STYLE, FORM_RADIO_LABEL_STYLE},
};

/// The kind of entity shown in a detail panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum DetailKind {
    Client,
    Service,
}

impl DetailKind {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            DetailKind::Client => "client",
            DetailKind::Service => "service",
        }
    }

    /// The HTML ID of the panel, e.g. "client-details".
    pub(crate) fn panel_id(self) -> &'static str {
        match self {
            DetailKind::Client => "client-details",
            DetailKind::Service => "service-details",
        }
    }

    /// The name of the form field holding the selected ID, e.g. "client_id".
    pub(crate) fn field_name(self) -> &'static str {
        match self {
            DetailKind::Client => "client_id",
            DetailKind::Service => "service_id",
        }
    }

    fn upstream_endpoint(self) -> &'static str {
        match self {
            DetailKind::Client => endpoints::UPSTREAM_CLIENT,
            DetailKind::Service => endpoints::UPSTREAM_SERVICE,
        }
    }
}

/// The number of most recently rendered pages whose panels are tracked.
const TRACKED_PAGES: u64 = 1024;

/// Issues a ticket for every detail request so that a response can tell
/// whether a newer request for the same panel was made while it was in flight.
///
/// Tickets are counted per rendered page, so requests from different pages
/// never supersede each other.
#[derive(Debug, Default)]
pub struct DetailSequencer {
    last_page: AtomicU64,
    latest: Mutex<HashMap<(u64, DetailKind), u64>>,
}

impl DetailSequencer {
    /// Start tracking the panels of a newly rendered page and return its key.
    ///
    /// Pages older than the last [TRACKED_PAGES] pages are forgotten.
    pub(crate) fn open_page(&self) -> u64 {
        let page = self.last_page.fetch_add(1, Ordering::SeqCst) + 1;
        let oldest = page.saturating_sub(TRACKED_PAGES);

        self.tickets().retain(|(tracked_page, _), _| *tracked_page > oldest);

        page
    }

    fn is_tracked(&self, page: u64) -> bool {
        let last_page = self.last_page.load(Ordering::SeqCst);

        page != 0 && page <= last_page && page > last_page.saturating_sub(TRACKED_PAGES)
    }

    /// Issue the next ticket for the `kind` panel on `page`.
    ///
    /// Tickets only ever increase. Returns `None` if `page` is not tracked.
    pub(crate) fn issue(&self, page: u64, kind: DetailKind) -> Option<u64> {
        if !self.is_tracked(page) {
            return None;
        }

        let mut tickets = self.tickets();
        let ticket = tickets.entry((page, kind)).or_default();
        *ticket += 1;

        Some(*ticket)
    }

    /// Whether `ticket` is the most recent ticket issued for the `kind` panel on `page`.
    pub(crate) fn is_latest(&self, page: u64, kind: DetailKind, ticket: u64) -> bool {
        self.tickets()
            .get(&(page, kind))
            .is_none_or(|latest| *latest == ticket)
    }

    fn tickets(&self) -> MutexGuard<'_, HashMap<(u64, DetailKind), u64>> {
        self.latest.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub(crate) struct ClientDetails {
    pub name: String,
    #[serde(default)]
    pub tax_id: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub currency_symbol: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub(crate) struct ServiceDetails {
    pub description: String,
    pub unit_price: f64,
    #[serde(default)]
    pub unit_type: String,
}

/// The entity shown in a detail panel.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Details {
    Client(ClientDetails),
    Service(ServiceDetails),
}

/// Get the details of the `kind` entity with `id` from the upstream service.
///
/// # Errors
/// Returns [Error::NotFound] if `id` cannot be used as a path segment, or an
/// error if the upstream request fails.
pub(crate) async fn fetch_details(
    upstream: &UpstreamClient,
    kind: DetailKind,
    id: &str,
) -> Result<Details, Error> {
    let path = format_endpoint_segment(kind.upstream_endpoint(), id).ok_or(Error::NotFound)?;

    match kind {
        DetailKind::Client => upstream.get_json(&path, &[]).await.map(Details::Client),
        DetailKind::Service => upstream.get_json(&path, &[]).await.map(Details::Service),
    }
}

/// An option in a selection group.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub(crate) struct SelectionOption {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: String,
    #[serde(alias = "name", alias = "description")]
    pub label: String,
}

/// Accept both numeric and string IDs from the upstream service.
fn deserialize_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Number(u64),
        Text(String),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Number(number) => number.to_string(),
        Id::Text(text) => text,
    })
}

/// A group of options where at most one option is selected.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct SelectionGroup {
    pub kind: DetailKind,
    pub options: Vec<SelectionOption>,
    selected: Option<String>,
}

impl SelectionGroup {
    pub(crate) fn new(kind: DetailKind, options: Vec<SelectionOption>) -> Self {
        Self {
            kind,
            options,
            selected: None,
        }
    }

    /// Select the option with `id`, clearing any previous selection.
    ///
    /// An empty or unknown ID clears the selection.
    pub(crate) fn select(&mut self, id: &str) {
        let id = id.trim();

        self.selected = self
            .options
            .iter()
            .find(|option| option.id == id)
            .map(|option| option.id.clone());
    }

    pub(crate) fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub(crate) fn is_selected(&self, id: &str) -> bool {
        self.selected() == Some(id)
    }
}

/// The state needed for the detail panels.
#[derive(Debug, Clone)]
pub struct PanelState {
    pub upstream: UpstreamClient,
    pub sequencer: Arc<DetailSequencer>,
}

impl FromRef<AppState> for PanelState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            upstream: state.upstream.clone(),
            sequencer: state.sequencer.clone(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct PanelQuery {
    #[serde(default)]
    id: Option<String>,
    /// The key of the page the request came from.
    #[serde(default)]
    page: Option<u64>,
}

/// Render the detail panel of `kind` for the entity `id`.
///
/// An empty or missing ID hides the panel without contacting the upstream
/// service. If a newer request for the same panel on the same page was made
/// while the upstream request was in flight, the response is
/// `204 No Content` so the newer panel is not overwritten.
pub(crate) async fn get_detail_panel(
    State(state): State<PanelState>,
    Path(kind): Path<DetailKind>,
    Query(query): Query<PanelQuery>,
) -> Response {
    let ticket = query
        .page
        .and_then(|page| state.sequencer.issue(page, kind).map(|ticket| (page, ticket)));

    let id = query.id.as_deref().map(str::trim).unwrap_or_default();
    if id.is_empty() {
        return detail_panel_view(kind, None).into_response();
    }

    let details = fetch_details(&state.upstream, kind, id).await;

    if ticket.is_some_and(|(page, ticket)| !state.sequencer.is_latest(page, kind, ticket)) {
        tracing::debug!("Discarding stale {} details for {id}", kind.as_str());
        return StatusCode::NO_CONTENT.into_response();
    }

    match details {
        Ok(details) => detail_panel_view(kind, Some(&details)).into_response(),
        Err(error) => {
            tracing::warn!("Could not get {} {id}: {error}", kind.as_str());
            detail_panel_view(kind, None).into_response()
        }
    }
}

/// The detail panel for `kind`, hidden when there are no `details`.
pub(crate) fn detail_panel_view(kind: DetailKind, details: Option<&Details>) -> Markup {
    html!(
        div
            id=(kind.panel_id())
            class="detail-panel mt-3 rounded-lg border border-gray-200 bg-white p-4
                text-sm dark:border-gray-700 dark:bg-gray-800"
            hidden[details.is_none()]
            aria-live="polite"
        {
            @match details {
                Some(Details::Client(client)) => {
                    h4 class="font-semibold mb-2" { (client.name) }
                    dl class="grid grid-cols-2 gap-1"
                    {
                        dt { "Tax ID" } dd { (client.tax_id) }
                        dt { "Address" } dd { (client.address) }
                        dt { "Country" } dd { (client.country) }
                        dt { "Currency" } dd { (client.currency_symbol) }
                    }
                }
                Some(Details::Service(service)) => {
                    h4 class="font-semibold mb-2" { (service.description) }
                    dl class="grid grid-cols-2 gap-1"
                    {
                        dt { "Unit price" } dd { (format!("{:.2}", service.unit_price)) }
                        dt { "Unit" } dd { (service.unit_type) }
                    }
                }
                None => {}
            }
        }
    )
}

/// Radio buttons for `group`, followed by its detail panel.
///
/// Changing the selection requests the panel for the new ID, tagged with the
/// `page` key from [DetailSequencer::open_page]. Requests from the same group
/// replace each other, so only the latest is in flight.
pub(crate) fn selection_group_view(
    group: &SelectionGroup,
    details: Option<&Details>,
    page: u64,
) -> Markup {
    let kind = group.kind;
    let panel_url = format_endpoint(endpoints::DETAIL_PANEL, kind.as_str());
    let panel_target = format!("#{}", kind.panel_id());
    let group_id = format!("{}-options", kind.as_str());

    html!(
        fieldset id=(group_id) class="selection-group"
        {
            legend class="block mb-2 text-sm font-medium" {
                @match kind {
                    DetailKind::Client => "Client",
                    DetailKind::Service => "Service",
                }
            }

            div class="grid grid-cols-2 md:grid-cols-3 gap-2"
            {
                @for option in &group.options {
                    @let input_id = format!("{}-{}", kind.as_str(), option.id);
                    div
                    {
                        input
                            type="radio"
                            id=(input_id)
                            name=(kind.field_name())
                            value=(option.id)
                            checked[group.is_selected(&option.id)]
                            class=(FORM_RADIO_INPUT_STYLE)
                            hx-get=(panel_url)
                            hx-vals=(json!({ "id": option.id, "page": page }).to_string())
                            hx-trigger="change"
                            hx-target=(panel_target)
                            hx-swap="outerHTML"
                            hx-sync=(format!("#{group_id}:replace"));

                        label for=(input_id) class=(FORM_RADIO_LABEL_STYLE) { (option.label) }
                    }
                }
            }

            (detail_panel_view(kind, details))
        }
    )
}
