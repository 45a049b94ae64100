//! Dashboard HTTP handler and view rendering.

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::CookieJar;
use maud::{Markup, html};
use serde::Deserialize;

use crate::{
    AppState, Error, UpstreamClient,
    chart::{
        DashboardChart, Metric, charts_script, charts_view, fetch_with_fallback, resolve_year,
        year_options,
    },
    endpoints,
    html::{FORM_TEXT_INPUT_STYLE, base, echarts_script},
    navigation::NavBar,
    theme::ThemeContext,
    timezone::local_today,
};

use super::cards::{SummaryCard, summary_cards, summary_cards_view};

/// The state needed for displaying the dashboard page.
#[derive(Debug, Clone)]
pub struct DashboardState {
    /// The client for the upstream invoice service.
    pub upstream: UpstreamClient,
    /// The local timezone as a canonical timezone name, e.g. "Europe/Madrid".
    pub local_timezone: String,
}

impl FromRef<AppState> for DashboardState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            upstream: state.upstream.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The query parameters for the dashboard page.
#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    year: Option<String>,
}

/// Display the statistics charts for the requested year, or the current year
/// if none or an invalid year is requested.
pub async fn get_dashboard_page(
    State(state): State<DashboardState>,
    jar: CookieJar,
    Query(query): Query<DashboardQuery>,
) -> Result<Response, Error> {
    let today = local_today(&state.local_timezone)?;
    let theme = ThemeContext::from_cookies(&jar).get();
    let year = resolve_year(query.year.as_deref(), today);

    let (invoices, revenue, clients, client_monthly) = tokio::join!(
        fetch_with_fallback(&state.upstream, Metric::InvoiceCount, year),
        fetch_with_fallback(&state.upstream, Metric::Revenue, year),
        fetch_with_fallback(&state.upstream, Metric::ClientDistribution, year),
        fetch_with_fallback(&state.upstream, Metric::ClientMonthly, year),
    );
    let datasets = [invoices, revenue, clients, client_monthly];

    let charts = datasets
        .iter()
        .map(|dataset| DashboardChart::new(dataset, theme))
        .collect::<Vec<_>>();
    let cards = summary_cards(&datasets, year);
    let showing_sample_data = datasets.iter().any(|dataset| dataset.sample);

    let content = dashboard_view(
        NavBar::new(endpoints::DASHBOARD_VIEW, theme),
        year,
        &year_options(year, today),
        &cards,
        &charts,
        showing_sample_data,
    );

    Ok(base(
        "Dashboard",
        theme,
        &[echarts_script(), charts_script(&charts)],
        &content,
    )
    .into_response())
}

fn year_selector(year: i32, years: &[i32]) -> Markup {
    html! {
        form
            id="year-selector"
            method="get"
            action=(endpoints::DASHBOARD_VIEW)
            class="flex items-center gap-2"
        {
            label for="year" class="text-sm font-medium" { "Year" }
            select
                id="year"
                name="year"
                onchange="this.form.requestSubmit()"
                class=(FORM_TEXT_INPUT_STYLE)
            {
                @for option in years {
                    option value=(option) selected[*option == year] { (option) }
                }
            }
            noscript
            {
                button type="submit" class="text-sm text-blue-600 hover:underline" { "Show" }
            }
        }
    }
}

fn dashboard_view(
    nav_bar: NavBar<'_>,
    year: i32,
    years: &[i32],
    cards: &[SummaryCard],
    charts: &[DashboardChart],
    showing_sample_data: bool,
) -> Markup {
    html!(
        (nav_bar.into_html())

        div
            id="dashboard-content"
            class="flex flex-col items-center px-2 lg:px-6 lg:py-8 mx-auto
                max-w-screen-xl text-gray-900 dark:text-white"
        {
            header class="w-full flex justify-between items-end mb-4"
            {
                h1 class="text-xl font-bold" { "Dashboard " (year) }
                (year_selector(year, years))
            }

            @if showing_sample_data {
                p
                    id="sample-data-notice"
                    role="status"
                    class="w-full mb-4 text-sm text-amber-700 dark:text-amber-300"
                {
                    "Some statistics could not be loaded from the invoice service. "
                    "Charts and cards marked \"Sample data\" show example figures."
                }
            }

            (summary_cards_view(cards))
            (charts_view(charts))
        }
    )
}
