//! Summary cards shown above the dashboard charts.

use maud::{Markup, html};

use crate::{
    chart::{ChartDataset, Metric},
    html::{CARD_STYLE, format_currency},
};

/// A headline figure for the selected year.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct SummaryCard {
    pub label: &'static str,
    pub value: String,
    pub detail: String,
}

fn find(datasets: &[ChartDataset], metric: Metric) -> Option<&ChartDataset> {
    datasets.iter().find(|dataset| dataset.metric == metric)
}

fn detail(dataset: &ChartDataset, text: String) -> String {
    if dataset.sample {
        "Sample data".to_owned()
    } else {
        text
    }
}

/// The cards for the invoice count, revenue and client datasets in `datasets`.
///
/// Metrics without a dataset get no card.
pub(super) fn summary_cards(datasets: &[ChartDataset], year: i32) -> Vec<SummaryCard> {
    let mut cards = Vec::with_capacity(3);

    if let Some(invoices) = find(datasets, Metric::InvoiceCount) {
        cards.push(SummaryCard {
            label: "Total Invoices",
            value: format!("{:.0}", invoices.total()),
            detail: detail(invoices, format!("Issued in {year}")),
        });
    }

    if let Some(revenue) = find(datasets, Metric::Revenue) {
        let symbol = revenue.currency.as_deref().unwrap_or("€");
        cards.push(SummaryCard {
            label: "Total Revenue",
            value: format_currency(revenue.total(), symbol),
            detail: detail(revenue, format!("Invoiced in {year}")),
        });
    }

    if let Some(clients) = find(datasets, Metric::ClientDistribution) {
        cards.push(SummaryCard {
            label: "Clients",
            value: clients.categories.len().to_string(),
            detail: detail(clients, format!("Invoiced in {year}")),
        });
    }

    cards
}

pub(super) fn summary_cards_view(cards: &[SummaryCard]) -> Markup {
    html! {
        section id="summary" class="w-full grid grid-cols-1 sm:grid-cols-3 gap-4 mb-6"
        {
            @for card in cards {
                div class=(CARD_STYLE) data-card=(card.label)
                {
                    h3 class="text-sm text-gray-600 dark:text-gray-400" { (card.label) }
                    p class="card-value text-3xl font-bold" { (card.value) }
                    p class="text-sm text-gray-500 dark:text-gray-400" { (card.detail) }
                }
            }
        }
    }
}
