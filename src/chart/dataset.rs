//! The statistics records sent by the upstream service and their normalized
//! form, [ChartDataset].

use serde::Deserialize;
use serde_json::Value;

use crate::Error;

/// A statistic that has a chart on the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Metric {
    /// Number of invoices issued per month.
    InvoiceCount,
    /// Invoiced amount per month.
    Revenue,
    /// Share of invoices per client.
    ClientDistribution,
    /// Invoices per month broken down by client.
    ClientMonthly,
}

impl Metric {
    pub(crate) const ALL: [Metric; 4] = [
        Metric::InvoiceCount,
        Metric::Revenue,
        Metric::ClientDistribution,
        Metric::ClientMonthly,
    ];

    pub(crate) fn name(self) -> &'static str {
        match self {
            Metric::InvoiceCount => "invoice",
            Metric::Revenue => "revenue",
            Metric::ClientDistribution => "client",
            Metric::ClientMonthly => "client_monthly",
        }
    }

    /// The upstream path serving this metric, e.g. "/api/invoice_stats".
    pub(crate) fn stats_path(self) -> String {
        format!("/api/{}_stats", self.name())
    }

    /// The HTML element ID of the chart container (kebab-case).
    pub(crate) fn chart_id(self) -> &'static str {
        match self {
            Metric::InvoiceCount => "invoice-chart",
            Metric::Revenue => "revenue-chart",
            Metric::ClientDistribution => "client-distribution-chart",
            Metric::ClientMonthly => "client-monthly-chart",
        }
    }

    pub(crate) fn title(self) -> &'static str {
        match self {
            Metric::InvoiceCount => "Invoices per Month",
            Metric::Revenue => "Revenue",
            Metric::ClientDistribution => "Client Distribution",
            Metric::ClientMonthly => "Invoices per Client",
        }
    }
}

/// A named series of values over the dataset's categories.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub(crate) struct Series {
    pub name: String,
    pub data: Vec<f64>,
}

/// The normalized record consumed by the chart renderer: category labels and
/// one or more numeric series over them.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ChartDataset {
    pub metric: Metric,
    pub categories: Vec<String>,
    pub series: Vec<Series>,
    /// The currency symbol for monetary metrics.
    pub currency: Option<String>,
    /// Whether this is sample data shown in place of the upstream record.
    pub sample: bool,
}

#[derive(Deserialize)]
struct InvoiceStats {
    months: Vec<String>,
    counts: Vec<f64>,
}

#[derive(Deserialize)]
struct RevenueStats {
    months: Vec<String>,
    amounts: Vec<f64>,
    currency: String,
}

#[derive(Deserialize)]
struct ClientStats {
    labels: Vec<String>,
    values: Vec<f64>,
}

#[derive(Deserialize)]
struct ClientMonthlyStats {
    months: Vec<String>,
    series: Vec<Series>,
}

impl ChartDataset {
    /// Decode the upstream JSON record for `metric`.
    ///
    /// # Errors
    /// Returns [Error::InvalidResponse] if the JSON does not have the shape of
    /// the metric's record, or [Error::InvalidStats] if the series do not
    /// line up with the categories.
    pub(crate) fn from_json(metric: Metric, json: Value) -> Result<Self, Error> {
        let decode_error =
            |error: serde_json::Error| Error::InvalidResponse(metric.stats_path(), error.to_string());

        let dataset = match metric {
            Metric::InvoiceCount => {
                let stats: InvoiceStats = serde_json::from_value(json).map_err(decode_error)?;
                Self {
                    metric,
                    categories: stats.months,
                    series: vec![Series {
                        name: "Invoices".to_owned(),
                        data: stats.counts,
                    }],
                    currency: None,
                    sample: false,
                }
            }
            Metric::Revenue => {
                let stats: RevenueStats = serde_json::from_value(json).map_err(decode_error)?;
                Self {
                    metric,
                    categories: stats.months,
                    series: vec![Series {
                        name: "Revenue".to_owned(),
                        data: stats.amounts,
                    }],
                    currency: Some(stats.currency),
                    sample: false,
                }
            }
            Metric::ClientDistribution => {
                let stats: ClientStats = serde_json::from_value(json).map_err(decode_error)?;
                Self {
                    metric,
                    categories: stats.labels,
                    series: vec![Series {
                        name: "Clients".to_owned(),
                        data: stats.values,
                    }],
                    currency: None,
                    sample: false,
                }
            }
            Metric::ClientMonthly => {
                let stats: ClientMonthlyStats =
                    serde_json::from_value(json).map_err(decode_error)?;
                Self {
                    metric,
                    categories: stats.months,
                    series: stats.series,
                    currency: None,
                    sample: false,
                }
            }
        };

        dataset.validate()?;

        Ok(dataset)
    }

    fn validate(&self) -> Result<(), Error> {
        let invalid = |reason: String| Error::InvalidStats {
            metric: self.metric.name(),
            reason,
        };

        if self.categories.is_empty() {
            return Err(invalid("no categories".to_owned()));
        }

        if self.series.is_empty() {
            return Err(invalid("no series".to_owned()));
        }

        match self
            .series
            .iter()
            .find(|series| series.data.len() != self.categories.len())
        {
            Some(series) => Err(invalid(format!(
                "series \"{}\" has {} values for {} categories",
                series.name,
                series.data.len(),
                self.categories.len()
            ))),
            None => Ok(()),
        }
    }

    /// The sum of every value in every series.
    pub(crate) fn total(&self) -> f64 {
        self.series.iter().flat_map(|series| &series.data).sum()
    }
}
