//! Sample data shown when the upstream statistics cannot be fetched, so the
//! dashboard never shows an empty chart.

use super::dataset::{ChartDataset, Metric, Series};

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// The sample series for each metric, as (name, values) pairs.
fn sample_series(metric: Metric) -> Vec<(&'static str, Vec<f64>)> {
    match metric {
        Metric::InvoiceCount => vec![(
            "Invoices",
            vec![4., 6., 8., 5., 7., 9., 11., 8., 10., 12., 9., 7.],
        )],
        Metric::Revenue => vec![(
            "Revenue",
            vec![
                1500., 2200., 1800., 2400., 2800., 3100., 2950., 3300., 3700., 3500., 4000., 4200.,
            ],
        )],
        Metric::ClientDistribution => vec![("Clients", vec![65., 25., 10.])],
        Metric::ClientMonthly => vec![
            ("AIO", vec![2., 3., 2., 1., 2., 3., 2., 3., 2., 3., 2., 3.]),
            (
                "Ayuntamiento",
                vec![1., 1., 2., 2., 1., 2., 3., 1., 2., 2., 1., 1.],
            ),
            ("Others", vec![1., 2., 1., 0., 1., 1., 0., 1., 2., 1., 1., 0.]),
        ],
    }
}

/// The static sample dataset for `metric`.
pub(crate) fn fallback_dataset(metric: Metric) -> ChartDataset {
    let categories = match metric {
        Metric::ClientDistribution => vec!["AIO", "Ayuntamiento", "Other Clients"],
        _ => MONTHS.to_vec(),
    };

    let currency = match metric {
        Metric::Revenue => Some("€".to_owned()),
        _ => None,
    };

    ChartDataset {
        metric,
        categories: categories.into_iter().map(str::to_owned).collect(),
        series: sample_series(metric)
            .into_iter()
            .map(|(name, data)| Series {
                name: name.to_owned(),
                data,
            })
            .collect(),
        currency,
        sample: true,
    }
}
