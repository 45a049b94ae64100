//! ECharts options for each dashboard chart.
//!
//! Colours are not part of these options. They depend on the theme and are
//! applied by [super::theme_patch] on load and on every theme change.

use charming::{
    Chart,
    component::{Axis, Grid, Legend},
    element::{
        AreaStyle, AxisLabel, AxisPointer, AxisPointerType, AxisType, Emphasis, EmphasisFocus,
        JsFunction, Tooltip, Trigger,
    },
    series::{Bar, Line, Pie},
};

use super::dataset::{ChartDataset, Metric};

/// Build the ECharts options for `dataset`.
pub(crate) fn chart_options(dataset: &ChartDataset) -> Chart {
    match dataset.metric {
        Metric::InvoiceCount => invoice_count_chart(dataset),
        Metric::Revenue => revenue_chart(dataset),
        Metric::ClientDistribution => client_distribution_chart(dataset),
        Metric::ClientMonthly => client_monthly_chart(dataset),
    }
}

fn invoice_count_chart(dataset: &ChartDataset) -> Chart {
    let mut chart = cartesian_chart(dataset, "Number of Invoices", count_formatter());

    for series in &dataset.series {
        chart = chart.series(
            Bar::new()
                .name(series.name.as_str())
                .data(series.data.clone()),
        );
    }

    chart
}

fn revenue_chart(dataset: &ChartDataset) -> Chart {
    let currency = dataset.currency.as_deref().unwrap_or_default();
    let mut chart = cartesian_chart(dataset, "Revenue", currency_formatter(currency))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .name("Revenue")
                .axis_label(AxisLabel::new().formatter(currency_formatter(currency))),
        );

    for series in &dataset.series {
        chart = chart.series(
            Line::new()
                .name(series.name.as_str())
                .smooth(true)
                .area_style(AreaStyle::new())
                .data(series.data.clone()),
        );
    }

    chart
}

fn client_distribution_chart(dataset: &ChartDataset) -> Chart {
    let Some(series) = dataset.series.first() else {
        return Chart::new();
    };

    let data = series
        .data
        .iter()
        .zip(&dataset.categories)
        .map(|(value, label)| (*value, label.as_str()))
        .collect::<Vec<_>>();

    Chart::new()
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Item)
                .value_formatter(percent_formatter()),
        )
        .series(
            Pie::new()
                .name(series.name.as_str())
                .radius(vec!["55%", "75%"])
                .data(data),
        )
}

fn client_monthly_chart(dataset: &ChartDataset) -> Chart {
    let mut chart = cartesian_chart(dataset, "Number of Invoices", count_formatter())
        .legend(Legend::new().left("center").top("1%"));

    for series in &dataset.series {
        chart = chart.series(
            Bar::new()
                .name(series.name.as_str())
                .stack("Invoices")
                .emphasis(Emphasis::new().focus(EmphasisFocus::Series))
                .data(series.data.clone()),
        );
    }

    chart
}

/// A chart with months along the x-axis and a named value axis.
///
/// The revenue chart replaces the value axis to format its labels.
fn cartesian_chart(dataset: &ChartDataset, y_axis_name: &str, formatter: JsFunction) -> Chart {
    let chart = Chart::new()
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Axis)
                .value_formatter(formatter)
                .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow)),
        )
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .top(if dataset.series.len() > 1 { "15%" } else { "10%" })
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(
            Axis::new()
                .type_(AxisType::Category)
                .data(dataset.categories.clone()),
        );

    if dataset.metric == Metric::Revenue {
        chart
    } else {
        chart.y_axis(Axis::new().type_(AxisType::Value).name(y_axis_name))
    }
}

#[inline]
fn count_formatter() -> JsFunction {
    JsFunction::new_with_args("value", "return value + ' invoices';")
}

#[inline]
fn percent_formatter() -> JsFunction {
    JsFunction::new_with_args("value", "return value + '%';")
}

/// Formats a number with two decimals, prefixed with `currency`.
fn currency_formatter(currency: &str) -> JsFunction {
    // Quote via JSON so symbols from the upstream cannot break out of the string literal.
    let symbol = serde_json::to_string(currency).unwrap_or_else(|_| "\"\"".to_owned());

    JsFunction::new_with_args(
        "value",
        &format!("return (value === null || value === undefined) ? '-' : {symbol} + Number(value).toFixed(2);"),
    )
}

#[cfg(test)]
mod tests {
    use crate::chart::{Metric, fallback_dataset};

    use super::chart_options;

    fn options_for(metric: Metric) -> String {
        chart_options(&fallback_dataset(metric)).to_string()
    }

    #[track_caller]
    fn assert_contains(options: &str, needle: &str) {
        assert!(
            options.contains(needle),
            "expected options to contain {needle}, got:\n{options}"
        );
    }

    #[test]
    fn invoice_chart_is_a_bar_chart_over_months() {
        let options = options_for(Metric::InvoiceCount);

        assert_contains(&options, "\"bar\"");
        assert_contains(&options, "\"Jan\"");
        assert_contains(&options, "\"Dec\"");
        assert_contains(&options, "Number of Invoices");
        assert_contains(&options, " invoices");
    }

    #[test]
    fn revenue_chart_is_an_area_line_with_currency() {
        let options = options_for(Metric::Revenue);

        assert_contains(&options, "\"line\"");
        assert_contains(&options, "areaStyle");
        assert_contains(&options, "toFixed(2)");
        assert_contains(&options, "€");
    }

    #[test]
    fn client_distribution_is_a_donut_with_labels() {
        let options = options_for(Metric::ClientDistribution);

        assert_contains(&options, "\"pie\"");
        assert_contains(&options, "\"55%\"");
        assert_contains(&options, "\"Ayuntamiento\"");
        assert!(!options.contains("xAxis"));
    }

    #[test]
    fn client_monthly_stacks_one_series_per_client() {
        let options = options_for(Metric::ClientMonthly);

        assert_eq!(options.matches("\"Invoices\"").count(), 3);
        assert_contains(&options, "\"Others\"");
        assert_contains(&options, "legend");
    }
}
