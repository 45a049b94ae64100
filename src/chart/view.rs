//! Chart containers and the script that mounts them.

use maud::{Markup, PreEscaped, html};

use crate::{
    html::{BADGE_STYLE, HeadElement},
    theme::Theme,
};

use super::{ChartDataset, chart_options, theme_patch};

/// A dashboard chart with its HTML container ID and ECharts configuration.
#[derive(Debug, Clone)]
pub(crate) struct DashboardChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    pub title: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
    /// The theme patch for the current theme as a JSON string
    pub patch: String,
    /// Whether the chart shows sample data instead of upstream statistics.
    pub sample: bool,
}

impl DashboardChart {
    pub(crate) fn new(dataset: &ChartDataset, theme: Theme) -> Self {
        let metric = dataset.metric;

        Self {
            id: metric.chart_id(),
            title: metric.title(),
            options: chart_options(dataset).to_string(),
            patch: theme_patch(metric, theme).to_string(),
            sample: dataset.sample,
        }
    }
}

/// Renders the HTML containers for dashboard charts.
pub(crate) fn charts_view(charts: &[DashboardChart]) -> Markup {
    html!(
        section
            id="charts"
            class="w-full mx-auto mb-4"
        {
            div class="grid grid-cols-1 xl:grid-cols-2 gap-4"
            {
                @for chart in charts {
                    div class="chart-card rounded-lg border p-4" data-sample[chart.sample]
                    {
                        div class="flex justify-between items-center mb-2"
                        {
                            h3 class="text-lg font-semibold" { (chart.title) }
                            @if chart.sample {
                                span class=(BADGE_STYLE) { "Sample data" }
                            }
                        }

                        div
                            id=(chart.id)
                            class="min-h-[340px]"
                        {}
                    }
                }
            }
        }
    )
}

/// Generates JavaScript initialization code for dashboard charts.
///
/// Each chart is mounted with its options and then patched with the colours
/// of the current theme. A listener for the `themeChanged` event merges the
/// new theme's patch into the mounted chart.
pub(crate) fn charts_script(charts: &[DashboardChart]) -> HeadElement {
    let script_content = charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
                    const chartDom = document.getElementById("{}");
                    if (!chartDom) {{ return; }}
                    const chart = echarts.init(chartDom);
                    const option = {};
                    chart.setOption(option);
                    chart.setOption({});

                    window.addEventListener('resize', chart.resize);

                    document.body.addEventListener('themeChanged', (event) => {{
                        const patch = event.detail.patches["{}"];
                        if (patch) {{ chart.setOption(patch); }}
                    }});
                }})();"#,
                chart.id,
                escape_script(&chart.options),
                escape_script(&chart.patch),
                chart.id,
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let wrapped_script = format!(
        "document.addEventListener('DOMContentLoaded', function() {{\n{}\n}});",
        script_content
    );

    HeadElement::ScriptSource(PreEscaped(wrapped_script))
}

/// Stop data from upstream closing the script element early.
fn escape_script(source: &str) -> String {
    source.replace("</", "<\\/")
}
