//! The colour-dependent subset of the chart options.
//!
//! A patch is merged into a mounted chart with `setOption(patch)` on load and
//! whenever the theme changes, so switching themes never remounts a chart.

use serde_json::{Map, Value, json};

use crate::theme::{Palette, Theme};

use super::dataset::Metric;

/// The options patch for `metric` in `theme`.
///
/// This is the default patch shallowly merged with the chart-specific patch,
/// where the chart-specific keys win.
pub(crate) fn theme_patch(metric: Metric, theme: Theme) -> Value {
    let palette = theme.palette();

    let mut patch = default_patch(metric, palette);
    let overrides = match metric {
        Metric::InvoiceCount => invoice_count_patch(palette),
        Metric::Revenue => revenue_patch(palette),
        Metric::ClientDistribution => client_distribution_patch(palette),
        Metric::ClientMonthly => client_monthly_patch(palette),
    };

    merge_shallow(&mut patch, overrides);

    Value::Object(patch)
}

fn default_patch(metric: Metric, palette: &Palette) -> Map<String, Value> {
    let mut patch = Map::new();

    patch.insert(
        "tooltip".to_owned(),
        json!({
            "backgroundColor": palette.tooltip_background,
            "borderColor": palette.border,
            "textStyle": { "color": palette.tooltip_text },
        }),
    );
    patch.insert("grid".to_owned(), json!({ "borderColor": palette.border }));
    patch.insert("color".to_owned(), json!(series_colours(metric, palette)));

    if metric != Metric::ClientDistribution {
        patch.insert(
            "xAxis".to_owned(),
            json!({
                "axisLabel": { "color": palette.text_secondary },
                "axisLine": { "lineStyle": { "color": palette.border } },
            }),
        );
        patch.insert(
            "yAxis".to_owned(),
            json!({
                "nameTextStyle": { "color": palette.text_secondary },
                "axisLabel": { "color": palette.text_secondary },
                "splitLine": { "lineStyle": { "color": palette.border, "type": "dashed" } },
            }),
        );
    }

    patch
}

/// The colour cycle for the chart's series.
fn series_colours(metric: Metric, palette: &Palette) -> Vec<&'static str> {
    match metric {
        Metric::InvoiceCount => vec![palette.accent],
        Metric::Revenue => vec![palette.primary],
        Metric::ClientDistribution => vec![
            palette.primary,
            palette.accent,
            palette.success,
            palette.warning,
            palette.danger,
        ],
        Metric::ClientMonthly => vec![
            palette.primary,
            palette.accent,
            palette.success,
            palette.warning,
            palette.danger,
            palette.info,
        ],
    }
}

fn invoice_count_patch(_palette: &Palette) -> Map<String, Value> {
    object(json!({
        "series": [{ "barWidth": "60%", "itemStyle": { "borderRadius": [6, 6, 0, 0] } }],
    }))
}

fn revenue_patch(palette: &Palette) -> Map<String, Value> {
    object(json!({
        "series": [{
            "symbolSize": 5,
            "itemStyle": {
                "color": palette.background,
                "borderColor": palette.primary,
                "borderWidth": 2,
            },
            "lineStyle": { "color": palette.primary, "width": 3 },
            "areaStyle": { "color": palette.primary, "opacity": 0.15 },
        }],
    }))
}

fn client_distribution_patch(palette: &Palette) -> Map<String, Value> {
    object(json!({
        "legend": { "show": false },
        "series": [{
            "itemStyle": {
                "borderColor": palette.background,
                "borderWidth": 2,
                "borderRadius": 4,
            },
            "label": { "color": palette.text_primary },
            "labelLine": { "lineStyle": { "color": palette.text_secondary } },
        }],
    }))
}

fn client_monthly_patch(palette: &Palette) -> Map<String, Value> {
    object(json!({
        "legend": { "textStyle": { "color": palette.text_secondary } },
    }))
}

/// Insert every top-level key of `overrides` into `patch`, replacing existing keys.
fn merge_shallow(patch: &mut Map<String, Value>, overrides: Map<String, Value>) {
    for (key, value) in overrides {
        patch.insert(key, value);
    }
}

fn object(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{Map, json};

    use crate::{
        chart::Metric,
        theme::{DARK_PALETTE, LIGHT_PALETTE, Theme},
    };

    use super::{merge_shallow, theme_patch};

    #[test]
    fn every_patch_sets_grid_border_and_tooltip() {
        for metric in Metric::ALL {
            let patch = theme_patch(metric, Theme::Dark);

            assert_eq!(patch["grid"]["borderColor"], DARK_PALETTE.border);
            assert_eq!(
                patch["tooltip"]["backgroundColor"],
                DARK_PALETTE.tooltip_background
            );
            assert_eq!(
                patch["tooltip"]["textStyle"]["color"],
                DARK_PALETTE.tooltip_text
            );
        }
    }

    #[test]
    fn revenue_markers_follow_the_background() {
        let light = theme_patch(Metric::Revenue, Theme::Light);
        let dark = theme_patch(Metric::Revenue, Theme::Dark);

        assert_eq!(
            light["series"][0]["itemStyle"]["color"],
            LIGHT_PALETTE.background
        );
        assert_eq!(
            dark["series"][0]["itemStyle"]["color"],
            DARK_PALETTE.background
        );
        assert_eq!(
            dark["series"][0]["itemStyle"]["borderColor"],
            DARK_PALETTE.primary
        );
    }

    #[test]
    fn donut_has_no_axes_and_separates_slices_with_background() {
        let patch = theme_patch(Metric::ClientDistribution, Theme::Light);

        assert!(patch.get("xAxis").is_none());
        assert!(patch.get("yAxis").is_none());
        assert_eq!(
            patch["series"][0]["itemStyle"]["borderColor"],
            LIGHT_PALETTE.background
        );
        assert_eq!(patch["color"].as_array().map(Vec::len), Some(5));
    }

    #[test]
    fn cartesian_charts_colour_their_axes() {
        let patch = theme_patch(Metric::ClientMonthly, Theme::Dark);

        assert_eq!(
            patch["xAxis"]["axisLabel"]["color"],
            DARK_PALETTE.text_secondary
        );
        assert_eq!(
            patch["yAxis"]["splitLine"]["lineStyle"]["color"],
            DARK_PALETTE.border
        );
        assert_eq!(
            patch["legend"]["textStyle"]["color"],
            DARK_PALETTE.text_secondary
        );
    }

    #[test]
    fn chart_specific_keys_replace_default_keys() {
        let mut patch = Map::new();
        patch.insert("grid".to_owned(), json!({ "borderColor": "#000" }));
        patch.insert("color".to_owned(), json!(["#111"]));
        let mut overrides = Map::new();
        overrides.insert("grid".to_owned(), json!({ "top": 10 }));

        merge_shallow(&mut patch, overrides);

        assert_eq!(patch["grid"], json!({ "top": 10 }));
        assert_eq!(patch["color"], json!(["#111"]));
    }
}
