use serde_json::Value;
use time::Date;

use crate::{Error, UpstreamClient};

use super::{
    dataset::{ChartDataset, Metric},
    fallback::fallback_dataset,
};

/// The year to show statistics for: `requested` when it is a valid year,
/// otherwise the year of `today`.
pub(crate) fn resolve_year(requested: Option<&str>, today: Date) -> i32 {
    requested
        .and_then(|year| year.trim().parse::<i32>().ok())
        .filter(|year| (1..=9999).contains(year))
        .unwrap_or_else(|| today.year())
}

/// The years offered in year selectors, newest first: the five years up to
/// and including the year of `today`, plus `selected` if it is outside them.
pub(crate) fn year_options(selected: i32, today: Date) -> Vec<i32> {
    let current = today.year();
    let mut years = ((current - 4)..=current).rev().collect::<Vec<_>>();

    if !years.contains(&selected) {
        years.push(selected);
        years.sort_unstable_by(|a, b| b.cmp(a));
    }

    years
}

async fn fetch_dataset(
    upstream: &UpstreamClient,
    metric: Metric,
    year: i32,
) -> Result<ChartDataset, Error> {
    let json: Value = upstream
        .get_json(&metric.stats_path(), &[("year", year.to_string())])
        .await?;

    ChartDataset::from_json(metric, json)
}

/// Fetch the dataset for `metric` in `year`, substituting the sample data for
/// the metric if the upstream request or decoding fails.
pub(crate) async fn fetch_with_fallback(
    upstream: &UpstreamClient,
    metric: Metric,
    year: i32,
) -> ChartDataset {
    match fetch_dataset(upstream, metric, year).await {
        Ok(dataset) => dataset,
        Err(error) => {
            tracing::warn!(
                "Could not get {} statistics for {year}, showing sample data instead: {error}",
                metric.name()
            );
            fallback_dataset(metric)
        }
    }
}
