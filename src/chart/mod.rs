//! Statistics charts for invoices and revenue.
//!
//! Datasets are fetched from the upstream service per page load for the
//! selected year, with static sample data substituted on failure. Each dataset
//! is turned into ECharts options, and a small theme patch re-colours mounted
//! charts when the theme changes.

mod dataset;
mod fallback;
mod fetch;
mod options;
mod theme_patch;
mod view;

pub(crate) use dataset::{ChartDataset, Metric, Series};
pub(crate) use fallback::fallback_dataset;
pub(crate) use fetch::{fetch_with_fallback, resolve_year, year_options};
pub(crate) use options::chart_options;
pub(crate) use theme_patch::theme_patch;
pub(crate) use view::{DashboardChart, charts_script, charts_view};
