//! Dashboard module
//!
//! Provides an overview page with summary cards and statistics charts for a
//! selected year.

mod cards;
mod handlers;

pub use handlers::get_dashboard_page;
