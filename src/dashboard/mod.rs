//! Dashboard module
//!
//! Aggregates workshop activity into period-bucketed summaries and renders
//! the overview page with metric cards, charts and activity tables. The
//! snapshot behind the page is also served as JSON, and concurrent
//! refreshes are arbitrated so the newest request wins.

mod cards;
mod charts;
mod composer;
mod handlers;
mod refresh;
mod snapshot;
mod tables;

pub use handlers::{get_dashboard_data, get_dashboard_page};
pub use refresh::SnapshotPublisher;
