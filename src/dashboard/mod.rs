//! Dashboard module
//!
//! Provides an overview page showing headline statistics of the ledger and
//! charts of recent activity.

mod aggregation;
mod cards;
mod charts;
mod handlers;

pub use aggregation::{
    AggregateStats, BUCKET_COUNT, BUCKET_HOURS, StatusDistribution, TimeBucket, bucket_index,
    calculate_aggregate_stats, calculate_status_distribution, calculate_volume_risk_series,
};
pub use handlers::get_dashboard_page;

pub(crate) use handlers::dashboard_page;
