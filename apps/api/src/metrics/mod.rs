// Filter options and KPI aggregation over the in-memory dataset.
// Each request filters the rows, averages the synthetic metrics and formats cards.

pub mod aggregate;
pub mod cards;
pub mod filters;
pub mod handlers;

use serde::Serialize;

use crate::dataset::Dataset;

pub use cards::{Dashboard, Rag};
pub use filters::{filter_options, MetricFilter};

/// Result of `GET /api/metrics`: either the card dashboard or a no-data marker.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(untagged)]
pub enum MetricsOutcome {
    NoData { status: &'static str },
    Dashboard(Dashboard),
}

impl MetricsOutcome {
    fn no_data() -> Self {
        MetricsOutcome::NoData { status: "no_data" }
    }
}

pub fn compute_metrics(dataset: &Dataset, filter: &MetricFilter) -> MetricsOutcome {
    if dataset.is_empty() {
        return MetricsOutcome::no_data();
    }

    let rows = filter.apply(dataset);
    match aggregate::aggregate(&rows) {
        Some(agg) => MetricsOutcome::Dashboard(cards::build_dashboard(&agg)),
        None => MetricsOutcome::no_data(),
    }
}
