pub mod metrics;

pub use metrics::{ChainMetrics, MetricsSnapshot};
