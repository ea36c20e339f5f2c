//! Metrics exposition for Prometheus.
//!
//! The traffic counters live in [`MetricStore`](crate::traffic::MetricStore);
//! this module only mirrors them into a Prometheus registry at scrape time.

mod recorder;

pub use recorder::Metrics;
