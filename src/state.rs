//! Shared application state.
//!
//! Contains the state that is shared across all request handlers and the
//! recording middleware.

use crate::config::ConfigV1;
use crate::cpu::CpuSampler;
use crate::metrics::Metrics;
use crate::traffic::MetricStore;
use std::sync::Arc;

/// Application state shared across all HTTP handlers.
///
/// This state is cloned for each request handler; every field is a cheap
/// handle onto the single per-process instance.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded at startup.
    pub config: Arc<ConfigV1>,
    /// Traffic counters updated by the recording middleware.
    pub traffic: Arc<MetricStore>,
    /// Host CPU-load reading for the dashboard.
    pub cpu: Arc<dyn CpuSampler>,
    /// Prometheus registry exposing the traffic counters.
    pub metrics: Metrics,
}
