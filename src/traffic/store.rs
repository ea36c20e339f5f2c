//! In-memory traffic counters shared by the request middleware, the window
//! scheduler and the renderers.

use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};

/// Point-in-time copy of the traffic counters.
///
/// Each field was valid at some instant while the snapshot was taken. The
/// fields are read one after another, so a reset racing the read can make
/// `requests_this_second` exceed `requests_this_minute` for a moment.
#[derive(Serialize, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MetricSnapshot {
    pub total_requests: u64,
    pub requests_this_second: u64,
    pub requests_this_minute: u64,
    pub total_bytes: u64,
}

impl MetricSnapshot {
    /// Total traffic expressed in mebibytes.
    pub fn total_megabytes(&self) -> f64 {
        self.total_bytes as f64 / (1024.0 * 1024.0)
    }
}

/// Lock-free store for the request counters.
///
/// Every field is its own atomic. `record` touches four of them in sequence
/// and no invariant spans them, so there is no lock around the group.
#[derive(Debug, Default)]
pub struct MetricStore {
    total_requests: AtomicU64,
    requests_this_second: AtomicU64,
    requests_this_minute: AtomicU64,
    total_bytes: AtomicU64,
}

impl MetricStore {
    /// Creates a store with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Accounts for one request carrying `byte_size` bytes of payload.
    pub fn record(&self, byte_size: u64) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
        self.requests_this_second.fetch_add(1, Ordering::Relaxed);
        self.requests_this_minute.fetch_add(1, Ordering::Relaxed);
        self.total_bytes.fetch_add(byte_size, Ordering::Relaxed);
    }

    /// Starts a new one-second window.
    pub fn reset_second(&self) {
        self.requests_this_second.store(0, Ordering::Relaxed);
    }

    /// Starts a new one-minute window.
    pub fn reset_minute(&self) {
        self.requests_this_minute.store(0, Ordering::Relaxed);
    }

    /// Reads all counters.
    pub fn snapshot(&self) -> MetricSnapshot {
        MetricSnapshot {
            total_requests: self.total_requests.load(Ordering::Relaxed),
            requests_this_second: self.requests_this_second.load(Ordering::Relaxed),
            requests_this_minute: self.requests_this_minute.load(Ordering::Relaxed),
            total_bytes: self.total_bytes.load(Ordering::Relaxed),
        }
    }
}
