//! Prometheus collector over the traffic counters.

use prometheus::core::{Collector, Desc};
use prometheus::proto::MetricFamily;
use prometheus::{Encoder, Gauge, IntCounter, IntGauge, Opts, Registry, TextEncoder};
use std::sync::{Arc, Mutex, PoisonError};

use crate::cpu::CpuSampler;
use crate::traffic::MetricStore;

const NAMESPACE: &str = "attackwall";

fn to_gauge(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// Reads one snapshot per scrape and publishes it through prometheus types.
struct TrafficCollector {
    traffic: Arc<MetricStore>,
    cpu: Arc<dyn CpuSampler>,

    requests_total: IntCounter,
    requests_current_second: IntGauge,
    requests_current_minute: IntGauge,
    received_bytes_total: IntCounter,
    cpu_load_percent: Gauge,

    descs: Vec<Desc>,
    // Serializes scrapes so counters only ever move forward.
    sync: Mutex<()>,
}

impl TrafficCollector {
    fn new(traffic: Arc<MetricStore>, cpu: Arc<dyn CpuSampler>) -> prometheus::Result<Self> {
        let requests_total = IntCounter::with_opts(
            Opts::new("requests_total", "Total number of requests received").namespace(NAMESPACE),
        )?;
        let requests_current_second = IntGauge::with_opts(
            Opts::new(
                "requests_current_second",
                "Requests received since the last second boundary",
            )
            .namespace(NAMESPACE),
        )?;
        let requests_current_minute = IntGauge::with_opts(
            Opts::new(
                "requests_current_minute",
                "Requests received since the last minute boundary",
            )
            .namespace(NAMESPACE),
        )?;
        let received_bytes_total = IntCounter::with_opts(
            Opts::new("received_bytes_total", "Total request body bytes received")
                .namespace(NAMESPACE),
        )?;
        let cpu_load_percent = Gauge::with_opts(
            Opts::new("cpu_load_percent", "Host CPU load in percent").namespace(NAMESPACE),
        )?;

        let descs = requests_total
            .desc()
            .into_iter()
            .chain(requests_current_second.desc())
            .chain(requests_current_minute.desc())
            .chain(received_bytes_total.desc())
            .chain(cpu_load_percent.desc())
            .cloned()
            .collect();

        Ok(TrafficCollector {
            traffic,
            cpu,
            requests_total,
            requests_current_second,
            requests_current_minute,
            received_bytes_total,
            cpu_load_percent,
            descs,
            sync: Mutex::new(()),
        })
    }
}

impl Collector for TrafficCollector {
    fn desc(&self) -> Vec<&Desc> {
        self.descs.iter().collect()
    }

    fn collect(&self) -> Vec<MetricFamily> {
        let _guard = self.sync.lock().unwrap_or_else(PoisonError::into_inner);
        let snapshot = self.traffic.snapshot();

        self.requests_total
            .inc_by(snapshot.total_requests.saturating_sub(self.requests_total.get()));
        self.received_bytes_total
            .inc_by(snapshot.total_bytes.saturating_sub(self.received_bytes_total.get()));
        self.requests_current_second
            .set(to_gauge(snapshot.requests_this_second));
        self.requests_current_minute
            .set(to_gauge(snapshot.requests_this_minute));

        let mut families = Vec::with_capacity(5);
        families.extend(self.requests_total.collect());
        families.extend(self.requests_current_second.collect());
        families.extend(self.requests_current_minute.collect());
        families.extend(self.received_bytes_total.collect());
        if let Some(load) = self.cpu.sample() {
            self.cpu_load_percent.set(f64::from(load));
            families.extend(self.cpu_load_percent.collect());
        }
        families
    }
}

/// Prometheus registry exposing the traffic counters.
#[derive(Clone)]
pub struct Metrics {
    registry: Arc<Registry>,
}

impl Metrics {
    /// Creates a registry with the traffic collector registered.
    pub fn new(traffic: Arc<MetricStore>, cpu: Arc<dyn CpuSampler>) -> prometheus::Result<Self> {
        let registry = Registry::new();
        registry.register(Box::new(TrafficCollector::new(traffic, cpu)?))?;
        Ok(Metrics {
            registry: Arc::new(registry),
        })
    }

    /// Renders all metrics in Prometheus text format.
    pub fn render(&self) -> prometheus::Result<String> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = Vec::new();
        encoder.encode(&metric_families, &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
