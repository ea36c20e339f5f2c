use std::sync::Arc;

use tracing::{info, warn};

use super::{no_sampler::NoCpuSampler, sysinfo_sampler::SysinfoCpuSampler};
use crate::config::CpuConfig;

/// The CpuSampler trait abstracts the host CPU-load reading shown next to
/// the traffic counters.
pub trait CpuSampler: Send + Sync {
    /// Current global CPU usage in percent, or `None` when no reading is
    /// available on this host.
    fn sample(&self) -> Option<f32>;
}

/// Creates a concrete sampler based on the CpuConfig.
/// If `cpu.enabled = false` or the platform has no CPU statistics, returns
/// NoCpuSampler.
pub fn create_cpu_sampler(config: &CpuConfig) -> Arc<dyn CpuSampler> {
    if !config.enabled {
        info!("CPU sampling is disabled. Using NoCpuSampler.");
        return Arc::new(NoCpuSampler::new());
    }

    if !sysinfo::IS_SUPPORTED_SYSTEM {
        warn!("CPU sampling is not supported on this platform. Using NoCpuSampler.");
        return Arc::new(NoCpuSampler::new());
    }

    info!("CPU sampling enabled.");
    Arc::new(SysinfoCpuSampler::new())
}
