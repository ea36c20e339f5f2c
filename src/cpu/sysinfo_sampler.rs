use std::sync::Mutex;
use std::time::Instant;

use sysinfo::{MINIMUM_CPU_UPDATE_INTERVAL, System};
use tracing::warn;

use super::CpuSampler;

struct SamplerState {
    system: System,
    refreshed_at: Instant,
    last_load: Option<f32>,
}

/// Host CPU sampler backed by `sysinfo`.
///
/// CPU usage is a difference between two refreshes. The host is re-read at
/// most once per `MINIMUM_CPU_UPDATE_INTERVAL`; calls in between return the
/// previous reading, and there is no reading until the first interval has
/// passed.
pub struct SysinfoCpuSampler {
    state: Mutex<SamplerState>,
}

impl SysinfoCpuSampler {
    pub fn new() -> Self {
        let mut system = System::new();
        system.refresh_cpu_usage();
        SysinfoCpuSampler {
            state: Mutex::new(SamplerState {
                system,
                refreshed_at: Instant::now(),
                last_load: None,
            }),
        }
    }
}

impl Default for SysinfoCpuSampler {
    fn default() -> Self {
        Self::new()
    }
}

impl CpuSampler for SysinfoCpuSampler {
    fn sample(&self) -> Option<f32> {
        let mut state = match self.state.lock() {
            Ok(state) => state,
            Err(_) => {
                warn!("CPU sampler mutex poisoned, reporting no reading.");
                return None;
            }
        };

        if state.refreshed_at.elapsed() >= MINIMUM_CPU_UPDATE_INTERVAL {
            state.system.refresh_cpu_usage();
            state.refreshed_at = Instant::now();
            state.last_load = Some(state.system.global_cpu_usage());
        }

        state.last_load.map(|load| load.clamp(0.0, 100.0))
    }
}
