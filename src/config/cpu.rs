use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// CpuConfig toggles the host CPU-load reading on the dashboard.
/// When disabled, the dashboard shows "N/A".
#[derive(Deserialize, Serialize, Debug, Clone, JsonSchema)]
pub struct CpuConfig {
    #[serde(default = "default_cpu_enabled")]
    pub enabled: bool,
}

fn default_cpu_enabled() -> bool {
    true
}

impl Default for CpuConfig {
    fn default() -> Self {
        CpuConfig {
            enabled: default_cpu_enabled(),
        }
    }
}
