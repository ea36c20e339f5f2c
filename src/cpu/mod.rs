pub mod base;
pub mod no_sampler;
pub mod sysinfo_sampler;

// Re-export the primary sampler items so code outside can do
// "use crate::cpu::{CpuSampler, create_cpu_sampler};"
pub use base::{CpuSampler, create_cpu_sampler};
