use super::CpuSampler;

/// A sampler that never has a reading, rendered as "N/A".
pub struct NoCpuSampler;

impl NoCpuSampler {
    pub fn new() -> Self {
        NoCpuSampler
    }
}

impl Default for NoCpuSampler {
    fn default() -> Self {
        Self::new()
    }
}

impl CpuSampler for NoCpuSampler {
    fn sample(&self) -> Option<f32> {
        None
    }
}
