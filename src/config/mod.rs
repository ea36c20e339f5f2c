// This module re-exports important pieces for convenience,
// so we can "use crate::config::*" easily.
pub mod cpu;
pub mod dashboard;
pub mod logging;
pub mod types;

pub use cpu::*;
pub use dashboard::*;
pub use logging::*;
pub use types::*;
