//! Library exports for attackwall, shared between the binary and tests.

pub mod config;
pub mod cpu;
pub mod error;
pub mod metrics;
pub mod routes;
pub mod startup;
pub mod state;
pub mod traffic;
pub mod utils;
