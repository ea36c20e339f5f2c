//! Concurrent traffic counter engine.
//!
//! [`MetricStore`] holds the counters and is shared through an `Arc` between
//! the request middleware, the renderers and the [`WindowScheduler`], which
//! closes the one-second and one-minute windows in the background.

mod clock;
mod scheduler;
mod store;

pub use clock::{Clock, SystemClock};
pub use scheduler::{SchedulerHandle, Tick, WindowScheduler};
pub use store::{MetricSnapshot, MetricStore};
