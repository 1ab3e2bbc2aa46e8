//! The visibility-gated dimension tracker.

pub(crate) mod config;
pub(crate) mod dimension_tracker;
pub(crate) mod gate;
pub(crate) mod snapshot;

pub use config::TrackerConfig;
pub use dimension_tracker::{DimensionTracker, TrackerOpts};
pub use snapshot::{ListenerId, TrackerSnapshot, Visibility};
