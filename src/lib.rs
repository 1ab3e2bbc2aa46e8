//! sizegate reports the content-box size of an element, but only while the element is inside
//! the viewport or a configurable preload margin around it.
//!
//! The public API is tracker-oriented:
//!
//! - Implement [`Platform`] for your host, or use the in-process [`HeadlessPlatform`]
//! - Create a [`DimensionTracker`] with [`TrackerOpts`] (or load a [`TrackerConfig`])
//! - Point it at an element with [`DimensionTracker::set_target`] and read
//!   [`DimensionTracker::snapshot`] or [`DimensionTracker::subscribe`] to changes
//!
//! Size notifications that arrive while the element is off-screen are dropped, as are
//! on-screen notifications that do not change the stored size. Entering the region always
//! re-reads the size from layout.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

pub mod headless;
pub mod region;
pub mod registry;
pub mod signal;
pub mod tracker;

pub use crate::foundation::core::{Dimension, Insets, Point, Rect, Size, Vec2};
pub use crate::foundation::error::{SizegateError, SizegateResult};

pub use crate::headless::{Delivered, HeadlessElement, HeadlessPlatform, ObserverStats};
pub use crate::region::{
    Margin, MarginLength, ObservationRegion, PRELOAD_MARGIN, Preload, RootMargin,
    VISIBILITY_THRESHOLD, ZERO_MARGIN, parse_margin,
};
pub use crate::registry::ContainerRegistry;
pub use crate::signal::{
    IntersectionCallback, IntersectionEntry, Platform, ResizeCallback, ResizeEntry, SizeObserver,
    Target, VisibilityObserver, VisibilityOptions,
};
pub use crate::tracker::{
    DimensionTracker, ListenerId, TrackerConfig, TrackerOpts, TrackerSnapshot, Visibility,
};
