//! Deterministic in-process platform.
//!
//! Stands in for a browser's resize and intersection observers so trackers can run in tests
//! and in hosts without a native layout engine. The host owns the clock: notifications are
//! queued by layout changes and delivered only when it pumps the scene.

pub(crate) mod observer;
pub(crate) mod scene;

pub use observer::{HeadlessSizeObserver, HeadlessVisibilityObserver};
pub use scene::{Delivered, HeadlessElement, HeadlessPlatform, ObserverStats};
