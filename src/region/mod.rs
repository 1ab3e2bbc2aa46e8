//! Observation-region configuration.
//!
//! The caller-facing `preload` option is turned into a [`RootMargin`] by [`parse_margin`]. The
//! root margin travels unvalidated to the platform's visibility source, which resolves it into
//! [`Margin`] offsets and from there into an [`ObservationRegion`].

pub(crate) mod margin;
pub(crate) mod observation;

pub use margin::{
    Margin, MarginLength, PRELOAD_MARGIN, Preload, RootMargin, ZERO_MARGIN, parse_margin,
};
pub use observation::{ObservationRegion, VISIBILITY_THRESHOLD};
