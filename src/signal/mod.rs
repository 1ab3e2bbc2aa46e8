//! Platform seam: the two signal sources the tracker consumes.
//!
//! A [`Platform`] hands out a [`SizeObserver`] and a [`VisibilityObserver`], each bound to a
//! callback. The tracker never assumes anything about delivery timing beyond per-source
//! ordering, and never assumes that `disconnect` cancels batches that are already in flight.

use crate::foundation::core::Dimension;
use crate::foundation::error::SizegateResult;
use crate::region::margin::RootMargin;
use crate::region::observation::VISIBILITY_THRESHOLD;

/// Handle to an element that can be observed.
///
/// `PartialEq` must be identity: two handles are equal when they refer to the same element.
pub trait Target: Clone + PartialEq + 'static {
    /// Current content-box size, read synchronously from layout.
    fn content_box(&self) -> Dimension;
}

/// One size-change observation.
#[derive(Clone, Debug, PartialEq)]
pub struct ResizeEntry<T> {
    /// Element whose size changed.
    pub target: T,
    /// New content-box size.
    pub content_box: Dimension,
}

/// One visibility observation.
#[derive(Clone, Debug, PartialEq)]
pub struct IntersectionEntry<T> {
    /// Element whose intersection state was computed.
    pub target: T,
    /// Whether the element overlaps the observation region by at least the threshold.
    pub is_intersecting: bool,
    /// Overlapping share of the element's area, in `[0, 1]`.
    pub intersection_ratio: f64,
}

/// Callback receiving a batch of size-change observations.
pub type ResizeCallback<T> = Box<dyn FnMut(&[ResizeEntry<T>])>;

/// Callback receiving a batch of visibility observations.
pub type IntersectionCallback<T> = Box<dyn FnMut(&[IntersectionEntry<T>])>;

/// Configuration for a visibility observer.
#[derive(Clone, Debug, PartialEq)]
pub struct VisibilityOptions {
    /// Margin around the viewport; interpreted by the observer, not by the tracker.
    pub root_margin: RootMargin,
    /// Minimum overlap ratio counted as intersecting.
    pub threshold: f64,
}

impl VisibilityOptions {
    /// Options for `root_margin` at the fixed 1% threshold.
    pub fn new(root_margin: RootMargin) -> Self {
        Self {
            root_margin,
            threshold: VISIBILITY_THRESHOLD,
        }
    }
}

/// Size-change source, bound to one callback.
pub trait SizeObserver<T> {
    /// Start reporting size changes of `target`.
    fn observe(&mut self, target: &T);
    /// Stop reporting size changes of `target`.
    fn unobserve(&mut self, target: &T);
    /// Stop reporting for all targets.
    fn disconnect(&mut self);
}

/// Visibility source, bound to one callback and one [`VisibilityOptions`].
pub trait VisibilityObserver<T> {
    /// Start reporting intersection changes of `target`.
    fn observe(&mut self, target: &T);
    /// Stop reporting for all targets.
    fn disconnect(&mut self);
}

/// Factory for the two signal sources.
pub trait Platform {
    /// Element handle type.
    type Target: Target;
    /// Size source type.
    type SizeObserver: SizeObserver<Self::Target>;
    /// Visibility source type.
    type VisibilityObserver: VisibilityObserver<Self::Target>;

    /// Create a size observer.
    ///
    /// Fails with [`SizegateError::Unsupported`](crate::SizegateError::Unsupported) when the
    /// platform has no size-change primitive.
    fn size_observer(
        &self,
        callback: ResizeCallback<Self::Target>,
    ) -> SizegateResult<Self::SizeObserver>;

    /// Create a visibility observer.
    ///
    /// Fails with [`SizegateError::Unsupported`](crate::SizegateError::Unsupported) when the
    /// platform has no visibility primitive, and with
    /// [`SizegateError::Configuration`](crate::SizegateError::Configuration) when it rejects
    /// `options.root_margin`.
    fn visibility_observer(
        &self,
        options: &VisibilityOptions,
        callback: IntersectionCallback<Self::Target>,
    ) -> SizegateResult<Self::VisibilityObserver>;
}
