use std::cell::RefCell;
use std::rc::{Rc, Weak};

use smallvec::SmallVec;

use crate::foundation::core::{Dimension, Point, Rect, Size, Vec2};
use crate::foundation::error::{SizegateError, SizegateResult};
use crate::headless::observer::{
    HeadlessSizeObserver, HeadlessVisibilityObserver, SizeRecord, VisibilityRecord,
};
use crate::region::observation::ObservationRegion;
use crate::signal::{
    IntersectionCallback, IntersectionEntry, Platform, ResizeCallback, ResizeEntry, Target,
    VisibilityOptions,
};

/// Counts of observer calls made against a [`HeadlessPlatform`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ObserverStats {
    /// `SizeObserver::observe` calls.
    pub size_observe: u32,
    /// `SizeObserver::unobserve` calls.
    pub size_unobserve: u32,
    /// `SizeObserver::disconnect` calls.
    pub size_disconnect: u32,
    /// `VisibilityObserver::observe` calls.
    pub visibility_observe: u32,
    /// `VisibilityObserver::disconnect` calls.
    pub visibility_disconnect: u32,
    /// Visibility observers constructed.
    pub visibility_created: u32,
}

/// Entries handed to callbacks by one pump.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Delivered {
    /// Resize entries delivered.
    pub resizes: usize,
    /// Intersection entries delivered.
    pub intersections: usize,
}

pub(crate) struct Scene {
    viewport: Rect,
    elements: Vec<Rect>,
    size_supported: bool,
    visibility_supported: bool,
    next_observer: u64,
    pub(crate) size_observers: Vec<SizeRecord>,
    pub(crate) visibility_observers: Vec<VisibilityRecord>,
    pub(crate) stats: ObserverStats,
}

impl Scene {
    fn issue_observer_id(&mut self) -> u64 {
        self.next_observer += 1;
        self.next_observer
    }
}

/// In-process layout scene that provides both signal sources.
///
/// Elements are plain rectangles in page coordinates; the viewport is a rectangle in the same
/// space. Nothing is delivered until the host pumps with [`flush_resizes`](Self::flush_resizes),
/// [`flush_intersections`](Self::flush_intersections) or [`run_frame`](Self::run_frame).
///
/// Batches are collected before any callback runs and are all delivered, even to observers that
/// disconnect while the pump is in progress.
#[derive(Clone)]
pub struct HeadlessPlatform {
    scene: Rc<RefCell<Scene>>,
}

impl HeadlessPlatform {
    /// Create a scene with the given viewport and support for both signal kinds.
    pub fn new(viewport: Rect) -> Self {
        Self {
            scene: Rc::new(RefCell::new(Scene {
                viewport,
                elements: Vec::new(),
                size_supported: true,
                visibility_supported: true,
                next_observer: 0,
                size_observers: Vec::new(),
                visibility_observers: Vec::new(),
                stats: ObserverStats::default(),
            })),
        }
    }

    /// Disable size-change observation; creating a size observer then fails.
    pub fn without_size_observation(self) -> Self {
        self.scene.borrow_mut().size_supported = false;
        self
    }

    /// Disable visibility observation; creating a visibility observer then fails.
    pub fn without_visibility_observation(self) -> Self {
        self.scene.borrow_mut().visibility_supported = false;
        self
    }

    /// Add an element laid out at `rect`.
    pub fn create_element(&self, rect: Rect) -> HeadlessElement {
        let mut scene = self.scene.borrow_mut();
        scene.elements.push(rect);
        HeadlessElement {
            index: scene.elements.len() - 1,
            scene: Rc::downgrade(&self.scene),
        }
    }

    /// Move or resize an element. Handles from another scene are ignored.
    pub fn set_rect(&self, element: &HeadlessElement, rect: Rect) {
        if !self.owns(element) {
            return;
        }
        if let Some(slot) = self.scene.borrow_mut().elements.get_mut(element.index) {
            *slot = rect;
        }
    }

    /// Resize an element, keeping its origin.
    pub fn set_size(&self, element: &HeadlessElement, size: Size) {
        if let Some(rect) = self.rect(element) {
            self.set_rect(element, rect.with_size(size));
        }
    }

    /// Move an element, keeping its size.
    pub fn move_to(&self, element: &HeadlessElement, origin: Point) {
        if let Some(rect) = self.rect(element) {
            self.set_rect(element, rect.with_origin(origin));
        }
    }

    /// Current layout rectangle of an element.
    pub fn rect(&self, element: &HeadlessElement) -> Option<Rect> {
        if !self.owns(element) {
            return None;
        }
        self.scene.borrow().elements.get(element.index).copied()
    }

    /// Current viewport.
    pub fn viewport(&self) -> Rect {
        self.scene.borrow().viewport
    }

    /// Replace the viewport.
    pub fn set_viewport(&self, viewport: Rect) {
        self.scene.borrow_mut().viewport = viewport;
    }

    /// Translate the viewport, e.g. `Vec2::new(0.0, 300.0)` to scroll down 300px.
    pub fn scroll_by(&self, delta: Vec2) {
        let mut scene = self.scene.borrow_mut();
        scene.viewport = scene.viewport + delta;
    }

    /// Observer call accounting.
    pub fn stats(&self) -> ObserverStats {
        self.scene.borrow().stats
    }

    /// Number of live (not disconnected) size and visibility observers.
    pub fn live_observers(&self) -> (usize, usize) {
        let scene = self.scene.borrow();
        (scene.size_observers.len(), scene.visibility_observers.len())
    }

    /// Deliver size changes since the last report.
    ///
    /// An observed target is first reported once its content box is non-zero.
    pub fn flush_resizes(&self) -> usize {
        let batches = {
            let mut scene = self.scene.borrow_mut();
            let Scene {
                elements,
                size_observers,
                ..
            } = &mut *scene;
            let mut batches = Vec::new();
            for record in size_observers.iter_mut() {
                let mut entries: SmallVec<[ResizeEntry<HeadlessElement>; 1]> = SmallVec::new();
                for (index, last) in record.targets.iter_mut() {
                    let Some(rect) = elements.get(*index) else {
                        continue;
                    };
                    let now = Dimension::from(rect.size());
                    if now.differs_from(*last) {
                        *last = now;
                        entries.push(ResizeEntry {
                            target: self.handle(*index),
                            content_box: now,
                        });
                    }
                }
                if !entries.is_empty() {
                    batches.push((Rc::clone(&record.callback), entries));
                }
            }
            batches
        };

        let mut delivered = 0;
        for (handler, entries) in batches {
            let Ok(mut callback) = handler.try_borrow_mut() else {
                tracing::warn!("resize callback re-entered from its own pump; batch skipped");
                continue;
            };
            delivered += entries.len();
            (*callback)(entries.as_slice());
        }
        delivered
    }

    /// Deliver intersection changes since the last report.
    ///
    /// The first pump after `observe` always reports the target.
    pub fn flush_intersections(&self) -> usize {
        let batches = {
            let mut scene = self.scene.borrow_mut();
            let Scene {
                viewport,
                elements,
                visibility_observers,
                ..
            } = &mut *scene;
            let mut batches = Vec::new();
            for record in visibility_observers.iter_mut() {
                let region = ObservationRegion::new(*viewport, &record.margin);
                let mut entries: SmallVec<[IntersectionEntry<HeadlessElement>; 1]> =
                    SmallVec::new();
                for (index, last) in record.targets.iter_mut() {
                    let Some(rect) = elements.get(*index) else {
                        continue;
                    };
                    let is_intersecting = region.is_intersecting(*rect, record.threshold);
                    if *last != Some(is_intersecting) {
                        *last = Some(is_intersecting);
                        entries.push(IntersectionEntry {
                            target: self.handle(*index),
                            is_intersecting,
                            intersection_ratio: region.intersection_ratio(*rect),
                        });
                    }
                }
                if !entries.is_empty() {
                    batches.push((Rc::clone(&record.callback), entries));
                }
            }
            batches
        };

        let mut delivered = 0;
        for (handler, entries) in batches {
            let Ok(mut callback) = handler.try_borrow_mut() else {
                tracing::warn!("intersection callback re-entered from its own pump; batch skipped");
                continue;
            };
            delivered += entries.len();
            (*callback)(entries.as_slice());
        }
        delivered
    }

    /// One rendering step: size changes first, then intersections.
    pub fn run_frame(&self) -> Delivered {
        let resizes = self.flush_resizes();
        let intersections = self.flush_intersections();
        Delivered {
            resizes,
            intersections,
        }
    }

    fn handle(&self, index: usize) -> HeadlessElement {
        HeadlessElement {
            index,
            scene: Rc::downgrade(&self.scene),
        }
    }

    fn owns(&self, element: &HeadlessElement) -> bool {
        Weak::ptr_eq(&element.scene, &Rc::downgrade(&self.scene))
    }
}

impl std::fmt::Debug for HeadlessPlatform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let scene = self.scene.borrow();
        f.debug_struct("HeadlessPlatform")
            .field("viewport", &scene.viewport)
            .field("elements", &scene.elements.len())
            .field("stats", &scene.stats)
            .finish()
    }
}

impl Platform for HeadlessPlatform {
    type Target = HeadlessElement;
    type SizeObserver = HeadlessSizeObserver;
    type VisibilityObserver = HeadlessVisibilityObserver;

    fn size_observer(
        &self,
        callback: ResizeCallback<HeadlessElement>,
    ) -> SizegateResult<HeadlessSizeObserver> {
        let mut scene = self.scene.borrow_mut();
        if !scene.size_supported {
            return Err(SizegateError::unsupported(
                "size-change observation is not available",
            ));
        }
        let id = scene.issue_observer_id();
        scene.size_observers.push(SizeRecord {
            id,
            callback: Rc::new(RefCell::new(callback)),
            targets: Vec::new(),
        });
        Ok(HeadlessSizeObserver::new(id, Rc::downgrade(&self.scene)))
    }

    fn visibility_observer(
        &self,
        options: &VisibilityOptions,
        callback: IntersectionCallback<HeadlessElement>,
    ) -> SizegateResult<HeadlessVisibilityObserver> {
        let mut scene = self.scene.borrow_mut();
        if !scene.visibility_supported {
            return Err(SizegateError::unsupported(
                "visibility observation is not available",
            ));
        }
        let margin = options.root_margin.offsets()?;
        if !(0.0..=1.0).contains(&options.threshold) {
            return Err(SizegateError::configuration(format!(
                "threshold {} is outside [0, 1]",
                options.threshold
            )));
        }
        let id = scene.issue_observer_id();
        scene.stats.visibility_created += 1;
        scene.visibility_observers.push(VisibilityRecord {
            id,
            margin,
            threshold: options.threshold,
            callback: Rc::new(RefCell::new(callback)),
            targets: Vec::new(),
        });
        Ok(HeadlessVisibilityObserver::new(
            id,
            Rc::downgrade(&self.scene),
        ))
    }
}

/// Handle to an element of a [`HeadlessPlatform`]. Equality is identity.
#[derive(Clone, Debug)]
pub struct HeadlessElement {
    index: usize,
    scene: Weak<RefCell<Scene>>,
}

impl HeadlessElement {
    pub(crate) fn index(&self) -> usize {
        self.index
    }

    pub(crate) fn belongs_to(&self, scene: &Weak<RefCell<Scene>>) -> bool {
        Weak::ptr_eq(&self.scene, scene)
    }
}

impl PartialEq for HeadlessElement {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && Weak::ptr_eq(&self.scene, &other.scene)
    }
}

impl Eq for HeadlessElement {}

impl Target for HeadlessElement {
    fn content_box(&self) -> Dimension {
        self.scene
            .upgrade()
            .and_then(|scene| scene.borrow().elements.get(self.index).copied())
            .map(|rect| Dimension::from(rect.size()))
            .unwrap_or_default()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/headless/scene.rs"]
mod tests;
