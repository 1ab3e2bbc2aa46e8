use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::foundation::core::Dimension;
use crate::headless::scene::{HeadlessElement, Scene};
use crate::region::margin::Margin;
use crate::signal::{IntersectionCallback, ResizeCallback, SizeObserver, VisibilityObserver};

pub(crate) struct SizeRecord {
    pub(crate) id: u64,
    pub(crate) callback: Rc<RefCell<ResizeCallback<HeadlessElement>>>,
    /// Observed element index and last reported content box.
    pub(crate) targets: Vec<(usize, Dimension)>,
}

pub(crate) struct VisibilityRecord {
    pub(crate) id: u64,
    pub(crate) margin: Margin,
    pub(crate) threshold: f64,
    pub(crate) callback: Rc<RefCell<IntersectionCallback<HeadlessElement>>>,
    /// Observed element index and last reported intersecting state.
    pub(crate) targets: Vec<(usize, Option<bool>)>,
}

/// Size observer handed out by [`HeadlessPlatform`](crate::HeadlessPlatform).
///
/// Dropping it without calling `disconnect` still unregisters it.
#[derive(Debug)]
pub struct HeadlessSizeObserver {
    id: u64,
    scene: Weak<RefCell<Scene>>,
}

impl HeadlessSizeObserver {
    pub(crate) fn new(id: u64, scene: Weak<RefCell<Scene>>) -> Self {
        Self { id, scene }
    }

    fn with_record(&self, f: impl FnOnce(&mut Scene, Option<usize>)) {
        let Some(scene) = self.scene.upgrade() else {
            return;
        };
        let mut scene = scene.borrow_mut();
        let pos = scene.size_observers.iter().position(|r| r.id == self.id);
        f(&mut scene, pos);
    }
}

impl SizeObserver<HeadlessElement> for HeadlessSizeObserver {
    fn observe(&mut self, target: &HeadlessElement) {
        if !target.belongs_to(&self.scene) {
            return;
        }
        self.with_record(|scene, pos| {
            scene.stats.size_observe += 1;
            let Some(p) = pos else {
                return;
            };
            let record = &mut scene.size_observers[p];
            if !record.targets.iter().any(|(i, _)| *i == target.index()) {
                record.targets.push((target.index(), Dimension::ZERO));
            }
        });
    }

    fn unobserve(&mut self, target: &HeadlessElement) {
        self.with_record(|scene, pos| {
            scene.stats.size_unobserve += 1;
            if let Some(p) = pos {
                scene.size_observers[p]
                    .targets
                    .retain(|(i, _)| *i != target.index());
            }
        });
    }

    fn disconnect(&mut self) {
        let mut removed = None;
        self.with_record(|scene, pos| {
            scene.stats.size_disconnect += 1;
            removed = pos.map(|p| scene.size_observers.remove(p));
        });
        // The callback may own arbitrary state; drop it after the scene borrow is released.
        drop(removed);
    }
}

impl Drop for HeadlessSizeObserver {
    fn drop(&mut self) {
        let mut removed = None;
        self.with_record(|scene, pos| {
            removed = pos.map(|p| scene.size_observers.remove(p));
        });
        drop(removed);
    }
}

/// Visibility observer handed out by [`HeadlessPlatform`](crate::HeadlessPlatform).
///
/// Dropping it without calling `disconnect` still unregisters it.
#[derive(Debug)]
pub struct HeadlessVisibilityObserver {
    id: u64,
    scene: Weak<RefCell<Scene>>,
}

impl HeadlessVisibilityObserver {
    pub(crate) fn new(id: u64, scene: Weak<RefCell<Scene>>) -> Self {
        Self { id, scene }
    }

    fn with_record(&self, f: impl FnOnce(&mut Scene, Option<usize>)) {
        let Some(scene) = self.scene.upgrade() else {
            return;
        };
        let mut scene = scene.borrow_mut();
        let pos = scene
            .visibility_observers
            .iter()
            .position(|r| r.id == self.id);
        f(&mut scene, pos);
    }
}

impl VisibilityObserver<HeadlessElement> for HeadlessVisibilityObserver {
    fn observe(&mut self, target: &HeadlessElement) {
        if !target.belongs_to(&self.scene) {
            return;
        }
        self.with_record(|scene, pos| {
            scene.stats.visibility_observe += 1;
            let Some(p) = pos else {
                return;
            };
            let record = &mut scene.visibility_observers[p];
            if !record.targets.iter().any(|(i, _)| *i == target.index()) {
                record.targets.push((target.index(), None));
            }
        });
    }

    fn disconnect(&mut self) {
        let mut removed = None;
        self.with_record(|scene, pos| {
            scene.stats.visibility_disconnect += 1;
            removed = pos.map(|p| scene.visibility_observers.remove(p));
        });
        drop(removed);
    }
}

impl Drop for HeadlessVisibilityObserver {
    fn drop(&mut self) {
        let mut removed = None;
        self.with_record(|scene, pos| {
            removed = pos.map(|p| scene.visibility_observers.remove(p));
        });
        drop(removed);
    }
}
