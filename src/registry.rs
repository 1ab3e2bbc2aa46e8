//! Named containers, one tracker each.

use std::collections::BTreeMap;

use crate::foundation::core::Dimension;
use crate::foundation::error::SizegateResult;
use crate::signal::Platform;
use crate::tracker::dimension_tracker::{DimensionTracker, TrackerOpts};
use crate::tracker::snapshot::TrackerSnapshot;

/// A set of trackers keyed by container id, sharing one platform and one set of options.
pub struct ContainerRegistry<P: Platform + Clone> {
    platform: P,
    opts: TrackerOpts,
    trackers: BTreeMap<String, DimensionTracker<P>>,
}

impl<P: Platform + Clone> ContainerRegistry<P> {
    /// Create an empty registry.
    pub fn new(platform: P, opts: TrackerOpts) -> Self {
        Self {
            platform,
            opts,
            trackers: BTreeMap::new(),
        }
    }

    /// Track `target` under `id`.
    ///
    /// An existing id is retargeted with the usual rules: the same element is a no-op, a new one
    /// keeps the last dimension until it reports. On error the entry is removed, whether it was
    /// new or existing.
    pub fn register(&mut self, id: impl Into<String>, target: P::Target) -> SizegateResult<()> {
        let id = id.into();
        if let Some(tracker) = self.trackers.get_mut(&id) {
            if let Err(err) = tracker.attach(target) {
                self.trackers.remove(&id);
                tracing::debug!(%id, "container dropped after failed retarget");
                return Err(err);
            }
            return Ok(());
        }

        let mut tracker = DimensionTracker::new(self.platform.clone(), self.opts.clone());
        tracker.attach(target)?;
        tracing::debug!(%id, "container registered");
        self.trackers.insert(id, tracker);
        Ok(())
    }

    /// Stop tracking `id`. Returns `false` if it was not registered.
    pub fn unregister(&mut self, id: &str) -> bool {
        // Dropping the tracker detaches it.
        let removed = self.trackers.remove(id).is_some();
        if removed {
            tracing::debug!(%id, "container unregistered");
        }
        removed
    }

    /// Last accepted dimension of `id`.
    pub fn dimensions(&self, id: &str) -> Option<Dimension> {
        self.trackers.get(id).map(DimensionTracker::dimension)
    }

    /// Full snapshot of `id`.
    pub fn snapshot(&self, id: &str) -> Option<TrackerSnapshot> {
        self.trackers.get(id).map(DimensionTracker::snapshot)
    }

    /// Borrow the tracker behind `id`, e.g. to subscribe to it.
    pub fn tracker(&self, id: &str) -> Option<&DimensionTracker<P>> {
        self.trackers.get(id)
    }

    /// Dimensions of every container, ordered by id.
    pub fn containers(&self) -> BTreeMap<String, Dimension> {
        self.trackers
            .iter()
            .map(|(id, t)| (id.clone(), t.dimension()))
            .collect()
    }

    /// Number of registered containers.
    pub fn len(&self) -> usize {
        self.trackers.len()
    }

    /// Return `true` when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.trackers.is_empty()
    }
}

impl<P: Platform + Clone> std::fmt::Debug for ContainerRegistry<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContainerRegistry")
            .field("opts", &self.opts)
            .field("containers", &self.containers())
            .finish()
    }
}

#[cfg(test)]
#[path = "../tests/unit/registry.rs"]
mod tests;
