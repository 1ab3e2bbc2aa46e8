use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::foundation::core::Dimension;
use crate::foundation::error::SizegateResult;
use crate::region::margin::{Preload, RootMargin, parse_margin};
use crate::signal::{
    IntersectionCallback, Platform, ResizeCallback, SizeObserver, Target, VisibilityObserver,
    VisibilityOptions,
};
use crate::tracker::gate::{Gate, Step};
use crate::tracker::snapshot::{ListenerId, Listeners, Pending, TrackerSnapshot, Visibility};

/// Options controlling a [`DimensionTracker`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TrackerOpts {
    /// Preload behavior: `true` for the default 400px bottom margin, `false` for the bare
    /// viewport, or a custom CSS-margin shorthand.
    pub preload: Preload,
}

/// Epochs of the subscriptions whose callbacks may still touch the shared state.
///
/// Platforms may deliver a batch after `disconnect`; such deliveries carry a retired epoch and
/// are ignored.
#[derive(Debug)]
struct Liveness {
    next: u64,
    size: Option<u64>,
    visibility: Option<u64>,
}

impl Liveness {
    fn issue(&mut self) -> u64 {
        self.next += 1;
        self.next
    }

    fn retire(&mut self) {
        self.size = None;
        self.visibility = None;
    }
}

struct Shared {
    gate: Gate,
    listeners: Listeners,
    liveness: Liveness,
}

struct Attachment<P: Platform> {
    target: P::Target,
    size: P::SizeObserver,
    visibility: P::VisibilityObserver,
}

/// Reports an element's content-box size, gated on the element being inside the observation
/// region.
///
/// The tracker owns at most one target. Size notifications are applied only while the target
/// is on-screen and only when they change the stored dimension; every entry into the region
/// re-reads the size directly from layout. All state lives behind `Rc<RefCell<..>>` shared with
/// the platform callbacks, so the tracker is single-threaded.
///
/// Dropping the tracker detaches it.
pub struct DimensionTracker<P: Platform> {
    platform: P,
    root_margin: RootMargin,
    shared: Rc<RefCell<Shared>>,
    attachment: Option<Attachment<P>>,
}

impl<P: Platform> DimensionTracker<P> {
    /// Create a detached tracker. Nothing is observed until [`attach`](Self::attach).
    pub fn new(platform: P, opts: TrackerOpts) -> Self {
        Self {
            platform,
            root_margin: parse_margin(&opts.preload),
            shared: Rc::new(RefCell::new(Shared {
                gate: Gate::default(),
                listeners: Listeners::default(),
                liveness: Liveness {
                    next: 0,
                    size: None,
                    visibility: None,
                },
            })),
            attachment: None,
        }
    }

    /// Start tracking `target`, replacing any previous target.
    ///
    /// Same as `set_target(Some(target))`.
    pub fn attach(&mut self, target: P::Target) -> SizegateResult<()> {
        self.set_target(Some(target))
    }

    /// Point the tracker at `target`.
    ///
    /// - `None` detaches.
    /// - The currently tracked target is a no-op.
    /// - A different target detaches the old one first, then subscribes the new one. Visibility
    ///   goes back to off-screen; the last dimension stays until the new target reports.
    ///
    /// Errors from the platform (unsupported signal kind, rejected root margin) leave the
    /// tracker detached.
    pub fn set_target(&mut self, target: Option<P::Target>) -> SizegateResult<()> {
        let Some(target) = target else {
            self.detach();
            return Ok(());
        };
        if self.attachment.as_ref().is_some_and(|a| a.target == target) {
            return Ok(());
        }
        self.detach();
        self.observe_target(target)
    }

    /// Stop tracking and release both subscriptions. Idempotent.
    ///
    /// If the target was on-screen, listeners see the reset to off-screen before this returns.
    pub fn detach(&mut self) {
        let Some(mut attachment) = self.attachment.take() else {
            return;
        };

        let pending = {
            let mut shared = self.shared.borrow_mut();
            shared.liveness.retire();
            shared
                .gate
                .reset_visibility()
                .then(|| Pending::new(shared.gate.snapshot(), &shared.listeners))
        };

        attachment.size.unobserve(&attachment.target);
        attachment.size.disconnect();
        attachment.visibility.disconnect();
        tracing::debug!("detached");

        if let Some(pending) = pending {
            pending.deliver();
        }
    }

    /// Change the preload configuration.
    ///
    /// Only the visibility subscription depends on it, and it is rebuilt only when the resulting
    /// root margin differs. The new subscription is created before the old one is released, so a
    /// rejected margin leaves the previous configuration in place.
    pub fn set_preload(&mut self, preload: impl Into<Preload>) -> SizegateResult<()> {
        let root_margin = parse_margin(&preload.into());
        if root_margin == self.root_margin {
            return Ok(());
        }

        if let Some(attachment) = self.attachment.as_mut() {
            let epoch = self.shared.borrow_mut().liveness.issue();
            let fresh = self.platform.visibility_observer(
                &VisibilityOptions::new(root_margin.clone()),
                intersection_handler(
                    Rc::downgrade(&self.shared),
                    epoch,
                    attachment.target.clone(),
                ),
            )?;
            self.shared.borrow_mut().liveness.visibility = Some(epoch);

            let mut stale = std::mem::replace(&mut attachment.visibility, fresh);
            stale.disconnect();
            attachment.visibility.observe(&attachment.target);
        }

        tracing::debug!(from = %self.root_margin, to = %root_margin, "root margin changed");
        self.root_margin = root_margin;
        Ok(())
    }

    /// Current externally visible state.
    pub fn snapshot(&self) -> TrackerSnapshot {
        self.shared.borrow().gate.snapshot()
    }

    /// Last accepted dimension.
    pub fn dimension(&self) -> Dimension {
        self.snapshot().dimension
    }

    /// Whether the target is currently on-screen.
    pub fn is_visible(&self) -> bool {
        self.visibility().is_on_screen()
    }

    /// Current visibility state.
    pub fn visibility(&self) -> Visibility {
        self.shared.borrow().gate.visibility()
    }

    /// The tracked target, if any.
    pub fn target(&self) -> Option<&P::Target> {
        self.attachment.as_ref().map(|a| &a.target)
    }

    /// Return `true` while a target is attached.
    pub fn is_attached(&self) -> bool {
        self.attachment.is_some()
    }

    /// Root margin the visibility subscription uses.
    pub fn root_margin(&self) -> &RootMargin {
        &self.root_margin
    }

    /// Borrow the platform.
    pub fn platform(&self) -> &P {
        &self.platform
    }

    /// Register a listener called with the new snapshot after every observable change.
    ///
    /// Listeners run synchronously after the tracker has released its internal state. When a
    /// platform pump triggers them they may call back into read accessors such as
    /// [`snapshot`](Self::snapshot). The visibility reset from [`detach`](Self::detach),
    /// [`set_target`](Self::set_target) or dropping the tracker is delivered inside that call, while
    /// the caller still holds the tracker mutably, so listeners must rely on the snapshot they are
    /// given.
    pub fn subscribe(&self, listener: impl Fn(&TrackerSnapshot) + 'static) -> ListenerId {
        self.shared.borrow_mut().listeners.add(Rc::new(listener))
    }

    /// Remove a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        self.shared.borrow_mut().listeners.remove(id)
    }

    /// Number of registered listeners.
    pub fn listener_count(&self) -> usize {
        self.shared.borrow().listeners.len()
    }

    #[tracing::instrument(level = "debug", skip(self, target), fields(root_margin = %self.root_margin))]
    fn observe_target(&mut self, target: P::Target) -> SizegateResult<()> {
        let epoch = self.shared.borrow_mut().liveness.issue();
        let weak = Rc::downgrade(&self.shared);

        let mut size = self
            .platform
            .size_observer(resize_handler(weak.clone(), epoch, target.clone()))?;
        let mut visibility = match self.platform.visibility_observer(
            &VisibilityOptions::new(self.root_margin.clone()),
            intersection_handler(weak, epoch, target.clone()),
        ) {
            Ok(v) => v,
            Err(err) => {
                size.disconnect();
                return Err(err);
            }
        };

        {
            let mut shared = self.shared.borrow_mut();
            shared.liveness.size = Some(epoch);
            shared.liveness.visibility = Some(epoch);
        }
        size.observe(&target);
        visibility.observe(&target);
        tracing::debug!(epoch, "attached");

        self.attachment = Some(Attachment {
            target,
            size,
            visibility,
        });
        Ok(())
    }
}

impl<P: Platform> Drop for DimensionTracker<P> {
    fn drop(&mut self) {
        self.detach();
    }
}

impl<P: Platform> std::fmt::Debug for DimensionTracker<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DimensionTracker")
            .field("root_margin", &self.root_margin)
            .field("attached", &self.is_attached())
            .field("snapshot", &self.snapshot())
            .finish()
    }
}

fn resize_handler<T: Target>(
    shared: Weak<RefCell<Shared>>,
    epoch: u64,
    target: T,
) -> ResizeCallback<T> {
    Box::new(move |entries| {
        for entry in entries.iter().filter(|e| e.target == target) {
            let Some(shared) = shared.upgrade() else {
                return;
            };
            let pending = {
                let mut state = shared.borrow_mut();
                if state.liveness.size != Some(epoch) {
                    tracing::trace!(epoch, "late resize batch ignored");
                    return;
                }
                let step = state.gate.on_resize(entry.content_box);
                tracing::trace!(?step, size = %entry.content_box, "resize");
                step.is_change()
                    .then(|| Pending::new(state.gate.snapshot(), &state.listeners))
            };
            if let Some(pending) = pending {
                pending.deliver();
            }
        }
    })
}

fn intersection_handler<T: Target>(
    shared: Weak<RefCell<Shared>>,
    epoch: u64,
    target: T,
) -> IntersectionCallback<T> {
    Box::new(move |entries| {
        for entry in entries.iter().filter(|e| e.target == target) {
            let Some(shared) = shared.upgrade() else {
                return;
            };
            let entering = {
                let state = shared.borrow();
                if state.liveness.visibility != Some(epoch) {
                    tracing::trace!(epoch, "late intersection batch ignored");
                    return;
                }
                entry.is_intersecting && !state.gate.visibility().is_on_screen()
            };
            // Read layout outside the borrow; measuring may run platform code.
            let measured = if entering {
                target.content_box()
            } else {
                Dimension::ZERO
            };
            let pending = {
                let mut state = shared.borrow_mut();
                let step = state
                    .gate
                    .on_intersection(entry.is_intersecting, || measured);
                tracing::trace!(?step, ratio = entry.intersection_ratio, "intersection");
                if step == Step::Entered {
                    tracing::debug!(size = %state.gate.snapshot().dimension, "entered region");
                }
                step.is_change()
                    .then(|| Pending::new(state.gate.snapshot(), &state.listeners))
            };
            if let Some(pending) = pending {
                pending.deliver();
            }
        }
    })
}

#[cfg(test)]
#[path = "../../tests/unit/tracker/dimension_tracker.rs"]
mod tests;
