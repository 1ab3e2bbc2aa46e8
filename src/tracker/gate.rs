//! Two-state gate joining the visibility and size streams.
//!
//! Each handler reads the state left behind by the other stream instead of assuming an order
//! between them.

use crate::foundation::core::Dimension;
use crate::tracker::snapshot::{TrackerSnapshot, Visibility};

/// Result of feeding one notification to the gate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Step {
    /// `OffScreen -> OnScreen`, dimension refreshed from layout.
    Entered,
    /// `OnScreen -> OffScreen`.
    Exited,
    /// On-screen dimension update.
    Resized,
    /// Notification had no observable effect.
    Dropped(DropReason),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum DropReason {
    OffScreen,
    Unchanged,
    SameVisibility,
}

impl Step {
    pub(crate) fn is_change(self) -> bool {
        !matches!(self, Self::Dropped(_))
    }
}

#[derive(Debug, Default)]
pub(crate) struct Gate {
    visibility: Visibility,
    dimension: Dimension,
}

impl Gate {
    /// Apply a visibility notification.
    ///
    /// `measure` is only called on entry: size observers do not re-report an element that was
    /// already laid out, so the current size is read directly.
    pub(crate) fn on_intersection(
        &mut self,
        is_intersecting: bool,
        measure: impl FnOnce() -> Dimension,
    ) -> Step {
        match (self.visibility, is_intersecting) {
            (Visibility::OffScreen, true) => {
                self.visibility = Visibility::OnScreen;
                self.dimension = measure();
                Step::Entered
            }
            (Visibility::OnScreen, false) => {
                self.visibility = Visibility::OffScreen;
                Step::Exited
            }
            _ => Step::Dropped(DropReason::SameVisibility),
        }
    }

    /// Apply a size notification.
    pub(crate) fn on_resize(&mut self, content_box: Dimension) -> Step {
        if !self.visibility.is_on_screen() {
            return Step::Dropped(DropReason::OffScreen);
        }
        if !content_box.differs_from(self.dimension) {
            return Step::Dropped(DropReason::Unchanged);
        }
        self.dimension = content_box;
        Step::Resized
    }

    /// Force `OffScreen`, keeping the last dimension. Returns `true` if visibility changed.
    pub(crate) fn reset_visibility(&mut self) -> bool {
        let was_on = self.visibility.is_on_screen();
        self.visibility = Visibility::OffScreen;
        was_on
    }

    pub(crate) fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub(crate) fn snapshot(&self) -> TrackerSnapshot {
        TrackerSnapshot {
            dimension: self.dimension,
            visible: self.visibility.is_on_screen(),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/tracker/gate.rs"]
mod tests;
