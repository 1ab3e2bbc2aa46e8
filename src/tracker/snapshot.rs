use std::rc::Rc;

use crate::foundation::core::Dimension;

/// Whether the tracked element currently intersects the observation region.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    /// Outside the region, or not yet reported. Size updates are dropped.
    #[default]
    OffScreen,
    /// Inside the region. Size updates are applied.
    OnScreen,
}

impl Visibility {
    /// Return `true` for [`Visibility::OnScreen`].
    pub fn is_on_screen(self) -> bool {
        self == Self::OnScreen
    }
}

impl From<bool> for Visibility {
    fn from(on_screen: bool) -> Self {
        if on_screen {
            Self::OnScreen
        } else {
            Self::OffScreen
        }
    }
}

/// Externally visible tracker state.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TrackerSnapshot {
    /// Last dimension accepted by the gate.
    pub dimension: Dimension,
    /// Whether the element is currently considered on-screen.
    pub visible: bool,
}

impl TrackerSnapshot {
    /// Visibility as an enum.
    pub fn visibility(&self) -> Visibility {
        Visibility::from(self.visible)
    }
}

/// Identifier returned by [`DimensionTracker::subscribe`](crate::DimensionTracker::subscribe).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

pub(crate) type Listener = Rc<dyn Fn(&TrackerSnapshot)>;

/// Change listeners, called in subscription order.
#[derive(Default)]
pub(crate) struct Listeners {
    next_id: u64,
    entries: Vec<(ListenerId, Listener)>,
}

impl Listeners {
    pub(crate) fn add(&mut self, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, listener));
        id
    }

    pub(crate) fn remove(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(i, _)| *i != id);
        self.entries.len() != before
    }

    /// Clone the current listener set so it can be invoked without holding a borrow.
    pub(crate) fn collect(&self) -> Vec<Listener> {
        self.entries.iter().map(|(_, l)| Rc::clone(l)).collect()
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}

/// A snapshot plus the listeners that must see it.
pub(crate) struct Pending {
    snapshot: TrackerSnapshot,
    listeners: Vec<Listener>,
}

impl Pending {
    pub(crate) fn new(snapshot: TrackerSnapshot, listeners: &Listeners) -> Self {
        Self {
            snapshot,
            listeners: listeners.collect(),
        }
    }

    pub(crate) fn deliver(self) {
        for listener in &self.listeners {
            listener(&self.snapshot);
        }
    }
}
