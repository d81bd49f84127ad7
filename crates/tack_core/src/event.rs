//! View events and listener registries
//!
//! Scroll targets own a [`ListenerRegistry`]. Components subscribe to the
//! event kinds they care about and keep the returned [`ListenerId`] so the
//! subscription can be removed at teardown.

use std::fmt;
use std::sync::{Arc, Mutex};

use slotmap::{new_key_type, SlotMap};
use smallvec::SmallVec;

new_key_type! {
    /// Handle to a registered listener
    pub struct ListenerId;
}

/// Event kinds a scroll target can emit
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EventKind {
    Resize,
    Scroll,
    TouchStart,
    TouchMove,
    TouchEnd,
    PageShow,
    Load,
}

impl EventKind {
    /// The DOM-style event name
    pub fn name(&self) -> &'static str {
        match self {
            EventKind::Resize => "resize",
            EventKind::Scroll => "scroll",
            EventKind::TouchStart => "touchstart",
            EventKind::TouchMove => "touchmove",
            EventKind::TouchEnd => "touchend",
            EventKind::PageShow => "pageshow",
            EventKind::Load => "load",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Every event that can move an element relative to its scroll container
pub const POSITION_EVENTS: [EventKind; 7] = [
    EventKind::Resize,
    EventKind::Scroll,
    EventKind::TouchStart,
    EventKind::TouchMove,
    EventKind::TouchEnd,
    EventKind::PageShow,
    EventKind::Load,
];

/// An event delivered to listeners
///
/// `kind` is `None` for synthetic events that components raise themselves,
/// e.g. to force a recomputation after their scroll target changed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ViewEvent {
    pub kind: Option<EventKind>,
}

impl ViewEvent {
    pub fn new(kind: EventKind) -> Self {
        Self { kind: Some(kind) }
    }

    /// A typeless event
    pub fn synthetic() -> Self {
        Self { kind: None }
    }

    /// Check whether this event is of the given kind
    pub fn is(&self, kind: EventKind) -> bool {
        self.kind == Some(kind)
    }
}

/// Listener callback
pub type Listener = Arc<dyn Fn(&ViewEvent) + Send + Sync>;

struct ListenerEntry {
    kind: EventKind,
    listener: Listener,
}

/// Registry of listeners keyed by [`ListenerId`]
#[derive(Default)]
pub struct ListenerRegistry {
    entries: Mutex<SlotMap<ListenerId, ListenerEntry>>,
}

impl ListenerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for one event kind
    pub fn add(&self, kind: EventKind, listener: Listener) -> ListenerId {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.insert(ListenerEntry { kind, listener })
    }

    /// Remove a listener. Returns false if it was already gone.
    pub fn remove(&self, id: ListenerId) -> bool {
        let mut entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.remove(id).is_some()
    }

    /// Deliver an event to every listener registered for its kind
    ///
    /// Listeners run after the registry lock is released, so they may add or
    /// remove listeners themselves.
    pub fn dispatch(&self, event: &ViewEvent) {
        let Some(kind) = event.kind else {
            return;
        };
        let matching: SmallVec<[Listener; 4]> = {
            let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
            entries
                .values()
                .filter(|entry| entry.kind == kind)
                .map(|entry| Arc::clone(&entry.listener))
                .collect()
        };
        for listener in matching {
            listener(event);
        }
    }

    /// Number of listeners registered for `kind`
    pub fn count(&self, kind: EventKind) -> usize {
        let entries = self.entries.lock().unwrap_or_else(|e| e.into_inner());
        entries.values().filter(|entry| entry.kind == kind).count()
    }

    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for ListenerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerRegistry")
            .field("listeners", &self.len())
            .finish()
    }
}
