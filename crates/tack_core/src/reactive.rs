//! Component state
//!
//! Values a component owns live in a [`SignalStore`] shared by every
//! component of a host. Each slot carries a write counter so a renderer can
//! tell whether anything it read has changed since the last frame.
//!
//! [`State<T>`] binds a slot to the store and to the host's dirty flag:
//!
//! ```ignore
//! let checked: State<bool> = host.use_state(false);
//!
//! checked.set(true);          // value only
//! checked.set_rebuild(false); // value + request a re-render
//! ```

use slotmap::{new_key_type, SlotMap};
use std::any::Any;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

new_key_type! {
    /// Identifies a slot in a [`SignalStore`]
    pub struct SignalId;
}

/// Typed handle to a store slot
#[derive(Debug)]
pub struct Signal<T> {
    id: SignalId,
    _marker: PhantomData<T>,
}

impl<T> Clone for Signal<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Signal<T> {}

impl<T> Signal<T> {
    pub fn id(&self) -> SignalId {
        self.id
    }
}

struct Slot {
    value: Box<dyn Any + Send>,
    writes: u64,
}

/// Type-erased storage for component values
#[derive(Default)]
pub struct SignalStore {
    slots: SlotMap<SignalId, Slot>,
}

impl SignalStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create<T: Send + 'static>(&mut self, initial: T) -> Signal<T> {
        let id = self.slots.insert(Slot {
            value: Box::new(initial),
            writes: 0,
        });
        Signal {
            id,
            _marker: PhantomData,
        }
    }

    pub fn get<T: Clone + 'static>(&self, signal: Signal<T>) -> Option<T> {
        self.slots
            .get(signal.id)
            .and_then(|slot| slot.value.downcast_ref::<T>().cloned())
    }

    /// Overwrite a value. Writes to a removed slot are dropped.
    pub fn set<T: Send + 'static>(&mut self, signal: Signal<T>, value: T) {
        if let Some(slot) = self.slots.get_mut(signal.id) {
            slot.value = Box::new(value);
            slot.writes += 1;
        }
    }

    pub fn update<T, F>(&mut self, signal: Signal<T>, f: F)
    where
        T: Clone + Send + 'static,
        F: FnOnce(T) -> T,
    {
        if let Some(current) = self.get(signal) {
            self.set(signal, f(current));
        }
    }

    /// Number of writes to a slot so far
    pub fn writes(&self, id: SignalId) -> Option<u64> {
        self.slots.get(id).map(|slot| slot.writes)
    }

    /// Free a slot; its handles read `None` afterwards
    pub fn remove(&mut self, id: SignalId) -> bool {
        self.slots.remove(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Store shared by every component of a host
pub type SharedSignalStore = Arc<Mutex<SignalStore>>;

/// Shared flag the host polls to decide whether to re-render
pub type DirtyFlag = Arc<AtomicBool>;

/// Lock a shared store, recovering from poisoning
pub fn lock_store(store: &SharedSignalStore) -> MutexGuard<'_, SignalStore> {
    store.lock().unwrap_or_else(|e| e.into_inner())
}

/// A store slot bound to the host's dirty flag
#[derive(Clone)]
pub struct State<T> {
    signal: Signal<T>,
    store: SharedSignalStore,
    dirty_flag: DirtyFlag,
}

impl<T: Clone + Send + 'static> State<T> {
    pub fn new(signal: Signal<T>, store: SharedSignalStore, dirty_flag: DirtyFlag) -> Self {
        Self {
            signal,
            store,
            dirty_flag,
        }
    }

    pub fn get(&self) -> T
    where
        T: Default,
    {
        self.try_get().unwrap_or_default()
    }

    pub fn try_get(&self) -> Option<T> {
        lock_store(&self.store).get(self.signal)
    }

    /// Set a new value without requesting a re-render
    pub fn set(&self, value: T) {
        lock_store(&self.store).set(self.signal, value);
    }

    /// Set a new value and request a re-render
    pub fn set_rebuild(&self, value: T) {
        self.set(value);
        self.dirty_flag.store(true, Ordering::SeqCst);
    }

    pub fn update(&self, f: impl FnOnce(T) -> T) {
        lock_store(&self.store).update(self.signal, f);
    }

    pub fn update_rebuild(&self, f: impl FnOnce(T) -> T) {
        self.update(f);
        self.dirty_flag.store(true, Ordering::SeqCst);
    }

    pub fn signal(&self) -> Signal<T> {
        self.signal
    }
}

impl<T> std::fmt::Debug for State<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("State")
            .field("signal", &self.signal.id)
            .finish()
    }
}
