//! Host handle shared by every component
//!
//! The host owns what would be global in a browser: the window viewport, the
//! task queues that stand in for timers and animation frames, the store that
//! holds component state and the dirty flag polled by the render loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use crate::frame::FrameScheduler;
use crate::reactive::{lock_store, DirtyFlag, SharedSignalStore, SignalStore, State};
use crate::target::{fixed_target, ScrollTarget, TargetResolver, Viewport};

#[derive(Clone)]
pub struct Host {
    viewport: Arc<Viewport>,
    scheduler: FrameScheduler,
    signals: SharedSignalStore,
    dirty: DirtyFlag,
}

impl Host {
    /// Create a host with a viewport of the given size
    pub fn new(width: f32, height: f32) -> Self {
        Self::with_viewport(Arc::new(Viewport::new(width, height)))
    }

    pub fn with_viewport(viewport: Arc<Viewport>) -> Self {
        Self {
            viewport,
            scheduler: FrameScheduler::new(),
            signals: Arc::new(Mutex::new(SignalStore::new())),
            dirty: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn viewport(&self) -> &Arc<Viewport> {
        &self.viewport
    }

    pub fn scheduler(&self) -> &FrameScheduler {
        &self.scheduler
    }

    pub fn signals(&self) -> &SharedSignalStore {
        &self.signals
    }

    /// Resolver for the viewport, the default scroll target
    pub fn default_target(&self) -> TargetResolver {
        let viewport: Arc<dyn ScrollTarget> = self.viewport.clone();
        fixed_target(viewport)
    }

    /// Create a piece of component state
    pub fn use_state<T: Clone + Send + 'static>(&self, initial: T) -> State<T> {
        let signal = lock_store(&self.signals).create(initial);
        State::new(signal, self.signals.clone(), self.dirty.clone())
    }

    pub fn dirty_flag(&self) -> DirtyFlag {
        self.dirty.clone()
    }

    pub fn request_render(&self) {
        self.dirty.store(true, Ordering::SeqCst);
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    /// Check and clear the dirty flag
    pub fn take_dirty(&self) -> bool {
        self.dirty.swap(false, Ordering::SeqCst)
    }

    /// Run deferred tasks and one frame
    pub fn tick(&self) -> usize {
        self.scheduler.tick()
    }
}

impl std::fmt::Debug for Host {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Host")
            .field("viewport", &self.viewport)
            .field("scheduler", &self.scheduler)
            .field("dirty", &self.is_dirty())
            .finish()
    }
}
