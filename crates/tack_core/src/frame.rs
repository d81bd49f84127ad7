//! Frame scheduling
//!
//! The host drives a [`FrameScheduler`] from its event loop:
//!
//! - [`FrameScheduler::run_deferred`] runs tasks queued with
//!   [`FrameScheduler::defer`] (the equivalent of a zero-delay timeout)
//! - [`FrameScheduler::tick_frame`] runs tasks queued with
//!   [`FrameScheduler::request_frame`], once per rendered frame
//!
//! Tasks queued while a batch is running land in the next batch, so a task
//! that re-defers itself runs once per tick rather than looping.
//!
//! [`FrameThrottle`] wraps a callback so that at most one invocation runs per
//! frame, with the most recent arguments.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use indexmap::IndexMap;

/// Handle to a queued task
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TaskId(u64);

type Task = Box<dyn FnOnce() + Send>;

#[derive(Default)]
struct SchedulerQueues {
    deferred: IndexMap<TaskId, Task>,
    frame: IndexMap<TaskId, Task>,
    frame_count: u64,
}

/// Single-threaded task queues for deferred work and frame callbacks
///
/// Cheap to clone; clones share the same queues.
#[derive(Clone, Default)]
pub struct FrameScheduler {
    queues: Arc<Mutex<SchedulerQueues>>,
    next_id: Arc<AtomicU64>,
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&self) -> TaskId {
        TaskId(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    fn queues(&self) -> std::sync::MutexGuard<'_, SchedulerQueues> {
        self.queues.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Queue a task for the next [`run_deferred`](Self::run_deferred)
    pub fn defer<F>(&self, task: F) -> TaskId
    where
        F: FnOnce() + Send + 'static,
    {
        let id = self.next_id();
        self.queues().deferred.insert(id, Box::new(task));
        id
    }

    /// Queue a task for the next [`tick_frame`](Self::tick_frame)
    pub fn request_frame<F>(&self, task: F) -> TaskId
    where
        F: FnOnce() + Send + 'static,
    {
        let id = self.next_id();
        self.queues().frame.insert(id, Box::new(task));
        id
    }

    /// Cancel a queued task. Returns false if it already ran or was cancelled.
    pub fn cancel(&self, id: TaskId) -> bool {
        let mut queues = self.queues();
        queues.deferred.shift_remove(&id).is_some() || queues.frame.shift_remove(&id).is_some()
    }

    /// Run every deferred task queued so far. Returns how many ran.
    pub fn run_deferred(&self) -> usize {
        let batch = std::mem::take(&mut self.queues().deferred);
        let count = batch.len();
        for (_, task) in batch {
            task();
        }
        count
    }

    /// Run every frame task queued so far. Returns how many ran.
    pub fn tick_frame(&self) -> usize {
        let batch = {
            let mut queues = self.queues();
            queues.frame_count += 1;
            std::mem::take(&mut queues.frame)
        };
        let count = batch.len();
        if count > 0 {
            tracing::trace!(count, "running frame callbacks");
        }
        for (_, task) in batch {
            task();
        }
        count
    }

    /// Run deferred tasks, then one frame
    pub fn tick(&self) -> usize {
        self.run_deferred() + self.tick_frame()
    }

    pub fn pending_deferred(&self) -> usize {
        self.queues().deferred.len()
    }

    pub fn pending_frames(&self) -> usize {
        self.queues().frame.len()
    }

    /// Number of frames ticked so far
    pub fn frame_count(&self) -> u64 {
        self.queues().frame_count
    }
}

impl fmt::Debug for FrameScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let queues = self.queues();
        f.debug_struct("FrameScheduler")
            .field("deferred", &queues.deferred.len())
            .field("frame", &queues.frame.len())
            .field("frame_count", &queues.frame_count)
            .finish()
    }
}

// =============================================================================
// FrameThrottle
// =============================================================================

struct ThrottleState<A> {
    latest: Option<A>,
    request: Option<TaskId>,
}

/// Rate-limits a callback to one invocation per frame
///
/// Every [`call`](Self::call) stores its arguments; the first call in a frame
/// queues a frame task, and that task runs the callback with whatever
/// arguments were stored last.
pub struct FrameThrottle<A> {
    scheduler: FrameScheduler,
    state: Arc<Mutex<ThrottleState<A>>>,
    callback: Arc<dyn Fn(A) + Send + Sync>,
}

impl<A> Clone for FrameThrottle<A> {
    fn clone(&self) -> Self {
        Self {
            scheduler: self.scheduler.clone(),
            state: Arc::clone(&self.state),
            callback: Arc::clone(&self.callback),
        }
    }
}

impl<A: Send + 'static> FrameThrottle<A> {
    pub fn new<F>(scheduler: FrameScheduler, callback: F) -> Self
    where
        F: Fn(A) + Send + Sync + 'static,
    {
        Self {
            scheduler,
            state: Arc::new(Mutex::new(ThrottleState {
                latest: None,
                request: None,
            })),
            callback: Arc::new(callback),
        }
    }

    /// Schedule the callback for the next frame with `args`
    pub fn call(&self, args: A) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.latest = Some(args);
        if state.request.is_some() {
            return;
        }

        let shared = Arc::clone(&self.state);
        let callback = Arc::clone(&self.callback);
        let id = self.scheduler.request_frame(move || {
            let args = {
                let mut state = shared.lock().unwrap_or_else(|e| e.into_inner());
                state.request = None;
                state.latest.take()
            };
            if let Some(args) = args {
                callback(args);
            }
        });
        state.request = Some(id);
    }

    /// Drop a pending invocation, if any
    pub fn cancel(&self) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.latest = None;
        if let Some(id) = state.request.take() {
            self.scheduler.cancel(id);
        }
    }

    /// Whether an invocation is queued for the next frame
    pub fn is_pending(&self) -> bool {
        self.state
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .request
            .is_some()
    }
}

impl<A> fmt::Debug for FrameThrottle<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pending = self
            .state
            .lock()
            .map(|s| s.request.is_some())
            .unwrap_or(false);
        f.debug_struct("FrameThrottle")
            .field("pending", &pending)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deferred_runs_once() {
        let scheduler = FrameScheduler::new();
        let runs = Arc::new(Mutex::new(0));
        let runs_clone = runs.clone();

        scheduler.defer(move || *runs_clone.lock().unwrap() += 1);
        assert_eq!(scheduler.pending_deferred(), 1);

        assert_eq!(scheduler.run_deferred(), 1);
        assert_eq!(scheduler.run_deferred(), 0);
        assert_eq!(*runs.lock().unwrap(), 1);
    }

    #[test]
    fn test_cancel_task() {
        let scheduler = FrameScheduler::new();
        let runs = Arc::new(Mutex::new(0));
        let runs_clone = runs.clone();

        let id = scheduler.request_frame(move || *runs_clone.lock().unwrap() += 1);
        assert!(scheduler.cancel(id));
        assert!(!scheduler.cancel(id));

        scheduler.tick_frame();
        assert_eq!(*runs.lock().unwrap(), 0);
        assert_eq!(scheduler.frame_count(), 1);
    }

    #[test]
    fn test_task_queued_during_tick_runs_next_tick() {
        let scheduler = FrameScheduler::new();
        let order = Arc::new(Mutex::new(Vec::new()));

        let inner_scheduler = scheduler.clone();
        let order_outer = order.clone();
        scheduler.request_frame(move || {
            order_outer.lock().unwrap().push("first");
            let order_inner = order_outer.clone();
            inner_scheduler.request_frame(move || order_inner.lock().unwrap().push("second"));
        });

        assert_eq!(scheduler.tick_frame(), 1);
        assert_eq!(*order.lock().unwrap(), vec!["first"]);

        assert_eq!(scheduler.tick_frame(), 1);
        assert_eq!(*order.lock().unwrap(), vec!["first", "second"]);
    }

    #[test]
    fn test_throttle_coalesces_to_latest() {
        let scheduler = FrameScheduler::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();

        let throttle = FrameThrottle::new(scheduler.clone(), move |v: i32| {
            seen_clone.lock().unwrap().push(v);
        });

        throttle.call(1);
        throttle.call(2);
        throttle.call(3);
        assert!(throttle.is_pending());
        assert_eq!(scheduler.pending_frames(), 1);

        scheduler.tick_frame();
        assert_eq!(*seen.lock().unwrap(), vec![3]);
        assert!(!throttle.is_pending());

        throttle.call(4);
        scheduler.tick_frame();
        assert_eq!(*seen.lock().unwrap(), vec![3, 4]);
    }

    #[test]
    fn test_throttle_cancel() {
        let scheduler = FrameScheduler::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();

        let throttle = FrameThrottle::new(scheduler.clone(), move |v: i32| {
            seen_clone.lock().unwrap().push(v);
        });

        throttle.call(7);
        throttle.cancel();
        assert!(!throttle.is_pending());

        scheduler.tick_frame();
        assert!(seen.lock().unwrap().is_empty());
    }
}
