//! Tack Core Runtime
//!
//! Host-side primitives the Tack components are built on:
//!
//! - **State**: a signal store for component values and the `State<T>` wrapper
//! - **Context**: scoped, type-keyed values passed from ancestors
//! - **Geometry**: rects and sizes in viewport coordinates
//! - **Events**: position events and listener registries
//! - **Targets**: scroll targets and measurable elements, with headless
//!   implementations
//! - **Frames**: deferred tasks, frame callbacks and per-frame throttling
//!
//! # Example
//!
//! ```rust
//! use tack_core::frame::{FrameScheduler, FrameThrottle};
//! use std::sync::{Arc, Mutex};
//!
//! let scheduler = FrameScheduler::new();
//! let last = Arc::new(Mutex::new(None));
//! let sink = last.clone();
//!
//! let throttle = FrameThrottle::new(scheduler.clone(), move |y: f32| {
//!     *sink.lock().unwrap() = Some(y);
//! });
//!
//! throttle.call(10.0);
//! throttle.call(25.0);
//! scheduler.tick_frame();
//!
//! assert_eq!(*last.lock().unwrap(), Some(25.0));
//! ```

pub mod context;
pub mod event;
pub mod frame;
pub mod geometry;
pub mod host;
pub mod reactive;
pub mod target;

pub use context::Context;
pub use event::{EventKind, Listener, ListenerId, ListenerRegistry, ViewEvent, POSITION_EVENTS};
pub use frame::{FrameScheduler, FrameThrottle, TaskId};
pub use geometry::{Rect, Size};
pub use host::Host;
pub use reactive::{DirtyFlag, SharedSignalStore, Signal, SignalId, SignalStore, State};
pub use target::{
    fixed_target, same_resolver, same_target, FlowBox, Measurable, ScrollContainer, ScrollTarget,
    TargetResolver, Viewport,
};
