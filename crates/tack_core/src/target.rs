//! Scroll targets and measurable elements
//!
//! A [`ScrollTarget`] is anything that scrolls and emits position events:
//! the window viewport or a scrollable container inside it. A [`Measurable`]
//! is a rendered element whose box can be read back after layout.
//!
//! Hosts implement these traits over their own element tree. The headless
//! implementations here ([`Viewport`], [`ScrollContainer`], [`FlowBox`]) keep
//! geometry in memory and are driven by explicit calls such as
//! [`Viewport::scroll_to`], which makes them suitable for tests and for
//! server-side layout.

use std::fmt;
use std::sync::{Arc, Mutex};

use crate::event::{EventKind, Listener, ListenerId, ListenerRegistry, ViewEvent};
use crate::geometry::{Rect, Size};

/// A scrollable region that emits position events
pub trait ScrollTarget: Send + Sync {
    /// Whether this target is the window viewport
    fn is_viewport(&self) -> bool {
        false
    }

    /// Vertical scroll offset
    fn scroll_top(&self) -> f32;

    /// Horizontal scroll offset
    fn scroll_left(&self) -> f32;

    /// Bounding rect relative to the viewport (zero for the viewport itself)
    fn bounding_rect(&self) -> Rect;

    /// Height of the visible area
    fn inner_height(&self) -> f32;

    /// Subscribe to an event kind
    fn add_listener(&self, kind: EventKind, listener: Listener) -> ListenerId;

    /// Remove a subscription. Returns false if it was already gone.
    fn remove_listener(&self, id: ListenerId) -> bool;
}

/// An element whose rendered box can be measured
pub trait Measurable: Send + Sync {
    /// Bounding rect relative to the viewport
    fn bounding_rect(&self) -> Rect;

    /// Rendered size including borders
    fn offset_size(&self) -> Size {
        self.bounding_rect().size()
    }
}

/// Lazily resolves the scroll target a component should track
///
/// Returning `None` means the target is not mounted yet.
pub type TargetResolver = Arc<dyn Fn() -> Option<Arc<dyn ScrollTarget>> + Send + Sync>;

/// Build a resolver that always yields `target`
pub fn fixed_target(target: Arc<dyn ScrollTarget>) -> TargetResolver {
    Arc::new(move || Some(Arc::clone(&target)))
}

/// Check whether two resolvers are the same function object
pub fn same_resolver(a: &TargetResolver, b: &TargetResolver) -> bool {
    Arc::as_ptr(a) as *const () == Arc::as_ptr(b) as *const ()
}

/// Check whether two targets are the same object
pub fn same_target(a: &Arc<dyn ScrollTarget>, b: &Arc<dyn ScrollTarget>) -> bool {
    Arc::as_ptr(a) as *const () == Arc::as_ptr(b) as *const ()
}

// =============================================================================
// Viewport
// =============================================================================

#[derive(Debug, Clone, Copy)]
struct ViewportMetrics {
    scroll_x: f32,
    scroll_y: f32,
    width: f32,
    height: f32,
    client_left: f32,
    client_top: f32,
}

/// The window viewport
pub struct Viewport {
    metrics: Mutex<ViewportMetrics>,
    listeners: ListenerRegistry,
}

impl Viewport {
    /// Create a viewport with the given inner size
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            metrics: Mutex::new(ViewportMetrics {
                scroll_x: 0.0,
                scroll_y: 0.0,
                width,
                height,
                client_left: 0.0,
                client_top: 0.0,
            }),
            listeners: ListenerRegistry::new(),
        }
    }

    fn metrics(&self) -> ViewportMetrics {
        *self.metrics.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn inner_width(&self) -> f32 {
        self.metrics().width
    }

    /// Border offset of the document body, as `(left, top)`
    pub fn client_offset(&self) -> (f32, f32) {
        let m = self.metrics();
        (m.client_left, m.client_top)
    }

    pub fn set_client_offset(&self, left: f32, top: f32) {
        let mut m = self.metrics.lock().unwrap_or_else(|e| e.into_inner());
        m.client_left = left;
        m.client_top = top;
    }

    /// Scroll to an absolute offset and emit a scroll event
    pub fn scroll_to(&self, x: f32, y: f32) {
        {
            let mut m = self.metrics.lock().unwrap_or_else(|e| e.into_inner());
            m.scroll_x = x;
            m.scroll_y = y;
        }
        self.emit(EventKind::Scroll);
    }

    /// Change the inner size and emit a resize event
    pub fn resize(&self, width: f32, height: f32) {
        {
            let mut m = self.metrics.lock().unwrap_or_else(|e| e.into_inner());
            m.width = width;
            m.height = height;
        }
        self.emit(EventKind::Resize);
    }

    /// Emit an event of the given kind without changing geometry
    pub fn emit(&self, kind: EventKind) {
        self.listeners.dispatch(&ViewEvent::new(kind));
    }

    /// Number of listeners currently attached
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl ScrollTarget for Viewport {
    fn is_viewport(&self) -> bool {
        true
    }

    fn scroll_top(&self) -> f32 {
        self.metrics().scroll_y
    }

    fn scroll_left(&self) -> f32 {
        self.metrics().scroll_x
    }

    fn bounding_rect(&self) -> Rect {
        Rect::ZERO
    }

    fn inner_height(&self) -> f32 {
        self.metrics().height
    }

    fn add_listener(&self, kind: EventKind, listener: Listener) -> ListenerId {
        self.listeners.add(kind, listener)
    }

    fn remove_listener(&self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }
}

impl fmt::Debug for Viewport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = self.metrics();
        f.debug_struct("Viewport")
            .field("scroll", &(m.scroll_x, m.scroll_y))
            .field("size", &(m.width, m.height))
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

// =============================================================================
// ScrollContainer
// =============================================================================

#[derive(Debug, Clone, Copy)]
struct ContainerMetrics {
    rect: Rect,
    client_height: f32,
    scroll_x: f32,
    scroll_y: f32,
}

/// A scrollable element inside the viewport
pub struct ScrollContainer {
    metrics: Mutex<ContainerMetrics>,
    listeners: ListenerRegistry,
}

impl ScrollContainer {
    /// Create a container occupying `rect` (viewport-relative)
    pub fn new(rect: Rect) -> Self {
        Self {
            metrics: Mutex::new(ContainerMetrics {
                rect,
                client_height: rect.height,
                scroll_x: 0.0,
                scroll_y: 0.0,
            }),
            listeners: ListenerRegistry::new(),
        }
    }

    fn metrics(&self) -> ContainerMetrics {
        *self.metrics.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Override the client height (defaults to the rect height)
    pub fn set_client_height(&self, height: f32) {
        self.metrics
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .client_height = height;
    }

    /// Move the container without emitting events
    pub fn set_rect(&self, rect: Rect) {
        self.metrics.lock().unwrap_or_else(|e| e.into_inner()).rect = rect;
    }

    /// Scroll to an absolute offset and emit a scroll event
    pub fn scroll_to(&self, x: f32, y: f32) {
        {
            let mut m = self.metrics.lock().unwrap_or_else(|e| e.into_inner());
            m.scroll_x = x;
            m.scroll_y = y;
        }
        self.emit(EventKind::Scroll);
    }

    pub fn emit(&self, kind: EventKind) {
        self.listeners.dispatch(&ViewEvent::new(kind));
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }
}

impl ScrollTarget for ScrollContainer {
    fn scroll_top(&self) -> f32 {
        self.metrics().scroll_y
    }

    fn scroll_left(&self) -> f32 {
        self.metrics().scroll_x
    }

    fn bounding_rect(&self) -> Rect {
        self.metrics().rect
    }

    fn inner_height(&self) -> f32 {
        self.metrics().client_height
    }

    fn add_listener(&self, kind: EventKind, listener: Listener) -> ListenerId {
        self.listeners.add(kind, listener)
    }

    fn remove_listener(&self, id: ListenerId) -> bool {
        self.listeners.remove(id)
    }
}

impl fmt::Debug for ScrollContainer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let m = self.metrics();
        f.debug_struct("ScrollContainer")
            .field("rect", &m.rect)
            .field("scroll", &(m.scroll_x, m.scroll_y))
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

// =============================================================================
// FlowBox
// =============================================================================

/// An element laid out in normal flow inside a scroll target
///
/// `layout` is the element's box in the target's content coordinates, so the
/// viewport-relative bounding rect moves as the target scrolls.
pub struct FlowBox {
    container: Arc<dyn ScrollTarget>,
    layout: Mutex<Rect>,
}

impl FlowBox {
    pub fn new(container: Arc<dyn ScrollTarget>, layout: Rect) -> Self {
        Self {
            container,
            layout: Mutex::new(layout),
        }
    }

    /// Box in content coordinates
    pub fn layout(&self) -> Rect {
        *self.layout.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Relayout the element (e.g. after its parent changed width)
    pub fn set_layout(&self, layout: Rect) {
        *self.layout.lock().unwrap_or_else(|e| e.into_inner()) = layout;
    }
}

impl Measurable for FlowBox {
    fn bounding_rect(&self) -> Rect {
        let container = self.container.bounding_rect();
        self.layout().translate(
            container.x - self.container.scroll_left(),
            container.y - self.container.scroll_top(),
        )
    }
}

impl fmt::Debug for FlowBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FlowBox")
            .field("layout", &self.layout())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewport_scroll_emits_event() {
        let viewport = Arc::new(Viewport::new(1024.0, 800.0));
        let seen = Arc::new(Mutex::new(Vec::new()));
        let seen_clone = seen.clone();

        viewport.add_listener(
            EventKind::Scroll,
            Arc::new(move |e| seen_clone.lock().unwrap().push(e.kind)),
        );

        viewport.scroll_to(0.0, 250.0);
        assert_eq!(viewport.scroll_top(), 250.0);
        assert_eq!(*seen.lock().unwrap(), vec![Some(EventKind::Scroll)]);
        assert_eq!(viewport.bounding_rect(), Rect::ZERO);
        assert!(viewport.is_viewport());
    }

    #[test]
    fn test_flow_box_follows_scroll() {
        let viewport: Arc<dyn ScrollTarget> = Arc::new(Viewport::new(1024.0, 800.0));
        let element = FlowBox::new(viewport.clone(), Rect::new(20.0, 500.0, 300.0, 40.0));

        assert_eq!(element.bounding_rect().top(), 500.0);

        let concrete = Viewport::new(1024.0, 800.0);
        concrete.scroll_to(0.0, 120.0);
        let element = FlowBox::new(Arc::new(concrete), Rect::new(20.0, 500.0, 300.0, 40.0));
        assert_eq!(element.bounding_rect().top(), 380.0);
        assert_eq!(element.offset_size(), Size::new(300.0, 40.0));
    }

    #[test]
    fn test_flow_box_in_container() {
        let container = Arc::new(ScrollContainer::new(Rect::new(0.0, 100.0, 400.0, 300.0)));
        let element = FlowBox::new(container.clone(), Rect::new(10.0, 50.0, 200.0, 20.0));

        assert_eq!(element.bounding_rect(), Rect::new(10.0, 150.0, 200.0, 20.0));

        container.scroll_to(0.0, 30.0);
        assert_eq!(element.bounding_rect().top(), 120.0);
        assert_eq!(container.inner_height(), 300.0);
    }

    #[test]
    fn test_resolver_identity() {
        let viewport: Arc<dyn ScrollTarget> = Arc::new(Viewport::new(800.0, 600.0));
        let a = fixed_target(viewport.clone());
        let b = fixed_target(viewport.clone());
        let a2 = Arc::clone(&a);

        assert!(same_resolver(&a, &a2));
        assert!(!same_resolver(&a, &b));

        let resolved = a().unwrap();
        assert!(same_target(&resolved, &viewport));
    }
}
