//! Affix component - pins an element while its scroll target scrolls
//!
//! The affix wraps two nodes: a placeholder that stays in normal flow and an
//! inner node that switches to a fixed position once a scroll threshold is
//! crossed. While pinned, the placeholder keeps the inner node's natural size
//! so the surrounding content does not jump.
//!
//! # Example
//!
//! ```ignore
//! use tack_cn::prelude::*;
//!
//! let affix = cn::affix()
//!     .offset_top(10.0)
//!     .on_change(|pinned| tracing::info!(pinned, "affix toggled"))
//!     .build(&host, &ctx, AffixNodes::new(placeholder, fixed));
//!
//! affix.mount();
//! // ... host ticks, the viewport scrolls ...
//! let render = affix.render();
//! ```
//!
//! # Pinning rules
//!
//! - Top: pinned once the element's top edge would pass `offset_top` from the
//!   top of the target. Active when `offset_top` is set, or when neither
//!   offset is set (defaults to `offset_top = 0`).
//! - Bottom: pinned while the element's bottom edge would sit lower than
//!   `offset_bottom` from the bottom of the target. Active when
//!   `offset_bottom` is set.
//!
//! Recomputation runs at most once per frame, with the latest event.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use tack_core::{
    Context, EventKind, FrameThrottle, Host, ListenerId, Measurable, Rect, ScrollTarget, Size,
    TargetResolver, TaskId, ViewEvent, Viewport, POSITION_EVENTS,
};

use crate::class_names::ClassList;
use crate::config::ComponentConfig;

/// Vertical edge a pinned element is anchored to
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Anchor {
    /// Distance from the top of the viewport
    Top(f32),
    /// Distance from the bottom of the viewport
    Bottom(f32),
}

/// Fixed-position override applied to the pinned node
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AffixStyle {
    pub anchor: Anchor,
    pub left: f32,
    pub width: f32,
}

impl AffixStyle {
    pub fn top(&self) -> Option<f32> {
        match self.anchor {
            Anchor::Top(top) => Some(top),
            Anchor::Bottom(_) => None,
        }
    }

    pub fn bottom(&self) -> Option<f32> {
        match self.anchor {
            Anchor::Bottom(bottom) => Some(bottom),
            Anchor::Top(_) => None,
        }
    }

    /// CSS declarations for this style
    pub fn to_css(&self) -> String {
        let anchor = match self.anchor {
            Anchor::Top(top) => format!("top: {top}px"),
            Anchor::Bottom(bottom) => format!("bottom: {bottom}px"),
        };
        format!(
            "position: fixed; {anchor}; left: {}px; width: {}px",
            self.left, self.width
        )
    }
}

/// Space reserved in normal flow while the element is pinned
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlaceholderStyle {
    pub width: f32,
    pub height: f32,
}

impl PlaceholderStyle {
    pub fn to_css(&self) -> String {
        format!("width: {}px; height: {}px", self.width, self.height)
    }
}

/// Which pinning rules are active
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OffsetMode {
    pub top: bool,
    pub bottom: bool,
}

/// Offsets after defaults and the legacy alias are applied
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ResolvedOffsets {
    pub top: f32,
    pub bottom: f32,
    pub mode: OffsetMode,
}

impl ResolvedOffsets {
    pub fn resolve(offset_top: Option<f32>, offset: Option<f32>, offset_bottom: Option<f32>) -> Self {
        // The legacy `offset` alias fills in for an unset or zero `offset_top`
        let offset_top = match offset_top {
            Some(top) if top != 0.0 => Some(top),
            _ => offset,
        };

        match (offset_top, offset_bottom) {
            (None, None) => Self {
                top: 0.0,
                bottom: 0.0,
                mode: OffsetMode {
                    top: true,
                    bottom: false,
                },
            },
            (top, bottom) => Self {
                top: top.unwrap_or(0.0),
                bottom: bottom.unwrap_or(0.0),
                mode: OffsetMode {
                    top: top.is_some(),
                    bottom: bottom.is_some(),
                },
            },
        }
    }
}

/// Geometry read from the host for one recomputation
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AffixMetrics {
    pub scroll_top: f32,
    /// Placeholder box relative to the target's scrolled content
    pub elem_offset: Rect,
    /// Rendered size of the pinned node
    pub elem_size: Size,
    pub target_rect: Rect,
    pub target_inner_height: f32,
    /// Distance from the target's bottom edge to the viewport's bottom edge
    pub target_bottom_offset: f32,
    /// Current rendered width of the placeholder
    pub placeholder_width: f32,
}

impl AffixMetrics {
    pub fn measure(
        target: &dyn ScrollTarget,
        viewport: &Viewport,
        placeholder: &dyn Measurable,
        fixed: &dyn Measurable,
    ) -> Self {
        let scroll_top = target.scroll_top();
        let scroll_left = target.scroll_left();
        let elem_rect = placeholder.bounding_rect();
        let target_rect = target.bounding_rect();
        let (client_left, client_top) = viewport.client_offset();

        let elem_offset = Rect::new(
            (elem_rect.left() - target_rect.left()) + (scroll_left - client_left),
            (elem_rect.top() - target_rect.top()) + (scroll_top - client_top),
            elem_rect.width,
            elem_rect.height,
        );

        let target_bottom_offset = if target.is_viewport() {
            0.0
        } else {
            viewport.inner_height() - target_rect.bottom()
        };

        Self {
            scroll_top,
            elem_offset,
            elem_size: fixed.offset_size(),
            target_rect,
            target_inner_height: target.inner_height(),
            target_bottom_offset,
            placeholder_width: placeholder.offset_size().width,
        }
    }
}

/// Outcome of one recomputation
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AffixPosition {
    pub affix: Option<AffixStyle>,
    pub placeholder: Option<PlaceholderStyle>,
}

/// Decide where the element goes for the given geometry
pub fn next_position(
    offsets: &ResolvedOffsets,
    metrics: &AffixMetrics,
    event: &ViewEvent,
    current: AffixPosition,
) -> AffixPosition {
    let m = metrics;
    let width = m.elem_offset.width;
    let left = m.target_rect.left() + m.elem_offset.left();

    let top_threshold = if offsets.mode.top { offsets.top } else { 0.0 };
    if m.scroll_top - m.elem_offset.top() > top_threshold {
        return AffixPosition {
            affix: Some(AffixStyle {
                anchor: Anchor::Top(m.target_rect.top() + offsets.top),
                left,
                width,
            }),
            placeholder: Some(PlaceholderStyle {
                width,
                height: m.elem_size.height,
            }),
        };
    }

    let bottom_threshold =
        m.elem_offset.top() + m.elem_size.height + offsets.bottom - m.target_inner_height;
    if offsets.mode.bottom && m.scroll_top < bottom_threshold {
        return AffixPosition {
            affix: Some(AffixStyle {
                anchor: Anchor::Bottom(m.target_bottom_offset + offsets.bottom),
                left,
                width,
            }),
            placeholder: Some(PlaceholderStyle {
                width,
                height: m.elem_offset.height,
            }),
        };
    }

    match current.affix {
        Some(style) if event.is(EventKind::Resize) && m.placeholder_width != 0.0 => AffixPosition {
            affix: Some(AffixStyle {
                width: m.placeholder_width,
                ..style
            }),
            placeholder: None,
        },
        _ => AffixPosition::default(),
    }
}

/// Pinned-change callback
pub type AffixChangeHandler = Arc<dyn Fn(bool) + Send + Sync>;

/// Affix configuration
#[derive(Clone, Default)]
pub struct AffixConfig {
    offset_top: Option<f32>,
    offset: Option<f32>,
    offset_bottom: Option<f32>,
    target: Option<TargetResolver>,
    on_change: Option<AffixChangeHandler>,
    prefix_cls: Option<String>,
}

impl AffixConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pin when the element comes within `offset` of the target's top
    pub fn offset_top(mut self, offset: f32) -> Self {
        self.offset_top = Some(offset);
        self
    }

    /// Older name for [`offset_top`](Self::offset_top)
    pub fn offset(mut self, offset: f32) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Pin when the element comes within `offset` of the target's bottom
    pub fn offset_bottom(mut self, offset: f32) -> Self {
        self.offset_bottom = Some(offset);
        self
    }

    /// Track a scroll container instead of the viewport
    pub fn target(mut self, target: TargetResolver) -> Self {
        self.target = Some(target);
        self
    }

    /// Called with the new pinned state whenever it flips
    pub fn on_change<F>(mut self, callback: F) -> Self
    where
        F: Fn(bool) + Send + Sync + 'static,
    {
        self.on_change = Some(Arc::new(callback));
        self
    }

    /// Class applied to the pinned node while pinned
    pub fn prefix_cls(mut self, prefix: impl Into<String>) -> Self {
        self.prefix_cls = Some(prefix.into());
        self
    }

    pub fn resolved_offsets(&self) -> ResolvedOffsets {
        ResolvedOffsets::resolve(self.offset_top, self.offset, self.offset_bottom)
    }

    /// Build the component
    pub fn build(self, host: &Host, ctx: &Context, nodes: AffixNodes) -> Affix {
        Affix::new(host, ctx, self, nodes)
    }

    fn same_target(&self, other: &AffixConfig) -> bool {
        match (&self.target, &other.target) {
            (None, None) => true,
            (Some(a), Some(b)) => tack_core::same_resolver(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for AffixConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AffixConfig")
            .field("offset_top", &self.offset_top)
            .field("offset", &self.offset)
            .field("offset_bottom", &self.offset_bottom)
            .field("custom_target", &self.target.is_some())
            .field("prefix_cls", &self.prefix_cls)
            .finish()
    }
}

/// The two nodes an affix measures
#[derive(Clone)]
pub struct AffixNodes {
    /// Outer node that stays in normal flow
    pub placeholder: Arc<dyn Measurable>,
    /// Inner node that becomes fixed
    pub fixed: Arc<dyn Measurable>,
}

impl AffixNodes {
    pub fn new(placeholder: Arc<dyn Measurable>, fixed: Arc<dyn Measurable>) -> Self {
        Self { placeholder, fixed }
    }
}

/// Render description for the host
#[derive(Clone, Debug, PartialEq)]
pub struct AffixRender {
    pub placeholder: Option<PlaceholderStyle>,
    pub affix: Option<AffixStyle>,
    /// Class for the pinned node; empty while unpinned
    pub class_name: String,
}

struct AffixInner {
    config: AffixConfig,
    /// Prefix from the component config, used when the config sets none
    context_prefix: String,
    nodes: AffixNodes,
    position: AffixPosition,
    attached: Option<Arc<dyn ScrollTarget>>,
    listeners: Vec<ListenerId>,
    setup_task: Option<TaskId>,
    mounted: bool,
}

impl AffixInner {
    fn prefix(&self) -> &str {
        self.config
            .prefix_cls
            .as_deref()
            .unwrap_or(&self.context_prefix)
    }

    fn detach(&mut self) {
        if let Some(target) = self.attached.take() {
            for id in self.listeners.drain(..) {
                target.remove_listener(id);
            }
            tracing::debug!("affix listeners detached");
        }
    }
}

fn lock(inner: &Mutex<AffixInner>) -> MutexGuard<'_, AffixInner> {
    inner.lock().unwrap_or_else(|e| e.into_inner())
}

/// Pins an element to the viewport (or a scroll container) while scrolling
pub struct Affix {
    inner: Arc<Mutex<AffixInner>>,
    throttle: FrameThrottle<ViewEvent>,
    host: Host,
}

impl Affix {
    pub fn new(host: &Host, ctx: &Context, config: AffixConfig, nodes: AffixNodes) -> Self {
        let inner = Arc::new(Mutex::new(AffixInner {
            config,
            context_prefix: ComponentConfig::from_context(ctx).prefix.affix,
            nodes,
            position: AffixPosition::default(),
            attached: None,
            listeners: Vec::new(),
            setup_task: None,
            mounted: false,
        }));

        let weak = Arc::downgrade(&inner);
        let callback_host = host.clone();
        let throttle = FrameThrottle::new(host.scheduler().clone(), move |event: ViewEvent| {
            if let Some(inner) = weak.upgrade() {
                recompute(&inner, &callback_host, &event);
            }
        });

        Self {
            inner,
            throttle,
            host: host.clone(),
        }
    }

    /// Start tracking. Listener setup waits one scheduler tick so the
    /// target resolver can see nodes mounted in the same pass.
    pub fn mount(&self) {
        {
            let mut inner = lock(&self.inner);
            if inner.mounted {
                return;
            }
            inner.mounted = true;
        }
        schedule_attach(Arc::downgrade(&self.inner), self.throttle.clone(), self.host.clone());
    }

    /// Replace the configuration. A different target moves the listeners
    /// and queues a recomputation.
    pub fn update(&self, config: AffixConfig, ctx: &Context) {
        lock(&self.inner).context_prefix = ComponentConfig::from_context(ctx).prefix.affix;
        self.apply(config);
    }

    /// Switch to another scroll target (`None` for the viewport)
    pub fn set_target(&self, target: Option<TargetResolver>) {
        let mut config = lock(&self.inner).config.clone();
        config.target = target;
        self.apply(config);
    }

    fn apply(&self, config: AffixConfig) {
        let retarget = {
            let mut inner = lock(&self.inner);
            let retarget = !inner.config.same_target(&config) && inner.mounted;
            inner.config = config;
            if retarget {
                if let Some(task) = inner.setup_task.take() {
                    self.host.scheduler().cancel(task);
                }
            }
            retarget
        };

        if retarget {
            tracing::debug!("affix target changed");
            if !attach(&self.inner, &self.throttle, &self.host) {
                schedule_attach(Arc::downgrade(&self.inner), self.throttle.clone(), self.host.clone());
            }
            self.throttle.call(ViewEvent::synthetic());
        }
    }

    /// Stop tracking: detach listeners and drop pending work
    pub fn unmount(&self) {
        let mut inner = lock(&self.inner);
        inner.mounted = false;
        inner.detach();
        if let Some(task) = inner.setup_task.take() {
            self.host.scheduler().cancel(task);
        }
        self.throttle.cancel();
    }

    /// Queue a recomputation for the next frame
    pub fn update_position(&self, event: ViewEvent) {
        self.throttle.call(event);
    }

    pub fn affix_style(&self) -> Option<AffixStyle> {
        lock(&self.inner).position.affix
    }

    pub fn placeholder_style(&self) -> Option<PlaceholderStyle> {
        lock(&self.inner).position.placeholder
    }

    pub fn is_affixed(&self) -> bool {
        self.affix_style().is_some()
    }

    /// Whether listeners are attached to a target
    pub fn is_listening(&self) -> bool {
        lock(&self.inner).attached.is_some()
    }

    pub fn render(&self) -> AffixRender {
        let inner = lock(&self.inner);
        let affixed = inner.position.affix.is_some();
        AffixRender {
            placeholder: inner.position.placeholder,
            affix: inner.position.affix,
            class_name: ClassList::new()
                .add_if(inner.prefix(), affixed)
                .build(),
        }
    }
}

impl Drop for Affix {
    fn drop(&mut self) {
        self.unmount();
    }
}

impl fmt::Debug for Affix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = lock(&self.inner);
        f.debug_struct("Affix")
            .field("config", &inner.config)
            .field("position", &inner.position)
            .field("listening", &inner.attached.is_some())
            .finish()
    }
}

fn resolve_target(inner: &Mutex<AffixInner>, host: &Host) -> Option<Arc<dyn ScrollTarget>> {
    let resolver = lock(inner)
        .config
        .target
        .clone()
        .unwrap_or_else(|| host.default_target());
    resolver()
}

/// Attach position listeners to the resolved target. Returns false when the
/// target is not available yet.
fn attach(inner: &Arc<Mutex<AffixInner>>, throttle: &FrameThrottle<ViewEvent>, host: &Host) -> bool {
    let Some(target) = resolve_target(inner, host) else {
        tracing::trace!("affix target not resolvable yet");
        return false;
    };

    let mut guard = lock(inner);
    guard.detach();
    for kind in POSITION_EVENTS {
        let throttle = throttle.clone();
        let id = target.add_listener(kind, Arc::new(move |event: &ViewEvent| throttle.call(*event)));
        guard.listeners.push(id);
    }
    guard.attached = Some(target);
    tracing::debug!(events = POSITION_EVENTS.len(), "affix listeners attached");
    true
}

/// Attach on the next tick, retrying every tick until the target resolves
fn schedule_attach(weak: Weak<Mutex<AffixInner>>, throttle: FrameThrottle<ViewEvent>, host: Host) {
    let Some(inner) = weak.upgrade() else {
        return;
    };
    let scheduler = host.scheduler().clone();
    let task_weak = weak.clone();
    let task = scheduler.defer(move || {
        let Some(inner) = task_weak.upgrade() else {
            return;
        };
        {
            let mut guard = lock(&inner);
            guard.setup_task = None;
            if !guard.mounted {
                return;
            }
        }
        if !attach(&inner, &throttle, &host) {
            schedule_attach(task_weak, throttle, host);
        }
    });
    if let Some(previous) = lock(&inner).setup_task.replace(task) {
        scheduler.cancel(previous);
    };
}

fn recompute(inner: &Mutex<AffixInner>, host: &Host, event: &ViewEvent) {
    let Some(target) = resolve_target(inner, host) else {
        return;
    };
    let (nodes, offsets) = {
        let guard = lock(inner);
        (guard.nodes.clone(), guard.config.resolved_offsets())
    };
    let metrics = AffixMetrics::measure(
        target.as_ref(),
        host.viewport(),
        nodes.placeholder.as_ref(),
        nodes.fixed.as_ref(),
    );
    tracing::trace!(
        event = ?event.kind,
        scroll_top = metrics.scroll_top,
        elem_top = metrics.elem_offset.top(),
        "affix recompute"
    );

    let notify = {
        let mut guard = lock(inner);
        let current = guard.position;
        let next = next_position(&offsets, &metrics, event, current);
        let mut changed = false;
        let mut flipped = None;

        // Scrolling the viewport while already pinned never restyles
        let settled_scroll = event.is(EventKind::Scroll)
            && current.affix.is_some()
            && next.affix.is_some()
            && target.is_viewport();

        if !settled_scroll && next.affix != current.affix {
            guard.position.affix = next.affix;
            changed = true;
            if next.affix.is_some() != current.affix.is_some() {
                flipped = Some(next.affix.is_some());
            }
        }
        if next.placeholder != current.placeholder {
            guard.position.placeholder = next.placeholder;
            changed = true;
        }
        if changed {
            host.request_render();
        }

        flipped.and_then(|pinned| guard.config.on_change.clone().map(|cb| (cb, pinned)))
    };

    if let Some((on_change, pinned)) = notify {
        tracing::debug!(pinned, "affix state changed");
        on_change(pinned);
    }
}

/// Create an affix configuration
pub fn affix() -> AffixConfig {
    AffixConfig::new()
}
