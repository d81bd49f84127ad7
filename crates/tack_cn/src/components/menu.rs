//! Menu component - open and selected key state for menus
//!
//! Tracks which submenus are open and which items are selected. Both sets are
//! owned by the menu unless the host passes them in (`open_keys`,
//! `selected_keys`), in which case the host value always wins and internal
//! actions only report through callbacks.
//!
//! Inline menus can collapse, either through `inline_collapsed` or a
//! [`SiderCollapsed`] value provided by an enclosing sider. Collapsing hides the
//! open submenus and expanding restores them.
//!
//! # Example
//!
//! ```ignore
//! use tack_cn::prelude::*;
//!
//! let menu = cn::menu()
//!     .mode(MenuMode::Inline)
//!     .default_open_keys(["settings"])
//!     .on_open_change(|keys| tracing::info!(?keys, "open keys"))
//!     .build(&host, &ctx);
//!
//! menu.open_change(vec!["settings".into(), "profile".into()]);
//! let render = menu.render();
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use indexmap::IndexSet;
use tack_core::{Context, DirtyFlag, Host};

use crate::class_names::ClassList;
use crate::config::{ComponentConfig, Theme};
use crate::error::{Result, TackError};

/// Menu layout mode
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum MenuMode {
    #[default]
    Vertical,
    Horizontal,
    Inline,
}

impl MenuMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            MenuMode::Vertical => "vertical",
            MenuMode::Horizontal => "horizontal",
            MenuMode::Inline => "inline",
        }
    }
}

impl FromStr for MenuMode {
    type Err = TackError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "vertical" => Ok(MenuMode::Vertical),
            "horizontal" => Ok(MenuMode::Horizontal),
            "inline" => Ok(MenuMode::Inline),
            other => Err(TackError::InvalidMode(other.to_string())),
        }
    }
}

impl fmt::Display for MenuMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Collapsed state provided by an enclosing sider
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SiderCollapsed(pub bool);

/// Collapsed state a menu provides to its items and submenus
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InlineCollapsed(pub bool);

/// Payload for `on_select` / `on_deselect`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectInfo {
    pub key: String,
    /// Selection after the change
    pub selected_keys: Vec<String>,
}

/// A click on a menu item
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ItemClick {
    pub key: String,
    /// Keys from the clicked item up to the root submenu
    pub key_path: Vec<String>,
}

impl ItemClick {
    pub fn new(key: impl Into<String>) -> Self {
        let key = key.into();
        Self {
            key_path: vec![key.clone()],
            key,
        }
    }

    pub fn key_path<I, S>(mut self, path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.key_path = path.into_iter().map(Into::into).collect();
        self
    }
}

// =============================================================================
// State machine
// =============================================================================

/// Open-key bookkeeping for a menu
///
/// Every transition is an explicit method; nothing here reads props or
/// context, so the rules can be exercised on their own.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MenuMachine {
    open_keys: IndexSet<String>,
    /// Set while an inline menu is animating into its collapsed form
    switching_from_inline: bool,
    inline_snapshot: IndexSet<String>,
    restore_owed: bool,
}

impl MenuMachine {
    pub fn new<I, S>(open_keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            open_keys: open_keys.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    pub fn open_keys(&self) -> &IndexSet<String> {
        &self.open_keys
    }

    pub fn is_switching_from_inline(&self) -> bool {
        self.switching_from_inline
    }

    pub fn restore_owed(&self) -> bool {
        self.restore_owed
    }

    /// Replace the open keys wholesale
    pub fn set_open_keys<I, S>(&mut self, keys: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.open_keys = keys.into_iter().map(Into::into).collect();
    }

    /// The configured mode moved away from inline
    pub fn leave_inline(&mut self) {
        self.switching_from_inline = true;
    }

    /// Hide open submenus, remembering them for [`expand`](Self::expand)
    pub fn collapse(&mut self) {
        self.switching_from_inline = !self.open_keys.is_empty();
        self.inline_snapshot = std::mem::take(&mut self.open_keys);
        self.restore_owed = true;
        tracing::debug!(
            remembered = self.inline_snapshot.len(),
            switching = self.switching_from_inline,
            "menu collapsed"
        );
    }

    /// Bring back the submenus hidden by the last collapse
    pub fn expand(&mut self) {
        if !self.restore_owed {
            return;
        }
        self.open_keys = std::mem::take(&mut self.inline_snapshot);
        self.restore_owed = false;
        tracing::debug!(restored = self.open_keys.len(), "menu expanded");
    }

    /// Clear the switching flag, returning whether it was set
    pub fn finish_switch(&mut self) -> bool {
        std::mem::replace(&mut self.switching_from_inline, false)
    }

    /// Mode the menu renders in
    pub fn effective_mode(&self, configured: MenuMode, collapsed: bool) -> MenuMode {
        if self.switching_from_inline && collapsed {
            MenuMode::Inline
        } else if collapsed {
            MenuMode::Vertical
        } else {
            configured
        }
    }
}

// =============================================================================
// Motion
// =============================================================================

/// Submenu open/close animation handed to the renderer
#[derive(Clone, Debug)]
pub enum MenuMotion {
    /// Popups appear without animation
    None,
    /// Named transition for popup submenus
    Transition(String),
    /// Height animation for inline submenus
    Accordion(AccordionMotion),
}

impl MenuMotion {
    fn named(name: &str) -> Self {
        if name.is_empty() {
            MenuMotion::None
        } else {
            MenuMotion::Transition(name.to_string())
        }
    }

    /// Transition name, if this is a named transition
    pub fn name(&self) -> Option<&str> {
        match self {
            MenuMotion::Transition(name) => Some(name),
            _ => None,
        }
    }
}

/// Accordion animation hooks for inline submenus
#[derive(Clone)]
pub struct AccordionMotion {
    menu: Weak<Mutex<MenuInner>>,
    dirty: DirtyFlag,
}

impl AccordionMotion {
    /// Enter finished
    pub fn enter(&self, done: impl FnOnce()) {
        done();
    }

    /// Leave finished. The menu may now leave its inline form.
    pub fn leave(&self, done: impl FnOnce()) {
        if let Some(menu) = self.menu.upgrade() {
            lock(&menu).machine.finish_switch();
        }
        self.dirty.store(true, std::sync::atomic::Ordering::SeqCst);
        done();
    }
}

impl fmt::Debug for AccordionMotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AccordionMotion").finish_non_exhaustive()
    }
}

// =============================================================================
// Configuration
// =============================================================================

pub type OpenChangeHandler = Arc<dyn Fn(Vec<String>) + Send + Sync>;
pub type SelectHandler = Arc<dyn Fn(SelectInfo) + Send + Sync>;
pub type ClickHandler = Arc<dyn Fn(ItemClick) + Send + Sync>;

fn collect_keys<I, S>(keys: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    keys.into_iter().map(Into::into).collect()
}

/// Menu configuration
#[derive(Clone, Default)]
pub struct MenuConfig {
    mode: MenuMode,
    theme: Option<Theme>,
    class_name: Option<String>,
    prefix_cls: Option<String>,
    open_keys: Option<Vec<String>>,
    default_open_keys: Option<Vec<String>>,
    selected_keys: Option<Vec<String>>,
    default_selected_keys: Option<Vec<String>>,
    selectable: Option<bool>,
    multiple: bool,
    inline_collapsed: Option<bool>,
    inline_indent: Option<f32>,
    open_animation: Option<String>,
    open_transition_name: Option<String>,
    on_open_change: Option<OpenChangeHandler>,
    on_select: Option<SelectHandler>,
    on_deselect: Option<SelectHandler>,
    on_click: Option<ClickHandler>,
}

impl MenuConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(mut self, mode: MenuMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn theme(mut self, theme: Theme) -> Self {
        self.theme = Some(theme);
        self
    }

    /// Extra classes for the menu root
    pub fn class(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    pub fn prefix_cls(mut self, prefix: impl Into<String>) -> Self {
        self.prefix_cls = Some(prefix.into());
        self
    }

    /// Control the open submenus from outside
    pub fn open_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.open_keys = Some(collect_keys(keys));
        self
    }

    /// Submenus open on first render
    pub fn default_open_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.default_open_keys = Some(collect_keys(keys));
        self
    }

    /// Control the selected items from outside
    pub fn selected_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selected_keys = Some(collect_keys(keys));
        self
    }

    pub fn default_selected_keys<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.default_selected_keys = Some(collect_keys(keys));
        self
    }

    pub fn selectable(mut self, selectable: bool) -> Self {
        self.selectable = Some(selectable);
        self
    }

    /// Allow more than one selected item
    pub fn multiple(mut self, multiple: bool) -> Self {
        self.multiple = multiple;
        self
    }

    /// Collapse an inline menu
    pub fn inline_collapsed(mut self, collapsed: bool) -> Self {
        self.inline_collapsed = Some(collapsed);
        self
    }

    pub fn inline_indent(mut self, indent: f32) -> Self {
        self.inline_indent = Some(indent);
        self
    }

    pub fn open_animation(mut self, name: impl Into<String>) -> Self {
        self.open_animation = Some(name.into());
        self
    }

    pub fn open_transition_name(mut self, name: impl Into<String>) -> Self {
        self.open_transition_name = Some(name.into());
        self
    }

    pub fn on_open_change<F>(mut self, callback: F) -> Self
    where
        F: Fn(Vec<String>) + Send + Sync + 'static,
    {
        self.on_open_change = Some(Arc::new(callback));
        self
    }

    pub fn on_select<F>(mut self, callback: F) -> Self
    where
        F: Fn(SelectInfo) + Send + Sync + 'static,
    {
        self.on_select = Some(Arc::new(callback));
        self
    }

    pub fn on_deselect<F>(mut self, callback: F) -> Self
    where
        F: Fn(SelectInfo) + Send + Sync + 'static,
    {
        self.on_deselect = Some(Arc::new(callback));
        self
    }

    pub fn on_click<F>(mut self, callback: F) -> Self
    where
        F: Fn(ItemClick) + Send + Sync + 'static,
    {
        self.on_click = Some(Arc::new(callback));
        self
    }

    pub fn build(self, host: &Host, ctx: &Context) -> Menu {
        Menu::new(host, ctx, self)
    }

    fn warn_on_misuse(&self) {
        if self.inline_collapsed.is_some() && self.mode != MenuMode::Inline {
            tracing::warn!(
                mode = %self.mode,
                "`inline_collapsed` should only be used when the menu mode is inline"
            );
        }
    }
}

impl fmt::Debug for MenuConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MenuConfig")
            .field("mode", &self.mode)
            .field("theme", &self.theme)
            .field("open_keys", &self.open_keys)
            .field("selected_keys", &self.selected_keys)
            .field("multiple", &self.multiple)
            .field("inline_collapsed", &self.inline_collapsed)
            .finish_non_exhaustive()
    }
}

// =============================================================================
// Menu
// =============================================================================

/// Render description for the host
#[derive(Clone, Debug)]
pub struct MenuRender {
    pub mode: MenuMode,
    pub open_keys: Vec<String>,
    pub selected_keys: Vec<String>,
    pub class_name: String,
    pub motion: MenuMotion,
    /// Whether an item click closes open popups
    pub closes_on_click: bool,
    pub inline_indent: f32,
}

struct MenuInner {
    config: MenuConfig,
    defaults: ComponentConfig,
    sider_collapsed: Option<bool>,
    machine: MenuMachine,
    selected_keys: IndexSet<String>,
}

impl MenuInner {
    fn collapsed(&self) -> bool {
        self.sider_collapsed
            .unwrap_or_else(|| self.config.inline_collapsed.unwrap_or(false))
    }

    fn mode(&self) -> MenuMode {
        self.machine
            .effective_mode(self.config.mode, self.collapsed())
    }

    fn prefix(&self) -> &str {
        self.config
            .prefix_cls
            .as_deref()
            .unwrap_or(&self.defaults.prefix.menu)
    }

    fn selected(&self) -> IndexSet<String> {
        match &self.config.selected_keys {
            Some(keys) => keys.iter().cloned().collect(),
            None => self.selected_keys.clone(),
        }
    }
}

fn lock(inner: &Mutex<MenuInner>) -> MutexGuard<'_, MenuInner> {
    inner.lock().unwrap_or_else(|e| e.into_inner())
}

/// Menu open/selected state
pub struct Menu {
    inner: Arc<Mutex<MenuInner>>,
    host: Host,
}

impl Menu {
    pub fn new(host: &Host, ctx: &Context, config: MenuConfig) -> Self {
        config.warn_on_misuse();

        let open_keys = config
            .default_open_keys
            .clone()
            .or_else(|| config.open_keys.clone())
            .unwrap_or_default();
        let selected_keys = config
            .default_selected_keys
            .clone()
            .or_else(|| config.selected_keys.clone())
            .unwrap_or_default();

        Self {
            inner: Arc::new(Mutex::new(MenuInner {
                defaults: ComponentConfig::from_context(ctx),
                sider_collapsed: ctx.get::<SiderCollapsed>().map(|s| s.0),
                machine: MenuMachine::new(open_keys),
                selected_keys: selected_keys.into_iter().collect(),
                config,
            })),
            host: host.clone(),
        }
    }

    /// Apply new props and the current ambient context
    pub fn update(&self, config: MenuConfig, ctx: &Context) {
        config.warn_on_misuse();
        let mut inner = lock(&self.inner);

        let next_sider = ctx.get::<SiderCollapsed>().map(|s| s.0);
        let prev_sider = inner.sider_collapsed;
        let prev_collapsed_prop = inner.config.inline_collapsed.unwrap_or(false);
        let next_collapsed_prop = config.inline_collapsed.unwrap_or(false);

        if inner.config.mode == MenuMode::Inline && config.mode != MenuMode::Inline {
            inner.machine.leave_inline();
        }

        let collapsing = (next_collapsed_prop && !prev_collapsed_prop)
            || (next_sider == Some(true) && prev_sider != Some(true));
        let expanding = (!next_collapsed_prop && prev_collapsed_prop)
            || (next_sider != Some(true) && prev_sider == Some(true));
        let controlled = config.open_keys.clone();

        inner.defaults = ComponentConfig::from_context(ctx);
        inner.sider_collapsed = next_sider;
        inner.config = config;

        if let Some(keys) = controlled {
            inner.machine.set_open_keys(keys);
        } else {
            if collapsing && inner.config.mode == MenuMode::Inline {
                inner.machine.collapse();
            }
            if expanding {
                inner.machine.expand();
            }
        }
        drop(inner);

        self.host.request_render();
    }

    /// Submenus were opened or closed by the user
    pub fn open_change(&self, keys: Vec<String>) {
        let callback = {
            let mut inner = lock(&self.inner);
            if inner.config.open_keys.is_none() {
                inner.machine.set_open_keys(keys.iter().cloned());
                self.host.request_render();
            }
            inner.config.on_open_change.clone()
        };

        if let Some(on_open_change) = callback {
            on_open_change(keys);
        }
    }

    /// A menu item was clicked
    pub fn item_click(&self, click: ItemClick) {
        let (selection, closes, on_click) = {
            let mut inner = lock(&self.inner);
            let selection = self.apply_selection(&mut inner, &click.key);
            (selection, inner.mode() != MenuMode::Inline, inner.config.on_click.clone())
        };

        if let Some((callback, info)) = selection {
            callback(info);
        }
        if closes {
            self.open_change(Vec::new());
        }
        if let Some(on_click) = on_click {
            on_click(click);
        }
    }

    fn apply_selection(
        &self,
        inner: &mut MenuInner,
        key: &str,
    ) -> Option<(SelectHandler, SelectInfo)> {
        if !inner.config.selectable.unwrap_or(true) {
            return None;
        }

        let mut selected = inner.selected();
        let multiple = inner.config.multiple;
        let deselect = selected.contains(key);
        if deselect && !multiple {
            return None;
        }

        if deselect {
            selected.shift_remove(key);
        } else if multiple {
            selected.insert(key.to_string());
        } else {
            selected = IndexSet::from_iter([key.to_string()]);
        }

        tracing::debug!(key, deselect, "menu selection changed");
        let info = SelectInfo {
            key: key.to_string(),
            selected_keys: selected.iter().cloned().collect(),
        };
        if inner.config.selected_keys.is_none() {
            inner.selected_keys = selected;
            self.host.request_render();
        }

        let callback = if deselect {
            inner.config.on_deselect.clone()
        } else {
            inner.config.on_select.clone()
        };
        callback.map(|cb| (cb, info))
    }

    /// Context for the menu's items and submenus
    pub fn child_context(&self, parent: &Context) -> Context {
        parent.provide(InlineCollapsed(self.is_collapsed()))
    }

    pub fn is_collapsed(&self) -> bool {
        lock(&self.inner).collapsed()
    }

    pub fn mode(&self) -> MenuMode {
        lock(&self.inner).mode()
    }

    pub fn open_keys(&self) -> Vec<String> {
        lock(&self.inner).machine.open_keys().iter().cloned().collect()
    }

    pub fn selected_keys(&self) -> Vec<String> {
        lock(&self.inner).selected().into_iter().collect()
    }

    /// Snapshot of the current state machine
    pub fn machine(&self) -> MenuMachine {
        lock(&self.inner).machine.clone()
    }

    /// Describe the menu for the renderer.
    ///
    /// Rendering a vertical menu right after leaving inline mode consumes the
    /// switch, so only that first render skips the popup animation.
    pub fn render(&self) -> MenuRender {
        let mut inner = lock(&self.inner);
        let mode = inner.mode();
        let motion = self.select_motion(&mut inner, mode);
        let collapsed = inner.collapsed();
        let theme = inner.config.theme.unwrap_or(inner.defaults.theme);
        let prefix = inner.prefix().to_string();

        let class_name = ClassList::new()
            .add(inner.config.class_name.as_deref().unwrap_or_default())
            .add(format!("{prefix}-{}", theme.as_str()))
            .add_if(format!("{prefix}-inline-collapsed"), collapsed)
            .build();

        MenuRender {
            mode,
            open_keys: inner.machine.open_keys().iter().cloned().collect(),
            selected_keys: inner.selected().into_iter().collect(),
            class_name,
            motion,
            closes_on_click: mode != MenuMode::Inline,
            inline_indent: inner
                .config
                .inline_indent
                .unwrap_or(inner.defaults.inline_indent),
        }
    }

    fn select_motion(&self, inner: &mut MenuInner, mode: MenuMode) -> MenuMotion {
        if let Some(name) = inner
            .config
            .open_animation
            .as_deref()
            .or(inner.config.open_transition_name.as_deref())
        {
            return MenuMotion::named(name);
        }

        match mode {
            MenuMode::Horizontal => MenuMotion::named("slide-up"),
            MenuMode::Vertical => {
                if inner.machine.finish_switch() {
                    MenuMotion::None
                } else {
                    MenuMotion::named("zoom-big")
                }
            }
            MenuMode::Inline => MenuMotion::Accordion(AccordionMotion {
                menu: Arc::downgrade(&self.inner),
                dirty: self.host.dirty_flag(),
            }),
        }
    }
}

impl fmt::Debug for Menu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = lock(&self.inner);
        f.debug_struct("Menu")
            .field("config", &inner.config)
            .field("machine", &inner.machine)
            .field("selected_keys", &inner.selected_keys)
            .finish()
    }
}

/// Create a menu configuration
pub fn menu() -> MenuConfig {
    MenuConfig::new()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn host() -> Host {
        Host::new(1024.0, 768.0)
    }

    fn recorder<T: Send + 'static>() -> (Arc<Mutex<Vec<T>>>, impl Fn(T) + Send + Sync + 'static) {
        let log = Arc::new(Mutex::new(Vec::new()));
        let sink = log.clone();
        (log, move |value| sink.lock().unwrap().push(value))
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!("inline".parse::<MenuMode>().unwrap(), MenuMode::Inline);
        assert_eq!("horizontal".parse::<MenuMode>().unwrap(), MenuMode::Horizontal);
        assert!(matches!(
            "sideways".parse::<MenuMode>(),
            Err(TackError::InvalidMode(mode)) if mode == "sideways"
        ));
    }

    #[test]
    fn test_initial_open_keys() {
        let host = host();
        let ctx = Context::root();

        let menu = cn_menu().default_open_keys(["a"]).build(&host, &ctx);
        assert_eq!(menu.open_keys(), vec!["a"]);

        let menu = cn_menu()
            .default_open_keys(["a"])
            .open_keys(["b"])
            .build(&host, &ctx);
        assert_eq!(menu.open_keys(), vec!["a"]);

        let menu = cn_menu().open_keys(["b"]).build(&host, &ctx);
        assert_eq!(menu.open_keys(), vec!["b"]);

        assert!(cn_menu().build(&host, &ctx).open_keys().is_empty());
    }

    fn cn_menu() -> MenuConfig {
        menu()
    }

    #[test]
    fn test_controlled_open_keys_ignore_internal_changes() {
        let host = host();
        let (changes, on_open_change) = recorder::<Vec<String>>();
        let menu = menu()
            .open_keys(["a"])
            .on_open_change(on_open_change)
            .build(&host, &Context::root());

        menu.open_change(Vec::new());

        assert_eq!(menu.open_keys(), vec!["a"]);
        assert_eq!(*changes.lock().unwrap(), vec![Vec::<String>::new()]);
    }

    #[test]
    fn test_controlled_open_keys_follow_props() {
        let host = host();
        let ctx = Context::root();
        let menu = menu().open_keys(["a"]).build(&host, &ctx);

        menu.update(cn_menu().open_keys(["b", "c"]), &ctx);
        assert_eq!(menu.open_keys(), vec!["b", "c"]);
    }

    #[test]
    fn test_click_closes_popups_outside_inline() {
        let host = host();
        let (clicks, on_click) = recorder::<ItemClick>();
        let menu = menu()
            .mode(MenuMode::Horizontal)
            .on_click(on_click)
            .build(&host, &Context::root());

        menu.open_change(vec!["b".to_string()]);
        assert_eq!(menu.open_keys(), vec!["b"]);

        menu.item_click(ItemClick::new("b-1").key_path(["b-1", "b"]));

        assert!(menu.open_keys().is_empty());
        let clicks = clicks.lock().unwrap();
        assert_eq!(clicks.len(), 1);
        assert_eq!(clicks[0].key, "b-1");
        assert_eq!(clicks[0].key_path, vec!["b-1", "b"]);
    }

    #[test]
    fn test_click_keeps_inline_submenus_open() {
        let host = host();
        let menu = menu()
            .mode(MenuMode::Inline)
            .default_open_keys(["b"])
            .build(&host, &Context::root());

        menu.item_click(ItemClick::new("b-1"));
        assert_eq!(menu.open_keys(), vec!["b"]);
        assert!(!menu.render().closes_on_click);
    }

    #[test]
    fn test_collapse_and_expand_restores_open_keys() {
        let host = host();
        let ctx = Context::root();
        let menu = menu()
            .mode(MenuMode::Inline)
            .default_open_keys(["x", "y"])
            .build(&host, &ctx);

        menu.update(cn_menu().mode(MenuMode::Inline).inline_collapsed(true), &ctx);
        assert!(menu.open_keys().is_empty());
        assert!(menu.machine().restore_owed());
        assert!(menu.is_collapsed());

        menu.update(cn_menu().mode(MenuMode::Inline).inline_collapsed(false), &ctx);
        assert_eq!(menu.open_keys(), vec!["x", "y"]);
        assert!(!menu.machine().restore_owed());
    }

    #[test]
    fn test_collapse_stays_inline_until_leave_animation_finishes() {
        let host = host();
        let ctx = Context::root();
        let menu = menu()
            .mode(MenuMode::Inline)
            .default_open_keys(["x"])
            .build(&host, &ctx);

        menu.update(cn_menu().mode(MenuMode::Inline).inline_collapsed(true), &ctx);
        host.take_dirty();

        let render = menu.render();
        assert_eq!(render.mode, MenuMode::Inline);
        let accordion = match render.motion {
            MenuMotion::Accordion(accordion) => accordion,
            other => panic!("expected accordion motion, got {other:?}"),
        };

        let mut finished = false;
        accordion.leave(|| finished = true);
        assert!(finished);
        assert!(host.take_dirty());

        let render = menu.render();
        assert_eq!(render.mode, MenuMode::Vertical);
        assert_eq!(render.motion.name(), Some("zoom-big"));
    }

    #[test]
    fn test_collapse_without_open_keys_goes_vertical() {
        let host = host();
        let ctx = Context::root();
        let menu = menu().mode(MenuMode::Inline).build(&host, &ctx);

        menu.update(cn_menu().mode(MenuMode::Inline).inline_collapsed(true), &ctx);
        assert_eq!(menu.mode(), MenuMode::Vertical);
    }

    #[test]
    fn test_collapse_ignored_outside_inline_mode() {
        let host = host();
        let ctx = Context::root();
        let menu = menu()
            .mode(MenuMode::Vertical)
            .default_open_keys(["x"])
            .build(&host, &ctx);

        menu.update(cn_menu().mode(MenuMode::Vertical).inline_collapsed(true), &ctx);
        assert_eq!(menu.open_keys(), vec!["x"]);

        menu.update(cn_menu().mode(MenuMode::Vertical).inline_collapsed(false), &ctx);
        assert_eq!(menu.open_keys(), vec!["x"]);
    }

    #[test]
    fn test_sider_collapse_from_context() {
        let host = host();
        let root = Context::root();
        let expanded = root.provide(SiderCollapsed(false));
        let collapsed = root.provide(SiderCollapsed(true));

        let menu = menu()
            .mode(MenuMode::Inline)
            .default_open_keys(["x", "y"])
            .build(&host, &expanded);

        menu.update(cn_menu().mode(MenuMode::Inline), &collapsed);
        assert!(menu.open_keys().is_empty());
        assert!(menu.is_collapsed());

        let child = menu.child_context(&collapsed);
        assert_eq!(child.get::<InlineCollapsed>(), Some(InlineCollapsed(true)));

        menu.update(cn_menu().mode(MenuMode::Inline), &expanded);
        assert_eq!(menu.open_keys(), vec!["x", "y"]);
        assert_eq!(
            menu.child_context(&expanded).get::<InlineCollapsed>(),
            Some(InlineCollapsed(false))
        );
    }

    #[test]
    fn test_sider_overrides_local_prop() {
        let host = host();
        let ctx = Context::root().provide(SiderCollapsed(false));
        let menu = menu()
            .mode(MenuMode::Inline)
            .inline_collapsed(true)
            .build(&host, &ctx);

        assert!(!menu.is_collapsed());
        assert_eq!(menu.mode(), MenuMode::Inline);
    }

    #[test]
    fn test_leaving_inline_skips_one_animation() {
        let host = host();
        let ctx = Context::root();
        let menu = menu().mode(MenuMode::Inline).build(&host, &ctx);

        menu.update(cn_menu().mode(MenuMode::Vertical), &ctx);
        assert!(menu.machine().is_switching_from_inline());

        let first = menu.render();
        assert_eq!(first.mode, MenuMode::Vertical);
        assert!(matches!(first.motion, MenuMotion::None));

        let second = menu.render();
        assert_eq!(second.motion.name(), Some("zoom-big"));
    }

    #[test]
    fn test_motion_selection() {
        let host = host();
        let ctx = Context::root();

        let horizontal = menu().mode(MenuMode::Horizontal).build(&host, &ctx);
        assert_eq!(horizontal.render().motion.name(), Some("slide-up"));

        let inline = menu().mode(MenuMode::Inline).build(&host, &ctx);
        assert!(matches!(inline.render().motion, MenuMotion::Accordion(_)));

        let explicit = menu()
            .mode(MenuMode::Horizontal)
            .open_transition_name("fade")
            .build(&host, &ctx);
        assert_eq!(explicit.render().motion.name(), Some("fade"));

        let both = menu()
            .open_animation("slide-left")
            .open_transition_name("fade")
            .build(&host, &ctx);
        assert_eq!(both.render().motion.name(), Some("slide-left"));
    }

    #[test]
    fn test_single_selection() {
        let host = host();
        let (selected, on_select) = recorder::<SelectInfo>();
        let menu = menu()
            .default_selected_keys(["a"])
            .on_select(on_select)
            .build(&host, &Context::root());

        menu.item_click(ItemClick::new("b"));
        assert_eq!(menu.selected_keys(), vec!["b"]);

        // Clicking the selected item again changes nothing
        menu.item_click(ItemClick::new("b"));

        let selected = selected.lock().unwrap();
        assert_eq!(selected.len(), 1);
        assert_eq!(
            selected[0],
            SelectInfo {
                key: "b".to_string(),
                selected_keys: vec!["b".to_string()],
            }
        );
    }

    #[test]
    fn test_multiple_selection_toggles() {
        let host = host();
        let (deselected, on_deselect) = recorder::<SelectInfo>();
        let menu = menu()
            .multiple(true)
            .on_deselect(on_deselect)
            .build(&host, &Context::root());

        menu.item_click(ItemClick::new("a"));
        menu.item_click(ItemClick::new("b"));
        assert_eq!(menu.selected_keys(), vec!["a", "b"]);

        menu.item_click(ItemClick::new("a"));
        assert_eq!(menu.selected_keys(), vec!["b"]);
        assert_eq!(deselected.lock().unwrap()[0].selected_keys, vec!["b"]);
    }

    #[test]
    fn test_controlled_and_disabled_selection() {
        let host = host();
        let ctx = Context::root();
        let (selected, on_select) = recorder::<SelectInfo>();

        let controlled = menu()
            .selected_keys(["a"])
            .on_select(on_select)
            .build(&host, &ctx);
        controlled.item_click(ItemClick::new("b"));
        assert_eq!(controlled.selected_keys(), vec!["a"]);
        assert_eq!(selected.lock().unwrap()[0].selected_keys, vec!["b"]);

        let inert = menu().selectable(false).build(&host, &ctx);
        inert.item_click(ItemClick::new("b"));
        assert!(inert.selected_keys().is_empty());
    }

    #[test]
    fn test_class_names() {
        let host = host();
        let ctx = Context::root();

        let menu = menu()
            .mode(MenuMode::Inline)
            .class("side-nav")
            .inline_collapsed(true)
            .build(&host, &ctx);
        assert_eq!(
            menu.render().class_name,
            "side-nav fy-menu-light fy-menu-inline-collapsed"
        );

        let dark = cn_menu()
            .theme(Theme::Dark)
            .prefix_cls("nav")
            .build(&host, &ctx);
        assert_eq!(dark.render().class_name, "nav-dark");
    }

    #[test]
    fn test_inline_indent_from_context() {
        let host = host();
        let ctx = Context::root().provide(ComponentConfig {
            inline_indent: 16.0,
            ..Default::default()
        });

        assert_eq!(menu().build(&host, &ctx).render().inline_indent, 16.0);
        assert_eq!(
            menu().inline_indent(32.0).build(&host, &ctx).render().inline_indent,
            32.0
        );
    }

    #[test]
    fn test_machine_expand_without_collapse_keeps_open_keys() {
        let mut machine = MenuMachine::new(["a"]);
        machine.expand();
        assert_eq!(machine.open_keys().iter().collect::<Vec<_>>(), vec!["a"]);

        // A second expand after a restore is also a no-op
        machine.collapse();
        assert!(machine.open_keys().is_empty());
        machine.expand();
        machine.expand();
        assert_eq!(machine.open_keys().iter().collect::<Vec<_>>(), vec!["a"]);
        machine.finish_switch();

        machine.collapse();
        assert!(machine.is_switching_from_inline());
        assert_eq!(machine.effective_mode(MenuMode::Inline, true), MenuMode::Inline);
        assert!(machine.finish_switch());
        assert_eq!(machine.effective_mode(MenuMode::Inline, true), MenuMode::Vertical);
        assert_eq!(machine.effective_mode(MenuMode::Horizontal, false), MenuMode::Horizontal);
    }
}
