//! Checkbox component for boolean selection
//!
//! A checkbox is controlled when `checked` is set and uncontrolled otherwise,
//! in which case it keeps its own `State<bool>` seeded from
//! `default_checked`.
//!
//! Checkboxes rendered under a [`CheckboxGroup`] (provided through the
//! [`Context`]) hand their checked state to the group: they are checked when
//! the group's value list contains their `value`, and toggling one adds or
//! removes that value.
//!
//! # Example
//!
//! ```ignore
//! use tack_cn::prelude::*;
//!
//! // Standalone
//! let terms = cn::checkbox()
//!     .label("Accept terms")
//!     .on_change(|change| println!("Checked: {}", change.checked))
//!     .build(&host, &ctx);
//! terms.toggle();
//!
//! // Grouped
//! let group = cn::checkbox_group()
//!     .default_value(["apple"])
//!     .build(&host);
//! let group_ctx = group.provide(&ctx);
//! let pear = cn::checkbox().value("pear").build(&host, &group_ctx);
//! pear.toggle();
//! assert_eq!(group.value(), vec!["apple", "pear"]);
//! ```

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use tack_core::{Context, Host, State};

use crate::class_names::ClassList;
use crate::config::ComponentConfig;

/// Payload for a checkbox `on_change`
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CheckboxChange {
    pub checked: bool,
    pub value: Option<String>,
}

pub type CheckboxChangeHandler = Arc<dyn Fn(CheckboxChange) + Send + Sync>;
pub type GroupChangeHandler = Arc<dyn Fn(Vec<String>) + Send + Sync>;

/// Checkbox configuration
#[derive(Clone, Default)]
pub struct CheckboxConfig {
    checked: Option<bool>,
    default_checked: bool,
    disabled: bool,
    indeterminate: bool,
    value: Option<String>,
    label: Option<String>,
    class_name: Option<String>,
    prefix_cls: Option<String>,
    on_change: Option<CheckboxChangeHandler>,
}

impl CheckboxConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Control the checked state from outside
    pub fn checked(mut self, checked: bool) -> Self {
        self.checked = Some(checked);
        self
    }

    pub fn default_checked(mut self, checked: bool) -> Self {
        self.default_checked = checked;
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    /// Show the partially-checked look
    pub fn indeterminate(mut self, indeterminate: bool) -> Self {
        self.indeterminate = indeterminate;
        self
    }

    /// Value reported to the enclosing group
    pub fn value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn class(mut self, class_name: impl Into<String>) -> Self {
        self.class_name = Some(class_name.into());
        self
    }

    pub fn prefix_cls(mut self, prefix: impl Into<String>) -> Self {
        self.prefix_cls = Some(prefix.into());
        self
    }

    pub fn on_change<F>(mut self, callback: F) -> Self
    where
        F: Fn(CheckboxChange) + Send + Sync + 'static,
    {
        self.on_change = Some(Arc::new(callback));
        self
    }

    pub fn build(self, host: &Host, ctx: &Context) -> Checkbox {
        Checkbox::new(host, ctx, self)
    }
}

impl fmt::Debug for CheckboxConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckboxConfig")
            .field("checked", &self.checked)
            .field("default_checked", &self.default_checked)
            .field("disabled", &self.disabled)
            .field("indeterminate", &self.indeterminate)
            .field("value", &self.value)
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

/// Render description for a checkbox
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CheckboxRender {
    /// Class for the wrapping label
    pub wrapper_class: String,
    /// Class for the input itself
    pub input_class: String,
    pub checked: bool,
    pub disabled: bool,
    pub label: Option<String>,
}

/// A boolean input
pub struct Checkbox {
    config: CheckboxConfig,
    checked: State<bool>,
    group: Option<CheckboxGroup>,
    prefix_cls: String,
    host: Host,
}

impl Checkbox {
    pub fn new(host: &Host, ctx: &Context, config: CheckboxConfig) -> Self {
        let prefix_cls = config
            .prefix_cls
            .clone()
            .unwrap_or_else(|| ComponentConfig::from_context(ctx).prefix.checkbox);

        Self {
            checked: host.use_state(config.default_checked),
            group: ctx.get::<CheckboxGroup>(),
            prefix_cls,
            host: host.clone(),
            config,
        }
    }

    /// Replace the configuration, keeping the internal checked state
    pub fn update(&mut self, config: CheckboxConfig) {
        if let Some(prefix) = config.prefix_cls.clone() {
            self.prefix_cls = prefix;
        }
        self.config = config;
        self.host.request_render();
    }

    /// Set the controlled checked value
    pub fn set_checked(&mut self, checked: bool) {
        self.config.checked = Some(checked);
        self.host.request_render();
    }

    pub fn is_checked(&self) -> bool {
        match (&self.group, &self.config.value) {
            (Some(group), Some(value)) => group.contains(value),
            (Some(_), None) => false,
            (None, _) => self.config.checked.unwrap_or_else(|| self.checked.get()),
        }
    }

    pub fn is_disabled(&self) -> bool {
        self.config.disabled
            || self
                .group
                .as_ref()
                .map(CheckboxGroup::is_disabled)
                .unwrap_or(false)
    }

    /// Flip the checkbox as a user click would
    pub fn toggle(&self) {
        if self.is_disabled() {
            return;
        }

        if let Some(group) = &self.group {
            match &self.config.value {
                Some(value) => group.toggle_option(value),
                None => tracing::warn!("checkbox inside a group has no value"),
            }
            return;
        }

        let checked = !self.is_checked();
        if self.config.checked.is_none() {
            self.checked.set_rebuild(checked);
        }
        tracing::trace!(checked, "checkbox toggled");

        if let Some(on_change) = &self.config.on_change {
            on_change(CheckboxChange {
                checked,
                value: self.config.value.clone(),
            });
        }
    }

    pub fn render(&self) -> CheckboxRender {
        let prefix = &self.prefix_cls;
        let checked = self.is_checked();
        let disabled = self.is_disabled();

        CheckboxRender {
            wrapper_class: ClassList::new()
                .add(self.config.class_name.as_deref().unwrap_or_default())
                .add(format!("{prefix}-wrapper"))
                .build(),
            input_class: ClassList::new()
                .add(prefix)
                .add_if(format!("{prefix}-checked"), checked)
                .add_if(format!("{prefix}-disabled"), disabled)
                .add_if(format!("{prefix}-indeterminate"), self.config.indeterminate)
                .build(),
            checked,
            disabled,
            label: self.config.label.clone(),
        }
    }
}

impl fmt::Debug for Checkbox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Checkbox")
            .field("config", &self.config)
            .field("checked", &self.is_checked())
            .field("grouped", &self.group.is_some())
            .finish()
    }
}

// =============================================================================
// CheckboxGroup
// =============================================================================

/// Checkbox group configuration
#[derive(Clone, Default)]
pub struct CheckboxGroupConfig {
    value: Option<Vec<String>>,
    default_value: Vec<String>,
    disabled: bool,
    on_change: Option<GroupChangeHandler>,
}

impl CheckboxGroupConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Control the checked values from outside
    pub fn value<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.value = Some(values.into_iter().map(Into::into).collect());
        self
    }

    pub fn default_value<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.default_value = values.into_iter().map(Into::into).collect();
        self
    }

    /// Disable every checkbox in the group
    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn on_change<F>(mut self, callback: F) -> Self
    where
        F: Fn(Vec<String>) + Send + Sync + 'static,
    {
        self.on_change = Some(Arc::new(callback));
        self
    }

    pub fn build(self, host: &Host) -> CheckboxGroup {
        CheckboxGroup::new(host, self)
    }
}

struct GroupProps {
    controlled: Option<Vec<String>>,
    disabled: bool,
    on_change: Option<GroupChangeHandler>,
}

/// Shared checked-value list for a set of checkboxes
///
/// Cloning yields another handle to the same group.
#[derive(Clone)]
pub struct CheckboxGroup {
    value: State<Vec<String>>,
    props: Arc<Mutex<GroupProps>>,
}

impl CheckboxGroup {
    pub fn new(host: &Host, config: CheckboxGroupConfig) -> Self {
        Self {
            value: host.use_state(config.default_value),
            props: Arc::new(Mutex::new(GroupProps {
                controlled: config.value,
                disabled: config.disabled,
                on_change: config.on_change,
            })),
        }
    }

    fn props(&self) -> MutexGuard<'_, GroupProps> {
        self.props.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Context in which checkboxes join this group
    pub fn provide(&self, ctx: &Context) -> Context {
        ctx.provide(self.clone())
    }

    /// Checked values, in the order they were added
    pub fn value(&self) -> Vec<String> {
        self.props()
            .controlled
            .clone()
            .unwrap_or_else(|| self.value.get())
    }

    pub fn contains(&self, value: &str) -> bool {
        self.value().iter().any(|v| v == value)
    }

    pub fn is_disabled(&self) -> bool {
        self.props().disabled
    }

    /// Set the controlled value list
    pub fn set_value(&self, values: Vec<String>) {
        self.props().controlled = Some(values);
    }

    pub fn set_disabled(&self, disabled: bool) {
        self.props().disabled = disabled;
    }

    /// Add `value` if missing, remove it if present
    pub fn toggle_option(&self, value: &str) {
        let mut next = self.value();
        match next.iter().position(|v| v == value) {
            Some(index) => {
                next.remove(index);
            }
            None => next.push(value.to_string()),
        }

        let on_change = {
            let props = self.props();
            if props.controlled.is_none() {
                self.value.set_rebuild(next.clone());
            }
            props.on_change.clone()
        };
        tracing::trace!(value, checked = ?next, "checkbox group toggled");

        if let Some(on_change) = on_change {
            on_change(next);
        }
    }
}

impl fmt::Debug for CheckboxGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckboxGroup")
            .field("value", &self.value())
            .field("disabled", &self.is_disabled())
            .finish()
    }
}

/// Create a checkbox configuration
pub fn checkbox() -> CheckboxConfig {
    CheckboxConfig::new()
}

/// Create a checkbox group configuration
pub fn checkbox_group() -> CheckboxGroupConfig {
    CheckboxGroupConfig::new()
}
