//! Component library configuration
//!
//! Optional `tack.toml` read by the host at startup and handed to components
//! through the [`Context`](tack_core::Context):
//!
//! ```toml
//! theme = "dark"
//! inline_indent = 16
//!
//! [prefix]
//! affix = "ant-affix"
//! menu = "fy-menu"
//! checkbox = "fy-checkbox"
//! ```
//!
//! Every key is optional.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::str::FromStr;

use tack_core::Context;

use crate::error::{Result, TackError};

/// Visual theme for themed components
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }
}

impl FromStr for Theme {
    type Err = TackError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(TackError::InvalidTheme(other.to_string())),
        }
    }
}

/// Class name prefixes per component
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PrefixConfig {
    #[serde(default = "default_affix_prefix")]
    pub affix: String,
    #[serde(default = "default_menu_prefix")]
    pub menu: String,
    #[serde(default = "default_checkbox_prefix")]
    pub checkbox: String,
}

fn default_affix_prefix() -> String {
    "ant-affix".to_string()
}

fn default_menu_prefix() -> String {
    "fy-menu".to_string()
}

fn default_checkbox_prefix() -> String {
    "fy-checkbox".to_string()
}

fn default_inline_indent() -> f32 {
    24.0
}

impl Default for PrefixConfig {
    fn default() -> Self {
        Self {
            affix: default_affix_prefix(),
            menu: default_menu_prefix(),
            checkbox: default_checkbox_prefix(),
        }
    }
}

/// Library-wide defaults
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ComponentConfig {
    #[serde(default)]
    pub prefix: PrefixConfig,
    #[serde(default)]
    pub theme: Theme,
    /// Indentation per nesting level for inline menus
    #[serde(default = "default_inline_indent")]
    pub inline_indent: f32,
}

impl Default for ComponentConfig {
    fn default() -> Self {
        Self {
            prefix: PrefixConfig::default(),
            theme: Theme::default(),
            inline_indent: default_inline_indent(),
        }
    }
}

impl ComponentConfig {
    pub fn from_toml_str(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&content)?;
        tracing::debug!(path = %path.display(), "loaded component config");
        Ok(config)
    }

    /// The config provided in `ctx`, or the defaults
    pub fn from_context(ctx: &Context) -> Self {
        ctx.get::<ComponentConfig>().unwrap_or_default()
    }
}
