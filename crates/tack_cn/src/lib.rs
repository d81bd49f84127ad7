//! # Tack Component Library (tack_cn)
//!
//! Headless widgets driven by the `tack_core` runtime. Components read
//! geometry through `tack_core` traits, keep their state in plain Rust
//! types and hand the host a render description.
//!
//! ## Example
//!
//! ```ignore
//! use tack_cn::prelude::*;
//!
//! let host = Host::new(1280.0, 800.0);
//! let ctx = Context::root().provide(ComponentConfig::load("tack.toml")?);
//!
//! // Pin a toolbar 10px below the top of the window
//! let toolbar = cn::affix()
//!     .offset_top(10.0)
//!     .build(&host, &ctx, AffixNodes::new(placeholder, toolbar_node));
//! toolbar.mount();
//!
//! // Inline navigation
//! let nav = cn::menu()
//!     .mode(MenuMode::Inline)
//!     .default_open_keys(["docs"])
//!     .build(&host, &ctx);
//! ```
//!
//! ## Components
//!
//! - **Affix** - Pins an element while its scroll target scrolls
//! - **Menu** - Open and selected key state, inline collapsing
//! - **Checkbox** - Boolean input, standalone or in a `CheckboxGroup`

pub mod class_names;
pub mod components;
pub mod config;
pub mod error;

pub use components::*;
pub use config::{ComponentConfig, PrefixConfig, Theme};
pub use error::{Result, TackError};

/// Convenience module for accessing components with `cn::` prefix
pub mod cn {
    pub use crate::components::affix::affix;
    pub use crate::components::checkbox::{checkbox, checkbox_group};
    pub use crate::components::menu::menu;
}

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::cn;
    pub use crate::components::affix::{Affix, AffixNodes, AffixStyle, Anchor};
    pub use crate::components::checkbox::{Checkbox, CheckboxChange, CheckboxGroup};
    pub use crate::components::menu::{ItemClick, Menu, MenuMode, SelectInfo, SiderCollapsed};
    pub use crate::config::{ComponentConfig, Theme};
    pub use crate::error::{Result, TackError};
    // Re-export the runtime types every host needs
    pub use tack_core::{Context, Host, Rect, ScrollTarget, TargetResolver};
}
