//! Components built on tack_core primitives
//!
//! Each component follows a consistent pattern:
//! - Builder function returning a config (e.g., `affix()`)
//! - `build(..)` on the config creates the component
//! - `render()` returns a plain description the host draws

pub mod affix;
pub mod checkbox;
pub mod menu;

pub use affix::{
    affix, Affix, AffixConfig, AffixNodes, AffixRender, AffixStyle, Anchor, OffsetMode,
    PlaceholderStyle,
};
pub use checkbox::{
    checkbox, checkbox_group, Checkbox, CheckboxChange, CheckboxConfig, CheckboxGroup,
    CheckboxGroupConfig, CheckboxRender,
};
pub use menu::{
    menu, AccordionMotion, InlineCollapsed, ItemClick, Menu, MenuConfig, MenuMachine, MenuMode,
    MenuMotion, MenuRender, SelectInfo, SiderCollapsed,
};
