//! Ariadne Widgets
//!
//! Accessible widget controllers wired to page markup, and the
//! [`InteractionRuntime`] that routes host input events to them.
//!
//! Widgets:
//! - Modal dialogs and alert dialogs
//! - Tabs, custom listbox, tree view
//! - Desktop and mobile navigation menus
//! - Filter and input chips, tooltips
//! - Sliders, progress bars, validated forms, disclosures
//! - Button and avatar action feedback

pub mod chips;
pub mod config;
pub mod controller;
pub mod dialog;
pub mod disclosure;
mod dom;
pub mod error;
pub mod feedback;
pub mod forms;
pub mod kind;
pub mod listbox;
pub mod menu;
pub mod range;
pub mod runtime;
pub mod tabs;
pub mod tooltip;
pub mod tree;

pub use config::{ConfigError, EngineConfig};
pub use controller::{Controller, Dispatch, DocumentEvent, WidgetCx, WidgetEvent};
pub use error::{RuntimeError, RuntimeResult};
pub use kind::{Widget, WidgetKind};
pub use runtime::InteractionRuntime;

/// Documentation page bundled with the demo binary
pub const DEMO_PAGE: &str = include_str!("../assets/demo.html");
