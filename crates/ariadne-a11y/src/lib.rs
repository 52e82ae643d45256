//! Ariadne Accessibility
//!
//! Interaction primitives shared by the widget controllers.
//!
//! Features:
//! - Live region announcer with virtual-time expiry
//! - Modal focus trap
//! - Roving tabindex
//! - Tree navigation with visibility tracking
//! - Floating element placement

pub mod announcer;
pub mod aria;
mod cx;
pub mod focus_trap;
pub mod positioning;
pub mod roving;
pub mod scheduler;
pub mod tree_nav;

pub use announcer::{Announcement, AnnouncerConfig, LiveAnnouncer};
pub use aria::{AriaRole, AriaState, Politeness};
pub use cx::InteractionCx;
pub use focus_trap::{FocusTrap, ModalSession, TrapKey};
pub use positioning::{position_floating, resolve_placement, Placement, PlacementConfig};
pub use roving::{transfer_tab_stop, Edge, RovingTabindex};
pub use scheduler::{Scheduler, Task, TimerHandle};
pub use tree_nav::{TreeItemId, TreeModel, TreeNavigator, TreeNode, VisibleItems};

use ariadne_dom::NodeId;

/// Accessibility error
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum A11yError {
    #[error("cannot open modal {requested}: modal {open} is already open")]
    ModalAlreadyOpen { open: NodeId, requested: NodeId },

    #[error("cannot close {requested}: the open modal is {open}")]
    SurfaceMismatch { open: NodeId, requested: NodeId },
}
