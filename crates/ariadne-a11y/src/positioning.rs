//! Positioning Resolver
//!
//! Chooses where a floating element (tooltip) sits relative to its anchor so
//! that it stays inside the viewport. Top is the default; the other
//! placements are expressed as classes on the floating element.

use ariadne_dom::{DOMRect, Document, NodeId, Viewport};
use serde::{Deserialize, Serialize};

/// Placement tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    /// Clearance required between the floating element and the viewport edge
    pub margin: f64,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self { margin: 10.0 }
    }
}

/// Side of the anchor the floating element sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    Top,
    Bottom,
    Left,
    Right,
}

impl Placement {
    /// Class applied to the floating element; top needs none
    pub fn class_name(&self) -> Option<&'static str> {
        match self {
            Self::Top => None,
            Self::Bottom => Some("position-bottom"),
            Self::Left => Some("position-left"),
            Self::Right => Some("position-right"),
        }
    }

    pub const CLASSES: [&'static str; 3] = ["position-bottom", "position-left", "position-right"];
}

/// Resolve a placement.
///
/// `measure` returns the floating element's box with the given placement
/// applied; it is called again after a switch because the size may change
/// with the placement. `None` means nothing fits.
pub fn resolve_placement(
    anchor: DOMRect,
    viewport: Viewport,
    config: &PlacementConfig,
    mut measure: impl FnMut(Placement) -> DOMRect,
) -> Option<Placement> {
    let margin = config.margin;
    let floating = measure(Placement::Top);
    if anchor.top() >= floating.height + margin {
        return Some(Placement::Top);
    }

    let floating = measure(Placement::Bottom);
    if anchor.bottom() + floating.height + margin <= viewport.height {
        return Some(Placement::Bottom);
    }

    if anchor.left() >= floating.width + margin {
        Some(Placement::Left)
    } else if viewport.width - anchor.right() >= floating.width + margin {
        Some(Placement::Right)
    } else {
        None
    }
}

/// Drop every placement class from `floating`
pub fn clear_placement(doc: &mut Document, floating: NodeId) {
    for class in Placement::CLASSES {
        doc.tree.remove_class(floating, class);
    }
}

fn apply_placement(doc: &mut Document, floating: NodeId, placement: Option<Placement>) {
    clear_placement(doc, floating);
    if let Some(class) = placement.and_then(|p| p.class_name()) {
        doc.tree.add_class(floating, class);
    }
}

/// Resolve and apply the placement of `floating` next to `anchor` using the
/// document's layout and viewport
pub fn position_floating(
    doc: &mut Document,
    anchor: NodeId,
    floating: NodeId,
    config: &PlacementConfig,
) -> Option<Placement> {
    let anchor_rect = doc.bounding_client_rect(anchor);
    let viewport = doc.viewport();
    let placement = resolve_placement(anchor_rect, viewport, config, |candidate| {
        apply_placement(doc, floating, Some(candidate));
        doc.bounding_client_rect(floating)
    });
    apply_placement(doc, floating, placement);
    tracing::debug!("floating {floating} placed {placement:?}");
    placement
}
