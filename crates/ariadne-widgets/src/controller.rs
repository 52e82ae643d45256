//! Controller plumbing
//!
//! Every widget controller implements [`Controller`]. The runtime offers an
//! event first to the controllers that own the target, then to every
//! controller as a document-level event (outside clicks, global Escape,
//! focus changes, resize).

use std::ops::{Deref, DerefMut};

use ariadne_a11y::{A11yError, FocusTrap, InteractionCx, LiveAnnouncer, Scheduler, TrapKey};
use ariadne_dom::{Document, KeyEvent, NodeId};

use crate::error::RuntimeResult;

/// Whether an event was consumed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    Handled,
    Ignored,
}

impl Dispatch {
    pub fn is_handled(self) -> bool {
        self == Self::Handled
    }

    pub(crate) fn from_handled(handled: bool) -> Self {
        if handled { Self::Handled } else { Self::Ignored }
    }
}

/// Event delivered to the controller owning the target
#[derive(Debug, Clone, Copy)]
pub enum WidgetEvent<'e> {
    KeyDown(&'e KeyEvent),
    Click,
    /// The target's `value` attribute already holds the new value
    Input,
    Change,
}

/// Event observed by every controller
#[derive(Debug, Clone, Copy)]
pub enum DocumentEvent<'e> {
    /// Key press nobody owning the target consumed
    KeyDown(&'e KeyEvent),
    Click(NodeId),
    FocusChanged { from: NodeId, to: NodeId },
    Resize,
}

/// Mutable state available while handling one event
pub struct WidgetCx<'a> {
    cx: InteractionCx<'a>,
    trap: &'a mut FocusTrap,
}

impl<'a> WidgetCx<'a> {
    pub fn new(
        doc: &'a mut Document,
        scheduler: &'a mut Scheduler,
        announcer: &'a mut LiveAnnouncer,
        trap: &'a mut FocusTrap,
    ) -> Self {
        Self {
            cx: InteractionCx::new(doc, scheduler, announcer),
            trap,
        }
    }

    pub fn open_modal(&mut self, surface: NodeId, initial: Option<NodeId>) -> Result<(), A11yError> {
        self.trap.open(&mut self.cx, surface, initial).map(|_| ())
    }

    pub fn close_modal(&mut self, surface: NodeId) -> Result<bool, A11yError> {
        self.trap.close(&mut self.cx, surface)
    }

    /// Offer a key press to the open modal, if any
    pub fn trap_key(&mut self, event: &KeyEvent) -> TrapKey {
        self.trap.handle_key(&mut self.cx, event)
    }

    pub fn modal_surface(&self) -> Option<NodeId> {
        self.trap.session().map(|s| s.surface)
    }
}

impl<'a> Deref for WidgetCx<'a> {
    type Target = InteractionCx<'a>;

    fn deref(&self) -> &Self::Target {
        &self.cx
    }
}

impl DerefMut for WidgetCx<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.cx
    }
}

/// Behaviour shared by all widget controllers
pub trait Controller {
    /// Whether `target` is one of this controller's elements
    fn owns(&self, doc: &Document, target: NodeId) -> bool;

    fn on_event(
        &mut self,
        _cx: &mut WidgetCx<'_>,
        _target: NodeId,
        _event: WidgetEvent<'_>,
    ) -> RuntimeResult<Dispatch> {
        Ok(Dispatch::Ignored)
    }

    fn on_document(&mut self, _cx: &mut WidgetCx<'_>, _event: DocumentEvent<'_>) -> Dispatch {
        Dispatch::Ignored
    }
}
