//! Interaction context
//!
//! Bundles the mutable state one dispatched event may touch. Widgets receive
//! it by `&mut` and never keep it, so everything they do happens before
//! control returns to the host.

use ariadne_dom::{Document, NodeId};

use crate::{LiveAnnouncer, Politeness, Scheduler};

pub struct InteractionCx<'a> {
    pub doc: &'a mut Document,
    pub scheduler: &'a mut Scheduler,
    pub announcer: &'a mut LiveAnnouncer,
}

impl<'a> InteractionCx<'a> {
    pub fn new(
        doc: &'a mut Document,
        scheduler: &'a mut Scheduler,
        announcer: &'a mut LiveAnnouncer,
    ) -> Self {
        Self { doc, scheduler, announcer }
    }

    /// Routine screen-reader announcement
    pub fn announce(&mut self, text: &str, politeness: Politeness) -> NodeId {
        self.announcer.announce(self.doc, self.scheduler, text, politeness)
    }

    /// Screen-reader announcement with an explicit lifetime
    pub fn announce_for(&mut self, text: &str, politeness: Politeness, ttl_ms: u64) -> NodeId {
        self.announcer
            .announce_for(self.doc, self.scheduler, text, politeness, ttl_ms)
    }

    /// Visible status message inside `container`
    pub fn announce_into(
        &mut self,
        container: NodeId,
        text: &str,
        class: Option<&str>,
        ttl_ms: u64,
    ) -> NodeId {
        self.announcer
            .announce_into(self.doc, self.scheduler, container, text, class, ttl_ms)
    }

    /// Remove a message early, cancelling its timer
    pub fn withdraw(&mut self, node: NodeId) -> bool {
        self.announcer.withdraw(self.doc, self.scheduler, node)
    }

    pub fn focus(&mut self, node: NodeId) -> bool {
        self.doc.focus(node)
    }

    pub fn active_element(&self) -> NodeId {
        self.doc.active_element()
    }
}
