//! Live Region Announcer
//!
//! Every message gets its own transient status node. Nodes are never reused
//! or queued: each one is appended, read by assistive technology, and removed
//! by its own timer.

use std::collections::VecDeque;

use ariadne_dom::{Document, NodeId};
use serde::{Deserialize, Serialize};

use crate::scheduler::{Scheduler, Task, TimerHandle};
use crate::Politeness;

/// Visually hidden but still exposed to screen readers
pub const SR_ONLY_STYLE: &str = "position: absolute; width: 1px; height: 1px; padding: 0; \
     margin: -1px; overflow: hidden; clip: rect(0, 0, 0, 0); white-space: nowrap; border-width: 0";

const FEEDBACK_STYLE: &str = "margin-top: 10px; color: #0056b3";

/// Announcer timing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnouncerConfig {
    /// Lifetime of routine screen-reader messages
    pub routine_ttl_ms: u64,
    /// Lifetime of visible action feedback
    pub feedback_ttl_ms: u64,
    /// Past announcements kept for inspection
    pub history_limit: usize,
}

impl Default for AnnouncerConfig {
    fn default() -> Self {
        Self {
            routine_ttl_ms: 1000,
            feedback_ttl_ms: 3000,
            history_limit: 100,
        }
    }
}

/// A message handed to assistive technology
#[derive(Debug, Clone, PartialEq)]
pub struct Announcement {
    pub text: String,
    pub politeness: Politeness,
    /// Virtual time of creation
    pub created_at_ms: u64,
    /// Status node carrying the text
    pub node: NodeId,
    /// Element the node was appended to
    pub parent: NodeId,
    pub timer: TimerHandle,
}

/// Live region announcer
#[derive(Debug, Default)]
pub struct LiveAnnouncer {
    config: AnnouncerConfig,
    live: Vec<Announcement>,
    history: VecDeque<Announcement>,
}

impl LiveAnnouncer {
    pub fn new(config: AnnouncerConfig) -> Self {
        Self {
            config,
            live: Vec::new(),
            history: VecDeque::new(),
        }
    }

    pub fn config(&self) -> &AnnouncerConfig {
        &self.config
    }

    /// Announce with the routine lifetime
    pub fn announce(
        &mut self,
        doc: &mut Document,
        scheduler: &mut Scheduler,
        text: &str,
        politeness: Politeness,
    ) -> NodeId {
        let ttl = self.config.routine_ttl_ms;
        self.announce_for(doc, scheduler, text, politeness, ttl)
    }

    /// Append a screen-reader-only status node to the body, removed after `ttl_ms`
    pub fn announce_for(
        &mut self,
        doc: &mut Document,
        scheduler: &mut Scheduler,
        text: &str,
        politeness: Politeness,
        ttl_ms: u64,
    ) -> NodeId {
        let body = doc.body();
        let node = status_node(doc, text, politeness);
        doc.tree.set_attr(node, "class", "sr-only");
        doc.tree.set_attr(node, "style", SR_ONLY_STYLE);
        self.attach(doc, scheduler, body, node, text, politeness, ttl_ms)
    }

    /// Append a visible status message to `container`, removed after `ttl_ms`.
    /// `class` replaces the default inline feedback styling.
    pub fn announce_into(
        &mut self,
        doc: &mut Document,
        scheduler: &mut Scheduler,
        container: NodeId,
        text: &str,
        class: Option<&str>,
        ttl_ms: u64,
    ) -> NodeId {
        let node = status_node(doc, text, Politeness::Polite);
        match class {
            Some(class) => doc.tree.set_attr(node, "class", class),
            None => doc.tree.set_attr(node, "style", FEEDBACK_STYLE),
        }
        self.attach(doc, scheduler, container, node, text, Politeness::Polite, ttl_ms)
    }

    #[allow(clippy::too_many_arguments)]
    fn attach(
        &mut self,
        doc: &mut Document,
        scheduler: &mut Scheduler,
        parent: NodeId,
        node: NodeId,
        text: &str,
        politeness: Politeness,
        ttl_ms: u64,
    ) -> NodeId {
        if let Err(err) = doc.tree.append_child(parent, node) {
            tracing::warn!("announcement {text:?} not attached: {err}");
        }
        let timer = scheduler.schedule(ttl_ms, Task::Expire(node));
        let announcement = Announcement {
            text: text.to_string(),
            politeness,
            created_at_ms: scheduler.now_ms(),
            node,
            parent,
            timer,
        };
        tracing::debug!("announce ({}): {text}", politeness.as_str());

        if self.config.history_limit > 0 {
            while self.history.len() >= self.config.history_limit {
                self.history.pop_front();
            }
            self.history.push_back(announcement.clone());
        }
        self.live.push(announcement);
        node
    }

    /// Timer callback: remove the node if it is still where it was put
    pub fn expire(&mut self, doc: &mut Document, node: NodeId) -> bool {
        let Some(pos) = self.live.iter().position(|a| a.node == node) else {
            return false;
        };
        let announcement = self.live.remove(pos);
        if doc.tree.parent(node) == Some(announcement.parent) {
            doc.remove(node);
            true
        } else {
            false
        }
    }

    /// Remove a message early, cancelling its timer
    pub fn withdraw(&mut self, doc: &mut Document, scheduler: &mut Scheduler, node: NodeId) -> bool {
        let Some(pos) = self.live.iter().position(|a| a.node == node) else {
            return false;
        };
        let announcement = self.live.remove(pos);
        scheduler.cancel(announcement.timer);
        doc.remove(node)
    }

    /// Cancel every outstanding timer and detach every live node
    pub fn teardown(&mut self, doc: &mut Document, scheduler: &mut Scheduler) {
        for announcement in self.live.drain(..) {
            scheduler.cancel(announcement.timer);
            doc.remove(announcement.node);
        }
    }

    /// Texts of status nodes still attached to the document
    pub fn live_messages<'a>(&'a self, doc: &'a Document) -> impl Iterator<Item = &'a str> + 'a {
        self.live
            .iter()
            .filter(|a| doc.tree.is_attached(a.node))
            .map(|a| a.text.as_str())
    }

    /// Live announcements, attached or not yet expired
    pub fn live(&self) -> &[Announcement] {
        &self.live
    }

    /// Past announcements, oldest first
    pub fn history(&self) -> impl Iterator<Item = &Announcement> {
        self.history.iter()
    }

    /// Most recent announcement
    pub fn last(&self) -> Option<&Announcement> {
        self.history.back()
    }
}

fn status_node(doc: &mut Document, text: &str, politeness: Politeness) -> NodeId {
    let node = doc.tree.create_element("div");
    doc.tree.set_attr(node, "role", "status");
    doc.tree.set_attr(node, "aria-live", politeness.as_str());
    doc.tree.set_text_content(node, text);
    node
}
