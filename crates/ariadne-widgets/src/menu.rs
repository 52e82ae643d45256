//! Navigation menus
//!
//! [`NavMenu`] drives the desktop menu bar: one expanded submenu at a time,
//! focus moves into a freshly opened submenu after a short delay.
//! [`MobileMenu`] drives the collapsible mobile navigation with its
//! click-away overlay.

use ariadne_a11y::aria::is_expanded;
use ariadne_a11y::{AriaState, Edge, Politeness, RovingTabindex, Task, TimerHandle};
use ariadne_dom::{Document, Key, NodeId};

use crate::config::MenuConfig;
use crate::controller::{Controller, Dispatch, DocumentEvent, WidgetCx, WidgetEvent};
use crate::dom::{referenced, set_shown};
use crate::error::RuntimeResult;

const OPEN_CLASS: &str = "show";
const OVERLAY_STYLE: &str = "position: fixed; top: 0; left: 0; right: 0; bottom: 0; \
     background: rgba(0, 0, 0, 0.5); z-index: 999";

#[derive(Debug, Clone)]
struct Submenu {
    button: NodeId,
    menu: NodeId,
    links: RovingTabindex,
}

/// Desktop menu bar
#[derive(Debug, Clone)]
pub struct NavMenu {
    submenus: Vec<Submenu>,
    focus_delay_ms: u64,
    pending_focus: Option<TimerHandle>,
}

impl NavMenu {
    pub fn mount(doc: &mut Document, config: &MenuConfig) -> Option<Self> {
        let buttons = doc
            .tree
            .query_selector_all(doc.tree.root(), ".nav-menu-button[aria-controls]");
        let submenus: Vec<Submenu> = buttons
            .into_iter()
            .filter_map(|button| {
                let Some(menu) = referenced(doc, button, "aria-controls") else {
                    tracing::warn!("menu button {button} controls a missing submenu");
                    return None;
                };
                let mut links = RovingTabindex::new(doc.tree.query_selector_all(menu, "a"), Edge::Wrap);
                links.init(doc, 0);
                let open = doc.tree.has_class(menu, OPEN_CLASS);
                AriaState::Expanded(open).apply(&mut doc.tree, button);
                set_shown(doc, menu, OPEN_CLASS, open);
                Some(Submenu { button, menu, links })
            })
            .collect();

        (!submenus.is_empty()).then(|| Self {
            submenus,
            focus_delay_ms: config.focus_delay_ms,
            pending_focus: None,
        })
    }

    /// Index of the expanded submenu
    pub fn open_index(&self, doc: &Document) -> Option<usize> {
        self.submenus.iter().position(|s| is_expanded(&doc.tree, s.button))
    }

    fn set_open(&mut self, cx: &mut WidgetCx<'_>, index: usize, open: bool) {
        let Some(submenu) = self.submenus.get(index) else { return };
        AriaState::Expanded(open).apply(&mut cx.doc.tree, submenu.button);
        set_shown(cx.doc, submenu.menu, OPEN_CLASS, open);
    }

    fn cancel_pending(&mut self, cx: &mut WidgetCx<'_>) {
        if let Some(handle) = self.pending_focus.take() {
            cx.scheduler.cancel(handle);
        }
    }

    /// Toggle submenu `index`, closing every other one
    pub fn toggle(&mut self, cx: &mut WidgetCx<'_>, index: usize) {
        let Some(submenu) = self.submenus.get(index) else { return };
        let opening = !is_expanded(&cx.doc.tree, submenu.button);
        for other in 0..self.submenus.len() {
            if other != index {
                self.set_open(cx, other, false);
            }
        }
        self.set_open(cx, index, opening);
        self.cancel_pending(cx);

        if opening {
            let links = &mut self.submenus[index].links;
            links.adopt(cx.doc, 0);
            if let Some(first) = links.active_node() {
                let handle = cx.scheduler.schedule(self.focus_delay_ms, Task::Focus(first));
                self.pending_focus = Some(handle);
            }
        }
        tracing::debug!("submenu {index} {}", if opening { "opened" } else { "closed" });
    }

    /// Close submenu `index` and return focus to its button
    pub fn dismiss(&mut self, cx: &mut WidgetCx<'_>, index: usize) {
        self.set_open(cx, index, false);
        self.cancel_pending(cx);
        if let Some(submenu) = self.submenus.get(index) {
            cx.focus(submenu.button);
        }
    }

    pub fn close_all(&mut self, cx: &mut WidgetCx<'_>) {
        for index in 0..self.submenus.len() {
            self.set_open(cx, index, false);
        }
        self.cancel_pending(cx);
    }

    fn button_of(&self, doc: &Document, target: NodeId) -> Option<usize> {
        self.submenus
            .iter()
            .position(|s| doc.tree.contains(s.button, target))
    }

    fn submenu_of(&self, doc: &Document, target: NodeId) -> Option<usize> {
        self.submenus
            .iter()
            .position(|s| doc.tree.contains(s.menu, target))
    }
}

impl Controller for NavMenu {
    fn owns(&self, doc: &Document, target: NodeId) -> bool {
        self.button_of(doc, target).is_some() || self.submenu_of(doc, target).is_some()
    }

    fn on_event(
        &mut self,
        cx: &mut WidgetCx<'_>,
        target: NodeId,
        event: WidgetEvent<'_>,
    ) -> RuntimeResult<Dispatch> {
        if let (WidgetEvent::Click, Some(index)) = (event, self.button_of(cx.doc, target)) {
            self.toggle(cx, index);
            return Ok(Dispatch::Handled);
        }

        let (WidgetEvent::KeyDown(event), Some(index)) = (event, self.submenu_of(cx.doc, target)) else {
            return Ok(Dispatch::Ignored);
        };
        let links = &mut self.submenus[index].links;
        links.sync_with_focus(cx.doc);
        match event.key {
            Key::ArrowDown => {
                links.next(cx.doc);
            }
            Key::ArrowUp => {
                links.previous(cx.doc);
            }
            Key::Escape => self.dismiss(cx, index),
            _ => return Ok(Dispatch::Ignored),
        }
        Ok(Dispatch::Handled)
    }

    fn on_document(&mut self, cx: &mut WidgetCx<'_>, event: DocumentEvent<'_>) -> Dispatch {
        match event {
            DocumentEvent::KeyDown(key) if key.key == Key::Escape => match self.open_index(cx.doc) {
                Some(index) => {
                    self.dismiss(cx, index);
                    Dispatch::Handled
                }
                None => Dispatch::Ignored,
            },
            DocumentEvent::Click(target) => {
                if self.open_index(cx.doc).is_some() && cx.doc.tree.closest(target, ".nav-item").is_none() {
                    self.close_all(cx);
                }
                Dispatch::Ignored
            }
            _ => Dispatch::Ignored,
        }
    }
}

/// Mobile navigation drawer
#[derive(Debug, Clone)]
pub struct MobileMenu {
    toggle: NodeId,
    menu: NodeId,
    overlay: Option<NodeId>,
    submenu_toggles: Vec<(NodeId, NodeId)>,
}

impl MobileMenu {
    pub fn mount(doc: &mut Document) -> Option<Self> {
        let toggle = doc.tree.query_selector(doc.tree.root(), ".mobile-menu-toggle")?;
        let menu = referenced(doc, toggle, "aria-controls")
            .or_else(|| doc.tree.get_element_by_id("mobile-menu"));
        let Some(menu) = menu else {
            tracing::warn!("mobile menu toggle {toggle} has no menu");
            return None;
        };
        let submenu_toggles = doc
            .tree
            .query_selector_all(menu, ".mobile-submenu-toggle[aria-controls]")
            .into_iter()
            .filter_map(|t| Some((t, referenced(doc, t, "aria-controls")?)))
            .collect::<Vec<_>>();

        AriaState::Expanded(false).apply(&mut doc.tree, toggle);
        set_shown(doc, menu, OPEN_CLASS, false);
        for &(t, submenu) in &submenu_toggles {
            let open = is_expanded(&doc.tree, t);
            AriaState::Expanded(open).apply(&mut doc.tree, t);
            set_shown(doc, submenu, OPEN_CLASS, open);
        }
        Some(Self { toggle, menu, overlay: None, submenu_toggles })
    }

    pub fn is_open(&self, doc: &Document) -> bool {
        is_expanded(&doc.tree, self.toggle)
    }

    pub fn overlay(&self) -> Option<NodeId> {
        self.overlay
    }

    pub fn open(&mut self, cx: &mut WidgetCx<'_>) {
        AriaState::Expanded(true).apply(&mut cx.doc.tree, self.toggle);
        set_shown(cx.doc, self.menu, OPEN_CLASS, true);

        if self.overlay.is_none() {
            let overlay = cx.doc.tree.create_element("div");
            cx.doc.tree.set_attr(overlay, "class", "mobile-menu-overlay");
            cx.doc.tree.set_attr(overlay, "style", OVERLAY_STYLE);
            let body = cx.doc.body();
            if let Err(err) = cx.doc.tree.append_child(body, overlay) {
                tracing::warn!("mobile menu overlay not attached: {err}");
            }
            self.overlay = Some(overlay);
            cx.doc.lock_scroll();
        }
        cx.announce("Menu opened", Politeness::Polite);
    }

    pub fn close(&mut self, cx: &mut WidgetCx<'_>, announce: bool) {
        AriaState::Expanded(false).apply(&mut cx.doc.tree, self.toggle);
        set_shown(cx.doc, self.menu, OPEN_CLASS, false);
        if let Some(overlay) = self.overlay.take() {
            cx.doc.remove(overlay);
            cx.doc.unlock_scroll();
        }
        if announce {
            cx.announce("Menu closed", Politeness::Polite);
        }
    }
}

impl Controller for MobileMenu {
    fn owns(&self, doc: &Document, target: NodeId) -> bool {
        doc.tree.contains(self.toggle, target)
            || self.overlay == Some(target)
            || self.submenu_toggles.iter().any(|&(t, _)| doc.tree.contains(t, target))
    }

    fn on_event(
        &mut self,
        cx: &mut WidgetCx<'_>,
        target: NodeId,
        event: WidgetEvent<'_>,
    ) -> RuntimeResult<Dispatch> {
        let WidgetEvent::Click = event else {
            return Ok(Dispatch::Ignored);
        };

        if cx.doc.tree.contains(self.toggle, target) {
            if self.is_open(cx.doc) {
                self.close(cx, true);
            } else {
                self.open(cx);
            }
            return Ok(Dispatch::Handled);
        }
        if self.overlay == Some(target) {
            self.close(cx, false);
            return Ok(Dispatch::Handled);
        }

        let toggled = self
            .submenu_toggles
            .iter()
            .copied()
            .find(|&(t, _)| cx.doc.tree.contains(t, target));
        let Some((toggle, submenu)) = toggled else {
            return Ok(Dispatch::Ignored);
        };
        let expanded = !is_expanded(&cx.doc.tree, toggle);
        AriaState::Expanded(expanded).apply(&mut cx.doc.tree, toggle);
        set_shown(cx.doc, submenu, OPEN_CLASS, expanded);
        let state = if expanded { "expanded" } else { "collapsed" };
        cx.announce(&format!("Submenu {state}"), Politeness::Polite);
        Ok(Dispatch::Handled)
    }
}
