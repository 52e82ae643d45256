//! Focus Trap
//!
//! Modal focus confinement. At most one [`ModalSession`] exists at a time;
//! it is created by [`FocusTrap::open`] and dropped by [`FocusTrap::close`].

use ariadne_dom::{Key, KeyEvent, NodeId};

use crate::{A11yError, AriaRole, AriaState, InteractionCx, Politeness};

/// State of an open modal
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModalSession {
    /// Element shown as the modal surface
    pub surface: NodeId,
    /// Focus to restore on close (the body when nothing was focused)
    pub previously_focused: NodeId,
    /// Tabbable descendants at open time, in document order
    pub focusables: Vec<NodeId>,
}

impl ModalSession {
    pub fn first(&self) -> Option<NodeId> {
        self.focusables.first().copied()
    }

    pub fn last(&self) -> Option<NodeId> {
        self.focusables.last().copied()
    }
}

/// Outcome of a key press offered to the trap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrapKey {
    /// No modal open
    Inactive,
    /// Escape closed the surface
    Closed(NodeId),
    /// Tab wrapped around to this element
    Wrapped(NodeId),
    /// Tab consumed without moving focus; the surface has nothing to focus
    Held,
    /// Not the trap's business; default handling applies
    PassThrough,
}

/// Focus trap manager
#[derive(Debug, Default)]
pub struct FocusTrap {
    session: Option<ModalSession>,
}

impl FocusTrap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&ModalSession> {
        self.session.as_ref()
    }

    /// Open `surface` as a modal, focusing `initial` or, when that element
    /// refuses focus, the first tabbable element
    pub fn open(
        &mut self,
        cx: &mut InteractionCx<'_>,
        surface: NodeId,
        initial: Option<NodeId>,
    ) -> Result<&ModalSession, A11yError> {
        if let Some(active) = &self.session {
            tracing::warn!("modal {surface} rejected, {} is open", active.surface);
            return Err(A11yError::ModalAlreadyOpen {
                open: active.surface,
                requested: surface,
            });
        }

        let previously_focused = cx.active_element();
        AriaState::Hidden(false).apply(&mut cx.doc.tree, surface);
        let focusables = cx.doc.tabbable_descendants(surface);

        let initial_taken = initial.is_some_and(|node| cx.focus(node));
        if !initial_taken {
            if let Some(&first) = focusables.first() {
                cx.focus(first);
            }
        }
        cx.doc.lock_scroll();

        let message = open_message(cx, surface);
        cx.announce(&message, Politeness::Assertive);
        tracing::debug!("modal {surface} open, {} focusables", focusables.len());

        Ok(self.session.insert(ModalSession {
            surface,
            previously_focused,
            focusables,
        }))
    }

    /// Offer a key press to the open session
    pub fn handle_key(&mut self, cx: &mut InteractionCx<'_>, event: &KeyEvent) -> TrapKey {
        let Some(session) = &self.session else {
            return TrapKey::Inactive;
        };
        match event.key {
            Key::Escape => {
                let surface = session.surface;
                self.finish(cx);
                TrapKey::Closed(surface)
            }
            Key::Tab if !(event.ctrl || event.alt || event.meta) => {
                let (Some(first), Some(last)) = (session.first(), session.last()) else {
                    return TrapKey::Held;
                };
                let active = cx.active_element();
                let target = if !cx.doc.tree.contains(session.surface, active) {
                    if event.shift { last } else { first }
                } else if event.shift && active == first {
                    last
                } else if !event.shift && active == last {
                    first
                } else {
                    return TrapKey::PassThrough;
                };
                cx.focus(target);
                TrapKey::Wrapped(target)
            }
            _ => TrapKey::PassThrough,
        }
    }

    /// Close `surface`. Closing with nothing open is a no-op (`Ok(false)`).
    pub fn close(&mut self, cx: &mut InteractionCx<'_>, surface: NodeId) -> Result<bool, A11yError> {
        match &self.session {
            None => Ok(false),
            Some(session) if session.surface != surface => Err(A11yError::SurfaceMismatch {
                open: session.surface,
                requested: surface,
            }),
            Some(_) => {
                self.finish(cx);
                Ok(true)
            }
        }
    }

    fn finish(&mut self, cx: &mut InteractionCx<'_>) {
        let Some(session) = self.session.take() else { return };
        AriaState::Hidden(true).apply(&mut cx.doc.tree, session.surface);
        cx.doc.unlock_scroll();
        if cx.doc.tree.is_attached(session.previously_focused) {
            cx.focus(session.previously_focused);
        } else {
            cx.doc.blur();
        }
        tracing::debug!("modal {} closed", session.surface);
    }
}

fn open_message(cx: &InteractionCx<'_>, surface: NodeId) -> String {
    let tree = &cx.doc.tree;
    let is_alert = std::iter::once(surface)
        .chain(tree.query_selector(surface, "[role=dialog], [role=alertdialog]"))
        .find_map(|n| AriaRole::of(tree, n).filter(AriaRole::is_dialog))
        == Some(AriaRole::AlertDialog);
    let prefix = if is_alert { "Alert" } else { "Dialog" };

    match tree.query_selector(surface, "[id$=title]") {
        Some(title) => {
            let title = tree.text_content(title);
            format!("{prefix}: {}. Press Escape to close.", title.trim())
        }
        None => {
            tracing::warn!("modal {surface} has no title element");
            format!("{prefix}. Press Escape to close.")
        }
    }
}

#[cfg(test)]
mod tests {
    use ariadne_dom::Document;

    use super::*;
    use crate::{AnnouncerConfig, LiveAnnouncer, Scheduler};

    struct Page {
        doc: Document,
        scheduler: Scheduler,
        announcer: LiveAnnouncer,
        trigger: NodeId,
        overlay: NodeId,
        buttons: Vec<NodeId>,
    }

    impl Page {
        fn new(focusables: usize, role: &str) -> Self {
            let mut doc = Document::new();
            let body = doc.body();
            let trigger = doc.tree.create_element("button");
            doc.tree.append_child(body, trigger).unwrap();

            let overlay = doc.tree.create_element("div");
            doc.tree.set_attr(overlay, "aria-hidden", "true");
            doc.tree.append_child(body, overlay).unwrap();
            let dialog = doc.tree.create_element("div");
            doc.tree.set_attr(dialog, "role", role);
            doc.tree.append_child(overlay, dialog).unwrap();
            let title = doc.tree.create_element("h2");
            doc.tree.set_attr(title, "id", "confirm-title");
            doc.tree.set_text_content(title, "Delete item");
            doc.tree.append_child(dialog, title).unwrap();

            let buttons = (0..focusables)
                .map(|_| {
                    let b = doc.tree.create_element("button");
                    doc.tree.append_child(dialog, b).unwrap();
                    b
                })
                .collect();

            Self {
                doc,
                scheduler: Scheduler::new(),
                announcer: LiveAnnouncer::new(AnnouncerConfig::default()),
                trigger,
                overlay,
                buttons,
            }
        }

        fn cx(&mut self) -> InteractionCx<'_> {
            InteractionCx::new(&mut self.doc, &mut self.scheduler, &mut self.announcer)
        }
    }

    #[test]
    fn test_open_focuses_first_and_announces() {
        let mut page = Page::new(3, "alertdialog");
        let mut trap = FocusTrap::new();
        let overlay = page.overlay;
        trap.open(&mut page.cx(), overlay, None).unwrap();

        assert_eq!(page.doc.active_element(), page.buttons[0]);
        assert_eq!(page.doc.tree.attr(overlay, "aria-hidden"), Some("false"));
        assert!(page.doc.is_scroll_locked());
        let last = page.announcer.last().unwrap();
        assert_eq!(last.text, "Alert: Delete item. Press Escape to close.");
        assert_eq!(last.politeness, Politeness::Assertive);
    }

    #[test]
    fn test_tab_wraps_both_ways() {
        let mut page = Page::new(3, "dialog");
        let mut trap = FocusTrap::new();
        let overlay = page.overlay;
        trap.open(&mut page.cx(), overlay, None).unwrap();

        let shift_tab = KeyEvent::new(Key::Tab).shift();
        let wrapped = trap.handle_key(&mut page.cx(), &shift_tab);
        assert_eq!(wrapped, TrapKey::Wrapped(page.buttons[2]));

        let tab = KeyEvent::new(Key::Tab);
        assert_eq!(trap.handle_key(&mut page.cx(), &tab), TrapKey::Wrapped(page.buttons[0]));
        assert_eq!(trap.handle_key(&mut page.cx(), &tab), TrapKey::PassThrough);
    }

    #[test]
    fn test_escape_restores_focus() {
        let mut page = Page::new(2, "dialog");
        let mut trap = FocusTrap::new();
        let (overlay, trigger) = (page.overlay, page.trigger);
        page.doc.focus(trigger);
        trap.open(&mut page.cx(), overlay, None).unwrap();

        let closed = trap.handle_key(&mut page.cx(), &KeyEvent::new(Key::Escape));
        assert_eq!(closed, TrapKey::Closed(overlay));
        assert_eq!(page.doc.active_element(), trigger);
        assert_eq!(page.doc.tree.attr(overlay, "aria-hidden"), Some("true"));
        assert!(!page.doc.is_scroll_locked());
        assert!(!trap.is_open());
    }

    #[test]
    fn test_zero_focusables() {
        let mut page = Page::new(0, "dialog");
        let mut trap = FocusTrap::new();
        let overlay = page.overlay;
        trap.open(&mut page.cx(), overlay, None).unwrap();
        assert_eq!(page.doc.active_element(), page.doc.body());
        let tab = KeyEvent::new(Key::Tab);
        assert_eq!(trap.handle_key(&mut page.cx(), &tab), TrapKey::Held);
        let shift_tab = KeyEvent::new(Key::Tab).shift();
        assert_eq!(trap.handle_key(&mut page.cx(), &shift_tab), TrapKey::Held);
        assert_eq!(page.doc.active_element(), page.doc.body());
    }

    #[test]
    fn test_unfocusable_initial_falls_back_to_first() {
        let mut page = Page::new(2, "dialog");
        let mut trap = FocusTrap::new();
        let (overlay, trigger) = (page.overlay, page.trigger);
        let note = page.doc.tree.create_element("p");
        page.doc.tree.append_child(overlay, note).unwrap();
        page.doc.focus(trigger);

        trap.open(&mut page.cx(), overlay, Some(note)).unwrap();
        assert_eq!(page.doc.active_element(), page.buttons[0]);
    }

    #[test]
    fn test_tab_from_outside_surface_enters_it() {
        let mut page = Page::new(3, "dialog");
        let mut trap = FocusTrap::new();
        let (overlay, trigger) = (page.overlay, page.trigger);
        trap.open(&mut page.cx(), overlay, None).unwrap();

        page.doc.focus(trigger);
        let tab = KeyEvent::new(Key::Tab);
        assert_eq!(trap.handle_key(&mut page.cx(), &tab), TrapKey::Wrapped(page.buttons[0]));
        page.doc.focus(trigger);
        let shift_tab = KeyEvent::new(Key::Tab).shift();
        assert_eq!(trap.handle_key(&mut page.cx(), &shift_tab), TrapKey::Wrapped(page.buttons[2]));
    }

    #[test]
    fn test_second_open_and_wrong_close_rejected() {
        let mut page = Page::new(1, "dialog");
        let mut trap = FocusTrap::new();
        let (overlay, trigger) = (page.overlay, page.trigger);
        trap.open(&mut page.cx(), overlay, None).unwrap();

        let err = trap.open(&mut page.cx(), trigger, None).unwrap_err();
        assert_eq!(err, A11yError::ModalAlreadyOpen { open: overlay, requested: trigger });
        assert!(matches!(
            trap.close(&mut page.cx(), trigger),
            Err(A11yError::SurfaceMismatch { .. })
        ));
        assert_eq!(trap.session().unwrap().surface, overlay);

        assert_eq!(trap.close(&mut page.cx(), overlay), Ok(true));
        assert_eq!(trap.close(&mut page.cx(), overlay), Ok(false));
    }
}
