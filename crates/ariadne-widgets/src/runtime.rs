//! Interaction Runtime
//!
//! Owns the document, the virtual clock, the announcer, the single focus
//! trap and every mounted widget. The host feeds it input events and
//! advances time; each call applies all of its effects before returning.

use ariadne_a11y::{FocusTrap, LiveAnnouncer, Scheduler, Task, TrapKey};
use ariadne_dom::{Document, Key, KeyEvent, NodeId, Viewport};

use crate::config::EngineConfig;
use crate::controller::{Dispatch, DocumentEvent, WidgetCx, WidgetEvent};
use crate::error::{RuntimeError, RuntimeResult};
use crate::kind::{mount_all, Widget, WidgetKind};

/// Headless interaction engine
#[derive(Debug)]
pub struct InteractionRuntime {
    doc: Document,
    scheduler: Scheduler,
    announcer: LiveAnnouncer,
    trap: FocusTrap,
    config: EngineConfig,
    widgets: Vec<Widget>,
}

macro_rules! widget_cx {
    ($self:ident) => {
        WidgetCx::new(
            &mut $self.doc,
            &mut $self.scheduler,
            &mut $self.announcer,
            &mut $self.trap,
        )
    };
}

impl InteractionRuntime {
    /// Parse markup and mount its widgets
    pub fn from_html(html: &str, config: EngineConfig) -> RuntimeResult<Self> {
        Self::new(ariadne_html::parse(html), config)
    }

    pub fn new(mut doc: Document, config: EngineConfig) -> RuntimeResult<Self> {
        config.validate()?;
        let widgets = mount_all(&mut doc, &config);
        tracing::info!("mounted {} widgets on {:?}", widgets.len(), doc.title());
        Ok(Self {
            doc,
            scheduler: Scheduler::new(),
            announcer: LiveAnnouncer::new(config.announcer.clone()),
            trap: FocusTrap::new(),
            config,
            widgets,
        })
    }

    // ---- accessors ----

    pub fn document(&self) -> &Document {
        &self.doc
    }

    /// Mutable access for host-side layout and viewport updates
    pub fn document_mut(&mut self) -> &mut Document {
        &mut self.doc
    }

    pub fn announcer(&self) -> &LiveAnnouncer {
        &self.announcer
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    pub fn trap(&self) -> &FocusTrap {
        &self.trap
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn widgets(&self) -> &[Widget] {
        &self.widgets
    }

    pub fn widget_kinds(&self) -> impl Iterator<Item = WidgetKind> + '_ {
        self.widgets.iter().map(Widget::kind)
    }

    pub fn active_element(&self) -> NodeId {
        self.doc.active_element()
    }

    pub fn now_ms(&self) -> u64 {
        self.scheduler.now_ms()
    }

    /// Texts of the status messages currently in the document
    pub fn live_messages(&self) -> Vec<String> {
        self.announcer
            .live_messages(&self.doc)
            .map(str::to_string)
            .collect()
    }

    // ---- input events ----

    pub fn key_down(&mut self, target: NodeId, event: KeyEvent) -> RuntimeResult<Dispatch> {
        self.ensure_attached(target)?;
        let before = self.doc.active_element();
        let routed = self.route_key(target, &event);
        self.settle_focus(before);
        match routed? {
            Dispatch::Handled => Ok(Dispatch::Handled),
            Dispatch::Ignored => self.default_key_action(target, &event),
        }
    }

    pub fn click(&mut self, target: NodeId) -> RuntimeResult<Dispatch> {
        self.ensure_attached(target)?;
        let before = self.doc.active_element();
        let body = self.doc.body();
        let focusable = std::iter::once(target)
            .chain(self.doc.tree.ancestors(target))
            .take_while(|&n| n != body)
            .find(|&n| self.doc.is_focusable(n));
        if let Some(node) = focusable {
            self.doc.focus(node);
        }
        let routed = self.route_click(target);
        self.settle_focus(before);
        routed
    }

    pub fn focus(&mut self, target: NodeId) -> RuntimeResult<Dispatch> {
        self.ensure_attached(target)?;
        let before = self.doc.active_element();
        let moved = self.doc.focus(target);
        self.settle_focus(before);
        Ok(Dispatch::from_handled(moved))
    }

    /// Text typed into a control: stored in its `value` attribute
    pub fn input(&mut self, target: NodeId, value: &str) -> RuntimeResult<Dispatch> {
        self.ensure_attached(target)?;
        self.doc.tree.set_attr(target, "value", value);
        self.route_owned(target, WidgetEvent::Input)
    }

    pub fn change(&mut self, target: NodeId) -> RuntimeResult<Dispatch> {
        self.ensure_attached(target)?;
        self.route_owned(target, WidgetEvent::Change)
    }

    /// Choose the `index`-th option of a native select and fire its change
    pub fn select_option(&mut self, select: NodeId, index: usize) -> RuntimeResult<Dispatch> {
        self.ensure_attached(select)?;
        let options = self.doc.tree.query_selector_all(select, "option");
        let Some(&chosen) = options.get(index) else {
            tracing::warn!("select {select} has no option {index}");
            return Ok(Dispatch::Ignored);
        };
        for &option in &options {
            self.doc.tree.remove_attr(option, "selected");
        }
        self.doc.tree.set_attr(chosen, "selected", "");
        let value = match self.doc.tree.attr(chosen, "value") {
            Some(value) => value.to_string(),
            None => self.doc.tree.text_content(chosen).trim().to_string(),
        };
        self.doc.tree.set_attr(select, "value", value);
        self.change(select)
    }

    pub fn resize(&mut self, viewport: Viewport) {
        self.doc.set_viewport(viewport);
        let mut cx = widget_cx!(self);
        for widget in &mut self.widgets {
            widget.on_document(&mut cx, DocumentEvent::Resize);
        }
    }

    /// Move the virtual clock forward, running every task that falls due.
    /// Returns the number of tasks run.
    pub fn advance(&mut self, ms: u64) -> usize {
        let deadline = self.scheduler.now_ms().saturating_add(ms);
        let mut fired = 0;
        while let Some(task) = self.scheduler.pop_due(deadline) {
            fired += 1;
            match task {
                Task::Expire(node) => {
                    self.announcer.expire(&mut self.doc, node);
                }
                Task::Focus(node) => {
                    if self.doc.tree.is_attached(node) && !self.doc.is_hidden(node) {
                        let before = self.doc.active_element();
                        self.doc.focus(node);
                        self.settle_focus(before);
                    }
                }
            }
        }
        self.scheduler.advance_to(deadline);
        fired
    }

    /// Close any open modal, drop every live announcement and cancel every
    /// pending timer
    pub fn teardown(&mut self) {
        if let Some(surface) = self.trap.session().map(|s| s.surface) {
            let mut cx = widget_cx!(self);
            if let Err(err) = cx.close_modal(surface) {
                tracing::warn!("modal {surface} not closed on teardown: {err}");
            }
        }
        self.announcer.teardown(&mut self.doc, &mut self.scheduler);
        self.scheduler.clear();
        tracing::info!("runtime torn down");
    }

    // ---- routing ----

    fn ensure_attached(&self, target: NodeId) -> RuntimeResult<()> {
        if self.doc.tree.is_attached(target) {
            Ok(())
        } else {
            Err(RuntimeError::Detached(target))
        }
    }

    fn route_key(&mut self, target: NodeId, event: &KeyEvent) -> RuntimeResult<Dispatch> {
        let mut cx = widget_cx!(self);
        match cx.trap_key(event) {
            TrapKey::Closed(_) | TrapKey::Wrapped(_) | TrapKey::Held => {
                return Ok(Dispatch::Handled);
            }
            TrapKey::Inactive | TrapKey::PassThrough => {}
        }

        for widget in &mut self.widgets {
            if widget.owns(&cx.doc, target)
                && widget.on_event(&mut cx, target, WidgetEvent::KeyDown(event))?.is_handled()
            {
                tracing::debug!("{} on {target} handled by {:?}", event.display(), widget.kind());
                return Ok(Dispatch::Handled);
            }
        }
        for widget in &mut self.widgets {
            if widget.on_document(&mut cx, DocumentEvent::KeyDown(event)).is_handled() {
                return Ok(Dispatch::Handled);
            }
        }
        Ok(Dispatch::Ignored)
    }

    fn route_click(&mut self, target: NodeId) -> RuntimeResult<Dispatch> {
        let mut cx = widget_cx!(self);
        let mut dispatch = Dispatch::Ignored;
        for widget in &mut self.widgets {
            if widget.owns(&cx.doc, target) && widget.on_event(&mut cx, target, WidgetEvent::Click)?.is_handled() {
                tracing::debug!("click on {target} handled by {:?}", widget.kind());
                dispatch = Dispatch::Handled;
                break;
            }
        }
        // outside-click handlers run after the target's own, as with bubbling
        for widget in &mut self.widgets {
            if widget.on_document(&mut cx, DocumentEvent::Click(target)).is_handled() {
                dispatch = Dispatch::Handled;
            }
        }
        Ok(dispatch)
    }

    fn route_owned(&mut self, target: NodeId, event: WidgetEvent<'_>) -> RuntimeResult<Dispatch> {
        let before = self.doc.active_element();
        let mut cx = widget_cx!(self);
        let mut dispatch = Dispatch::Ignored;
        for widget in &mut self.widgets {
            if widget.owns(&cx.doc, target) && widget.on_event(&mut cx, target, event)?.is_handled() {
                dispatch = Dispatch::Handled;
                break;
            }
        }
        self.settle_focus(before);
        Ok(dispatch)
    }

    /// Tell every widget about a focus move that happened during an event
    fn settle_focus(&mut self, before: NodeId) {
        let after = self.doc.active_element();
        if after == before {
            return;
        }
        let mut cx = widget_cx!(self);
        for widget in &mut self.widgets {
            widget.on_document(&mut cx, DocumentEvent::FocusChanged { from: before, to: after });
        }
    }

    fn default_key_action(&mut self, target: NodeId, event: &KeyEvent) -> RuntimeResult<Dispatch> {
        match event.key {
            Key::Tab if !(event.ctrl || event.alt || event.meta) => {
                let before = self.doc.active_element();
                let moved = self.doc.sequential_focus(event.shift);
                self.settle_focus(before);
                Ok(Dispatch::from_handled(moved.is_some()))
            }
            Key::Enter | Key::Space if activates_on(&self.doc, target, &event.key) => self.click(target),
            _ => Ok(Dispatch::Ignored),
        }
    }
}

/// Whether `key` on `target` performs the native click activation
fn activates_on(doc: &Document, target: NodeId, key: &Key) -> bool {
    let tree = &doc.tree;
    match tree.tag(target) {
        Some("button" | "summary") => true,
        Some("a") => *key == Key::Enter && tree.has_attr(target, "href"),
        Some("input") => matches!(
            (tree.attr(target, "type"), key),
            (Some("checkbox" | "radio"), Key::Space) | (Some("button" | "submit" | "reset"), _)
        ),
        _ => false,
    }
}
