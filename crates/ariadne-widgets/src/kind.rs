//! Widget registry
//!
//! Markup is scanned once at mount; each recognised widget becomes a
//! [`Widget`] variant and events are routed to it with a `match`.

use ariadne_dom::{Document, NodeId};

use crate::chips::ChipsController;
use crate::config::EngineConfig;
use crate::controller::{Controller, Dispatch, DocumentEvent, WidgetCx, WidgetEvent};
use crate::dialog::DialogController;
use crate::disclosure::DisclosureController;
use crate::error::RuntimeResult;
use crate::feedback::FeedbackController;
use crate::forms::FormsController;
use crate::listbox::ListboxController;
use crate::menu::{MobileMenu, NavMenu};
use crate::range::RangeController;
use crate::tabs::TabsController;
use crate::tooltip::TooltipController;
use crate::tree::TreeController;

/// Widget kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WidgetKind {
    Dialog,
    Tabs,
    Listbox,
    NavMenu,
    MobileMenu,
    Tree,
    Chips,
    Tooltip,
    Range,
    Forms,
    Disclosure,
    Feedback,
}

/// A mounted widget controller
#[derive(Debug, Clone)]
pub enum Widget {
    Dialog(DialogController),
    Tabs(TabsController),
    Listbox(ListboxController),
    NavMenu(NavMenu),
    MobileMenu(MobileMenu),
    Tree(TreeController),
    Chips(ChipsController),
    Tooltip(TooltipController),
    Range(RangeController),
    Forms(FormsController),
    Disclosure(DisclosureController),
    Feedback(FeedbackController),
}

macro_rules! each_widget {
    ($widget:expr, $c:ident => $body:expr) => {
        match $widget {
            Widget::Dialog($c) => $body,
            Widget::Tabs($c) => $body,
            Widget::Listbox($c) => $body,
            Widget::NavMenu($c) => $body,
            Widget::MobileMenu($c) => $body,
            Widget::Tree($c) => $body,
            Widget::Chips($c) => $body,
            Widget::Tooltip($c) => $body,
            Widget::Range($c) => $body,
            Widget::Forms($c) => $body,
            Widget::Disclosure($c) => $body,
            Widget::Feedback($c) => $body,
        }
    };
}

impl Widget {
    pub fn kind(&self) -> WidgetKind {
        match self {
            Self::Dialog(_) => WidgetKind::Dialog,
            Self::Tabs(_) => WidgetKind::Tabs,
            Self::Listbox(_) => WidgetKind::Listbox,
            Self::NavMenu(_) => WidgetKind::NavMenu,
            Self::MobileMenu(_) => WidgetKind::MobileMenu,
            Self::Tree(_) => WidgetKind::Tree,
            Self::Chips(_) => WidgetKind::Chips,
            Self::Tooltip(_) => WidgetKind::Tooltip,
            Self::Range(_) => WidgetKind::Range,
            Self::Forms(_) => WidgetKind::Forms,
            Self::Disclosure(_) => WidgetKind::Disclosure,
            Self::Feedback(_) => WidgetKind::Feedback,
        }
    }

    pub fn owns(&self, doc: &Document, target: NodeId) -> bool {
        each_widget!(self, c => c.owns(doc, target))
    }

    pub(crate) fn on_event(
        &mut self,
        cx: &mut WidgetCx<'_>,
        target: NodeId,
        event: WidgetEvent<'_>,
    ) -> RuntimeResult<Dispatch> {
        each_widget!(self, c => c.on_event(cx, target, event))
    }

    pub(crate) fn on_document(&mut self, cx: &mut WidgetCx<'_>, event: DocumentEvent<'_>) -> Dispatch {
        each_widget!(self, c => c.on_document(cx, event))
    }
}

/// Scan the document and mount every recognised widget, in a fixed order
pub fn mount_all(doc: &mut Document, config: &EngineConfig) -> Vec<Widget> {
    let mut widgets = Vec::new();
    widgets.extend(DialogController::mount(doc).into_iter().map(Widget::Dialog));
    widgets.extend(TabsController::mount(doc, &config.tabs).into_iter().map(Widget::Tabs));
    widgets.extend(ListboxController::mount(doc).into_iter().map(Widget::Listbox));
    widgets.extend(NavMenu::mount(doc, &config.menu).map(Widget::NavMenu));
    widgets.extend(MobileMenu::mount(doc).map(Widget::MobileMenu));
    widgets.extend(TreeController::mount(doc).into_iter().map(Widget::Tree));
    widgets.extend(ChipsController::mount(doc).map(Widget::Chips));
    widgets.extend(TooltipController::mount(doc, &config.placement).map(Widget::Tooltip));
    widgets.extend(RangeController::mount(doc).map(Widget::Range));
    widgets.extend(FormsController::mount(doc, &config.forms).map(Widget::Forms));
    widgets.extend(DisclosureController::mount(doc).map(Widget::Disclosure));
    widgets.extend(FeedbackController::mount(doc, config.announcer.feedback_ttl_ms).map(Widget::Feedback));
    widgets
}
