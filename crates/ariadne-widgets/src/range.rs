//! Sliders and progress bars
//!
//! Range inputs keep `aria-valuenow` / `aria-valuetext` and their visible
//! value display in sync; step buttons and progress buttons nudge a value
//! by a fixed amount, clamped to its bounds.

use ariadne_a11y::aria::format_number;
use ariadne_a11y::{AriaState, Politeness};
use ariadne_dom::{Document, Key, NodeId};

use crate::controller::{Controller, Dispatch, WidgetCx, WidgetEvent};
use crate::dom::{label_text, referenced};
use crate::error::RuntimeResult;

const DEFAULT_STEP: f64 = 10.0;
const PROGRESS_STEP: f64 = 10.0;

/// What a slider value measures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Percent,
    Celsius,
}

impl Unit {
    fn of(doc: &Document, input: NodeId) -> Self {
        let celsius = matches!(doc.tree.attr(input, "data-unit"), Some("celsius" | "degrees Celsius"))
            || doc.tree.attr(input, "id") == Some("temperature-slider");
        if celsius { Self::Celsius } else { Self::Percent }
    }

    pub fn value_text(self, value: f64) -> String {
        match self {
            Self::Percent => format!("{} percent", format_number(value)),
            Self::Celsius => format!("{} degrees Celsius", format_number(value)),
        }
    }

    pub fn display(self, value: f64) -> String {
        match self {
            Self::Percent => format!("{}%", format_number(value)),
            Self::Celsius => format!("{}°C", format_number(value)),
        }
    }
}

#[derive(Debug, Clone)]
struct Slider {
    input: NodeId,
    display: Option<NodeId>,
    unit: Unit,
}

#[derive(Debug, Clone)]
struct Progress {
    bar: NodeId,
    fill: Option<NodeId>,
    text: Option<NodeId>,
}

#[derive(Debug, Clone, Copy)]
enum StepTarget {
    Slider(usize),
    Progress(usize),
}

#[derive(Debug, Clone)]
struct StepButton {
    button: NodeId,
    target: StepTarget,
    delta: f64,
}

#[derive(Debug, Clone, Default)]
pub struct RangeController {
    sliders: Vec<Slider>,
    progress: Vec<Progress>,
    buttons: Vec<StepButton>,
}

fn number_attr(doc: &Document, node: NodeId, name: &str) -> Option<f64> {
    doc.tree
        .attr(node, name)?
        .trim()
        .parse()
        .ok()
        .filter(|v: &f64| v.is_finite())
}

impl RangeController {
    pub fn mount(doc: &mut Document) -> Option<Self> {
        let root = doc.tree.root();
        let sliders: Vec<Slider> = doc
            .tree
            .query_selector_all(root, ".slider-input")
            .into_iter()
            .map(|input| {
                let display = doc
                    .tree
                    .closest(input, ".slider-controls")
                    .or_else(|| doc.tree.parent(input))
                    .and_then(|scope| doc.tree.query_selector(scope, ".slider-value"));
                Slider { input, display, unit: Unit::of(doc, input) }
            })
            .collect();

        let progress: Vec<Progress> = doc
            .tree
            .query_selector_all(root, "[role=progressbar]")
            .into_iter()
            .map(|bar| Progress {
                bar,
                fill: doc.tree.query_selector(bar, ".progress-bar"),
                text: next_element_sibling(doc, bar),
            })
            .collect();

        let mut controller = Self { sliders, progress, buttons: Vec::new() };
        let candidates = doc
            .tree
            .query_selector_all(root, "[data-action=increase], [data-action=decrease]");
        for button in candidates {
            if let Some(step) = controller.step_button(doc, button) {
                controller.buttons.push(step);
            }
        }

        for index in 0..controller.sliders.len() {
            controller.sync_slider(doc, index);
        }
        let empty = controller.sliders.is_empty() && controller.progress.is_empty();
        (!empty).then_some(controller)
    }

    fn step_button(&self, doc: &Document, button: NodeId) -> Option<StepButton> {
        let sign = match doc.tree.attr(button, "data-action")? {
            "increase" => 1.0,
            _ => -1.0,
        };
        let controlled = referenced(doc, button, "aria-controls");
        let target = match controlled {
            Some(node) => {
                if let Some(i) = self.sliders.iter().position(|s| s.input == node) {
                    StepTarget::Slider(i)
                } else if let Some(i) = self.progress.iter().position(|p| p.bar == node) {
                    StepTarget::Progress(i)
                } else {
                    tracing::warn!("step button {button} controls neither a slider nor a progress bar");
                    return None;
                }
            }
            None if doc.tree.has_class(button, "progress-button") && !self.progress.is_empty() => {
                StepTarget::Progress(0)
            }
            None => return None,
        };
        let magnitude = match target {
            StepTarget::Slider(_) => number_attr(doc, button, "data-step").unwrap_or(DEFAULT_STEP),
            StepTarget::Progress(_) => PROGRESS_STEP,
        };
        Some(StepButton { button, target, delta: sign * magnitude })
    }

    fn bounds(doc: &Document, input: NodeId) -> (f64, f64, f64) {
        let min = number_attr(doc, input, "min").unwrap_or(0.0);
        let max = number_attr(doc, input, "max").unwrap_or(100.0).max(min);
        let step = number_attr(doc, input, "step").filter(|s| *s > 0.0).unwrap_or(1.0);
        (min, max, step)
    }

    pub fn slider_value(&self, doc: &Document, input: NodeId) -> Option<f64> {
        self.sliders.iter().find(|s| s.input == input)?;
        let (min, max, _) = Self::bounds(doc, input);
        Some(number_attr(doc, input, "value").unwrap_or(min).clamp(min, max))
    }

    /// Mirror the slider value into its ARIA state and value display
    fn sync_slider(&self, doc: &mut Document, index: usize) -> Option<String> {
        let slider = self.sliders.get(index)?;
        let value = self.slider_value(doc, slider.input)?;
        let text = slider.unit.value_text(value);
        AriaState::ValueNow(value).apply(&mut doc.tree, slider.input);
        AriaState::ValueText(text.clone()).apply(&mut doc.tree, slider.input);
        if let Some(display) = slider.display {
            doc.tree.set_text_content(display, &slider.unit.display(value));
        }
        Some(text)
    }

    fn set_slider(&self, cx: &mut WidgetCx<'_>, index: usize, value: f64) {
        let Some(slider) = self.sliders.get(index) else { return };
        let (min, max, _) = Self::bounds(cx.doc, slider.input);
        cx.doc
            .tree
            .set_attr(slider.input, "value", format_number(value.clamp(min, max)));
        self.announce_slider(cx, index);
    }

    fn announce_slider(&self, cx: &mut WidgetCx<'_>, index: usize) {
        let Some(text) = self.sync_slider(cx.doc, index) else { return };
        let input = self.sliders[index].input;
        let label = label_text(cx.doc, input).unwrap_or_else(|| "Value".to_string());
        cx.announce(&format!("{label}: {text}"), Politeness::Polite);
    }

    pub fn progress_value(&self, doc: &Document, bar: NodeId) -> f64 {
        number_attr(doc, bar, "aria-valuenow").unwrap_or(0.0)
    }

    fn set_progress(&self, cx: &mut WidgetCx<'_>, index: usize, value: f64) {
        let Some(progress) = self.progress.get(index) else { return };
        let value = value.clamp(0.0, 100.0);
        let shown = format_number(value);
        if let Some(fill) = progress.fill {
            cx.doc.tree.set_attr(fill, "style", format!("width: {shown}%"));
        }
        if let Some(text) = progress.text {
            cx.doc.tree.set_text_content(text, &format!("{shown}%"));
        }
        AriaState::ValueNow(value).apply(&mut cx.doc.tree, progress.bar);
        cx.announce(&format!("Progress: {shown} percent"), Politeness::Polite);
    }

    fn slider_of(&self, target: NodeId) -> Option<usize> {
        self.sliders.iter().position(|s| s.input == target)
    }
}

fn next_element_sibling(doc: &Document, node: NodeId) -> Option<NodeId> {
    std::iter::successors(doc.tree.next_sibling(node), |&n| doc.tree.next_sibling(n))
        .find(|&n| doc.tree.element(n).is_some())
}

impl Controller for RangeController {
    fn owns(&self, doc: &Document, target: NodeId) -> bool {
        self.slider_of(target).is_some()
            || self.buttons.iter().any(|b| doc.tree.contains(b.button, target))
    }

    fn on_event(
        &mut self,
        cx: &mut WidgetCx<'_>,
        target: NodeId,
        event: WidgetEvent<'_>,
    ) -> RuntimeResult<Dispatch> {
        if let Some(index) = self.slider_of(target) {
            match event {
                WidgetEvent::Input => {
                    self.sync_slider(cx.doc, index);
                }
                WidgetEvent::Change => self.announce_slider(cx, index),
                WidgetEvent::KeyDown(key) => {
                    let Some(value) = self.slider_value(cx.doc, target) else {
                        return Ok(Dispatch::Ignored);
                    };
                    let (min, max, step) = Self::bounds(cx.doc, target);
                    let next = match key.key {
                        Key::ArrowUp | Key::ArrowRight => value + step,
                        Key::ArrowDown | Key::ArrowLeft => value - step,
                        Key::Home => min,
                        Key::End => max,
                        _ => return Ok(Dispatch::Ignored),
                    };
                    self.set_slider(cx, index, next);
                }
                WidgetEvent::Click => return Ok(Dispatch::Ignored),
            }
            return Ok(Dispatch::Handled);
        }

        let WidgetEvent::Click = event else {
            return Ok(Dispatch::Ignored);
        };
        let Some(button) = self.buttons.iter().find(|b| cx.doc.tree.contains(b.button, target)) else {
            return Ok(Dispatch::Ignored);
        };
        let (step_target, delta) = (button.target, button.delta);
        match step_target {
            StepTarget::Slider(index) => {
                let input = self.sliders[index].input;
                let value = self.slider_value(cx.doc, input).unwrap_or(0.0);
                self.set_slider(cx, index, value + delta);
            }
            StepTarget::Progress(index) => {
                let value = self.progress_value(cx.doc, self.progress[index].bar);
                self.set_progress(cx, index, value + delta);
            }
        }
        Ok(Dispatch::Handled)
    }
}
