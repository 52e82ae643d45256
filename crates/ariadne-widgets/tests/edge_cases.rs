//! Edge case tests for ariadne-widgets
//!
//! Small hand-written pages exercising boundaries the demo page does not.

use ariadne_dom::{KeyEvent, NodeId};
use ariadne_widgets::{Dispatch, EngineConfig, InteractionRuntime};

fn runtime(html: &str) -> InteractionRuntime {
    InteractionRuntime::from_html(html, EngineConfig::default()).unwrap()
}

fn by_id(rt: &InteractionRuntime, id: &str) -> NodeId {
    rt.document().tree.get_element_by_id(id).unwrap()
}

fn press(rt: &mut InteractionRuntime, chord: &str) -> Dispatch {
    let target = rt.active_element();
    rt.key_down(target, KeyEvent::parse(chord)).unwrap()
}

fn last_message(rt: &InteractionRuntime) -> Option<String> {
    rt.announcer().last().map(|a| a.text.clone())
}

const SHARED_DIALOG: &str = r#"
    <button id="a" data-dialog-open="modal">A</button>
    <button id="b" data-dialog-open="modal">B</button>
    <div id="modal" class="dialog-overlay">
      <div role="dialog" aria-labelledby="modal-title">
        <h2 id="modal-title">Settings</h2>
        <button id="one">One</button>
        <button id="two">Two</button>
        <button id="three" class="dialog-close">Close</button>
      </div>
    </div>
"#;

#[test]
fn test_shared_overlay_restores_the_trigger_used() {
    let mut rt = runtime(SHARED_DIALOG);
    assert_eq!(rt.widgets().len(), 1, "both triggers share one controller");
    let (b, one, two, three) = (by_id(&rt, "b"), by_id(&rt, "one"), by_id(&rt, "two"), by_id(&rt, "three"));

    rt.click(b).unwrap();
    assert_eq!(rt.active_element(), one);
    assert_eq!(
        last_message(&rt).as_deref(),
        Some("Dialog: Settings. Press Escape to close.")
    );

    press(&mut rt, "Tab");
    assert_eq!(rt.active_element(), two);
    press(&mut rt, "Tab");
    assert_eq!(rt.active_element(), three);
    press(&mut rt, "Tab");
    assert_eq!(rt.active_element(), one);
    press(&mut rt, "Shift+Tab");
    assert_eq!(rt.active_element(), three);

    press(&mut rt, "Esc");
    assert_eq!(rt.active_element(), b);
}

#[test]
fn test_unfocusable_trigger_restores_body() {
    let mut rt = runtime(
        r#"<span id="t" data-dialog-open="d">Open</span>
           <div id="d"><button id="x" class="dialog-close">Close</button></div>"#,
    );
    rt.click(by_id(&rt, "t")).unwrap();
    assert_eq!(rt.active_element(), by_id(&rt, "x"));
    assert_eq!(last_message(&rt).as_deref(), Some("Dialog. Press Escape to close."));

    rt.click(by_id(&rt, "x")).unwrap();
    assert!(!rt.trap().is_open());
    assert_eq!(rt.active_element(), rt.document().body());
}

#[test]
fn test_visible_overlay_stays_visible_at_mount() {
    let rt = runtime(
        r#"<button data-dialog-open="d">Open</button>
           <div id="d" aria-hidden="false"><button>Ok</button></div>"#,
    );
    let overlay = by_id(&rt, "d");
    assert_eq!(rt.document().tree.attr(overlay, "aria-hidden"), Some("false"));
}

#[test]
fn test_trigger_to_missing_overlay_is_skipped() {
    let rt = runtime(r#"<button data-dialog-open="nowhere">Open</button>"#);
    assert!(rt.widgets().is_empty());
}

#[test]
fn test_menu_closed_before_delay_keeps_focus() {
    let mut rt = runtime(
        r#"<ul><li class="nav-item">
             <button class="nav-menu-button" aria-controls="m">More</button>
             <ul id="m"><li><a href="/x">X</a></li></ul>
           </li></ul>"#,
    );
    let button = rt.document().tree.query_selector(rt.document().tree.root(), "button").unwrap();
    rt.click(button).unwrap();
    rt.click(button).unwrap();
    assert_eq!(rt.scheduler().pending_len(), 0);
    assert_eq!(rt.advance(1000), 0);
    assert_eq!(rt.active_element(), button);
}

#[test]
fn test_menu_focus_delay_is_configurable() {
    let html = r#"<ul><li class="nav-item">
             <button class="nav-menu-button" aria-controls="m">More</button>
             <ul id="m"><li><a id="x" href="/x">X</a></li></ul>
           </li></ul>"#;
    let config = EngineConfig::from_json(r#"{"menu": {"focus_delay_ms": 0}}"#).unwrap();
    let mut rt = InteractionRuntime::from_html(html, config).unwrap();
    let button = rt.document().tree.query_selector(rt.document().tree.root(), "button").unwrap();

    rt.click(button).unwrap();
    assert_eq!(rt.active_element(), button, "even a zero delay waits for the clock");
    rt.advance(0);
    assert_eq!(rt.active_element(), by_id(&rt, "x"));
}

#[test]
fn test_validation_message_without_id() {
    let mut rt = runtime(
        r#"<div class="form-group"><input data-validate></div>
           <button id="next">Next</button>"#,
    );
    let input = rt.document().tree.query_selector(rt.document().tree.root(), "input").unwrap();
    rt.focus(input).unwrap();
    rt.focus(by_id(&rt, "next")).unwrap();

    let error = by_id(&rt, "input-error");
    assert_eq!(rt.document().tree.attr(input, "aria-describedby"), Some("input-error"));
    assert_eq!(rt.document().tree.text_content(error), "This field is required");

    // a second blur replaces rather than stacks the message
    rt.focus(input).unwrap();
    rt.focus(by_id(&rt, "next")).unwrap();
    let root = rt.document().tree.root();
    assert_eq!(rt.document().tree.query_selector_all(root, ".error-message").len(), 1);
}

#[test]
fn test_min_length_from_config() {
    let html = r#"<input id="code" data-validate><button id="next">Next</button>"#;
    let config = EngineConfig::from_json(r#"{"forms": {"min_length": 6}}"#).unwrap();
    let mut rt = InteractionRuntime::from_html(html, config).unwrap();
    let input = by_id(&rt, "code");

    rt.input(input, "abcde").unwrap();
    rt.focus(input).unwrap();
    rt.focus(by_id(&rt, "next")).unwrap();
    let error = by_id(&rt, "code-error");
    assert_eq!(
        rt.document().tree.text_content(error),
        "Please enter at least 6 characters"
    );
}

#[test]
fn test_empty_chip_input_adds_nothing() {
    let mut rt = runtime(r#"<div><input class="chip-input" type="text" aria-label="Tags"></div>"#);
    let input = rt.document().tree.query_selector(rt.document().tree.root(), "input").unwrap();
    rt.focus(input).unwrap();
    rt.input(input, "   ").unwrap();

    assert_eq!(press(&mut rt, "Enter"), Dispatch::Ignored);
    let root = rt.document().tree.root();
    assert!(rt.document().tree.query_selector(root, ".input-chip").is_none());
    assert!(rt.announcer().last().is_none());
}

#[test]
fn test_unlabelled_slider_with_custom_step() {
    let mut rt = runtime(
        r#"<input id="s" class="slider-input" type="range" min="0" max="10" value="5">
           <button id="up" data-action="increase" aria-controls="s" data-step="2">Up</button>"#,
    );
    rt.click(by_id(&rt, "up")).unwrap();
    assert_eq!(last_message(&rt).as_deref(), Some("Value: 7 percent"));
    rt.click(by_id(&rt, "up")).unwrap();
    rt.click(by_id(&rt, "up")).unwrap();
    assert_eq!(rt.document().tree.attr(by_id(&rt, "s"), "value"), Some("10"));
}

#[test]
fn test_history_limit() {
    let html = r#"<div class="chip" role="checkbox" tabindex="0">Only</div>"#;
    let config = EngineConfig::from_json(r#"{"announcer": {"history_limit": 2}}"#).unwrap();
    let mut rt = InteractionRuntime::from_html(html, config).unwrap();
    let chip = rt.document().tree.query_selector(rt.document().tree.root(), ".chip").unwrap();

    for _ in 0..3 {
        rt.click(chip).unwrap();
    }
    let texts: Vec<&str> = rt.announcer().history().map(|a| a.text.as_str()).collect();
    assert_eq!(texts, vec!["Only filter unselected", "Only filter selected"]);
    assert_eq!(rt.live_messages().len(), 3);
}

#[test]
fn test_unhandled_keys_fall_through() {
    let mut rt = runtime(r#"<div id="plain" tabindex="0">Text</div>"#);
    rt.focus(by_id(&rt, "plain")).unwrap();
    assert_eq!(press(&mut rt, "Enter"), Dispatch::Ignored);
    assert_eq!(press(&mut rt, "ArrowDown"), Dispatch::Ignored);
    assert_eq!(press(&mut rt, "Tab"), Dispatch::Handled);
}

#[test]
fn test_ctrl_tab_is_not_sequential_navigation() {
    let mut rt = runtime(r#"<button id="a">A</button><button id="b">B</button>"#);
    let a = by_id(&rt, "a");
    rt.focus(a).unwrap();
    assert_eq!(press(&mut rt, "Ctrl+Tab"), Dispatch::Ignored);
    assert_eq!(rt.active_element(), a);
}

#[test]
fn test_page_without_widgets() {
    let mut rt = runtime("<p>Nothing interactive</p>");
    assert!(rt.widgets().is_empty());
    assert_eq!(press(&mut rt, "Tab"), Dispatch::Ignored);
    rt.teardown();
    assert_eq!(rt.scheduler().pending_len(), 0);
}

#[test]
fn test_non_numeric_slider_bounds_fall_back_to_defaults() {
    let rt = runtime(
        r#"<input id="s" type="range" class="slider-input" min="NaN" max="inf" value="50">"#,
    );
    let slider = by_id(&rt, "s");
    assert_eq!(rt.document().tree.attr(slider, "aria-valuenow"), Some("50"));
    assert_eq!(rt.document().tree.attr(slider, "aria-valuetext"), Some("50 percent"));
}

const EMPTY_MODAL: &str = r#"
    <button id="bg">Background</button>
    <button id="open" data-dialog-open="m">Open</button>
    <div id="m"><div role="dialog"><p>Nothing to press here.</p></div></div>
"#;

#[test]
fn test_tab_in_modal_without_focusables_keeps_focus() {
    let mut rt = runtime(EMPTY_MODAL);
    let open = by_id(&rt, "open");
    rt.click(open).unwrap();
    assert!(rt.trap().is_open());
    assert_eq!(rt.active_element(), open);

    assert_eq!(press(&mut rt, "Tab"), Dispatch::Handled);
    assert_eq!(rt.active_element(), open);
    assert_eq!(press(&mut rt, "Shift+Tab"), Dispatch::Handled);
    assert_eq!(rt.active_element(), open);
    assert!(rt.trap().is_open());
}

#[test]
fn test_unfocusable_initial_focus_uses_first_control() {
    let mut rt = runtime(
        r#"<button id="open" data-dialog-open="m">Open</button>
           <div id="m" data-initial-focus="msg">
             <div role="dialog">
               <p id="msg">Read me first</p>
               <button id="ok">Ok</button>
             </div>
           </div>"#,
    );
    rt.click(by_id(&rt, "open")).unwrap();
    assert_eq!(rt.active_element(), by_id(&rt, "ok"));
}

#[test]
fn test_arrow_moves_from_the_focused_tab() {
    let mut rt = runtime(
        r#"<div role="tablist">
             <button id="t1" role="tab" aria-selected="true" aria-controls="p1">One</button>
             <button id="t2" role="tab" aria-controls="p2">Two</button>
             <button id="t3" role="tab" aria-controls="p3">Three</button>
           </div>
           <div id="p1">1</div><div id="p2">2</div><div id="p3">3</div>"#,
    );
    let (t2, t3) = (by_id(&rt, "t2"), by_id(&rt, "t3"));
    rt.focus(t2).unwrap();

    assert_eq!(press(&mut rt, "ArrowRight"), Dispatch::Handled);
    assert_eq!(rt.active_element(), t3);
    let tree = &rt.document().tree;
    assert_eq!(tree.attr(t3, "aria-selected"), Some("true"));
    assert_eq!(tree.attr(t3, "tabindex"), Some("0"));
    assert_eq!(tree.attr(t2, "tabindex"), Some("-1"));
    assert_eq!(tree.attr(by_id(&rt, "t1"), "tabindex"), Some("-1"));
    assert!(!tree.has_attr(by_id(&rt, "p3"), "hidden"));
    assert!(tree.has_attr(by_id(&rt, "p1"), "hidden"));
}
