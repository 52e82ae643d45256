//! Property tests for keyboard invariants of the mounted widgets

use ariadne_dom::{KeyEvent, NodeId};
use ariadne_widgets::{EngineConfig, InteractionRuntime, DEMO_PAGE};
use proptest::prelude::*;

const MODAL: &str = r#"
    <button id="open" data-dialog-open="modal">Open</button>
    <div id="modal">
      <h2 id="modal-title">Modal</h2>
      <input id="field" type="text">
      <button id="ok">Ok</button>
      <a id="help" href="/help">Help</a>
    </div>
    <button id="after">After</button>
"#;

fn ids(rt: &InteractionRuntime, ids: &[&str]) -> Vec<NodeId> {
    ids.iter()
        .map(|id| rt.document().tree.get_element_by_id(id).unwrap())
        .collect()
}

#[test]
fn prop_tabs_keep_one_selected_tab() {
    let keys = prop::sample::select(vec!["ArrowLeft", "ArrowRight", "Home", "End"]);
    proptest!(|(presses in prop::collection::vec(keys, 0..24))| {
        let mut rt = InteractionRuntime::from_html(DEMO_PAGE, EngineConfig::default()).unwrap();
        let tabs = ids(&rt, &["tab-1", "tab-2", "tab-3"]);
        let panels = ids(&rt, &["panel-1", "panel-2", "panel-3"]);
        rt.focus(tabs[0]).unwrap();

        for key in presses {
            let target = rt.active_element();
            rt.key_down(target, KeyEvent::parse(key)).unwrap();

            let tree = &rt.document().tree;
            let selected: Vec<usize> = (0..3)
                .filter(|&i| tree.attr(tabs[i], "aria-selected") == Some("true"))
                .collect();
            prop_assert_eq!(selected.len(), 1);
            let i = selected[0];
            prop_assert_eq!(rt.active_element(), tabs[i]);
            prop_assert_eq!(tree.attr(tabs[i], "tabindex"), Some("0"));
            for j in 0..3 {
                prop_assert_eq!(tree.has_attr(panels[j], "hidden"), i != j);
            }
        }
    });
}

#[test]
fn prop_focus_never_leaves_open_modal() {
    let chords = prop::sample::select(vec!["Tab", "Shift+Tab", "ArrowDown", "Enter"]);
    proptest!(|(presses in prop::collection::vec(chords, 0..30))| {
        let mut rt = InteractionRuntime::from_html(MODAL, EngineConfig::default()).unwrap();
        let nodes = ids(&rt, &["open", "modal"]);
        let (open, modal) = (nodes[0], nodes[1]);
        rt.click(open).unwrap();

        for chord in presses {
            let target = rt.active_element();
            rt.key_down(target, KeyEvent::parse(chord)).unwrap();
            prop_assert!(rt.trap().is_open());
            prop_assert!(rt.document().tree.contains(modal, rt.active_element()));
        }

        let target = rt.active_element();
        rt.key_down(target, KeyEvent::parse("Escape")).unwrap();
        prop_assert_eq!(rt.active_element(), open);
    });
}
