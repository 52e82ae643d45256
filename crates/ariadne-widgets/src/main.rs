//! Ariadne Demo - scripted session against the bundled documentation page

use anyhow::{Context, Result};
use ariadne_dom::{Key, KeyEvent, NodeId};
use ariadne_widgets::{EngineConfig, InteractionRuntime, DEMO_PAGE};
use tracing_subscriber::EnvFilter;

#[cfg(feature = "mimalloc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Optional page and JSON config paths
    let mut args = std::env::args().skip(1);
    let page = match args.next() {
        Some(path) => std::fs::read_to_string(&path).with_context(|| format!("reading page {path}"))?,
        None => DEMO_PAGE.to_string(),
    };
    let config = match args.next() {
        Some(path) => {
            let source = std::fs::read_to_string(&path).with_context(|| format!("reading config {path}"))?;
            EngineConfig::from_json(&source).with_context(|| format!("loading config {path}"))?
        }
        None => EngineConfig::default(),
    };

    let mut runtime = InteractionRuntime::from_html(&page, config)?;
    tracing::info!("widgets: {:?}", runtime.widget_kinds().collect::<Vec<_>>());
    let mut session = Session { runtime: &mut runtime, seen: 0 };

    if let Some(trigger) = session.by_id("open-dialog") {
        session.runtime.click(trigger)?;
        session.report("open dialog");
        for _ in 0..3 {
            session.key(Key::Tab)?;
        }
        session.key(Key::Escape)?;
        session.report("tab around and close");
    }

    if let Some(tab) = session.by_id("tab-1") {
        session.runtime.focus(tab)?;
        session.key(Key::ArrowRight)?;
        session.key(Key::End)?;
        session.report("tabs");
    }

    if let Some(content) = session.query(".tree-item-content") {
        session.runtime.click(content)?;
        session.key(Key::ArrowRight)?;
        session.key(Key::ArrowDown)?;
        session.key(Key::ArrowLeft)?;
        session.report("tree");
    }

    if let Some(input) = session.query(".chip-input") {
        session.runtime.input(input, "Beta")?;
        session.runtime.key_down(input, KeyEvent::new(Key::Enter))?;
        if let Some(remove) = session.query("button.chip-remove") {
            session.runtime.click(remove)?;
        }
        session.report("chips");
    }

    if let Some(trigger) = session.query(".tooltip-trigger") {
        session.runtime.focus(trigger)?;
        session.key(Key::Escape)?;
        session.report("tooltip");
    }

    let fired = session.runtime.advance(5000);
    println!("advanced 5000ms, {fired} timers fired, live: {:?}", session.runtime.live_messages());
    session.runtime.teardown();
    Ok(())
}

struct Session<'a> {
    runtime: &'a mut InteractionRuntime,
    seen: usize,
}

impl Session<'_> {
    fn by_id(&self, id: &str) -> Option<NodeId> {
        self.runtime.document().tree.get_element_by_id(id)
    }

    fn query(&self, selector: &str) -> Option<NodeId> {
        let tree = &self.runtime.document().tree;
        tree.query_selector(tree.root(), selector)
    }

    /// Key press on whatever has focus
    fn key(&mut self, key: Key) -> Result<()> {
        let target = self.runtime.active_element();
        self.runtime.key_down(target, KeyEvent::new(key))?;
        Ok(())
    }

    /// Print announcements made since the last report
    fn report(&mut self, step: &str) {
        println!("== {step}");
        let history: Vec<_> = self.runtime.announcer().history().collect();
        for announcement in history.iter().skip(self.seen) {
            println!(
                "  [{:>5}ms {}] {}",
                announcement.created_at_ms,
                announcement.politeness.as_str(),
                announcement.text
            );
        }
        self.seen = history.len();
    }
}
