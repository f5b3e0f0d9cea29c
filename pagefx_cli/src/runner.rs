//! Scenario replay: mounts the page, feeds the script through the
//! engine clock and collects everything the page did along the way.
//!
//! The runner stands in for the browser around the engine: it answers
//! scroll requests by moving the viewport, and it either sleeps out the
//! gaps between steps in wall-clock time or jumps them in fast mode.

use std::time::Duration;

use anyhow::Result;
use chrono::{DateTime, Utc};
use pagefx_core::{Effect, EffectRecord, Engine, Event};
use serde::Serialize;

use crate::scenario::{resolve_event, Scenario};

#[derive(Debug, Clone, Copy, Default)]
pub struct RunOptions {
    /// Skip wall-clock waits and drive the engine clock directly.
    pub fast: bool,
}

/// Everything a replay produced, ready for rendering or JSON output.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub scenario: String,
    pub generated_at: DateTime<Utc>,
    pub steps: usize,
    pub duration_ms: u64,
    pub effects: Vec<EffectRecord>,
    pub summary: StateSummary,
}

/// Final page state once the script and every pending timer ran out.
#[derive(Debug, Clone, Serialize)]
pub struct StateSummary {
    pub scroll_y: f32,
    pub menu_open: bool,
    pub header_scrolled: bool,
    pub active_link: Option<String>,
    pub animated_targets: usize,
    pub pending_images: usize,
    pub scroll_top_visible: bool,
}

pub async fn run(scenario: &Scenario, options: &RunOptions) -> Result<RunReport> {
    let doc = scenario.build_document()?;
    let mut engine = Engine::mount(doc, scenario.config.clone());
    let mut effects = engine.take_effects();

    for step in &scenario.script {
        let wait = step.at_ms.saturating_sub(engine.now_ms());
        if wait > 0 {
            if !options.fast {
                tokio::time::sleep(Duration::from_millis(wait)).await;
            }
            engine.advance(wait);
        }
        let event = resolve_event(engine.document(), &step.event)?;
        tracing::debug!(at_ms = step.at_ms, ?event, "Dispatching step");
        engine.dispatch(event)?;

        // Play the browser: a requested scroll actually moves the
        // viewport, which the page then observes as a scroll event.
        let batch = engine.take_effects();
        for record in &batch {
            if let Effect::ScrollRequested { top, .. } = record.effect {
                engine.dispatch(Event::Scroll { y: top })?;
            }
        }
        effects.extend(batch);
        effects.extend(engine.take_effects());
    }

    // Let whatever the script left behind play out.
    while let Some(deadline) = engine.next_deadline() {
        let wait = deadline.saturating_sub(engine.now_ms());
        if !options.fast && wait > 0 {
            tokio::time::sleep(Duration::from_millis(wait)).await;
        }
        engine.advance_to(deadline);
    }
    effects.extend(engine.take_effects());

    let active_link = engine
        .active_link()
        .and_then(|id| engine.document().get(id))
        .map(|n| n.text.clone());
    let summary = StateSummary {
        scroll_y: engine.document().viewport().scroll_y,
        menu_open: engine.menu_open(),
        header_scrolled: engine.header_scrolled(),
        active_link,
        animated_targets: engine.animated_count(),
        pending_images: engine.pending_images(),
        scroll_top_visible: engine.scroll_top_visible(),
    };
    tracing::info!(
        effects = effects.len(),
        duration_ms = engine.now_ms(),
        "Replay finished"
    );

    Ok(RunReport {
        scenario: scenario.name.clone(),
        generated_at: Utc::now(),
        steps: scenario.script.len(),
        duration_ms: engine.now_ms(),
        effects,
        summary,
    })
}
