//! Scroll-triggered reveal animations.
//!
//! Sections and a handful of card-like elements get an `animate` class
//! once they intersect the viewport; grid containers additionally fan
//! the class out to their items on a staggered timer, one step per item.

use std::collections::HashSet;

use crate::config::EngineConfig;
use crate::constants::{ANIMATE_CLASS, GRID_CONTAINER_CLASS, GRID_ITEM_CLASSES, REVEAL_TARGET_CLASSES};
use crate::dom::{Document, NodeId, Tag};
use crate::engine::TimerTask;
use crate::observer::{ObserverOptions, ViewObserver};
use crate::timing::TimerQueue;

#[derive(Debug)]
pub struct RevealAnimator {
    observer: ViewObserver,
    /// Nodes currently carrying the animate class.
    animated: HashSet<NodeId>,
    stagger_step: u64,
}

impl RevealAnimator {
    pub(crate) fn mount(doc: &Document, config: &EngineConfig) -> Self {
        let mut observer = ViewObserver::new(ObserverOptions {
            threshold: config.reveal_threshold,
            bottom_margin: config.reveal_bottom_margin,
        });
        for section in doc.with_tag(Tag::Section) {
            observer.observe(section);
        }
        for class in REVEAL_TARGET_CLASSES {
            for node in doc.with_class(class) {
                observer.observe(node);
            }
        }
        let animated = doc
            .nodes()
            .filter(|n| n.has_class(ANIMATE_CLASS))
            .map(|n| n.id)
            .collect();
        tracing::debug!(targets = observer.observed(), "Reveal targets registered");
        Self {
            observer,
            animated,
            stagger_step: config.stagger_step_ms,
        }
    }

    /// Consumes pending observer entries. Every target entering view is
    /// revealed; grid containers also queue their items, spaced one
    /// stagger step apart starting at zero.
    pub(crate) fn evaluate(
        &mut self,
        doc: &mut Document,
        now_ms: u64,
        timers: &mut TimerQueue<TimerTask>,
    ) {
        for entry in self.observer.take_entries(doc) {
            if !entry.intersecting {
                continue;
            }
            self.animate(doc, entry.node);
            let is_grid = doc
                .get(entry.node)
                .is_some_and(|n| n.has_class(GRID_CONTAINER_CLASS));
            if is_grid {
                for (index, item) in grid_items(doc, entry.node).into_iter().enumerate() {
                    timers.schedule(
                        now_ms + index as u64 * self.stagger_step,
                        TimerTask::StaggerReveal { node: item },
                    );
                }
            }
        }
    }

    pub(crate) fn animate(&mut self, doc: &mut Document, node: NodeId) {
        self.animated.insert(node);
        doc.add_class(node, ANIMATE_CLASS);
    }

    pub(crate) fn is_animated(&self, node: NodeId) -> bool {
        self.animated.contains(&node)
    }

    pub(crate) fn animated_count(&self) -> usize {
        self.animated.len()
    }
}

/// Grid items below `container`, in document order.
fn grid_items(doc: &Document, container: NodeId) -> Vec<NodeId> {
    doc.nodes()
        .filter(|n| n.id != container)
        .filter(|n| GRID_ITEM_CLASSES.iter().any(|class| n.has_class(class)))
        .filter(|n| doc.contains(container, n.id))
        .map(|n| n.id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{NodeSpec, Viewport};
    use pretty_assertions::assert_eq;

    fn page() -> Document {
        let mut doc = Document::new(Viewport::new(1280.0, 800.0), 4000.0);
        doc.insert(
            NodeSpec::new(Tag::Section)
                .with_id("about")
                .with_bounds(1200.0, 800.0),
        )
        .unwrap();
        doc.insert(
            NodeSpec::new(Tag::Div)
                .with_id("aboutGrid")
                .with_class("grid-container")
                .with_parent("about")
                .with_bounds(1300.0, 600.0),
        )
        .unwrap();
        for i in 0..3 {
            doc.insert(
                NodeSpec::new(Tag::Div)
                    .with_class("about-item")
                    .with_parent("aboutGrid")
                    .with_bounds(1320.0 + 200.0 * i as f32, 180.0),
            )
            .unwrap();
        }
        doc
    }

    #[test]
    fn test_mount_registers_sections_and_reveal_targets() {
        let doc = page();
        let reveal = RevealAnimator::mount(&doc, &EngineConfig::default());
        // One section plus three about-items; the grid container itself
        // carries no reveal class.
        assert_eq!(reveal.observer.observed(), 4);
    }

    #[test]
    fn test_target_entering_view_gets_animate_class() {
        let mut doc = page();
        let mut reveal = RevealAnimator::mount(&doc, &EngineConfig::default());
        let mut timers = TimerQueue::new();
        let section = doc.find("about").unwrap();

        reveal.evaluate(&mut doc, 0, &mut timers);
        assert!(!reveal.is_animated(section));

        doc.sync_scroll(1000.0);
        reveal.evaluate(&mut doc, 0, &mut timers);
        assert!(reveal.is_animated(section));
        assert!(doc.get(section).unwrap().has_class("animate"));
    }

    #[test]
    fn test_grid_container_staggers_its_items() {
        let mut doc = page();
        let grid = doc
            .insert(
                NodeSpec::new(Tag::Div)
                    .with_id("lateGrid")
                    .with_class("grid-container")
                    .with_class("company-info-grid")
                    .with_bounds(3000.0, 500.0),
            )
            .unwrap();
        for _ in 0..2 {
            doc.insert(
                NodeSpec::new(Tag::Div)
                    .with_class("grid-item")
                    .with_parent("lateGrid")
                    .with_bounds(3050.0, 180.0),
            )
            .unwrap();
        }

        let mut reveal = RevealAnimator::mount(&doc, &EngineConfig::default());
        let mut timers = TimerQueue::new();
        reveal.evaluate(&mut doc, 0, &mut timers);
        assert!(timers.is_empty());

        doc.sync_scroll(2800.0);
        reveal.evaluate(&mut doc, 500, &mut timers);
        assert!(reveal.is_animated(grid));

        // Items are queued at 0ms and one stagger step apart.
        assert_eq!(timers.next_deadline(), Some(500));
        let (first_due, TimerTask::StaggerReveal { node: first }) =
            timers.pop_due(1000).unwrap()
        else {
            panic!("expected a stagger task");
        };
        let (second_due, TimerTask::StaggerReveal { node: second }) =
            timers.pop_due(1000).unwrap()
        else {
            panic!("expected a stagger task");
        };
        assert_eq!(first_due, 500);
        assert_eq!(second_due, 600);
        assert!(first < second);
    }

    #[test]
    fn test_reentering_view_is_harmless() {
        let mut doc = page();
        let mut reveal = RevealAnimator::mount(&doc, &EngineConfig::default());
        let mut timers = TimerQueue::new();
        let section = doc.find("about").unwrap();

        doc.sync_scroll(1000.0);
        reveal.evaluate(&mut doc, 0, &mut timers);
        doc.sync_scroll(0.0);
        reveal.evaluate(&mut doc, 0, &mut timers);
        doc.sync_scroll(1000.0);
        reveal.evaluate(&mut doc, 0, &mut timers);

        assert!(reveal.is_animated(section));
        let animate_adds = doc
            .journal()
            .iter()
            .filter(|r| {
                matches!(
                    &r.effect,
                    crate::effect::Effect::ClassAdded { node, class }
                        if *node == section && class == "animate"
                )
            })
            .count();
        assert_eq!(animate_adds, 1);
    }
}
