//! Viewport intersection tracking.
//!
//! Models the platform observer the page relies on: targets are
//! registered, each one gets an initial visibility report, and after
//! that only transitions produce entries. The observation root is the
//! viewport, optionally shrunk at the bottom edge so elements count as
//! visible only once they are some way into view.

use crate::dom::{Bounds, Document, NodeId, Viewport};

/// Observer tuning, matching the platform's threshold and root margin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObserverOptions {
    /// Fraction of the target that must be inside the root. Zero means
    /// any overlap at all.
    pub threshold: f32,
    /// Amount the root's bottom edge is pulled up, in px.
    pub bottom_margin: f32,
}

impl Default for ObserverOptions {
    fn default() -> Self {
        Self {
            threshold: 0.0,
            bottom_margin: 0.0,
        }
    }
}

/// One visibility report for one target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Entry {
    pub node: NodeId,
    pub intersecting: bool,
    pub ratio: f32,
}

#[derive(Debug)]
struct Watched {
    node: NodeId,
    /// Last state reported to the consumer. None until the initial report.
    reported: Option<bool>,
}

/// Tracks a set of targets against the viewport and reports visibility
/// changes as [`Entry`] values.
#[derive(Debug)]
pub struct ViewObserver {
    options: ObserverOptions,
    targets: Vec<Watched>,
}

impl ViewObserver {
    pub fn new(options: ObserverOptions) -> Self {
        Self {
            options,
            targets: Vec::new(),
        }
    }

    /// Registers a target. Observing the same node twice is a no-op.
    pub fn observe(&mut self, node: NodeId) {
        if self.targets.iter().any(|w| w.node == node) {
            return;
        }
        self.targets.push(Watched {
            node,
            reported: None,
        });
    }

    /// Stops watching a target. No further entries are produced for it.
    pub fn unobserve(&mut self, node: NodeId) {
        self.targets.retain(|w| w.node != node);
    }

    pub fn observed(&self) -> usize {
        self.targets.len()
    }

    /// Evaluates every target against the current viewport. Fresh targets
    /// always produce an entry; the rest only when their visibility
    /// flipped since the last report. Targets gone from the document are
    /// skipped.
    pub fn take_entries(&mut self, doc: &Document) -> Vec<Entry> {
        let viewport = doc.viewport();
        let mut entries = Vec::new();
        for watched in &mut self.targets {
            let Some(node) = doc.get(watched.node) else {
                continue;
            };
            let ratio = intersection_ratio(node.bounds, viewport, self.options.bottom_margin);
            let intersecting = meets_threshold(ratio, self.options.threshold);
            let changed = match watched.reported {
                None => true,
                Some(previous) => previous != intersecting,
            };
            if changed {
                watched.reported = Some(intersecting);
                entries.push(Entry {
                    node: watched.node,
                    intersecting,
                    ratio,
                });
            }
        }
        entries
    }
}

/// Fraction of `bounds` inside the observation root. Zero-height targets
/// report 1.0 when their top edge sits inside the root.
fn intersection_ratio(bounds: Bounds, viewport: Viewport, bottom_margin: f32) -> f32 {
    let root_top = viewport.scroll_y;
    let root_bottom = viewport.scroll_y + viewport.height - bottom_margin;
    if root_bottom <= root_top {
        return 0.0;
    }
    if bounds.height <= 0.0 {
        return if bounds.top >= root_top && bounds.top <= root_bottom {
            1.0
        } else {
            0.0
        };
    }
    let visible = (bounds.bottom().min(root_bottom) - bounds.top.max(root_top)).max(0.0);
    visible / bounds.height
}

fn meets_threshold(ratio: f32, threshold: f32) -> bool {
    if threshold <= 0.0 {
        ratio > 0.0
    } else {
        ratio >= threshold
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{NodeSpec, Tag};
    use pretty_assertions::assert_eq;

    fn doc_with_target(top: f32, height: f32) -> (Document, NodeId) {
        let mut doc = Document::new(Viewport::new(1280.0, 800.0), 4000.0);
        let node = doc
            .insert(NodeSpec::new(Tag::Section).with_bounds(top, height))
            .unwrap();
        (doc, node)
    }

    #[test]
    fn test_ratio_fully_visible() {
        let viewport = Viewport::new(1280.0, 800.0);
        let ratio = intersection_ratio(Bounds::new(100.0, 200.0), viewport, 0.0);
        assert_eq!(ratio, 1.0);
    }

    #[test]
    fn test_ratio_partially_below_fold() {
        let viewport = Viewport::new(1280.0, 800.0);
        // 700..900 against a root ending at 800: half visible.
        let ratio = intersection_ratio(Bounds::new(700.0, 200.0), viewport, 0.0);
        assert_eq!(ratio, 0.5);
    }

    #[test]
    fn test_bottom_margin_shrinks_the_root() {
        let viewport = Viewport::new(1280.0, 800.0);
        // With the bottom pulled up 50px the root ends at 750.
        let ratio = intersection_ratio(Bounds::new(740.0, 100.0), viewport, 50.0);
        assert_eq!(ratio, 0.1);
        let ratio = intersection_ratio(Bounds::new(750.0, 100.0), viewport, 50.0);
        assert_eq!(ratio, 0.0);
    }

    #[test]
    fn test_zero_height_target_inside_root() {
        let viewport = Viewport::new(1280.0, 800.0);
        assert_eq!(intersection_ratio(Bounds::new(400.0, 0.0), viewport, 0.0), 1.0);
        assert_eq!(intersection_ratio(Bounds::new(900.0, 0.0), viewport, 0.0), 0.0);
    }

    #[test]
    fn test_initial_entry_reports_current_state() {
        let (doc, node) = doc_with_target(100.0, 200.0);
        let mut observer = ViewObserver::new(ObserverOptions {
            threshold: 0.1,
            bottom_margin: 50.0,
        });
        observer.observe(node);

        let entries = observer.take_entries(&doc);
        assert_eq!(entries.len(), 1);
        assert!(entries[0].intersecting);

        // Nothing changed, so nothing further is reported.
        assert!(observer.take_entries(&doc).is_empty());
    }

    #[test]
    fn test_transition_reported_once() {
        let (mut doc, node) = doc_with_target(2000.0, 400.0);
        let mut observer = ViewObserver::new(ObserverOptions {
            threshold: 0.1,
            bottom_margin: 50.0,
        });
        observer.observe(node);

        let initial = observer.take_entries(&doc);
        assert!(!initial[0].intersecting);

        doc.sync_scroll(1800.0);
        let entries = observer.take_entries(&doc);
        assert_eq!(entries.len(), 1);
        assert!(entries[0].intersecting);

        doc.sync_scroll(1810.0);
        assert!(observer.take_entries(&doc).is_empty());
    }

    #[test]
    fn test_unobserve_stops_reports() {
        let (mut doc, node) = doc_with_target(2000.0, 400.0);
        let mut observer = ViewObserver::new(ObserverOptions::default());
        observer.observe(node);
        observer.take_entries(&doc);

        observer.unobserve(node);
        doc.sync_scroll(1800.0);
        assert!(observer.take_entries(&doc).is_empty());
        assert_eq!(observer.observed(), 0);
    }

    #[test]
    fn test_observe_is_idempotent() {
        let (doc, node) = doc_with_target(100.0, 100.0);
        let mut observer = ViewObserver::new(ObserverOptions::default());
        observer.observe(node);
        observer.observe(node);
        assert_eq!(observer.observed(), 1);
        assert_eq!(observer.take_entries(&doc).len(), 1);
    }
}
