//! In-page scroll affordances: smooth anchor jumps offset by the header,
//! and the floating scroll-to-top button.

use crate::config::EngineConfig;
use crate::constants::{HEADER_CLASS, SCROLL_TOP_CLASS, SCROLL_TOP_LABEL};
use crate::dom::{Document, NodeId, Tag};
use crate::effect::ScrollBehavior;

/// Routes clicks on fragment anchors to smooth scroll requests aimed
/// just under the fixed header.
#[derive(Debug)]
pub struct SmoothScroller {
    anchors: Vec<NodeId>,
}

impl SmoothScroller {
    pub(crate) fn mount(doc: &Document) -> Self {
        let anchors = doc
            .nodes()
            .filter(|n| n.tag == Tag::Anchor)
            .filter(|n| n.href.as_deref().is_some_and(|h| h.starts_with('#')))
            .map(|n| n.id)
            .collect();
        Self { anchors }
    }

    pub(crate) fn on_click(&self, doc: &mut Document, target: NodeId) {
        let Some(anchor) = self
            .anchors
            .iter()
            .copied()
            .find(|a| doc.contains(*a, target))
        else {
            return;
        };
        let Some(href) = doc.get(anchor).and_then(|n| n.href.clone()) else {
            return;
        };
        let fragment = &href[1..];
        if fragment.is_empty() {
            return;
        }
        let Some(dest) = doc.find(fragment) else {
            return;
        };
        // Anchor scrolling needs the header height to land the section
        // below it; without a header the whole feature stays inert.
        let Some(header) = doc.first_with_class(HEADER_CLASS) else {
            tracing::debug!(%href, "No header found, skipping anchor scroll");
            return;
        };
        let header_height = doc.get(header).map_or(0.0, |n| n.bounds.height);
        let top = doc.get(dest).map_or(0.0, |n| n.bounds.top) - header_height;
        doc.request_scroll(top, ScrollBehavior::Smooth);
    }
}

/// The engine-created button that floats in past a scroll depth and
/// jumps the page back to the top.
#[derive(Debug)]
pub struct ScrollTopButton {
    button: NodeId,
    visible: bool,
    threshold: f32,
}

impl ScrollTopButton {
    pub(crate) fn mount(doc: &mut Document, config: &EngineConfig) -> Self {
        let body = doc.body();
        let button = doc.create_element(body, Tag::Button, &[SCROLL_TOP_CLASS], SCROLL_TOP_LABEL);
        doc.set_style(button, "opacity", "0");
        Self {
            button,
            visible: false,
            threshold: config.scroll_top_threshold,
        }
    }

    pub(crate) fn on_scroll(&mut self, doc: &mut Document) {
        let show = doc.viewport().scroll_y > self.threshold;
        self.visible = show;
        doc.set_style(self.button, "opacity", if show { "1" } else { "0" });
    }

    pub(crate) fn on_click(&self, doc: &mut Document, target: NodeId) {
        if doc.contains(self.button, target) {
            doc.request_scroll(0.0, ScrollBehavior::Smooth);
        }
    }

    pub(crate) fn node(&self) -> NodeId {
        self.button
    }

    pub(crate) fn visible(&self) -> bool {
        self.visible
    }
}
