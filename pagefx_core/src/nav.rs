//! Navigation behavior: the collapsible menu, the header's scrolled
//! style, and active-link tracking against the section under the reader.

use crate::config::EngineConfig;
use crate::constants::{
    ACTIVE_CLASS, HEADER_CLASS, MENU_ID, MENU_OPEN_CLASS, NAV_LINK_CLASS, SCROLLED_CLASS,
    TOGGLE_ID,
};
use crate::dom::{Document, NodeId, Tag};
use crate::timing::Throttle;

/// Owns the menu/header/active-link state and projects it onto the
/// document. The class lists always follow the state fields here, never
/// the other way around.
#[derive(Debug)]
pub struct NavController {
    toggle: Option<NodeId>,
    panel: Option<NodeId>,
    links: Vec<NodeId>,
    header: Option<NodeId>,
    /// Sections that carry an element id, in document order.
    sections: Vec<(NodeId, String)>,
    menu_open: bool,
    header_scrolled: bool,
    active_link: Option<NodeId>,
    resize_gate: Throttle,
    breakpoint: f32,
    header_threshold: f32,
    probe_offset: f32,
}

impl NavController {
    pub(crate) fn mount(doc: &Document, config: &EngineConfig) -> Self {
        let toggle = doc.find(TOGGLE_ID);
        let panel = doc.find(MENU_ID);
        let links = doc.with_class(NAV_LINK_CLASS);
        let header = doc.first_with_class(HEADER_CLASS);
        let sections: Vec<(NodeId, String)> = doc
            .nodes()
            .filter(|n| n.tag == Tag::Section)
            .filter_map(|n| n.elem_id.clone().map(|id| (n.id, id)))
            .collect();

        let menu_open = panel
            .and_then(|p| doc.get(p))
            .is_some_and(|n| n.has_class(ACTIVE_CLASS));
        let header_scrolled = header
            .and_then(|h| doc.get(h))
            .is_some_and(|n| n.has_class(SCROLLED_CLASS));
        let active_link = links
            .iter()
            .copied()
            .find(|l| doc.get(*l).is_some_and(|n| n.has_class(ACTIVE_CLASS)));

        tracing::debug!(
            links = links.len(),
            sections = sections.len(),
            menu = toggle.is_some() && panel.is_some(),
            "Navigation mounted"
        );

        Self {
            toggle,
            panel,
            links,
            header,
            sections,
            menu_open,
            header_scrolled,
            active_link,
            resize_gate: Throttle::new(config.resize_throttle_ms),
            breakpoint: config.mobile_breakpoint,
            header_threshold: config.header_scroll_threshold,
            probe_offset: config.nav_probe_offset,
        }
    }

    fn menu_bound(&self) -> Option<(NodeId, NodeId)> {
        Some((self.toggle?, self.panel?))
    }

    /// Click pass for handlers bound to the nav elements themselves:
    /// the toggle flips the menu, a nav link closes it.
    pub(crate) fn on_element_click(&mut self, doc: &mut Document, target: NodeId) {
        let Some((toggle, _)) = self.menu_bound() else {
            return;
        };
        if doc.contains(toggle, target) {
            let open = !self.menu_open;
            self.set_menu(doc, open);
            return;
        }
        if self
            .links
            .iter()
            .any(|link| doc.contains(*link, target))
        {
            self.set_menu(doc, false);
        }
    }

    /// Click pass for the document-level handler: anything outside both
    /// the toggle and the panel closes the menu.
    pub(crate) fn on_document_click(&mut self, doc: &mut Document, target: NodeId) {
        let Some((toggle, panel)) = self.menu_bound() else {
            return;
        };
        if !doc.contains(toggle, target) && !doc.contains(panel, target) {
            self.set_menu(doc, false);
        }
    }

    pub(crate) fn on_scroll(&mut self, doc: &mut Document) {
        self.project_header(doc);
        self.track_active_link(doc);
    }

    /// Resize handling behind the leading-edge throttle. Growing past the
    /// breakpoint closes a menu left open from the narrow layout.
    pub(crate) fn on_resize(&mut self, doc: &mut Document, now_ms: u64) {
        if !self.resize_gate.admit(now_ms) {
            return;
        }
        if doc.viewport().width > self.breakpoint && self.menu_bound().is_some() && self.menu_open {
            self.set_menu(doc, false);
        }
    }

    fn set_menu(&mut self, doc: &mut Document, open: bool) {
        let Some((toggle, panel)) = self.menu_bound() else {
            return;
        };
        self.menu_open = open;
        let body = doc.body();
        if open {
            doc.add_class(toggle, ACTIVE_CLASS);
            doc.add_class(panel, ACTIVE_CLASS);
            doc.add_class(body, MENU_OPEN_CLASS);
        } else {
            doc.remove_class(toggle, ACTIVE_CLASS);
            doc.remove_class(panel, ACTIVE_CLASS);
            doc.remove_class(body, MENU_OPEN_CLASS);
        }
    }

    fn project_header(&mut self, doc: &mut Document) {
        let Some(header) = self.header else {
            return;
        };
        let scrolled = doc.viewport().scroll_y > self.header_threshold;
        self.header_scrolled = scrolled;
        if scrolled {
            doc.add_class(header, SCROLLED_CLASS);
        } else {
            doc.remove_class(header, SCROLLED_CLASS);
        }
    }

    /// Marks the link pointing at the section under the probe line. When
    /// the probe falls between sections the previous marking is kept.
    fn track_active_link(&mut self, doc: &mut Document) {
        if self.sections.is_empty() || self.links.is_empty() {
            return;
        }
        let probe = doc.viewport().scroll_y + self.probe_offset;
        let mut fragment: Option<String> = None;
        for (section, elem_id) in &self.sections {
            let Some(node) = doc.get(*section) else {
                continue;
            };
            if probe >= node.bounds.top && probe < node.bounds.bottom() {
                fragment = Some(format!("#{elem_id}"));
            }
        }
        let Some(fragment) = fragment else {
            return;
        };

        let links = self.links.clone();
        for link in &links {
            doc.remove_class(*link, ACTIVE_CLASS);
        }
        self.active_link = None;
        for link in &links {
            let matches = doc
                .get(*link)
                .and_then(|n| n.href.as_deref())
                .is_some_and(|href| href == fragment);
            if matches {
                doc.add_class(*link, ACTIVE_CLASS);
                self.active_link = Some(*link);
            }
        }
    }

    pub(crate) fn menu_open(&self) -> bool {
        self.menu_open
    }

    pub(crate) fn header_scrolled(&self) -> bool {
        self.header_scrolled
    }

    pub(crate) fn active_link(&self) -> Option<NodeId> {
        self.active_link
    }
}
