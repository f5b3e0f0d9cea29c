//! The engine: owns the document, the components, and the virtual clock,
//! and turns host events into journaled effects.
//!
//! Click routing mirrors event bubbling on the page: handlers bound to
//! specific elements run first (menu toggle, nav links, anchors, the
//! scroll-to-top button), then the document-level outside-click pass
//! that collapses the menu. Scroll updates the viewport before any
//! handler looks at it, and observer entries are evaluated last.
//!
//! Time never moves on its own. `dispatch` runs at the current instant
//! and finishes by draining timers that are already due, which is how
//! zero-delay work (the first stagger step) runs immediately after the
//! event that queued it. Hosts move the clock with [`Engine::advance`].

use crate::config::EngineConfig;
use crate::contact::ContactExtras;
use crate::dom::{Document, NodeId};
use crate::effect::EffectRecord;
use crate::error::EngineResult;
use crate::event::Event;
use crate::form::{FormHandler, FormPhase};
use crate::lazy::LazyImages;
use crate::nav::NavController;
use crate::reveal::RevealAnimator;
use crate::scrolling::{ScrollTopButton, SmoothScroller};
use crate::timing::TimerQueue;

/// Deferred work queued against the virtual clock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum TimerTask {
    StaggerReveal { node: NodeId },
    CompleteSubmission { form: NodeId },
    BannerFadeIn { banner: NodeId },
    BannerFadeOut { banner: NodeId },
    BannerRemove { banner: NodeId },
}

pub struct Engine {
    doc: Document,
    now_ms: u64,
    timers: TimerQueue<TimerTask>,
    nav: NavController,
    anchors: SmoothScroller,
    reveal: RevealAnimator,
    forms: FormHandler,
    lazy: LazyImages,
    contact: ContactExtras,
    to_top: ScrollTopButton,
}

impl Engine {
    /// Binds every behavior to the document, in the order the page wires
    /// them up, then runs the observers' initial pass.
    pub fn mount(mut doc: Document, config: EngineConfig) -> Self {
        doc.set_now(0);
        let nav = NavController::mount(&doc, &config);
        let reveal = RevealAnimator::mount(&doc, &config);
        let anchors = SmoothScroller::mount(&doc);
        let forms = FormHandler::mount(&doc, &config);
        let lazy = LazyImages::mount(&mut doc, &config);
        let contact = ContactExtras::mount(&mut doc, &config);
        let to_top = ScrollTopButton::mount(&mut doc, &config);

        let mut engine = Self {
            doc,
            now_ms: 0,
            timers: TimerQueue::new(),
            nav,
            anchors,
            reveal,
            forms,
            lazy,
            contact,
            to_top,
        };
        engine.evaluate_observers();
        engine.drain_due();
        tracing::info!(nodes = engine.doc.node_count(), "Engine mounted");
        engine
    }

    /// Handles one host event at the current instant, then runs any
    /// timer work that became due.
    pub fn dispatch(&mut self, event: Event) -> EngineResult<()> {
        self.doc.set_now(self.now_ms);
        match event {
            Event::Click { target } => {
                self.doc.ensure_alive(target)?;
                self.nav.on_element_click(&mut self.doc, target);
                self.anchors.on_click(&mut self.doc, target);
                self.to_top.on_click(&mut self.doc, target);
                self.nav.on_document_click(&mut self.doc, target);
            }
            Event::Scroll { y } => {
                self.doc.sync_scroll(y);
                self.nav.on_scroll(&mut self.doc);
                self.to_top.on_scroll(&mut self.doc);
                self.evaluate_observers();
            }
            Event::Resize { width, height } => {
                self.doc.sync_size(width, height);
                self.nav.on_resize(&mut self.doc, self.now_ms);
                self.evaluate_observers();
            }
            Event::Input { field, value } => {
                self.doc.sync_field_value(field, &value)?;
                self.forms.on_input(&mut self.doc, field);
                self.contact.on_input(&mut self.doc, field);
            }
            Event::Blur { field } => {
                self.doc.ensure_field(field)?;
                self.forms.on_blur(&mut self.doc, field);
            }
            Event::Submit { form } => {
                self.doc.ensure_form(form)?;
                self.forms
                    .on_submit(&mut self.doc, form, self.now_ms, &mut self.timers);
            }
        }
        self.drain_due();
        Ok(())
    }

    /// Moves the clock forward, running due timers in deadline order.
    pub fn advance(&mut self, ms: u64) {
        self.advance_to(self.now_ms.saturating_add(ms));
    }

    /// Moves the clock to an absolute instant. Earlier instants are a
    /// no-op; the clock never runs backwards.
    pub fn advance_to(&mut self, deadline_ms: u64) {
        let target = deadline_ms.max(self.now_ms);
        while let Some((due, task)) = self.timers.pop_due(target) {
            self.now_ms = self.now_ms.max(due);
            self.doc.set_now(self.now_ms);
            self.run_task(task);
        }
        self.now_ms = target;
        self.doc.set_now(target);
    }

    fn drain_due(&mut self) {
        while let Some((_, task)) = self.timers.pop_due(self.now_ms) {
            self.run_task(task);
        }
    }

    fn run_task(&mut self, task: TimerTask) {
        match task {
            TimerTask::StaggerReveal { node } => self.reveal.animate(&mut self.doc, node),
            TimerTask::CompleteSubmission { form } => {
                self.forms
                    .complete_submission(&mut self.doc, form, self.now_ms, &mut self.timers)
            }
            TimerTask::BannerFadeIn { banner } => self.forms.banner_fade_in(&mut self.doc, banner),
            TimerTask::BannerFadeOut { banner } => {
                self.forms
                    .banner_fade_out(&mut self.doc, banner, self.now_ms, &mut self.timers)
            }
            TimerTask::BannerRemove { banner } => self.forms.banner_remove(&mut self.doc, banner),
        }
    }

    fn evaluate_observers(&mut self) {
        self.reveal
            .evaluate(&mut self.doc, self.now_ms, &mut self.timers);
        self.lazy.evaluate(&mut self.doc);
    }

    pub fn document(&self) -> &Document {
        &self.doc
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Earliest pending timer, for hosts that want to sleep until then.
    pub fn next_deadline(&self) -> Option<u64> {
        self.timers.next_deadline()
    }

    /// True when no deferred work is pending.
    pub fn idle(&self) -> bool {
        self.timers.is_empty()
    }

    /// Takes everything journaled since the last call.
    pub fn take_effects(&mut self) -> Vec<EffectRecord> {
        self.doc.drain_journal()
    }

    pub fn menu_open(&self) -> bool {
        self.nav.menu_open()
    }

    pub fn header_scrolled(&self) -> bool {
        self.nav.header_scrolled()
    }

    pub fn active_link(&self) -> Option<NodeId> {
        self.nav.active_link()
    }

    pub fn form_phase(&self, form: NodeId) -> Option<FormPhase> {
        self.forms.phase(form)
    }

    pub fn form_error_count(&self, form: NodeId) -> usize {
        self.forms.error_count(form)
    }

    pub fn is_animated(&self, node: NodeId) -> bool {
        self.reveal.is_animated(node)
    }

    pub fn animated_count(&self) -> usize {
        self.reveal.animated_count()
    }

    pub fn pending_images(&self) -> usize {
        self.lazy.pending()
    }

    pub fn scroll_top_visible(&self) -> bool {
        self.to_top.visible()
    }

    pub fn counter_warning(&self, textarea: NodeId) -> Option<bool> {
        self.contact.counter_warning(textarea)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{FieldControl, NodeSpec, Tag, Viewport};
    use crate::effect::Effect;
    use crate::error::EngineError;
    use assert_matches::assert_matches;
    use pretty_assertions::assert_eq;

    fn page() -> Document {
        let mut doc = Document::new(Viewport::new(390.0, 844.0), 3000.0);
        doc.insert(
            NodeSpec::new(Tag::Header)
                .with_id("header")
                .with_class("header")
                .with_bounds(0.0, 80.0),
        )
        .unwrap();
        doc.insert(
            NodeSpec::new(Tag::Button)
                .with_id("hamburger")
                .with_parent("header"),
        )
        .unwrap();
        doc.insert(NodeSpec::new(Tag::Nav).with_id("navMenu").with_parent("header"))
            .unwrap();
        doc.insert(
            NodeSpec::new(Tag::Section)
                .with_id("home")
                .with_bounds(0.0, 900.0),
        )
        .unwrap();
        doc.insert(
            NodeSpec::new(Tag::Form)
                .with_id("contactForm")
                .with_parent("home"),
        )
        .unwrap();
        doc.insert(
            NodeSpec::new(Tag::Input)
                .with_id("email")
                .with_parent("contactForm")
                .as_field(FieldControl::Email, true)
                .with_name("email"),
        )
        .unwrap();
        doc.insert(
            NodeSpec::new(Tag::Button)
                .with_id("send")
                .with_parent("contactForm")
                .as_submit("送信する"),
        )
        .unwrap();
        doc
    }

    #[test]
    fn test_toggle_click_survives_document_pass() {
        let mut engine = Engine::mount(page(), EngineConfig::default());
        let toggle = engine.document().find("hamburger").unwrap();

        // The element pass opens the menu; the document pass must not
        // immediately close it, because the click landed on the toggle.
        engine.dispatch(Event::Click { target: toggle }).unwrap();
        assert!(engine.menu_open());

        let outside = engine.document().find("home").unwrap();
        engine.dispatch(Event::Click { target: outside }).unwrap();
        assert!(!engine.menu_open());
    }

    #[test]
    fn test_submission_lifecycle_on_the_virtual_clock() {
        let mut engine = Engine::mount(page(), EngineConfig::default());
        let form = engine.document().find("contactForm").unwrap();
        let email = engine.document().find("email").unwrap();
        let send = engine.document().find("send").unwrap();

        engine
            .dispatch(Event::Input {
                field: email,
                value: "a@b.co".to_string(),
            })
            .unwrap();
        engine.dispatch(Event::Submit { form }).unwrap();

        assert_eq!(engine.form_phase(form), Some(FormPhase::Submitting));
        let button = engine.document().get(send).unwrap().button.as_ref().unwrap();
        assert_eq!(button.label, "送信中...");
        assert!(button.disabled);

        // Re-entry while in flight is swallowed.
        engine.dispatch(Event::Submit { form }).unwrap();
        assert_eq!(engine.next_deadline(), Some(2000));

        engine.advance(2000);
        assert_eq!(engine.form_phase(form), Some(FormPhase::Idle));
        let button = engine.document().get(send).unwrap().button.as_ref().unwrap();
        assert_eq!(button.label, "送信する");
        assert!(!button.disabled);
        assert!(engine
            .document()
            .nodes()
            .any(|n| n.has_class("success-message")));

        // Fade in at +100, fade out at +5000, removal 300 later.
        engine.advance(5300);
        assert!(engine.idle());
        assert!(!engine
            .document()
            .nodes()
            .any(|n| n.has_class("success-message")));
    }

    #[test]
    fn test_submission_effect_order() {
        let mut engine = Engine::mount(page(), EngineConfig::default());
        let form = engine.document().find("contactForm").unwrap();
        let email = engine.document().find("email").unwrap();

        engine
            .dispatch(Event::Input {
                field: email,
                value: "a@b.co".to_string(),
            })
            .unwrap();
        engine.take_effects();
        engine.dispatch(Event::Submit { form }).unwrap();
        engine.advance(10_000);

        let effects: Vec<Effect> = engine.take_effects().into_iter().map(|r| r.effect).collect();
        let started = effects
            .iter()
            .position(|e| matches!(e, Effect::SubmissionStarted { .. }))
            .unwrap();
        let completed = effects
            .iter()
            .position(|e| matches!(e, Effect::SubmissionCompleted { .. }))
            .unwrap();
        assert!(started < completed);

        if let Effect::SubmissionStarted { data, .. } = &effects[started] {
            assert_eq!(data, &vec![("email".to_string(), "a@b.co".to_string())]);
        }
    }

    #[test]
    fn test_clock_only_moves_forward() {
        let mut engine = Engine::mount(page(), EngineConfig::default());
        engine.advance(500);
        engine.advance_to(200);
        assert_eq!(engine.now_ms(), 500);
    }

    #[test]
    fn test_click_on_unknown_node_is_an_error() {
        let mut engine = Engine::mount(page(), EngineConfig::default());
        let bogus = NodeId::from_index(999);
        assert_matches!(
            engine.dispatch(Event::Click { target: bogus }),
            Err(EngineError::UnknownNode(_))
        );
    }

    #[test]
    fn test_scroll_projects_header_and_button_in_one_dispatch() {
        let mut engine = Engine::mount(page(), EngineConfig::default());
        engine.take_effects();

        engine.dispatch(Event::Scroll { y: 400.0 }).unwrap();
        assert!(engine.header_scrolled());
        assert!(engine.scroll_top_visible());

        let effects = engine.take_effects();
        let scrolled_at = effects
            .iter()
            .position(|r| matches!(&r.effect, Effect::ClassAdded { class, .. } if class == "scrolled"))
            .unwrap();
        let opacity_at = effects
            .iter()
            .position(|r| {
                matches!(&r.effect, Effect::StyleSet { property, value, .. }
                    if property == "opacity" && value == "1")
            })
            .unwrap();
        assert!(scrolled_at < opacity_at);
    }
}
