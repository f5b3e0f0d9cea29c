//! Form validation and the simulated submission round trip.
//!
//! Field errors surface on blur, clear on input, and block submission
//! when a required field fails. A passing submit disables the button,
//! waits out the configured round-trip delay, then resets the form and
//! floats a success banner over the page for a few seconds.
//!
//! Validation messages are the page's own, so they are in Japanese.

use std::collections::HashMap;

use lazy_static::lazy_static;
use regex::Regex;

use crate::config::EngineConfig;
use crate::constants::{
    ERROR_CLASS, ERROR_COLOR, FIELD_ERROR_CLASS, MSG_EMAIL, MSG_PHONE, MSG_REQUIRED,
    MSG_SUBMITTING, MSG_SUCCESS, SUCCESS_BANNER_CLASS,
};
use crate::dom::{Document, FieldControl, NodeId, Tag};
use crate::effect::Effect;
use crate::engine::TimerTask;
use crate::timing::TimerQueue;

lazy_static! {
    static ref EMAIL_RE: Regex =
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid");
    // ASCII digits only: full-width IME digits are not a valid number.
    static ref PHONE_RE: Regex = Regex::new(r"^[0-9-]+$").expect("phone pattern is valid");
}

/// Where a form is in its lifecycle. `Invalid` means the last submit
/// attempt failed validation; any input to the form returns it to Idle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormPhase {
    #[default]
    Idle,
    Invalid,
    Submitting,
}

/// Validates one field value against its control type. Values are
/// trimmed first; an empty optional field is always fine.
pub(crate) fn field_error(
    control: FieldControl,
    required: bool,
    raw: &str,
) -> Option<&'static str> {
    let value = raw.trim();
    if value.is_empty() {
        return required.then_some(MSG_REQUIRED);
    }
    match control {
        FieldControl::Email if !EMAIL_RE.is_match(value) => Some(MSG_EMAIL),
        FieldControl::Tel if !PHONE_RE.is_match(value) => Some(MSG_PHONE),
        _ => None,
    }
}

#[derive(Debug)]
struct FormUnit {
    form: NodeId,
    fields: Vec<NodeId>,
    submit: Option<NodeId>,
    phase: FormPhase,
    /// Field to its mounted error element, while one is showing.
    errors: HashMap<NodeId, NodeId>,
    /// Button label to restore once the round trip finishes.
    saved_label: Option<String>,
}

/// Drives every form on the page.
#[derive(Debug)]
pub struct FormHandler {
    forms: Vec<FormUnit>,
    submit_delay_ms: u64,
    banner_fade_in_ms: u64,
    banner_hold_ms: u64,
    banner_fade_out_ms: u64,
}

impl FormHandler {
    pub(crate) fn mount(doc: &Document, config: &EngineConfig) -> Self {
        let forms = doc
            .with_tag(Tag::Form)
            .into_iter()
            .map(|form| {
                let fields = doc
                    .nodes()
                    .filter(|n| n.field.is_some())
                    .filter(|n| doc.contains(form, n.id))
                    .map(|n| n.id)
                    .collect();
                let submit = doc
                    .nodes()
                    .filter(|n| n.button.as_ref().is_some_and(|b| b.submit))
                    .find(|n| doc.contains(form, n.id))
                    .map(|n| n.id);
                FormUnit {
                    form,
                    fields,
                    submit,
                    phase: FormPhase::Idle,
                    errors: HashMap::new(),
                    saved_label: None,
                }
            })
            .collect::<Vec<_>>();
        tracing::debug!(forms = forms.len(), "Forms mounted");
        Self {
            forms,
            submit_delay_ms: config.submit_delay_ms,
            banner_fade_in_ms: config.banner_fade_in_ms,
            banner_hold_ms: config.banner_hold_ms,
            banner_fade_out_ms: config.banner_fade_out_ms,
        }
    }

    fn unit_for_field(&mut self, field: NodeId) -> Option<&mut FormUnit> {
        self.forms.iter_mut().find(|u| u.fields.contains(&field))
    }

    /// Blur validates the single field that lost focus.
    pub(crate) fn on_blur(&mut self, doc: &mut Document, field: NodeId) {
        let Some(unit) = self.unit_for_field(field) else {
            return;
        };
        validate_field(doc, &mut unit.errors, field);
    }

    /// Typing clears a showing error and backs an invalid form out of
    /// its failed state.
    pub(crate) fn on_input(&mut self, doc: &mut Document, field: NodeId) {
        let Some(unit) = self.unit_for_field(field) else {
            return;
        };
        if unit.errors.contains_key(&field) {
            clear_error(doc, &mut unit.errors, field);
        }
        if unit.phase == FormPhase::Invalid {
            unit.phase = FormPhase::Idle;
        }
    }

    /// Submit path: re-entry guard, required-field validation, then the
    /// simulated round trip.
    pub(crate) fn on_submit(
        &mut self,
        doc: &mut Document,
        form: NodeId,
        now_ms: u64,
        timers: &mut TimerQueue<TimerTask>,
    ) {
        let Some(unit) = self.forms.iter_mut().find(|u| u.form == form) else {
            return;
        };
        if unit.phase == FormPhase::Submitting {
            tracing::debug!(form = %form, "Submission already in flight, ignoring");
            return;
        }

        // Only required fields gate submission. Optional fields keep
        // whatever error state blur gave them.
        let required: Vec<NodeId> = doc
            .nodes()
            .filter(|n| n.field.as_ref().is_some_and(|f| f.required))
            .filter(|n| doc.contains(form, n.id))
            .map(|n| n.id)
            .collect();
        let mut failures = 0;
        for field in required {
            if !validate_field(doc, &mut unit.errors, field) {
                failures += 1;
            }
        }
        if failures > 0 {
            unit.phase = FormPhase::Invalid;
            doc.emit(Effect::ValidationFailed {
                form,
                errors: failures,
            });
            tracing::debug!(form = %form, failures, "Submission blocked by validation");
            return;
        }

        let Some(button) = unit.submit else {
            tracing::debug!(form = %form, "Form has no submit control, skipping round trip");
            return;
        };

        let data: Vec<(String, String)> = doc
            .nodes()
            .filter(|n| doc.contains(form, n.id))
            .filter_map(|n| {
                let field = n.field.as_ref()?;
                let name = field.name.clone()?;
                Some((name, field.value.clone()))
            })
            .collect();
        doc.emit(Effect::SubmissionStarted { form, data });

        unit.saved_label = doc
            .get(button)
            .and_then(|n| n.button.as_ref())
            .map(|b| b.label.clone());
        doc.set_button_label(button, MSG_SUBMITTING);
        doc.set_disabled(button, true);
        unit.phase = FormPhase::Submitting;
        timers.schedule(
            now_ms + self.submit_delay_ms,
            TimerTask::CompleteSubmission { form },
        );
        tracing::debug!(form = %form, "Submission started");
    }

    /// Round-trip completion: success banner, form reset, button restore.
    pub(crate) fn complete_submission(
        &mut self,
        doc: &mut Document,
        form: NodeId,
        now_ms: u64,
        timers: &mut TimerQueue<TimerTask>,
    ) {
        let Some(unit) = self.forms.iter_mut().find(|u| u.form == form) else {
            return;
        };
        if unit.phase != FormPhase::Submitting {
            return;
        }

        let body = doc.body();
        let banner = doc.create_element(body, Tag::Div, &[SUCCESS_BANNER_CLASS], MSG_SUCCESS);
        doc.set_style(banner, "opacity", "0");
        timers.schedule(
            now_ms + self.banner_fade_in_ms,
            TimerTask::BannerFadeIn { banner },
        );
        timers.schedule(
            now_ms + self.banner_hold_ms,
            TimerTask::BannerFadeOut { banner },
        );

        // Reset to defaults. This writes values back but fires no input
        // events, so character counters keep their pre-reset text.
        for field in unit.fields.clone() {
            let Some(default) = doc
                .get(field)
                .and_then(|n| n.field.as_ref())
                .map(|f| f.default_value.clone())
            else {
                continue;
            };
            doc.write_field_value(field, &default);
        }

        if let Some(button) = unit.submit {
            if let Some(label) = unit.saved_label.take() {
                doc.set_button_label(button, &label);
            }
            doc.set_disabled(button, false);
        }
        unit.phase = FormPhase::Idle;
        doc.emit(Effect::SubmissionCompleted { form });
        tracing::debug!(form = %form, "Submission completed");
    }

    pub(crate) fn banner_fade_in(&self, doc: &mut Document, banner: NodeId) {
        doc.set_style(banner, "opacity", "1");
    }

    pub(crate) fn banner_fade_out(
        &self,
        doc: &mut Document,
        banner: NodeId,
        now_ms: u64,
        timers: &mut TimerQueue<TimerTask>,
    ) {
        doc.set_style(banner, "opacity", "0");
        timers.schedule(
            now_ms + self.banner_fade_out_ms,
            TimerTask::BannerRemove { banner },
        );
    }

    pub(crate) fn banner_remove(&self, doc: &mut Document, banner: NodeId) {
        doc.remove_node(banner);
    }

    pub(crate) fn phase(&self, form: NodeId) -> Option<FormPhase> {
        self.forms.iter().find(|u| u.form == form).map(|u| u.phase)
    }

    pub(crate) fn error_count(&self, form: NodeId) -> usize {
        self.forms
            .iter()
            .find(|u| u.form == form)
            .map_or(0, |u| u.errors.len())
    }
}

/// Runs one field through validation, projecting the result onto the
/// document. Returns true when the field is acceptable.
fn validate_field(
    doc: &mut Document,
    errors: &mut HashMap<NodeId, NodeId>,
    field: NodeId,
) -> bool {
    let Some((control, required, value)) = doc
        .get(field)
        .and_then(|n| n.field.as_ref())
        .map(|f| (f.control, f.required, f.value.clone()))
    else {
        return true;
    };
    match field_error(control, required, &value) {
        Some(message) => {
            show_error(doc, errors, field, message);
            false
        }
        None => {
            clear_error(doc, errors, field);
            true
        }
    }
}

/// Marks the field and mounts a message element next to it, replacing
/// any message already showing.
fn show_error(
    doc: &mut Document,
    errors: &mut HashMap<NodeId, NodeId>,
    field: NodeId,
    message: &str,
) {
    clear_error(doc, errors, field);
    doc.add_class(field, ERROR_CLASS);
    let parent = doc
        .get(field)
        .and_then(|n| n.parent)
        .unwrap_or_else(|| doc.body());
    let node = doc.create_element(parent, Tag::Div, &[FIELD_ERROR_CLASS], message);
    doc.set_style(node, "color", ERROR_COLOR);
    errors.insert(field, node);
}

fn clear_error(doc: &mut Document, errors: &mut HashMap<NodeId, NodeId>, field: NodeId) {
    doc.remove_class(field, ERROR_CLASS);
    if let Some(error_node) = errors.remove(&field) {
        doc.remove_node(error_node);
    }
}
