//! Contact-form conveniences: phone number formatting as the user types
//! and a live character counter under each length-limited textarea.

use crate::config::EngineConfig;
use crate::constants::{CHAR_COUNTER_CLASS, COUNTER_COLOR, ERROR_COLOR, PHONE_MAX_DIGITS};
use crate::dom::{Document, FieldControl, NodeId, Tag};

/// Normalizes a phone value to the 3-4-4 hyphenated shape, keeping at
/// most eleven digits and dropping everything that is not a digit.
pub fn format_phone(raw: &str) -> String {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    match digits.len() {
        0..=3 => digits,
        4..=7 => format!("{}-{}", &digits[..3], &digits[3..]),
        _ => {
            let tail_end = digits.len().min(PHONE_MAX_DIGITS);
            format!("{}-{}-{}", &digits[..3], &digits[3..7], &digits[7..tail_end])
        }
    }
}

/// Counter text shown under a textarea.
pub fn counter_label(remaining: usize) -> String {
    format!("あと{remaining}文字")
}

#[derive(Debug)]
struct Counter {
    textarea: NodeId,
    label: NodeId,
    max_length: usize,
    warning: bool,
}

/// Per-page state for the formatting and counter behaviors. Only the
/// first tel field on the page gets live formatting, matching how the
/// page binds it.
#[derive(Debug)]
pub struct ContactExtras {
    phone_field: Option<NodeId>,
    counters: Vec<Counter>,
    warn_below: usize,
}

impl ContactExtras {
    pub(crate) fn mount(doc: &mut Document, config: &EngineConfig) -> Self {
        let phone_field = doc
            .nodes()
            .find(|n| {
                n.field
                    .as_ref()
                    .is_some_and(|f| f.control == FieldControl::Tel)
            })
            .map(|n| n.id);

        let textareas: Vec<(NodeId, usize, Option<NodeId>)> = doc
            .nodes()
            .filter(|n| {
                n.field
                    .as_ref()
                    .is_some_and(|f| f.control == FieldControl::TextArea && f.max_length.is_some())
            })
            .filter_map(|n| {
                n.field
                    .as_ref()
                    .and_then(|f| f.max_length)
                    .map(|max| (n.id, max, n.parent))
            })
            .collect();

        let warn_below = config.counter_warn_below;
        let mut counters = Vec::new();
        for (textarea, max_length, parent) in textareas {
            let parent = parent.unwrap_or_else(|| doc.body());
            let label = doc.create_element(parent, Tag::Div, &[CHAR_COUNTER_CLASS], "");
            let mut counter = Counter {
                textarea,
                label,
                max_length,
                warning: false,
            };
            render_counter(doc, &mut counter, warn_below);
            counters.push(counter);
        }

        Self {
            phone_field,
            counters,
            warn_below,
        }
    }

    pub(crate) fn on_input(&mut self, doc: &mut Document, field: NodeId) {
        if self.phone_field == Some(field) {
            let current = doc
                .get(field)
                .and_then(|n| n.field_value())
                .unwrap_or_default()
                .to_string();
            doc.write_field_value(field, &format_phone(&current));
        }
        let warn_below = self.warn_below;
        if let Some(counter) = self.counters.iter_mut().find(|c| c.textarea == field) {
            render_counter(doc, counter, warn_below);
        }
    }

    pub(crate) fn counter_warning(&self, textarea: NodeId) -> Option<bool> {
        self.counters
            .iter()
            .find(|c| c.textarea == textarea)
            .map(|c| c.warning)
    }
}

/// Recomputes one counter from its textarea's value and projects label
/// text plus the warning color.
fn render_counter(doc: &mut Document, counter: &mut Counter, warn_below: usize) {
    let length = doc
        .get(counter.textarea)
        .and_then(|n| n.field_value())
        .map_or(0, |v| v.chars().count());
    let remaining = counter.max_length.saturating_sub(length);
    counter.warning = remaining < warn_below;
    doc.set_text(counter.label, &counter_label(remaining));
    doc.set_style(
        counter.label,
        "color",
        if counter.warning { ERROR_COLOR } else { COUNTER_COLOR },
    );
}
