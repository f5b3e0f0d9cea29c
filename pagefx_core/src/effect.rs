//! Side effects the engine asks its host to perform.
//!
//! Every state change flows through the [`Document`](crate::dom::Document)
//! mutators and lands here as a journaled record. A host that applies the
//! journal in order ends up with a page identical to the engine's model.

use serde::{Deserialize, Serialize};

use crate::dom::NodeId;

/// How a requested scroll should move: animated or in one jump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScrollBehavior {
    Smooth,
    Auto,
}

/// One host-visible mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Effect {
    ClassAdded { node: NodeId, class: String },
    ClassRemoved { node: NodeId, class: String },
    TextSet { node: NodeId, text: String },
    /// The engine rewrote a field's value; the host must copy it back.
    ValueSet { node: NodeId, value: String },
    StyleSet { node: NodeId, property: String, value: String },
    DisabledSet { node: NodeId, disabled: bool },
    LabelSet { node: NodeId, label: String },
    NodeInserted { node: NodeId, parent: NodeId },
    NodeRemoved { node: NodeId },
    ImageLoaded { node: NodeId, src: String },
    /// The engine wants the viewport moved. It never moves it itself;
    /// the host scrolls and reports back with a scroll event.
    ScrollRequested { top: f32, behavior: ScrollBehavior },
    SubmissionStarted { form: NodeId, data: Vec<(String, String)> },
    SubmissionCompleted { form: NodeId },
    ValidationFailed { form: NodeId, errors: usize },
}

/// An [`Effect`] stamped with the engine clock at the moment it happened.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectRecord {
    pub at_ms: u64,
    pub effect: Effect,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::NodeId;

    #[test]
    fn test_effect_serializes_with_kind_tag() {
        let effect = Effect::ClassAdded {
            node: NodeId::from_index(3),
            class: "active".to_string(),
        };
        let json = serde_json::to_string(&effect).unwrap();
        assert!(json.contains("\"kind\":\"class_added\""));
        assert!(json.contains("\"class\":\"active\""));
    }

    #[test]
    fn test_scroll_request_roundtrip() {
        let record = EffectRecord {
            at_ms: 1200,
            effect: Effect::ScrollRequested {
                top: 520.0,
                behavior: ScrollBehavior::Smooth,
            },
        };
        let json = serde_json::to_string(&record).unwrap();
        let back: EffectRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(back, record);
    }
}
