//! Host events the engine reacts to.

use serde::{Deserialize, Serialize};

use crate::dom::NodeId;

/// One user or platform event, as reported by the host.
///
/// `Scroll` and `Resize` describe the viewport after the host already
/// moved it. `Input` carries the field's full value after the keystroke,
/// the way an input listener sees it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Event {
    Click { target: NodeId },
    Scroll { y: f32 },
    Resize { width: f32, height: f32 },
    Input { field: NodeId, value: String },
    Blur { field: NodeId },
    Submit { form: NodeId },
}
