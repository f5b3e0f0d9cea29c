//! Retained model of the hosting document.
//!
//! The engine never touches a real DOM. Hosts describe the page once as a
//! flat list of [`NodeSpec`]s, the engine keeps the authoritative state in
//! [`Node`] records, and every mutation it performs is journaled as an
//! [`Effect`](crate::effect::Effect) so the host can replay it onto
//! whatever surface it renders to.
//!
//! Node geometry is static: `top`/`height` are page coordinates measured
//! with the page unscrolled, matching element offsets on a finished layout.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::effect::{Effect, EffectRecord, ScrollBehavior};
use crate::error::{EngineError, EngineResult};

/// Opaque handle to a node in a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeId(usize);

impl NodeId {
    pub(crate) fn from_index(index: usize) -> Self {
        Self(index)
    }

    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Element kind. Only the kinds the engine reacts to are distinguished;
/// anything else is described as a `Div`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tag {
    Body,
    Header,
    Nav,
    Section,
    Anchor,
    Button,
    Input,
    TextArea,
    Select,
    Form,
    Img,
    #[default]
    Div,
}

/// Control type of a form field, used to pick the validation rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldControl {
    Text,
    Email,
    Tel,
    TextArea,
    Select,
}

/// Vertical extent of an element in page coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Bounds {
    pub top: f32,
    pub height: f32,
}

impl Bounds {
    pub fn new(top: f32, height: f32) -> Self {
        Self { top, height }
    }

    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }
}

/// The host's window state: size plus current scroll offset.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    pub scroll_y: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            scroll_y: 0.0,
        }
    }
}

/// State carried by form controls.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldState {
    pub control: FieldControl,
    pub required: bool,
    pub value: String,
    pub default_value: String,
    pub max_length: Option<usize>,
    pub name: Option<String>,
}

/// State carried by images, including a deferred source if any.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageState {
    pub src: String,
    pub data_src: Option<String>,
}

/// State carried by buttons.
#[derive(Debug, Clone, PartialEq)]
pub struct ButtonState {
    pub label: String,
    pub disabled: bool,
    pub submit: bool,
}

/// A single element in the document.
///
/// Fields are public for reading; state changes must go through the
/// [`Document`] mutators so they land in the effect journal.
#[derive(Debug, Clone)]
pub struct Node {
    pub id: NodeId,
    pub tag: Tag,
    pub elem_id: Option<String>,
    pub classes: Vec<String>,
    pub bounds: Bounds,
    pub parent: Option<NodeId>,
    pub text: String,
    pub styles: Vec<(String, String)>,
    pub href: Option<String>,
    pub field: Option<FieldState>,
    pub image: Option<ImageState>,
    pub button: Option<ButtonState>,
    detached: bool,
}

impl Node {
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn style(&self, property: &str) -> Option<&str> {
        self.styles
            .iter()
            .find(|(p, _)| p == property)
            .map(|(_, v)| v.as_str())
    }

    pub fn field_value(&self) -> Option<&str> {
        self.field.as_ref().map(|f| f.value.as_str())
    }

    pub fn is_detached(&self) -> bool {
        self.detached
    }
}

/// Declarative description of one element, used to build a [`Document`].
///
/// All fields are optional in serialized form; unset ones take their
/// defaults, so page descriptions stay terse.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeSpec {
    pub tag: Tag,
    pub id: Option<String>,
    pub classes: Vec<String>,
    pub top: f32,
    pub height: f32,
    /// Element id of the parent node. Unset means a child of the body.
    pub parent: Option<String>,
    pub text: String,
    pub href: Option<String>,
    pub control: Option<FieldControl>,
    pub required: bool,
    pub value: String,
    pub max_length: Option<usize>,
    pub name: Option<String>,
    pub label: Option<String>,
    pub submit: bool,
    pub src: Option<String>,
    pub data_src: Option<String>,
}

impl NodeSpec {
    pub fn new(tag: Tag) -> Self {
        Self {
            tag,
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_string());
        self
    }

    pub fn with_class(mut self, class: &str) -> Self {
        self.classes.push(class.to_string());
        self
    }

    pub fn with_bounds(mut self, top: f32, height: f32) -> Self {
        self.top = top;
        self.height = height;
        self
    }

    pub fn with_parent(mut self, parent_id: &str) -> Self {
        self.parent = Some(parent_id.to_string());
        self
    }

    pub fn with_text(mut self, text: &str) -> Self {
        self.text = text.to_string();
        self
    }

    pub fn with_href(mut self, href: &str) -> Self {
        self.href = Some(href.to_string());
        self
    }

    pub fn as_field(mut self, control: FieldControl, required: bool) -> Self {
        self.control = Some(control);
        self.required = required;
        self
    }

    pub fn with_value(mut self, value: &str) -> Self {
        self.value = value.to_string();
        self
    }

    pub fn with_max_length(mut self, max_length: usize) -> Self {
        self.max_length = Some(max_length);
        self
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn as_submit(mut self, label: &str) -> Self {
        self.submit = true;
        self.label = Some(label.to_string());
        self
    }

    pub fn as_image(mut self, src: &str, data_src: Option<&str>) -> Self {
        self.src = Some(src.to_string());
        self.data_src = data_src.map(|s| s.to_string());
        self
    }
}

/// The engine's document: a node arena, an element-id index, the viewport,
/// and the journal of every effect performed so far.
#[derive(Debug)]
pub struct Document {
    nodes: Vec<Node>,
    ids: HashMap<String, NodeId>,
    body: NodeId,
    viewport: Viewport,
    page_height: f32,
    journal: Vec<EffectRecord>,
    now_ms: u64,
}

impl Document {
    /// Creates an empty document holding only the body element.
    pub fn new(viewport: Viewport, page_height: f32) -> Self {
        let body = NodeId::from_index(0);
        let body_node = Node {
            id: body,
            tag: Tag::Body,
            elem_id: None,
            classes: Vec::new(),
            bounds: Bounds::new(0.0, page_height),
            parent: None,
            text: String::new(),
            styles: Vec::new(),
            href: None,
            field: None,
            image: None,
            button: None,
            detached: false,
        };
        Self {
            nodes: vec![body_node],
            ids: HashMap::new(),
            body,
            viewport,
            page_height,
            journal: Vec::new(),
            now_ms: 0,
        }
    }

    /// Adds an element described by `spec`. Specs must arrive in document
    /// order; parents are referenced by element id and must already exist.
    pub fn insert(&mut self, spec: NodeSpec) -> EngineResult<NodeId> {
        let parent = match &spec.parent {
            Some(pid) => Some(
                self.find(pid)
                    .ok_or_else(|| EngineError::UnknownElementId(pid.clone()))?,
            ),
            None => Some(self.body),
        };

        let id = NodeId::from_index(self.nodes.len());
        if let Some(elem_id) = &spec.id {
            if self.ids.contains_key(elem_id) {
                return Err(EngineError::DuplicateElementId(elem_id.clone()));
            }
            self.ids.insert(elem_id.clone(), id);
        }

        let field = spec.control.map(|control| FieldState {
            control,
            required: spec.required,
            value: spec.value.clone(),
            default_value: spec.value.clone(),
            max_length: spec.max_length,
            name: spec.name.clone(),
        });
        let image = if spec.tag == Tag::Img {
            Some(ImageState {
                src: spec.src.clone().unwrap_or_default(),
                data_src: spec.data_src.clone(),
            })
        } else {
            None
        };
        let button = if spec.tag == Tag::Button {
            Some(ButtonState {
                label: spec.label.clone().unwrap_or_else(|| spec.text.clone()),
                disabled: false,
                submit: spec.submit,
            })
        } else {
            None
        };

        self.nodes.push(Node {
            id,
            tag: spec.tag,
            elem_id: spec.id,
            classes: spec.classes,
            bounds: Bounds::new(spec.top, spec.height),
            parent,
            text: spec.text,
            styles: Vec::new(),
            href: spec.href,
            field,
            image,
            button,
            detached: false,
        });
        Ok(id)
    }

    pub fn body(&self) -> NodeId {
        self.body
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn page_height(&self) -> f32 {
        self.page_height
    }

    /// Number of live nodes, body included.
    pub fn node_count(&self) -> usize {
        self.nodes.iter().filter(|n| !n.detached).count()
    }

    /// Looks a node up, detached or not. Errors on ids this document
    /// never allocated.
    pub fn node(&self, id: NodeId) -> EngineResult<&Node> {
        self.nodes
            .get(id.index())
            .ok_or(EngineError::UnknownNode(id))
    }

    /// Returns the node if it is still part of the document.
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index()).filter(|n| !n.detached)
    }

    /// Resolves an element id to its node, like a by-id lookup on a page.
    pub fn find(&self, elem_id: &str) -> Option<NodeId> {
        self.ids.get(elem_id).copied()
    }

    /// Live nodes in document order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(|n| !n.detached)
    }

    pub fn with_class(&self, class: &str) -> Vec<NodeId> {
        self.nodes()
            .filter(|n| n.has_class(class))
            .map(|n| n.id)
            .collect()
    }

    pub fn with_tag(&self, tag: Tag) -> Vec<NodeId> {
        self.nodes().filter(|n| n.tag == tag).map(|n| n.id).collect()
    }

    pub fn first_with_class(&self, class: &str) -> Option<NodeId> {
        self.nodes().find(|n| n.has_class(class)).map(|n| n.id)
    }

    /// True when `node` is `ancestor` or sits somewhere below it.
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut cursor = Some(node);
        while let Some(id) = cursor {
            if id == ancestor {
                return true;
            }
            cursor = self.nodes.get(id.index()).and_then(|n| n.parent);
        }
        false
    }

    pub(crate) fn ensure_alive(&self, id: NodeId) -> EngineResult<()> {
        if self.node(id)?.detached {
            return Err(EngineError::DetachedNode(id));
        }
        Ok(())
    }

    pub(crate) fn ensure_field(&self, id: NodeId) -> EngineResult<()> {
        self.ensure_alive(id)?;
        if self.node(id)?.field.is_none() {
            return Err(EngineError::NotAField(id));
        }
        Ok(())
    }

    pub(crate) fn ensure_form(&self, id: NodeId) -> EngineResult<()> {
        self.ensure_alive(id)?;
        if self.node(id)?.tag != Tag::Form {
            return Err(EngineError::NotAForm(id));
        }
        Ok(())
    }

    pub(crate) fn set_now(&mut self, now_ms: u64) {
        self.now_ms = now_ms;
    }

    /// Applies a host scroll, clamped to the scrollable range. Does not
    /// journal: the host moved, the engine merely tracks it.
    pub(crate) fn sync_scroll(&mut self, y: f32) {
        let max = (self.page_height - self.viewport.height).max(0.0);
        self.viewport.scroll_y = y.clamp(0.0, max);
    }

    pub(crate) fn sync_size(&mut self, width: f32, height: f32) {
        self.viewport.width = width;
        self.viewport.height = height;
    }

    /// Mirrors what the user typed into a field. Not journaled either;
    /// the value already lives in the host's control.
    pub(crate) fn sync_field_value(&mut self, id: NodeId, value: &str) -> EngineResult<()> {
        self.ensure_field(id)?;
        if let Some(field) = self.nodes[id.index()].field.as_mut() {
            field.value = value.to_string();
        }
        Ok(())
    }

    fn record(&mut self, effect: Effect) {
        self.journal.push(EffectRecord {
            at_ms: self.now_ms,
            effect,
        });
    }

    pub(crate) fn emit(&mut self, effect: Effect) {
        self.record(effect);
    }

    pub(crate) fn add_class(&mut self, id: NodeId, class: &str) {
        let Some(node) = self.nodes.get_mut(id.index()).filter(|n| !n.detached) else {
            return;
        };
        if node.classes.iter().any(|c| c == class) {
            return;
        }
        node.classes.push(class.to_string());
        self.record(Effect::ClassAdded {
            node: id,
            class: class.to_string(),
        });
    }

    pub(crate) fn remove_class(&mut self, id: NodeId, class: &str) {
        let Some(node) = self.nodes.get_mut(id.index()).filter(|n| !n.detached) else {
            return;
        };
        let before = node.classes.len();
        node.classes.retain(|c| c != class);
        if node.classes.len() == before {
            return;
        }
        self.record(Effect::ClassRemoved {
            node: id,
            class: class.to_string(),
        });
    }

    pub(crate) fn set_text(&mut self, id: NodeId, text: &str) {
        let Some(node) = self.nodes.get_mut(id.index()).filter(|n| !n.detached) else {
            return;
        };
        if node.text == text {
            return;
        }
        node.text = text.to_string();
        self.record(Effect::TextSet {
            node: id,
            text: text.to_string(),
        });
    }

    pub(crate) fn set_style(&mut self, id: NodeId, property: &str, value: &str) {
        let Some(node) = self.nodes.get_mut(id.index()).filter(|n| !n.detached) else {
            return;
        };
        match node.styles.iter_mut().find(|(p, _)| p == property) {
            Some((_, current)) => {
                if current == value {
                    return;
                }
                *current = value.to_string();
            }
            None => node.styles.push((property.to_string(), value.to_string())),
        }
        self.record(Effect::StyleSet {
            node: id,
            property: property.to_string(),
            value: value.to_string(),
        });
    }

    /// Engine-written field value, e.g. phone formatting or a form reset.
    /// Unlike [`sync_field_value`](Self::sync_field_value) this is a real
    /// output the host must copy back into its control.
    pub(crate) fn write_field_value(&mut self, id: NodeId, value: &str) {
        let Some(field) = self
            .nodes
            .get_mut(id.index())
            .filter(|n| !n.detached)
            .and_then(|n| n.field.as_mut())
        else {
            return;
        };
        if field.value == value {
            return;
        }
        field.value = value.to_string();
        self.record(Effect::ValueSet {
            node: id,
            value: value.to_string(),
        });
    }

    pub(crate) fn set_disabled(&mut self, id: NodeId, disabled: bool) {
        let Some(button) = self
            .nodes
            .get_mut(id.index())
            .filter(|n| !n.detached)
            .and_then(|n| n.button.as_mut())
        else {
            return;
        };
        if button.disabled == disabled {
            return;
        }
        button.disabled = disabled;
        self.record(Effect::DisabledSet { node: id, disabled });
    }

    pub(crate) fn set_button_label(&mut self, id: NodeId, label: &str) {
        let Some(button) = self
            .nodes
            .get_mut(id.index())
            .filter(|n| !n.detached)
            .and_then(|n| n.button.as_mut())
        else {
            return;
        };
        if button.label == label {
            return;
        }
        button.label = label.to_string();
        self.record(Effect::LabelSet {
            node: id,
            label: label.to_string(),
        });
    }

    /// Promotes an image's deferred source to its live one. Returns false
    /// when there was nothing left to load.
    pub(crate) fn swap_image_source(&mut self, id: NodeId) -> bool {
        let Some(image) = self
            .nodes
            .get_mut(id.index())
            .filter(|n| !n.detached)
            .and_then(|n| n.image.as_mut())
        else {
            return false;
        };
        let Some(src) = image.data_src.take() else {
            return false;
        };
        image.src = src.clone();
        self.record(Effect::ImageLoaded { node: id, src });
        true
    }

    /// Creates an element at runtime, appended as the last child of
    /// `parent`. Created nodes have no geometry of their own.
    pub(crate) fn create_element(
        &mut self,
        parent: NodeId,
        tag: Tag,
        classes: &[&str],
        text: &str,
    ) -> NodeId {
        let id = NodeId::from_index(self.nodes.len());
        let button = if tag == Tag::Button {
            Some(ButtonState {
                label: text.to_string(),
                disabled: false,
                submit: false,
            })
        } else {
            None
        };
        self.nodes.push(Node {
            id,
            tag,
            elem_id: None,
            classes: classes.iter().map(|c| c.to_string()).collect(),
            bounds: Bounds::default(),
            parent: Some(parent),
            text: text.to_string(),
            styles: Vec::new(),
            href: None,
            field: None,
            image: None,
            button,
            detached: false,
        });
        self.record(Effect::NodeInserted { node: id, parent });
        id
    }

    pub(crate) fn remove_node(&mut self, id: NodeId) {
        let Some(node) = self.nodes.get_mut(id.index()).filter(|n| !n.detached) else {
            return;
        };
        node.detached = true;
        if let Some(elem_id) = node.elem_id.clone() {
            self.ids.remove(&elem_id);
        }
        self.record(Effect::NodeRemoved { node: id });
    }

    /// Asks the host to move the viewport. The engine never scrolls by
    /// itself; the host answers with a `Scroll` event when it has moved.
    pub(crate) fn request_scroll(&mut self, top: f32, behavior: ScrollBehavior) {
        self.record(Effect::ScrollRequested { top, behavior });
    }

    pub fn journal(&self) -> &[EffectRecord] {
        &self.journal
    }

    pub(crate) fn drain_journal(&mut self) -> Vec<EffectRecord> {
        std::mem::take(&mut self.journal)
    }
}
