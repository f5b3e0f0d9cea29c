//! Scenario files: a page description plus a timed event script.
//!
//! Scenarios are plain JSON so they can be written by hand, checked in
//! next to a page, and replayed byte-for-byte. Events refer to elements
//! by id; resolution to node handles happens at replay time.

use std::path::Path;

use anyhow::{Context, Result};
use pagefx_core::{
    Document, Engine, EngineConfig, Event, FieldControl, NodeSpec, Tag, Viewport,
};
use serde::{Deserialize, Serialize};

/// One replayable recording: the page, the engine knobs and the script.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,
    #[serde(default)]
    pub config: EngineConfig,
    pub page: PageSpec,
    #[serde(default)]
    pub script: Vec<Step>,
}

/// Viewport geometry and the element tree, parents before children.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageSpec {
    pub width: f32,
    pub height: f32,
    pub page_height: f32,
    #[serde(default)]
    pub nodes: Vec<NodeSpec>,
}

/// A script entry. `at_ms` is absolute engine time; steps must be
/// listed in chronological order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Step {
    pub at_ms: u64,
    #[serde(flatten)]
    pub event: ScriptEvent,
}

/// [`Event`] with element ids in place of node handles.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ScriptEvent {
    Click { target: String },
    Scroll { y: f32 },
    Resize { width: f32, height: f32 },
    Input { field: String, value: String },
    Blur { field: String },
    Submit { form: String },
}

impl Scenario {
    /// Reads and parses a scenario file.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read scenario file: {}", path.display()))?;
        let scenario: Scenario = serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse scenario file: {}", path.display()))?;
        tracing::debug!(
            name = %scenario.name,
            nodes = scenario.page.nodes.len(),
            steps = scenario.script.len(),
            "Scenario loaded"
        );
        Ok(scenario)
    }

    /// Builds the page this scenario runs against.
    pub fn build_document(&self) -> Result<Document> {
        let viewport = Viewport::new(self.page.width, self.page.height);
        let mut doc = Document::new(viewport, self.page.page_height);
        for (index, spec) in self.page.nodes.iter().enumerate() {
            doc.insert(spec.clone())
                .with_context(|| format!("Failed to insert page node at index {}", index))?;
        }
        Ok(doc)
    }
}

/// Resolves a script event against the live page.
pub fn resolve_event(doc: &Document, event: &ScriptEvent) -> Result<Event> {
    Ok(match event {
        ScriptEvent::Click { target } => Event::Click {
            target: resolve(doc, target)?,
        },
        ScriptEvent::Scroll { y } => Event::Scroll { y: *y },
        ScriptEvent::Resize { width, height } => Event::Resize {
            width: *width,
            height: *height,
        },
        ScriptEvent::Input { field, value } => Event::Input {
            field: resolve(doc, field)?,
            value: value.clone(),
        },
        ScriptEvent::Blur { field } => Event::Blur {
            field: resolve(doc, field)?,
        },
        ScriptEvent::Submit { form } => Event::Submit {
            form: resolve(doc, form)?,
        },
    })
}

fn resolve(doc: &Document, elem_id: &str) -> Result<pagefx_core::NodeId> {
    doc.find(elem_id)
        .with_context(|| format!("No element on the page with id '{}'", elem_id))
}

/// The bundled walkthrough: a small corporate site on a phone-sized
/// viewport, driven through every behavior the engine carries.
pub fn sample() -> Scenario {
    let mut nodes = vec![
        NodeSpec::new(Tag::Header)
            .with_id("siteHeader")
            .with_class("header")
            .with_bounds(0.0, 72.0),
        NodeSpec::new(Tag::Nav)
            .with_id("siteNav")
            .with_parent("siteHeader")
            .with_bounds(0.0, 72.0),
        NodeSpec::new(Tag::Div)
            .with_id("hamburger")
            .with_parent("siteNav")
            .with_bounds(16.0, 40.0),
        NodeSpec::new(Tag::Div)
            .with_id("navMenu")
            .with_parent("siteNav")
            .with_bounds(72.0, 280.0),
    ];
    for (id, href, label) in [
        ("linkHome", "#home", "ホーム"),
        ("linkAbout", "#about", "会社概要"),
        ("linkServices", "#services", "サービス"),
        ("linkContact", "#contact", "お問い合わせ"),
    ] {
        nodes.push(
            NodeSpec::new(Tag::Anchor)
                .with_id(id)
                .with_class("nav-link")
                .with_parent("navMenu")
                .with_href(href)
                .with_text(label),
        );
    }
    nodes.extend([
        NodeSpec::new(Tag::Section).with_id("home").with_bounds(0.0, 760.0),
        NodeSpec::new(Tag::Section)
            .with_id("about")
            .with_bounds(760.0, 800.0),
        NodeSpec::new(Tag::Section)
            .with_id("services")
            .with_class("grid-container")
            .with_bounds(1560.0, 840.0),
        NodeSpec::new(Tag::Section)
            .with_id("contact")
            .with_bounds(2400.0, 800.0),
    ]);
    for i in 0..3 {
        nodes.push(
            NodeSpec::new(Tag::Div)
                .with_class("about-item")
                .with_parent("about")
                .with_bounds(820.0 + 180.0 * i as f32, 150.0),
        );
    }
    for i in 0..3 {
        nodes.push(
            NodeSpec::new(Tag::Div)
                .with_class("service-card")
                .with_parent("services")
                .with_bounds(1620.0 + 240.0 * i as f32, 200.0),
        );
    }
    nodes.extend([
        NodeSpec::new(Tag::Img)
            .with_id("aboutPhoto")
            .with_class("lazy")
            .with_parent("about")
            .with_bounds(1000.0, 300.0)
            .as_image("placeholder.png", Some("office.webp")),
        NodeSpec::new(Tag::Img)
            .with_id("mapImage")
            .with_class("lazy")
            .with_parent("contact")
            .with_bounds(2900.0, 200.0)
            .as_image("placeholder.png", Some("access-map.webp")),
        NodeSpec::new(Tag::Form)
            .with_id("contactForm")
            .with_parent("contact"),
    ]);
    for (group, tag, id, control, required, name) in [
        ("nameGroup", Tag::Input, "name", FieldControl::Text, true, "name"),
        ("emailGroup", Tag::Input, "email", FieldControl::Email, true, "email"),
        ("phoneGroup", Tag::Input, "phone", FieldControl::Tel, false, "phone"),
    ] {
        nodes.push(NodeSpec::new(Tag::Div).with_id(group).with_parent("contactForm"));
        nodes.push(
            NodeSpec::new(tag)
                .with_id(id)
                .with_parent(group)
                .as_field(control, required)
                .with_name(name),
        );
    }
    nodes.push(
        NodeSpec::new(Tag::Div)
            .with_id("messageGroup")
            .with_parent("contactForm"),
    );
    nodes.push(
        NodeSpec::new(Tag::TextArea)
            .with_id("message")
            .with_parent("messageGroup")
            .as_field(FieldControl::TextArea, true)
            .with_name("message")
            .with_max_length(500),
    );
    nodes.push(
        NodeSpec::new(Tag::Button)
            .with_id("send")
            .with_parent("contactForm")
            .as_submit("送信する"),
    );

    let script = vec![
        step(0, ScriptEvent::Click { target: "hamburger".into() }),
        step(400, ScriptEvent::Click { target: "linkAbout".into() }),
        step(1200, ScriptEvent::Scroll { y: 1650.0 }),
        step(2000, ScriptEvent::Scroll { y: 2400.0 }),
        step(
            2500,
            ScriptEvent::Input { field: "name".into(), value: "山田太郎".into() },
        ),
        step(
            2700,
            ScriptEvent::Input {
                field: "email".into(),
                value: "taro@example.co.jp".into(),
            },
        ),
        step(
            2900,
            ScriptEvent::Input { field: "phone".into(), value: "09012345678".into() },
        ),
        step(
            3100,
            ScriptEvent::Input {
                field: "message".into(),
                value: "お問い合わせの内容です。よろしくお願いいたします。".into(),
            },
        ),
        step(3200, ScriptEvent::Blur { field: "message".into() }),
        step(3300, ScriptEvent::Submit { form: "contactForm".into() }),
    ];

    Scenario {
        name: "corporate_site_walkthrough".to_string(),
        config: EngineConfig::default(),
        page: PageSpec {
            width: 390.0,
            height: 844.0,
            page_height: 3200.0,
            nodes,
        },
        script,
    }
}

fn step(at_ms: u64, event: ScriptEvent) -> Step {
    Step { at_ms, event }
}

/// Convenience used by benchmarks and tests: the sample page, mounted.
pub fn mount_sample() -> Result<Engine> {
    let scenario = sample();
    let doc = scenario.build_document()?;
    Ok(Engine::mount(doc, scenario.config))
}
