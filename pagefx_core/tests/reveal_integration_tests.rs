//! Integration tests for scroll-triggered reveals: the initial pass at
//! mount, one-shot animation on entry and staggered grid items.

use pagefx_core::{
    Document, Effect, Engine, EngineConfig, Event, NodeSpec, Tag, Viewport,
};

/// Desktop page: hero in view, an about block one screen down and a
/// service grid whose cards sit at the bottom of their section.
fn showcase_page() -> Document {
    let mut doc = Document::new(Viewport::new(1280.0, 800.0), 3200.0);
    doc.insert(
        NodeSpec::new(Tag::Section)
            .with_id("hero")
            .with_bounds(0.0, 600.0),
    )
    .unwrap();
    doc.insert(
        NodeSpec::new(Tag::Section)
            .with_id("about")
            .with_bounds(800.0, 700.0),
    )
    .unwrap();
    for (i, id) in ["aboutA", "aboutB", "aboutC"].into_iter().enumerate() {
        doc.insert(
            NodeSpec::new(Tag::Div)
                .with_id(id)
                .with_class("about-item")
                .with_parent("about")
                .with_bounds(850.0 + 200.0 * i as f32, 160.0),
        )
        .unwrap();
    }
    doc.insert(
        NodeSpec::new(Tag::Section)
            .with_id("services")
            .with_class("grid-container")
            .with_bounds(1600.0, 800.0),
    )
    .unwrap();
    for id in ["cardA", "cardB", "cardC"] {
        doc.insert(
            NodeSpec::new(Tag::Div)
                .with_id(id)
                .with_class("service-card")
                .with_parent("services")
                .with_bounds(2260.0, 120.0),
        )
        .unwrap();
    }
    doc
}

fn animate_adds(engine: &mut Engine) -> Vec<pagefx_core::NodeId> {
    engine
        .take_effects()
        .into_iter()
        .filter_map(|r| match r.effect {
            Effect::ClassAdded { node, class } if class == "animate" => Some(node),
            _ => None,
        })
        .collect()
}

#[test]
fn test_mount_reveals_only_what_is_in_view() {
    let mut engine = Engine::mount(showcase_page(), EngineConfig::default());
    let hero = engine.document().find("hero").unwrap();
    let about = engine.document().find("about").unwrap();

    assert!(engine.is_animated(hero));
    assert!(!engine.is_animated(about));
    assert_eq!(engine.animated_count(), 1);
    assert_eq!(animate_adds(&mut engine), vec![hero]);
}

#[test]
fn test_scrolling_down_reveals_each_target_once() {
    let mut engine = Engine::mount(showcase_page(), EngineConfig::default());
    engine.take_effects();
    let about = engine.document().find("about").unwrap();
    let item = engine.document().find("aboutA").unwrap();

    engine.dispatch(Event::Scroll { y: 400.0 }).unwrap();
    assert!(engine.is_animated(about));
    assert!(engine.is_animated(item));

    // Round trip back above the fold and down again: the class never
    // gets re-applied.
    engine.take_effects();
    engine.dispatch(Event::Scroll { y: 0.0 }).unwrap();
    engine.dispatch(Event::Scroll { y: 400.0 }).unwrap();
    assert!(animate_adds(&mut engine).is_empty());
}

#[test]
fn test_grid_reveals_offscreen_cards_on_a_stagger() {
    let mut engine = Engine::mount(showcase_page(), EngineConfig::default());
    engine.take_effects();
    let services = engine.document().find("services").unwrap();
    let cards = [
        engine.document().find("cardA").unwrap(),
        engine.document().find("cardB").unwrap(),
        engine.document().find("cardC").unwrap(),
    ];

    // The section enters view while its cards are still below the
    // observed root; the first stagger step is due immediately.
    engine.dispatch(Event::Scroll { y: 1500.0 }).unwrap();
    assert!(engine.is_animated(services));
    assert!(engine.is_animated(cards[0]));
    assert!(!engine.is_animated(cards[1]));
    assert_eq!(engine.next_deadline(), Some(100));

    engine.advance(100);
    assert!(engine.is_animated(cards[1]));
    assert!(!engine.is_animated(cards[2]));

    engine.advance(100);
    assert!(engine.is_animated(cards[2]));
    assert!(engine.idle());
}

#[test]
fn test_bottom_margin_holds_back_targets_near_the_fold() {
    let mut doc = Document::new(Viewport::new(1280.0, 800.0), 2000.0);
    doc.insert(
        NodeSpec::new(Tag::Div)
            .with_id("teaser")
            .with_class("about-item")
            .with_bounds(760.0, 80.0),
    )
    .unwrap();
    let mut engine = Engine::mount(doc, EngineConfig::default());
    let teaser = engine.document().find("teaser").unwrap();

    // Inside the viewport but within the 50px margin strip.
    assert!(!engine.is_animated(teaser));

    engine.dispatch(Event::Scroll { y: 60.0 }).unwrap();
    assert!(engine.is_animated(teaser));
}

#[test]
fn test_tall_targets_need_a_tenth_visible() {
    let mut doc = Document::new(Viewport::new(1280.0, 800.0), 2400.0);
    doc.insert(
        NodeSpec::new(Tag::Div)
            .with_id("panel")
            .with_class("feature-item")
            .with_bounds(700.0, 800.0),
    )
    .unwrap();
    let mut engine = Engine::mount(doc, EngineConfig::default());
    let panel = engine.document().find("panel").unwrap();

    assert!(!engine.is_animated(panel));

    engine.dispatch(Event::Scroll { y: 20.0 }).unwrap();
    assert!(!engine.is_animated(panel));

    engine.dispatch(Event::Scroll { y: 30.0 }).unwrap();
    assert!(engine.is_animated(panel));
}
