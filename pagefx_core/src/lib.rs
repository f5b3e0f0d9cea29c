//! Deterministic engine for a marketing page's interaction layer.
//!
//! The page's behaviors live here as explicit state machines: the
//! collapsible navigation, scroll-hinged styling, reveal-on-scroll
//! animations, contact-form validation with a simulated submission
//! round trip, deferred image loading, and the scroll-to-top button.
//! A host describes the page once, forwards user events, and applies
//! the journaled effects to whatever it renders. Time is virtual, so
//! every run is exactly reproducible.
//!
//! ```
//! use pagefx_core::{Document, Engine, EngineConfig, Event, NodeSpec, Tag, Viewport};
//!
//! let mut doc = Document::new(Viewport::new(390.0, 844.0), 2000.0);
//! doc.insert(
//!     NodeSpec::new(Tag::Header)
//!         .with_class("header")
//!         .with_bounds(0.0, 80.0),
//! )?;
//! let mut engine = Engine::mount(doc, EngineConfig::default());
//!
//! engine.dispatch(Event::Scroll { y: 200.0 })?;
//! assert!(engine.header_scrolled());
//! # Ok::<(), pagefx_core::EngineError>(())
//! ```

pub mod config;
pub mod constants;
pub mod contact;
pub mod dom;
pub mod effect;
pub mod engine;
pub mod error;
pub mod event;
pub mod form;
pub mod lazy;
pub mod nav;
pub mod observer;
pub mod reveal;
pub mod scrolling;
pub mod timing;

pub use config::EngineConfig;
pub use constants::*;
pub use contact::{counter_label, format_phone};
pub use dom::{Bounds, Document, FieldControl, Node, NodeId, NodeSpec, Tag, Viewport};
pub use effect::{Effect, EffectRecord, ScrollBehavior};
pub use engine::Engine;
pub use error::{EngineError, EngineResult};
pub use event::Event;
pub use form::FormPhase;
pub use observer::{Entry, ObserverOptions, ViewObserver};
pub use timing::{Debounce, Throttle, TimerQueue};
