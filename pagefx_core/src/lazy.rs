//! Deferred image loading driven by viewport intersection.
//!
//! Images marked with a deferred source swap it in the first time they
//! touch the viewport, then drop out of observation. On platforms
//! without an observer everything loads up front instead; that fallback
//! path swaps sources only and leaves the `lazy` marker class in place.

use crate::config::EngineConfig;
use crate::constants::LAZY_CLASS;
use crate::dom::{Document, NodeId};
use crate::observer::{ObserverOptions, ViewObserver};

#[derive(Debug)]
pub struct LazyImages {
    observer: ViewObserver,
    eager: bool,
}

impl LazyImages {
    pub(crate) fn mount(doc: &mut Document, config: &EngineConfig) -> Self {
        let images: Vec<NodeId> = doc
            .nodes()
            .filter(|n| n.image.as_ref().is_some_and(|i| i.data_src.is_some()))
            .map(|n| n.id)
            .collect();

        if !config.observer_supported {
            tracing::debug!(count = images.len(), "No observer support, loading images eagerly");
            for image in &images {
                doc.swap_image_source(*image);
            }
            return Self {
                observer: ViewObserver::new(ObserverOptions::default()),
                eager: true,
            };
        }

        let mut observer = ViewObserver::new(ObserverOptions::default());
        for image in images {
            observer.observe(image);
        }
        tracing::debug!(count = observer.observed(), "Lazy images registered");
        Self {
            observer,
            eager: false,
        }
    }

    /// Loads any observed image that currently touches the viewport and
    /// stops watching it.
    pub(crate) fn evaluate(&mut self, doc: &mut Document) {
        if self.eager {
            return;
        }
        let mut loaded = Vec::new();
        for entry in self.observer.take_entries(doc) {
            if !entry.intersecting {
                continue;
            }
            doc.swap_image_source(entry.node);
            doc.remove_class(entry.node, LAZY_CLASS);
            loaded.push(entry.node);
        }
        for node in loaded {
            self.observer.unobserve(node);
        }
    }

    /// Images still waiting for their first moment on screen.
    pub(crate) fn pending(&self) -> usize {
        if self.eager {
            0
        } else {
            self.observer.observed()
        }
    }
}
