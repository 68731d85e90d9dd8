//! Rendering surfaces — the opaque view containers fragments load into.
//!
//! A surface only needs to support being shown/hidden and having its content
//! replaced; everything else about rendering is a collaborator concern. The
//! controller resolves surfaces by string id through a [`SurfaceHost`].
//!
//! [`MemorySurfaces`] is the shipped in-memory host, used by the driver
//! binary and tests for headless operation.

use std::sync::{Arc, RwLock};

use dashmap::DashMap;

/// An addressable rendering surface.
pub trait Surface: Send + Sync {
    fn is_visible(&self) -> bool;
    fn set_visible(&self, visible: bool);
    /// Replace the surface's markup wholesale.
    fn replace_content(&self, content: &str);
    fn clear_content(&self);
    /// The current markup. Empty string when cleared.
    fn content(&self) -> String;
}

/// Resolves surfaces by container id. Entries may be absent.
pub trait SurfaceHost: Send + Sync {
    fn surface(&self, id: &str) -> Option<Arc<dyn Surface>>;
}

// ---------------------------------------------------------------------------
// In-memory host
// ---------------------------------------------------------------------------

/// A headless in-memory surface.
#[derive(Debug, Default)]
pub struct MemorySurface {
    visible: RwLock<bool>,
    content: RwLock<String>,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Surface for MemorySurface {
    fn is_visible(&self) -> bool {
        *self.visible.read().expect("surface poisoned")
    }

    fn set_visible(&self, visible: bool) {
        *self.visible.write().expect("surface poisoned") = visible;
    }

    fn replace_content(&self, content: &str) {
        let mut current = self.content.write().expect("surface poisoned");
        current.clear();
        current.push_str(content);
    }

    fn clear_content(&self) {
        self.content.write().expect("surface poisoned").clear();
    }

    fn content(&self) -> String {
        self.content.read().expect("surface poisoned").clone()
    }
}

/// Thread-safe set of in-memory surfaces keyed by container id.
#[derive(Debug, Clone, Default)]
pub struct MemorySurfaces {
    surfaces: Arc<DashMap<String, Arc<MemorySurface>>>,
}

impl MemorySurfaces {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a container id, creating its surface. Re-registering an
    /// existing id keeps the current surface.
    pub fn register(&self, id: &str) -> Arc<MemorySurface> {
        Arc::clone(
            self.surfaces
                .entry(id.to_string())
                .or_insert_with(|| Arc::new(MemorySurface::new()))
                .value(),
        )
    }

    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }
}

impl SurfaceHost for MemorySurfaces {
    fn surface(&self, id: &str) -> Option<Arc<dyn Surface>> {
        self.surfaces
            .get(id)
            .map(|entry| Arc::clone(entry.value()) as Arc<dyn Surface>)
    }
}
