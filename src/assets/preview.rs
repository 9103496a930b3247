use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};

use crate::assets::raster::RasterSource;

#[derive(Debug, Default)]
struct RegistryState {
    next_id: AtomicU64,
    live: AtomicUsize,
}

/// Issues displayable handles for decoded frames and tracks how many are outstanding.
///
/// A handle is released exactly once, when it is dropped. Items that own handles release
/// them when they are removed from their collection or when the collection is cleared.
#[derive(Clone, Debug, Default)]
pub struct PreviewRegistry {
    state: Arc<RegistryState>,
}

impl PreviewRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire a handle presenting `raster`.
    pub fn acquire(&self, raster: &RasterSource) -> PreviewHandle {
        let id = self.state.next_id.fetch_add(1, Ordering::Relaxed) + 1;
        self.state.live.fetch_add(1, Ordering::AcqRel);
        tracing::trace!(id, "preview handle acquired");
        PreviewHandle {
            id,
            width: raster.width(),
            height: raster.height(),
            state: Arc::clone(&self.state),
        }
    }

    /// Number of handles that have not been released yet.
    pub fn live(&self) -> usize {
        self.state.live.load(Ordering::Acquire)
    }
}

/// Scoped presentation handle for one decoded frame.
#[derive(Debug)]
pub struct PreviewHandle {
    id: u64,
    width: u32,
    height: u32,
    state: Arc<RegistryState>,
}

impl PreviewHandle {
    /// Registry-unique id, suitable as a display key.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Presented size in pixels.
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        self.state.live.fetch_sub(1, Ordering::AcqRel);
        tracing::trace!(id = self.id, "preview handle released");
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/preview.rs"]
mod tests;
