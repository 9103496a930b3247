use std::collections::HashMap;

use crate::foundation::error::{MediaError, MediaResult};

/// Pool configuration for cached surfaces.
#[derive(Debug, Clone, Copy)]
pub struct SurfacePoolOpts {
    /// Maximum bytes retained across all buckets.
    pub max_pool_bytes: usize,
    /// Maximum number of retained surfaces per `(w, h)` bucket.
    pub max_surfaces_per_bucket: usize,
}

impl Default for SurfacePoolOpts {
    fn default() -> Self {
        Self {
            max_pool_bytes: 256 * 1024 * 1024,
            max_surfaces_per_bucket: 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct SurfaceKey {
    w: u16,
    h: u16,
}

impl SurfaceKey {
    fn new(width: u32, height: u32) -> MediaResult<Self> {
        let w: u16 = width.try_into().map_err(|_| {
            MediaError::surface(format!("surface width {width} exceeds {}", u16::MAX))
        })?;
        let h: u16 = height.try_into().map_err(|_| {
            MediaError::surface(format!("surface height {height} exceeds {}", u16::MAX))
        })?;
        if w == 0 || h == 0 {
            return Err(MediaError::surface(format!(
                "surface must be non-empty, got {width}x{height}"
            )));
        }
        Ok(Self { w, h })
    }

    fn byte_len(self) -> usize {
        (self.w as usize)
            .saturating_mul(self.h as usize)
            .saturating_mul(4)
    }
}

/// Allocation counters, mostly useful in tests and debug logs.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SurfacePoolStats {
    /// Surfaces currently parked in the pool.
    pub retained_surfaces: usize,
    /// Bytes currently parked in the pool.
    pub retained_bytes: usize,
    /// Fresh allocations served.
    pub alloc_surfaces: u64,
    /// Surfaces handed out from the pool instead of allocated.
    pub reused_surfaces: u64,
    /// Releases that were dropped because a cap was hit.
    pub dropped_on_release: u64,
}

/// Bounded pool of CPU pixmaps keyed by size.
///
/// Grid splits render many same-sized tiles; recycling the pixmap avoids one allocation per
/// tile. Each worker owns its own pool.
#[derive(Default)]
pub struct SurfacePool {
    opts: SurfacePoolOpts,
    stats: SurfacePoolStats,
    buckets: HashMap<SurfaceKey, Vec<vello_cpu::Pixmap>>,
}

impl SurfacePool {
    /// Create an empty pool.
    pub fn new(opts: SurfacePoolOpts) -> Self {
        Self {
            opts,
            stats: SurfacePoolStats::default(),
            buckets: HashMap::new(),
        }
    }

    /// Snapshot of the allocation counters.
    pub fn stats(&self) -> SurfacePoolStats {
        self.stats.clone()
    }

    /// Hand out a `width x height` pixmap. Contents of a reused pixmap are unspecified.
    pub fn borrow(&mut self, width: u32, height: u32) -> MediaResult<vello_cpu::Pixmap> {
        let key = SurfaceKey::new(width, height)?;
        if let Some(p) = self.buckets.get_mut(&key).and_then(Vec::pop) {
            self.stats.retained_surfaces = self.stats.retained_surfaces.saturating_sub(1);
            self.stats.retained_bytes = self.stats.retained_bytes.saturating_sub(key.byte_len());
            self.stats.reused_surfaces = self.stats.reused_surfaces.saturating_add(1);
            return Ok(p);
        }

        self.stats.alloc_surfaces = self.stats.alloc_surfaces.saturating_add(1);
        Ok(vello_cpu::Pixmap::new(key.w, key.h))
    }

    /// Return a pixmap to the pool, or drop it when the pool is full.
    pub fn release(&mut self, pixmap: vello_cpu::Pixmap) {
        let key = SurfaceKey {
            w: pixmap.width(),
            h: pixmap.height(),
        };
        let bytes = key.byte_len();
        if self.opts.max_surfaces_per_bucket == 0
            || self.stats.retained_bytes.saturating_add(bytes) > self.opts.max_pool_bytes
        {
            self.stats.dropped_on_release = self.stats.dropped_on_release.saturating_add(1);
            return;
        }

        let bucket = self.buckets.entry(key).or_default();
        if bucket.len() >= self.opts.max_surfaces_per_bucket {
            self.stats.dropped_on_release = self.stats.dropped_on_release.saturating_add(1);
            return;
        }
        bucket.push(pixmap);
        self.stats.retained_surfaces = self.stats.retained_surfaces.saturating_add(1);
        self.stats.retained_bytes = self.stats.retained_bytes.saturating_add(bytes);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
