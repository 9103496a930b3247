//! Stateful per-tool workflows.
//!
//! Each tool owns its working set, drives the layout/compose/sample layers over it and hands
//! back [`crate::ExportEntry`] lists for the packager. Failures of independent assets are
//! recorded on the asset and reported once; they never abort the rest of the batch.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::foundation::error::{MediaError, MediaResult};
use crate::render::surface::SurfacePool;

pub(crate) mod cards;
pub(crate) mod documents;
pub(crate) mod splitter;
pub(crate) mod stills;
pub(crate) mod storyboard;

/// Worker controls for batch processing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchThreading {
    /// Process independent assets on a rayon pool when `true`.
    pub parallel: bool,
    /// Optional explicit worker thread count.
    pub threads: Option<usize>,
}

/// Processing state of one asset.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum AssetStatus {
    /// Not processed yet.
    #[default]
    Pending,
    /// Processed; outputs are available.
    Ready,
    /// Processing failed; the message is the reported error.
    Failed(String),
}

impl AssetStatus {
    /// `true` for [`AssetStatus::Failed`].
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

/// Counts returned by a processing pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Assets that produced output.
    pub processed: usize,
    /// Assets that failed.
    pub failed: usize,
    /// Assets left untouched (excluded or already done).
    pub skipped: usize,
}

pub(crate) fn build_thread_pool(threads: Option<usize>) -> MediaResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(MediaError::validation("'threads' must be >= 1 when set"));
    }
    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| MediaError::Other(anyhow::anyhow!("failed to build rayon thread pool: {e}")))
}

/// Map `f` over `items` in order, each worker owning its own [`SurfacePool`].
pub(crate) fn run_batch<T, R, F>(items: &[T], threading: &BatchThreading, f: F) -> MediaResult<Vec<R>>
where
    T: Sync,
    R: Send,
    F: Fn(&mut SurfacePool, &T) -> R + Sync,
{
    if !threading.parallel || items.len() < 2 {
        let mut surfaces = SurfacePool::default();
        return Ok(items.iter().map(|it| f(&mut surfaces, it)).collect());
    }

    let pool = build_thread_pool(threading.threads)?;
    Ok(pool.install(|| {
        items
            .par_iter()
            .map_init(SurfacePool::default, |surfaces, it| f(surfaces, it))
            .collect()
    }))
}

/// Log a per-asset failure once and turn it into a status.
pub(crate) fn failed(asset: &str, err: &MediaError) -> AssetStatus {
    tracing::warn!(asset, error = %err, "asset failed");
    AssetStatus::Failed(err.to_string())
}

#[cfg(test)]
#[path = "../tests/unit/tools/batch.rs"]
mod tests;
