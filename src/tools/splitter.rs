use std::sync::Arc;

use crate::assets::decode::{AssetInput, MediaKind, decode_image, filter_inputs};
use crate::assets::preview::{PreviewHandle, PreviewRegistry};
use crate::assets::raster::RasterSource;
use crate::compose::split::split_source;
use crate::encode::raster::OutputFormat;
use crate::export::packager::ExportEntry;
use crate::foundation::error::MediaResult;
use crate::layout::grid::GridSpec;
use crate::tools::{AssetStatus, BatchSummary, BatchThreading, failed, run_batch};

/// Archive name for split exports.
pub const SPLIT_ARCHIVE: &str = "split_images.zip";

/// JPEG quality for re-encoded JPEG tiles.
pub const SPLIT_JPEG_QUALITY: u8 = 92;

/// One source image queued for splitting.
#[derive(Debug)]
pub struct SplitItem {
    /// Stable item id.
    pub id: u64,
    /// Original input.
    pub input: AssetInput,
    /// Split this item on the next pass.
    pub include: bool,
    /// Processing state.
    pub status: AssetStatus,
    /// Encoded tiles from the last successful pass, row-major.
    pub tiles: Vec<Arc<Vec<u8>>>,
    raster: Option<RasterSource>,
    preview: Option<PreviewHandle>,
}

impl SplitItem {
    /// Preview handle, present while the item decoded successfully.
    pub fn preview(&self) -> Option<&PreviewHandle> {
        self.preview.as_ref()
    }
}

/// Grid-splitter working set.
#[derive(Debug)]
pub struct Splitter {
    items: Vec<SplitItem>,
    spec: GridSpec,
    threading: BatchThreading,
    previews: PreviewRegistry,
    next_id: u64,
}

impl Splitter {
    /// Empty splitter with a validated grid.
    pub fn new(spec: GridSpec, threading: BatchThreading) -> MediaResult<Self> {
        spec.validate()?;
        Ok(Self {
            items: Vec::new(),
            spec,
            threading,
            previews: PreviewRegistry::new(),
            next_id: 1,
        })
    }

    /// Add image inputs; anything else is ignored. Returns the number of items added.
    pub fn add(&mut self, inputs: Vec<AssetInput>) -> usize {
        let images = filter_inputs(inputs, MediaKind::Image);
        let added = images.len();
        for input in images {
            let id = self.next_id;
            self.next_id += 1;
            let (raster, status) = match decode_image(&input.bytes) {
                Ok(r) => (Some(r), AssetStatus::Pending),
                Err(e) => (None, failed(&input.name, &e)),
            };
            let preview = raster.as_ref().map(|r| self.previews.acquire(r));
            self.items.push(SplitItem {
                id,
                input,
                include: true,
                status,
                tiles: Vec::new(),
                raster,
                preview,
            });
        }
        added
    }

    /// Toggle the include flag of item `id`.
    pub fn set_include(&mut self, id: u64, include: bool) -> bool {
        match self.items.iter_mut().find(|it| it.id == id) {
            Some(it) => {
                it.include = include;
                true
            }
            None => false,
        }
    }

    /// Replace the grid. Tiles from earlier passes are kept until the next `process`.
    pub fn set_spec(&mut self, spec: GridSpec) -> MediaResult<()> {
        spec.validate()?;
        self.spec = spec;
        Ok(())
    }

    /// Current grid.
    pub fn spec(&self) -> &GridSpec {
        &self.spec
    }

    /// Remove item `id`, releasing its preview.
    pub fn remove(&mut self, id: u64) -> bool {
        let before = self.items.len();
        self.items.retain(|it| it.id != id);
        self.items.len() != before
    }

    /// Remove every item.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Items in insertion order.
    pub fn items(&self) -> &[SplitItem] {
        &self.items
    }

    /// Live preview handles held by this splitter.
    pub fn live_previews(&self) -> usize {
        self.previews.live()
    }

    /// Split every included, decodable item with the current grid.
    #[tracing::instrument(skip(self), fields(items = self.items.len()))]
    pub fn process(&mut self) -> MediaResult<BatchSummary> {
        let spec = self.spec;
        let jobs: Vec<(usize, &RasterSource, &str)> = self
            .items
            .iter()
            .enumerate()
            .filter(|(_, it)| it.include)
            .filter_map(|(i, it)| it.raster.as_ref().map(|r| (i, r, it.input.mime.as_str())))
            .collect();

        let results = run_batch(&jobs, &self.threading, |surfaces, (_, raster, mime)| {
            let format = OutputFormat::from_mime(mime, SPLIT_JPEG_QUALITY);
            split_source(raster, &spec, surfaces)?
                .iter()
                .map(|t| format.encode(&t.image).map(Arc::new))
                .collect::<MediaResult<Vec<_>>>()
        })?;
        let indices: Vec<usize> = jobs.iter().map(|(i, _, _)| *i).collect();

        let mut summary = BatchSummary {
            skipped: self.items.len() - indices.len(),
            ..BatchSummary::default()
        };
        for (i, result) in indices.into_iter().zip(results) {
            let item = &mut self.items[i];
            match result {
                Ok(tiles) => {
                    item.tiles = tiles;
                    item.status = AssetStatus::Ready;
                    summary.processed += 1;
                }
                Err(e) => {
                    item.tiles.clear();
                    item.status = failed(&item.input.name, &e);
                    summary.failed += 1;
                }
            }
        }
        tracing::info!(
            processed = summary.processed,
            failed = summary.failed,
            "split pass finished"
        );
        Ok(summary)
    }

    /// Tiles of included, processed items named `1.<ext>`, `2.<ext>`, ... across all items,
    /// where `<ext>` is each source's own extension.
    pub fn export_entries(&self) -> Vec<ExportEntry> {
        let mut out = Vec::new();
        let mut count = 1usize;
        for item in self.items.iter().filter(|it| it.include && !it.tiles.is_empty()) {
            let ext = item.input.extension();
            for tile in &item.tiles {
                out.push(ExportEntry::shared(format!("{count}.{ext}"), Arc::clone(tile)));
                count += 1;
            }
        }
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/tools/splitter.rs"]
mod tests;
