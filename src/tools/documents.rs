use std::sync::Arc;

use crate::assets::decode::{AssetInput, MediaKind, filter_inputs};
use crate::assets::preview::{PreviewHandle, PreviewRegistry};
use crate::encode::raster::OutputFormat;
use crate::export::packager::ExportEntry;
use crate::foundation::error::{MediaError, MediaResult};
use crate::render::frame::RenderedImage;
use crate::sampler::policy::DEFAULT_PAGE_SCALE;
use crate::sampler::source::{DocumentOpener, SampleOpts, rasterize_pages};

/// One rendered page.
#[derive(Debug)]
pub struct PageImage {
    /// One-based page number.
    pub number: u32,
    /// PNG bytes.
    pub bytes: Arc<Vec<u8>>,
    /// Include the page in exports.
    pub checked: bool,
    preview: PreviewHandle,
}

impl PageImage {
    /// Presentation handle, released when the page is dropped.
    pub fn preview(&self) -> &PreviewHandle {
        &self.preview
    }
}

/// A fully rendered document.
#[derive(Debug)]
pub struct DocumentItem {
    /// Stable id.
    pub id: u64,
    /// Input file name, used for the archive name.
    pub name: String,
    /// Pages in order.
    pub pages: Vec<PageImage>,
}

impl DocumentItem {
    /// Archive name for this document's export.
    pub fn archive_name(&self) -> String {
        format!("{}_images.zip", self.name)
    }

    /// `true` when every page is checked.
    pub fn all_checked(&self) -> bool {
        self.pages.iter().all(|p| p.checked)
    }
}

/// Outcome of [`PdfDocuments::add`].
#[derive(Debug)]
pub struct DocumentBatch {
    /// Documents rendered and added, in input order.
    pub added: usize,
    /// The failure that stopped the batch, if any. Documents after it were not attempted.
    pub error: Option<MediaError>,
}

/// PDF-to-images working set.
pub struct PdfDocuments {
    docs: Vec<DocumentItem>,
    opener: Arc<dyn DocumentOpener>,
    sample: SampleOpts,
    scale: f64,
    previews: PreviewRegistry,
    next_id: u64,
}

impl std::fmt::Debug for PdfDocuments {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PdfDocuments")
            .field("docs", &self.docs)
            .field("scale", &self.scale)
            .finish_non_exhaustive()
    }
}

impl PdfDocuments {
    /// Empty working set rendering at [`DEFAULT_PAGE_SCALE`].
    pub fn new(opener: Arc<dyn DocumentOpener>, sample: SampleOpts) -> Self {
        Self {
            docs: Vec::new(),
            opener,
            sample,
            scale: DEFAULT_PAGE_SCALE,
            previews: PreviewRegistry::new(),
            next_id: 1,
        }
    }

    /// Override the page render scale.
    pub fn with_scale(mut self, scale: f64) -> MediaResult<Self> {
        if !scale.is_finite() || scale <= 0.0 {
            return Err(MediaError::validation("page scale must be finite and > 0"));
        }
        self.scale = scale;
        Ok(self)
    }

    /// Documents, newest first.
    pub fn documents(&self) -> &[DocumentItem] {
        &self.docs
    }

    fn render(&self, input: &AssetInput) -> MediaResult<Vec<PageImage>> {
        let mut doc = self.opener.open(input)?;
        rasterize_pages(doc.as_mut(), self.scale, &self.sample)?
            .into_iter()
            .map(|f| {
                let bytes = OutputFormat::Png.encode(&RenderedImage::from_raster(&f.raster))?;
                Ok(PageImage {
                    number: f.number,
                    bytes: Arc::new(bytes),
                    checked: true,
                    preview: self.previews.acquire(&f.raster),
                })
            })
            .collect()
    }

    /// Render `application/pdf` inputs one after another, each inserted at the front.
    ///
    /// A partially rendered document is unusable, so the first failure stops the batch:
    /// documents rendered before it are kept, the failing one and everything after it are
    /// dropped.
    #[tracing::instrument(skip(self, inputs))]
    pub fn add(&mut self, inputs: Vec<AssetInput>) -> DocumentBatch {
        let mut added = 0;
        for input in filter_inputs(inputs, MediaKind::Pdf) {
            match self.render(&input) {
                Ok(pages) => {
                    let id = self.next_id;
                    self.next_id += 1;
                    tracing::debug!(doc = %input.name, pages = pages.len(), "document rendered");
                    self.docs.insert(
                        0,
                        DocumentItem {
                            id,
                            name: input.name,
                            pages,
                        },
                    );
                    added += 1;
                }
                Err(e) => {
                    tracing::warn!(doc = %input.name, error = %e, "document failed; batch stopped");
                    return DocumentBatch {
                        added,
                        error: Some(e),
                    };
                }
            }
        }
        DocumentBatch { added, error: None }
    }

    fn doc_mut(&mut self, id: u64) -> MediaResult<&mut DocumentItem> {
        self.docs
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| MediaError::validation(format!("no document with id {id}")))
    }

    /// Check or uncheck one page.
    pub fn set_page_checked(&mut self, id: u64, number: u32, checked: bool) -> MediaResult<()> {
        let page = self
            .doc_mut(id)?
            .pages
            .iter_mut()
            .find(|p| p.number == number)
            .ok_or_else(|| MediaError::validation(format!("document {id} has no page {number}")))?;
        page.checked = checked;
        Ok(())
    }

    /// Check or uncheck every page of a document.
    pub fn set_all_checked(&mut self, id: u64, checked: bool) -> MediaResult<()> {
        for p in &mut self.doc_mut(id)?.pages {
            p.checked = checked;
        }
        Ok(())
    }

    /// Remove document `id`, releasing the previews of its pages.
    pub fn remove(&mut self, id: u64) -> bool {
        let before = self.docs.len();
        self.docs.retain(|d| d.id != id);
        self.docs.len() != before
    }

    /// Drop every document and release all previews.
    pub fn clear(&mut self) {
        self.docs.clear();
    }

    /// Live preview handles held by pages of this working set.
    pub fn live_previews(&self) -> usize {
        self.previews.live()
    }

    /// `<n>.png` for every checked page of document `id`.
    pub fn export_entries(&self, id: u64) -> MediaResult<Vec<ExportEntry>> {
        let doc = self
            .docs
            .iter()
            .find(|d| d.id == id)
            .ok_or_else(|| MediaError::validation(format!("no document with id {id}")))?;
        Ok(doc
            .pages
            .iter()
            .filter(|p| p.checked)
            .map(|p| ExportEntry::shared(format!("{}.png", p.number), Arc::clone(&p.bytes)))
            .collect())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/tools/documents.rs"]
mod tests;
