use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::assets::decode::{AssetInput, MediaKind, decode_image};
use crate::assets::preview::{PreviewHandle, PreviewRegistry};
use crate::assets::raster::RasterSource;
use crate::compose::storyboard::render_contact_sheet;
use crate::encode::raster::OutputFormat;
use crate::export::naming::sanitize_filename;
use crate::export::packager::ExportEntry;
use crate::foundation::error::{MediaError, MediaResult};
use crate::layout::contact_sheet::{ContactSheetSpec, SheetWidth};
use crate::render::surface::SurfacePool;
use crate::sampler::source::{SampleOpts, VideoOpener, capture_poster};
use crate::tools::{BatchSummary, BatchThreading, failed, run_batch};

/// Archive name for "download all".
pub const STORYBOARD_ARCHIVE: &str = "storyboards.zip";

/// Per-board sheet settings.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardSettings {
    /// Gap between cells and around the border.
    pub gap: u32,
    /// Explicit width, used when `auto_width` is off.
    pub width: u32,
    /// Derive the width from the first image.
    pub auto_width: bool,
}

impl Default for BoardSettings {
    fn default() -> Self {
        Self {
            gap: 0,
            width: 1920,
            auto_width: true,
        }
    }
}

impl BoardSettings {
    /// Contact-sheet request for these settings.
    pub fn sheet_spec(&self) -> ContactSheetSpec {
        ContactSheetSpec {
            gap: self.gap,
            width: if self.auto_width {
                SheetWidth::Auto
            } else {
                SheetWidth::Fixed(self.width)
            },
        }
    }

    /// Reject a zero explicit width.
    pub fn validate(&self) -> MediaResult<()> {
        if !self.auto_width && self.width == 0 {
            return Err(MediaError::validation("board width must be > 0"));
        }
        Ok(())
    }
}

/// One image on a board.
#[derive(Debug)]
pub struct BoardImage {
    /// Stable id within the workspace.
    pub id: u64,
    /// Name of the input it came from.
    pub source_name: String,
    raster: RasterSource,
    preview: PreviewHandle,
}

impl BoardImage {
    /// Decoded pixels (the poster frame for videos).
    pub fn raster(&self) -> &RasterSource {
        &self.raster
    }

    /// Preview handle owned by this image.
    pub fn preview(&self) -> &PreviewHandle {
        &self.preview
    }
}

/// A named storyboard with its own image sequence.
#[derive(Debug)]
pub struct StoryboardProject {
    /// Stable id within the workspace.
    pub id: u64,
    name: String,
    images: Vec<BoardImage>,
    settings: BoardSettings,
    last_rendered: Option<Arc<Vec<u8>>>,
    last_size: Option<(u32, u32)>,
}

impl StoryboardProject {
    fn new(id: u64, name: String) -> Self {
        Self {
            id,
            name,
            images: Vec::new(),
            settings: BoardSettings::default(),
            last_rendered: None,
            last_size: None,
        }
    }

    /// Sanitized board name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Images in sheet order.
    pub fn images(&self) -> &[BoardImage] {
        &self.images
    }

    /// Current settings.
    pub fn settings(&self) -> &BoardSettings {
        &self.settings
    }

    /// JPEG bytes of the last render, cleared whenever the board changes.
    pub fn last_rendered(&self) -> Option<&Arc<Vec<u8>>> {
        self.last_rendered.as_ref()
    }

    /// Pixel size of the last render.
    pub fn last_size(&self) -> Option<(u32, u32)> {
        self.last_size
    }

    fn invalidate(&mut self) {
        self.last_rendered = None;
        self.last_size = None;
    }

    fn render(&self, surfaces: &mut SurfacePool) -> MediaResult<Option<(Vec<u8>, (u32, u32))>> {
        let rasters: Vec<RasterSource> = self.images.iter().map(|i| i.raster.clone()).collect();
        let Some(sheet) = render_contact_sheet(&rasters, &self.settings.sheet_spec(), surfaces)?
        else {
            return Ok(None);
        };
        let bytes = OutputFormat::STORYBOARD_JPEG.encode(&sheet.image)?;
        Ok(Some((bytes, (sheet.image.width, sheet.image.height))))
    }
}

/// Set of storyboard projects with one active board.
pub struct StoryboardWorkspace {
    projects: Vec<StoryboardProject>,
    active: u64,
    next_id: u64,
    previews: PreviewRegistry,
    surfaces: SurfacePool,
    video: Option<Arc<dyn VideoOpener>>,
    sample: SampleOpts,
    threading: BatchThreading,
}

impl std::fmt::Debug for StoryboardWorkspace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoryboardWorkspace")
            .field("projects", &self.projects)
            .field("active", &self.active)
            .field("video", &self.video.is_some())
            .finish_non_exhaustive()
    }
}

impl Default for StoryboardWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

impl StoryboardWorkspace {
    /// Workspace holding a single empty `Board_1`.
    pub fn new() -> Self {
        Self {
            projects: vec![StoryboardProject::new(1, "Board_1".to_string())],
            active: 1,
            next_id: 2,
            previews: PreviewRegistry::new(),
            surfaces: SurfacePool::default(),
            video: None,
            sample: SampleOpts::default(),
            threading: BatchThreading::default(),
        }
    }

    /// Decode videos with `opener`; without one, video inputs fail.
    pub fn with_video(mut self, opener: Arc<dyn VideoOpener>, sample: SampleOpts) -> Self {
        self.video = Some(opener);
        self.sample = sample;
        self
    }

    /// Worker controls for [`StoryboardWorkspace::export_all`].
    pub fn with_threading(mut self, threading: BatchThreading) -> Self {
        self.threading = threading;
        self
    }

    /// All projects in creation order.
    pub fn projects(&self) -> &[StoryboardProject] {
        &self.projects
    }

    /// The active project.
    pub fn active(&self) -> &StoryboardProject {
        let idx = self.active_index();
        &self.projects[idx]
    }

    /// Live preview handles across all boards.
    pub fn live_previews(&self) -> usize {
        self.previews.live()
    }

    fn active_index(&self) -> usize {
        self.projects
            .iter()
            .position(|p| p.id == self.active)
            .unwrap_or(0)
    }

    fn active_mut(&mut self) -> &mut StoryboardProject {
        let idx = self.active_index();
        &mut self.projects[idx]
    }

    /// Create `Board_<n>` (n = project count after insertion) and make it active.
    pub fn add_project(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        let name = format!("Board_{}", self.projects.len() + 1);
        self.projects.push(StoryboardProject::new(id, name));
        self.active = id;
        id
    }

    /// Remove project `id`. The last remaining project cannot be removed; removing the active
    /// project activates the first one.
    pub fn remove_project(&mut self, id: u64) -> bool {
        if self.projects.len() <= 1 {
            return false;
        }
        let before = self.projects.len();
        self.projects.retain(|p| p.id != id);
        if self.projects.len() == before {
            return false;
        }
        if self.active == id {
            self.active = self.projects[0].id;
        }
        true
    }

    /// Make project `id` active.
    pub fn set_active(&mut self, id: u64) -> bool {
        if self.projects.iter().any(|p| p.id == id) {
            self.active = id;
            true
        } else {
            false
        }
    }

    /// Rename the active project; the name is sanitized, and an empty result is rejected.
    pub fn rename_active(&mut self, name: &str) -> MediaResult<()> {
        let clean = sanitize_filename(name);
        if clean.is_empty() {
            return Err(MediaError::validation("board name must not be empty"));
        }
        self.active_mut().name = clean;
        Ok(())
    }

    /// Replace the active project's settings.
    pub fn set_settings(&mut self, settings: BoardSettings) -> MediaResult<()> {
        settings.validate()?;
        let p = self.active_mut();
        p.settings = settings;
        p.invalidate();
        Ok(())
    }

    /// Append images and video posters to the active board.
    ///
    /// Inputs that are neither `image/*` nor `video/*` are counted as skipped; inputs that fail
    /// to decode are reported once and counted as failed.
    #[tracing::instrument(skip(self, inputs), fields(board = self.active))]
    pub fn add(&mut self, inputs: Vec<AssetInput>) -> BatchSummary {
        let mut summary = BatchSummary::default();
        let mut added = Vec::new();
        for input in inputs {
            let decoded = match input.kind() {
                MediaKind::Image => decode_image(&input.bytes),
                MediaKind::Video => self.poster(&input),
                _ => {
                    summary.skipped += 1;
                    continue;
                }
            };
            match decoded {
                Ok(raster) => {
                    let id = self.next_id;
                    self.next_id += 1;
                    added.push(BoardImage {
                        id,
                        preview: self.previews.acquire(&raster),
                        source_name: input.name,
                        raster,
                    });
                    summary.processed += 1;
                }
                Err(e) => {
                    failed(&input.name, &e);
                    summary.failed += 1;
                }
            }
        }
        let p = self.active_mut();
        p.images.extend(added);
        p.invalidate();
        summary
    }

    fn poster(&self, input: &AssetInput) -> MediaResult<RasterSource> {
        let opener = self
            .video
            .as_ref()
            .ok_or_else(|| MediaError::decode(format!("no video decoder for '{}'", input.name)))?;
        let mut src = opener.open(input)?;
        capture_poster(src.as_mut(), &self.sample)
    }

    /// Swap the image at `index` with its neighbour `delta` places away. Out-of-range moves
    /// are ignored.
    pub fn move_image(&mut self, index: usize, delta: isize) -> bool {
        let p = self.active_mut();
        let Some(target) = index.checked_add_signed(delta) else {
            return false;
        };
        if index >= p.images.len() || target >= p.images.len() || target == index {
            return false;
        }
        p.images.swap(index, target);
        p.invalidate();
        true
    }

    /// Remove the image at `index` from the active board.
    pub fn remove_image(&mut self, index: usize) -> bool {
        let p = self.active_mut();
        if index >= p.images.len() {
            return false;
        }
        p.images.remove(index);
        p.invalidate();
        true
    }

    /// Remove every image from the active board.
    pub fn clear(&mut self) {
        let p = self.active_mut();
        p.images.clear();
        p.invalidate();
    }

    /// Render the active board into its cached JPEG. `Ok(None)` for an empty board.
    pub fn render_active(&mut self) -> MediaResult<Option<Arc<Vec<u8>>>> {
        let idx = self.active_index();
        if let Some(bytes) = &self.projects[idx].last_rendered {
            return Ok(Some(Arc::clone(bytes)));
        }
        let Some((bytes, size)) = self.projects[idx].render(&mut self.surfaces)? else {
            return Ok(None);
        };
        let bytes = Arc::new(bytes);
        let p = &mut self.projects[idx];
        p.last_rendered = Some(Arc::clone(&bytes));
        p.last_size = Some(size);
        Ok(Some(bytes))
    }

    /// `<name>.jpg` for the active board. `Ok(None)` for an empty board.
    pub fn save_current(&mut self) -> MediaResult<Option<ExportEntry>> {
        let name = format!("{}.jpg", self.active().name);
        Ok(self
            .render_active()?
            .map(|bytes| ExportEntry::shared(name, bytes)))
    }

    /// Render every non-empty board on its own target and return `<name>.jpg` entries in
    /// project order. A board that fails to render is reported and left out; the others are
    /// still returned. Name collisions are left to the packager.
    #[tracing::instrument(skip(self), fields(projects = self.projects.len()))]
    pub fn export_all(&mut self) -> MediaResult<Vec<ExportEntry>> {
        let pending: Vec<usize> = self
            .projects
            .iter()
            .enumerate()
            .filter(|(_, p)| !p.images.is_empty() && p.last_rendered.is_none())
            .map(|(i, _)| i)
            .collect();
        let projects = &self.projects;
        let rendered = run_batch(&pending, &self.threading, |surfaces, &i| {
            projects[i].render(surfaces)
        })?;
        for (i, result) in pending.into_iter().zip(rendered) {
            match result {
                Ok(Some((bytes, size))) => {
                    let p = &mut self.projects[i];
                    p.last_rendered = Some(Arc::new(bytes));
                    p.last_size = Some(size);
                }
                Ok(None) => {}
                Err(e) => {
                    failed(&self.projects[i].name, &e);
                }
            }
        }

        let entries: Vec<ExportEntry> = self
            .projects
            .iter()
            .filter_map(|p| {
                p.last_rendered
                    .as_ref()
                    .map(|b| ExportEntry::shared(format!("{}.jpg", p.name), Arc::clone(b)))
            })
            .collect();
        tracing::info!(boards = entries.len(), "storyboards rendered");
        Ok(entries)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/tools/storyboard.rs"]
mod tests;
