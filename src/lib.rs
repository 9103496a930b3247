//! mediakit is a canvas composition and batch export engine for small media tools.
//!
//! The engine computes deterministic layouts over raster sources, rasterizes them on the CPU
//! and packages the results into collision-free archives:
//!
//! - cut images into grid tiles ([`Splitter`])
//! - tile images and video posters into contact sheets ([`StoryboardWorkspace`])
//! - compose captioned logo cards ([`CardDeck`])
//! - sample stills from videos ([`VideoStills`]) and pages from PDFs ([`PdfDocuments`])
//! - rename files with an ordered rule pipeline ([`RenameBatch`])
//! - generate ad-link markup ([`adlinks`])
//!
//! Every tool hands back [`ExportEntry`] lists; [`ExportPackager`] turns them into a single file
//! or a zip archive.
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod foundation;

pub(crate) mod compose;
pub(crate) mod encode;
pub(crate) mod export;
pub(crate) mod layout;
pub(crate) mod rename;
pub(crate) mod render;
pub(crate) mod sampler;
pub(crate) mod tools;

pub mod adlinks;
pub mod config;

#[cfg(test)]
#[path = "../tests/unit/fixtures.rs"]
pub(crate) mod fixtures;

pub use crate::foundation::cancel::CancelToken;
pub use crate::foundation::color::Rgb8;
pub use crate::foundation::core::{Affine, Canvas, Point, Rect, Tile, Vec2};
pub use crate::foundation::error::{MediaError, MediaResult};

pub use crate::assets::decode::{AssetInput, MediaKind, decode_image, filter_inputs, mime_from_name};
pub use crate::assets::preview::{PreviewHandle, PreviewRegistry};
pub use crate::assets::raster::RasterSource;

pub use crate::layout::contact_sheet::{
    CellPlacement, ContactSheetLayout, ContactSheetSpec, MAX_SHEET_WIDTH, SheetWidth,
    compute_contact_sheet_layout, grid_shape,
};
pub use crate::layout::fit::{crop_to_fill, fit_scale, scale_to_fit};
pub use crate::layout::grid::{GridMode, GridPartition, GridSpec, compute_grid_partition};

pub use crate::render::cpu::{ImagePaint, Painter};
pub use crate::render::frame::RenderedImage;
pub use crate::render::surface::{SurfacePool, SurfacePoolOpts, SurfacePoolStats};
pub use crate::render::text::{FontSet, LineMetrics, ShapedLine, TextLayoutEngine};

pub use crate::compose::card::{
    CARD_PADDING, Card, CardLayout, CardRenderer, CardStyle, LINE_HEIGHT_FACTOR, LinePlacement,
    layout_card,
};
pub use crate::compose::split::{SplitTile, split_source};
pub use crate::compose::storyboard::{ContactSheet, render_contact_sheet};

pub use crate::sampler::ffmpeg::FfmpegOpener;
pub use crate::sampler::pdf::PdftoppmOpener;
pub use crate::sampler::policy::{DEFAULT_PAGE_SCALE, POSTER_TIME_S, poster_time, sample_timestamps};
pub use crate::sampler::source::{
    DocumentOpener, PageSource, SampleOpts, SampledFrame, VideoOpener, VideoSource,
    capture_poster, rasterize_pages, sample_video,
};

pub use crate::rename::pipeline::{RENAME_ARCHIVE, RenameBatch, RenameItem, derive_all, split_name};
pub use crate::rename::rules::{Casing, Numbering, RenameRules, clean_name, transform};

pub use crate::encode::archive::{ArchiveRecord, ArchiveSink, InMemoryArchive, ZipArchiveSink};
pub use crate::encode::raster::OutputFormat;
pub use crate::export::naming::{
    NameRegistry, normalize_entry_name, sanitize_filename, split_extension,
};
pub use crate::export::packager::{ExportEntry, ExportOutput, ExportPackager};

pub use crate::tools::cards::{CARD_ARCHIVE, CardDeck, DeckCard, DeckSettings};
pub use crate::tools::documents::{DocumentBatch, DocumentItem, PageImage, PdfDocuments};
pub use crate::tools::splitter::{SPLIT_ARCHIVE, SPLIT_JPEG_QUALITY, SplitItem, Splitter};
pub use crate::tools::stills::{STILLS_ARCHIVE, Still, VideoItem, VideoStills};
pub use crate::tools::storyboard::{
    BoardImage, BoardSettings, STORYBOARD_ARCHIVE, StoryboardProject, StoryboardWorkspace,
};
pub use crate::tools::{AssetStatus, BatchSummary, BatchThreading};
