use std::sync::Arc;

use crate::assets::decode::{AssetInput, MediaKind, filter_inputs};
use crate::assets::preview::{PreviewHandle, PreviewRegistry};
use crate::encode::raster::OutputFormat;
use crate::export::naming::sanitize_filename;
use crate::export::packager::ExportEntry;
use crate::foundation::error::{MediaError, MediaResult};
use crate::render::frame::RenderedImage;
use crate::sampler::source::{SampleOpts, VideoOpener, sample_video};
use crate::tools::{AssetStatus, BatchSummary, BatchThreading, failed, run_batch};

/// Archive name for video stills.
pub const STILLS_ARCHIVE: &str = "video_stills.zip";

/// One encoded still.
#[derive(Debug)]
pub struct Still {
    /// One-based frame number.
    pub number: u32,
    /// Seek timestamp in seconds.
    pub time_s: f64,
    /// JPEG bytes.
    pub bytes: Arc<Vec<u8>>,
    preview: PreviewHandle,
}

impl Still {
    /// Presentation handle, released when the still is dropped.
    pub fn preview(&self) -> &PreviewHandle {
        &self.preview
    }
}

/// One queued video.
#[derive(Debug)]
pub struct VideoItem {
    /// Stable id.
    pub id: u64,
    /// Original input.
    pub input: AssetInput,
    /// Folder name inside the archive: the sanitized file name without its extension.
    pub name: String,
    /// Processing state; `Ready` videos are skipped on later passes.
    pub status: AssetStatus,
    /// Stills in timestamp order.
    pub stills: Vec<Still>,
}

/// Video-stills working set.
pub struct VideoStills {
    videos: Vec<VideoItem>,
    opener: Arc<dyn VideoOpener>,
    sample: SampleOpts,
    threading: BatchThreading,
    previews: PreviewRegistry,
    next_id: u64,
}

impl std::fmt::Debug for VideoStills {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VideoStills")
            .field("videos", &self.videos)
            .field("sample", &self.sample)
            .field("threading", &self.threading)
            .finish_non_exhaustive()
    }
}

fn capture(
    opener: &dyn VideoOpener,
    input: &AssetInput,
    sample: &SampleOpts,
    previews: &PreviewRegistry,
) -> MediaResult<Vec<Still>> {
    let mut src = opener.open(input)?;
    sample_video(src.as_mut(), sample)?
        .into_iter()
        .map(|f| {
            let bytes = OutputFormat::STILL_JPEG.encode(&RenderedImage::from_raster(&f.raster))?;
            Ok(Still {
                number: f.number,
                time_s: f.time_s,
                bytes: Arc::new(bytes),
                preview: previews.acquire(&f.raster),
            })
        })
        .collect()
}

impl VideoStills {
    /// Empty working set decoding through `opener`.
    pub fn new(opener: Arc<dyn VideoOpener>, sample: SampleOpts, threading: BatchThreading) -> Self {
        Self {
            videos: Vec::new(),
            opener,
            sample,
            threading,
            previews: PreviewRegistry::new(),
            next_id: 1,
        }
    }

    /// Queue `video/*` inputs; anything else is ignored. Returns the number queued.
    pub fn add(&mut self, inputs: Vec<AssetInput>) -> usize {
        let videos = filter_inputs(inputs, MediaKind::Video);
        let added = videos.len();
        for input in videos {
            let id = self.next_id;
            self.next_id += 1;
            self.videos.push(VideoItem {
                id,
                name: sanitize_filename(input.stem()),
                input,
                status: AssetStatus::Pending,
                stills: Vec::new(),
            });
        }
        added
    }

    /// Videos in insertion order.
    pub fn videos(&self) -> &[VideoItem] {
        &self.videos
    }

    /// Remove video `id`, releasing the previews of its stills.
    pub fn remove(&mut self, id: u64) -> bool {
        let before = self.videos.len();
        self.videos.retain(|v| v.id != id);
        self.videos.len() != before
    }

    /// Drop every video and release all previews.
    pub fn clear(&mut self) {
        self.videos.clear();
    }

    /// Live preview handles held by stills of this working set.
    pub fn live_previews(&self) -> usize {
        self.previews.live()
    }

    /// Sample every video that has not been processed yet.
    ///
    /// Each video is sampled strictly in timestamp order on its own decoder; independent
    /// videos may run in parallel. A failing video is recorded and the rest continue.
    /// Cancellation leaves unfinished videos pending and returns [`MediaError::Cancelled`]
    /// after completed videos have been stored.
    #[tracing::instrument(skip(self), fields(videos = self.videos.len()))]
    pub fn process(&mut self) -> MediaResult<BatchSummary> {
        let pending: Vec<usize> = self
            .videos
            .iter()
            .enumerate()
            .filter(|(_, v)| v.status != AssetStatus::Ready)
            .map(|(i, _)| i)
            .collect();

        let (videos, opener, sample, previews) = (
            &self.videos,
            self.opener.as_ref(),
            &self.sample,
            &self.previews,
        );
        let results = run_batch(&pending, &self.threading, |_, &i| {
            capture(opener, &videos[i].input, sample, previews)
        })?;

        let mut summary = BatchSummary {
            skipped: self.videos.len() - pending.len(),
            ..BatchSummary::default()
        };
        let mut cancelled = false;
        for (i, result) in pending.into_iter().zip(results) {
            let v = &mut self.videos[i];
            match result {
                Ok(stills) => {
                    tracing::debug!(video = %v.name, stills = stills.len(), "video sampled");
                    v.stills = stills;
                    v.status = AssetStatus::Ready;
                    summary.processed += 1;
                }
                Err(MediaError::Cancelled) => cancelled = true,
                Err(e) => {
                    v.stills.clear();
                    v.status = failed(&v.input.name, &e);
                    summary.failed += 1;
                }
            }
        }
        if cancelled {
            return Err(MediaError::Cancelled);
        }
        tracing::info!(
            processed = summary.processed,
            failed = summary.failed,
            "video stills pass finished"
        );
        Ok(summary)
    }

    /// `<video>/<n>.jpg` for every still of every processed video.
    pub fn export_entries(&self) -> Vec<ExportEntry> {
        self.videos
            .iter()
            .flat_map(|v| {
                v.stills.iter().map(move |s| {
                    ExportEntry::shared(format!("{}/{}.jpg", v.name, s.number), Arc::clone(&s.bytes))
                })
            })
            .collect()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/tools/stills.rs"]
mod tests;
