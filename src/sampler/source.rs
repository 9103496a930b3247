use std::time::{Duration, Instant};

use crate::assets::decode::AssetInput;
use crate::assets::raster::RasterSource;
use crate::foundation::cancel::CancelToken;
use crate::foundation::error::{MediaError, MediaResult};
use crate::sampler::policy::{poster_time, sample_timestamps};

/// A seekable video decoder with one reusable decode surface.
///
/// `frame_at` takes `&mut self`, so seeks on one source are sequential by construction.
pub trait VideoSource {
    /// Duration in seconds.
    fn duration(&self) -> f64;

    /// Natural frame size.
    fn size(&self) -> (u32, u32);

    /// Seek to `time_s` and capture the frame at natural resolution.
    fn frame_at(&mut self, time_s: f64) -> MediaResult<RasterSource>;
}

/// A paged document rasterizer.
pub trait PageSource {
    /// Number of pages.
    fn page_count(&self) -> u32;

    /// Render the zero-based page `index` at `scale`.
    fn render_page(&mut self, index: u32, scale: f64) -> MediaResult<RasterSource>;
}

/// Opens decoders for video inputs.
pub trait VideoOpener: Send + Sync {
    /// Open `input` for seeking.
    fn open(&self, input: &AssetInput) -> MediaResult<Box<dyn VideoSource>>;
}

/// Opens rasterizers for document inputs.
pub trait DocumentOpener: Send + Sync {
    /// Open `input` for page rendering.
    fn open(&self, input: &AssetInput) -> MediaResult<Box<dyn PageSource>>;
}

/// Cancellation and time budget for one sampling run.
#[derive(Clone, Debug, Default)]
pub struct SampleOpts {
    /// Checked before every seek or page render.
    pub cancel: CancelToken,
    /// Per-operation budget; an operation exceeding it fails with [`MediaError::TimedOut`].
    pub op_timeout: Option<Duration>,
}

impl SampleOpts {
    fn timed<T>(&self, what: impl FnOnce() -> String, op: impl FnOnce() -> MediaResult<T>) -> MediaResult<T> {
        self.cancel.check()?;
        let start = Instant::now();
        let out = op()?;
        if let Some(limit) = self.op_timeout {
            let took = start.elapsed();
            if took > limit {
                return Err(MediaError::timed_out(format!(
                    "{} took {}ms (limit {}ms)",
                    what(),
                    took.as_millis(),
                    limit.as_millis()
                )));
            }
        }
        Ok(out)
    }
}

/// One captured still.
#[derive(Clone, Debug)]
pub struct SampledFrame {
    /// One-based position in the run.
    pub number: u32,
    /// Source timestamp in seconds (page index for documents).
    pub time_s: f64,
    /// Captured pixels.
    pub raster: RasterSource,
}

/// Capture evenly spaced stills from `src`, strictly in timestamp order.
#[tracing::instrument(skip(src, opts), fields(duration = src.duration()))]
pub fn sample_video(src: &mut dyn VideoSource, opts: &SampleOpts) -> MediaResult<Vec<SampledFrame>> {
    let times = sample_timestamps(src.duration());
    let mut out = Vec::with_capacity(times.len());
    for (i, t) in times.into_iter().enumerate() {
        let raster = opts.timed(|| format!("seek to {t:.3}s"), || src.frame_at(t))?;
        out.push(SampledFrame {
            number: i as u32 + 1,
            time_s: t,
            raster,
        });
    }
    tracing::debug!(frames = out.len(), "sampled video");
    Ok(out)
}

/// Capture the poster frame used when a video joins a storyboard.
pub fn capture_poster(src: &mut dyn VideoSource, opts: &SampleOpts) -> MediaResult<RasterSource> {
    let t = poster_time(src.duration());
    opts.timed(|| format!("poster seek to {t:.3}s"), || src.frame_at(t))
}

/// Render every page of `doc` in order. The first failing page fails the whole run.
#[tracing::instrument(skip(doc, opts), fields(pages = doc.page_count()))]
pub fn rasterize_pages(
    doc: &mut dyn PageSource,
    scale: f64,
    opts: &SampleOpts,
) -> MediaResult<Vec<SampledFrame>> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(MediaError::validation("page scale must be finite and > 0"));
    }
    let count = doc.page_count();
    let mut out = Vec::with_capacity(count as usize);
    for index in 0..count {
        let raster = opts.timed(
            || format!("render page {}", index + 1),
            || doc.render_page(index, scale),
        )?;
        out.push(SampledFrame {
            number: index + 1,
            time_s: f64::from(index),
            raster,
        });
    }
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/sampler/source.rs"]
mod tests;
