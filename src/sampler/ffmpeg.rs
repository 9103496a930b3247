use std::time::Duration;

use crate::assets::decode::AssetInput;
use crate::foundation::error::MediaResult;
use crate::sampler::source::{VideoOpener, VideoSource};

/// Opens videos through the system `ffprobe` / `ffmpeg`.
///
/// Without the `media-ffmpeg` feature every open fails with a decode error.
#[derive(Clone, Debug, Default)]
pub struct FfmpegOpener {
    /// Kill a single probe or seek that runs longer than this.
    pub op_timeout: Option<Duration>,
}

impl VideoOpener for FfmpegOpener {
    fn open(&self, input: &AssetInput) -> MediaResult<Box<dyn VideoSource>> {
        open_video(input, self.op_timeout)
    }
}

#[cfg(feature = "media-ffmpeg")]
fn open_video(input: &AssetInput, timeout: Option<Duration>) -> MediaResult<Box<dyn VideoSource>> {
    Ok(Box::new(imp::FfmpegVideo::open(input, timeout)?))
}

#[cfg(not(feature = "media-ffmpeg"))]
fn open_video(input: &AssetInput, _timeout: Option<Duration>) -> MediaResult<Box<dyn VideoSource>> {
    Err(crate::foundation::error::MediaError::decode(format!(
        "'{}': video inputs require the 'media-ffmpeg' feature",
        input.name
    )))
}

#[cfg(feature = "media-ffmpeg")]
mod imp {
    use std::process::Command;
    use std::time::Duration;

    use crate::assets::decode::AssetInput;
    use crate::assets::raster::RasterSource;
    use crate::foundation::error::{MediaError, MediaResult};
    use crate::sampler::process::{StagedInput, run_captured};
    use crate::sampler::source::VideoSource;

    /// A video file decoded one frame per `ffmpeg -ss` invocation.
    pub(super) struct FfmpegVideo {
        input: StagedInput,
        width: u32,
        height: u32,
        duration: f64,
        timeout: Option<Duration>,
    }

    impl FfmpegVideo {
        pub(super) fn open(input: &AssetInput, timeout: Option<Duration>) -> MediaResult<Self> {
            #[derive(serde::Deserialize)]
            struct ProbeStream {
                codec_type: Option<String>,
                width: Option<u32>,
                height: Option<u32>,
                duration: Option<String>,
            }
            #[derive(serde::Deserialize)]
            struct ProbeFormat {
                duration: Option<String>,
            }
            #[derive(serde::Deserialize)]
            struct ProbeOut {
                streams: Vec<ProbeStream>,
                format: Option<ProbeFormat>,
            }

            let staged = StagedInput::new(input)?;
            let mut cmd = Command::new("ffprobe");
            cmd.args([
                "-v",
                "error",
                "-print_format",
                "json",
                "-show_streams",
                "-show_format",
            ])
            .arg(staged.path());
            let stdout = run_captured(cmd, timeout, "ffprobe")?;

            let parsed: ProbeOut = serde_json::from_slice(&stdout)
                .map_err(|e| MediaError::decode(format!("ffprobe json parse failed: {e}")))?;
            let stream = parsed
                .streams
                .iter()
                .find(|s| s.codec_type.as_deref() == Some("video"))
                .ok_or_else(|| MediaError::decode(format!("'{}': no video stream", input.name)))?;
            let width = stream
                .width
                .filter(|w| *w > 0)
                .ok_or_else(|| MediaError::decode("missing video width from ffprobe"))?;
            let height = stream
                .height
                .filter(|h| *h > 0)
                .ok_or_else(|| MediaError::decode("missing video height from ffprobe"))?;
            let duration = parsed
                .format
                .and_then(|f| f.duration)
                .or_else(|| stream.duration.clone())
                .and_then(|d| d.trim().parse::<f64>().ok())
                .filter(|d| d.is_finite() && *d >= 0.0)
                .unwrap_or(0.0);

            tracing::debug!(name = %input.name, width, height, duration, "probed video");
            Ok(Self {
                input: staged,
                width,
                height,
                duration,
                timeout,
            })
        }
    }

    impl VideoSource for FfmpegVideo {
        fn duration(&self) -> f64 {
            self.duration
        }

        fn size(&self) -> (u32, u32) {
            (self.width, self.height)
        }

        fn frame_at(&mut self, time_s: f64) -> MediaResult<RasterSource> {
            let mut cmd = Command::new("ffmpeg");
            cmd.args(["-v", "error", "-ss", &format!("{time_s:.6}")])
                .arg("-i")
                .arg(self.input.path())
                .args([
                    "-frames:v",
                    "1",
                    "-f",
                    "rawvideo",
                    "-pix_fmt",
                    "rgba",
                    "pipe:1",
                ]);
            let mut frame = run_captured(cmd, self.timeout, "ffmpeg seek")?;

            let expected = self.width as usize * self.height as usize * 4;
            if frame.len() < expected {
                return Err(MediaError::decode(format!(
                    "decoded frame at {time_s:.3}s has {} bytes, expected {expected}",
                    frame.len()
                )));
            }
            frame.truncate(expected);
            RasterSource::from_rgba8(self.width, self.height, frame)
        }
    }
}

// No unit tests for the ffmpeg-backed source: it shells out to system tools and is covered by
// the fake sources in the sampler tests.
