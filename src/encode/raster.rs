use std::io::Cursor;

use image::ImageEncoder;
use serde::{Deserialize, Serialize};

use crate::foundation::error::{MediaError, MediaResult};
use crate::render::frame::RenderedImage;

/// Output codec for a rendered image.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "format", rename_all = "lowercase")]
pub enum OutputFormat {
    /// Lossless PNG with alpha.
    Png,
    /// Baseline JPEG; alpha is flattened onto black.
    Jpeg {
        /// 1..=100.
        quality: u8,
    },
}

impl OutputFormat {
    /// Quality used for storyboard sheets.
    pub const STORYBOARD_JPEG: Self = Self::Jpeg { quality: 90 };

    /// Quality used for video stills.
    pub const STILL_JPEG: Self = Self::Jpeg { quality: 85 };

    /// Pick the codec that matches a source's declared MIME type: JPEG sources stay JPEG,
    /// everything else becomes PNG.
    pub fn from_mime(mime: &str, jpeg_quality: u8) -> Self {
        match mime.trim().to_ascii_lowercase().as_str() {
            "image/jpeg" | "image/jpg" => Self::Jpeg {
                quality: jpeg_quality,
            },
            _ => Self::Png,
        }
    }

    /// Extension without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg { .. } => "jpg",
        }
    }

    /// MIME type of the encoded bytes.
    pub fn mime(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg { .. } => "image/jpeg",
        }
    }

    /// Encode `img`.
    pub fn encode(self, img: &RenderedImage) -> MediaResult<Vec<u8>> {
        let mut out = Cursor::new(Vec::new());
        match self {
            Self::Png => image::codecs::png::PngEncoder::new(&mut out)
                .write_image(&img.data, img.width, img.height, image::ExtendedColorType::Rgba8)
                .map_err(|e| MediaError::Other(anyhow::anyhow!("png encode failed: {e}")))?,
            Self::Jpeg { quality } => {
                if !(1..=100).contains(&quality) {
                    return Err(MediaError::validation(format!(
                        "jpeg quality must be within 1..=100, got {quality}"
                    )));
                }
                let rgb = img.to_rgb8_over_black();
                image::codecs::jpeg::JpegEncoder::new_with_quality(&mut out, quality)
                    .write_image(&rgb, img.width, img.height, image::ExtendedColorType::Rgb8)
                    .map_err(|e| MediaError::Other(anyhow::anyhow!("jpeg encode failed: {e}")))?
            }
        }
        Ok(out.into_inner())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/raster.rs"]
mod tests;
