use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;

use crate::assets::raster::RasterSource;
use crate::foundation::error::{MediaError, MediaResult};

/// MIME category an input was declared with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MediaKind {
    /// `image/*`
    Image,
    /// `video/*`
    Video,
    /// `application/pdf`
    Pdf,
    /// Anything else.
    Other,
}

impl MediaKind {
    /// Classify a declared MIME type.
    pub fn from_mime(mime: &str) -> Self {
        let mime = mime.trim().to_ascii_lowercase();
        if mime.starts_with("image/") {
            Self::Image
        } else if mime.starts_with("video/") {
            Self::Video
        } else if mime == "application/pdf" {
            Self::Pdf
        } else {
            Self::Other
        }
    }
}

/// Raw asset as handed over by a file picker: bytes plus a declared MIME type.
#[derive(Clone, Debug)]
pub struct AssetInput {
    /// File name including extension.
    pub name: String,
    /// Declared MIME type.
    pub mime: String,
    /// Raw encoded bytes.
    pub bytes: Arc<Vec<u8>>,
    /// Where the bytes came from, when they were read from disk. External decoders that
    /// work on files (ffmpeg, pdftoppm) use it.
    pub origin: Option<PathBuf>,
}

impl AssetInput {
    /// Wrap in-memory bytes.
    pub fn new(name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            mime: mime.into(),
            bytes: Arc::new(bytes),
            origin: None,
        }
    }

    /// Read a file, guessing its MIME type from the extension.
    pub fn from_path(path: &Path) -> MediaResult<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("read input '{}'", path.display()))?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| MediaError::validation("input path has no file name"))?;
        Ok(Self {
            mime: mime_from_name(&name).to_owned(),
            name,
            bytes: Arc::new(bytes),
            origin: Some(path.to_path_buf()),
        })
    }

    /// Declared MIME category.
    pub fn kind(&self) -> MediaKind {
        MediaKind::from_mime(&self.mime)
    }

    /// Name without the part after the last `.`.
    pub fn stem(&self) -> &str {
        match self.name.rfind('.') {
            Some(i) => &self.name[..i],
            None => &self.name,
        }
    }

    /// Extension after the last `.`, without the dot. Names without a dot yield the whole
    /// name, the way `name.split('.').pop()` does.
    pub fn extension(&self) -> &str {
        self.name.rsplit('.').next().unwrap_or(&self.name)
    }
}

/// Keep only inputs of the given kind, preserving order. Non-matching inputs are dropped
/// silently.
pub fn filter_inputs(inputs: Vec<AssetInput>, kind: MediaKind) -> Vec<AssetInput> {
    inputs.into_iter().filter(|i| i.kind() == kind).collect()
}

/// Decode encoded image bytes into a straight-alpha [`RasterSource`].
pub fn decode_image(bytes: &[u8]) -> MediaResult<RasterSource> {
    let dyn_img = image::load_from_memory(bytes)
        .map_err(|e| MediaError::decode(format!("decode image from memory: {e}")))?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();
    RasterSource::from_rgba8(width, height, rgba.into_raw())
}

/// Best-effort MIME type from a file name's extension.
pub fn mime_from_name(name: &str) -> &'static str {
    let ext = name
        .rsplit_once('.')
        .map(|(_, e)| e.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "bmp" => "image/bmp",
        "tif" | "tiff" => "image/tiff",
        "mp4" | "m4v" => "video/mp4",
        "mov" => "video/quicktime",
        "webm" => "video/webm",
        "mkv" => "video/x-matroska",
        "pdf" => "application/pdf",
        "mp3" => "audio/mpeg",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
