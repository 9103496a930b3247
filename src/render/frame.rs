use crate::assets::raster::RasterSource;
use crate::foundation::error::{MediaError, MediaResult};

/// Rendered output raster in straight (non-premultiplied) RGBA8.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row-major RGBA8 bytes.
    pub data: Vec<u8>,
}

impl RenderedImage {
    /// Wrap raw RGBA8 bytes, checking the length against the size.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> MediaResult<Self> {
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|px| px.checked_mul(4))
            .ok_or_else(|| MediaError::validation("rendered image size overflows"))?;
        if data.len() != expected {
            return Err(MediaError::validation(format!(
                "rendered image byte length mismatch: expected {expected}, got {}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Copy a decoded frame as-is, for encoding without composition.
    pub fn from_raster(src: &RasterSource) -> Self {
        Self {
            width: src.width(),
            height: src.height(),
            data: src.pixels().to_vec(),
        }
    }

    /// RGBA of one pixel, `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        let px = self.data.get(i..i + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// `true` when any pixel carries partial or zero alpha.
    pub fn has_transparency(&self) -> bool {
        self.data.chunks_exact(4).any(|px| px[3] != 255)
    }

    /// Alpha-free RGB8 copy with transparent regions flattened onto black.
    pub fn to_rgb8_over_black(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity((self.width as usize) * (self.height as usize) * 3);
        for px in self.data.chunks_exact(4) {
            let a = u16::from(px[3]);
            for &c in &px[..3] {
                out.push(((u16::from(c) * a + 127) / 255) as u8);
            }
        }
        out
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/frame.rs"]
mod tests;
