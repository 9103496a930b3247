use std::sync::Arc;

use crate::foundation::error::{MediaError, MediaResult};

/// Immutable decoded raster: straight-alpha RGBA8, row-major, tightly packed.
///
/// Pixel storage is shared, so clones are cheap and never copy pixels.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RasterSource {
    width: u32,
    height: u32,
    pixels: Arc<Vec<u8>>,
}

impl RasterSource {
    /// Wrap straight RGBA8 pixels. The buffer length must be `width * height * 4`.
    pub fn from_rgba8(width: u32, height: u32, pixels: Vec<u8>) -> MediaResult<Self> {
        if width == 0 || height == 0 {
            return Err(MediaError::decode(format!(
                "raster must be non-empty, got {width}x{height}"
            )));
        }
        let expected = (width as usize)
            .checked_mul(height as usize)
            .and_then(|px| px.checked_mul(4))
            .ok_or_else(|| MediaError::decode("raster dimensions overflow"))?;
        if pixels.len() != expected {
            return Err(MediaError::decode(format!(
                "raster byte length mismatch: got {}, expected {expected}",
                pixels.len()
            )));
        }
        Ok(Self {
            width,
            height,
            pixels: Arc::new(pixels),
        })
    }

    /// Solid-color raster, mostly useful for fixtures.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> MediaResult<Self> {
        let px = (width as usize).saturating_mul(height as usize);
        Self::from_rgba8(width, height, rgba.repeat(px))
    }

    /// Natural width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Natural height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Natural width over height.
    pub fn aspect(&self) -> f64 {
        f64::from(self.width) / f64::from(self.height)
    }

    /// Straight RGBA8 bytes.
    pub fn pixels(&self) -> &[u8] {
        self.pixels.as_slice()
    }

    /// RGBA of the pixel at `(x, y)`, if inside the raster.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let off = (y as usize * self.width as usize + x as usize) * 4;
        let px = &self.pixels[off..off + 4];
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Pixels converted to premultiplied RGBA8, as consumed by the CPU renderer.
    pub(crate) fn to_premul_rgba8(&self) -> Vec<u8> {
        let mut out = self.pixels.as_ref().clone();
        premultiply_rgba8_in_place(&mut out);
        out
    }
}

pub(crate) fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 255 {
            continue;
        }
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

pub(crate) fn unpremultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u32;
        if a == 255 {
            continue;
        }
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        for c in &mut px[0..3] {
            *c = ((u32::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/raster.rs"]
mod tests;
