pub use kurbo::{Affine, Point, Rect, Vec2};

use crate::foundation::error::{MediaError, MediaResult};

/// Axis-aligned sub-rectangle in source or target pixel space.
///
/// Coordinates are real-valued; fractional tiles are legal and are sampled as-is by the
/// renderer.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Tile {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Width.
    pub w: f64,
    /// Height.
    pub h: f64,
}

impl Tile {
    /// Construct a tile from its origin and size.
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// Right edge (`x + w`).
    pub fn right(self) -> f64 {
        self.x + self.w
    }

    /// Bottom edge (`y + h`).
    pub fn bottom(self) -> f64 {
        self.y + self.h
    }

    /// Width over height. Degenerate tiles report `0.0`.
    pub fn aspect(self) -> f64 {
        if self.h > 0.0 { self.w / self.h } else { 0.0 }
    }

    /// `true` when the tile lies inside `[0, width] x [0, height]` within `eps`.
    pub fn within(self, width: f64, height: f64, eps: f64) -> bool {
        self.x >= -eps && self.y >= -eps && self.right() <= width + eps && self.bottom() <= height + eps
    }
}

/// Output surface dimensions in whole pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Create a validated canvas; both sides must be non-zero.
    pub fn new(width: u32, height: u32) -> MediaResult<Self> {
        if width == 0 || height == 0 {
            return Err(MediaError::validation(format!(
                "canvas must be non-empty, got {width}x{height}"
            )));
        }
        Ok(Self { width, height })
    }

    /// Truncate a real-valued size to whole pixels the way a raster surface does,
    /// keeping at least one pixel per side.
    pub fn from_real(width: f64, height: f64) -> MediaResult<Self> {
        if !width.is_finite() || !height.is_finite() {
            return Err(MediaError::validation("canvas size must be finite"));
        }
        let w = width.max(1.0).floor();
        let h = height.max(1.0).floor();
        if w > f64::from(u32::MAX) || h > f64::from(u32::MAX) {
            return Err(MediaError::validation("canvas size overflows u32"));
        }
        Ok(Self {
            width: w as u32,
            height: h as u32,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
