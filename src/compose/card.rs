use serde::{Deserialize, Serialize};

use crate::assets::raster::RasterSource;
use crate::foundation::color::Rgb8;
use crate::foundation::core::{Canvas, Tile};
use crate::foundation::error::{MediaError, MediaResult};
use crate::layout::fit::scale_to_fit;
use crate::render::cpu::{ImagePaint, Painter};
use crate::render::frame::RenderedImage;
use crate::render::surface::SurfacePool;
use crate::render::text::{FontSet, TextLayoutEngine};

/// Padding around the image content area, in pixels.
pub const CARD_PADDING: f64 = 20.0;

/// Line advance as a multiple of the font size.
pub const LINE_HEIGHT_FACTOR: f64 = 1.25;

/// Settings shared by every card in a deck.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CardStyle {
    /// Font size used when a card has no override.
    #[serde(alias = "global_font_size")]
    pub font_size: f32,
    /// Bold captions.
    pub bold: bool,
    /// Caption color.
    pub color: Rgb8,
    /// Canvas width.
    pub canvas_width: u32,
    /// Canvas height.
    pub canvas_height: u32,
}

impl Default for CardStyle {
    fn default() -> Self {
        Self {
            font_size: 28.0,
            bold: false,
            color: Rgb8::BLACK,
            canvas_width: 300,
            canvas_height: 400,
        }
    }
}

impl CardStyle {
    /// Reject empty canvases and non-positive font sizes.
    pub fn validate(&self) -> MediaResult<()> {
        Canvas::new(self.canvas_width, self.canvas_height)?;
        if !self.font_size.is_finite() || self.font_size <= 0.0 {
            return Err(MediaError::validation("font size must be finite and > 0"));
        }
        Ok(())
    }
}

/// Per-card composition inputs.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Card {
    /// Caption, one line per `\n`.
    pub text: String,
    /// Overrides [`CardStyle::font_size`].
    pub font_size_override: Option<f32>,
    /// Vertical anchor of the caption block, percent of canvas height, `0..=100`.
    pub text_y_percent: f64,
    /// Vertical image shift, percent of canvas height, `-50..=50`.
    pub img_y_percent: f64,
}

impl Default for Card {
    fn default() -> Self {
        Self {
            text: String::new(),
            font_size_override: None,
            text_y_percent: 90.0,
            img_y_percent: 0.0,
        }
    }
}

impl Card {
    /// Range-check the percentages and the size override.
    pub fn validate(&self) -> MediaResult<()> {
        if !(0.0..=100.0).contains(&self.text_y_percent) {
            return Err(MediaError::validation(format!(
                "text_y_percent must be within 0..=100, got {}",
                self.text_y_percent
            )));
        }
        if !(-50.0..=50.0).contains(&self.img_y_percent) {
            return Err(MediaError::validation(format!(
                "img_y_percent must be within -50..=50, got {}",
                self.img_y_percent
            )));
        }
        if let Some(s) = self.font_size_override
            && (!s.is_finite() || s <= 0.0)
        {
            return Err(MediaError::validation("font size override must be finite and > 0"));
        }
        Ok(())
    }

    /// Caption lines; an all-whitespace caption has none.
    pub fn lines(&self) -> Vec<&str> {
        if self.text.trim().is_empty() {
            Vec::new()
        } else {
            self.text.split('\n').collect()
        }
    }
}

/// Placement of one caption line: centered on `center_x`, vertically middle-aligned on `mid_y`.
#[derive(Clone, Debug, PartialEq)]
pub struct LinePlacement {
    /// Line text.
    pub text: String,
    /// Horizontal center.
    pub center_x: f64,
    /// Vertical middle.
    pub mid_y: f64,
}

/// Resolved geometry for one card.
#[derive(Clone, Debug, PartialEq)]
pub struct CardLayout {
    /// Output canvas.
    pub canvas: Canvas,
    /// Destination of the scaled image.
    pub image: Tile,
    /// Effective font size.
    pub font_size: f32,
    /// Distance between consecutive line middles.
    pub line_height: f64,
    /// Caption lines top to bottom.
    pub lines: Vec<LinePlacement>,
}

/// Compute the card geometry for a `src_w x src_h` image.
pub fn layout_card(src_w: u32, src_h: u32, card: &Card, style: &CardStyle) -> MediaResult<CardLayout> {
    style.validate()?;
    card.validate()?;
    if src_w == 0 || src_h == 0 {
        return Err(MediaError::validation("card image must be non-empty"));
    }

    let canvas = Canvas::new(style.canvas_width, style.canvas_height)?;
    let (w, h) = (f64::from(canvas.width), f64::from(canvas.height));
    let avail = Tile::new(
        CARD_PADDING,
        CARD_PADDING,
        (w - 2.0 * CARD_PADDING).max(0.0),
        (h - 2.0 * CARD_PADDING).max(0.0),
    );
    let mut image = scale_to_fit(f64::from(src_w), f64::from(src_h), avail);
    image.y += card.img_y_percent / 100.0 * h;

    let font_size = card.font_size_override.unwrap_or(style.font_size);
    let line_height = f64::from(font_size) * LINE_HEIGHT_FACTOR;
    let lines = card.lines();
    let count = lines.len() as f64;
    let first = h * card.text_y_percent / 100.0 - (line_height * count) / 2.0 + line_height / 2.0;
    let lines = lines
        .into_iter()
        .enumerate()
        .map(|(i, text)| LinePlacement {
            text: text.to_string(),
            center_x: w / 2.0,
            mid_y: first + i as f64 * line_height,
        })
        .collect();

    Ok(CardLayout {
        canvas,
        image,
        font_size,
        line_height,
        lines,
    })
}

/// Everything a card render needs besides the card itself.
pub struct CardRenderer<'a> {
    /// Deck-wide style.
    pub style: &'a CardStyle,
    /// Caption faces; required only when a card has text.
    pub fonts: Option<&'a FontSet>,
    /// Shaping context, reused across cards.
    pub text: &'a mut TextLayoutEngine,
    /// Surface pool of the calling worker.
    pub pool: &'a mut SurfacePool,
}

impl CardRenderer<'_> {
    /// Render `card` over `src` from scratch: white background, fitted image, centered caption.
    pub fn render(&mut self, src: &RasterSource, card: &Card) -> MediaResult<RenderedImage> {
        let layout = layout_card(src.width(), src.height(), card, self.style)?;
        if !layout.lines.is_empty() && self.fonts.is_none() {
            return Err(MediaError::validation("card text requires a font"));
        }

        let mut shaped = Vec::with_capacity(layout.lines.len());
        if let Some(fonts) = self.fonts {
            for line in &layout.lines {
                let s = self.text.shape_line(
                    &line.text,
                    fonts,
                    layout.font_size,
                    self.style.bold,
                    self.style.color,
                )?;
                shaped.push((line, s));
            }
        }

        let mut painter = Painter::new(self.pool, layout.canvas, Some(Rgb8::WHITE))?;
        if layout.image.w > 0.0 && layout.image.h > 0.0 {
            let paint = ImagePaint::from_raster(src)?;
            let full = Tile::new(0.0, 0.0, f64::from(src.width()), f64::from(src.height()));
            painter.draw_image_region(&paint, full, layout.image)?;
        }
        for (place, line) in &shaped {
            let m = line.metrics;
            let x = place.center_x - f64::from(m.advance) / 2.0;
            let baseline = place.mid_y + f64::from(m.ascent - m.descent) / 2.0;
            painter.draw_line(line, x, baseline - f64::from(m.baseline));
        }
        painter.finish()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/card.rs"]
mod tests;
