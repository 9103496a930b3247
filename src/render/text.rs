use std::sync::Arc;

use crate::foundation::color::Rgb8;
use crate::foundation::error::{MediaError, MediaResult};

/// Font bytes used for card captions.
///
/// No system fonts are consulted; a caption can only be drawn with a face supplied here.
#[derive(Clone, Debug)]
pub struct FontSet {
    regular: Arc<Vec<u8>>,
    bold: Option<Arc<Vec<u8>>>,
}

impl FontSet {
    /// Font set with a single regular face.
    pub fn new(regular: Vec<u8>) -> MediaResult<Self> {
        if regular.is_empty() {
            return Err(MediaError::validation("font bytes must be non-empty"));
        }
        Ok(Self {
            regular: Arc::new(regular),
            bold: None,
        })
    }

    /// Attach a dedicated bold face.
    pub fn with_bold(mut self, bold: Vec<u8>) -> MediaResult<Self> {
        if bold.is_empty() {
            return Err(MediaError::validation("bold font bytes must be non-empty"));
        }
        self.bold = Some(Arc::new(bold));
        Ok(self)
    }

    /// Load the regular face (and optionally a bold face) from disk.
    pub fn from_paths(
        regular: &std::path::Path,
        bold: Option<&std::path::Path>,
    ) -> MediaResult<Self> {
        let read = |p: &std::path::Path| {
            std::fs::read(p).map_err(|e| {
                MediaError::validation(format!("read font '{}': {e}", p.display()))
            })
        };
        let set = Self::new(read(regular)?)?;
        match bold {
            Some(b) => set.with_bold(read(b)?),
            None => Ok(set),
        }
    }

    /// Bytes for the requested weight; bold falls back to the regular face with a heavier
    /// weight request.
    pub(crate) fn face(&self, bold: bool) -> (&Arc<Vec<u8>>, bool) {
        match (&self.bold, bold) {
            (Some(b), true) => (b, false),
            (None, true) => (&self.regular, true),
            _ => (&self.regular, false),
        }
    }
}

/// Vertical metrics and advance of one shaped line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LineMetrics {
    /// Advance width of the line.
    pub advance: f32,
    /// Ascent above the baseline.
    pub ascent: f32,
    /// Descent below the baseline.
    pub descent: f32,
    /// Baseline offset from the top of the layout.
    pub baseline: f32,
}

/// One shaped single-line caption.
pub struct ShapedLine {
    pub(crate) layout: parley::Layout<Rgb8>,
    pub(crate) font: vello_cpu::peniko::FontData,
    /// Line metrics.
    pub metrics: LineMetrics,
}

// A face registered once with the font collection, kept alive with its bytes.
struct RegisteredFace {
    bytes: Arc<Vec<u8>>,
    family_name: String,
    font: vello_cpu::peniko::FontData,
}

/// Stateful helper for building Parley text layouts from raw font bytes.
///
/// Each distinct face is registered with the collection on first use only.
pub struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<Rgb8>,
    faces: Vec<RegisteredFace>,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    /// Construct a new layout engine with fresh Parley contexts.
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            faces: Vec::new(),
        }
    }

    fn register(&mut self, face: &Arc<Vec<u8>>) -> MediaResult<usize> {
        if let Some(i) = self.faces.iter().position(|f| Arc::ptr_eq(&f.bytes, face)) {
            return Ok(i);
        }

        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(face.as_ref().clone()), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| MediaError::validation("no font families registered from font bytes"))?;
        let family_name = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| MediaError::validation("registered font family has no name"))?
            .to_string();
        let font = vello_cpu::peniko::FontData::new(
            vello_cpu::peniko::Blob::from(face.as_ref().clone()),
            0,
        );

        tracing::debug!(family = %family_name, "font face registered");
        self.faces.push(RegisteredFace {
            bytes: Arc::clone(face),
            family_name,
            font,
        });
        Ok(self.faces.len() - 1)
    }

    /// Shape `text` as a single unwrapped line.
    pub fn shape_line(
        &mut self,
        text: &str,
        fonts: &FontSet,
        size_px: f32,
        bold: bool,
        color: Rgb8,
    ) -> MediaResult<ShapedLine> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(MediaError::validation(
                "font size must be finite and > 0",
            ));
        }

        let (face, synthetic_bold) = fonts.face(bold);
        let idx = self.register(face)?;
        let family_name = self.faces[idx].family_name.clone();
        let font = self.faces[idx].font.clone();

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family_name)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(color));
        if synthetic_bold {
            builder.push_default(parley::style::StyleProperty::FontWeight(
                parley::style::FontWeight::BOLD,
            ));
        }

        let mut layout: parley::Layout<Rgb8> = builder.build(text);
        layout.break_all_lines(None);

        let metrics = layout
            .lines()
            .next()
            .map(|line| {
                let m = line.metrics();
                LineMetrics {
                    advance: m.advance,
                    ascent: m.ascent,
                    descent: m.descent,
                    baseline: m.baseline,
                }
            })
            .unwrap_or(LineMetrics {
                advance: 0.0,
                ascent: 0.0,
                descent: 0.0,
                baseline: 0.0,
            });

        Ok(ShapedLine {
            layout,
            font,
            metrics,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;
