use std::sync::Arc;

use crate::assets::raster::{RasterSource, unpremultiply_rgba8_in_place};
use crate::foundation::color::Rgb8;
use crate::foundation::core::{Affine, Canvas, Tile};
use crate::foundation::error::{MediaError, MediaResult};
use crate::render::frame::RenderedImage;
use crate::render::surface::SurfacePool;
use crate::render::text::ShapedLine;

/// Immediate-mode painter over one `vello_cpu` surface.
///
/// The pixmap is borrowed from a [`SurfacePool`] and returned to it by [`Painter::finish`].
pub struct Painter<'p> {
    pool: &'p mut SurfacePool,
    ctx: vello_cpu::RenderContext,
    pixmap: vello_cpu::Pixmap,
    canvas: Canvas,
}

impl<'p> Painter<'p> {
    /// Acquire a surface of `canvas` size cleared to `background` (transparent when `None`).
    pub fn new(
        pool: &'p mut SurfacePool,
        canvas: Canvas,
        background: Option<Rgb8>,
    ) -> MediaResult<Self> {
        let mut pixmap = pool.borrow(canvas.width, canvas.height)?;
        clear_pixmap(&mut pixmap, [0, 0, 0, 0]);
        let mut ctx = vello_cpu::RenderContext::new(pixmap.width(), pixmap.height());
        if let Some(c) = background {
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, 255));
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                0.0,
                0.0,
                f64::from(canvas.width),
                f64::from(canvas.height),
            ));
        }
        Ok(Self {
            pool,
            ctx,
            pixmap,
            canvas,
        })
    }

    /// Draw the `src` window of `image` stretched onto the `dst` rectangle.
    pub fn draw_image_region(&mut self, image: &ImagePaint, src: Tile, dst: Tile) -> MediaResult<()> {
        if src.w <= 0.0 || src.h <= 0.0 {
            return Err(MediaError::validation("source window must be non-empty"));
        }
        if dst.w <= 0.0 || dst.h <= 0.0 {
            return Ok(());
        }

        let transform = Affine::translate((dst.x, dst.y))
            * Affine::scale_non_uniform(dst.w / src.w, dst.h / src.h)
            * Affine::translate((-src.x, -src.y));

        self.ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_transform(affine_to_cpu(transform));
        self.ctx.set_paint(image.paint.clone());
        self.ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            src.x,
            src.y,
            src.right(),
            src.bottom(),
        ));
        Ok(())
    }

    /// Draw a shaped line with its baseline origin placed at `(x, y)`-translated layout space.
    pub fn draw_line(&mut self, line: &ShapedLine, origin_x: f64, origin_y: f64) {
        self.ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        self.ctx.set_transform(vello_cpu::kurbo::Affine::translate((origin_x, origin_y)));

        for l in line.layout.lines() {
            for item in l.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };

                let brush = run.style().brush;
                self.ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(
                    brush.r, brush.g, brush.b, 255,
                ));

                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                self.ctx
                    .glyph_run(&line.font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
    }

    /// Rasterize pending draws, read back straight RGBA and return the surface to the pool.
    pub fn finish(mut self) -> MediaResult<RenderedImage> {
        self.ctx.flush();
        self.ctx.render_to_pixmap(&mut self.pixmap);

        let mut data = self.pixmap.data_as_u8_slice().to_vec();
        unpremultiply_rgba8_in_place(&mut data);
        let out = RenderedImage::new(self.canvas.width, self.canvas.height, data)?;
        self.pool.release(self.pixmap);
        Ok(out)
    }
}

/// Shareable image paint built once per source raster.
#[derive(Clone)]
pub struct ImagePaint {
    paint: vello_cpu::Image,
    width: u32,
    height: u32,
}

impl ImagePaint {
    /// Upload a straight-alpha raster as a premultiplied pixmap paint.
    pub fn from_raster(src: &RasterSource) -> MediaResult<Self> {
        let pixmap = image_premul_bytes_to_pixmap(&src.to_premul_rgba8(), src.width(), src.height())?;
        Ok(Self {
            paint: vello_cpu::Image {
                image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
                sampler: vello_cpu::peniko::ImageSampler::default(),
            },
            width: src.width(),
            height: src.height(),
        })
    }

    /// Natural size of the underlying raster.
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn clear_pixmap(pixmap: &mut vello_cpu::Pixmap, rgba: [u8; 4]) {
    let data = pixmap.data_as_u8_slice_mut();
    for px in data.chunks_exact_mut(4) {
        px.copy_from_slice(&rgba);
    }
}

fn image_premul_bytes_to_pixmap(
    rgba8_premul: &[u8],
    width: u32,
    height: u32,
) -> MediaResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| MediaError::surface(format!("image width {width} exceeds {}", u16::MAX)))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| MediaError::surface(format!("image height {height} exceeds {}", u16::MAX)))?;
    if rgba8_premul.len() != width as usize * height as usize * 4 {
        return Err(MediaError::validation("image byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for px in rgba8_premul.chunks_exact(4) {
        let a = px[3];
        may_have_opacities |= a != 255;
        pixels.push(vello_cpu::peniko::color::PremulRgba8 {
            r: px[0],
            g: px[1],
            b: px[2],
            a,
        });
    }

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}

#[cfg(test)]
#[path = "../../tests/unit/render/cpu.rs"]
mod tests;
