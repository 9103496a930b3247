use crate::assets::raster::RasterSource;
use crate::foundation::color::Rgb8;
use crate::foundation::core::Canvas;
use crate::foundation::error::MediaResult;
use crate::layout::contact_sheet::{ContactSheetLayout, ContactSheetSpec, compute_contact_sheet_layout};
use crate::render::cpu::{ImagePaint, Painter};
use crate::render::frame::RenderedImage;
use crate::render::surface::SurfacePool;

/// A rendered contact sheet and the geometry it was drawn from.
#[derive(Clone, Debug)]
pub struct ContactSheet {
    /// Composed raster; its size is the layout size truncated to whole pixels.
    pub image: RenderedImage,
    /// Layout used for placement.
    pub layout: ContactSheetLayout,
}

/// Tile `images` onto a white contact sheet. `Ok(None)` when there is nothing to tile.
#[tracing::instrument(skip(images, pool), fields(n = images.len()))]
pub fn render_contact_sheet(
    images: &[RasterSource],
    spec: &ContactSheetSpec,
    pool: &mut SurfacePool,
) -> MediaResult<Option<ContactSheet>> {
    let sizes: Vec<(u32, u32)> = images.iter().map(|i| (i.width(), i.height())).collect();
    let Some(layout) = compute_contact_sheet_layout(&sizes, spec)? else {
        return Ok(None);
    };

    let canvas = Canvas::from_real(layout.width, layout.height)?;
    let mut painter = Painter::new(pool, canvas, Some(Rgb8::WHITE))?;
    for p in &layout.placements {
        let paint = ImagePaint::from_raster(&images[p.index])?;
        painter.draw_image_region(&paint, p.crop, p.cell)?;
    }
    let image = painter.finish()?;
    tracing::debug!(
        width = image.width,
        height = image.height,
        cols = layout.cols,
        rows = layout.rows,
        "rendered contact sheet"
    );
    Ok(Some(ContactSheet { image, layout }))
}

#[cfg(test)]
#[path = "../../tests/unit/compose/storyboard.rs"]
mod tests;
