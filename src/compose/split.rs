use crate::assets::raster::RasterSource;
use crate::foundation::core::{Canvas, Tile};
use crate::foundation::error::MediaResult;
use crate::layout::grid::{GridSpec, compute_grid_partition};
use crate::render::cpu::{ImagePaint, Painter};
use crate::render::frame::RenderedImage;
use crate::render::surface::SurfacePool;

/// One rendered partition of a split source.
#[derive(Clone, Debug)]
pub struct SplitTile {
    /// Row-major tile index.
    pub index: usize,
    /// Source window the tile was cut from.
    pub window: Tile,
    /// Rendered pixels, `floor(tile_w) x floor(tile_h)`.
    pub image: RenderedImage,
}

/// Cut `src` into the partitions described by `spec`, in row-major order.
///
/// Output tiles are transparent outside the source window, so alpha in the source survives.
#[tracing::instrument(skip(src, pool), fields(w = src.width(), h = src.height()))]
pub fn split_source(
    src: &RasterSource,
    spec: &GridSpec,
    pool: &mut SurfacePool,
) -> MediaResult<Vec<SplitTile>> {
    let partition = compute_grid_partition(src.width(), src.height(), spec)?;
    let canvas = Canvas::from_real(partition.tile_w, partition.tile_h)?;
    let paint = ImagePaint::from_raster(src)?;

    let mut out = Vec::with_capacity(partition.tiles.len());
    for (index, window) in partition.tiles.iter().copied().enumerate() {
        let mut painter = Painter::new(pool, canvas, None)?;
        painter.draw_image_region(&paint, window, Tile::new(0.0, 0.0, window.w, window.h))?;
        out.push(SplitTile {
            index,
            window,
            image: painter.finish()?,
        });
    }
    tracing::debug!(tiles = out.len(), "split source");
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/compose/split.rs"]
mod tests;
