use crate::foundation::core::Tile;

/// Source window that, scaled to a target of aspect `target_aspect`, fills it exactly.
///
/// Wider sources keep their full height and get a horizontally centered window; taller (or
/// equal) sources keep their full width and get a vertically centered window.
pub fn crop_to_fill(src_w: f64, src_h: f64, target_aspect: f64) -> Tile {
    let src_aspect = src_w / src_h;
    if src_aspect > target_aspect {
        let sh = src_h;
        let sw = sh * target_aspect;
        Tile::new((src_w - sw) / 2.0, 0.0, sw, sh)
    } else {
        let sw = src_w;
        let sh = sw / target_aspect;
        Tile::new(0.0, (src_h - sh) / 2.0, sw, sh)
    }
}

/// Uniform scale factor that fits `src` entirely inside `avail`.
pub fn fit_scale(src_w: f64, src_h: f64, avail_w: f64, avail_h: f64) -> f64 {
    (avail_w / src_w).min(avail_h / src_h)
}

/// Scale-to-fit `src` into `area`, centered on both axes.
pub fn scale_to_fit(src_w: f64, src_h: f64, area: Tile) -> Tile {
    let scale = fit_scale(src_w, src_h, area.w, area.h);
    let w = src_w * scale;
    let h = src_h * scale;
    Tile::new(
        area.x + (area.w - w) / 2.0,
        area.y + (area.h - h) / 2.0,
        w,
        h,
    )
}

#[cfg(test)]
#[path = "../../tests/unit/layout/fit.rs"]
mod tests;
