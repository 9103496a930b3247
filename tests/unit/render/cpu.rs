use super::*;

fn halves() -> RasterSource {
    // 4x2: left half red, right half blue.
    let mut px = Vec::new();
    for _y in 0..2 {
        for x in 0..4 {
            if x < 2 {
                px.extend_from_slice(&[255, 0, 0, 255]);
            } else {
                px.extend_from_slice(&[0, 0, 255, 255]);
            }
        }
    }
    RasterSource::from_rgba8(4, 2, px).unwrap()
}

#[test]
fn background_fills_canvas() {
    let mut pool = SurfacePool::default();
    let painter = Painter::new(&mut pool, Canvas::new(3, 2).unwrap(), Some(Rgb8::WHITE)).unwrap();
    let out = painter.finish().unwrap();
    assert_eq!((out.width, out.height), (3, 2));
    assert!(out.data.chunks_exact(4).all(|px| px == [255, 255, 255, 255]));
}

#[test]
fn transparent_canvas_without_background() {
    let mut pool = SurfacePool::default();
    let painter = Painter::new(&mut pool, Canvas::new(2, 2).unwrap(), None).unwrap();
    let out = painter.finish().unwrap();
    assert!(out.data.chunks_exact(4).all(|px| px[3] == 0));
}

#[test]
fn draws_only_the_requested_window() {
    let src = halves();
    let paint = ImagePaint::from_raster(&src).unwrap();
    assert_eq!(paint.size(), (4, 2));

    let mut pool = SurfacePool::default();
    let mut painter = Painter::new(&mut pool, Canvas::new(2, 2).unwrap(), None).unwrap();
    painter
        .draw_image_region(
            &paint,
            Tile::new(2.0, 0.0, 2.0, 2.0),
            Tile::new(0.0, 0.0, 2.0, 2.0),
        )
        .unwrap();
    let out = painter.finish().unwrap();
    for px in out.data.chunks_exact(4) {
        assert!(px[2] > 200 && px[0] < 50, "expected blue, got {px:?}");
        assert_eq!(px[3], 255);
    }
}

#[test]
fn finish_returns_surface_to_pool() {
    let mut pool = SurfacePool::default();
    let painter = Painter::new(&mut pool, Canvas::new(4, 4).unwrap(), None).unwrap();
    painter.finish().unwrap();
    let painter = Painter::new(&mut pool, Canvas::new(4, 4).unwrap(), None).unwrap();
    painter.finish().unwrap();
    assert_eq!(pool.stats().alloc_surfaces, 1);
    assert_eq!(pool.stats().reused_surfaces, 1);
}

#[test]
fn empty_source_window_is_rejected() {
    let paint = ImagePaint::from_raster(&halves()).unwrap();
    let mut pool = SurfacePool::default();
    let mut painter = Painter::new(&mut pool, Canvas::new(2, 2).unwrap(), None).unwrap();
    assert!(
        painter
            .draw_image_region(&paint, Tile::new(0.0, 0.0, 0.0, 1.0), Tile::new(0.0, 0.0, 1.0, 1.0))
            .is_err()
    );
}
