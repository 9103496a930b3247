use super::*;
use crate::layout::grid::GridMode;

fn halves() -> RasterSource {
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
fn vertical_strips_follow_source_columns() {
    let spec = GridSpec {
        mode: GridMode::ColsOnly,
        rows: 7,
        cols: 2,
    };
    let mut pool = SurfacePool::default();
    let tiles = split_source(&halves(), &spec, &mut pool).unwrap();
    assert_eq!(tiles.len(), 2);
    assert_eq!((tiles[0].image.width, tiles[0].image.height), (2, 2));

    let left = tiles[0].image.pixel(1, 1).unwrap();
    let right = tiles[1].image.pixel(0, 0).unwrap();
    assert!(left[0] > 200 && left[2] < 50, "{left:?}");
    assert!(right[2] > 200 && right[0] < 50, "{right:?}");
    assert_eq!(tiles[1].window, Tile::new(2.0, 0.0, 2.0, 2.0));
}

#[test]
fn fractional_partitions_truncate_tile_size() {
    let src = RasterSource::solid(5, 3, [10, 20, 30, 255]).unwrap();
    let mut pool = SurfacePool::default();
    let tiles = split_source(&src, &GridSpec::default(), &mut pool).unwrap();
    assert_eq!(tiles.len(), 4);
    for (i, t) in tiles.iter().enumerate() {
        assert_eq!(t.index, i);
        assert_eq!((t.image.width, t.image.height), (2, 1));
    }
    // All tiles share one size, so the pool recycles a single surface.
    assert_eq!(pool.stats().alloc_surfaces, 1);
}

#[test]
fn zero_rows_are_rejected() {
    let spec = GridSpec {
        mode: GridMode::Grid,
        rows: 0,
        cols: 2,
    };
    let mut pool = SurfacePool::default();
    assert!(split_source(&halves(), &spec, &mut pool).is_err());
}
