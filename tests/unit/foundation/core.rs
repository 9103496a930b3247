use super::*;

#[test]
fn tile_edges_and_aspect() {
    let t = Tile::new(10.0, 5.0, 40.0, 20.0);
    assert_eq!(t.right(), 50.0);
    assert_eq!(t.bottom(), 25.0);
    assert_eq!(t.aspect(), 2.0);
    assert_eq!(Tile::new(0.0, 0.0, 3.0, 0.0).aspect(), 0.0);
}

#[test]
fn tile_within_bounds_tolerates_rounding() {
    let t = Tile::new(0.0, 0.0, 33.333_333_4, 10.0);
    assert!(t.within(33.333_333, 10.0, 1e-6));
    assert!(!Tile::new(-1.0, 0.0, 2.0, 2.0).within(10.0, 10.0, 1e-6));
}

#[test]
fn canvas_rejects_empty_and_truncates_real_sizes() {
    assert!(Canvas::new(0, 4).is_err());
    let c = Canvas::from_real(99.9, 0.2).unwrap();
    assert_eq!(c, Canvas { width: 99, height: 1 });
    assert!(Canvas::from_real(f64::NAN, 1.0).is_err());
}
