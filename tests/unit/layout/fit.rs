use super::*;

#[test]
fn wide_source_into_square_crops_centered_square_of_full_height() {
    let crop = crop_to_fill(200.0, 100.0, 1.0);
    assert_eq!(crop, Tile::new(50.0, 0.0, 100.0, 100.0));
}

#[test]
fn tall_source_into_wide_cell_crops_vertically() {
    let crop = crop_to_fill(100.0, 300.0, 2.0);
    assert_eq!(crop, Tile::new(0.0, 125.0, 100.0, 50.0));
}

#[test]
fn equal_aspect_keeps_the_whole_source() {
    let crop = crop_to_fill(160.0, 90.0, 160.0 / 90.0);
    assert!((crop.x).abs() < 1e-9 && (crop.y).abs() < 1e-9);
    assert!((crop.w - 160.0).abs() < 1e-9 && (crop.h - 90.0).abs() < 1e-9);
}

#[test]
fn scale_to_fit_letterboxes_on_one_axis() {
    let area = Tile::new(20.0, 20.0, 260.0, 360.0);
    let placed = scale_to_fit(520.0, 260.0, area);
    assert!((placed.w - 260.0).abs() < 1e-9);
    assert!((placed.h - 130.0).abs() < 1e-9);
    assert!((placed.x - 20.0).abs() < 1e-9);
    assert!((placed.y - (20.0 + (360.0 - 130.0) / 2.0)).abs() < 1e-9);
}

#[test]
fn scale_to_fit_upscales_small_sources() {
    assert_eq!(fit_scale(10.0, 10.0, 100.0, 50.0), 5.0);
}
