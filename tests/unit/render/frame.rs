use super::*;

#[test]
fn new_rejects_length_mismatch() {
    assert!(RenderedImage::new(2, 2, vec![0; 15]).is_err());
    assert!(RenderedImage::new(2, 2, vec![0; 16]).is_ok());
}

#[test]
fn pixel_reads_row_major() {
    let mut data = vec![0u8; 2 * 2 * 4];
    data[12..16].copy_from_slice(&[1, 2, 3, 4]);
    let img = RenderedImage::new(2, 2, data).unwrap();
    assert_eq!(img.pixel(1, 1), Some([1, 2, 3, 4]));
    assert_eq!(img.pixel(2, 0), None);
}

#[test]
fn flattening_drops_alpha_over_black() {
    let img = RenderedImage::new(2, 1, vec![200, 100, 50, 255, 200, 100, 50, 0]).unwrap();
    assert!(img.has_transparency());
    assert_eq!(img.to_rgb8_over_black(), vec![200, 100, 50, 0, 0, 0]);
}
