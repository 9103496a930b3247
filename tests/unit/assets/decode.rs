use std::io::Cursor;

use super::*;

fn png_bytes(w: u32, h: u32, rgba: [u8; 4]) -> Vec<u8> {
    let img = image::RgbaImage::from_pixel(w, h, image::Rgba(rgba));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decode_png_keeps_straight_alpha() {
    let bytes = png_bytes(3, 2, [100, 50, 200, 128]);
    let r = decode_image(&bytes).unwrap();
    assert_eq!((r.width(), r.height()), (3, 2));
    assert_eq!(r.pixel(2, 1), Some([100, 50, 200, 128]));
}

#[test]
fn decode_garbage_is_a_decode_failure() {
    let err = decode_image(b"definitely not an image").unwrap_err();
    assert!(matches!(err, MediaError::Decode(_)));
}

#[test]
fn media_kind_classification() {
    assert_eq!(MediaKind::from_mime("image/png"), MediaKind::Image);
    assert_eq!(MediaKind::from_mime("Video/MP4"), MediaKind::Video);
    assert_eq!(MediaKind::from_mime("application/pdf"), MediaKind::Pdf);
    assert_eq!(MediaKind::from_mime("text/plain"), MediaKind::Other);
}

#[test]
fn filter_drops_non_matching_inputs_in_order() {
    let inputs = vec![
        AssetInput::new("a.png", "image/png", vec![]),
        AssetInput::new("b.mp4", "video/mp4", vec![]),
        AssetInput::new("c.jpg", "image/jpeg", vec![]),
    ];
    let kept = filter_inputs(inputs, MediaKind::Image);
    let names: Vec<_> = kept.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, ["a.png", "c.jpg"]);
}

#[test]
fn stem_and_extension_split_at_last_dot() {
    let a = AssetInput::new("my.photo.JPG", "image/jpeg", vec![]);
    assert_eq!(a.stem(), "my.photo");
    assert_eq!(a.extension(), "JPG");
    let b = AssetInput::new("README", "text/plain", vec![]);
    assert_eq!(b.stem(), "README");
    assert_eq!(b.extension(), "README");
}

#[test]
fn mime_guess_from_extension() {
    assert_eq!(mime_from_name("x.JPEG"), "image/jpeg");
    assert_eq!(mime_from_name("clip.mp4"), "video/mp4");
    assert_eq!(mime_from_name("doc.pdf"), "application/pdf");
    assert_eq!(mime_from_name("noext"), "application/octet-stream");
}
