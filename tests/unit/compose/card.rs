use super::*;

fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn image_is_fitted_into_padded_area_and_shifted() {
    let card = Card {
        img_y_percent: 10.0,
        ..Card::default()
    };
    let l = layout_card(100, 50, &card, &CardStyle::default()).unwrap();
    assert_eq!(l.canvas, Canvas::new(300, 400).unwrap());
    assert!(approx(l.image.w, 260.0));
    assert!(approx(l.image.h, 130.0));
    assert!(approx(l.image.x, 20.0));
    assert!(approx(l.image.y, 20.0 + (360.0 - 130.0) / 2.0 + 40.0));
}

#[test]
fn caption_block_is_centered_on_anchor() {
    let card = Card {
        text: "A\nB".to_string(),
        ..Card::default()
    };
    let l = layout_card(10, 10, &card, &CardStyle::default()).unwrap();
    assert!(approx(l.line_height, 35.0));
    assert_eq!(l.lines.len(), 2);
    assert!(approx(l.lines[0].mid_y, 360.0 - 35.0 + 17.5));
    assert!(approx(l.lines[1].mid_y, l.lines[0].mid_y + 35.0));
    assert!(approx(l.lines[0].center_x, 150.0));
}

#[test]
fn override_beats_global_font_size() {
    let card = Card {
        text: "x".to_string(),
        font_size_override: Some(40.0),
        ..Card::default()
    };
    let l = layout_card(10, 10, &card, &CardStyle::default()).unwrap();
    assert_eq!(l.font_size, 40.0);
    assert!(approx(l.line_height, 50.0));
}

#[test]
fn out_of_range_offsets_are_rejected() {
    let style = CardStyle::default();
    let bad_text = Card {
        text_y_percent: 120.0,
        ..Card::default()
    };
    let bad_img = Card {
        img_y_percent: -60.0,
        ..Card::default()
    };
    assert!(layout_card(10, 10, &bad_text, &style).is_err());
    assert!(layout_card(10, 10, &bad_img, &style).is_err());
}

#[test]
fn whitespace_caption_has_no_lines() {
    let card = Card {
        text: "  \n ".to_string(),
        ..Card::default()
    };
    assert!(card.lines().is_empty());
}

#[test]
fn renders_white_card_with_fitted_image() {
    let src = RasterSource::solid(20, 10, [0, 128, 0, 255]).unwrap();
    let style = CardStyle::default();
    let mut text = TextLayoutEngine::new();
    let mut pool = SurfacePool::default();
    let mut r = CardRenderer {
        style: &style,
        fonts: None,
        text: &mut text,
        pool: &mut pool,
    };
    let out = r.render(&src, &Card::default()).unwrap();
    assert_eq!((out.width, out.height), (300, 400));
    assert_eq!(out.pixel(2, 2), Some([255, 255, 255, 255]));
    assert_eq!(out.pixel(150, 200), Some([0, 128, 0, 255]));
}

#[test]
fn rendering_twice_is_identical() {
    let src = RasterSource::solid(7, 13, [200, 10, 10, 255]).unwrap();
    let style = CardStyle {
        canvas_width: 64,
        canvas_height: 64,
        ..CardStyle::default()
    };
    let mut text = TextLayoutEngine::new();
    let mut pool = SurfacePool::default();
    let mut r = CardRenderer {
        style: &style,
        fonts: None,
        text: &mut text,
        pool: &mut pool,
    };
    let a = r.render(&src, &Card::default()).unwrap();
    let b = r.render(&src, &Card::default()).unwrap();
    assert_eq!(a, b);
}

#[test]
fn caption_without_font_is_rejected() {
    let src = RasterSource::solid(4, 4, [0, 0, 0, 255]).unwrap();
    let style = CardStyle::default();
    let mut text = TextLayoutEngine::new();
    let mut pool = SurfacePool::default();
    let mut r = CardRenderer {
        style: &style,
        fonts: None,
        text: &mut text,
        pool: &mut pool,
    };
    let card = Card {
        text: "Hello".to_string(),
        ..Card::default()
    };
    assert!(matches!(r.render(&src, &card), Err(MediaError::Validation(_))));
}

#[test]
fn style_round_trips_through_json_defaults() {
    let s: CardStyle = serde_json::from_str(r##"{"bold":true,"color":"#ff0000"}"##).unwrap();
    assert!(s.bold);
    assert_eq!(s.color, Rgb8::new(255, 0, 0));
    assert_eq!(s.font_size, 28.0);
    assert_eq!((s.canvas_width, s.canvas_height), (300, 400));
}
