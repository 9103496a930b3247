use super::*;
use crate::fixtures::png_input;

fn deck() -> CardDeck {
    let mut d = CardDeck::new(DeckSettings::default(), None).unwrap();
    d.add(vec![
        png_input("My Logo.final.png", 10, 10, [255, 0, 0, 255]),
        AssetInput::new("clip.mp4", "video/mp4", vec![1, 2, 3]),
        png_input("other.png", 20, 10, [0, 0, 255, 255]),
    ]);
    d
}

#[test]
fn filenames_come_from_the_name_before_the_first_dot() {
    let d = deck();
    let names: Vec<_> = d.cards().iter().map(|c| c.filename.as_str()).collect();
    assert_eq!(names, vec!["My_Logo", "other"]);
    assert_eq!(d.live_previews(), 2);
    assert_eq!(d.cards()[0].card.text_y_percent, 90.0);
}

#[test]
fn text_drives_the_filename_unless_it_sanitizes_away() {
    let mut d = deck();
    let id = d.cards()[0].id;
    d.set_text(id, "Big  Sale").unwrap();
    assert_eq!(d.cards()[0].filename, "Big_Sale");
    d.set_text(id, "??").unwrap();
    assert_eq!(d.cards()[0].card.text, "??");
    assert_eq!(d.cards()[0].filename, "Big_Sale");
    d.set_filename(id, "a/b c").unwrap();
    assert_eq!(d.cards()[0].filename, "ab_c");
    assert!(d.set_text(999, "x").is_err());
}

#[test]
fn global_offset_overwrites_every_card_and_seeds_new_ones() {
    let mut d = deck();
    let first = d.cards()[0].id;
    d.set_card(
        first,
        Card {
            img_y_percent: -20.0,
            ..Card::default()
        },
    )
    .unwrap();
    d.set_global_image_offset(15.0).unwrap();
    assert!(d.cards().iter().all(|c| c.card.img_y_percent == 15.0));

    d.add(vec![png_input("late.png", 4, 4, [0, 0, 0, 255])]);
    assert_eq!(d.cards()[2].card.img_y_percent, 15.0);
    assert!(d.set_global_image_offset(75.0).is_err());
}

#[test]
fn render_paints_white_background_and_fitted_image() {
    let mut d = deck();
    let id = d.cards()[0].id;
    let img = d.render(id).unwrap();
    assert_eq!((img.width, img.height), (300, 400));
    assert_eq!(img.pixel(2, 2), Some([255, 255, 255, 255]));
    assert_eq!(img.pixel(150, 200), Some([255, 0, 0, 255]));
}

#[test]
fn caption_without_fonts_fails_only_that_card() {
    let mut d = deck();
    let id = d.cards()[1].id;
    d.set_text(id, "Hello").unwrap();
    assert!(d.render(id).is_err());

    let entries = d.export_all();
    let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["My_Logo.png"]);
}

#[test]
fn duplicate_filenames_are_resolved_on_export() {
    let mut d = deck();
    let ids: Vec<_> = d.cards().iter().map(|c| c.id).collect();
    for id in &ids {
        d.set_filename(*id, "logo").unwrap();
    }
    let single = d.download(ids[0]).unwrap();
    assert_eq!(single.name, "logo.png");
    assert_eq!(&single.bytes[..4], &[0x89, b'P', b'N', b'G']);

    let resolved = crate::export::packager::ExportPackager::resolve(d.export_all()).unwrap();
    let names: Vec<_> = resolved.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["logo.png", "logo_1.png"]);
}

#[test]
fn remove_and_clear_release_previews() {
    let mut d = deck();
    let id = d.cards()[0].id;
    assert!(d.remove(id));
    assert!(!d.remove(id));
    assert_eq!(d.live_previews(), 1);
    d.clear();
    assert_eq!(d.live_previews(), 0);
}

#[test]
fn deck_settings_accept_flat_json() {
    let s: DeckSettings = serde_json::from_str(
        r##"{"global_font_size": 32, "bold": true, "color": "#ff0000", "global_image_offset_percent": -5}"##,
    )
    .unwrap();
    assert_eq!(s.style.font_size, 32.0);
    assert!(s.style.bold);
    assert_eq!(s.style.canvas_width, 300);
    assert_eq!(s.global_image_offset_percent, -5.0);
}
