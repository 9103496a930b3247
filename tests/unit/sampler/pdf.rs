use super::*;

#[test]
fn page_count_is_read_from_pdfinfo() {
    let info = "Title:          deck\nProducer:       x\nPages:          12\nEncrypted:      no\n";
    assert_eq!(parse_page_count(info).unwrap(), 12);
    assert!(parse_page_count("Title: nothing").is_err());
}

#[test]
fn scale_two_renders_at_144_dpi() {
    assert_eq!(scale_to_dpi(2.0), 144);
    assert_eq!(scale_to_dpi(1.0), 72);
    assert_eq!(scale_to_dpi(0.001), 1);
}

#[cfg(not(feature = "media-pdf"))]
#[test]
fn opening_without_feature_is_a_decode_error() {
    let input = AssetInput::new("a.pdf", "application/pdf", b"%PDF-1.4".to_vec());
    let err = PdftoppmOpener::default().open(&input).err().unwrap();
    assert!(matches!(err, MediaError::Decode(_)));
}
