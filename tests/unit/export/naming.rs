use super::*;

#[test]
fn sanitize_replaces_whitespace_and_strips_reserved() {
    assert_eq!(sanitize_filename("My  Logo\tv2"), "My_Logo_v2");
    assert_eq!(sanitize_filename(r#"a/b\c:d*e?f"g<h>i|j"#), "abcdefghij");
    assert_eq!(sanitize_filename("keep.dots-and_more"), "keep.dots-and_more");
    assert_eq!(sanitize_filename("   "), "_");
}

#[test]
fn normalize_entry_names() {
    assert_eq!(normalize_entry_name("clip/./03.jpg").unwrap(), "clip/03.jpg");
    assert_eq!(normalize_entry_name(r"clip\\03.jpg").unwrap(), "clip/03.jpg");
    assert!(normalize_entry_name("/abs.png").is_err());
    assert!(normalize_entry_name("a/../b.png").is_err());
    assert!(normalize_entry_name("./").is_err());
}

#[test]
fn split_extension_looks_at_last_segment() {
    assert_eq!(split_extension("logo.png"), ("logo", ".png"));
    assert_eq!(split_extension("a.b/clip"), ("a.b/clip", ""));
    assert_eq!(split_extension("clip/03.jpg"), ("clip/03", ".jpg"));
    assert_eq!(split_extension(".env"), (".env", ""));
    assert_eq!(split_extension("x.tar.gz"), ("x.tar", ".gz"));
}

#[test]
fn registry_appends_counter_before_extension() {
    let mut reg = NameRegistry::new();
    assert!(reg.is_empty());
    let names: Vec<_> = (0..3).map(|_| reg.claim("logo.png").unwrap()).collect();
    assert_eq!(names, vec!["logo.png", "logo_1.png", "logo_2.png"]);
    assert_eq!(reg.claim("README").unwrap(), "README");
    assert_eq!(reg.claim("README").unwrap(), "README_1");
    assert_eq!(reg.len(), 5);
}

#[test]
fn registry_skips_taken_suffixes() {
    let mut reg = NameRegistry::new();
    reg.claim("a_1.png").unwrap();
    reg.claim("a.png").unwrap();
    assert_eq!(reg.claim("a.png").unwrap(), "a_2.png");
}
