use super::*;

#[test]
fn clean_then_kebab_keeps_extension() {
    let rules = RenameRules {
        clean_name: true,
        casing: Casing::Kebab,
        ..RenameRules::default()
    };
    let out = transform("My File", ".JPG", &rules, 0);
    assert_eq!(out, "my-file.JPG");
    assert_eq!(transform("My File", ".JPG", &rules, 0), out);
}

#[test]
fn clean_strips_unsafe_characters() {
    assert_eq!(clean_name("a  b\tc"), "a_b_c");
    assert_eq!(clean_name("Résumé (final)!"), "Rsum_final");
    assert_eq!(clean_name("keep-this_one"), "keep-this_one");
}

#[test]
fn find_replace_is_literal_and_global() {
    let rules = RenameRules {
        find: ".".to_string(),
        replace: "-".to_string(),
        ..RenameRules::default()
    };
    assert_eq!(transform("a.b.c", ".txt", &rules, 0), "a-b-c.txt");

    let noop = RenameRules {
        find: String::new(),
        replace: "zzz".to_string(),
        ..RenameRules::default()
    };
    assert_eq!(transform("abc", "", &noop, 0), "abc");
}

#[test]
fn casing_variants() {
    assert_eq!(Casing::Upper.apply("My file"), "MY FILE");
    assert_eq!(Casing::Lower.apply("My File"), "my file");
    assert_eq!(Casing::Camel.apply("hello big-world"), "helloBigWorld");
    assert_eq!(Casing::Camel.apply("HELLO__there"), "helloThere");
    assert_eq!(Casing::Camel.apply("trailing--"), "trailing-");
    assert_eq!(Casing::Kebab.apply("myFileName"), "my-file-name");
    assert_eq!(Casing::Kebab.apply("My  big__File"), "my-big-file");
    assert_eq!(Casing::None.apply("As Is"), "As Is");
}

#[test]
fn numbering_pads_start_plus_index() {
    let rules = RenameRules {
        numbering: Some(Numbering { start: 1, pad: 3 }),
        ..RenameRules::default()
    };
    let names: Vec<_> = (0..3).map(|i| transform("img", ".png", &rules, i)).collect();
    assert_eq!(names, vec!["img_001.png", "img_002.png", "img_003.png"]);

    let wide = Numbering { start: 998, pad: 2 };
    assert_eq!(wide.suffix(3), "_1001");
}

#[test]
fn prefix_suffix_wrap_numbered_name() {
    let rules = RenameRules {
        prefix: "pre_".to_string(),
        suffix: "_post".to_string(),
        numbering: Some(Numbering { start: 7, pad: 1 }),
        ..RenameRules::default()
    };
    assert_eq!(transform("x", ".gif", &rules, 0), "pre_x_7_post.gif");
}

#[test]
fn extension_override_normalizes_dot() {
    let mut rules = RenameRules {
        extension_override: Some("png".to_string()),
        ..RenameRules::default()
    };
    assert_eq!(transform("a", ".jpg", &rules, 0), "a.png");
    rules.extension_override = Some(".webp".to_string());
    assert_eq!(transform("a", ".jpg", &rules, 0), "a.webp");
    rules.extension_override = Some(String::new());
    assert_eq!(transform("a", ".jpg", &rules, 0), "a.jpg");
}

#[test]
fn rules_deserialize_with_defaults() {
    let r: RenameRules =
        serde_json::from_str(r#"{"casing":"camel","numbering":{"pad":2}}"#).unwrap();
    assert_eq!(r.casing, Casing::Camel);
    assert_eq!(r.numbering, Some(Numbering { start: 1, pad: 2 }));
    assert!(!r.clean_name);
    assert!(r.validate().is_ok());

    let bad = RenameRules {
        numbering: Some(Numbering { start: 1, pad: 1000 }),
        ..RenameRules::default()
    };
    assert!(bad.validate().is_err());
}
