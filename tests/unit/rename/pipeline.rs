use super::*;
use crate::rename::rules::{Casing, Numbering};

fn input(name: &str) -> AssetInput {
    AssetInput::new(name, "application/octet-stream", name.as_bytes().to_vec())
}

#[test]
fn split_name_uses_last_dot() {
    assert_eq!(split_name("archive.tar.gz"), ("archive.tar", ".gz"));
    assert_eq!(split_name("README"), ("README", ""));
    assert_eq!(split_name(".env"), ("", ".env"));
}

#[test]
fn rule_changes_rederive_from_original_names() {
    let mut batch = RenameBatch::new();
    batch.add([input("My File.JPG")]);
    assert_eq!(batch.items()[0].new_name, "My File.JPG");

    batch
        .set_rules(RenameRules {
            prefix: "x_".to_string(),
            ..RenameRules::default()
        })
        .unwrap();
    batch
        .set_rules(RenameRules {
            prefix: "y_".to_string(),
            casing: Casing::Upper,
            ..RenameRules::default()
        })
        .unwrap();
    // No trace of the earlier prefix.
    assert_eq!(batch.items()[0].new_name, "y_MY FILE.JPG");
}

#[test]
fn numbering_survives_removal_and_resets_on_clear() {
    let mut batch = RenameBatch::new();
    batch.add([input("a.png"), input("b.png"), input("c.png")]);
    batch
        .set_rules(RenameRules {
            numbering: Some(Numbering::default()),
            ..RenameRules::default()
        })
        .unwrap();
    assert!(batch.remove(1));
    assert!(!batch.remove(1));
    let names: Vec<_> = batch.items().iter().map(|i| i.new_name.as_str()).collect();
    assert_eq!(names, vec!["a_001.png", "c_003.png"]);

    batch.add([input("d.png")]);
    assert_eq!(batch.items()[2].new_name, "d_004.png");

    batch.clear();
    assert!(batch.is_empty());
    batch.add([input("e.png")]);
    assert_eq!(batch.items()[0].new_name, "e_001.png");
}

#[test]
fn derive_all_is_pure() {
    let mut batch = RenameBatch::new();
    batch.add([input("one.txt"), input("two.txt")]);
    let rules = RenameRules {
        casing: Casing::Upper,
        ..RenameRules::default()
    };
    let a = derive_all(batch.items(), &rules);
    let b = derive_all(batch.items(), &rules);
    assert_eq!(a, b);
    assert_eq!(a, vec!["ONE.txt", "TWO.txt"]);
    // Deriving does not touch the batch.
    assert_eq!(batch.items()[0].new_name, "one.txt");
}

#[test]
fn export_entries_carry_original_bytes() {
    let mut batch = RenameBatch::new();
    batch.add([input("keep.bin")]);
    batch
        .set_rules(RenameRules {
            suffix: "_v2".to_string(),
            ..RenameRules::default()
        })
        .unwrap();
    let entries = batch.export_entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].name, "keep_v2.bin");
    assert_eq!(entries[0].bytes.as_slice(), b"keep.bin");
}
