use std::io::{Cursor, Read};

use super::*;
use crate::encode::archive::InMemoryArchive;

#[test]
fn duplicate_names_get_counters() {
    let entries = vec![
        ExportEntry::new("logo.png", vec![1]),
        ExportEntry::new("logo.png", vec![2]),
        ExportEntry::new("logo.png", vec![3]),
    ];
    let resolved = ExportPackager::resolve(entries).unwrap();
    let names: Vec<_> = resolved.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["logo.png", "logo_1.png", "logo_2.png"]);
    assert_eq!(resolved[2].bytes.as_slice(), &[3]);
}

#[test]
fn path_names_emit_parent_directories_once() {
    let entries = vec![
        ExportEntry::new("clip/1.jpg", vec![1]),
        ExportEntry::new("clip/2.jpg", vec![2]),
        ExportEntry::new("a/b/c.jpg", vec![3]),
    ];
    let mut sink = InMemoryArchive::new();
    let names = ExportPackager::new("video_stills.zip")
        .write_to(entries, &mut sink)
        .unwrap();
    assert_eq!(names, vec!["clip/1.jpg", "clip/2.jpg", "a/b/c.jpg"]);
    let recorded: Vec<_> = sink.records().iter().map(|r| r.name.as_str()).collect();
    assert_eq!(
        recorded,
        vec!["clip/", "clip/1.jpg", "clip/2.jpg", "a/", "a/b/", "a/b/c.jpg"]
    );
    assert_eq!(sink.name(), Some("video_stills.zip"));
}

#[test]
fn empty_export_is_a_no_op() {
    assert!(ExportPackager::new("x.zip").package(Vec::new()).unwrap().is_none());
}

#[test]
fn zip_contains_unmodified_payloads() {
    let payload: Vec<u8> = (0..=255).collect();
    let out = ExportPackager::new("renamed_files.zip")
        .package(vec![
            ExportEntry::new("a.bin", payload.clone()),
            ExportEntry::new("a.bin", vec![9]),
        ])
        .unwrap()
        .unwrap();
    assert_eq!(out.file_name(), "renamed_files.zip");

    let mut zip = zip::ZipArchive::new(Cursor::new(out.bytes().to_vec())).unwrap();
    let mut buf = Vec::new();
    zip.by_name("a.bin").unwrap().read_to_end(&mut buf).unwrap();
    assert_eq!(buf, payload);
    buf.clear();
    zip.by_name("a_1.bin").unwrap().read_to_end(&mut buf).unwrap();
    assert_eq!(buf, vec![9]);
}

#[test]
fn single_bypasses_archive() {
    let out = ExportPackager::single(ExportEntry::new("Board_1.jpg", vec![7])).unwrap();
    assert!(matches!(out, ExportOutput::File(_)));
    assert_eq!(out.file_name(), "Board_1.jpg");
    assert_eq!(out.bytes(), &[7]);
}

#[test]
fn unsafe_names_are_rejected() {
    assert!(ExportPackager::resolve(vec![ExportEntry::new("../x", vec![])]).is_err());
}
