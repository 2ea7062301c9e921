use super::*;

#[test]
fn classify_strips_executable_suffix() {
    let (name, kind) = classify_file_name("app.exe").expect("exe should classify");
    assert_eq!(name, "app");
    assert_eq!(kind, FileKind::Executable);

    let (name, kind) = classify_file_name("tool.CMD").expect("cmd should classify");
    assert_eq!(name, "tool");
    assert_eq!(kind, FileKind::Executable);
}

#[test]
fn classify_strips_one_suffix_for_plain_archives() {
    let (name, kind) = classify_file_name("app.zip").expect("zip should classify");
    assert_eq!(name, "app");
    assert_eq!(kind, FileKind::Archive(ArchiveType::Zip));

    let (name, kind) = classify_file_name("bundle.tar").expect("tar should classify");
    assert_eq!(name, "bundle");
    assert_eq!(kind, FileKind::Archive(ArchiveType::Tar));

    let (name, kind) = classify_file_name("bundle.tgz").expect("tgz should classify");
    assert_eq!(name, "bundle");
    assert_eq!(kind, FileKind::Archive(ArchiveType::TarGz));
}

#[test]
fn classify_strips_two_suffixes_for_compressed_tarballs() {
    let (name, kind) = classify_file_name("app.tar.gz").expect("tar.gz should classify");
    assert_eq!(name, "app");
    assert_eq!(kind, FileKind::Archive(ArchiveType::TarGz));

    let (name, _) = classify_file_name("my.tool.tar.gz").expect("dotted stem should classify");
    assert_eq!(name, "my.tool");
}

#[test]
fn classify_rejects_unknown_extension() {
    let err = classify_file_name("app.xyz").expect_err("xyz must be rejected");
    match err {
        OppmError::UnsupportedInputType {
            extension,
            supported,
        } => {
            assert_eq!(extension, ".xyz");
            assert!(supported.contains(".tar.gz"));
            assert!(supported.contains(".exe"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn classify_rejects_extensionless_name() {
    let err = classify_file_name("app").expect_err("no extension must be rejected");
    assert!(matches!(err, OppmError::UnsupportedInputType { .. }));
}

#[test]
fn archive_type_inference() {
    assert_eq!(ArchiveType::infer_from_name("a.zip"), Some(ArchiveType::Zip));
    assert_eq!(ArchiveType::infer_from_name("a.tar"), Some(ArchiveType::Tar));
    assert_eq!(
        ArchiveType::infer_from_name("a.tar.gz"),
        Some(ArchiveType::TarGz)
    );
    assert_eq!(
        ArchiveType::infer_from_name("a.TGZ"),
        Some(ArchiveType::TarGz)
    );
    assert_eq!(ArchiveType::infer_from_name("a.xyz"), None);
}

#[test]
fn metadata_parses_documented_shape() {
    let raw = r#"{"apps": [{"name": "sample", "relative_path": "apps/sample"}]}"#;
    let meta = Metadata::from_json_str(raw).expect("documented shape should parse");
    assert_eq!(meta.apps.len(), 1);
    assert_eq!(meta.apps[0].name, "sample");
    assert_eq!(meta.apps[0].relative_path, "apps/sample");
}

#[test]
fn metadata_rejects_unknown_shape() {
    assert!(Metadata::from_json_str(r#"{"applications": []}"#).is_err());
    assert!(Metadata::from_json_str(r#"{"apps": [{"name": "x"}]}"#).is_err());
    assert!(
        Metadata::from_json_str(r#"{"apps": [], "extra": 1}"#).is_err(),
        "unknown top-level fields must be rejected"
    );
}

#[test]
fn metadata_upsert_keeps_names_unique() {
    let mut meta = Metadata::empty();
    meta.upsert("sample", "apps/sample");
    meta.upsert("other", "apps/other");
    meta.upsert("sample", "apps/sample2");

    assert_eq!(meta.apps.len(), 2);
    let entry = meta.entry("sample").expect("sample should exist");
    assert_eq!(entry.relative_path, "apps/sample2");
    assert_eq!(meta.apps[1].name, "sample", "upsert re-appends at the end");
}

#[test]
fn metadata_remove_reports_change() {
    let mut meta = Metadata::empty();
    meta.upsert("sample", "apps/sample");
    assert!(meta.remove("sample"));
    assert!(!meta.remove("sample"));
    assert!(meta.apps.is_empty());
}

#[test]
fn metadata_round_trip_preserves_order() {
    let mut meta = Metadata::empty();
    meta.upsert("zeta", "apps/zeta");
    meta.upsert("alpha", "apps/alpha");

    let raw = meta.to_json_string().expect("must serialize");
    let parsed = Metadata::from_json_str(&raw).expect("must parse back");
    assert_eq!(parsed, meta);
    assert_eq!(parsed.apps[0].name, "zeta");

    let sorted = parsed.sorted_entries();
    assert_eq!(sorted[0].name, "alpha");
}
