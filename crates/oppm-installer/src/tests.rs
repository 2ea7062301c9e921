use super::*;

use std::fs::{self, File};
use std::path::Path;

use flate2::write::GzEncoder;
use flate2::Compression;
use oppm_core::{Metadata, OppmError};
use tempfile::TempDir;

use crate::backup::coerce_tar_gz_name;
use crate::fs_utils::{dir_is_empty, is_within, relative_from};

fn test_root() -> (TempDir, RootLayout) {
    let tmp = TempDir::new().expect("must create a temp dir");
    let layout = RootLayout::new(tmp.path().join("root"));
    layout.ensure_base_dirs().expect("must create base dirs");
    save_metadata(&layout, &Metadata::empty()).expect("must write empty metadata");
    (tmp, layout)
}

fn write_file(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("must create parent dirs");
    }
    fs::write(path, contents).expect("must write file");
}

fn write_tar_gz(path: &Path, entries: &[(&str, &str)]) {
    let file = File::create(path).expect("must create archive file");
    let encoder = GzEncoder::new(file, Compression::default());
    let mut builder = tar::Builder::new(encoder);
    for (name, contents) in entries {
        let mut header = tar::Header::new_gnu();
        header.set_size(contents.len() as u64);
        header.set_mode(0o644);
        header.set_cksum();
        builder
            .append_data(&mut header, name, contents.as_bytes())
            .expect("must append archive entry");
    }
    builder
        .into_inner()
        .expect("must finish tar stream")
        .finish()
        .expect("must finish gzip stream");
}

#[cfg(unix)]
fn symlink(target: &Path, link: &Path) {
    std::os::unix::fs::symlink(target, link).expect("must create symlink");
}

#[test]
fn install_executable_records_single_entry() {
    let (tmp, layout) = test_root();
    let input = tmp.path().join("sample.exe");
    write_file(&input, "binary bytes");

    let outcome = install_app(&layout, &input, None).expect("must install");
    assert_eq!(outcome.name, "sample");
    assert!(!outcome.replaced);

    let meta = load_metadata(&layout).expect("must load metadata");
    assert_eq!(meta.apps.len(), 1);
    assert_eq!(meta.apps[0].name, "sample");
    assert_eq!(meta.apps[0].relative_path, "apps/sample");
    assert!(layout.app_dir("sample").join("sample.exe").is_file());
}

#[test]
fn reinstall_with_override_replaces_not_duplicates() {
    let (tmp, layout) = test_root();
    let exe = tmp.path().join("sample.exe");
    write_file(&exe, "old bytes");
    install_app(&layout, &exe, None).expect("must install the executable");

    let dir_input = tmp.path().join("sample_app");
    write_file(&dir_input.join("main.txt"), "directory payload");
    let outcome =
        install_app(&layout, &dir_input, Some("sample")).expect("must reinstall over the old name");
    assert!(outcome.replaced);

    let meta = load_metadata(&layout).expect("must load metadata");
    assert_eq!(meta.apps.len(), 1, "reinstall must not duplicate the entry");
    assert!(layout.app_dir("sample").join("main.txt").is_file());
    assert!(
        !layout.app_dir("sample").join("sample.exe").exists(),
        "replace semantics, not merge"
    );
}

#[test]
fn install_extracts_compressed_tarball() {
    let (tmp, layout) = test_root();
    let input = tmp.path().join("bundle.tar.gz");
    write_tar_gz(&input, &[("bin/tool", "tool payload")]);

    let outcome = install_app(&layout, &input, None).expect("must install the archive");
    assert_eq!(outcome.name, "bundle");
    let extracted = layout.app_dir("bundle").join("bin/tool");
    assert_eq!(
        fs::read_to_string(extracted).expect("must read extracted file"),
        "tool payload"
    );
}

#[test]
fn failed_install_rolls_back_partial_directory() {
    let (tmp, layout) = test_root();
    let input = tmp.path().join("broken.zip");
    write_file(&input, "this is not a zip archive");

    let err = install_app(&layout, &input, None).expect_err("garbage zip must fail");
    assert!(matches!(
        err.downcast_ref::<OppmError>(),
        Some(OppmError::InstallFailed { .. })
    ));
    assert!(
        !layout.app_dir("broken").exists(),
        "the partial directory must be rolled back"
    );
    let meta = load_metadata(&layout).expect("must load metadata");
    assert!(meta.apps.is_empty());
}

#[test]
fn install_rejects_nonexistent_input() {
    let (tmp, layout) = test_root();
    let err = install_app(&layout, &tmp.path().join("missing.exe"), None)
        .expect_err("missing input must fail");
    assert!(matches!(
        err.downcast_ref::<OppmError>(),
        Some(OppmError::InvalidInput { .. })
    ));
}

#[test]
fn derive_name_uses_directory_component() {
    let tmp = TempDir::new().expect("must create a temp dir");
    let dir = tmp.path().join("mytool");
    fs::create_dir(&dir).expect("must create input dir");
    assert_eq!(derive_app_name(&dir).expect("must derive"), "mytool");
}

#[test]
fn remove_unknown_app_fails() {
    let (_tmp, layout) = test_root();
    let err = remove_app(&layout, "ghost").expect_err("unknown name must fail");
    assert!(matches!(
        err.downcast_ref::<OppmError>(),
        Some(OppmError::AppNotFound { .. })
    ));
}

#[test]
fn remove_tolerates_manually_deleted_directory() {
    let (tmp, layout) = test_root();
    let input = tmp.path().join("sample.exe");
    write_file(&input, "bytes");
    install_app(&layout, &input, None).expect("must install");

    fs::remove_dir_all(layout.app_dir("sample")).expect("must delete out-of-band");
    let report = remove_app(&layout, "sample").expect("removal must still succeed");
    assert!(report.dir_missing);
    assert!(load_metadata(&layout)
        .expect("must load metadata")
        .apps
        .is_empty());
}

#[cfg(unix)]
#[test]
fn remove_cascades_only_owned_shims() {
    let (tmp, layout) = test_root();
    for name in ["sample", "other"] {
        let input = tmp.path().join(format!("{name}.exe"));
        write_file(&input, name);
        install_app(&layout, &input, None).expect("must install");
        let exe = layout.app_dir(name).join(format!("{name}.exe"));
        create_shim(&layout, &exe, name).expect("must create shim");
    }

    let report = remove_app(&layout, "sample").expect("must remove");
    assert_eq!(report.removed_shims, vec!["sample".to_string()]);
    assert!(!layout.app_dir("sample").exists());

    let remaining = list_shims(&layout).expect("must list shims");
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].0, "other");
}

#[cfg(unix)]
#[test]
fn shim_target_is_stored_relative() {
    let (tmp, layout) = test_root();
    let input = tmp.path().join("sample.exe");
    write_file(&input, "bytes");
    install_app(&layout, &input, None).expect("must install");

    let exe = layout.app_dir("sample").join("sample.exe");
    create_shim(&layout, &exe, "sample").expect("must create shim");

    let stored = fs::read_link(layout.shims_dir().join("sample")).expect("must read link");
    assert!(
        !stored.is_absolute(),
        "an absolute target would break relocation: {}",
        stored.display()
    );
    assert!(stored.to_string_lossy().contains("apps"));
}

#[cfg(unix)]
#[test]
fn shim_creation_rejects_occupied_name() {
    let (tmp, layout) = test_root();
    let input = tmp.path().join("sample.exe");
    write_file(&input, "bytes");
    install_app(&layout, &input, None).expect("must install");
    let exe = layout.app_dir("sample").join("sample.exe");

    create_shim(&layout, &exe, "sample").expect("first creation must succeed");
    let err = create_shim(&layout, &exe, "sample").expect_err("occupied name must fail");
    assert!(matches!(
        err.downcast_ref::<OppmError>(),
        Some(OppmError::ShimExists { .. })
    ));

    // A dangling occupant still blocks the name.
    symlink(
        &layout.apps_dir().join("nowhere"),
        &layout.shims_dir().join("dangling"),
    );
    let err = create_shim(&layout, &exe, "dangling").expect_err("dangling occupant must block");
    assert!(matches!(
        err.downcast_ref::<OppmError>(),
        Some(OppmError::ShimExists { .. })
    ));
}

#[test]
fn shim_creation_rejects_target_outside_apps_dir() {
    let (tmp, layout) = test_root();
    let outside = tmp.path().join("loose.exe");
    write_file(&outside, "bytes");

    let err = create_shim(&layout, &outside, "loose").expect_err("outside target must fail");
    assert!(matches!(
        err.downcast_ref::<OppmError>(),
        Some(OppmError::InvalidInput { .. })
    ));
}

#[cfg(unix)]
#[test]
fn list_shims_skips_unresolvable_entries() {
    let (tmp, layout) = test_root();
    let input = tmp.path().join("sample.exe");
    write_file(&input, "bytes");
    install_app(&layout, &input, None).expect("must install");
    let exe = layout.app_dir("sample").join("sample.exe");
    create_shim(&layout, &exe, "sample").expect("must create shim");
    symlink(
        &layout.apps_dir().join("gone"),
        &layout.shims_dir().join("broken"),
    );

    let shims = list_shims(&layout).expect("must list shims");
    assert_eq!(shims.len(), 1);
    assert_eq!(shims[0].0, "sample");
    assert!(shims[0].1.ends_with("sample.exe"));
}

#[test]
fn delete_shim_reports_missing_name() {
    let (_tmp, layout) = test_root();
    let err = delete_shim(&layout, "ghost").expect_err("missing shim must fail");
    assert!(matches!(
        err.downcast_ref::<OppmError>(),
        Some(OppmError::ShimNotFound { .. })
    ));
}

#[test]
fn delete_shim_refuses_non_symlink_entry() {
    let (_tmp, layout) = test_root();
    write_file(&layout.shims_dir().join("imposter"), "not a link");
    let err = delete_shim(&layout, "imposter").expect_err("plain file must be refused");
    assert!(matches!(
        err.downcast_ref::<OppmError>(),
        Some(OppmError::InvalidInput { .. })
    ));
}

#[test]
fn sync_from_disk_reconciles_both_directions() {
    let (_tmp, layout) = test_root();
    write_file(&layout.apps_dir().join("orphan/app.txt"), "payload");
    upsert_app(&layout, "ghost", &layout.app_dir("ghost")).expect("must record ghost entry");

    let report = sync_from_disk(&layout).expect("must sync");
    assert_eq!(report.added, vec!["orphan".to_string()]);
    assert_eq!(report.removed, vec!["ghost".to_string()]);

    let meta = load_metadata(&layout).expect("must load metadata");
    assert_eq!(meta.entry("orphan").expect("orphan adopted").relative_path, "apps/orphan");
    assert!(!meta.contains("ghost"));

    let second = sync_from_disk(&layout).expect("must sync again");
    assert!(second.is_noop());
}

#[cfg(unix)]
fn seed_divergent_root(tmp: &TempDir, layout: &RootLayout) {
    // One healthy application with a valid shim, then one issue per
    // category.
    let input = tmp.path().join("sample.exe");
    write_file(&input, "bytes");
    install_app(layout, &input, None).expect("must install");
    create_shim(
        layout,
        &layout.app_dir("sample").join("sample.exe"),
        "sample",
    )
    .expect("must create valid shim");

    upsert_app(layout, "ghost", &layout.app_dir("ghost")).expect("must record ghost");
    fs::create_dir(layout.app_dir("emptyapp")).expect("must create empty dir");
    upsert_app(layout, "emptyapp", &layout.app_dir("emptyapp")).expect("must record emptyapp");
    write_file(&layout.apps_dir().join("orphan/app.txt"), "payload");
    write_file(&layout.apps_dir().join("stray.txt"), "stray");

    symlink(
        &layout.apps_dir().join("gone"),
        &layout.shims_dir().join("broken"),
    );
    let outside = tmp.path().join("external.exe");
    write_file(&outside, "bytes");
    symlink(&outside, &layout.shims_dir().join("external"));
    write_file(&layout.shims_dir().join("plainfile"), "not a link");
}

#[cfg(unix)]
#[test]
fn audit_reports_every_category() {
    let (tmp, layout) = test_root();
    seed_divergent_root(&tmp, &layout);

    let report = audit(&layout).expect("must audit");
    assert_eq!(report.invalid_apps, vec!["ghost".to_string()]);
    assert_eq!(report.empty_apps, vec!["emptyapp".to_string()]);
    assert_eq!(report.orphaned_dirs, vec!["orphan".to_string()]);
    assert_eq!(report.stray_files, vec!["stray.txt".to_string()]);
    assert_eq!(report.broken_shims, vec!["broken".to_string()]);
    assert_eq!(report.external_shims, vec!["external".to_string()]);
    assert_eq!(report.non_symlink_shims, vec!["plainfile".to_string()]);
    assert_eq!(report.issue_count(), 7);
    assert!(!report.is_clean());
}

#[test]
fn audit_passes_on_clean_root() {
    let (_tmp, layout) = test_root();
    let report = audit(&layout).expect("must audit");
    assert!(report.is_clean());
    assert_eq!(report.issue_count(), 0);
}

#[cfg(unix)]
#[test]
fn repair_reaches_fixed_point_in_one_pass() {
    let (tmp, layout) = test_root();
    seed_divergent_root(&tmp, &layout);

    let summary = repair(&layout).expect("must repair");
    assert_eq!(summary.entries_pruned, 2, "ghost and emptyapp");
    assert_eq!(summary.empty_dirs_removed, 1);
    assert_eq!(summary.orphans_adopted, 1);
    assert_eq!(summary.strays_removed, 1);
    assert_eq!(summary.shims_removed, 3);

    let report = audit(&layout).expect("must audit after repair");
    assert!(report.is_clean(), "one repair pass must fully converge");

    let second = repair(&layout).expect("second repair must succeed");
    assert_eq!(second.total(), 0, "repair must be idempotent");

    // The healthy shim and application survive.
    let shims = list_shims(&layout).expect("must list shims");
    assert_eq!(shims.len(), 1);
    assert_eq!(shims[0].0, "sample");
    let meta = load_metadata(&layout).expect("must load metadata");
    assert!(meta.contains("sample"));
    assert!(meta.contains("orphan"), "non-empty orphan is adopted");
}

#[test]
fn repair_deletes_empty_orphan_instead_of_adopting() {
    let (_tmp, layout) = test_root();
    fs::create_dir(layout.apps_dir().join("hollow")).expect("must create empty orphan");

    let summary = repair(&layout).expect("must repair");
    assert_eq!(summary.empty_dirs_removed, 1);
    assert_eq!(summary.orphans_adopted, 0);
    assert!(!layout.apps_dir().join("hollow").exists());
    assert!(!load_metadata(&layout)
        .expect("must load metadata")
        .contains("hollow"));
}

#[cfg(unix)]
#[test]
fn migrate_preserves_consistency_without_rewrites() {
    let (tmp, layout) = test_root();
    let store = ConfigStore::new(tmp.path().join("config.toml"));
    store.save(&layout).expect("must save config");

    let input = tmp.path().join("sample.exe");
    write_file(&input, "bytes");
    install_app(&layout, &input, None).expect("must install");
    create_shim(
        &layout,
        &layout.app_dir("sample").join("sample.exe"),
        "sample",
    )
    .expect("must create shim");

    let new_root = tmp.path().join("relocated");
    let outcome = migrate_root(&store, layout.root_dir(), &new_root).expect("must migrate");
    let new_layout = match outcome {
        MigrateOutcome::Moved(layout) => layout,
        MigrateOutcome::SameLocation => panic!("distinct target must move"),
    };

    assert!(!layout.root_dir().exists());
    assert_eq!(store.load().expect("must reload config"), new_layout);

    let report = audit(&new_layout).expect("must audit the new root");
    assert!(report.is_clean(), "relative paths must survive the move");
    let shims = list_shims(&new_layout).expect("must list shims");
    assert_eq!(shims.len(), 1);
    assert!(is_within(
        &shims[0].1,
        &new_layout
            .apps_dir()
            .canonicalize()
            .expect("must resolve apps dir")
    ));
}

#[test]
fn migrate_to_same_location_is_noop() {
    let (tmp, layout) = test_root();
    let store = ConfigStore::new(tmp.path().join("config.toml"));
    let outcome =
        migrate_root(&store, layout.root_dir(), layout.root_dir()).expect("must succeed");
    assert_eq!(outcome, MigrateOutcome::SameLocation);
    assert!(layout.root_dir().exists());
}

#[test]
fn migrate_rejects_nonempty_target_and_missing_source() {
    let (tmp, layout) = test_root();
    let store = ConfigStore::new(tmp.path().join("config.toml"));

    let occupied = tmp.path().join("occupied");
    write_file(&occupied.join("file.txt"), "content");
    let err = migrate_root(&store, layout.root_dir(), &occupied)
        .expect_err("occupied target must fail");
    assert!(matches!(
        err.downcast_ref::<OppmError>(),
        Some(OppmError::MigrationTargetNotEmpty { .. })
    ));

    let err = migrate_root(&store, &tmp.path().join("nowhere"), &tmp.path().join("dest"))
        .expect_err("missing source must fail");
    assert!(matches!(
        err.downcast_ref::<OppmError>(),
        Some(OppmError::MigrationSourceMissing { .. })
    ));
}

#[test]
fn pack_then_rebuild_reproduces_the_tree() {
    let (tmp, layout) = test_root();
    let input = tmp.path().join("sample.exe");
    write_file(&input, "the tool bytes");
    install_app(&layout, &input, None).expect("must install");

    let archive = tmp.path().join("backups/root.tar.gz");
    let packed = pack_root(&layout, Some(&archive), false).expect("must pack");
    assert_eq!(packed, archive);
    assert!(archive.is_file());

    let store = ConfigStore::new(tmp.path().join("rebuilt-config.toml"));
    let target = tmp.path().join("rebuilt-root");
    let rebuilt = rebuild_root(&store, &archive, &target, false).expect("must rebuild");
    assert_eq!(rebuilt, RootLayout::new(&target));
    assert_eq!(
        fs::read_to_string(rebuilt.app_dir("sample").join("sample.exe"))
            .expect("must read rebuilt file"),
        "the tool bytes"
    );
    assert_eq!(
        store.load().expect("must reload config"),
        rebuilt,
        "the config must point at the new target, not archived values"
    );
}

#[test]
fn pack_refuses_existing_output_without_overwrite() {
    let (tmp, layout) = test_root();
    let archive = tmp.path().join("out.tar.gz");
    write_file(&archive, "already here");

    let err = pack_root(&layout, Some(&archive), false).expect_err("existing output must fail");
    assert!(matches!(
        err.downcast_ref::<OppmError>(),
        Some(OppmError::PackOutputExists { .. })
    ));

    pack_root(&layout, Some(&archive), true).expect("overwrite must succeed");
}

#[test]
fn pack_coerces_output_extension() {
    assert_eq!(
        coerce_tar_gz_name(Path::new("backup.2024")),
        Path::new("backup.tar.gz")
    );
    assert_eq!(
        coerce_tar_gz_name(Path::new("already.tar.gz")),
        Path::new("already.tar.gz")
    );

    let (tmp, layout) = test_root();
    let requested = tmp.path().join("backup.2024");
    let packed = pack_root(&layout, Some(&requested), false).expect("must pack");
    assert_eq!(packed, tmp.path().join("backup.tar.gz"));
    assert!(packed.is_file());
}

#[test]
fn rebuild_rejects_missing_or_wrong_format_archive() {
    let tmp = TempDir::new().expect("must create a temp dir");
    let store = ConfigStore::new(tmp.path().join("config.toml"));
    let target = tmp.path().join("target");

    let err = rebuild_root(&store, &tmp.path().join("missing.tar.gz"), &target, false)
        .expect_err("missing archive must fail");
    assert!(matches!(
        err.downcast_ref::<OppmError>(),
        Some(OppmError::ArchiveNotFound { .. })
    ));

    let wrong = tmp.path().join("archive.zip");
    write_file(&wrong, "zip bytes");
    let err =
        rebuild_root(&store, &wrong, &target, false).expect_err("wrong format must fail");
    assert!(matches!(
        err.downcast_ref::<OppmError>(),
        Some(OppmError::UnsupportedArchiveFormat { .. })
    ));
}

#[test]
fn rebuild_rejects_multiple_top_level_directories() {
    let tmp = TempDir::new().expect("must create a temp dir");
    let archive = tmp.path().join("two-roots.tar.gz");
    write_tar_gz(
        &archive,
        &[("one/file.txt", "first"), ("two/file.txt", "second")],
    );

    let store = ConfigStore::new(tmp.path().join("config.toml"));
    let err = rebuild_root(&store, &archive, &tmp.path().join("target"), false)
        .expect_err("two top-level directories must fail");
    assert!(matches!(
        err.downcast_ref::<OppmError>(),
        Some(OppmError::InvalidArchiveStructure)
    ));
}

#[test]
fn rebuild_requires_explicit_replacement_of_nonempty_target() {
    let (tmp, layout) = test_root();
    let archive = tmp.path().join("root.tar.gz");
    pack_root(&layout, Some(&archive), false).expect("must pack");

    let store = ConfigStore::new(tmp.path().join("config.toml"));
    let target = tmp.path().join("target");
    write_file(&target.join("existing.txt"), "occupant");

    let err = rebuild_root(&store, &archive, &target, false)
        .expect_err("nonempty target must require confirmation");
    assert!(matches!(
        err.downcast_ref::<OppmError>(),
        Some(OppmError::InvalidInput { .. })
    ));

    let rebuilt = rebuild_root(&store, &archive, &target, true).expect("must replace");
    assert!(!target.join("existing.txt").exists());
    assert!(rebuilt.meta_file().is_file());
}

#[test]
fn config_store_round_trips_layout() {
    let tmp = TempDir::new().expect("must create a temp dir");
    let store = ConfigStore::new(tmp.path().join("nested/config.toml"));
    let layout = RootLayout::new(tmp.path().join("root"));

    store.save(&layout).expect("must save, creating parents");
    assert_eq!(store.load().expect("must load"), layout);

    let raw = fs::read_to_string(store.path()).expect("must read raw config");
    assert!(raw.contains("[config]"));
    assert!(raw.contains("root_dir"));
    assert!(raw.contains("shims_dir"));
}

#[test]
fn config_store_reports_missing_and_malformed_files() {
    let tmp = TempDir::new().expect("must create a temp dir");
    let store = ConfigStore::new(tmp.path().join("config.toml"));

    let err = store.load().expect_err("missing file must fail");
    assert!(matches!(
        err.downcast_ref::<OppmError>(),
        Some(OppmError::ConfigMissing { .. })
    ));

    write_file(store.path(), "[config]\nroot_dir = \"/somewhere\"\n");
    let err = store.load().expect_err("missing keys must fail");
    assert!(matches!(
        err.downcast_ref::<OppmError>(),
        Some(OppmError::ConfigUnreadable { .. })
    ));
}

#[test]
fn metadata_store_surfaces_unreadable_files() {
    let tmp = TempDir::new().expect("must create a temp dir");
    let layout = RootLayout::new(tmp.path().join("root"));

    let err = load_metadata(&layout).expect_err("missing file must fail");
    assert!(matches!(
        err.downcast_ref::<OppmError>(),
        Some(OppmError::MetadataUnreadable { .. })
    ));

    write_file(&layout.meta_file(), "{\"applications\": []}");
    let err = load_metadata(&layout).expect_err("wrong shape must fail");
    assert!(matches!(
        err.downcast_ref::<OppmError>(),
        Some(OppmError::MetadataUnreadable { .. })
    ));
}

#[test]
fn upsert_rejects_directories_outside_the_root() {
    let (tmp, layout) = test_root();
    let err = upsert_app(&layout, "escapee", &tmp.path().join("elsewhere"))
        .expect_err("outside dir must fail");
    assert!(matches!(
        err.downcast_ref::<OppmError>(),
        Some(OppmError::InvalidInput { .. })
    ));
}

#[test]
fn remove_app_entry_saves_only_on_change() {
    let (_tmp, layout) = test_root();
    upsert_app(&layout, "sample", &layout.app_dir("sample")).expect("must upsert");
    assert!(remove_app_entry(&layout, "sample").expect("must remove"));
    assert!(!remove_app_entry(&layout, "sample").expect("second removal is a no-op"));
}

#[cfg(unix)]
#[test]
fn clean_empties_all_three_stores() {
    let (tmp, layout) = test_root();
    let input = tmp.path().join("sample.exe");
    write_file(&input, "bytes");
    install_app(&layout, &input, None).expect("must install");
    create_shim(
        &layout,
        &layout.app_dir("sample").join("sample.exe"),
        "sample",
    )
    .expect("must create shim");
    write_file(&layout.apps_dir().join("stray.txt"), "stray");

    let summary = clean_apps(&layout).expect("must clean");
    assert_eq!(
        summary.removed_apps,
        vec!["sample".to_string(), "stray.txt".to_string()]
    );
    assert_eq!(summary.removed_shims, vec!["sample".to_string()]);
    assert!(dir_is_empty(&layout.apps_dir()).expect("must read apps dir"));
    assert!(load_metadata(&layout)
        .expect("must load metadata")
        .apps
        .is_empty());
}

#[test]
fn relative_from_walks_up_shared_prefix() {
    assert_eq!(
        relative_from(Path::new("/root/shims"), Path::new("/root/apps/tool/tool.exe")),
        Path::new("../apps/tool/tool.exe")
    );
    assert_eq!(
        relative_from(Path::new("/root"), Path::new("/root")),
        Path::new(".")
    );
}

#[test]
fn containment_requires_a_real_prefix() {
    assert!(is_within(Path::new("/root/apps/tool"), Path::new("/root/apps")));
    assert!(!is_within(Path::new("/root/apps-other"), Path::new("/root/apps")));
    assert!(!is_within(Path::new("/root"), Path::new("/root/apps")));
}
