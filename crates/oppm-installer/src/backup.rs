use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{anyhow, Context, Result};
use flate2::write::GzEncoder;
use flate2::Compression;
use oppm_core::{ArchiveType, OppmError};

use crate::config::ConfigStore;
use crate::fs_utils::{dir_is_empty, move_dir_or_copy};
use crate::install::extract_archive;
use crate::layout::RootLayout;

pub const DEFAULT_BACKUP_DIR_NAME: &str = "oppm_backups";

/// Archives the entire root into a single `.tar.gz` whose top level is the
/// root directory's own name. A partially written output is deleted on
/// failure.
pub fn pack_root(layout: &RootLayout, output: Option<&Path>, overwrite: bool) -> Result<PathBuf> {
    let root_dir = layout.root_dir();
    if !root_dir.is_dir() {
        return Err(OppmError::PackFailed {
            path: root_dir.to_path_buf(),
            source: "root directory does not exist or is not a directory".into(),
        }
        .into());
    }
    let root_dir = root_dir
        .canonicalize()
        .with_context(|| format!("failed to resolve {}", root_dir.display()))?;
    let root_name = root_dir
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| {
            anyhow!(OppmError::PackFailed {
                path: root_dir.clone(),
                source: "root directory has no usable name".into(),
            })
        })?
        .to_string();

    let output_file = resolve_pack_output(output)?;
    if output_file.exists() && !overwrite {
        return Err(OppmError::PackOutputExists { path: output_file }.into());
    }

    if let Err(err) = write_archive(&root_dir, &root_name, &output_file) {
        let _ = fs::remove_file(&output_file);
        return Err(OppmError::PackFailed {
            path: output_file,
            source: err.into(),
        }
        .into());
    }
    Ok(output_file)
}

fn resolve_pack_output(output: Option<&Path>) -> Result<PathBuf> {
    match output {
        None => {
            let backup_dir = std::env::current_dir()
                .context("failed to resolve the current directory")?
                .join(DEFAULT_BACKUP_DIR_NAME);
            fs::create_dir_all(&backup_dir)
                .with_context(|| format!("failed to create {}", backup_dir.display()))?;
            Ok(backup_dir.join(format!("oppm_backup_{}.tar.gz", current_unix_timestamp()?)))
        }
        Some(path) => {
            let out = coerce_tar_gz_name(path);
            if let Some(parent) = out.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)
                        .with_context(|| format!("failed to create {}", parent.display()))?;
                }
            }
            Ok(out)
        }
    }
}

/// Outputs not ending in `.tar.gz` get their final extension replaced, so a
/// dotted name like `backup.2024` becomes `backup.tar.gz`.
pub(crate) fn coerce_tar_gz_name(path: &Path) -> PathBuf {
    let already_tar_gz = path
        .file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.ends_with(".tar.gz"))
        .unwrap_or(false);
    if already_tar_gz {
        return path.to_path_buf();
    }
    let mut out = path.to_path_buf();
    out.set_extension("tar.gz");
    out
}

fn write_archive(root_dir: &Path, root_name: &str, output_file: &Path) -> Result<()> {
    let file = File::create(output_file)
        .with_context(|| format!("failed to create {}", output_file.display()))?;
    let encoder = GzEncoder::new(file, Compression::default());
    let mut builder = tar::Builder::new(encoder);
    // Shims must survive as symlink entries, not as copies of their targets.
    builder.follow_symlinks(false);
    builder
        .append_dir_all(root_name, root_dir)
        .with_context(|| format!("failed to archive {}", root_dir.display()))?;
    let encoder = builder
        .into_inner()
        .context("failed to finish the archive stream")?;
    encoder.finish().context("failed to finish compression")?;
    Ok(())
}

/// Restores a packed root at `target_root` and persists a fresh
/// configuration pointing there; anything embedded in the archive is never
/// trusted.
pub fn rebuild_root(
    store: &ConfigStore,
    archive: &Path,
    target_root: &Path,
    replace_existing: bool,
) -> Result<RootLayout> {
    if !archive.exists() {
        return Err(OppmError::ArchiveNotFound {
            path: archive.to_path_buf(),
        }
        .into());
    }
    let is_tar_gz = archive
        .file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.ends_with(".tar.gz"))
        .unwrap_or(false);
    if !is_tar_gz {
        return Err(OppmError::UnsupportedArchiveFormat {
            path: archive.to_path_buf(),
        }
        .into());
    }
    if target_root.is_dir()
        && !dir_is_empty(target_root)
            .with_context(|| format!("failed to read {}", target_root.display()))?
        && !replace_existing
    {
        return Err(OppmError::invalid_input(format!(
            "target directory {} is not empty; confirm the overwrite to proceed",
            target_root.display()
        ))
        .into());
    }

    let staging = tempfile::tempdir().context("failed to create a staging directory")?;
    extract_archive(archive, ArchiveType::TarGz, staging.path()).map_err(|err| {
        OppmError::RebuildFailed {
            archive: archive.to_path_buf(),
            source: err.into(),
        }
    })?;
    let extracted_root = single_top_level_dir(staging.path())?;

    let place = || -> Result<()> {
        if target_root.exists() {
            fs::remove_dir_all(target_root)
                .with_context(|| format!("failed to remove {}", target_root.display()))?;
        }
        move_dir_or_copy(&extracted_root, target_root)
    };
    place().map_err(|err| OppmError::RebuildFailed {
        archive: archive.to_path_buf(),
        source: err.into(),
    })?;

    let layout = RootLayout::new(target_root);
    store.save(&layout)?;
    Ok(layout)
}

fn single_top_level_dir(dir: &Path) -> Result<PathBuf> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("failed to read {}", dir.display()))? {
        entries.push(entry?.path());
    }
    match entries.as_slice() {
        [single] if single.is_dir() => Ok(single.clone()),
        _ => Err(OppmError::InvalidArchiveStructure.into()),
    }
}

fn current_unix_timestamp() -> Result<u64> {
    Ok(SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .context("system clock is before the unix epoch")?
        .as_secs())
}
