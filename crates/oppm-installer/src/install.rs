use std::fs::{self, File};
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use flate2::read::GzDecoder;
use oppm_core::{classify_file_name, ArchiveType, FileKind, OppmError};

use crate::fs_utils::copy_dir_recursive;
use crate::layout::RootLayout;
use crate::metadata::upsert_app;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstallOutcome {
    pub name: String,
    /// An older install of the same name was deleted first.
    pub replaced: bool,
}

/// Canonical application name for an input path: a directory's own name, or
/// a file name with its recognized suffixes stripped.
pub fn derive_app_name(input: &Path) -> Result<String> {
    if input.is_dir() {
        let name = usable_file_name(input)?;
        return Ok(name.to_string());
    }
    if input.is_file() {
        let file_name = usable_file_name(input)?;
        let (name, _) = classify_file_name(file_name)?;
        return Ok(name);
    }
    Err(OppmError::invalid_input(format!(
        "input path does not exist or is not a file or directory: {}",
        input.display()
    ))
    .into())
}

/// Materializes an application under the apps directory and records it in
/// the metadata. Replace semantics: an existing directory of the final name
/// is deleted first, never merged into. A failed materialization deletes the
/// partial directory before surfacing `InstallFailed`.
pub fn install_app(
    layout: &RootLayout,
    input: &Path,
    override_name: Option<&str>,
) -> Result<InstallOutcome> {
    if !input.exists() {
        return Err(OppmError::invalid_input(format!(
            "input file or directory does not exist: {}",
            input.display()
        ))
        .into());
    }
    let derived = derive_app_name(input)?;
    let name = override_name.unwrap_or(derived.as_str()).to_string();

    let app_dir = layout.app_dir(&name);
    let replaced = app_dir.exists();
    if replaced {
        fs::remove_dir_all(&app_dir).with_context(|| {
            format!(
                "failed to remove the previous install at {}",
                app_dir.display()
            )
        })?;
    }

    if let Err(err) = materialize(input, &app_dir) {
        if app_dir.exists() {
            let _ = fs::remove_dir_all(&app_dir);
        }
        return Err(OppmError::InstallFailed {
            name,
            source: err.into(),
        }
        .into());
    }

    upsert_app(layout, &name, &app_dir)?;
    Ok(InstallOutcome { name, replaced })
}

fn materialize(input: &Path, app_dir: &Path) -> Result<()> {
    if input.is_dir() {
        return copy_dir_recursive(input, app_dir);
    }

    let file_name = usable_file_name(input)?;
    let (_, kind) = classify_file_name(file_name)?;
    fs::create_dir_all(app_dir)
        .with_context(|| format!("failed to create {}", app_dir.display()))?;
    match kind {
        FileKind::Executable => {
            fs::copy(input, app_dir.join(file_name)).with_context(|| {
                format!("failed to copy {} into {}", input.display(), app_dir.display())
            })?;
            Ok(())
        }
        FileKind::Archive(archive_type) => extract_archive(input, archive_type, app_dir),
    }
}

pub(crate) fn extract_archive(archive: &Path, kind: ArchiveType, dst: &Path) -> Result<()> {
    let file =
        File::open(archive).with_context(|| format!("failed to open {}", archive.display()))?;
    match kind {
        ArchiveType::Zip => {
            let mut zip = zip::ZipArchive::new(file)
                .with_context(|| format!("failed to read zip archive {}", archive.display()))?;
            zip.extract(dst)
                .with_context(|| format!("failed to extract {}", archive.display()))?;
        }
        ArchiveType::Tar => {
            tar::Archive::new(file)
                .unpack(dst)
                .with_context(|| format!("failed to extract {}", archive.display()))?;
        }
        ArchiveType::TarGz => {
            tar::Archive::new(GzDecoder::new(file))
                .unpack(dst)
                .with_context(|| format!("failed to extract {}", archive.display()))?;
        }
    }
    Ok(())
}

fn usable_file_name(path: &Path) -> Result<&str> {
    path.file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| {
            anyhow!(OppmError::invalid_input(format!(
                "cannot derive an application name from {}",
                path.display()
            )))
        })
}
