use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use oppm_core::OppmError;

use crate::fs_utils::{is_within, relative_from};
use crate::layout::RootLayout;

#[cfg(unix)]
fn symlink_file(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::unix::fs::symlink(target, link)
}

#[cfg(windows)]
fn symlink_file(target: &Path, link: &Path) -> std::io::Result<()> {
    std::os::windows::fs::symlink_file(target, link)
}

/// Creates a shim for an executable that already lives in the applications
/// directory.
///
/// The link target is stored relative to the shims directory so the whole
/// root can relocate without rewriting any link. An occupied name is always
/// rejected, even when the occupant is a dangling link.
pub fn create_shim(layout: &RootLayout, executable: &Path, shim_name: &str) -> Result<()> {
    let shims_dir = layout.shims_dir();
    fs::create_dir_all(&shims_dir)
        .with_context(|| format!("failed to create {}", shims_dir.display()))?;
    let shim_path = shims_dir.join(shim_name);
    if shim_path.symlink_metadata().is_ok() {
        return Err(OppmError::ShimExists {
            name: shim_name.to_string(),
            path: shim_path,
        }
        .into());
    }

    if !executable.is_file() {
        return Err(OppmError::invalid_input(format!(
            "executable does not exist: {}",
            executable.display()
        ))
        .into());
    }
    let resolved_target =
        executable
            .canonicalize()
            .map_err(|err| OppmError::ShimCreationFailed {
                name: shim_name.to_string(),
                source: err.into(),
            })?;
    let apps_dir = layout.apps_dir();
    let apps_dir_resolved = apps_dir.canonicalize().map_err(|_| {
        OppmError::invalid_input(format!(
            "applications directory not found: {}",
            apps_dir.display()
        ))
    })?;
    if !is_within(&resolved_target, &apps_dir_resolved) {
        return Err(OppmError::invalid_input(format!(
            "{} is outside the applications directory; install the application with `oppm install` first",
            executable.display()
        ))
        .into());
    }
    let resolved_dir = shims_dir
        .canonicalize()
        .map_err(|err| OppmError::ShimCreationFailed {
            name: shim_name.to_string(),
            source: err.into(),
        })?;
    let relative_target = relative_from(&resolved_dir, &resolved_target);
    symlink_file(&relative_target, &shim_path).map_err(|err| OppmError::ShimCreationFailed {
        name: shim_name.to_string(),
        source: err.into(),
    })?;
    Ok(())
}

/// All resolvable shims as `(name, resolved target)`, sorted by name.
/// Broken links and non-links are skipped; the health check reports those.
pub fn list_shims(layout: &RootLayout) -> Result<Vec<(String, PathBuf)>> {
    let shims_dir = layout.shims_dir();
    if !shims_dir.exists() {
        return Ok(Vec::new());
    }
    let mut shims = Vec::new();
    for entry in
        fs::read_dir(&shims_dir).with_context(|| format!("failed to read {}", shims_dir.display()))?
    {
        let entry = entry?;
        let path = entry.path();
        let Ok(metadata) = path.symlink_metadata() else {
            continue;
        };
        if !metadata.file_type().is_symlink() {
            continue;
        }
        let Ok(target) = path.canonicalize() else {
            continue;
        };
        shims.push((entry.file_name().to_string_lossy().into_owned(), target));
    }
    shims.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(shims)
}

/// Cascade deletion: removes every shim whose resolved target lies inside
/// `app_dir`. Links that fail to resolve are left untouched. Returns the
/// removed names.
pub fn remove_shims_for_app(layout: &RootLayout, app_dir: &Path) -> Result<Vec<String>> {
    let shims_dir = layout.shims_dir();
    if !shims_dir.exists() {
        return Ok(Vec::new());
    }
    let Ok(app_dir_resolved) = app_dir.canonicalize() else {
        // The app directory is gone; nothing can resolve inside it.
        return Ok(Vec::new());
    };
    let mut removed = Vec::new();
    for entry in
        fs::read_dir(&shims_dir).with_context(|| format!("failed to read {}", shims_dir.display()))?
    {
        let entry = entry?;
        let path = entry.path();
        let Ok(metadata) = path.symlink_metadata() else {
            continue;
        };
        if !metadata.file_type().is_symlink() {
            continue;
        }
        let Ok(target) = path.canonicalize() else {
            continue;
        };
        if is_within(&target, &app_dir_resolved) {
            fs::remove_file(&path)
                .with_context(|| format!("failed to remove shim {}", path.display()))?;
            removed.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    removed.sort();
    Ok(removed)
}

/// Explicit single-shim removal (`exe delete`).
pub fn delete_shim(layout: &RootLayout, shim_name: &str) -> Result<()> {
    let shim_path = layout.shims_dir().join(shim_name);
    let Ok(metadata) = shim_path.symlink_metadata() else {
        return Err(OppmError::ShimNotFound {
            name: shim_name.to_string(),
        }
        .into());
    };
    if !metadata.file_type().is_symlink() {
        return Err(OppmError::invalid_input(format!(
            "'{shim_name}' is not a shim (not a symbolic link)"
        ))
        .into());
    }
    fs::remove_file(&shim_path)
        .with_context(|| format!("failed to remove shim {}", shim_path.display()))?;
    Ok(())
}
