use std::fs;

use anyhow::{Context, Result};
use oppm_core::{Metadata, OppmError};

use crate::layout::RootLayout;
use crate::metadata::{remove_app_entry, save_metadata};
use crate::shims::remove_shims_for_app;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemovalReport {
    pub name: String,
    pub removed_shims: Vec<String>,
    /// The directory was already gone (manual deletion); a warning, not a
    /// failure.
    pub dir_missing: bool,
}

/// Removes an application: metadata entry, cascaded shims, then the
/// directory itself.
pub fn remove_app(layout: &RootLayout, name: &str) -> Result<RemovalReport> {
    if !remove_app_entry(layout, name)? {
        return Err(OppmError::AppNotFound {
            name: name.to_string(),
        }
        .into());
    }

    let app_dir = layout.app_dir(name);
    let removed_shims = remove_shims_for_app(layout, &app_dir)?;
    let dir_missing = !app_dir.exists();
    if !dir_missing {
        fs::remove_dir_all(&app_dir)
            .with_context(|| format!("failed to remove {}", app_dir.display()))?;
    }
    Ok(RemovalReport {
        name: name.to_string(),
        removed_shims,
        dir_missing,
    })
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanSummary {
    pub removed_apps: Vec<String>,
    pub removed_shims: Vec<String>,
}

/// Empties the applications directory, drops every shim link, and resets the
/// metadata.
pub fn clean_apps(layout: &RootLayout) -> Result<CleanSummary> {
    let mut summary = CleanSummary::default();

    let apps_dir = layout.apps_dir();
    if apps_dir.exists() {
        for entry in fs::read_dir(&apps_dir)
            .with_context(|| format!("failed to read {}", apps_dir.display()))?
        {
            let entry = entry?;
            let path = entry.path();
            if entry.file_type()?.is_dir() {
                fs::remove_dir_all(&path)
                    .with_context(|| format!("failed to remove {}", path.display()))?;
            } else {
                fs::remove_file(&path)
                    .with_context(|| format!("failed to remove {}", path.display()))?;
            }
            summary
                .removed_apps
                .push(entry.file_name().to_string_lossy().into_owned());
        }
    }

    let shims_dir = layout.shims_dir();
    if shims_dir.exists() {
        for entry in fs::read_dir(&shims_dir)
            .with_context(|| format!("failed to read {}", shims_dir.display()))?
        {
            let entry = entry?;
            let path = entry.path();
            if path
                .symlink_metadata()
                .map(|meta| meta.file_type().is_symlink())
                .unwrap_or(false)
            {
                fs::remove_file(&path)
                    .with_context(|| format!("failed to remove shim {}", path.display()))?;
                summary
                    .removed_shims
                    .push(entry.file_name().to_string_lossy().into_owned());
            }
        }
    }

    save_metadata(layout, &Metadata::empty())?;
    summary.removed_apps.sort();
    summary.removed_shims.sort();
    Ok(summary)
}
