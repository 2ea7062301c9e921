use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use oppm_core::OppmError;

use crate::config::ConfigStore;
use crate::fs_utils::dir_is_empty;
use crate::layout::RootLayout;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MigrateOutcome {
    /// Source and destination resolve to the same location; nothing to do.
    SameLocation,
    Moved(RootLayout),
}

/// Relocates the entire root in one rename and re-homes the configuration.
///
/// Metadata and shim targets are stored relative to the root, so nothing
/// inside the tree needs rewriting.
pub fn migrate_root(
    store: &ConfigStore,
    old_root: &Path,
    new_root: &Path,
) -> Result<MigrateOutcome> {
    if !old_root.exists() {
        return Err(OppmError::MigrationSourceMissing {
            path: old_root.to_path_buf(),
        }
        .into());
    }
    let old_resolved = old_root
        .canonicalize()
        .with_context(|| format!("failed to resolve {}", old_root.display()))?;

    if new_root.exists() {
        if !new_root.is_dir() {
            return Err(OppmError::MigrationTargetNotEmpty {
                path: new_root.to_path_buf(),
            }
            .into());
        }
        let new_resolved = new_root
            .canonicalize()
            .with_context(|| format!("failed to resolve {}", new_root.display()))?;
        if new_resolved == old_resolved {
            return Ok(MigrateOutcome::SameLocation);
        }
        if !dir_is_empty(new_root)
            .with_context(|| format!("failed to read {}", new_root.display()))?
        {
            return Err(OppmError::MigrationTargetNotEmpty {
                path: new_root.to_path_buf(),
            }
            .into());
        }
        fs::remove_dir(new_root)
            .with_context(|| format!("failed to remove {}", new_root.display()))?;
    } else if let Some(parent) = new_root.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
    }

    fs::rename(old_root, new_root).map_err(|err| OppmError::MigrationMoveFailed {
        from: old_root.to_path_buf(),
        to: new_root.to_path_buf(),
        source: err.into(),
    })?;

    let layout = RootLayout::new(new_root);
    store.save(&layout)?;
    Ok(MigrateOutcome::Moved(layout))
}
