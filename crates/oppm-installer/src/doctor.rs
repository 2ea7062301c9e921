use std::collections::BTreeSet;
use std::fs;

use anyhow::{Context, Result};
use oppm_core::OppmError;

use crate::fs_utils::{dir_is_empty, is_within};
use crate::layout::RootLayout;
use crate::metadata::{load_metadata, relative_path_string, save_metadata};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub added: Vec<String>,
    pub removed: Vec<String>,
}

impl SyncReport {
    pub fn is_noop(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Name-level reconciliation between the applications directory and the
/// metadata: directories without an entry are recorded at their real
/// relative path, entries without a directory are dropped.
pub fn sync_from_disk(layout: &RootLayout) -> Result<SyncReport> {
    let apps_dir = layout.apps_dir();
    if !apps_dir.exists() {
        return Err(OppmError::invalid_input(format!(
            "applications directory does not exist: {}",
            apps_dir.display()
        ))
        .into());
    }
    let mut meta = load_metadata(layout)?;

    let disk_names = app_dir_names(layout)?;
    let meta_names = meta.names();
    let added: Vec<String> = disk_names.difference(&meta_names).cloned().collect();
    let removed: Vec<String> = meta_names.difference(&disk_names).cloned().collect();
    if added.is_empty() && removed.is_empty() {
        return Ok(SyncReport::default());
    }

    for name in &added {
        let relative = relative_path_string(layout, &apps_dir.join(name))?;
        meta.upsert(name, &relative);
    }
    meta.apps.retain(|app| !removed.contains(&app.name));
    save_metadata(layout, &meta)?;
    Ok(SyncReport { added, removed })
}

/// One audit over the four divergence categories. Every category is always
/// present in the report; an empty list is a passing category.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HealthReport {
    /// Entries whose resolved path is missing or not a directory.
    pub invalid_apps: Vec<String>,
    /// Entries whose directory exists but holds nothing.
    pub empty_apps: Vec<String>,
    pub orphaned_dirs: Vec<String>,
    pub stray_files: Vec<String>,
    pub broken_shims: Vec<String>,
    pub external_shims: Vec<String>,
    pub non_symlink_shims: Vec<String>,
}

impl HealthReport {
    pub fn issue_count(&self) -> usize {
        self.invalid_apps.len()
            + self.empty_apps.len()
            + self.orphaned_dirs.len()
            + self.stray_files.len()
            + self.broken_shims.len()
            + self.external_shims.len()
            + self.non_symlink_shims.len()
    }

    pub fn is_clean(&self) -> bool {
        self.issue_count() == 0
    }
}

/// Read-only audit of metadata entries, the applications directory, and the
/// shims directory.
pub fn audit(layout: &RootLayout) -> Result<HealthReport> {
    ensure_stores_exist(layout)?;
    let meta = load_metadata(layout)?;
    let mut report = HealthReport::default();

    for app in &meta.apps {
        let abs = layout.root_dir().join(&app.relative_path);
        if !abs.exists() || !abs.is_dir() {
            report.invalid_apps.push(app.name.clone());
            continue;
        }
        if dir_is_empty(&abs).with_context(|| format!("failed to read {}", abs.display()))? {
            report.empty_apps.push(app.name.clone());
        }
    }

    let apps_dir = layout.apps_dir();
    let meta_names = meta.names();
    for entry in
        fs::read_dir(&apps_dir).with_context(|| format!("failed to read {}", apps_dir.display()))?
    {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if entry.file_type()?.is_dir() {
            if !meta_names.contains(&name) {
                report.orphaned_dirs.push(name);
            }
        } else {
            report.stray_files.push(name);
        }
    }
    report.orphaned_dirs.sort();
    report.stray_files.sort();

    let shims_dir = layout.shims_dir();
    let apps_dir_resolved = apps_dir
        .canonicalize()
        .with_context(|| format!("failed to resolve {}", apps_dir.display()))?;
    for entry in
        fs::read_dir(&shims_dir).with_context(|| format!("failed to read {}", shims_dir.display()))?
    {
        let entry = entry?;
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().into_owned();
        let metadata = path
            .symlink_metadata()
            .with_context(|| format!("failed to stat {}", path.display()))?;
        if !metadata.file_type().is_symlink() {
            report.non_symlink_shims.push(name);
            continue;
        }
        match path.canonicalize() {
            Ok(target) => {
                if !is_within(&target, &apps_dir_resolved) {
                    report.external_shims.push(name);
                }
            }
            Err(_) => report.broken_shims.push(name),
        }
    }
    report.broken_shims.sort();
    report.external_shims.sort();
    report.non_symlink_shims.sort();

    Ok(report)
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RepairSummary {
    pub entries_pruned: usize,
    pub empty_dirs_removed: usize,
    pub orphans_adopted: usize,
    pub strays_removed: usize,
    pub shims_removed: usize,
}

impl RepairSummary {
    pub fn total(&self) -> usize {
        self.entries_pruned
            + self.empty_dirs_removed
            + self.orphans_adopted
            + self.strays_removed
            + self.shims_removed
    }
}

/// Fix pass. Ordering matters: entry pruning runs first and the orphan scan
/// reads the post-prune state, since pruning changes what counts as
/// orphaned. Empty directories are deleted rather than adopted, which is
/// what makes a second repair a no-op.
pub fn repair(layout: &RootLayout) -> Result<RepairSummary> {
    ensure_stores_exist(layout)?;
    let mut summary = RepairSummary::default();
    let mut meta = load_metadata(layout)?;

    let mut pruned: Vec<String> = Vec::new();
    for app in &meta.apps {
        let abs = layout.root_dir().join(&app.relative_path);
        if !abs.exists() || !abs.is_dir() {
            pruned.push(app.name.clone());
            continue;
        }
        if dir_is_empty(&abs).with_context(|| format!("failed to read {}", abs.display()))? {
            fs::remove_dir(&abs)
                .with_context(|| format!("failed to remove {}", abs.display()))?;
            summary.empty_dirs_removed += 1;
            pruned.push(app.name.clone());
        }
    }
    if !pruned.is_empty() {
        meta.apps.retain(|app| !pruned.contains(&app.name));
        summary.entries_pruned = pruned.len();
    }

    let apps_dir = layout.apps_dir();
    let meta_names = meta.names();
    for entry in
        fs::read_dir(&apps_dir).with_context(|| format!("failed to read {}", apps_dir.display()))?
    {
        let entry = entry?;
        let path = entry.path();
        let name = entry.file_name().to_string_lossy().into_owned();
        if entry.file_type()?.is_dir() {
            if meta_names.contains(&name) {
                continue;
            }
            if dir_is_empty(&path).with_context(|| format!("failed to read {}", path.display()))? {
                fs::remove_dir(&path)
                    .with_context(|| format!("failed to remove {}", path.display()))?;
                summary.empty_dirs_removed += 1;
            } else {
                let relative = relative_path_string(layout, &path)?;
                meta.upsert(&name, &relative);
                summary.orphans_adopted += 1;
            }
        } else {
            fs::remove_file(&path)
                .with_context(|| format!("failed to remove {}", path.display()))?;
            summary.strays_removed += 1;
        }
    }

    let shims_dir = layout.shims_dir();
    let apps_dir_resolved = apps_dir
        .canonicalize()
        .with_context(|| format!("failed to resolve {}", apps_dir.display()))?;
    for entry in
        fs::read_dir(&shims_dir).with_context(|| format!("failed to read {}", shims_dir.display()))?
    {
        let entry = entry?;
        let path = entry.path();
        let metadata = path
            .symlink_metadata()
            .with_context(|| format!("failed to stat {}", path.display()))?;
        if !metadata.file_type().is_symlink() {
            if metadata.is_dir() {
                fs::remove_dir_all(&path)
                    .with_context(|| format!("failed to remove {}", path.display()))?;
            } else {
                fs::remove_file(&path)
                    .with_context(|| format!("failed to remove {}", path.display()))?;
            }
            summary.shims_removed += 1;
            continue;
        }
        let keep = match path.canonicalize() {
            Ok(target) => is_within(&target, &apps_dir_resolved),
            Err(_) => false,
        };
        if !keep {
            fs::remove_file(&path)
                .with_context(|| format!("failed to remove shim {}", path.display()))?;
            summary.shims_removed += 1;
        }
    }

    if summary.entries_pruned > 0 || summary.orphans_adopted > 0 {
        save_metadata(layout, &meta)?;
    }
    Ok(summary)
}

fn ensure_stores_exist(layout: &RootLayout) -> Result<()> {
    let meta_file = layout.meta_file();
    if !meta_file.exists() {
        return Err(OppmError::MetadataUnreadable {
            path: meta_file,
            source: "metadata file does not exist".into(),
        }
        .into());
    }
    let apps_dir = layout.apps_dir();
    if !apps_dir.exists() {
        return Err(OppmError::invalid_input(format!(
            "applications directory not found: {}",
            apps_dir.display()
        ))
        .into());
    }
    let shims_dir = layout.shims_dir();
    if !shims_dir.exists() {
        return Err(OppmError::invalid_input(format!(
            "shims directory not found: {}",
            shims_dir.display()
        ))
        .into());
    }
    Ok(())
}

fn app_dir_names(layout: &RootLayout) -> Result<BTreeSet<String>> {
    let apps_dir = layout.apps_dir();
    let mut names = BTreeSet::new();
    for entry in
        fs::read_dir(&apps_dir).with_context(|| format!("failed to read {}", apps_dir.display()))?
    {
        let entry = entry?;
        if entry.file_type()?.is_dir() {
            names.insert(entry.file_name().to_string_lossy().into_owned());
        }
    }
    Ok(names)
}
