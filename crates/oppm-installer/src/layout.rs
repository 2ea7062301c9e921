use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub const APPS_DIR_NAME: &str = "apps";
pub const META_FILE_NAME: &str = "meta.json";
pub const SHIMS_DIR_NAME: &str = "shims";

/// The four paths that define an installation root.
///
/// Only the root itself is stored; the applications directory, metadata file,
/// and shims directory are always its direct children, so the invariant holds
/// by construction and a relocated root needs nothing rewritten.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RootLayout {
    root: PathBuf,
}

impl RootLayout {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root_dir(&self) -> &Path {
        &self.root
    }

    pub fn apps_dir(&self) -> PathBuf {
        self.root.join(APPS_DIR_NAME)
    }

    pub fn meta_file(&self) -> PathBuf {
        self.root.join(META_FILE_NAME)
    }

    pub fn shims_dir(&self) -> PathBuf {
        self.root.join(SHIMS_DIR_NAME)
    }

    pub fn app_dir(&self, name: &str) -> PathBuf {
        self.apps_dir().join(name)
    }

    pub fn ensure_base_dirs(&self) -> Result<()> {
        for dir in [self.root.clone(), self.apps_dir(), self.shims_dir()] {
            fs::create_dir_all(&dir)
                .with_context(|| format!("failed to create {}", dir.display()))?;
        }
        Ok(())
    }
}

/// Default installation root: `~/.oppm` (`%LOCALAPPDATA%\oppm` on Windows).
pub fn default_root() -> Result<PathBuf> {
    if cfg!(windows) {
        let app_data = std::env::var("LOCALAPPDATA")
            .context("LOCALAPPDATA is not set; cannot resolve the default root")?;
        return Ok(PathBuf::from(app_data).join("oppm"));
    }

    let home = std::env::var("HOME").context("HOME is not set; cannot resolve the default root")?;
    Ok(PathBuf::from(home).join(".oppm"))
}
