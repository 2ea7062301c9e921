use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use oppm_core::OppmError;
use serde::{Deserialize, Serialize};

use crate::layout::RootLayout;

pub const CONFIG_ENV_VAR: &str = "OPPM_CONFIG_FILE";
pub const DEFAULT_CONFIG_FILE_NAME: &str = ".oppmconfig";

/// On-disk shape: a single `[config]` section with four absolute paths,
/// always written with `/` separators.
#[derive(Debug, Serialize, Deserialize)]
struct ConfigFile {
    config: ConfigSection,
}

#[derive(Debug, Serialize, Deserialize)]
struct ConfigSection {
    root_dir: String,
    apps_dir: String,
    meta_file: String,
    shims_dir: String,
}

/// Persists the root configuration at one explicit location.
///
/// The location is resolved once by the entry point (`from_env`) and the
/// store is handed to everything that needs it; nothing reads the
/// environment at the point of use.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Honors `OPPM_CONFIG_FILE`, defaulting to a dotfile in the home
    /// directory.
    pub fn from_env() -> Result<Self> {
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            if !path.is_empty() {
                return Ok(Self::new(path));
            }
        }
        let home = if cfg!(windows) {
            std::env::var("USERPROFILE")
                .context("USERPROFILE is not set; cannot resolve the configuration path")?
        } else {
            std::env::var("HOME")
                .context("HOME is not set; cannot resolve the configuration path")?
        };
        Ok(Self::new(
            PathBuf::from(home).join(DEFAULT_CONFIG_FILE_NAME),
        ))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The layout is rebuilt from `root_dir`; the child paths in the file
    /// are required to be present but the children are derived, not trusted.
    pub fn load(&self) -> Result<RootLayout> {
        if !self.path.exists() {
            return Err(OppmError::ConfigMissing {
                path: self.path.clone(),
            }
            .into());
        }
        let raw = fs::read_to_string(&self.path).map_err(|err| OppmError::ConfigUnreadable {
            path: self.path.clone(),
            source: err.into(),
        })?;
        let file: ConfigFile = toml::from_str(&raw).map_err(|err| OppmError::ConfigUnreadable {
            path: self.path.clone(),
            source: err.into(),
        })?;
        Ok(RootLayout::new(PathBuf::from(file.config.root_dir)))
    }

    pub fn save(&self, layout: &RootLayout) -> Result<()> {
        let file = ConfigFile {
            config: ConfigSection {
                root_dir: path_to_slash(layout.root_dir()),
                apps_dir: path_to_slash(&layout.apps_dir()),
                meta_file: path_to_slash(&layout.meta_file()),
                shims_dir: path_to_slash(&layout.shims_dir()),
            },
        };
        let raw = toml::to_string_pretty(&file).map_err(|err| OppmError::ConfigWriteFailed {
            path: self.path.clone(),
            source: err.into(),
        })?;
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|err| OppmError::ConfigWriteFailed {
                path: self.path.clone(),
                source: err.into(),
            })?;
        }
        fs::write(&self.path, raw).map_err(|err| OppmError::ConfigWriteFailed {
            path: self.path.clone(),
            source: err.into(),
        })?;
        Ok(())
    }
}

fn path_to_slash(path: &Path) -> String {
    let rendered = path.display().to_string();
    if cfg!(windows) {
        rendered.replace('\\', "/")
    } else {
        rendered
    }
}
