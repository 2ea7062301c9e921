use std::path::PathBuf;

use thiserror::Error;

/// Boxed underlying cause, kept so the original I/O error stays on the chain.
pub type ErrorSource = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Every failure the tool reports, one variant per condition.
///
/// Operations either complete with the metadata, the applications directory,
/// and the shims directory mutually consistent, or surface exactly one of
/// these after performing whatever local rollback they can.
#[derive(Debug, Error)]
pub enum OppmError {
    #[error("configuration file does not exist: {}; run `oppm init` first", path.display())]
    ConfigMissing { path: PathBuf },

    #[error("failed to load configuration from {}; you may need to run `oppm init` again", path.display())]
    ConfigUnreadable {
        path: PathBuf,
        #[source]
        source: ErrorSource,
    },

    #[error("failed to save configuration to {}", path.display())]
    ConfigWriteFailed {
        path: PathBuf,
        #[source]
        source: ErrorSource,
    },

    #[error("failed to read or parse metadata file: {}", path.display())]
    MetadataUnreadable {
        path: PathBuf,
        #[source]
        source: ErrorSource,
    },

    #[error("failed to write metadata file: {}", path.display())]
    MetadataWriteFailed {
        path: PathBuf,
        #[source]
        source: ErrorSource,
    },

    #[error("{message}")]
    InvalidInput { message: String },

    #[error("unsupported input type '{extension}'; supported types: {supported}")]
    UnsupportedInputType {
        extension: String,
        supported: String,
    },

    #[error("application '{name}' not found in metadata; run `oppm update` to resync it first")]
    AppNotFound { name: String },

    #[error("failed to install '{name}'")]
    InstallFailed {
        name: String,
        #[source]
        source: ErrorSource,
    },

    #[error("shim '{name}' already exists at {}", path.display())]
    ShimExists { name: String, path: PathBuf },

    #[error(
        "failed to create shim '{name}'; on Windows you may need to run as \
         Administrator or enable Developer Mode"
    )]
    ShimCreationFailed {
        name: String,
        #[source]
        source: ErrorSource,
    },

    #[error("shim not found: {name}")]
    ShimNotFound { name: String },

    #[error("source root directory does not exist: {}", path.display())]
    MigrationSourceMissing { path: PathBuf },

    #[error("target directory {} exists and is not empty; remove it first", path.display())]
    MigrationTargetNotEmpty { path: PathBuf },

    #[error("failed to move {} to {}", from.display(), to.display())]
    MigrationMoveFailed {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: ErrorSource,
    },

    #[error("output file already exists: {}; use `--overwrite` to replace it", path.display())]
    PackOutputExists { path: PathBuf },

    #[error("failed to create archive: {}", path.display())]
    PackFailed {
        path: PathBuf,
        #[source]
        source: ErrorSource,
    },

    #[error("archive not found: {}", path.display())]
    ArchiveNotFound { path: PathBuf },

    #[error("unsupported archive format: {}; must be a .tar.gz archive", path.display())]
    UnsupportedArchiveFormat { path: PathBuf },

    #[error("archive is invalid: it must contain a single top-level directory")]
    InvalidArchiveStructure,

    #[error("failed to rebuild from archive: {}", archive.display())]
    RebuildFailed {
        archive: PathBuf,
        #[source]
        source: ErrorSource,
    },
}

impl OppmError {
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }
}
