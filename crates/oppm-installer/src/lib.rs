mod backup;
mod config;
mod doctor;
mod fs_utils;
mod install;
mod layout;
mod metadata;
mod migrate;
mod shims;
mod uninstall;

pub use backup::{pack_root, rebuild_root, DEFAULT_BACKUP_DIR_NAME};
pub use config::{ConfigStore, CONFIG_ENV_VAR, DEFAULT_CONFIG_FILE_NAME};
pub use doctor::{audit, repair, sync_from_disk, HealthReport, RepairSummary, SyncReport};
pub use install::{derive_app_name, install_app, InstallOutcome};
pub use layout::{default_root, RootLayout, APPS_DIR_NAME, META_FILE_NAME, SHIMS_DIR_NAME};
pub use metadata::{load_metadata, remove_app_entry, save_metadata, upsert_app};
pub use migrate::{migrate_root, MigrateOutcome};
pub use shims::{create_shim, delete_shim, list_shims, remove_shims_for_app};
pub use uninstall::{clean_apps, remove_app, CleanSummary, RemovalReport};

#[cfg(test)]
mod tests;
