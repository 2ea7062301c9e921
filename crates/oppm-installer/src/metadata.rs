use std::fs;
use std::path::Path;

use anyhow::Result;
use oppm_core::{Metadata, OppmError};

use crate::layout::RootLayout;

pub fn load_metadata(layout: &RootLayout) -> Result<Metadata> {
    let path = layout.meta_file();
    if !path.exists() {
        return Err(OppmError::MetadataUnreadable {
            path,
            source: "metadata file does not exist".into(),
        }
        .into());
    }
    let raw = fs::read_to_string(&path).map_err(|err| OppmError::MetadataUnreadable {
        path: path.clone(),
        source: err.into(),
    })?;
    let meta = Metadata::from_json_str(&raw).map_err(|err| OppmError::MetadataUnreadable {
        path: path.clone(),
        source: err.into(),
    })?;
    Ok(meta)
}

pub fn save_metadata(layout: &RootLayout, meta: &Metadata) -> Result<()> {
    let path = layout.meta_file();
    let raw = meta
        .to_json_string()
        .map_err(|err| OppmError::MetadataWriteFailed {
            path: path.clone(),
            source: err.into(),
        })?;
    let write = || -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        // Write-to-temp-then-rename keeps the previous file readable if we
        // die mid-write.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, raw.as_bytes())?;
        fs::rename(&tmp, &path)?;
        Ok(())
    };
    write().map_err(|err| OppmError::MetadataWriteFailed {
        path: path.clone(),
        source: err.into(),
    })?;
    Ok(())
}

/// Records an application at its real location; replaces any same-named
/// entry. Idempotent.
pub fn upsert_app(layout: &RootLayout, name: &str, app_dir: &Path) -> Result<()> {
    let relative = relative_path_string(layout, app_dir)?;
    let mut meta = load_metadata(layout)?;
    meta.upsert(name, &relative);
    save_metadata(layout, &meta)
}

/// Drops the named entry; saves only when something changed.
pub fn remove_app_entry(layout: &RootLayout, name: &str) -> Result<bool> {
    let mut meta = load_metadata(layout)?;
    if !meta.remove(name) {
        return Ok(false);
    }
    save_metadata(layout, &meta)?;
    Ok(true)
}

/// Root-relative path in `/`-separated form, as stored in the metadata.
pub(crate) fn relative_path_string(layout: &RootLayout, app_dir: &Path) -> Result<String> {
    let relative = app_dir.strip_prefix(layout.root_dir()).map_err(|_| {
        OppmError::invalid_input(format!(
            "application directory must be under the root directory: {}",
            app_dir.display()
        ))
    })?;
    Ok(relative
        .components()
        .map(|component| component.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/"))
}
