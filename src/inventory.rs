//! Repository inventory loading.
//!
//! The inventory is produced by whatever lists an organisation's
//! repositories and pulls `require.php` out of each `composer.json`. It is a
//! JSON or YAML list of [`RepositoryRecord`]s; YAML is picked for `.yaml`
//! and `.yml` files, JSON for everything else.

use crate::error::{Result, ResultExt};
use crate::types::RepositoryRecord;
use std::path::Path;

/// Inventory file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InventoryFormat {
    /// JSON array of records
    Json,
    /// YAML sequence of records
    Yaml,
}

impl InventoryFormat {
    /// Pick the format from a file extension.
    #[must_use]
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
                Self::Yaml
            }
            _ => Self::Json,
        }
    }
}

/// Read and decode an inventory file.
///
/// # Errors
///
/// Returns `FileNotFound`/`Io` if the file cannot be read and
/// `InventoryParse` if it cannot be decoded.
pub fn load_inventory(path: &Path) -> Result<Vec<RepositoryRecord>> {
    tracing::debug!(path = %path.display(), "Loading repository inventory");
    let content = std::fs::read_to_string(path).with_path(path)?;
    let records = parse_inventory(&content, InventoryFormat::from_path(path)).map_err(|e| {
        crate::err!(InventoryParse {
            path: path.to_path_buf(),
            message: e,
        })
    })?;
    tracing::info!(path = %path.display(), repositories = records.len(), "Inventory loaded");
    Ok(records)
}

/// Decode inventory content in the given format.
///
/// # Errors
///
/// Returns the decoder's message when the content is not a list of records.
pub fn parse_inventory(
    content: &str,
    format: InventoryFormat,
) -> std::result::Result<Vec<RepositoryRecord>, String> {
    match format {
        InventoryFormat::Json => serde_json::from_str(content).map_err(|e| e.to_string()),
        InventoryFormat::Yaml => serde_yaml::from_str(content).map_err(|e| e.to_string()),
    }
}
