//! JSON file backend for the tracking list
//!
//! The list is a single indented JSON object keyed by tracking number,
//! rewritten in full on every save.

use crate::store::traits::{Storage, StoreResult};
use crate::store::{Entries, StatusSummary, StoreEntry, BLUE_DART, PENDING};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Tracking list stored as a JSON file
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn exists(&self) -> bool {
        self.path.exists()
    }
}

impl Storage for JsonFileStorage {
    fn load(&self) -> StoreResult<Option<Entries>> {
        match std::fs::read_to_string(&self.path) {
            Ok(content) => Ok(Some(serde_json::from_str(&content)?)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Writes to a sibling temp file, then renames it over the list
    fn save(&self, entries: &Entries) -> StoreResult<()> {
        let json = serde_json::to_string_pretty(entries)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }

        let tmp = self.path.with_extension("tmp");
        let mut file = std::fs::File::create(&tmp)?;
        file.write_all(json.as_bytes())?;
        file.flush()?;
        drop(file);

        std::fs::rename(&tmp, &self.path)?;
        tracing::debug!("Saved {} entries to {}", entries.len(), self.path.display());
        Ok(())
    }
}

/// Entry in the pre-v2 list, which only ever tracked Blue Dart
#[derive(Debug, Deserialize)]
struct LegacyEntry {
    #[serde(default)]
    status: Option<String>,

    #[serde(default)]
    last_checked: Option<String>,

    #[serde(default)]
    summary: Option<StatusSummary>,
}

/// Imports the legacy tracking list into `target`
///
/// Runs only when the legacy file exists and `target` does not. Every legacy
/// entry becomes a Blue Dart entry keeping its status, check time and
/// summary.
///
/// # Returns
///
/// * `Ok(Some(count))` - Number of migrated entries
/// * `Ok(None)` - Nothing to migrate
/// * `Err(StoreError)` - Legacy file unreadable or target unwritable
pub fn migrate_legacy(legacy_path: &Path, target: &JsonFileStorage) -> StoreResult<Option<usize>> {
    if target.exists() || !legacy_path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(legacy_path)?;
    let legacy: BTreeMap<String, LegacyEntry> = serde_json::from_str(&content)?;

    let entries: Entries = legacy
        .into_iter()
        .map(|(tracking_number, old)| {
            let entry = StoreEntry {
                courier: BLUE_DART.to_string(),
                status: old.status.unwrap_or_else(|| PENDING.to_string()),
                last_checked: old.last_checked,
                summary: old.summary,
            };
            (tracking_number, entry)
        })
        .collect();

    target.save(&entries)?;
    tracing::info!(
        "Migrated {} entries from {} to {}",
        entries.len(),
        legacy_path.display(),
        target.path().display()
    );

    Ok(Some(entries.len()))
}
