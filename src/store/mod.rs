//! Local tracking list
//!
//! This module handles the persisted watch-list of tracking numbers:
//! - Adding and deleting entries
//! - Listing the stored snapshot as-is
//! - Whole-file JSON persistence and legacy list migration
//!
//! The list is curated by hand. Entry status only changes when a lookup is
//! explicitly applied (see [`crate::refresh`]).

mod json;
mod traits;

pub use json::{migrate_legacy, JsonFileStorage};
pub use traits::{Storage, StoreError, StoreResult};

use crate::config::StoreConfig;
use crate::record::TrackingRecord;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Status given to newly added entries
pub const PENDING: &str = "Pending";

/// Status of entries whose last lookup reported delivery
pub const DELIVERED: &str = "Delivered";

/// Courier assumed for entries that do not name one
pub const BLUE_DART: &str = "Blue Dart";

/// Stored entries keyed by tracking number
pub type Entries = BTreeMap<String, StoreEntry>;

fn default_courier() -> String {
    BLUE_DART.to_string()
}

fn default_status() -> String {
    PENDING.to_string()
}

// Older lists wrote `null` where a lookup had no value
fn null_as_empty<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn null_as_default_courier<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(default_courier))
}

fn null_as_default_status<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_else(default_status))
}

/// Snapshot of the last successful lookup
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSummary {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub status: String,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub recipient: String,
}

/// One tracked shipment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreEntry {
    #[serde(default = "default_courier", deserialize_with = "null_as_default_courier")]
    pub courier: String,

    /// Coarse status: `"Pending"` or `"Delivered"`
    #[serde(default = "default_status", deserialize_with = "null_as_default_status")]
    pub status: String,

    /// When the entry was last refreshed (RFC 3339)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_checked: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<StatusSummary>,
}

impl StoreEntry {
    /// Creates a freshly added entry
    pub fn pending(courier: impl Into<String>) -> Self {
        Self {
            courier: courier.into(),
            status: PENDING.to_string(),
            last_checked: None,
            summary: None,
        }
    }

    /// Returns true if the entry is recorded as delivered
    pub fn is_delivered(&self) -> bool {
        self.status == DELIVERED
    }
}

/// Outcome of [`TrackingStore::add`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    AlreadyExists,
}

/// Outcome of [`TrackingStore::delete`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    NotFound,
}

/// In-memory tracking list backed by a [`Storage`]
///
/// The list is read once when the store is created and written back in full
/// after each mutation.
pub struct TrackingStore<S: Storage = JsonFileStorage> {
    storage: S,
    entries: Entries,
}

impl TrackingStore<JsonFileStorage> {
    /// Opens the JSON tracking list described by the configuration
    ///
    /// Migrates the legacy list first when needed. Migration failures are
    /// logged and otherwise ignored.
    pub fn open(config: &StoreConfig) -> Self {
        let storage = JsonFileStorage::new(&config.path);

        if let Err(e) = migrate_legacy(Path::new(&config.legacy_path), &storage) {
            tracing::warn!(
                "Could not migrate legacy list {}: {}",
                config.legacy_path,
                e
            );
        }

        Self::load(storage)
    }
}

impl<S: Storage> TrackingStore<S> {
    /// Loads the list from `storage`
    ///
    /// A missing list is empty. An unreadable list is logged and treated as
    /// empty; the next mutation overwrites it.
    pub fn load(storage: S) -> Self {
        let entries = match storage.load() {
            Ok(Some(entries)) => entries,
            Ok(None) => Entries::new(),
            Err(e) => {
                tracing::warn!("Ignoring unreadable tracking list: {}", e);
                Entries::new()
            }
        };

        Self { storage, entries }
    }

    /// Adds a tracking number with status `"Pending"`
    ///
    /// An existing entry is left untouched and nothing is written.
    pub fn add(&mut self, tracking_number: &str, courier: &str) -> StoreResult<AddOutcome> {
        if self.entries.contains_key(tracking_number) {
            return Ok(AddOutcome::AlreadyExists);
        }

        self.entries
            .insert(tracking_number.to_string(), StoreEntry::pending(courier));
        self.save()?;

        tracing::info!("Added {} ({})", tracking_number, courier);
        Ok(AddOutcome::Added)
    }

    /// Removes a tracking number
    ///
    /// A missing entry is reported as [`DeleteOutcome::NotFound`], not an
    /// error, and nothing is written.
    pub fn delete(&mut self, tracking_number: &str) -> StoreResult<DeleteOutcome> {
        if self.entries.remove(tracking_number).is_none() {
            return Ok(DeleteOutcome::NotFound);
        }

        self.save()?;

        tracing::info!("Deleted {}", tracking_number);
        Ok(DeleteOutcome::Deleted)
    }

    /// Returns the stored list as-is
    pub fn list(&self) -> &Entries {
        &self.entries
    }

    pub fn get(&self, tracking_number: &str) -> Option<&StoreEntry> {
        self.entries.get(tracking_number)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Records a successful lookup on an existing entry
    ///
    /// Sets the coarse status from the live status, the check time and the
    /// summary. Failed lookups and unknown tracking numbers are ignored.
    ///
    /// # Returns
    ///
    /// `true` if the entry was updated. The change is not persisted until
    /// [`TrackingStore::save`] is called.
    pub fn apply_lookup(
        &mut self,
        tracking_number: &str,
        record: &TrackingRecord,
        checked_at: DateTime<Utc>,
    ) -> bool {
        if record.is_error() {
            return false;
        }

        let Some(entry) = self.entries.get_mut(tracking_number) else {
            return false;
        };

        entry.status = if record.is_delivered() {
            DELIVERED.to_string()
        } else {
            PENDING.to_string()
        };
        entry.last_checked = Some(checked_at.to_rfc3339_opts(SecondsFormat::Secs, true));
        entry.summary = Some(StatusSummary {
            status: record.status.clone(),
            recipient: record.recipient().to_string(),
        });

        true
    }

    /// Writes the full list to storage
    pub fn save(&self) -> StoreResult<()> {
        self.storage.save(&self.entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn temp_store(dir: &TempDir) -> TrackingStore {
        TrackingStore::load(JsonFileStorage::new(dir.path().join("tracking_list_v2.json")))
    }

    #[test]
    fn test_add_then_list() {
        let dir = TempDir::new().unwrap();
        let mut store = temp_store(&dir);

        assert_eq!(store.add("AWB123", "DTDC").unwrap(), AddOutcome::Added);

        let listed = serde_json::to_value(store.list()).unwrap();
        assert_eq!(
            listed,
            serde_json::json!({"AWB123": {"courier": "DTDC", "status": "Pending"}})
        );
    }

    #[test]
    fn test_duplicate_add_leaves_store_unchanged() {
        let dir = TempDir::new().unwrap();
        let mut store = temp_store(&dir);
        store.add("AWB123", "DTDC").unwrap();

        assert_eq!(
            store.add("AWB123", "Delhivery").unwrap(),
            AddOutcome::AlreadyExists
        );
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("AWB123").unwrap().courier, "DTDC");

        let reopened = temp_store(&dir);
        assert_eq!(reopened.get("AWB123").unwrap().courier, "DTDC");
    }

    #[test]
    fn test_delete_twice() {
        let dir = TempDir::new().unwrap();
        let mut store = temp_store(&dir);
        store.add("AWB123", "DTDC").unwrap();

        assert_eq!(store.delete("AWB123").unwrap(), DeleteOutcome::Deleted);
        assert_eq!(store.delete("AWB123").unwrap(), DeleteOutcome::NotFound);
        assert!(store.is_empty());
        assert!(temp_store(&dir).is_empty());
    }

    #[test]
    fn test_mutations_are_persisted() {
        let dir = TempDir::new().unwrap();
        let mut store = temp_store(&dir);
        store.add("A1", "Blue Dart").unwrap();
        store.add("B2", "Delhivery").unwrap();
        store.delete("A1").unwrap();

        let reopened = temp_store(&dir);
        assert_eq!(reopened.len(), 1);
        assert_eq!(reopened.get("B2"), Some(&StoreEntry::pending("Delhivery")));
    }

    #[test]
    fn test_corrupt_list_is_treated_as_empty() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("tracking_list_v2.json"), "{oops").unwrap();

        let store = temp_store(&dir);
        assert!(store.is_empty());
    }

    #[test]
    fn test_null_fields_keep_the_rest_of_the_list() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("tracking_list_v2.json"),
            r#"{
                "111": {"courier": "Blue Dart", "status": "Delivered"},
                "222": {"courier": null, "status": null, "last_checked": null, "summary": null}
            }"#,
        )
        .unwrap();

        let mut store = temp_store(&dir);
        assert_eq!(store.len(), 2);
        assert_eq!(store.get("222"), Some(&StoreEntry::pending("Blue Dart")));

        store.add("NEW", "DTDC").unwrap();

        let reopened = temp_store(&dir);
        assert_eq!(reopened.len(), 3);
        assert!(reopened.get("111").unwrap().is_delivered());
    }

    #[test]
    fn test_open_migrates_legacy_list() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join("tracking_list.json"),
            r#"{"999": {"status": "Pending"}}"#,
        )
        .unwrap();

        let config = StoreConfig {
            path: dir.path().join("tracking_list_v2.json").display().to_string(),
            legacy_path: dir.path().join("tracking_list.json").display().to_string(),
        };
        let store = TrackingStore::open(&config);

        assert_eq!(store.get("999").unwrap().courier, "Blue Dart");
        assert!(dir.path().join("tracking_list_v2.json").exists());
    }

    #[test]
    fn test_apply_lookup() {
        let dir = TempDir::new().unwrap();
        let mut store = temp_store(&dir);
        store.add("W1", "Delhivery").unwrap();

        let mut record = TrackingRecord::new("Delhivery", "W1");
        record.status = "Delivered".to_string();
        record
            .delivery_details
            .insert("Recipient".to_string(), "Asha".to_string());
        let checked_at = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();

        assert!(store.apply_lookup("W1", &record, checked_at));

        let entry = store.get("W1").unwrap();
        assert!(entry.is_delivered());
        assert_eq!(entry.last_checked.as_deref(), Some("2024-01-02T03:04:05Z"));
        assert_eq!(
            entry.summary,
            Some(StatusSummary {
                status: "Delivered".to_string(),
                recipient: "Asha".to_string(),
            })
        );

        let failed = TrackingRecord::failed("Delhivery", "W1", "timeout");
        assert!(!store.apply_lookup("W1", &failed, checked_at));
        assert!(!store.apply_lookup("missing", &record, checked_at));
    }
}
