//! Whole-record configuration storage.
//!
//! Avatar and QR style records are opaque JSON values addressed by an
//! externally owned id. [`ConfigStore`] is the seam to whatever backend holds
//! them; [`MemoryStore`] keeps them in memory with optional JSON-file
//! persistence.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{StoreError, StoreResult};

/// Longest accepted record id.
pub const MAX_RECORD_ID_LEN: usize = 64;

/// Kind of stored record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RecordKind {
    /// A profile's avatar configuration.
    Avatar,
    /// A reminder's QR visual configuration.
    QrStyle,
}

impl RecordKind {
    /// Stable name used in file names.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Avatar => "avatar",
            Self::QrStyle => "qr-style",
        }
    }

    fn from_prefix(s: &str) -> Option<Self> {
        match s {
            "avatar" => Some(Self::Avatar),
            "qr-style" => Some(Self::QrStyle),
            _ => None,
        }
    }
}

/// Whether `c` may appear in a record id.
#[must_use]
pub fn is_valid_id_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_'
}

/// Address of one record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RecordKey {
    kind: RecordKind,
    id: String,
}

impl RecordKey {
    /// Build a key, validating the id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::InvalidId`] if the id is empty, longer than
    /// [`MAX_RECORD_ID_LEN`], or contains characters other than ASCII
    /// alphanumerics, `-` and `_`.
    pub fn new(kind: RecordKind, id: impl Into<String>) -> StoreResult<Self> {
        let id = id.into();
        if id.is_empty() || id.len() > MAX_RECORD_ID_LEN || !id.chars().all(is_valid_id_char) {
            return Err(StoreError::InvalidId(id));
        }
        Ok(Self { kind, id })
    }

    /// Shorthand for an avatar key.
    ///
    /// # Errors
    ///
    /// See [`RecordKey::new`].
    pub fn avatar(id: impl Into<String>) -> StoreResult<Self> {
        Self::new(RecordKind::Avatar, id)
    }

    /// Shorthand for a QR style key.
    ///
    /// # Errors
    ///
    /// See [`RecordKey::new`].
    pub fn qr_style(id: impl Into<String>) -> StoreResult<Self> {
        Self::new(RecordKind::QrStyle, id)
    }

    /// Record kind.
    #[must_use]
    pub fn kind(&self) -> RecordKind {
        self.kind
    }

    /// Record id.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    fn file_name(&self) -> String {
        format!("{}--{}.json", self.kind.as_str(), self.id)
    }

    fn from_file_name(name: &str) -> Option<Self> {
        let stem = name.strip_suffix(".json")?;
        let (prefix, id) = stem.split_once("--")?;
        Self::new(RecordKind::from_prefix(prefix)?, id).ok()
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.kind.as_str(), self.id)
    }
}

/// Backend holding whole configuration records.
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// Fetch a record; `Ok(None)` when it has never been written.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend cannot be read.
    async fn load(&self, key: &RecordKey) -> StoreResult<Option<Value>>;

    /// Replace a record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] if the backend rejects the write.
    async fn save(&self, key: &RecordKey, value: Value) -> StoreResult<()>;

    /// Whether the backend is reachable.
    async fn is_available(&self) -> bool {
        true
    }
}

/// In-memory store, optionally mirrored to JSON files.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    records: Arc<RwLock<HashMap<RecordKey, Value>>>,
    /// Optional data directory for filesystem persistence.
    data_dir: Option<PathBuf>,
}

impl MemoryStore {
    /// Create an empty store without persistence.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store persisted to `data_dir`, loading any records already
    /// there. Files that are not valid records are skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Io`] if the directory cannot be created or read.
    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> StoreResult<Self> {
        let data_dir = data_dir.into();
        std::fs::create_dir_all(&data_dir)?;
        let records = load_dir(&data_dir)?;
        tracing::info!(
            dir = %data_dir.display(),
            records = records.len(),
            "opened config store"
        );
        Ok(Self {
            records: Arc::new(RwLock::new(records)),
            data_dir: Some(data_dir),
        })
    }

    /// Number of records held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Whether no records are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Data directory, if persistent.
    #[must_use]
    pub fn data_dir(&self) -> Option<&Path> {
        self.data_dir.as_deref()
    }

    fn persist(&self, key: &RecordKey, value: &Value) -> StoreResult<()> {
        let Some(ref data_dir) = self.data_dir else {
            return Ok(());
        };
        let json = serde_json::to_string_pretty(value)?;
        std::fs::write(data_dir.join(key.file_name()), json)?;
        Ok(())
    }
}

fn load_dir(dir: &Path) -> StoreResult<HashMap<RecordKey, Value>> {
    let mut records = HashMap::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let Some(key) = path
            .file_name()
            .and_then(|n| n.to_str())
            .and_then(RecordKey::from_file_name)
        else {
            continue;
        };
        match std::fs::read_to_string(&path)
            .map_err(StoreError::from)
            .and_then(|s| serde_json::from_str::<Value>(&s).map_err(StoreError::from))
        {
            Ok(value) => {
                records.insert(key, value);
            }
            Err(e) => tracing::warn!("Skipping unreadable record {}: {e}", path.display()),
        }
    }
    Ok(records)
}

#[async_trait]
impl ConfigStore for MemoryStore {
    async fn load(&self, key: &RecordKey) -> StoreResult<Option<Value>> {
        let records = self.records.read().unwrap_or_else(PoisonError::into_inner);
        Ok(records.get(key).cloned())
    }

    async fn save(&self, key: &RecordKey, value: Value) -> StoreResult<()> {
        self.persist(key, &value)?;
        self.records
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.clone(), value);
        tracing::debug!(%key, "saved record");
        Ok(())
    }

    async fn is_available(&self) -> bool {
        match &self.data_dir {
            Some(dir) => dir.is_dir(),
            None => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_key_validation() {
        assert!(RecordKey::avatar("user-1_a").is_ok());
        assert!(matches!(
            RecordKey::avatar(""),
            Err(StoreError::InvalidId(_))
        ));
        assert!(RecordKey::qr_style("../etc").is_err());
        assert!(RecordKey::qr_style("a".repeat(65)).is_err());
        assert!(RecordKey::qr_style("a".repeat(64)).is_ok());
    }

    #[test]
    fn test_key_file_name_round_trip() {
        let key = RecordKey::qr_style("rem-42").expect("key");
        assert_eq!(key.file_name(), "qr-style--rem-42.json");
        assert_eq!(RecordKey::from_file_name(&key.file_name()), Some(key));
        assert_eq!(RecordKey::from_file_name("notes.json"), None);
    }

    #[tokio::test]
    async fn test_memory_load_save() {
        let store = MemoryStore::new();
        let key = RecordKey::avatar("p1").expect("key");
        assert_eq!(store.load(&key).await.expect("load"), None);
        store
            .save(&key, json!({"skinColor": "#ffe4c4"}))
            .await
            .expect("save");
        let loaded = store.load(&key).await.expect("load").expect("present");
        assert_eq!(loaded["skinColor"], "#ffe4c4");
        assert_eq!(store.len(), 1);
        assert!(store.is_available().await);
    }

    #[tokio::test]
    async fn test_kinds_do_not_collide() {
        let store = MemoryStore::new();
        let avatar = RecordKey::avatar("same").expect("key");
        let style = RecordKey::qr_style("same").expect("key");
        store.save(&avatar, json!(1)).await.expect("save");
        assert_eq!(store.load(&style).await.expect("load"), None);
    }

    #[tokio::test]
    async fn test_persistence_survives_reopen() {
        let dir = tempfile::tempdir().expect("tempdir");
        let key = RecordKey::qr_style("r1").expect("key");
        {
            let store = MemoryStore::with_data_dir(dir.path()).expect("open");
            store.save(&key, json!({"size": 200})).await.expect("save");
        }
        std::fs::write(dir.path().join("avatar--bad.json"), "{not json").expect("write");
        let reopened = MemoryStore::with_data_dir(dir.path()).expect("reopen");
        assert_eq!(reopened.len(), 1);
        let value = reopened.load(&key).await.expect("load").expect("present");
        assert_eq!(value["size"], 200);
    }
}
