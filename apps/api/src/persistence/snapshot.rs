//! Versioned JSON codec for persisted snapshots.
//!
//! Written form: `{"version": 1, "data": <value>}`. Blobs written before the
//! envelope existed are bare values and are read as version 0. Each version
//! step has an explicit upgrade; versions newer than this build are refused.

use std::fmt;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::warn;
use uuid::Uuid;

use crate::persistence::kv::KeyValueStore;

pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Malformed snapshot: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Snapshot version {found} is newer than supported version {supported}")]
    UnsupportedVersion { found: u64, supported: u32 },
}

/// The fixed storage keys, one per independently persisted store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageKey {
    Customization,
    DynamicSections,
    Draft,
}

impl StorageKey {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageKey::Customization => "resume-customization",
            StorageKey::DynamicSections => "resume-dynamic-sections",
            StorageKey::Draft => "resume-draft",
        }
    }

    /// The key scoped to one editor owner: `<owner>/<key>`.
    pub fn scoped(&self, owner: Uuid) -> String {
        format!("{owner}/{}", self.as_str())
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Serialize)]
struct Envelope<'a, T> {
    version: u32,
    data: &'a T,
}

pub fn encode<T: Serialize>(value: &T) -> Result<String, SnapshotError> {
    Ok(serde_json::to_string(&Envelope {
        version: SNAPSHOT_VERSION,
        data: value,
    })?)
}

pub fn decode<T: DeserializeOwned>(raw: &str) -> Result<T, SnapshotError> {
    let value: Value = serde_json::from_str(raw)?;
    let (version, data) = split_envelope(value);
    let data = upgrade(version, data)?;
    Ok(serde_json::from_value(data)?)
}

fn split_envelope(value: Value) -> (u64, Value) {
    match value {
        Value::Object(mut map) if is_envelope(&map) => {
            let version = map.get("version").and_then(Value::as_u64).unwrap_or(0);
            let data = map.remove("data").unwrap_or(Value::Null);
            (version, data)
        }
        other => (0, other),
    }
}

fn is_envelope(map: &Map<String, Value>) -> bool {
    map.len() == 2 && map.get("version").is_some_and(Value::is_u64) && map.contains_key("data")
}

fn upgrade(version: u64, data: Value) -> Result<Value, SnapshotError> {
    if version > u64::from(SNAPSHOT_VERSION) {
        return Err(SnapshotError::UnsupportedVersion {
            found: version,
            supported: SNAPSHOT_VERSION,
        });
    }
    // v0 -> v1 only introduced the envelope; the payload shape is unchanged.
    Ok(data)
}

/// Reads and decodes `key`, falling back to `T::default()` when the key is
/// absent, the store is unreachable, or the blob does not parse.
pub async fn load_or_default<T>(store: &dyn KeyValueStore, key: &str) -> T
where
    T: DeserializeOwned + Default,
{
    match store.get(key).await {
        Ok(Some(raw)) => match decode(&raw) {
            Ok(value) => value,
            Err(e) => {
                warn!("Discarding persisted state at '{key}': {e}");
                T::default()
            }
        },
        Ok(None) => T::default(),
        Err(e) => {
            warn!("Could not read persisted state at '{key}': {e}");
            T::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::customization::settings::CustomizationSettings;
    use crate::persistence::kv::MemoryStore;

    // Default descriptors get fresh ids, so compare everything else.
    fn assert_is_default(settings: &CustomizationSettings) {
        let defaults = CustomizationSettings::default();
        assert_eq!(settings.font, defaults.font);
        assert_eq!(settings.colors, defaults.colors);
        assert_eq!(settings.layout, defaults.layout);
        let types = |s: &CustomizationSettings| {
            s.sections.iter().map(|d| d.section_type).collect::<Vec<_>>()
        };
        assert_eq!(types(settings), types(&defaults));
    }

    #[test]
    fn test_encode_wraps_in_envelope() {
        let json: Value = serde_json::from_str(&encode(&vec![1, 2]).unwrap()).unwrap();
        assert_eq!(json["version"], 1);
        assert_eq!(json["data"], serde_json::json!([1, 2]));
    }

    #[test]
    fn test_settings_survive_encode_decode() {
        let settings = CustomizationSettings::default();
        let back: CustomizationSettings = decode(&encode(&settings).unwrap()).unwrap();
        assert_eq!(back, settings);
    }

    #[test]
    fn test_legacy_bare_blob_is_upgraded() {
        let settings = CustomizationSettings::default();
        let legacy = serde_json::to_string(&settings).unwrap();
        let back: CustomizationSettings = decode(&legacy).unwrap();
        assert_eq!(back, settings);
    }

    #[test]
    fn test_future_version_rejected() {
        let raw = r#"{"version": 7, "data": []}"#;
        let err = decode::<Vec<u32>>(raw).unwrap_err();
        assert!(matches!(
            err,
            SnapshotError::UnsupportedVersion { found: 7, .. }
        ));
    }

    #[test]
    fn test_scoped_key() {
        let owner = Uuid::nil();
        assert_eq!(
            StorageKey::Customization.scoped(owner),
            "00000000-0000-0000-0000-000000000000/resume-customization"
        );
    }

    #[tokio::test]
    async fn test_load_or_default_on_corrupt_blob() {
        let store = MemoryStore::new();
        store.set("k", "{not json").await.unwrap();
        let loaded: CustomizationSettings = load_or_default(&store, "k").await;
        assert_is_default(&loaded);
    }

    #[tokio::test]
    async fn test_load_or_default_on_wrong_shape() {
        let store = MemoryStore::new();
        store
            .set("k", r#"{"version": 1, "data": {"font": 3}}"#)
            .await
            .unwrap();
        let loaded: CustomizationSettings = load_or_default(&store, "k").await;
        assert_is_default(&loaded);
    }

    #[tokio::test]
    async fn test_load_or_default_missing_key() {
        let store = MemoryStore::new();
        let loaded: Vec<u32> = load_or_default(&store, "absent").await;
        assert!(loaded.is_empty());
    }
}
