//! Metadata reconciler
//!
//! The side-index maps entry ids to display names. It is written elsewhere
//! (when a user renames a dataset) and is advisory here: when it is
//! missing or unreadable the catalog is still served, just without names.

use log::{debug, warn};
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;

use crate::catalog::namespace::Namespace;
use crate::catalog::scanner::ScannedEntry;
use crate::catalog::CatalogEntry;
use crate::storage::{ObjectStore, StorageError};

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("side-index unavailable: {0}")]
    IndexUnavailable(#[from] StorageError),
    #[error("side-index is not a JSON object: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Entry id -> display name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SideIndex {
    names: HashMap<String, String>,
}

impl SideIndex {
    /// Parse a JSON object of id -> name. Values that are not strings are
    /// skipped; anything other than an object is malformed.
    pub fn parse(bytes: &[u8]) -> Result<Self, IndexError> {
        let raw: HashMap<String, Value> = serde_json::from_slice(bytes)?;
        let total = raw.len();
        let names: HashMap<String, String> = raw
            .into_iter()
            .filter_map(|(id, value)| match value {
                Value::String(name) => Some((id, name)),
                _ => None,
            })
            .collect();
        if names.len() < total {
            debug!("Skipped {} side-index values that are not names", total - names.len());
        }
        Ok(Self { names })
    }

    pub fn name_for(&self, entry_id: &str) -> Option<&str> {
        self.names.get(entry_id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl From<HashMap<String, String>> for SideIndex {
    fn from(names: HashMap<String, String>) -> Self {
        Self { names }
    }
}

async fn fetch_side_index(store: &dyn ObjectStore, namespace: &Namespace) -> Result<SideIndex, IndexError> {
    let bytes = store.get_object(&namespace.index_key()).await?;
    SideIndex::parse(&bytes)
}

/// Load the namespace's side-index; any failure yields an empty index
pub async fn load_side_index(store: &dyn ObjectStore, namespace: &Namespace) -> SideIndex {
    match fetch_side_index(store, namespace).await {
        Ok(index) => {
            debug!("Loaded side-index for {} with {} names", namespace.name(), index.len());
            index
        }
        Err(IndexError::IndexUnavailable(StorageError::NotFound(_))) => {
            debug!("No side-index for {}", namespace.name());
            SideIndex::default()
        }
        Err(e) => {
            warn!("Ignoring side-index for {}: {}", namespace.name(), e);
            SideIndex::default()
        }
    }
}

/// Attach display names to scanned entries. Scan order is preserved and
/// the index never adds or removes entries.
pub fn reconcile(scanned: Vec<ScannedEntry>, index: &SideIndex) -> Vec<CatalogEntry> {
    scanned
        .into_iter()
        .map(|entry| CatalogEntry {
            name: index.name_for(&entry.id).unwrap_or_default().to_string(),
            id: entry.id,
            created: entry.created,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::mock_store::MockObjectStore;
    use chrono::Utc;

    fn scanned(ids: &[&str]) -> Vec<ScannedEntry> {
        let now = Utc::now();
        ids.iter().map(|id| ScannedEntry { id: id.to_string(), created: now }).collect()
    }

    #[test]
    fn test_parse_side_index() {
        let index = SideIndex::parse(br#"{"a":"Sales","b":""}"#).unwrap();
        assert_eq!(index.len(), 2);
        assert_eq!(index.name_for("a"), Some("Sales"));
        assert_eq!(index.name_for("b"), Some(""));
        assert_eq!(index.name_for("c"), None);
    }

    #[test]
    fn test_parse_rejects_malformed_content() {
        assert!(SideIndex::parse(b"not json").is_err());
        assert!(SideIndex::parse(br#"["a","b"]"#).is_err());
        assert!(SideIndex::parse(br#""just a string""#).is_err());
    }

    #[test]
    fn test_parse_skips_values_that_are_not_names() {
        let index = SideIndex::parse(br#"{"a":"Sales","b":1,"c":{"name":"nested"},"d":null}"#).unwrap();
        assert_eq!(index.len(), 1);
        assert_eq!(index.name_for("a"), Some("Sales"));
        assert_eq!(index.name_for("b"), None);
        assert_eq!(index.name_for("c"), None);
    }

    #[test]
    fn test_reconcile_attaches_names_in_scan_order() {
        let index = SideIndex::from(HashMap::from([
            ("b".to_string(), "Beta".to_string()),
            ("zzz".to_string(), "Orphan".to_string()),
        ]));
        let entries = reconcile(scanned(&["c", "b", "a"]), &index);

        let view: Vec<(&str, &str)> = entries.iter().map(|e| (e.id.as_str(), e.name.as_str())).collect();
        assert_eq!(view, vec![("c", ""), ("b", "Beta"), ("a", "")]);
    }

    #[actix_web::test]
    async fn test_load_side_index_missing() {
        let store = MockObjectStore::new("bucket");
        let index = load_side_index(&store, &Namespace::for_subject("42")).await;
        assert!(index.is_empty());
    }

    #[actix_web::test]
    async fn test_load_side_index_corrupt() {
        let store = MockObjectStore::new("bucket");
        store.insert("42/index.json", "{ definitely not json", Utc::now());
        let index = load_side_index(&store, &Namespace::for_subject("42")).await;
        assert!(index.is_empty());
    }

    #[actix_web::test]
    async fn test_load_side_index_keeps_names_beside_bad_values() {
        let store = MockObjectStore::new("bucket");
        store.insert("42/index.json", r#"{"p1":"Quarterly","p2":7}"#, Utc::now());
        let index = load_side_index(&store, &Namespace::for_subject("42")).await;
        assert_eq!(index.name_for("p1"), Some("Quarterly"));
        assert_eq!(index.name_for("p2"), None);
    }

    #[actix_web::test]
    async fn test_load_side_index_present() {
        let store = MockObjectStore::new("bucket");
        store.insert("42/index.json", r#"{"p1":"Quarterly"}"#, Utc::now());
        let index = load_side_index(&store, &Namespace::for_subject("42")).await;
        assert_eq!(index.name_for("p1"), Some("Quarterly"));
    }
}
