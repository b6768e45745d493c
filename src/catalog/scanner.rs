//! Catalog scanner: lists a namespace and keeps the dataset keys

use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use log::{debug, warn};
use std::collections::HashSet;

use crate::catalog::layout::EntryKey;
use crate::catalog::namespace::Namespace;
use crate::storage::{ObjectStore, StorageResult};

/// A dataset discovered in storage, before names are attached
#[derive(Debug, Clone, PartialEq)]
pub struct ScannedEntry {
    pub id: String,
    pub created: DateTime<Utc>,
}

/// Scan every object under the namespace and return the dataset entries
/// in listing order. A repeated entry id keeps its first occurrence.
pub async fn scan_entries(store: &dyn ObjectStore, namespace: &Namespace) -> StorageResult<Vec<ScannedEntry>> {
    let prefix = namespace.prefix();
    let mut objects = store.list_objects(&prefix);
    let mut seen = HashSet::new();
    let mut entries = Vec::new();
    let mut skipped = 0usize;

    while let Some(object) = objects.try_next().await? {
        let Some(entry_key) = EntryKey::parse(namespace, &object.key) else {
            skipped += 1;
            continue;
        };
        if !seen.insert(entry_key.entry_id.to_string()) {
            warn!("Duplicate entry id {} at key {}, keeping the first", entry_key.entry_id, object.key);
            continue;
        }
        entries.push(ScannedEntry {
            id: entry_key.entry_id.to_string(),
            created: object.created,
        });
    }

    debug!(
        "Scanned namespace {}: {} entries, {} unrelated objects skipped",
        namespace.name(),
        entries.len(),
        skipped
    );
    Ok(entries)
}
