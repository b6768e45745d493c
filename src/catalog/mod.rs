//! Per-user dataset catalog
//!
//! The bucket has no per-owner index, so the catalog is rebuilt on every
//! request from a prefix scan of the caller's namespace plus the optional
//! side-index of display names.

pub mod namespace;
pub mod layout;
pub mod scanner;
pub mod index;
pub mod session;
pub mod response;


use chrono::{DateTime, Utc};
use futures::future;
use log::debug;

use crate::catalog::index::{load_side_index, reconcile};
use crate::catalog::namespace::Namespace;
use crate::catalog::scanner::scan_entries;
use crate::storage::{ObjectStore, StorageResult};

/// One dataset in a user's catalog
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub id: String,
    /// Display name from the side-index, empty when unknown
    pub name: String,
    pub created: DateTime<Utc>,
}

/// Scan the namespace and fetch its side-index concurrently, then merge.
/// Only the scan can fail; the side-index degrades to no names.
pub async fn build_catalog(store: &dyn ObjectStore, namespace: &Namespace) -> StorageResult<Vec<CatalogEntry>> {
    let (scanned, index) = future::join(
        scan_entries(store, namespace),
        load_side_index(store, namespace),
    )
    .await;

    let entries = reconcile(scanned?, &index);
    debug!("Built catalog of {} entries for {}", entries.len(), namespace.name());
    Ok(entries)
}
