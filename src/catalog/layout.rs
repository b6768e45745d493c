//! Dataset key layout: `<namespace>/<entry-id>/data.csv`

use crate::catalog::namespace::{Namespace, DATASET_FILE};

/// A key recognised as a dataset entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryKey<'a> {
    pub entry_id: &'a str,
}

impl<'a> EntryKey<'a> {
    /// Match `key` against the dataset layout for `namespace`.
    /// Anything else living in the namespace is foreign and yields `None`.
    pub fn parse(namespace: &Namespace, key: &'a str) -> Option<Self> {
        let rest = key.strip_prefix(namespace.name())?.strip_prefix('/')?;
        let (entry_id, file) = rest.split_once('/')?;
        if entry_id.is_empty() || file != DATASET_FILE {
            return None;
        }
        Some(Self { entry_id })
    }
}
