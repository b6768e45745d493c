//! Per-user key namespaces

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Subject bytes that survive unescaped; everything else, `.` and `/`
/// included, is percent-encoded so a subject can never climb out of or
/// split its partition
const SUBJECT_SAFE: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_');

pub const INDEX_FILE: &str = "index.json";
pub const DATASET_FILE: &str = "data.csv";

/// The private key partition owned by one subject
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Namespace {
    name: String,
}

impl Namespace {
    /// Derive the namespace from a verified subject identifier
    pub fn for_subject(subject: &str) -> Self {
        Self {
            name: utf8_percent_encode(subject, SUBJECT_SAFE).to_string(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Key prefix for every object in the namespace, with trailing `/`
    pub fn prefix(&self) -> String {
        format!("{}/", self.name)
    }

    /// Key of the id -> display name side-index
    pub fn index_key(&self) -> String {
        format!("{}/{}", self.name, INDEX_FILE)
    }

    /// Key of the dataset object for an entry
    pub fn entry_key(&self, entry_id: &str) -> String {
        format!("{}/{}/{}", self.name, entry_id, DATASET_FILE)
    }
}
