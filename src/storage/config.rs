//! Configuration for object storage backends

use crate::storage::{ObjectStore, local_store::LocalObjectStore, mock_store::MockObjectStore};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use std::env;
use log::{info, warn};

/// Available object storage backends
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Local,
    Mock,
}

impl std::str::FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" | "fs" | "filesystem" => Ok(StorageBackend::Local),
            "mock" => Ok(StorageBackend::Mock),
            _ => Err(format!("Unknown storage backend: {}", s))
        }
    }
}

/// Object storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Storage backend type
    pub backend: StorageBackend,
    /// Directory that holds one sub-directory per bucket
    pub base_path: String,
    /// Bucket holding every user's datasets
    pub bucket: String,
    /// S3-compatible endpoint that accepts pre-signed uploads
    pub upload_endpoint: String,
    /// Signing region
    pub region: String,
    pub access_key_id: String,
    pub secret_access_key: String,
    /// Lifetime of issued upload URLs in seconds
    pub upload_expiry_secs: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            base_path: "./data/storage".to_string(),
            bucket: "datasets".to_string(),
            upload_endpoint: "http://localhost:9710".to_string(),
            region: "us-east-1".to_string(),
            access_key_id: String::new(),
            secret_access_key: String::new(),
            upload_expiry_secs: 3600,
        }
    }
}

impl StorageConfig {
    /// Apply `DATA_BUCKET` and `STORAGE_BACKEND` overrides
    pub fn apply_env(&mut self) {
        if let Ok(bucket) = env::var("DATA_BUCKET") {
            info!("Using data bucket from environment: {}", bucket);
            self.bucket = bucket;
        }

        if let Ok(backend_str) = env::var("STORAGE_BACKEND") {
            match backend_str.parse::<StorageBackend>() {
                Ok(backend) => {
                    info!("Using storage backend from environment: {:?}", backend);
                    self.backend = backend;
                }
                Err(e) => {
                    warn!("Invalid storage backend in environment: {}. Keeping {:?}.", e, self.backend);
                }
            }
        }
    }

    pub fn upload_ttl(&self) -> Duration {
        Duration::from_secs(self.upload_expiry_secs)
    }

    /// Create a storage client for a single request
    pub fn create_store(&self) -> Arc<dyn ObjectStore> {
        match self.backend {
            StorageBackend::Local => Arc::new(LocalObjectStore::new(self)),
            StorageBackend::Mock => Arc::new(MockObjectStore::new(&self.bucket)),
        }
    }
}
