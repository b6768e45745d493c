//! Application State Management
//!
//! Process-wide state is read once at start and never mutated: the
//! configuration and the identity verifier. Storage clients are not kept
//! here; every request opens its own.

use std::sync::Arc;
use log::info;

use crate::auth::IdentityVerifier;
use crate::config::AppConfig;
use crate::storage::ObjectStore;

/// How request handlers obtain a storage client
#[derive(Clone)]
enum StoreSource {
    /// Build a fresh client from configuration per request
    Configured,
    /// Hand out one pre-built store, used by tests to inspect state
    Shared(Arc<dyn ObjectStore>),
}

/// Application state containing configuration and shared services
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub verifier: Arc<dyn IdentityVerifier>,
    stores: StoreSource,
}

impl AppState {
    /// Create application state from configuration
    pub async fn from_config(config: AppConfig) -> Result<Self, Box<dyn std::error::Error>> {
        info!("Initializing application state with configuration");
        let verifier = config.auth.create_verifier().await?;
        info!(
            "Serving catalog from bucket {} using {:?} storage backend",
            config.storage.bucket, config.storage.backend
        );

        Ok(Self {
            config,
            verifier,
            stores: StoreSource::Configured,
        })
    }

    /// Create application state for testing with an injected store and verifier
    pub fn new_for_testing(
        config: AppConfig,
        verifier: Arc<dyn IdentityVerifier>,
        store: Arc<dyn ObjectStore>,
    ) -> Self {
        Self {
            config,
            verifier,
            stores: StoreSource::Shared(store),
        }
    }

    /// Open a storage client scoped to the current request
    pub fn open_store(&self) -> Arc<dyn ObjectStore> {
        match &self.stores {
            StoreSource::Configured => self.config.storage.create_store(),
            StoreSource::Shared(store) => Arc::clone(store),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{StorageBackend, TokenAlgorithm};

    fn mock_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.storage.backend = StorageBackend::Mock;
        config.auth.audience = "client".to_string();
        config.auth.algorithm = TokenAlgorithm::Hs256;
        config.auth.secret = "secret".to_string();
        config
    }

    #[actix_web::test]
    async fn test_from_config_opens_fresh_stores() {
        let state = AppState::from_config(mock_config()).await.unwrap();
        let first = state.open_store();
        let second = state.open_store();
        assert!(!Arc::ptr_eq(&first, &second));
        assert_eq!(first.bucket(), "datasets");
    }

    #[actix_web::test]
    async fn test_from_config_rejects_missing_audience() {
        let mut config = mock_config();
        config.auth.audience.clear();
        assert!(AppState::from_config(config).await.is_err());
    }
}
