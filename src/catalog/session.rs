//! Upload session issuer

use log::{error, info};
use std::time::Duration;
use uuid::Uuid;

use crate::catalog::namespace::Namespace;
use crate::error::CatalogError;
use crate::storage::{ObjectStore, UploadTarget};

/// A fresh write location for a new dataset
#[derive(Debug, Clone, PartialEq)]
pub struct UploadSession {
    pub entry_id: String,
    pub key: String,
    pub target: UploadTarget,
}

/// Random 122-bit entry id. Uniqueness is probabilistic; existing
/// entries are never consulted.
pub fn new_entry_id() -> String {
    Uuid::new_v4().to_string()
}

/// Allocate an entry id and a pre-authorized write target for it.
/// The key follows the dataset layout, so the next scan picks it up.
pub async fn issue_upload_session(
    store: &dyn ObjectStore,
    namespace: &Namespace,
    origin: &str,
    ttl: Duration,
) -> Result<UploadSession, CatalogError> {
    let entry_id = new_entry_id();
    let key = namespace.entry_key(&entry_id);

    let target = store
        .create_upload_session(&key, origin, ttl)
        .await
        .map_err(|e| {
            error!("Failed to issue upload session for {}: {}", key, e);
            CatalogError::SessionIssuanceFailed(e.to_string())
        })?;
    info!("Issued upload session for entry {} in namespace {}", entry_id, namespace.name());

    Ok(UploadSession { entry_id, key, target })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::layout::EntryKey;
    use crate::storage::mock_store::MockObjectStore;

    #[test]
    fn test_new_entry_id_is_uuid() {
        let id = new_entry_id();
        assert_eq!(id.len(), 36);
        assert!(Uuid::parse_str(&id).is_ok());
        assert_ne!(id, new_entry_id());
    }

    #[actix_web::test]
    async fn test_issue_upload_session() {
        let store = MockObjectStore::new("bucket");
        let namespace = Namespace::for_subject("42");
        let session = issue_upload_session(&store, &namespace, "https://app.example.com", Duration::from_secs(60))
            .await
            .unwrap();

        assert_eq!(session.key, format!("42/{}/data.csv", session.entry_id));
        assert_eq!(EntryKey::parse(&namespace, &session.key).unwrap().entry_id, session.entry_id);
        assert!(session.target.url.contains(&session.key));
        assert!(session.target.url.contains("origin=https://app.example.com"));
    }

    #[actix_web::test]
    async fn test_issue_upload_session_failure() {
        let store = MockObjectStore::new("bucket");
        store.set_fail_uploads(true);
        let result = issue_upload_session(
            &store,
            &Namespace::for_subject("42"),
            "https://app.example.com",
            Duration::from_secs(60),
        )
        .await;
        assert!(matches!(result, Err(CatalogError::SessionIssuanceFailed(_))));
    }
}
