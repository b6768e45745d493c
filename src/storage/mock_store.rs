//! Mock implementation of ObjectStore for testing

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use log::info;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use crate::storage::{ObjectInfo, ObjectStore, ObjectStream, StorageError, StorageResult, UploadTarget};

#[derive(Debug, Clone)]
struct MockObject {
    data: Bytes,
    created: DateTime<Utc>,
}

/// Mock implementation of ObjectStore for testing
pub struct MockObjectStore {
    bucket: String,
    // In-memory bucket: key -> object, listed in key order like S3
    objects: Mutex<BTreeMap<String, MockObject>>,
    bucket_missing: AtomicBool,
    fail_uploads: AtomicBool,
    calls: AtomicUsize,
    uploads_issued: AtomicUsize,
}

impl MockObjectStore {
    pub fn new(bucket: &str) -> Self {
        Self {
            bucket: bucket.to_string(),
            objects: Mutex::new(BTreeMap::new()),
            bucket_missing: AtomicBool::new(false),
            fail_uploads: AtomicBool::new(false),
            calls: AtomicUsize::new(0),
            uploads_issued: AtomicUsize::new(0),
        }
    }

    /// Store an object with an explicit creation time
    pub fn insert(&self, key: &str, data: impl Into<Bytes>, created: DateTime<Utc>) {
        let mut objects = self.objects.lock().unwrap();
        objects.insert(key.to_string(), MockObject { data: data.into(), created });
    }

    /// Remove an object if present
    pub fn remove(&self, key: &str) {
        self.objects.lock().unwrap().remove(key);
    }

    /// Get the number of objects in the bucket
    pub fn object_count(&self) -> usize {
        self.objects.lock().unwrap().len()
    }

    /// Pretend the bucket does not exist
    pub fn set_bucket_missing(&self, missing: bool) {
        self.bucket_missing.store(missing, Ordering::SeqCst);
    }

    /// Make every upload session request fail
    pub fn set_fail_uploads(&self, fail: bool) {
        self.fail_uploads.store(fail, Ordering::SeqCst);
    }

    /// Total number of trait calls served by this store
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Number of upload sessions issued
    pub fn uploads_issued(&self) -> usize {
        self.uploads_issued.load(Ordering::SeqCst)
    }

    fn record_call(&self) {
        self.calls.fetch_add(1, Ordering::SeqCst);
    }

    fn check_bucket(&self) -> StorageResult<()> {
        if self.bucket_missing.load(Ordering::SeqCst) {
            return Err(StorageError::BucketNotFound(self.bucket.clone()));
        }
        Ok(())
    }
}

impl Default for MockObjectStore {
    fn default() -> Self {
        Self::new("mock-bucket")
    }
}

#[async_trait]
impl ObjectStore for MockObjectStore {
    fn bucket(&self) -> &str {
        &self.bucket
    }

    async fn bucket_exists(&self) -> StorageResult<bool> {
        self.record_call();
        Ok(!self.bucket_missing.load(Ordering::SeqCst))
    }

    fn list_objects<'a>(&'a self, prefix: &'a str) -> ObjectStream<'a> {
        self.record_call();
        if let Err(e) = self.check_bucket() {
            return stream::once(async move { Err(e) }).boxed();
        }

        let snapshot: Vec<StorageResult<ObjectInfo>> = {
            let objects = self.objects.lock().unwrap();
            objects
                .range(prefix.to_string()..)
                .take_while(|(key, _)| key.starts_with(prefix))
                .map(|(key, object)| {
                    Ok(ObjectInfo {
                        key: key.clone(),
                        created: object.created,
                        size: object.data.len() as u64,
                    })
                })
                .collect()
        };
        info!("Mock: Listed {} objects under prefix {}", snapshot.len(), prefix);
        stream::iter(snapshot).boxed()
    }

    async fn get_object(&self, key: &str) -> StorageResult<Bytes> {
        self.record_call();
        self.check_bucket()?;
        let objects = self.objects.lock().unwrap();
        objects
            .get(key)
            .map(|object| object.data.clone())
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }

    async fn create_upload_session(
        &self,
        key: &str,
        origin: &str,
        ttl: Duration,
    ) -> StorageResult<UploadTarget> {
        self.record_call();
        self.check_bucket()?;
        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(StorageError::SigningUnavailable("mock uploads disabled".to_string()));
        }

        self.uploads_issued.fetch_add(1, Ordering::SeqCst);
        let expires_at = Utc::now() + chrono::Duration::seconds(ttl.as_secs() as i64);
        Ok(UploadTarget {
            url: format!("mock://{}/{}?origin={}&expires={}", self.bucket, key, origin, expires_at.timestamp()),
            expires_at,
        })
    }
}
