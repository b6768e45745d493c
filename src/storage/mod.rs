//! Object Storage Layer Abstraction
//!
//! This module provides an abstraction over the bucket that holds user
//! datasets, allowing the catalog to run against a local directory tree,
//! an in-memory store for tests, or any other object backend without
//! affecting the catalog logic.

pub mod local_store;
pub mod mock_store;
pub mod config;
pub mod presign;

#[cfg(test)]
mod comprehensive_test;

use async_trait::async_trait;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use futures::stream::BoxStream;
use std::time::Duration;
use thiserror::Error;

/// Errors raised by storage backends
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("bucket {0} does not exist")]
    BucketNotFound(String),
    #[error("object {0} not found")]
    NotFound(String),
    #[error("invalid object key: {0}")]
    InvalidKey(String),
    #[error("upload signing is not configured: {0}")]
    SigningUnavailable(String),
    #[error("failed to sign upload url: {0}")]
    Signing(String),
    #[error("storage i/o error: {0}")]
    Io(#[from] std::io::Error),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// A single object discovered while listing a prefix
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectInfo {
    /// Full object key inside the bucket
    pub key: String,
    /// Creation time reported by the backend
    pub created: DateTime<Utc>,
    /// Object size in bytes
    pub size: u64,
}

/// Pre-authorized write location for a single object key
#[derive(Debug, Clone, PartialEq)]
pub struct UploadTarget {
    pub url: String,
    pub expires_at: DateTime<Utc>,
}

/// Lazy listing of objects; every poll may hit the backend
pub type ObjectStream<'a> = BoxStream<'a, StorageResult<ObjectInfo>>;

/// Trait defining the object storage interface used by the catalog
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Name of the bucket this store is bound to
    fn bucket(&self) -> &str;

    /// Whether the bound bucket exists and is reachable
    async fn bucket_exists(&self) -> StorageResult<bool>;

    /// List every object whose key starts with `prefix`.
    /// The listing is fresh on every call and in no guaranteed order.
    fn list_objects<'a>(&'a self, prefix: &'a str) -> ObjectStream<'a>;

    /// Fetch the full contents of an object
    async fn get_object(&self, key: &str) -> StorageResult<Bytes>;

    /// Issue a time-bounded write target for exactly `key`, usable from `origin`
    async fn create_upload_session(
        &self,
        key: &str,
        origin: &str,
        ttl: Duration,
    ) -> StorageResult<UploadTarget>;
}
