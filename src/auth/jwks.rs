//! Published signing keys
//!
//! Identity providers publish their token signing keys as a JSON Web Key
//! Set and rotate them, so more than one key is live at a time. Keys are
//! fetched at start and fetched again when a token names a key id that is
//! not in the cached set, at most once per refresh interval.

use jsonwebtoken::jwk::JwkSet;
use jsonwebtoken::DecodingKey;
use log::{debug, info, warn};
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::RwLock;

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Error)]
pub enum KeySetError {
    #[error("failed to fetch key set from {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("unusable key {kid}: {source}")]
    InvalidKey {
        kid: String,
        #[source]
        source: jsonwebtoken::errors::Error,
    },
}

struct CachedKeys {
    set: JwkSet,
    fetched_at: Instant,
}

/// Cached key set, optionally refreshed from a URL
pub struct KeySet {
    source: Option<KeySource>,
    refresh_interval: Duration,
    cached: RwLock<CachedKeys>,
}

struct KeySource {
    url: String,
    http: reqwest::Client,
}

impl KeySource {
    async fn download(&self) -> Result<JwkSet, KeySetError> {
        let fetch_error = |source| KeySetError::Fetch { url: self.url.clone(), source };
        let response = self
            .http
            .get(&self.url)
            .send()
            .await
            .and_then(|response| response.error_for_status())
            .map_err(fetch_error)?;
        response.json::<JwkSet>().await.map_err(fetch_error)
    }
}

impl KeySet {
    /// A key set that is never refreshed
    pub fn fixed(set: JwkSet) -> Self {
        Self {
            source: None,
            refresh_interval: Duration::MAX,
            cached: RwLock::new(CachedKeys { set, fetched_at: Instant::now() }),
        }
    }

    /// Fetch the key set published at `url`
    pub async fn fetch(url: &str, refresh_interval: Duration) -> Result<Self, KeySetError> {
        let http = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(|source| KeySetError::Fetch { url: url.to_string(), source })?;
        let source = KeySource { url: url.to_string(), http };
        let set = source.download().await?;
        info!("Loaded {} signing keys from {}", set.keys.len(), url);

        Ok(Self {
            source: Some(source),
            refresh_interval,
            cached: RwLock::new(CachedKeys { set, fetched_at: Instant::now() }),
        })
    }

    /// Decoding key for `kid`, refreshing the set once if it is unknown
    pub async fn key_for(&self, kid: &str) -> Result<Option<DecodingKey>, KeySetError> {
        if let Some(key) = self.lookup(kid).await? {
            return Ok(Some(key));
        }
        self.refresh().await;
        self.lookup(kid).await
    }

    async fn lookup(&self, kid: &str) -> Result<Option<DecodingKey>, KeySetError> {
        let cached = self.cached.read().await;
        match cached.set.find(kid) {
            Some(jwk) => DecodingKey::from_jwk(jwk)
                .map(Some)
                .map_err(|source| KeySetError::InvalidKey { kid: kid.to_string(), source }),
            None => Ok(None),
        }
    }

    async fn refresh(&self) {
        let Some(source) = &self.source else {
            return;
        };

        // Concurrent misses queue on the write lock and share one download
        let mut cached = self.cached.write().await;
        if cached.fetched_at.elapsed() < self.refresh_interval {
            debug!("Key set from {} refreshed recently, not fetching again", source.url);
            return;
        }
        match source.download().await {
            Ok(set) => {
                info!("Refreshed {} signing keys from {}", set.keys.len(), source.url);
                *cached = CachedKeys { set, fetched_at: Instant::now() };
            }
            Err(e) => {
                warn!("Keeping cached signing keys: {}", e);
                cached.fetched_at = Instant::now();
            }
        }
    }
}
