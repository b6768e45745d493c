//! Configuration for credential verification

use crate::auth::jwks::KeySet;
use crate::auth::{jwt::JwtVerifier, IdentityVerifier};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::sync::Arc;
use std::time::Duration;
use log::info;

/// Token signature algorithms accepted by the verifier
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub enum TokenAlgorithm {
    #[serde(rename = "HS256")]
    Hs256,
    #[default]
    #[serde(rename = "RS256")]
    Rs256,
}

/// Credential verification configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Expected `aud` claim, the OAuth client id
    pub audience: String,
    /// Trusted `iss` values
    pub issuers: Vec<String>,
    pub algorithm: TokenAlgorithm,
    /// Shared secret for HS256
    pub secret: String,
    /// PEM public key for RS256
    pub public_key_file: Option<String>,
    /// Published key set for RS256; takes precedence over `public_key_file`
    pub jwks_url: Option<String>,
    /// Minimum seconds between key set refreshes on an unknown key id
    pub jwks_refresh_secs: u64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            audience: String::new(),
            issuers: vec![
                "accounts.google.com".to_string(),
                "https://accounts.google.com".to_string(),
            ],
            algorithm: TokenAlgorithm::default(),
            secret: String::new(),
            public_key_file: None,
            jwks_url: None,
            jwks_refresh_secs: 60,
        }
    }
}

impl AuthConfig {
    /// Apply `OAUTH_CLIENT_ID`, `JWT_SECRET` and `JWKS_URL` overrides
    pub fn apply_env(&mut self) {
        if let Ok(client_id) = env::var("OAUTH_CLIENT_ID") {
            info!("Using OAuth client id from environment");
            self.audience = client_id;
        }
        if let Ok(secret) = env::var("JWT_SECRET") {
            self.secret = secret;
        }
        if let Ok(url) = env::var("JWKS_URL") {
            info!("Using signing key set {} from environment", url);
            self.jwks_url = Some(url);
        }
    }

    /// Build the verifier described by this configuration. A configured
    /// key set is fetched here, so startup fails if it is unreachable.
    pub async fn create_verifier(&self) -> Result<Arc<dyn IdentityVerifier>, Box<dyn std::error::Error>> {
        if self.audience.is_empty() {
            return Err("auth.audience (OAUTH_CLIENT_ID) must be set".into());
        }
        if self.issuers.is_empty() {
            return Err("auth.issuers must name at least one trusted issuer".into());
        }

        let verifier = match (&self.algorithm, self.jwks_url.as_deref()) {
            (TokenAlgorithm::Hs256, _) => {
                if self.secret.is_empty() {
                    return Err("auth.secret (JWT_SECRET) must be set for HS256".into());
                }
                info!("Verifying HS256 tokens for audience {}", self.audience);
                JwtVerifier::with_secret(self.secret.as_bytes(), &self.audience, &self.issuers)
            }
            (TokenAlgorithm::Rs256, Some(url)) => {
                let keys = KeySet::fetch(url, Duration::from_secs(self.jwks_refresh_secs)).await?;
                info!("Verifying RS256 tokens for audience {} with keys from {}", self.audience, url);
                JwtVerifier::with_key_set(keys, &self.audience, &self.issuers)
            }
            (TokenAlgorithm::Rs256, None) => {
                let path = self
                    .public_key_file
                    .as_deref()
                    .ok_or("auth.public_key_file must be set for RS256")?;
                let pem = fs::read(path)?;
                info!("Verifying RS256 tokens for audience {} with key {}", self.audience, path);
                JwtVerifier::with_rsa_pem(&pem, &self.audience, &self.issuers)?
            }
        };

        Ok(Arc::new(verifier))
    }
}
