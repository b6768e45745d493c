//! Caller authentication
//!
//! Requests carry an identity-provider token as `Authorization: Bearer`.
//! The verifier turns it into a stable subject; nothing downstream trusts
//! caller-supplied identity data.

pub mod config;
pub mod jwks;
pub mod jwt;

use async_trait::async_trait;

use crate::error::CatalogError;

/// Identity asserted by a verified token
#[derive(Debug, Clone, PartialEq)]
pub struct VerifiedIdentity {
    /// Stable subject identifier from the identity provider
    pub subject: String,
    pub email: Option<String>,
}

/// Trait defining credential verification
#[async_trait]
pub trait IdentityVerifier: Send + Sync {
    /// Verify a raw bearer token
    async fn verify(&self, token: &str) -> Result<VerifiedIdentity, CatalogError>;
}

/// Extract the token from an `Authorization` header value
pub fn bearer_token(header: Option<&str>) -> Result<&str, CatalogError> {
    let header = match header.map(str::trim) {
        Some(value) if !value.is_empty() => value,
        _ => return Err(CatalogError::AuthMissing),
    };

    let mut parts = header.splitn(2, char::is_whitespace);
    let scheme = parts.next().unwrap_or_default();
    let token = parts.next().map(str::trim).unwrap_or_default();

    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(CatalogError::AuthInvalid(format!("unsupported authorization scheme {}", scheme)));
    }
    if token.is_empty() {
        return Err(CatalogError::AuthInvalid("empty bearer token".to_string()));
    }
    Ok(token)
}
