//! Signed ID token verification

use async_trait::async_trait;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use log::{debug, warn};
use serde::Deserialize;

use crate::auth::jwks::KeySet;
use crate::auth::{IdentityVerifier, VerifiedIdentity};
use crate::error::CatalogError;

/// Claims read from an ID token; signature, expiry, audience and issuer
/// are enforced by `Validation`
#[derive(Debug, Deserialize)]
struct IdTokenClaims {
    sub: String,
    #[serde(default)]
    email: Option<String>,
}

/// Where signature keys come from
enum SigningKeys {
    /// One configured key, used for every token
    Static(DecodingKey),
    /// Published set selected by the token's `kid`
    Published(KeySet),
}

/// Verifies JWT ID tokens against the signing keys, audience and issuer set
pub struct JwtVerifier {
    keys: SigningKeys,
    validation: Validation,
}

impl JwtVerifier {
    fn with_keys(keys: SigningKeys, algorithm: Algorithm, audience: &str, issuers: &[String]) -> Self {
        let mut validation = Validation::new(algorithm);
        validation.set_audience(&[audience]);
        validation.set_issuer(issuers);
        validation.set_required_spec_claims(&["exp", "aud", "iss", "sub"]);

        Self { keys, validation }
    }

    pub fn new(key: DecodingKey, algorithm: Algorithm, audience: &str, issuers: &[String]) -> Self {
        Self::with_keys(SigningKeys::Static(key), algorithm, audience, issuers)
    }

    /// HS256 verifier with a shared secret
    pub fn with_secret(secret: &[u8], audience: &str, issuers: &[String]) -> Self {
        Self::new(DecodingKey::from_secret(secret), Algorithm::HS256, audience, issuers)
    }

    /// RS256 verifier with a PEM encoded public key
    pub fn with_rsa_pem(pem: &[u8], audience: &str, issuers: &[String]) -> jsonwebtoken::errors::Result<Self> {
        Ok(Self::new(DecodingKey::from_rsa_pem(pem)?, Algorithm::RS256, audience, issuers))
    }

    /// RS256 verifier over a published key set
    pub fn with_key_set(keys: KeySet, audience: &str, issuers: &[String]) -> Self {
        Self::with_keys(SigningKeys::Published(keys), Algorithm::RS256, audience, issuers)
    }

    async fn published_key(keys: &KeySet, token: &str) -> Result<DecodingKey, CatalogError> {
        let header = decode_header(token).map_err(|e| rejected(format!("malformed token: {}", e)))?;
        let kid = header.kid.ok_or_else(|| rejected("token names no signing key".to_string()))?;

        match keys.key_for(&kid).await {
            Ok(Some(key)) => Ok(key),
            Ok(None) => Err(rejected(format!("unknown signing key {}", kid))),
            Err(e) => Err(rejected(format!("signing keys unavailable: {}", e))),
        }
    }
}

fn rejected(reason: String) -> CatalogError {
    warn!("Token verification failed: {}", reason);
    CatalogError::AuthInvalid(reason)
}

#[async_trait]
impl IdentityVerifier for JwtVerifier {
    async fn verify(&self, token: &str) -> Result<VerifiedIdentity, CatalogError> {
        let published;
        let key = match &self.keys {
            SigningKeys::Static(key) => key,
            SigningKeys::Published(keys) => {
                published = Self::published_key(keys, token).await?;
                &published
            }
        };

        let data = decode::<IdTokenClaims>(token, key, &self.validation).map_err(|e| {
            let reason = match e.kind() {
                ErrorKind::ExpiredSignature => "token expired".to_string(),
                ErrorKind::InvalidAudience => "wrong audience".to_string(),
                ErrorKind::InvalidIssuer => "untrusted issuer".to_string(),
                ErrorKind::InvalidSignature => "bad signature".to_string(),
                _ => format!("malformed token: {}", e),
            };
            rejected(reason)
        })?;

        let claims = data.claims;
        if claims.sub.is_empty() {
            return Err(CatalogError::AuthInvalid("token has an empty subject".to_string()));
        }
        debug!("Verified token for subject {}", claims.sub);

        Ok(VerifiedIdentity {
            subject: claims.sub,
            email: claims.email,
        })
    }
}
