//! Verification of identity tokens minted by the external auth provider.
//!
//! Clients sign in with the provider, then post the resulting token to the service. The
//! token is checked for signature, issuer, audience and expiry before a session is opened.

use bitebuddy_shared::{Error, Result, User};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::Deserialize;

/// Key used to check identity token signatures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentityKey {
    /// Shared HS256 secret
    Secret(String),
    /// RS256 public key, PEM encoded
    RsaPem(String),
}

#[derive(Deserialize)]
struct IdentityClaims {
    sub: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    email: Option<String>,
}

#[derive(Clone)]
pub struct IdentityVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl IdentityVerifier {
    pub fn new(key: &IdentityKey, issuer: &str, audience: &str) -> anyhow::Result<Self> {
        let (key, algorithm) = match key {
            IdentityKey::Secret(secret) => {
                (DecodingKey::from_secret(secret.as_bytes()), Algorithm::HS256)
            }
            IdentityKey::RsaPem(pem) => (DecodingKey::from_rsa_pem(pem.as_bytes())?, Algorithm::RS256),
        };

        let mut validation = Validation::new(algorithm);
        validation.set_issuer(&[issuer]);
        validation.set_audience(&[audience]);
        validation.set_required_spec_claims(&["exp", "iss", "aud", "sub"]);

        Ok(Self { key, validation })
    }

    pub fn verify(&self, token: &str) -> Result<User> {
        let data = decode::<IdentityClaims>(token, &self.key, &self.validation).map_err(|e| {
            tracing::warn!(error = %e, "Identity token rejected");
            Error::Unauthorized
        })?;

        let claims = data.claims;
        if claims.sub.trim().is_empty() {
            return Err(Error::Unauthorized);
        }

        Ok(User {
            uid: claims.sub,
            display_name: claims.name.filter(|name| !name.trim().is_empty()),
            email: claims.email.filter(|email| !email.trim().is_empty()),
        })
    }
}
