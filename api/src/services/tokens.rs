//! Token service: issues and verifies the signed bearer tokens that carry a
//! session.
//!
//! HS256 over a process-wide secret, injected once at construction. Issuance
//! and verification share the same key, algorithm, issuer and expiry policy
//! by construction. Verification failures are deliberately collapsed into a
//! single `Unauthorized` value so callers cannot probe whether a token was
//! tampered with or merely expired; the concrete cause is logged instead.

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use storefront_models::auth::Claims;

use crate::error::ApiError;

pub const TOKEN_ISSUER: &str = "storefront-auth";

#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    ttl_secs: i64,
}

impl TokenService {
    pub fn new(secret: &str, ttl_secs: i64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            ttl_secs,
        }
    }

    /// Sign a token for `user_id`/`email` with a fresh expiration window.
    pub fn issue(&self, user_id: i64, email: &str) -> Result<String, ApiError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_owned(),
            iat: now.timestamp() as usize,
            exp: (now + Duration::seconds(self.ttl_secs)).timestamp() as usize,
            iss: TOKEN_ISSUER.to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| ApiError::Internal(e.into()))
    }

    /// Validate signature, issuer and expiry; return the decoded claims.
    /// Every failure mode maps to the same `Unauthorized`.
    pub fn verify(&self, token: &str) -> Result<Claims, ApiError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[TOKEN_ISSUER]);
        validation.leeway = 0;

        match decode::<Claims>(token, &self.decoding_key, &validation) {
            Ok(data) => Ok(data.claims),
            Err(e) => {
                tracing::debug!("token verification failed: {e}");
                Err(ApiError::Unauthorized)
            }
        }
    }
}

// Keys stay out of any debug output.
impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("encoding_key", &"[REDACTED]")
            .field("decoding_key", &"[REDACTED]")
            .field("ttl_secs", &self.ttl_secs)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service() -> TokenService {
        TokenService::new("test_signing_secret", 3600)
    }

    #[test]
    fn issued_token_verifies_with_matching_claims() {
        let tokens = service();
        let token = tokens.issue(42, "a@x.com").unwrap();

        let claims = tokens.verify(&token).unwrap();
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.email, "a@x.com");
        assert_eq!(claims.iss, TOKEN_ISSUER);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn tampered_signature_is_rejected() {
        let tokens = service();
        let token = tokens.issue(42, "a@x.com").unwrap();

        // Flip one byte inside the signature segment.
        let mut parts: Vec<String> = token.split('.').map(str::to_owned).collect();
        assert_eq!(parts.len(), 3);
        let mut sig = parts[2].clone().into_bytes();
        sig[0] = if sig[0] == b'A' { b'B' } else { b'A' };
        parts[2] = String::from_utf8(sig).unwrap();
        let tampered = parts.join(".");

        assert!(tokens.verify(&tampered).is_err());
    }

    #[test]
    fn token_signed_with_a_different_key_is_rejected() {
        let tokens = service();
        let other = TokenService::new("a_different_secret", 3600);
        let token = other.issue(42, "a@x.com").unwrap();

        assert!(tokens.verify(&token).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let expired = TokenService::new("test_signing_secret", -120).issue(42, "a@x.com").unwrap();
        assert!(service().verify(&expired).is_err());
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(service().verify("definitely-not-a-jwt").is_err());
        assert!(service().verify("").is_err());
    }

    #[test]
    fn failures_collapse_to_one_error_kind() {
        let tokens = service();
        let expired = TokenService::new("test_signing_secret", -120).issue(1, "a@x.com").unwrap();
        let foreign = TokenService::new("a_different_secret", 3600).issue(1, "a@x.com").unwrap();

        for bad in [expired.as_str(), foreign.as_str(), "garbage"] {
            let err = tokens.verify(bad).unwrap_err();
            assert!(matches!(err, ApiError::Unauthorized));
            assert_eq!(err.to_string(), "Authentication required");
        }
    }
}
