//! Core business logic for the authentication system: registration, login,
//! token refresh and logout, composed from the password hasher, the token
//! service and the credential store.

use std::sync::Arc;

use storefront_database::{StoreError, UserStore};
use storefront_models::auth::{NewUser, PublicUser};

use crate::error::ApiError;
use crate::services::{PasswordHasher, TokenService};

pub struct AuthService {
    store: Arc<dyn UserStore>,
    tokens: TokenService,
    passwords: PasswordHasher,
}

impl AuthService {
    pub fn new(store: Arc<dyn UserStore>, tokens: TokenService, passwords: PasswordHasher) -> Self {
        Self {
            store,
            tokens,
            passwords,
        }
    }

    /// Create an account. The email is normalized, the password hashed, and
    /// uniqueness is left to the store's unique constraint, so a concurrent
    /// duplicate registration loses cleanly instead of racing a lookup.
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        name: Option<String>,
    ) -> Result<PublicUser, ApiError> {
        let email = normalize_email(email);
        let password_hash = self.passwords.hash(password).await?;

        let user = self
            .store
            .create(NewUser {
                email,
                password_hash,
                name,
            })
            .await
            .map_err(|e| match e {
                StoreError::Duplicate => ApiError::DuplicateEmail,
                other => ApiError::Internal(other.into()),
            })?;

        tracing::info!(user_id = user.id, "registered new user");
        Ok(user.into())
    }

    /// Verify credentials and issue a bearer token. An unknown email and a
    /// wrong password produce the identical `InvalidCredentials` error, so
    /// responses cannot be used to enumerate accounts. The distinction is
    /// logged server-side only.
    pub async fn login(&self, email: &str, password: &str) -> Result<String, ApiError> {
        let email = normalize_email(email);

        let user = self
            .store
            .find_by_email(&email)
            .await
            .map_err(|e| ApiError::Internal(e.into()))?;

        let Some(user) = user else {
            tracing::info!("login rejected: unknown email");
            return Err(ApiError::InvalidCredentials);
        };

        if !self.passwords.verify(password, &user.password_hash).await {
            tracing::info!(user_id = user.id, "login rejected: wrong password");
            return Err(ApiError::InvalidCredentials);
        }

        let token = self.tokens.issue(user.id, &user.email)?;
        tracing::info!(user_id = user.id, "login succeeded");
        Ok(token)
    }

    /// Authoritative lookup by id, for handlers that need a fresh record
    /// rather than the claims snapshot.
    pub async fn validate(&self, user_id: i64) -> Result<PublicUser, ApiError> {
        let user = self
            .store
            .find_by_id(user_id)
            .await
            .map_err(|e| ApiError::Internal(e.into()))?;

        user.map(PublicUser::from).ok_or(ApiError::NotFound("User"))
    }

    /// Sliding-session refresh: verify the presented token and re-issue for
    /// the same subject with a fresh expiration. Any verification failure is
    /// `Unauthorized`; there is no separate refresh-token kind.
    pub async fn refresh(&self, token: &str) -> Result<String, ApiError> {
        let claims = self.tokens.verify(token)?;
        let user_id: i64 = claims.sub.parse().map_err(|_| ApiError::Unauthorized)?;

        let token = self.tokens.issue(user_id, &claims.email)?;
        tracing::debug!(user_id, "token refreshed");
        Ok(token)
    }

    /// Acknowledge logout. Issued tokens are self-contained and not tracked,
    /// so nothing can be revoked server-side; they stay valid until expiry.
    /// This is the extension point for a revocation list.
    pub async fn logout(&self, user_id: i64) -> Result<(), ApiError> {
        tracing::info!(user_id, "user logged out");
        Ok(())
    }
}

/// Canonical email form used for storage and lookups: trimmed and
/// ASCII-lowercased, making the uniqueness check case-insensitive.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_ascii_lowercase()
}
