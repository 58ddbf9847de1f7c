//! Password hashing module: bcrypt with a fixed work factor.
//!
//! Each hash gets a fresh random salt, so hashing the same password twice
//! yields different stored values that both verify. Hashing is CPU-bound and
//! runs on the blocking thread pool so it never stalls request workers.

use crate::error::ApiError;

#[derive(Debug, Clone)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    /// `cost` is the bcrypt work factor, fixed for the process lifetime.
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    pub async fn hash(&self, plaintext: &str) -> Result<String, ApiError> {
        let cost = self.cost;
        let plaintext = plaintext.to_owned();

        let hash = tokio::task::spawn_blocking(move || bcrypt::hash(plaintext, cost))
            .await
            .map_err(|e| ApiError::Internal(e.into()))?
            .map_err(|e| ApiError::Internal(e.into()))?;

        Ok(hash)
    }

    /// Check a plaintext password against a stored hash. Mismatch returns
    /// `false`; so does a malformed stored hash. A broken record must read
    /// as a failed verification, not a crash.
    pub async fn verify(&self, plaintext: &str, hash: &str) -> bool {
        let plaintext = plaintext.to_owned();
        let hash = hash.to_owned();

        match tokio::task::spawn_blocking(move || bcrypt::verify(plaintext, &hash)).await {
            Ok(Ok(matched)) => matched,
            Ok(Err(e)) => {
                tracing::warn!("password verification failed on stored hash: {e}");
                false
            }
            Err(e) => {
                tracing::error!("password verification task panicked: {e}");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Minimum bcrypt cost keeps the test suite fast; the algorithm is the
    // same at every cost.
    fn hasher() -> PasswordHasher {
        PasswordHasher::new(4)
    }

    #[tokio::test]
    async fn hash_then_verify_round_trips() {
        let hasher = hasher();
        let hash = hasher.hash("secret123").await.unwrap();
        assert!(hasher.verify("secret123", &hash).await);
    }

    #[tokio::test]
    async fn wrong_password_does_not_verify() {
        let hasher = hasher();
        let hash = hasher.hash("secret123").await.unwrap();
        assert!(!hasher.verify("secret124", &hash).await);
        assert!(!hasher.verify("", &hash).await);
    }

    #[tokio::test]
    async fn same_password_hashes_to_different_values() {
        let hasher = hasher();
        let first = hasher.hash("secret123").await.unwrap();
        let second = hasher.hash("secret123").await.unwrap();
        assert_ne!(first, second);
        assert!(hasher.verify("secret123", &first).await);
        assert!(hasher.verify("secret123", &second).await);
    }

    #[tokio::test]
    async fn malformed_stored_hash_reads_as_failed_verification() {
        let hasher = hasher();
        assert!(!hasher.verify("secret123", "not-a-bcrypt-hash").await);
        assert!(!hasher.verify("secret123", "").await);
    }
}
