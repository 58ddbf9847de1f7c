use async_trait::async_trait;
use sqlx::PgPool;

use storefront_models::auth::{NewUser, User};
use storefront_models::users::UpdateUserRequest;

use crate::error::StoreError;

/// The credential store boundary the auth core depends on. Kept to the three
/// operations authentication actually needs; anything wider lives on the
/// concrete [`PgUserStore`].
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, StoreError>;

    /// Insert a new user. Uniqueness on email is the unique constraint's job:
    /// a violation comes back as [`StoreError::Duplicate`].
    async fn create(&self, new_user: NewUser) -> Result<User, StoreError>;
}

#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> Result<Vec<User>, StoreError> {
        let users = sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, name, created_at, updated_at
             FROM users ORDER BY created_at DESC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    pub async fn update(
        &self,
        id: i64,
        changes: &UpdateUserRequest,
    ) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            UPDATE users
            SET email = COALESCE($2, email),
                name = COALESCE($3, name),
                updated_at = now()
            WHERE id = $1
            RETURNING id, email, password_hash, name, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(changes.email.as_deref())
        .bind(changes.name.as_deref())
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::from_write_error)?;

        Ok(user)
    }

    pub async fn delete(&self, id: i64) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "DELETE FROM users WHERE id = $1
             RETURNING id, email, password_hash, name, created_at, updated_at",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }
}

#[async_trait]
impl UserStore for PgUserStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, name, created_at, updated_at
             FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<User>, StoreError> {
        let user = sqlx::query_as::<_, User>(
            "SELECT id, email, password_hash, name, created_at, updated_at
             FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(user)
    }

    async fn create(&self, new_user: NewUser) -> Result<User, StoreError> {
        let user = sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (email, password_hash, name)
            VALUES ($1, $2, $3)
            RETURNING id, email, password_hash, name, created_at, updated_at
            "#,
        )
        .bind(&new_user.email)
        .bind(&new_user.password_hash)
        .bind(new_user.name.as_deref())
        .fetch_one(&self.pool)
        .await
        .map_err(StoreError::from_write_error)?;

        Ok(user)
    }
}
