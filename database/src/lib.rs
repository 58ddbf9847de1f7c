//! Data-access layer over PostgreSQL.
//!
//! Exposes the pool lifecycle, the [`users::UserStore`] trait the auth core
//! consumes, and the catalog repository. Email uniqueness is enforced here,
//! by the storage unique constraint, never by application-level
//! check-then-create.

pub mod catalog;
pub mod error;
pub mod users;

pub use catalog::CatalogRepository;
pub use error::StoreError;
pub use users::{PgUserStore, UserStore};

// Re-export so dependents issue ad hoc queries (health checks) without
// pinning their own sqlx version.
pub use sqlx;

use sqlx::{postgres::PgPoolOptions, PgPool};

/// Connection manager for the storefront database.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;

        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Apply the embedded schema migrations.
    pub async fn run_migrations(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        tracing::info!("database migrations applied");
        Ok(())
    }
}
