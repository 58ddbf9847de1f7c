use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    /// A storage unique constraint rejected the write (duplicate email).
    #[error("record already exists")]
    Duplicate,
    #[error("database error")]
    Database(#[from] sqlx::Error),
    #[error("migration error")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}

impl StoreError {
    /// Translate unique-constraint violations into [`StoreError::Duplicate`],
    /// leaving every other failure as a plain database error.
    pub fn from_write_error(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = err {
            // Postgres SQLSTATE 23505: unique_violation.
            if db_err.code().as_deref() == Some("23505") {
                return StoreError::Duplicate;
            }
        }
        StoreError::Database(err)
    }
}
