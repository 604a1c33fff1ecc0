//! Storage-specific error type wrapping sqlx errors.

use arthur_domain::error::ArthurError;

/// Errors originating from the `SQLite` storage layer.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// A query or connection failed.
    #[error("database error")]
    Database(#[from] sqlx::Error),

    /// Failed to run migrations.
    #[error("migration error")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A stored row does not hold a valid state.
    #[error("corrupt row at {path}: {reason}")]
    Corrupt { path: String, reason: String },
}

impl From<StorageError> for ArthurError {
    fn from(err: StorageError) -> Self {
        Self::Storage(Box::new(err))
    }
}
