use domain::RepositoryError;
use thiserror::Error;

/// Errors raised by the storage backends.
#[derive(Debug, Error)]
pub enum StorageError {
    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A stored JSON column could not be decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<StorageError> for RepositoryError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::Database(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                RepositoryError::UniqueViolation(
                    db_err.constraint().unwrap_or("unique").to_string(),
                )
            }
            StorageError::Serialization(e) => RepositoryError::Corrupt(e.to_string()),
            other => RepositoryError::Backend(Box::new(other)),
        }
    }
}

/// Shorthand used by the PostgreSQL repositories.
pub(crate) fn db(err: sqlx::Error) -> RepositoryError {
    let err = RepositoryError::from(StorageError::from(err));
    if !matches!(err, RepositoryError::UniqueViolation(_)) {
        tracing::error!(error = %err, "database query failed");
        metrics::counter!("storage_errors_total", "backend" => "postgres").increment(1);
    }
    err
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn other_database_errors_become_backend_errors() {
        let err: RepositoryError = StorageError::Database(sqlx::Error::RowNotFound).into();
        assert!(matches!(err, RepositoryError::Backend(_)));
    }

    #[test]
    fn bad_json_becomes_corrupt() {
        let json_err = serde_json::from_str::<Vec<String>>("{").unwrap_err();
        let err: RepositoryError = StorageError::from(json_err).into();
        assert!(matches!(err, RepositoryError::Corrupt(_)));
    }
}
