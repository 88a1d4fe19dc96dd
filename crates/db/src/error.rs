use setuphub_core::error::CoreError;

/// Errors from the engagement storage layer.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The store could not be reached at all.
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    /// A write was rejected before reaching storage.
    #[error("Validation failed: {0}")]
    Validation(String),
}

impl From<validator::ValidationErrors> for StoreError {
    fn from(errors: validator::ValidationErrors) -> Self {
        StoreError::Validation(errors.to_string())
    }
}

impl From<StoreError> for CoreError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Database(
                e @ (sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed | sqlx::Error::Io(_)),
            ) => CoreError::ServiceUnavailable(format!("engagement storage: {e}")),
            StoreError::Database(e) => CoreError::Internal(e.to_string()),
            StoreError::Unavailable(msg) => {
                CoreError::ServiceUnavailable(format!("engagement storage: {msg}"))
            }
            StoreError::Validation(msg) => CoreError::Validation(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn pool_and_io_failures_are_unavailability() {
        assert_matches!(
            CoreError::from(StoreError::Database(sqlx::Error::PoolTimedOut)),
            CoreError::ServiceUnavailable(_)
        );
        assert_matches!(
            CoreError::from(StoreError::Database(sqlx::Error::PoolClosed)),
            CoreError::ServiceUnavailable(_)
        );
    }

    #[test]
    fn other_database_errors_are_internal() {
        assert_matches!(
            CoreError::from(StoreError::Database(sqlx::Error::RowNotFound)),
            CoreError::Internal(_)
        );
    }
}
