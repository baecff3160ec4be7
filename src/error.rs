use thiserror::Error;

/// Failures surfaced by the persistence layer. The HTTP boundary decides
/// whether these become a status code or are logged and swallowed.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("document not found")]
    NotFound,

    #[error("duplicate key")]
    Conflict,

    #[error("malformed stored document: {0}")]
    InvalidDocument(#[from] serde_json::Error),

    #[error(transparent)]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => StoreError::NotFound,
            sqlx::Error::Database(db) if db.is_unique_violation() => StoreError::Conflict,
            _ => StoreError::Database(err),
        }
    }
}
