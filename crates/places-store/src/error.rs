use thiserror::Error;

/// Result type for store operations
pub type Result<T> = std::result::Result<T, StoreError>;

/// Errors the store hands back to callers
///
/// "Not found" and "nothing to update" are not errors - see `lookup_place`
/// and `update_place`.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error(transparent)]
    Core(#[from] places_core::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Retention window of {0} days is out of range")]
    InvalidRetention(i64),

    #[error("Place store lock was poisoned by a panicking thread")]
    LockPoisoned,
}
