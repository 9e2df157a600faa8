use thiserror::Error;

/// Errors from rule store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The rule text is already stored. Callers usually treat this as
    /// informational rather than as a failure.
    #[error("duplicate rule: {0}")]
    Duplicate(String),

    /// The backend could not be reached or the connection pool not created.
    #[error("connection error: {0}")]
    Connection(String),

    /// Any other backend failure, such as a failed query or migration.
    #[error("backend error: {0}")]
    Backend(String),
}

impl StoreError {
    /// Returns `true` for [`StoreError::Duplicate`].
    pub fn is_duplicate(&self) -> bool {
        matches!(self, Self::Duplicate(_))
    }
}
