use async_trait::async_trait;

use crate::error::StoreError;
use crate::rule::{RuleId, StoredRule};

/// Trait for persisting rule texts.
///
/// Rule text is unique across the store. Implementations must be
/// `Send + Sync` and safe for concurrent access.
#[async_trait]
pub trait RuleStore: Send + Sync {
    /// Insert a rule text, returning its new id.
    ///
    /// Returns [`StoreError::Duplicate`] if the exact text is already stored.
    async fn insert_unique(&self, text: &str) -> Result<RuleId, StoreError>;

    /// List every stored rule ordered by id.
    async fn list_all(&self) -> Result<Vec<StoredRule>, StoreError>;

    /// Delete a rule. Returns `true` if it existed.
    async fn delete(&self, id: RuleId) -> Result<bool, StoreError>;

    /// Delete several rules, ignoring ids that do not exist. Returns the
    /// number of rules removed.
    async fn delete_many(&self, ids: &[RuleId]) -> Result<u64, StoreError>;

    /// Atomically delete `ids` and insert `text`.
    ///
    /// If `text` is a duplicate of a rule that is not among `ids`, nothing is
    /// deleted and [`StoreError::Duplicate`] is returned.
    async fn replace(&self, ids: &[RuleId], text: &str) -> Result<RuleId, StoreError>;
}
