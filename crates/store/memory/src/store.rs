use std::collections::{BTreeMap, HashMap};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use rulr_store::error::StoreError;
use rulr_store::rule::{RuleId, StoredRule};
use rulr_store::store::RuleStore;

/// The table: rows ordered by id plus a unique index on text.
#[derive(Debug, Default)]
struct Table {
    rows: BTreeMap<RuleId, String>,
    by_text: HashMap<String, RuleId>,
    last_id: i64,
}

impl Table {
    fn insert(&mut self, text: &str) -> Result<RuleId, StoreError> {
        if self.by_text.contains_key(text) {
            return Err(StoreError::Duplicate(text.to_owned()));
        }
        self.last_id += 1;
        let id = RuleId(self.last_id);
        self.rows.insert(id, text.to_owned());
        self.by_text.insert(text.to_owned(), id);
        Ok(id)
    }

    fn remove(&mut self, id: RuleId) -> bool {
        match self.rows.remove(&id) {
            Some(text) => {
                self.by_text.remove(&text);
                true
            }
            None => false,
        }
    }
}

/// In-memory [`RuleStore`].
///
/// All operations take a single mutex, so `replace` is atomic with respect
/// to every other call. Ids start at 1 and are never reused.
#[derive(Debug, Default)]
pub struct MemoryRuleStore {
    table: Mutex<Table>,
}

impl MemoryRuleStore {
    /// Create a new, empty in-memory rule store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Table>, StoreError> {
        self.table
            .lock()
            .map_err(|e| StoreError::Backend(format!("rule table lock poisoned: {e}")))
    }
}

#[async_trait]
impl RuleStore for MemoryRuleStore {
    async fn insert_unique(&self, text: &str) -> Result<RuleId, StoreError> {
        self.lock()?.insert(text)
    }

    async fn list_all(&self) -> Result<Vec<StoredRule>, StoreError> {
        let table = self.lock()?;
        Ok(table
            .rows
            .iter()
            .map(|(id, text)| StoredRule {
                id: *id,
                text: text.clone(),
            })
            .collect())
    }

    async fn delete(&self, id: RuleId) -> Result<bool, StoreError> {
        Ok(self.lock()?.remove(id))
    }

    async fn delete_many(&self, ids: &[RuleId]) -> Result<u64, StoreError> {
        let mut table = self.lock()?;
        let removed = ids.iter().filter(|id| table.remove(**id)).count();
        Ok(removed as u64)
    }

    async fn replace(&self, ids: &[RuleId], text: &str) -> Result<RuleId, StoreError> {
        let mut table = self.lock()?;

        // Reject before touching any row so a failed replace deletes nothing.
        if let Some(existing) = table.by_text.get(text)
            && !ids.contains(existing)
        {
            return Err(StoreError::Duplicate(text.to_owned()));
        }

        for id in ids {
            table.remove(*id);
        }
        table.insert(text)
    }
}
