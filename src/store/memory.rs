use std::sync::{
    PoisonError,
    RwLock,
};

use super::{
    DocumentStore,
    Filter,
    Origin,
    StoreError,
    TranslationRecord,
    WriteRule,
    WriteRules,
};

/// In-process [`DocumentStore`].
#[derive(Debug)]
pub struct MemoryStore {
    /// Collection name
    name: String,
    /// Records in insertion order
    records: RwLock<Vec<TranslationRecord>>,
    /// Client write rules, `None` until [`DocumentStore::allow`] is called
    rules: RwLock<Option<WriteRules>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), records: RwLock::new(Vec::new()), rules: RwLock::new(None) }
    }

    /// Number of stored records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn authorize(
        &self,
        origin: Origin,
        operation: &'static str,
        select: impl Fn(&WriteRules) -> &WriteRule,
    ) -> Result<(), StoreError> {
        if origin == Origin::Server {
            return Ok(());
        }
        let allowed = self
            .rules
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|rules| select(rules)());
        if allowed {
            Ok(())
        } else {
            tracing::debug!(store = %self.name, operation, "Rejected client write");
            Err(StoreError::AccessDenied { operation, store: self.name.clone() })
        }
    }
}

impl DocumentStore for MemoryStore {
    fn name(&self) -> &str {
        &self.name
    }

    fn find(&self, filter: &Filter) -> Vec<TranslationRecord> {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|record| filter.matches(record))
            .cloned()
            .collect()
    }

    fn find_one(&self, filter: &Filter) -> Option<TranslationRecord> {
        self.records
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|record| filter.matches(record))
            .cloned()
    }

    fn insert(&self, origin: Origin, record: TranslationRecord) -> Result<(), StoreError> {
        self.authorize(origin, "insert", |rules| &rules.insert)?;
        self.records.write().unwrap_or_else(PoisonError::into_inner).push(record);
        Ok(())
    }

    fn remove(&self, origin: Origin, filter: &Filter) -> Result<usize, StoreError> {
        self.authorize(origin, "remove", |rules| &rules.remove)?;
        let mut records = self.records.write().unwrap_or_else(PoisonError::into_inner);
        let before = records.len();
        records.retain(|record| !filter.matches(record));
        Ok(before - records.len())
    }

    fn allow(&self, rules: WriteRules) {
        *self.rules.write().unwrap_or_else(PoisonError::into_inner) = Some(rules);
    }
}
