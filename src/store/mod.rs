//! Backing document store for translation records.

mod memory;

use std::fmt;
use std::sync::Arc;

use serde::{
    Deserialize,
    Serialize,
};
use thiserror::Error;

pub use memory::MemoryStore;

/// One stored translation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationRecord {
    pub language: String,
    pub base_string: String,
    pub translated_string: String,
}

impl TranslationRecord {
    #[must_use]
    pub fn new(
        language: impl Into<String>,
        base_string: impl Into<String>,
        translated_string: impl Into<String>,
    ) -> Self {
        Self {
            language: language.into(),
            base_string: base_string.into(),
            translated_string: translated_string.into(),
        }
    }
}

/// `{language}` or `{language, baseString}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub language: String,
    pub base_string: Option<String>,
}

impl Filter {
    /// Every record of `language`.
    #[must_use]
    pub fn language(language: impl Into<String>) -> Self {
        Self { language: language.into(), base_string: None }
    }

    /// The records of `language` keyed by `base_string`.
    #[must_use]
    pub fn entry(language: impl Into<String>, base_string: impl Into<String>) -> Self {
        Self { language: language.into(), base_string: Some(base_string.into()) }
    }

    #[must_use]
    pub fn matches(&self, record: &TranslationRecord) -> bool {
        record.language == self.language
            && self.base_string.as_ref().is_none_or(|base| *base == record.base_string)
    }
}

/// Who performs a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// The owning service; never checked against [`WriteRules`].
    Server,
    /// An external client; allowed only when the matching rule says so.
    Client,
}

/// Authorization predicate evaluated on every client write.
pub type WriteRule = Arc<dyn Fn() -> bool + Send + Sync>;

/// Client write authorization registered through [`DocumentStore::allow`].
#[derive(Clone)]
pub struct WriteRules {
    pub insert: WriteRule,
    /// Consulted by stores that modify records in place. [`MemoryStore`] only
    /// inserts and removes, so it never calls this rule.
    pub update: WriteRule,
    pub remove: WriteRule,
}

impl WriteRules {
    /// Same predicate for every operation.
    pub fn uniform(rule: impl Fn() -> bool + Send + Sync + 'static) -> Self {
        let rule: WriteRule = Arc::new(rule);
        Self { insert: Arc::clone(&rule), update: Arc::clone(&rule), remove: rule }
    }
}

impl fmt::Debug for WriteRules {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WriteRules")
            .field("insert", &"<fn>")
            .field("update", &"<fn>")
            .field("remove", &"<fn>")
            .finish()
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A client write was rejected by the registered [`WriteRules`].
    #[error("Client {operation} on '{store}' is not allowed")]
    AccessDenied { operation: &'static str, store: String },
}

/// Document store holding translation records.
///
/// Reads return records in insertion order, so `find_one` yields the first
/// inserted match when duplicates exist.
pub trait DocumentStore: fmt::Debug + Send + Sync {
    /// Collection name.
    fn name(&self) -> &str;

    fn find(&self, filter: &Filter) -> Vec<TranslationRecord>;

    fn find_one(&self, filter: &Filter) -> Option<TranslationRecord>;

    /// # Errors
    /// [`StoreError::AccessDenied`] for a client insert the rules reject.
    fn insert(&self, origin: Origin, record: TranslationRecord) -> Result<(), StoreError>;

    /// Removes every matching record and returns how many were removed.
    ///
    /// # Errors
    /// [`StoreError::AccessDenied`] for a client removal the rules reject.
    fn remove(&self, origin: Origin, filter: &Filter) -> Result<usize, StoreError>;

    /// Registers the rules gating client writes. Client writes are denied until then.
    fn allow(&self, rules: WriteRules);
}
