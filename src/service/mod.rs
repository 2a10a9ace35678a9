//! Translation service: stored translations plus the active language.

mod global;
mod input;

use std::fmt;
use std::sync::Arc;

pub use global::{
    instance,
    try_instance,
};
pub use input::{
    RemoveTarget,
    Translations,
};
use thiserror::Error;

use crate::config::I18nSettings;
use crate::reactive::{
    LanguageCell,
    SubscriptionId,
};
use crate::store::{
    DocumentStore,
    Filter,
    MemoryStore,
    Origin,
    StoreError,
    TranslationRecord,
    WriteRules,
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// Insert or remove called with an unsupported argument shape.
    #[error("Expected {expected}. Got: {found}")]
    InvalidArgument { expected: &'static str, found: &'static str },

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Translation service.
///
/// Construct one per process (or use [`instance`]) and share it as `Arc<I18n>`.
pub struct I18n {
    /// Settings the service was created with
    settings: I18nSettings,
    /// Backing store, written only through this service
    store: Arc<dyn DocumentStore>,
    /// Active language
    language: LanguageCell,
}

impl I18n {
    /// Creates a service backed by a fresh [`MemoryStore`] named after `storeName`.
    #[must_use]
    pub fn new(settings: I18nSettings) -> Self {
        let store = Arc::new(MemoryStore::new(settings.store_name.clone()));
        Self::with_store(settings, store)
    }

    /// Creates a service over an existing store.
    ///
    /// Registers write rules on `store` so client writes follow `allowExternalWrites`.
    #[must_use]
    pub fn with_store(settings: I18nSettings, store: Arc<dyn DocumentStore>) -> Self {
        let allow_external_writes = settings.allow_external_writes;
        store.allow(WriteRules::uniform(move || allow_external_writes));

        tracing::debug!(
            store = store.name(),
            default_language = %settings.default_language,
            allow_external_writes,
            "Initialized i18n service"
        );

        Self { language: LanguageCell::new(settings.default_language.clone()), settings, store }
    }

    #[must_use]
    pub const fn settings(&self) -> &I18nSettings {
        &self.settings
    }

    #[must_use]
    pub fn store(&self) -> &dyn DocumentStore {
        self.store.as_ref()
    }

    /// Inserts `translations` for `language` and returns the number of records added.
    ///
    /// Pairs are inserted in order. The first failure stops the insert; records
    /// already written stay.
    pub fn insert(&self, language: &str, translations: Translations) -> Result<usize, ServiceError> {
        self.insert_as(Origin::Server, language, translations)
    }

    /// Removes records of `language` and returns how many were deleted.
    pub fn remove(&self, language: &str, target: RemoveTarget) -> Result<usize, ServiceError> {
        self.remove_as(Origin::Server, language, target)
    }

    /// Writes performed on behalf of an external client.
    #[must_use]
    pub const fn remote(&self) -> Remote<'_> {
        Remote { i18n: self }
    }

    /// Active language.
    #[must_use]
    pub fn language(&self) -> String {
        self.language.get()
    }

    /// Changes the active language and notifies observers before returning.
    pub fn set_language(&self, language: impl Into<String>) {
        let language = language.into();
        tracing::debug!(language = %language, "Setting current language");
        self.language.set(language);
    }

    /// Registers `observer` to run after every [`set_language`](Self::set_language).
    pub fn subscribe(&self, observer: impl Fn(&str) + Send + Sync + 'static) -> SubscriptionId {
        self.language.subscribe(observer)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.language.unsubscribe(id)
    }

    /// Number of registered language observers.
    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.language.observer_count()
    }

    /// Translation of `base` in the active language, or `base` itself.
    ///
    /// Records with an empty translation count as missing.
    #[must_use]
    pub fn translate(&self, base: &str) -> String {
        let language = self.language();
        match self.store.find_one(&Filter::entry(language.as_str(), base)) {
            Some(record) if !record.translated_string.is_empty() => record.translated_string,
            _ => base.to_string(),
        }
    }

    /// Records published to subscribers of `language`. Empty for an empty name.
    #[must_use]
    pub fn publish(&self, language: &str) -> Vec<TranslationRecord> {
        if language.is_empty() {
            return Vec::new();
        }
        self.store.find(&Filter::language(language))
    }

    /// Inserts pair by pair on behalf of `origin`.
    fn insert_as(
        &self,
        origin: Origin,
        language: &str,
        translations: Translations,
    ) -> Result<usize, ServiceError> {
        let mut inserted = 0;
        for (base, translated) in translations.into_pairs() {
            self.store.insert(origin, TranslationRecord::new(language, base, translated))?;
            inserted += 1;
        }
        tracing::debug!(language, inserted, ?origin, "Inserted translations");
        Ok(inserted)
    }

    /// Removes on behalf of `origin`.
    fn remove_as(
        &self,
        origin: Origin,
        language: &str,
        target: RemoveTarget,
    ) -> Result<usize, ServiceError> {
        let removed = match target {
            RemoveTarget::Language => self.store.remove(origin, &Filter::language(language))?,
            RemoveTarget::Single(base) => {
                self.store.remove(origin, &Filter::entry(language, base))?
            }
            RemoveTarget::List(bases) => {
                let mut removed = 0;
                for base in bases {
                    removed += self.store.remove(origin, &Filter::entry(language, base))?;
                }
                removed
            }
        };
        tracing::debug!(language, removed, ?origin, "Removed translations");
        Ok(removed)
    }
}

impl fmt::Debug for I18n {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("I18n")
            .field("settings", &self.settings)
            .field("store", &self.store.name())
            .field("language", &self.language)
            .finish()
    }
}

/// Client-origin writes, allowed only with `allowExternalWrites`.
#[derive(Debug, Clone, Copy)]
pub struct Remote<'a> {
    /// Service the writes go to
    i18n: &'a I18n,
}

impl Remote<'_> {
    pub fn insert(&self, language: &str, translations: Translations) -> Result<usize, ServiceError> {
        self.i18n.insert_as(Origin::Client, language, translations)
    }

    pub fn remove(&self, language: &str, target: RemoveTarget) -> Result<usize, ServiceError> {
        self.i18n.remove_as(Origin::Client, language, target)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use googletest::prelude::*;
    use rstest::*;

    use super::*;

    #[fixture]
    fn i18n() -> I18n {
        I18n::new(I18nSettings::default())
    }

    #[rstest]
    fn starts_with_default_language() {
        let i18n = I18n::new(I18nSettings {
            default_language: "pt".to_string(),
            ..I18nSettings::default()
        });

        assert_that!(i18n.language(), eq("pt"));
    }

    #[rstest]
    fn store_is_named_after_settings() {
        let i18n =
            I18n::new(I18nSettings { store_name: "strings".to_string(), ..I18nSettings::default() });

        assert_that!(i18n.store().name(), eq("strings"));
    }

    #[rstest]
    fn translate_uses_active_language(i18n: I18n) {
        i18n.insert("pt", Translations::single("Hello", "Olá")).unwrap();
        i18n.insert("es", Translations::single("Hello", "Hola")).unwrap();

        assert_that!(i18n.translate("Hello"), eq("Hello"));

        i18n.set_language("pt");
        assert_that!(i18n.translate("Hello"), eq("Olá"));

        i18n.set_language("es");
        assert_that!(i18n.translate("Hello"), eq("Hola"));
    }

    #[rstest]
    fn empty_translation_falls_back(i18n: I18n) {
        i18n.insert("pt", Translations::single("Hello", "")).unwrap();
        i18n.set_language("pt");

        assert_that!(i18n.translate("Hello"), eq("Hello"));
    }

    #[rstest]
    fn bulk_insert_counts_records(i18n: I18n) {
        let inserted = i18n
            .insert(
                "pt",
                Translations::PairList(vec![
                    ["Yes".to_string(), "Sim".to_string()],
                    ["No".to_string(), "Não".to_string()],
                ]),
            )
            .unwrap();

        assert_that!(inserted, eq(2));
        assert_that!(i18n.publish("pt"), len(eq(2)));
    }

    #[rstest]
    fn remove_single_and_list(i18n: I18n) {
        i18n.insert(
            "pt",
            Translations::PairMap(vec![
                ("Yes".to_string(), "Sim".to_string()),
                ("No".to_string(), "Não".to_string()),
                ("Maybe".to_string(), "Talvez".to_string()),
            ]),
        )
        .unwrap();
        i18n.set_language("pt");

        assert_that!(i18n.remove("pt", RemoveTarget::Single("Yes".to_string())).unwrap(), eq(1));
        assert_that!(i18n.translate("Yes"), eq("Yes"));
        assert_that!(i18n.translate("No"), eq("Não"));

        let removed = i18n
            .remove("pt", RemoveTarget::List(vec!["No".to_string(), "Unknown".to_string()]))
            .unwrap();
        assert_that!(removed, eq(1));
        assert_that!(i18n.publish("pt"), elements_are![field!(TranslationRecord.base_string, eq("Maybe"))]);
    }

    #[rstest]
    fn remove_language_keeps_others(i18n: I18n) {
        i18n.insert("pt", Translations::single("Hello", "Olá")).unwrap();
        i18n.insert("es", Translations::single("Hello", "Hola")).unwrap();

        i18n.remove("pt", RemoveTarget::Language).unwrap();

        assert_that!(i18n.publish("pt"), is_empty());
        assert_that!(i18n.publish("es"), len(eq(1)));
    }

    #[rstest]
    fn publish_empty_language_is_empty(i18n: I18n) {
        i18n.insert("", Translations::single("Hello", "???")).unwrap();

        assert_that!(i18n.publish(""), is_empty());
    }

    #[rstest]
    fn observers_run_before_set_language_returns(i18n: I18n) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let id = i18n.subscribe(move |language| sink.lock().unwrap().push(language.to_string()));

        i18n.set_language("ja");
        assert_that!(seen.lock().unwrap().clone(), elements_are![eq("ja")]);

        assert_that!(i18n.unsubscribe(id), eq(true));
        i18n.set_language("ko");
        assert_that!(seen.lock().unwrap().clone(), len(eq(1)));
    }

    #[rstest]
    fn remote_writes_denied_by_default(i18n: I18n) {
        let result = i18n.remote().insert("pt", Translations::single("Hello", "Olá"));

        assert_that!(
            result,
            err(eq(&ServiceError::Store(StoreError::AccessDenied {
                operation: "insert",
                store: "i18n".to_string()
            })))
        );
        assert_that!(i18n.remote().remove("pt", RemoveTarget::Language), err(anything()));
    }

    #[rstest]
    fn remote_writes_allowed_when_configured() {
        let i18n = I18n::new(I18nSettings {
            allow_external_writes: true,
            ..I18nSettings::default()
        });

        assert_that!(i18n.remote().insert("pt", Translations::single("Hello", "Olá")).unwrap(), eq(1));
        assert_that!(i18n.remote().remove("pt", RemoveTarget::Language).unwrap(), eq(1));
    }

    #[rstest]
    fn bulk_insert_stops_at_first_failure() {
        #[derive(Debug)]
        struct FailingStore {
            inner: MemoryStore,
            limit: usize,
        }

        impl DocumentStore for FailingStore {
            fn name(&self) -> &str {
                self.inner.name()
            }
            fn find(&self, filter: &Filter) -> Vec<TranslationRecord> {
                self.inner.find(filter)
            }
            fn find_one(&self, filter: &Filter) -> Option<TranslationRecord> {
                self.inner.find_one(filter)
            }
            fn insert(&self, origin: Origin, record: TranslationRecord) -> std::result::Result<(), StoreError> {
                if self.inner.len() >= self.limit {
                    return Err(StoreError::AccessDenied { operation: "insert", store: "full".to_string() });
                }
                self.inner.insert(origin, record)
            }
            fn remove(&self, origin: Origin, filter: &Filter) -> std::result::Result<usize, StoreError> {
                self.inner.remove(origin, filter)
            }
            fn allow(&self, rules: WriteRules) {
                self.inner.allow(rules);
            }
        }

        let store = Arc::new(FailingStore { inner: MemoryStore::new("i18n"), limit: 2 });
        let i18n = I18n::with_store(I18nSettings::default(), store);

        let result = i18n.insert(
            "pt",
            Translations::PairList(vec![
                ["a".to_string(), "A".to_string()],
                ["b".to_string(), "B".to_string()],
                ["c".to_string(), "C".to_string()],
            ]),
        );

        assert_that!(result, err(anything()));
        assert_that!(
            i18n.publish("pt"),
            elements_are![
                field!(TranslationRecord.base_string, eq("a")),
                field!(TranslationRecord.base_string, eq("b"))
            ]
        );
    }
}
