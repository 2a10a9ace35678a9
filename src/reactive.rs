//! Observable cell holding the active language.

use std::fmt;
use std::sync::atomic::{
    AtomicU64,
    Ordering,
};
use std::sync::{
    Arc,
    PoisonError,
    RwLock,
};

/// Callback invoked with the new language after every [`LanguageCell::set`].
pub type Observer = Arc<dyn Fn(&str) + Send + Sync>;

/// Handle returned by [`LanguageCell::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Read/write cell for the active language.
///
/// Observers run synchronously inside [`set`](Self::set), in registration
/// order, after the new value is visible. No lock is held while they run, so
/// an observer may read the cell or subscribe others.
pub struct LanguageCell {
    /// Current language
    value: RwLock<String>,
    /// Registered observers in registration order
    observers: RwLock<Vec<(SubscriptionId, Observer)>>,
    /// Next subscription id
    next_id: AtomicU64,
}

impl LanguageCell {
    #[must_use]
    pub fn new(initial: impl Into<String>) -> Self {
        Self {
            value: RwLock::new(initial.into()),
            observers: RwLock::new(Vec::new()),
            next_id: AtomicU64::new(0),
        }
    }

    #[must_use]
    pub fn get(&self) -> String {
        self.value.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Stores `language` and notifies every observer, even when unchanged.
    pub fn set(&self, language: impl Into<String>) {
        let language = language.into();
        *self.value.write().unwrap_or_else(PoisonError::into_inner) = language.clone();

        let observers: Vec<Observer> = self
            .observers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(|(_, observer)| Arc::clone(observer))
            .collect();
        for observer in observers {
            observer(&language);
        }
    }

    pub fn subscribe(&self, observer: impl Fn(&str) + Send + Sync + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let observer: Observer = Arc::new(observer);
        self.observers.write().unwrap_or_else(PoisonError::into_inner).push((id, observer));
        id
    }

    /// Returns whether `id` was still subscribed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut observers = self.observers.write().unwrap_or_else(PoisonError::into_inner);
        let before = observers.len();
        observers.retain(|(existing, _)| *existing != id);
        observers.len() != before
    }

    #[must_use]
    pub fn observer_count(&self) -> usize {
        self.observers.read().unwrap_or_else(PoisonError::into_inner).len()
    }
}

impl fmt::Debug for LanguageCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LanguageCell")
            .field("value", &self.get())
            .field("observers", &self.observer_count())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Mutex;

    use googletest::prelude::*;

    use super::*;

    #[googletest::test]
    fn new_holds_initial_value() {
        let cell = LanguageCell::new("en");

        expect_that!(cell.get(), eq("en"));
        expect_that!(cell.observer_count(), eq(0));
    }

    #[googletest::test]
    fn set_notifies_in_registration_order() {
        let cell = LanguageCell::new("en");
        let seen = Arc::new(Mutex::new(Vec::new()));

        for name in ["first", "second"] {
            let seen = Arc::clone(&seen);
            cell.subscribe(move |language| {
                seen.lock().unwrap().push(format!("{name}:{language}"));
            });
        }
        cell.set("pt");

        expect_that!(seen.lock().unwrap().clone(), elements_are![eq("first:pt"), eq("second:pt")]);
    }

    #[googletest::test]
    fn observer_sees_new_value_through_cell() {
        let cell = Arc::new(LanguageCell::new("en"));
        let seen = Arc::new(Mutex::new(None));

        let reader = Arc::downgrade(&cell);
        let sink = Arc::clone(&seen);
        cell.subscribe(move |_| {
            if let Some(cell) = reader.upgrade() {
                *sink.lock().unwrap() = Some(cell.get());
            }
        });
        cell.set("ja");

        expect_that!(seen.lock().unwrap().clone(), some(eq("ja")));
    }

    #[googletest::test]
    fn unsubscribe_stops_notifications() {
        let cell = LanguageCell::new("en");
        let calls = Arc::new(AtomicU64::new(0));

        let counter = Arc::clone(&calls);
        let id = cell.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        cell.set("pt");

        expect_that!(cell.unsubscribe(id), eq(true));
        expect_that!(cell.unsubscribe(id), eq(false));

        cell.set("es");

        expect_that!(calls.load(Ordering::SeqCst), eq(1));
        expect_that!(cell.get(), eq("es"));
    }
}
