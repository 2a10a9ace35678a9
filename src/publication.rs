//! Subscriber side of the per-language publication.

use std::fmt;
use std::sync::{
    Arc,
    OnceLock,
    PoisonError,
    RwLock,
};

use crate::reactive::SubscriptionId;
use crate::service::I18n;
use crate::store::TranslationRecord;

/// Records mirrored from one publication.
#[derive(Debug, Default)]
struct Mirror {
    /// Language the records were published for
    language: String,
    /// Published records in store order
    records: Vec<TranslationRecord>,
}

/// Client-side copy of the records published for the active language.
///
/// Re-subscribes whenever the service language changes. The service only keeps
/// a weak reference, so dropping the last `Arc<ClientReplica>` ends the
/// subscription.
pub struct ClientReplica {
    /// Service the replica subscribes to
    i18n: Arc<I18n>,
    /// Current copy
    mirror: RwLock<Mirror>,
    /// Language observer registered on `i18n`
    subscription: OnceLock<SubscriptionId>,
}

impl ClientReplica {
    /// Subscribes to the active language and follows later language changes.
    #[must_use]
    pub fn attach(i18n: Arc<I18n>) -> Arc<Self> {
        let replica = Arc::new(Self {
            i18n,
            mirror: RwLock::new(Mirror::default()),
            subscription: OnceLock::new(),
        });
        replica.refresh();

        let weak = Arc::downgrade(&replica);
        let id = replica.i18n.subscribe(move |language| {
            if let Some(replica) = weak.upgrade() {
                replica.pull(language);
            }
        });
        if replica.subscription.set(id).is_err() {
            tracing::warn!("Replica subscribed twice");
        }

        replica
    }

    /// Copies the publication of the current service language again.
    pub fn refresh(&self) {
        self.pull(&self.i18n.language());
    }

    /// Language of the mirrored publication.
    #[must_use]
    pub fn language(&self) -> String {
        self.mirror.read().unwrap_or_else(PoisonError::into_inner).language.clone()
    }

    /// Number of mirrored records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.mirror.read().unwrap_or_else(PoisonError::into_inner).records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Translation of `base` from the replica, or `base` itself.
    #[must_use]
    pub fn translate(&self, base: &str) -> String {
        self.mirror
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .records
            .iter()
            .find(|record| record.base_string == base)
            .filter(|record| !record.translated_string.is_empty())
            .map_or_else(|| base.to_string(), |record| record.translated_string.clone())
    }

    /// Replaces the mirror with the publication of `language`.
    fn pull(&self, language: &str) {
        let records = self.i18n.publish(language);
        tracing::debug!(language, records = records.len(), "Replica subscribed");
        *self.mirror.write().unwrap_or_else(PoisonError::into_inner) =
            Mirror { language: language.to_string(), records };
    }
}

impl Drop for ClientReplica {
    fn drop(&mut self) {
        if let Some(id) = self.subscription.get() {
            self.i18n.unsubscribe(*id);
        }
    }
}

impl fmt::Debug for ClientReplica {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientReplica")
            .field("language", &self.language())
            .field("records", &self.len())
            .finish_non_exhaustive()
    }
}
