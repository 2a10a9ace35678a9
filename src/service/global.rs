//! Process-wide service accessor.

use std::sync::{
    Arc,
    OnceLock,
};

use super::I18n;
use crate::config::I18nSettings;

/// The process-wide instance, created by the first [`instance`] call.
static INSTANCE: OnceLock<Arc<I18n>> = OnceLock::new();

/// Returns the process-wide service, creating it from `settings` on first use.
///
/// Later calls return the same instance and ignore their `settings`, so the
/// store and its write rules are set up exactly once.
pub fn instance(settings: I18nSettings) -> Arc<I18n> {
    let mut created = false;
    let i18n = INSTANCE.get_or_init(|| {
        created = true;
        Arc::new(I18n::new(settings))
    });
    if !created {
        tracing::debug!("Reusing existing i18n instance");
    }
    Arc::clone(i18n)
}

/// The process-wide service, if [`instance`] has been called.
#[must_use]
pub fn try_instance() -> Option<Arc<I18n>> {
    INSTANCE.get().map(Arc::clone)
}
