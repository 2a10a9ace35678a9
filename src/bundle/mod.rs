//! Translation bundles: JSON files in the workspace loaded at start-up.
//!
//! A bundle maps base strings to translations and is named after its language,
//! either by file stem (`locales/pt.json`) or by parent directory
//! (`locales/pt/messages.json`).

mod matcher;

use std::path::{
    Path,
    PathBuf,
};

pub use matcher::BundleMatcher;
use serde_json::Value;
use thiserror::Error;

use crate::config::BundleConfig;
use crate::service::{
    I18n,
    ServiceError,
    Translations,
};

#[derive(Error, Debug)]
pub enum BundleError {
    #[error("Invalid bundle pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("Failed to build glob set: {0}")]
    GlobSetBuild(#[from] globset::Error),

    #[error("No language code in bundle path {}", .path.display())]
    UnknownLanguage { path: PathBuf },

    #[error("Failed to read bundle {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse bundle {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Service(#[from] ServiceError),
}

/// Parsed bundle file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bundle {
    pub path: PathBuf,
    pub language: String,
    pub translations: Translations,
}

/// Loads every bundle under `workspace_root` into `i18n` and returns the number
/// of records inserted.
///
/// Files are read concurrently and inserted in path order. Unreadable files,
/// invalid JSON and paths without a language code are skipped with a warning.
///
/// # Errors
/// - invalid include/exclude pattern
/// - a store write failure
pub async fn load_bundles(
    i18n: &I18n,
    workspace_root: &Path,
    config: &BundleConfig,
) -> Result<usize, BundleError> {
    tracing::debug!(workspace_root = %workspace_root.display(), "Loading bundles");

    let matcher = BundleMatcher::new(workspace_root, config)?;
    let files = matcher.find_bundles();

    // 並列で読み込み、挿入はパス順
    let bundles = futures::future::join_all(files.iter().map(|file| read_bundle(file))).await;

    let mut inserted = 0;
    for bundle in bundles {
        let bundle = match bundle {
            Ok(bundle) => bundle,
            Err(e) => {
                tracing::warn!("Skipping bundle: {e}");
                continue;
            }
        };
        let count = i18n.insert(&bundle.language, bundle.translations)?;
        tracing::debug!(path = %bundle.path.display(), language = %bundle.language, count, "Loaded bundle");
        inserted += count;
    }

    tracing::info!(files = files.len(), records = inserted, "Bundles loaded");
    Ok(inserted)
}

/// Reads and parses one bundle file.
///
/// # Errors
/// - no language code in the path
/// - read or JSON parse failure
/// - a document that is neither an object nor a list of pairs
pub async fn read_bundle(path: &Path) -> Result<Bundle, BundleError> {
    let language = bundle_language(path)
        .ok_or_else(|| BundleError::UnknownLanguage { path: path.to_path_buf() })?;

    let content = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| BundleError::Read { path: path.to_path_buf(), source })?;
    let value: Value = serde_json::from_str(&content)
        .map_err(|source| BundleError::Parse { path: path.to_path_buf(), source })?;
    let translations = Translations::try_from(&value)?;

    Ok(Bundle { path: path.to_path_buf(), language, translations })
}

/// Language of a bundle: the file stem if it looks like a language code,
/// otherwise the parent directory name.
#[must_use]
pub fn bundle_language(path: &Path) -> Option<String> {
    let stem = path.file_stem().and_then(|stem| stem.to_str())?;
    if is_language_code(stem) {
        return Some(stem.to_string());
    }
    let parent = path.parent()?.file_name()?.to_str()?;
    is_language_code(parent).then(|| parent.to_string())
}

/// `ll`, `lll`, then `-`/`_` separated subtags of 2 to 8 alphanumerics (`pt-BR`, `zh_Hant`).
fn is_language_code(name: &str) -> bool {
    let mut parts = name.split(['-', '_']);
    let primary_ok = parts.next().is_some_and(|primary| {
        (2..=3).contains(&primary.len()) && primary.chars().all(|c| c.is_ascii_alphabetic())
    });
    primary_ok
        && parts.all(|part| {
            (2..=8).contains(&part.len()) && part.chars().all(|c| c.is_ascii_alphanumeric())
        })
}
