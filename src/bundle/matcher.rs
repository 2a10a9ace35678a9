//! Glob matching and discovery of bundle files.

use std::path::{
    Path,
    PathBuf,
};

use globset::{
    Glob,
    GlobSet,
    GlobSetBuilder,
};
use ignore::WalkBuilder;

use super::BundleError;
use crate::config::BundleConfig;

/// Matches workspace files against `bundles.includePatterns` / `excludePatterns`.
#[derive(Debug, Clone)]
pub struct BundleMatcher {
    /// Root every pattern is relative to
    workspace_root: PathBuf,
    /// `includePatterns`
    include_set: GlobSet,
    /// `excludePatterns`
    exclude_set: GlobSet,
}

impl BundleMatcher {
    /// Compiles the patterns of `config`.
    pub fn new(workspace_root: impl Into<PathBuf>, config: &BundleConfig) -> Result<Self, BundleError> {
        Ok(Self {
            workspace_root: workspace_root.into(),
            include_set: Self::build_glob_set(&config.include_patterns)?,
            exclude_set: Self::build_glob_set(&config.exclude_patterns)?,
        })
    }

    /// Builds one set, naming the first invalid pattern.
    fn build_glob_set(patterns: &[String]) -> Result<GlobSet, BundleError> {
        let mut builder = GlobSetBuilder::new();
        for pattern in patterns {
            let glob = Glob::new(pattern)
                .map_err(|source| BundleError::InvalidPattern { pattern: pattern.clone(), source })?;
            builder.add(glob);
        }
        Ok(builder.build()?)
    }

    #[must_use]
    pub fn workspace_root(&self) -> &Path {
        &self.workspace_root
    }

    /// Returns true if the absolute path lies under the workspace root and is a bundle.
    #[must_use]
    pub fn is_bundle(&self, absolute_path: &Path) -> bool {
        absolute_path
            .strip_prefix(&self.workspace_root)
            .is_ok_and(|relative_path| self.is_bundle_relative(relative_path))
    }

    /// Returns true if the path matches an include pattern and no exclude pattern.
    ///
    /// The path must be relative to the workspace root.
    #[must_use]
    pub fn is_bundle_relative(&self, relative_path: &Path) -> bool {
        self.include_set.is_match(relative_path) && !self.exclude_set.is_match(relative_path)
    }

    /// Walks the workspace and returns matching files, sorted by path.
    #[must_use]
    pub fn find_bundles(&self) -> Vec<PathBuf> {
        let mut found_files = Vec::new();

        for result in WalkBuilder::new(&self.workspace_root)
            .hidden(false)
            .git_ignore(true)
            .git_global(true)
            .git_exclude(true)
            .follow_links(false)
            .build()
        {
            let entry = match result {
                Ok(entry) => entry,
                Err(err) => {
                    tracing::debug!(?err, "Failed to read directory entry");
                    continue;
                }
            };

            if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                continue;
            }

            if self.is_bundle(entry.path()) {
                found_files.push(entry.into_path());
            }
        }

        found_files.sort();
        found_files
    }
}
