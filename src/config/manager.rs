//! ワークスペースごとの設定解決

use std::fmt;
use std::path::{
    Path,
    PathBuf,
};

use super::{
    CONFIG_FILE_NAME,
    ConfigError,
    I18nSettings,
    loader,
};

/// 設定の出どころ
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum SettingsSource {
    /// 設定ファイルなし
    #[default]
    Defaults,
    /// 読み込んだ設定ファイル
    File(PathBuf),
}

impl fmt::Display for SettingsSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Defaults => f.write_str("built-in defaults"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// 検証済みの設定と、その読み込み元のワークスペース
#[derive(Default, Debug, Clone)]
pub struct ConfigManager {
    /// 検証済み設定
    settings: I18nSettings,
    /// バンドル探索の起点
    workspace_root: Option<PathBuf>,
    /// `settings` の出どころ
    source: SettingsSource,
}

impl ConfigManager {
    /// `workspace_root` の設定ファイルを読み、検証して保持する
    ///
    /// ルートが `None` か、ルートに設定ファイルがなければデフォルト値を使う。
    ///
    /// # Errors
    /// - ファイル読み込みエラー
    /// - JSON パースエラー
    /// - バリデーションエラー（全件まとめて返す）
    pub fn load(workspace_root: Option<PathBuf>) -> Result<Self, ConfigError> {
        let loaded = match &workspace_root {
            Some(root) => loader::load_from_workspace(root)?
                .map(|settings| (settings, SettingsSource::File(root.join(CONFIG_FILE_NAME)))),
            None => None,
        };
        let (settings, source) = loaded.unwrap_or_default();

        settings.validate().map_err(ConfigError::ValidationErrors)?;
        tracing::debug!(%source, ?settings, "Settings resolved");

        Ok(Self { settings, workspace_root, source })
    }

    #[must_use]
    pub const fn settings(&self) -> &I18nSettings {
        &self.settings
    }

    #[must_use]
    pub fn workspace_root(&self) -> Option<&Path> {
        self.workspace_root.as_deref()
    }

    #[must_use]
    pub const fn source(&self) -> &SettingsSource {
        &self.source
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::fs;

    use googletest::prelude::*;
    use rstest::*;
    use tempfile::TempDir;

    use super::*;

    #[fixture]
    fn workspace() -> TempDir {
        TempDir::new().unwrap()
    }

    /// 設定ファイルを書き込む
    fn write_config(dir: &TempDir, content: &str) {
        fs::write(dir.path().join(CONFIG_FILE_NAME), content).unwrap();
    }

    /// ワークスペースなし: デフォルト値
    #[rstest]
    fn without_workspace_uses_defaults() {
        let manager = ConfigManager::load(None).unwrap();

        assert_that!(manager.settings(), eq(&I18nSettings::default()));
        assert_that!(manager.workspace_root(), none());
        assert_that!(manager.source(), eq(&SettingsSource::Defaults));
    }

    /// 設定ファイルなし: ルートは保持し、デフォルト値
    #[rstest]
    fn workspace_without_config_file(workspace: TempDir) {
        let manager = ConfigManager::load(Some(workspace.path().to_path_buf())).unwrap();

        assert_that!(manager.settings().default_language, eq("en"));
        assert_that!(manager.workspace_root(), some(eq(workspace.path())));
        assert_that!(manager.source(), eq(&SettingsSource::Defaults));
    }

    /// 設定ファイルあり: 読み込み元を記録する
    #[rstest]
    fn config_file_is_recorded_as_source(workspace: TempDir) {
        write_config(&workspace, r#"{"defaultLanguage": "pt", "storeName": "strings"}"#);

        let manager = ConfigManager::load(Some(workspace.path().to_path_buf())).unwrap();

        assert_that!(manager.settings().default_language, eq("pt"));
        assert_that!(manager.settings().store_name, eq("strings"));
        assert_that!(
            manager.source(),
            eq(&SettingsSource::File(workspace.path().join(CONFIG_FILE_NAME)))
        );
    }

    /// バリデーションエラーは全件まとめて返る
    #[rstest]
    fn invalid_config_is_rejected(workspace: TempDir) {
        write_config(&workspace, r#"{"defaultLanguage": "", "storeName": ""}"#);

        let result = ConfigManager::load(Some(workspace.path().to_path_buf()));

        assert_that!(
            result,
            err(matches_pattern!(ConfigError::ValidationErrors(len(eq(2)))))
        );
    }

    /// 壊れた JSON はパースエラー
    #[rstest]
    fn malformed_config_is_a_parse_error(workspace: TempDir) {
        write_config(&workspace, "{not json");

        let result = ConfigManager::load(Some(workspace.path().to_path_buf()));

        assert_that!(result, err(matches_pattern!(ConfigError::ParseError(anything()))));
    }

    #[rstest]
    fn source_display() {
        assert_that!(SettingsSource::Defaults.to_string(), eq("built-in defaults"));
        assert_that!(
            SettingsSource::File(PathBuf::from("/ws/.simple-i18n.json")).to_string(),
            eq("/ws/.simple-i18n.json")
        );
    }
}
