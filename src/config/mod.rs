//! Settings, validation and the workspace config file.
mod loader;
mod manager;
mod types;

pub use loader::CONFIG_FILE_NAME;
pub use manager::{
    ConfigManager,
    SettingsSource,
};
pub use types::{
    BundleConfig,
    ConfigError,
    I18nSettings,
    ValidationError,
};
