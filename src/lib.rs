//! simple-i18n
//!
//! 言語ごとの翻訳レコード、現在言語の切り替え、printf 形式の `t` ヘルパーを提供する。

pub mod bundle;
pub mod config;
pub mod format;
pub mod helper;
pub mod publication;
pub mod reactive;
pub mod server;
pub mod service;
pub mod store;

pub use config::I18nSettings;
pub use format::vformat;
pub use helper::t;
pub use publication::ClientReplica;
pub use service::{
    I18n,
    RemoveTarget,
    ServiceError,
    Translations,
    instance,
};
