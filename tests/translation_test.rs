//! End-to-end translation scenarios through the public API.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::fs;
use std::sync::Arc;

use googletest::prelude::*;
use rstest::*;
use serde_json::json;
use simple_i18n::bundle::load_bundles;
use simple_i18n::config::{
    CONFIG_FILE_NAME,
    ConfigManager,
};
use simple_i18n::format::FormatError;
use simple_i18n::helper::{
    ViewHelpers,
    register_translation_helper,
};
use simple_i18n::{
    ClientReplica,
    I18n,
    I18nSettings,
    RemoveTarget,
    Translations,
    t,
};
use tempfile::TempDir;

#[fixture]
fn i18n() -> Arc<I18n> {
    let i18n = Arc::new(I18n::new(I18nSettings::default()));
    i18n.insert("pt", Translations::single("Hello, %s", "Olá, %s")).unwrap();
    i18n
}

#[rstest]
fn greeting_follows_active_language(i18n: Arc<I18n>) {
    i18n.set_language("pt");
    assert_that!(t(&i18n, "Hello, %s", &[json!("Maria")]), ok(eq("Olá, Maria")));

    i18n.set_language("en");
    assert_that!(t(&i18n, "Hello, %s", &[json!("Maria")]), ok(eq("Hello, Maria")));
}

#[rstest]
fn read_after_set_language_sees_new_language(i18n: Arc<I18n>) {
    i18n.set_language("pt");

    assert_that!(i18n.language(), eq("pt"));
    assert_that!(i18n.translate("Hello, %s"), eq("Olá, %s"));
}

#[rstest]
fn removing_language_falls_back_to_base(i18n: Arc<I18n>) {
    i18n.set_language("pt");
    i18n.remove("pt", RemoveTarget::Language).unwrap();

    assert_that!(i18n.translate("Hello, %s"), eq("Hello, %s"));
    assert_that!(t(&i18n, "Hello, %s", &[json!("Maria")]), ok(eq("Hello, Maria")));
}

#[rstest]
#[gtest]
fn array_and_object_bulk_inserts_agree() {
    let from_array = I18n::new(I18nSettings::default());
    let from_object = I18n::new(I18nSettings::default());

    from_array
        .insert(
            "pt",
            Translations::try_from(&json!([["Yes", "Sim"], ["No", "Não"]])).unwrap(),
        )
        .unwrap();
    from_object
        .insert("pt", Translations::try_from(&json!({"Yes": "Sim", "No": "Não"})).unwrap())
        .unwrap();

    from_array.set_language("pt");
    from_object.set_language("pt");
    for base in ["Yes", "No", "Maybe"] {
        expect_that!(from_array.translate(base), eq(&from_object.translate(base)));
    }
}

#[rstest]
fn helper_and_replica_share_the_service(i18n: Arc<I18n>) {
    let mut helpers = ViewHelpers::new();
    register_translation_helper(&mut helpers, Arc::clone(&i18n));
    let replica = ClientReplica::attach(Arc::clone(&i18n));

    i18n.set_language("pt");

    assert_that!(replica.translate("Hello, %s"), eq("Olá, %s"));
    assert_that!(helpers.call("t", &[json!("Hello, %s"), json!("Ana")]), ok(eq("Olá, Ana")));
}

#[rstest]
fn named_arguments_in_translations() {
    let i18n = I18n::new(I18nSettings::default());
    i18n.insert(
        "pt",
        Translations::single("%(user.name)s has %(count)d messages", "%(user.name)s tem %(count)d mensagens"),
    )
    .unwrap();
    i18n.set_language("pt");

    let args = [json!({"user": {"name": "Ana"}, "count": 3})];

    assert_that!(
        t(&i18n, "%(user.name)s has %(count)d messages", &args),
        ok(eq("Ana tem 3 mensagens"))
    );
}

#[rstest]
fn broken_translation_reports_format_error(i18n: Arc<I18n>) {
    i18n.insert("de", Translations::single("Hello, %s", "Hallo, %(name)s und %s")).unwrap();
    i18n.set_language("de");

    assert_that!(
        t(&i18n, "Hello, %s", &[json!("Maria")]),
        err(eq(&FormatError::MixedPlaceholderStyle))
    );
}

#[tokio::test]
async fn workspace_config_and_bundles() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path();
    fs::write(
        root.join(CONFIG_FILE_NAME),
        r#"{"defaultLanguage": "pt", "bundles": {"includePatterns": ["i18n/*.json"]}}"#,
    )
    .unwrap();
    fs::create_dir_all(root.join("i18n")).unwrap();
    fs::write(root.join("i18n/pt.json"), r#"{"%d files": "%d arquivos"}"#).unwrap();

    let config = ConfigManager::load(Some(root.to_path_buf())).unwrap();
    let settings = config.settings().clone();
    let i18n = I18n::new(settings);

    let inserted = load_bundles(&i18n, root, &i18n.settings().bundles).await.unwrap();

    assert_that!(inserted, eq(1));
    assert_that!(i18n.language(), eq("pt"));
    assert_that!(t(&i18n, "%d files", &[json!(12)]), ok(eq("12 arquivos")));
}
