//! The `t` template helper and the registry view layers look helpers up in.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

use crate::format::{
    self,
    FormatError,
    type_name,
};
use crate::service::I18n;

/// Name the translation helper is registered under.
pub const TRANSLATION_HELPER: &str = "t";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HelperError {
    #[error("Unknown helper '{name}'")]
    UnknownHelper { name: String },

    #[error("Expected a base string as first argument. Got: {found}")]
    MissingBaseString { found: &'static str },

    #[error(transparent)]
    Format(#[from] FormatError),
}

/// Translates `base` and, when `args` is not empty, formats the result with them.
///
/// Without arguments the translated text is returned untouched, `%` included.
/// A missing translation formats `base` itself.
///
/// ```
/// use serde_json::json;
/// use simple_i18n::{I18n, I18nSettings, Translations, helper::t};
///
/// let i18n = I18n::new(I18nSettings::default());
/// i18n.insert("pt", Translations::single("Hello, %s", "Olá, %s")).unwrap();
/// i18n.set_language("pt");
///
/// assert_eq!(t(&i18n, "Hello, %s", &[json!("Maria")]).unwrap(), "Olá, Maria");
/// ```
pub fn t(i18n: &I18n, base: &str, args: &[Value]) -> Result<String, FormatError> {
    let resolved = i18n.translate(base);
    if args.is_empty() {
        return Ok(resolved);
    }
    format::vformat(&resolved, args)
}

/// Helper callable from a view with positional arguments.
pub type Helper = Arc<dyn Fn(&[Value]) -> Result<String, HelperError> + Send + Sync>;

/// Named helpers exposed to the view layer.
#[derive(Default, Clone)]
pub struct ViewHelpers {
    /// Helpers by name
    helpers: HashMap<String, Helper>,
}

impl ViewHelpers {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `helper` under `name`, replacing any previous helper.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        helper: impl Fn(&[Value]) -> Result<String, HelperError> + Send + Sync + 'static,
    ) {
        let name = name.into();
        let helper: Helper = Arc::new(helper);
        if self.helpers.insert(name.clone(), helper).is_some() {
            tracing::debug!(name = %name, "Replaced view helper");
        }
    }

    /// Calls the helper registered under `name`.
    pub fn call(&self, name: &str, args: &[Value]) -> Result<String, HelperError> {
        let helper = self
            .helpers
            .get(name)
            .ok_or_else(|| HelperError::UnknownHelper { name: name.to_string() })?;
        helper(args)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.helpers.contains_key(name)
    }
}

impl fmt::Debug for ViewHelpers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<&str> = self.helpers.keys().map(String::as_str).collect();
        names.sort_unstable();
        f.debug_struct("ViewHelpers").field("helpers", &names).finish()
    }
}

/// Installs [`t`] as the `t` helper: `t(base, ...args)`.
pub fn register_translation_helper(helpers: &mut ViewHelpers, i18n: Arc<I18n>) {
    helpers.register(TRANSLATION_HELPER, move |args: &[Value]| {
        let (base, rest) = match args.split_first() {
            Some((Value::String(base), rest)) => (base, rest),
            Some((other, _)) => {
                return Err(HelperError::MissingBaseString { found: type_name(other) });
            }
            None => return Err(HelperError::MissingBaseString { found: "undefined" }),
        };
        Ok(t(&i18n, base, rest)?)
    });
}
