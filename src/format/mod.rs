//! printf-style format engine.
//!
//! ```
//! use serde_json::json;
//! use simple_i18n::format::vformat;
//!
//! let text = vformat("%s scored %05.1f%%", &[json!("Ana"), json!(97.26)]).unwrap();
//! assert_eq!(text, "Ana scored 097.3%");
//! ```

mod error;
pub mod number;
mod parser;
mod render;
mod types;

use std::collections::HashMap;
use std::sync::{
    Arc,
    LazyLock,
    PoisonError,
    RwLock,
};

pub use error::FormatError;
pub use parser::{
    MAX_PRECISION,
    MAX_WIDTH,
    parse_format,
};
pub use render::format;
pub(crate) use render::type_name;
use serde_json::Value;
pub use types::{
    Argument,
    Conversion,
    FormatInstruction,
    PadChar,
    PathSegment,
    Placeholder,
};

/// Parsed instructions shared between cache and callers.
pub type Instructions = Arc<[FormatInstruction]>;

/// Process-wide cache used by [`parse`].
static CACHE: LazyLock<FormatCache> = LazyLock::new(FormatCache::new);

/// Cache of parsed format strings keyed by their exact text.
///
/// Entries are only ever added. Two threads parsing the same text race
/// harmlessly: both produce equal instructions and the later insert wins.
#[derive(Debug, Default)]
pub struct FormatCache {
    /// Format text → parsed instructions
    entries: RwLock<HashMap<String, Instructions>>,
}

impl FormatCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cached instructions for `format`, parsing it on first use.
    ///
    /// Failed parses are not cached.
    pub fn parse(&self, format: &str) -> Result<Instructions, FormatError> {
        if let Some(instructions) =
            self.entries.read().unwrap_or_else(PoisonError::into_inner).get(format)
        {
            return Ok(Arc::clone(instructions));
        }

        let instructions: Instructions = parse_format(format)?.into();
        tracing::trace!(format, "Cached parsed format string");
        self.entries
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(format.to_string(), Arc::clone(&instructions));
        Ok(instructions)
    }

    /// Number of cached format strings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Parses `format` through the process-wide cache.
pub fn parse(format: &str) -> Result<Instructions, FormatError> {
    CACHE.parse(format)
}

/// Parses (cached) and renders `format` with `args`.
pub fn vformat(format: &str, args: &[Value]) -> Result<String, FormatError> {
    render::format(&parse(format)?, args)
}
