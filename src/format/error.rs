use thiserror::Error;

/// Errors raised while parsing or rendering a format string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FormatError {
    /// A `%` does not start a valid placeholder, or a named path is malformed.
    #[error("Invalid placeholder at byte {offset}")]
    Syntax { offset: usize },

    #[error("Named and positional placeholders cannot be mixed in one format string")]
    MixedPlaceholderStyle,

    /// A named-path step was not found on the resolved argument.
    #[error("Property \"{property}\" does not exist")]
    MissingProperty { property: String },

    #[error("Conversion '%{conversion}' expects a number but found {found}")]
    TypeMismatch { conversion: char, found: &'static str },

    /// 1-based position of the argument that was not supplied.
    #[error("Argument {index} was not supplied")]
    MissingArgument { index: usize },
}
